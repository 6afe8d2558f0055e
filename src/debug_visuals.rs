use glam::Vec3;

/// Scene-space line segment the host may draw while it is visible.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub visible: bool,
}

impl DebugLine {
    pub fn hidden() -> Self {
        Self { start: Vec3::ZERO, end: Vec3::ZERO, visible: false }
    }

    pub fn set(&mut self, start: Vec3, end: Vec3) {
        self.start = start;
        self.end = end;
    }
}

/// Text billboard in scene space.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugLabel {
    pub text: String,
    pub position: Vec3,
    pub size: f32,
    pub visible: bool,
}

impl DebugLabel {
    pub fn hidden(size: f32) -> Self {
        Self { text: String::new(), position: Vec3::ZERO, size, visible: false }
    }
}
