use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Where the viewer is looking from, in scene space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub position: Vec3,
    pub direction: Vec3,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { position: Vec3::ZERO, direction: Vec3::Y }
    }
}

/// The application viewer the navigation controller drives.
pub trait ViewerHost {
    /// Movement speed of the viewer; doubles as the world scale of an immersive session.
    fn move_speed(&self) -> f32;
    fn set_move_speed(&mut self, speed: f32);
    fn view(&self) -> ViewState;
    fn set_view(&mut self, position: Vec3, target: Vec3);
}

/// Viewer without a renderer. Records what navigation pushes to it.
#[derive(Debug, Clone)]
pub struct HeadlessViewer {
    move_speed: f32,
    view: ViewState,
    target: Vec3,
    view_updates: u64,
}

impl HeadlessViewer {
    pub fn new(move_speed: f32, view: ViewState) -> Self {
        Self { move_speed, view, target: view.position + view.direction, view_updates: 0 }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn view_updates(&self) -> u64 {
        self.view_updates
    }
}

impl Default for HeadlessViewer {
    fn default() -> Self {
        Self::new(1.0, ViewState::default())
    }
}

impl ViewerHost for HeadlessViewer {
    fn move_speed(&self) -> f32 {
        self.move_speed
    }

    fn set_move_speed(&mut self, speed: f32) {
        self.move_speed = speed;
    }

    fn view(&self) -> ViewState {
        self.view
    }

    fn set_view(&mut self, position: Vec3, target: Vec3) {
        let direction = (target - position).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.view.direction = direction;
        }
        self.view.position = position;
        self.target = target;
        self.view_updates += 1;
    }
}
