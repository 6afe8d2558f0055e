use crate::controller::NavigationController;
use crate::input::InputEvent;
use crate::modes::NavigationModeKind;
use crate::viewer::{HeadlessViewer, ViewState, ViewerHost};
use anyhow::{bail, Context, Result};
use glam::{Quat, Vec3};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct RecordedFrame {
    pub delta: f32,
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

/// Captured controller traffic of an immersive session, frame by frame.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionRecording {
    #[serde(default = "SessionRecording::default_move_speed")]
    pub move_speed: f32,
    #[serde(default)]
    pub view: ViewState,
    #[serde(default)]
    pub frames: Vec<RecordedFrame>,
}

/// Rig state after one replayed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigSample {
    pub frame: usize,
    pub mode: NavigationModeKind,
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
}

impl SessionRecording {
    fn default_move_speed() -> f32 {
        1.0
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read recording {}", path.display()))?;
        let recording: SessionRecording = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse recording {}", path.display()))?;
        recording.validate().with_context(|| format!("Invalid recording {}", path.display()))?;
        Ok(recording)
    }

    fn validate(&self) -> Result<()> {
        if !self.move_speed.is_finite() || self.move_speed <= 0.0 {
            bail!("move_speed must be positive, got {}", self.move_speed);
        }
        for (index, frame) in self.frames.iter().enumerate() {
            if !frame.delta.is_finite() || frame.delta < 0.0 {
                bail!("frame {index} has invalid delta {}", frame.delta);
            }
        }
        Ok(())
    }

    pub fn viewer(&self) -> HeadlessViewer {
        HeadlessViewer::new(self.move_speed, self.view)
    }

    /// Starts a session on `viewer`, feeds every frame's events and advances one update per
    /// frame.
    pub fn replay(&self, controller: &mut NavigationController, viewer: &mut dyn ViewerHost) -> Vec<RigSample> {
        controller.start_session(viewer);
        let mut samples = Vec::with_capacity(self.frames.len());
        for (frame, recorded) in self.frames.iter().enumerate() {
            for event in &recorded.events {
                controller.handle_input(event.clone());
            }
            controller.update(recorded.delta, viewer);
            let rig = controller.rig();
            samples.push(RigSample {
                frame,
                mode: controller.active_mode(),
                position: rig.position,
                orientation: rig.orientation,
                scale: rig.scale,
            });
        }
        controller.end_session();
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_delta() {
        let json = r#"{"frames":[{"delta":0.016},{"delta":-1.0}]}"#;
        let recording: SessionRecording = serde_json::from_str(json).expect("recording parses");
        let err = recording.validate().unwrap_err();
        assert!(err.to_string().contains("frame 1"), "error should name the frame: {err}");
    }

    #[test]
    fn defaults_fill_missing_sections() {
        let recording: SessionRecording = serde_json::from_str("{}").expect("recording parses");
        assert_eq!(recording.move_speed, 1.0);
        assert_eq!(recording.view, ViewState::default());
        assert!(recording.frames.is_empty());
    }
}
