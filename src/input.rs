use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerId {
    Primary,
    Secondary,
}

impl ControllerId {
    pub const ALL: [ControllerId; 2] = [ControllerId::Primary, ControllerId::Secondary];

    pub fn label(self) -> &'static str {
        match self {
            ControllerId::Primary => "primary",
            ControllerId::Secondary => "secondary",
        }
    }
}

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tracked pose in rig-local (tracking) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self { position: Vec3::ZERO, orientation: Quat::IDENTITY }
    }
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }
}

/// Controller position frozen when a navigation mode is entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSnapshot {
    position: Vec3,
}

impl PoseSnapshot {
    pub fn capture(pose: &Pose) -> Self {
        Self { position: pose.position }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }
}

/// Gamepad-like axes of a connected input source.
///
/// Two-axis devices expose a touchpad, four-axis devices a touchpad followed by a thumbstick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    axes: SmallVec<[f32; 4]>,
}

impl GamepadState {
    pub fn new(axes: &[f32]) -> Self {
        Self { axes: SmallVec::from_slice(axes) }
    }

    pub fn set_axes(&mut self, axes: &[f32]) {
        self.axes.clear();
        self.axes.extend_from_slice(axes);
    }

    /// Forward/back tilt driving flight: the touchpad's vertical axis on two-axis devices,
    /// the thumbstick's on four-axis devices, zero otherwise.
    pub fn throttle(&self) -> f32 {
        match self.axes.len() {
            2 => self.axes[1],
            4 => self.axes[3],
            _ => 0.0,
        }
    }

    /// Vertical tilt used for the speed trim. Absent on devices without axes.
    pub fn trim_axis(&self) -> Option<f32> {
        self.axes.get(1).copied()
    }
}

#[derive(Debug, Clone)]
pub struct ControllerInputState {
    pub id: ControllerId,
    pub pose: Pose,
    pub trigger_pressed: bool,
    gamepad: Option<GamepadState>,
    start_pose: Option<PoseSnapshot>,
}

impl ControllerInputState {
    pub fn new(id: ControllerId) -> Self {
        Self { id, pose: Pose::default(), trigger_pressed: false, gamepad: None, start_pose: None }
    }

    /// Input source of the controller; `None` while disconnected.
    pub fn gamepad(&self) -> Option<&GamepadState> {
        self.gamepad.as_ref()
    }

    pub fn start_pose(&self) -> Option<&PoseSnapshot> {
        self.start_pose.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.gamepad.is_some()
    }

    pub(crate) fn capture_start_pose(&mut self) {
        self.start_pose = Some(PoseSnapshot::capture(&self.pose));
    }
}

/// Press or release of a controller trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEdge {
    pub controller: ControllerId,
    pub pressed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Connected {
        controller: ControllerId,
        #[serde(default)]
        axes: Vec<f32>,
    },
    Disconnected {
        controller: ControllerId,
    },
    Pose {
        controller: ControllerId,
        position: Vec3,
        #[serde(default)]
        orientation: Quat,
    },
    Axes {
        controller: ControllerId,
        axes: Vec<f32>,
    },
    SelectStart {
        controller: ControllerId,
    },
    SelectEnd {
        controller: ControllerId,
    },
    HeadPose {
        position: Vec3,
        #[serde(default)]
        orientation: Quat,
    },
}

/// Live state of both hand controllers and the optional headset pose.
#[derive(Debug, Clone)]
pub struct ControllerSet {
    primary: ControllerInputState,
    secondary: ControllerInputState,
    head: Option<Pose>,
}

impl Default for ControllerSet {
    fn default() -> Self {
        Self {
            primary: ControllerInputState::new(ControllerId::Primary),
            secondary: ControllerInputState::new(ControllerId::Secondary),
            head: None,
        }
    }
}

impl ControllerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ControllerId) -> &ControllerInputState {
        match id {
            ControllerId::Primary => &self.primary,
            ControllerId::Secondary => &self.secondary,
        }
    }

    pub fn get_mut(&mut self, id: ControllerId) -> &mut ControllerInputState {
        match id {
            ControllerId::Primary => &mut self.primary,
            ControllerId::Secondary => &mut self.secondary,
        }
    }

    pub fn primary(&self) -> &ControllerInputState {
        &self.primary
    }

    pub fn secondary(&self) -> &ControllerInputState {
        &self.secondary
    }

    pub fn head(&self) -> Option<&Pose> {
        self.head.as_ref()
    }

    /// Freezes the current pose of every controller as its mode-entry reference.
    pub(crate) fn capture_start_poses(&mut self) {
        self.primary.capture_start_pose();
        self.secondary.capture_start_pose();
    }

    /// Applies one event and reports the trigger edge it caused, if any.
    ///
    /// Repeated presses or releases produce no edge. Disconnecting a controller while its
    /// trigger is held releases the trigger.
    pub fn push(&mut self, event: InputEvent) -> Option<TriggerEdge> {
        match event {
            InputEvent::Connected { controller, axes } => {
                self.get_mut(controller).gamepad = Some(GamepadState::new(&axes));
                None
            }
            InputEvent::Disconnected { controller } => {
                let state = self.get_mut(controller);
                state.gamepad = None;
                Self::set_trigger(state, false)
            }
            InputEvent::Pose { controller, position, orientation } => {
                self.get_mut(controller).pose = Pose::new(position, orientation.normalize());
                None
            }
            InputEvent::Axes { controller, axes } => {
                let state = self.get_mut(controller);
                match state.gamepad.as_mut() {
                    Some(pad) => pad.set_axes(&axes),
                    None => state.gamepad = Some(GamepadState::new(&axes)),
                }
                None
            }
            InputEvent::SelectStart { controller } => Self::set_trigger(self.get_mut(controller), true),
            InputEvent::SelectEnd { controller } => Self::set_trigger(self.get_mut(controller), false),
            InputEvent::HeadPose { position, orientation } => {
                self.head = Some(Pose::new(position, orientation.normalize()));
                None
            }
        }
    }

    fn set_trigger(state: &mut ControllerInputState, pressed: bool) -> Option<TriggerEdge> {
        if state.trigger_pressed == pressed {
            return None;
        }
        state.trigger_pressed = pressed;
        Some(TriggerEdge { controller: state.id, pressed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_axis_depends_on_layout() {
        assert_eq!(GamepadState::new(&[]).throttle(), 0.0);
        assert_eq!(GamepadState::new(&[0.1, 0.7]).throttle(), 0.7);
        assert_eq!(GamepadState::new(&[0.1, 0.7, 0.2, -0.4]).throttle(), -0.4);
        assert_eq!(GamepadState::new(&[0.1, 0.7, 0.2]).throttle(), 0.0);
        assert_eq!(GamepadState::new(&[]).trim_axis(), None);
        assert_eq!(GamepadState::new(&[0.0, -0.9, 0.0, 0.0]).trim_axis(), Some(-0.9));
    }

    #[test]
    fn duplicate_trigger_events_produce_single_edge() {
        let mut set = ControllerSet::new();
        let press = InputEvent::SelectStart { controller: ControllerId::Secondary };
        assert_eq!(
            set.push(press.clone()),
            Some(TriggerEdge { controller: ControllerId::Secondary, pressed: true })
        );
        assert_eq!(set.push(press), None);
        assert!(set.secondary().trigger_pressed);
        assert_eq!(set.push(InputEvent::SelectEnd { controller: ControllerId::Primary }), None);
    }

    #[test]
    fn disconnect_clears_source_and_releases_trigger() {
        let mut set = ControllerSet::new();
        set.push(InputEvent::Connected { controller: ControllerId::Primary, axes: vec![0.0, 0.0] });
        set.push(InputEvent::SelectStart { controller: ControllerId::Primary });
        assert!(set.primary().is_connected());

        let edge = set.push(InputEvent::Disconnected { controller: ControllerId::Primary });
        assert_eq!(edge, Some(TriggerEdge { controller: ControllerId::Primary, pressed: false }));
        assert!(set.primary().gamepad().is_none());
        assert!(!set.primary().trigger_pressed);
    }

    #[test]
    fn snapshot_does_not_follow_later_poses() {
        let mut set = ControllerSet::new();
        set.push(InputEvent::Pose {
            controller: ControllerId::Primary,
            position: Vec3::new(1.0, 2.0, 3.0),
            orientation: Quat::IDENTITY,
        });
        set.capture_start_poses();
        set.push(InputEvent::Pose {
            controller: ControllerId::Primary,
            position: Vec3::new(-1.0, 0.0, 0.0),
            orientation: Quat::IDENTITY,
        });
        let start = set.primary().start_pose().expect("snapshot taken");
        assert_eq!(start.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(set.secondary().start_pose().map(|s| s.position()), Some(Vec3::ZERO));
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let json = r#"[
            {"type":"connected","controller":"secondary","axes":[0.0,0.0,0.0,-1.0]},
            {"type":"pose","controller":"primary","position":[0.0,1.5,-0.2]},
            {"type":"select_start","controller":"primary"}
        ]"#;
        let events: Vec<InputEvent> = serde_json::from_str(json).expect("events parse");
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[1],
            InputEvent::Pose {
                controller: ControllerId::Primary,
                position: Vec3::new(0.0, 1.5, -0.2),
                orientation: Quat::IDENTITY,
            }
        );
    }
}
