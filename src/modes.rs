mod fly;
mod rotate_scale;
mod translate;

pub use fly::FlyMode;
pub use rotate_scale::RotateScaleMode;
pub use translate::TranslateMode;

use crate::bridge::CoordinateBridge;
use crate::camera::VirtualCamera;
use crate::config::NavigationConfig;
use crate::input::{ControllerSet, Pose};
use crate::rig::NavigationRig;
use crate::trigger::TriggerSet;
use crate::viewer::ViewerHost;
use glam::Vec3;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationModeKind {
    Fly,
    Translate,
    RotateScale,
}

impl NavigationModeKind {
    /// Mode selected by the number of held triggers.
    pub fn for_trigger_count(count: u32) -> Self {
        match count {
            0 => NavigationModeKind::Fly,
            1 => NavigationModeKind::Translate,
            _ => NavigationModeKind::RotateScale,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavigationModeKind::Fly => "fly",
            NavigationModeKind::Translate => "translate",
            NavigationModeKind::RotateScale => "rotate_scale",
        }
    }
}

impl fmt::Display for NavigationModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// State visible to a mode while it is entered or exited.
pub struct TransitionContext<'a> {
    pub rig: &'a NavigationRig,
    pub controllers: &'a ControllerSet,
    pub triggered: TriggerSet,
}

/// State a mode reads and writes during a frame.
pub struct FrameContext<'a> {
    pub rig: &'a mut NavigationRig,
    pub controllers: &'a ControllerSet,
    pub config: &'a NavigationConfig,
    pub viewer: &'a mut dyn ViewerHost,
}

impl FrameContext<'_> {
    pub fn camera(&self) -> VirtualCamera {
        VirtualCamera::from_rig(self.rig, &self.config.camera)
    }

    /// Bridge for the rig as it is right now.
    pub fn bridge(&self) -> CoordinateBridge {
        CoordinateBridge::from_camera(&self.camera())
    }

    /// Points the viewer along the headset (or the camera when no headset pose was reported),
    /// with the look target one rig unit ahead.
    pub fn push_view_target(&mut self) {
        let (position, direction) = view_ray(self.controllers.head(), &self.camera());
        let target = position + direction * self.rig.scale;
        self.viewer.set_view(position, target);
    }
}

fn view_ray(head: Option<&Pose>, camera: &VirtualCamera) -> (Vec3, Vec3) {
    match head {
        Some(head) => {
            let bridge = CoordinateBridge::from_camera(camera);
            let position = bridge.to_scene(head.position);
            let direction = bridge.displacement(head.position, head.forward()).normalize_or_zero();
            (position, direction)
        }
        None => (camera.world_position(), camera.world_direction()),
    }
}

/// One navigation behavior. Exactly one mode is active at a time; the others stay resident
/// so state such as the fly speed trim survives a switch.
pub trait NavigationMode {
    fn kind(&self) -> NavigationModeKind;
    fn enter(&mut self, ctx: &TransitionContext<'_>);
    fn exit(&mut self, ctx: &TransitionContext<'_>);
    fn update(&mut self, ctx: &mut FrameContext<'_>, delta: f32);
}

#[derive(Debug, Default)]
pub(crate) struct ModeSlots {
    pub(crate) fly: FlyMode,
    pub(crate) translate: TranslateMode,
    pub(crate) rotate_scale: RotateScaleMode,
}

impl ModeSlots {
    pub(crate) fn get_mut(&mut self, kind: NavigationModeKind) -> &mut dyn NavigationMode {
        match kind {
            NavigationModeKind::Fly => &mut self.fly,
            NavigationModeKind::Translate => &mut self.translate,
            NavigationModeKind::RotateScale => &mut self.rotate_scale,
        }
    }
}
