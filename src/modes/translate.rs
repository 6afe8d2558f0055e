use super::{FrameContext, NavigationMode, NavigationModeKind, TransitionContext};
use crate::input::ControllerId;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Grab {
    controller: ControllerId,
    start_rig_position: Vec3,
}

/// One-handed grab-and-drag. Pulling the held controller toward the user pushes the rig the
/// opposite way, so the scene follows the hand.
#[derive(Debug, Default)]
pub struct TranslateMode {
    grab: Option<Grab>,
}

impl TranslateMode {
    pub fn active_controller(&self) -> Option<ControllerId> {
        self.grab.map(|grab| grab.controller)
    }
}

impl NavigationMode for TranslateMode {
    fn kind(&self) -> NavigationModeKind {
        NavigationModeKind::Translate
    }

    fn enter(&mut self, ctx: &TransitionContext<'_>) {
        self.grab = ctx
            .triggered
            .first()
            .map(|controller| Grab { controller, start_rig_position: ctx.rig.position });
    }

    fn exit(&mut self, _ctx: &TransitionContext<'_>) {
        self.grab = None;
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, _delta: f32) {
        let Some(grab) = self.grab else {
            return;
        };
        let controller = ctx.controllers.get(grab.controller);
        let Some(start) = controller.start_pose() else {
            return;
        };
        let bridge = ctx.bridge();
        let drag = bridge.to_scene(controller.pose.position) - bridge.to_scene(start.position());
        let position = grab.start_rig_position - drag;
        if position.is_finite() {
            ctx.rig.position = position;
        }
    }
}
