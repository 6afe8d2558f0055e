use super::{FrameContext, NavigationMode, NavigationModeKind, TransitionContext};
use crate::bridge::CoordinateBridge;
use crate::config::FlyConfig;
use crate::debug_visuals::DebugLabel;
use crate::input::{ControllerInputState, GamepadState};
use glam::Vec3;

const LABEL_SIZE: f32 = 0.1;

/// Continuous flight along the primary controller's pointing direction.
///
/// The primary controller's stick sets the throttle; the secondary controller's stick ramps a
/// persistent speed factor up or down while held past the deadzone.
#[derive(Debug)]
pub struct FlyMode {
    move_factor: f32,
    label: Option<DebugLabel>,
}

impl Default for FlyMode {
    fn default() -> Self {
        Self { move_factor: 1.0, label: None }
    }
}

impl FlyMode {
    pub fn move_factor(&self) -> f32 {
        self.move_factor
    }

    pub fn label(&self) -> Option<&DebugLabel> {
        self.label.as_ref()
    }

    fn apply_speed_trim(&mut self, pad: &GamepadState, config: &FlyConfig) {
        let Some(tilt) = pad.trim_axis() else {
            return;
        };
        if !tilt.is_finite() || tilt.abs() <= config.trim_deadzone {
            return;
        }
        // Pushing the stick forward reports a negative value and speeds flight up.
        let factor = if tilt < 0.0 { config.trim_speed_up } else { config.trim_slow_down };
        self.move_factor = config.clamp_move_factor(self.move_factor * factor);
    }
}

/// Scene-space displacement for one unit of flight time, before the speed factor and the
/// "move the world" inversion are applied. `None` without an input source.
pub(crate) fn compute_move(
    controller: &ControllerInputState,
    bridge: &CoordinateBridge,
    move_speed: f32,
    rig_scale: f32,
) -> Option<Vec3> {
    let pad = controller.gamepad()?;
    let amount = pad.throttle() * move_speed / rig_scale;
    let offset = controller.pose.forward() * amount;
    let scene_move = bridge.displacement(controller.pose.position, offset);
    scene_move.is_finite().then_some(scene_move)
}

impl NavigationMode for FlyMode {
    fn kind(&self) -> NavigationModeKind {
        NavigationModeKind::Fly
    }

    fn enter(&mut self, _ctx: &TransitionContext<'_>) {
        self.label.get_or_insert_with(|| DebugLabel::hidden(LABEL_SIZE));
    }

    fn exit(&mut self, _ctx: &TransitionContext<'_>) {}

    fn update(&mut self, ctx: &mut FrameContext<'_>, delta: f32) {
        if let Some(pad) = ctx.controllers.secondary().gamepad() {
            self.apply_speed_trim(pad, &ctx.config.fly);
        }

        let bridge = ctx.bridge();
        let move_speed = ctx.viewer.move_speed();
        if let Some(scene_move) = compute_move(ctx.controllers.primary(), &bridge, move_speed, ctx.rig.scale) {
            ctx.rig.position += scene_move * (-delta * self.move_factor);
        }

        if let Some(label) = self.label.as_mut() {
            label.text = format!("speed x{:.2}", self.move_factor);
            label.position = ctx.camera().world_position();
        }

        ctx.push_view_target();
    }
}
