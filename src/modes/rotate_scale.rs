use super::{FrameContext, NavigationMode, NavigationModeKind, TransitionContext};
use crate::config::RotateScaleConfig;
use crate::debug_visuals::{DebugLabel, DebugLine};
use crate::rig::{NavigationRig, SCENE_UP};
use crate::wrap_angle;
use glam::{Mat4, Vec2, Vec3};

const LABEL_SIZE: f32 = 0.1;

/// Relative change between the controllers' separation at gesture start and now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchDelta {
    /// Current separation over starting separation.
    pub scale_ratio: f32,
    /// Signed yaw change of the separation vector on the horizontal (x/z) plane.
    pub angle_delta: f32,
}

impl PinchDelta {
    pub const NONE: PinchDelta = PinchDelta { scale_ratio: 1.0, angle_delta: 0.0 };

    /// Degenerate starting separations define no gesture and yield [`PinchDelta::NONE`].
    pub fn between(start_vec: Vec3, end_vec: Vec3, config: &RotateScaleConfig) -> Self {
        let start_len = start_vec.length();
        if !start_len.is_finite() || start_len < config.min_start_distance {
            return Self::NONE;
        }
        let scale_ratio = (end_vec.length() / start_len).max(config.min_scale_ratio);
        let angle_delta = match (horizontal_angle(start_vec, config), horizontal_angle(end_vec, config)) {
            (Some(start), Some(end)) => wrap_angle(end - start),
            _ => 0.0,
        };
        Self { scale_ratio, angle_delta }
    }
}

/// Yaw of `v` on the x/z plane. Near-vertical vectors have no meaningful yaw and report
/// `None`, so a pinch passing through vertical adds no twist instead of snapping by up to pi.
fn horizontal_angle(v: Vec3, config: &RotateScaleConfig) -> Option<f32> {
    let flat = Vec2::new(v.x, v.z);
    (flat.length() >= config.min_start_distance).then(|| flat.y.atan2(flat.x))
}

/// Rig that keeps the gesture anchored at the hands.
///
/// `start_mid`/`end_mid` are the controllers' midpoints in rig-local space at gesture start and
/// now. The rig is rotated and scaled around the scene point under `start_mid`, then shifted so
/// the scene point under `end_mid` lands where `start_mid` was.
pub fn pinch_transform(
    start_rig: &NavigationRig,
    start_mid: Vec3,
    end_mid: Vec3,
    pinch: PinchDelta,
    config: &RotateScaleConfig,
) -> Option<NavigationRig> {
    let offset = config.anchor_height_offset;
    let pivot = start_rig.anchored_point(start_mid, offset);
    let inv_scale = 1.0 / pinch.scale_ratio;

    let pinched = Mat4::from_translation(pivot)
        * Mat4::from_scale(Vec3::splat(inv_scale))
        * Mat4::from_axis_angle(SCENE_UP, pinch.angle_delta)
        * Mat4::from_translation(-pivot)
        * start_rig.matrix();
    let pinched_rig = NavigationRig::from_matrix(&pinched)?;

    let drift = pivot - pinched_rig.anchored_point(end_mid, offset);
    NavigationRig::from_matrix(&(Mat4::from_translation(drift) * pinched))
}

/// Two-handed pinch: yaw and uniform scale around the midpoint of both controllers.
#[derive(Debug, Default)]
pub struct RotateScaleMode {
    start_rig: Option<NavigationRig>,
    line: Option<DebugLine>,
    label: Option<DebugLabel>,
    last_pinch: Option<PinchDelta>,
}

impl RotateScaleMode {
    pub fn line(&self) -> Option<&DebugLine> {
        self.line.as_ref()
    }

    pub fn label(&self) -> Option<&DebugLabel> {
        self.label.as_ref()
    }

    pub fn last_pinch(&self) -> Option<PinchDelta> {
        self.last_pinch
    }
}

impl NavigationMode for RotateScaleMode {
    fn kind(&self) -> NavigationModeKind {
        NavigationModeKind::RotateScale
    }

    fn enter(&mut self, ctx: &TransitionContext<'_>) {
        self.line.get_or_insert_with(DebugLine::hidden).visible = true;
        self.label.get_or_insert_with(|| DebugLabel::hidden(LABEL_SIZE)).visible = true;
        self.start_rig = Some(*ctx.rig);
        self.last_pinch = None;
    }

    fn exit(&mut self, _ctx: &TransitionContext<'_>) {
        if let Some(line) = self.line.as_mut() {
            line.visible = false;
        }
        if let Some(label) = self.label.as_mut() {
            label.visible = false;
        }
        self.start_rig = None;
    }

    fn update(&mut self, ctx: &mut FrameContext<'_>, _delta: f32) {
        let Some(start_rig) = self.start_rig else {
            return;
        };
        let primary = ctx.controllers.primary();
        let secondary = ctx.controllers.secondary();
        let (Some(start_c1), Some(start_c2)) = (primary.start_pose(), secondary.start_pose()) else {
            return;
        };
        let (start_c1, start_c2) = (start_c1.position(), start_c2.position());
        let (end_c1, end_c2) = (primary.pose.position, secondary.pose.position);

        let start_mid = (start_c1 + start_c2) * 0.5;
        let end_mid = (end_c1 + end_c2) * 0.5;
        let config = &ctx.config.rotate_scale;
        let pinch = PinchDelta::between(start_c2 - start_c1, end_c2 - end_c1, config);

        // A non-finite frame leaves the rig where it was; the next frame recomputes from live input.
        let Some(rig) = pinch_transform(&start_rig, start_mid, end_mid, pinch, config) else {
            return;
        };
        *ctx.rig = rig;
        self.last_pinch = Some(pinch);

        ctx.viewer.set_move_speed(rig.scale);
        ctx.push_view_target();

        let bridge = ctx.bridge();
        if let Some(line) = self.line.as_mut() {
            line.set(bridge.to_scene(end_c1), bridge.to_scene(end_c2));
        }
        if let Some(label) = self.label.as_mut() {
            label.text = format!("scale {:.3} yaw {:.1}", rig.scale, pinch.angle_delta.to_degrees());
            label.position = bridge.to_scene(end_mid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn flat_config() -> RotateScaleConfig {
        RotateScaleConfig { anchor_height_offset: 0.0, ..RotateScaleConfig::default() }
    }

    #[test]
    fn pinch_delta_measures_ratio_and_yaw() {
        let pinch = PinchDelta::between(Vec3::X, Vec3::new(0.0, 0.3, -2.0), &RotateScaleConfig::default());
        assert!((pinch.scale_ratio - Vec3::new(0.0, 0.3, -2.0).length()).abs() < 1e-6);
        assert!((pinch.angle_delta + FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn pinch_delta_wraps_across_pi() {
        let start = Vec3::new(-1.0, 0.0, 0.1);
        let end = Vec3::new(-1.0, 0.0, -0.1);
        let pinch = PinchDelta::between(start, end, &RotateScaleConfig::default());
        assert!(pinch.angle_delta.abs() < 0.25, "wrapped delta should be small, got {}", pinch.angle_delta);
    }

    #[test]
    fn vertical_separation_adds_no_yaw() {
        let pinch = PinchDelta::between(Vec3::new(0.0, 0.0, 0.5), Vec3::new(0.0, 0.5, 0.0), &RotateScaleConfig::default());
        assert_eq!(pinch.angle_delta, 0.0);
        assert!((pinch.scale_ratio - 1.0).abs() < 1e-6);
    }

    #[test]
    fn coincident_start_is_no_gesture() {
        let pinch = PinchDelta::between(Vec3::ZERO, Vec3::new(3.0, 0.0, 1.0), &RotateScaleConfig::default());
        assert_eq!(pinch, PinchDelta::NONE);
    }

    #[test]
    fn collapsed_end_is_bounded_by_min_ratio() {
        let config = RotateScaleConfig::default();
        let pinch = PinchDelta::between(Vec3::X, Vec3::ZERO, &config);
        assert!((pinch.scale_ratio - config.min_scale_ratio).abs() < f32::EPSILON);
        assert_eq!(pinch.angle_delta, 0.0);
    }

    #[test]
    fn unchanged_pinch_keeps_rig() {
        let start = NavigationRig::new(Vec3::new(4.0, 5.0, 6.0), Quat::from_rotation_z(0.4), 3.0);
        let mid = Vec3::new(0.1, 1.2, -0.3);
        let rig = pinch_transform(&start, mid, mid, PinchDelta::NONE, &RotateScaleConfig::default())
            .expect("finite transform");
        assert!(rig.position.abs_diff_eq(start.position, 1e-4));
        assert!(rig.orientation.abs_diff_eq(start.orientation, 1e-5));
        assert!((rig.scale - 3.0).abs() < 1e-5);
    }

    #[test]
    fn yaw_rotates_about_scene_up_through_the_pivot() {
        let start = NavigationRig::default();
        let mid = Vec3::new(1.0, 0.0, 0.0);
        let pinch = PinchDelta { scale_ratio: 1.0, angle_delta: FRAC_PI_2 };
        let rig = pinch_transform(&start, mid, mid, pinch, &flat_config()).expect("finite transform");

        assert!(rig.orientation.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_2), 1e-5));
        assert!(rig.matrix().transform_point3(mid).abs_diff_eq(mid, 1e-5));
    }

    #[test]
    fn anchored_point_tracks_moving_hands() {
        let start = NavigationRig::new(Vec3::new(-2.0, 7.0, 1.0), Quat::from_rotation_z(1.3), 1.5);
        let start_mid = Vec3::new(0.0, 1.0, -0.5);
        let end_mid = Vec3::new(0.4, 1.1, -0.2);
        let pinch = PinchDelta { scale_ratio: 1.7, angle_delta: -0.6 };
        let config = RotateScaleConfig::default();
        let rig = pinch_transform(&start, start_mid, end_mid, pinch, &config).expect("finite transform");

        let before = start.anchored_point(start_mid, config.anchor_height_offset);
        let after = rig.anchored_point(end_mid, config.anchor_height_offset);
        assert!(after.abs_diff_eq(before, 1e-4));
        assert!((rig.scale - 1.5 / 1.7).abs() < 1e-5);
    }
}
