use crate::config::CameraConfig;
use crate::rig::NavigationRig;
use glam::{Mat4, Quat, Vec3};

/// Virtual camera that carries the headset into the scene.
///
/// Derived from the rig on demand and never cached: every mode rebuilds it after the rig moves.
#[derive(Debug, Clone, Copy)]
pub struct VirtualCamera {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub near: f32,
    pub far: f32,
}

impl VirtualCamera {
    pub fn from_rig(rig: &NavigationRig, config: &CameraConfig) -> Self {
        let scale = rig.scale.max(f32::EPSILON);
        Self {
            position: rig.position,
            orientation: rig.orientation,
            scale,
            near: config.near / scale,
            far: config.far,
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orientation, self.position)
    }

    pub fn world_position(&self) -> Vec3 {
        self.position
    }

    /// Unit viewing direction (the camera's local `-z`) in scene space.
    pub fn world_direction(&self) -> Vec3 {
        (self.orientation * Vec3::NEG_Z).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_plane_shrinks_with_rig_scale() {
        let config = CameraConfig::default();
        let rig = NavigationRig::new(Vec3::ZERO, Quat::IDENTITY, 4.0);
        let camera = VirtualCamera::from_rig(&rig, &config);
        assert!((camera.near - config.near / 4.0).abs() < f32::EPSILON);
        assert!((camera.far - config.far).abs() < f32::EPSILON);
    }

    #[test]
    fn world_matrix_is_finite_and_matches_rig() {
        let rig = NavigationRig::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.3), 0.5);
        let camera = VirtualCamera::from_rig(&rig, &CameraConfig::default());
        let matrix = camera.world_matrix();
        assert!(!matrix.to_cols_array().iter().any(|v| v.is_nan() || v.is_infinite()));
        assert!(matrix.abs_diff_eq(rig.matrix(), 1e-6));
    }

    #[test]
    fn direction_follows_orientation() {
        let rig = NavigationRig::new(Vec3::ZERO, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), 1.0);
        let camera = VirtualCamera::from_rig(&rig, &CameraConfig::default());
        assert!(camera.world_direction().abs_diff_eq(Vec3::NEG_X, 1e-5));
    }
}
