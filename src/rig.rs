use glam::{Mat3, Mat4, Quat, Vec3};

/// Scene up axis. Rig-local space is y-up; re-anchoring maps local `+y` onto this axis.
pub const SCENE_UP: Vec3 = Vec3::Z;

/// Virtual anchor transform for the immersive session.
///
/// Every navigation mode writes here; the virtual camera and the viewer's movement speed are
/// derived from it. `scale` is uniform and always positive, `orientation` always normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationRig {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
}

impl Default for NavigationRig {
    fn default() -> Self {
        Self { position: Vec3::ZERO, orientation: Quat::IDENTITY, scale: 1.0 }
    }
}

impl NavigationRig {
    pub fn new(position: Vec3, orientation: Quat, scale: f32) -> Self {
        Self { position, orientation: orientation.normalize(), scale }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orientation, self.position)
    }

    /// Rebuilds a rig from an affine matrix carrying a uniform scale.
    ///
    /// Returns `None` when the matrix does not decompose into finite values with a positive scale.
    pub fn from_matrix(matrix: &Mat4) -> Option<Self> {
        let (scale, orientation, position) = matrix.to_scale_rotation_translation();
        let uniform = scale.x;
        if !uniform.is_finite() || uniform <= 0.0 || !position.is_finite() || !orientation.is_finite() {
            return None;
        }
        Some(Self { position, orientation: orientation.normalize(), scale: uniform })
    }

    /// Maps a rig-local point into the scene, then drops it by `height_offset` rig units along
    /// [`SCENE_UP`]. Two-handed gestures pivot around this lowered point.
    pub fn anchored_point(&self, local: Vec3, height_offset: f32) -> Vec3 {
        self.matrix().transform_point3(local) - SCENE_UP * (height_offset * self.scale)
    }

    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
            && self.orientation.is_normalized()
            && self.scale.is_finite()
            && self.scale > 0.0
    }
}

/// Rotation whose local `+z` axis points along `toward`, keeping local `+y` as close to `up` as
/// possible. Returns `None` when `toward` is zero or parallel to `up`.
pub(crate) fn rotation_facing(toward: Vec3, up: Vec3) -> Option<Quat> {
    let z = toward.normalize_or_zero();
    if z == Vec3::ZERO {
        return None;
    }
    let x = up.cross(z).normalize_or_zero();
    if x == Vec3::ZERO {
        return None;
    }
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}
