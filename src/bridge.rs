use crate::camera::VirtualCamera;
use glam::{Mat4, Vec3};

/// Converts points between rig-local (tracking) space and scene space.
///
/// A bridge is a snapshot of one camera transform. Build a new one whenever the rig changes;
/// reusing an old bridge after moving the rig produces stale coordinates.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateBridge {
    to_scene: Mat4,
    to_vr: Mat4,
}

impl CoordinateBridge {
    pub fn from_camera(camera: &VirtualCamera) -> Self {
        let to_scene = camera.world_matrix();
        Self { to_scene, to_vr: to_scene.inverse() }
    }

    pub fn to_scene(&self, local: Vec3) -> Vec3 {
        self.to_scene.transform_point3(local)
    }

    pub fn to_vr(&self, scene: Vec3) -> Vec3 {
        self.to_vr.transform_point3(scene)
    }

    /// Scene-space displacement produced by moving `origin` by `offset` in rig-local space.
    pub fn displacement(&self, origin: Vec3, offset: Vec3) -> Vec3 {
        self.to_scene(origin + offset) - self.to_scene(origin)
    }
}
