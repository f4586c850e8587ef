use glam::{Quat, Vec3};
use wayfarer_common::Transform;

/// A camera-level action produced from controller input.
///
/// Controller locomotion manipulates the XR camera directly; these actions
/// never pass through the world's entity update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Translate the camera by a world-space delta.
    Move(Vec3),
    /// Rotate the camera about its local up axis, in radians.
    SnapTurn(f32),
    /// Input that maps to nothing.
    Noop,
}

impl Action {
    pub fn apply(&self, camera: &mut Transform) {
        match *self {
            Self::Move(delta) => camera.position += delta,
            Self::SnapTurn(angle) => {
                camera.rotation = (camera.rotation * Quat::from_rotation_y(angle)).normalize();
            }
            Self::Noop => {}
        }
    }
}
