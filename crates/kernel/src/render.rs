//! The narrow interface the kernel needs from a rendering/physics engine.

use glam::Vec3;
use wayfarer_common::EntityId;

/// Shape of a sphere or ellipsoid mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereShape {
    /// Diameter along each axis.
    pub diameter: Vec3,
    pub segments: u32,
}

impl SphereShape {
    pub fn sphere(diameter: f32) -> Self {
        Self::ellipsoid(Vec3::splat(diameter))
    }

    pub fn ellipsoid(diameter: Vec3) -> Self {
        Self {
            diameter,
            segments: 16,
        }
    }
}

/// An engine-side object with a transform, owned by exactly one entity.
///
/// Dropping the handle disposes the engine object.
pub trait RenderHandle {
    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    /// Move by `displacement`, clipped against static collidable geometry.
    /// Returns the displacement actually applied.
    fn move_with_collisions(&mut self, displacement: Vec3) -> Vec3;
}

/// Creates render handles.
pub trait RenderBackend {
    fn create_sphere(&mut self, id: &EntityId, shape: SphereShape) -> Box<dyn RenderHandle>;
}
