use crate::clock::FrameTime;
use crate::render::{RenderBackend, RenderHandle, SphereShape};
use glam::Vec3;
use wayfarer_common::EntityId;

/// Errors an entity can report from one of its update phases.
///
/// The world logs these and carries on with the remaining entities.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("entity {id} produced a non-finite displacement {displacement}")]
    NonFiniteDisplacement { id: EntityId, displacement: Vec3 },
    #[error("entity {id} failed: {reason}")]
    Failed { id: EntityId, reason: String },
}

/// State shared by every entity kind: identity, spatial state, and the one
/// render handle the entity owns.
pub struct EntityCore {
    id: EntityId,
    position: Vec3,
    diameter: f32,
    move_speed: f32,
    handle: Box<dyn RenderHandle>,
}

impl EntityCore {
    /// Create the entity with a sphere handle of its diameter, placed at `position`.
    pub fn new(
        id: EntityId,
        position: Vec3,
        diameter: f32,
        move_speed: f32,
        backend: &mut dyn RenderBackend,
    ) -> Self {
        let mut handle = backend.create_sphere(&id, SphereShape::sphere(diameter));
        handle.set_position(position);
        Self {
            id,
            position,
            diameter,
            move_speed,
            handle,
        }
    }

    /// Stable identifier, unique within a world.
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Logical position; the handle follows it on `update`.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Takes effect on the handle at the next `update`.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Diameter the initial sphere handle was created with.
    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    /// Units per second.
    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    pub fn set_move_speed(&mut self, move_speed: f32) {
        self.move_speed = move_speed;
    }

    pub fn handle(&self) -> &dyn RenderHandle {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> &mut dyn RenderHandle {
        self.handle.as_mut()
    }

    /// Swap in a new render handle. The previous handle is dropped (and so
    /// disposed) before the new one takes over the entity's position.
    pub fn replace_handle(&mut self, handle: Box<dyn RenderHandle>) {
        let previous = std::mem::replace(&mut self.handle, handle);
        drop(previous);
        self.handle.set_position(self.position);
        tracing::debug!(id = %self.id, "replaced render handle");
    }

    /// Push `position` to the render handle.
    pub fn sync_handle(&mut self) {
        self.handle.set_position(self.position);
    }

    /// Adopt the render handle's position, e.g. after a collision-aware move.
    pub fn sync_from_handle(&mut self) {
        self.position = self.handle.position();
    }
}

impl std::fmt::Debug for EntityCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityCore")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("diameter", &self.diameter)
            .field("move_speed", &self.move_speed)
            .finish_non_exhaustive()
    }
}

/// The per-tick lifecycle every entity kind implements.
///
/// The world calls `early_update` on every entity, then `update` on every
/// entity, then `late_update`. An implementation of `update` must leave the
/// render handle synchronized with the entity position.
pub trait Entity {
    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    fn id(&self) -> &EntityId {
        self.core().id()
    }

    fn position(&self) -> Vec3 {
        self.core().position()
    }

    fn early_update(&mut self, _frame: FrameTime) -> Result<(), EntityError> {
        Ok(())
    }

    fn update(&mut self, _frame: FrameTime) -> Result<(), EntityError> {
        self.core_mut().sync_handle();
        Ok(())
    }

    fn late_update(&mut self, _frame: FrameTime) -> Result<(), EntityError> {
        Ok(())
    }
}

/// An entity with no behaviour of its own; it only keeps its handle in place.
#[derive(Debug)]
pub struct Prop {
    core: EntityCore,
}

impl Prop {
    pub const DEFAULT_DIAMETER: f32 = 2.0;
    pub const DEFAULT_MOVE_SPEED: f32 = 0.02;

    pub fn new(id: EntityId, position: Vec3, backend: &mut dyn RenderBackend) -> Self {
        Self::with_diameter(id, position, Self::DEFAULT_DIAMETER, backend)
    }

    /// A prop with a freshly generated id.
    pub fn unnamed(position: Vec3, backend: &mut dyn RenderBackend) -> Self {
        Self::new(EntityId::generate(), position, backend)
    }

    pub fn with_diameter(
        id: EntityId,
        position: Vec3,
        diameter: f32,
        backend: &mut dyn RenderBackend,
    ) -> Self {
        Self {
            core: EntityCore::new(id, position, diameter, Self::DEFAULT_MOVE_SPEED, backend),
        }
    }
}

impl Entity for Prop {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}
