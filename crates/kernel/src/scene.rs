//! In-process static collision scene.
//!
//! A [`RenderBackend`] without a GPU: it holds axis-aligned static colliders
//! and hands out [`SceneHandle`]s whose collision-aware moves slide along
//! collider faces. Used by the CLI driver and by tests.

use crate::render::{RenderBackend, RenderHandle, SphereShape};
use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wayfarer_common::EntityId;

/// Gap kept between a clipped mover and the face it stopped against.
const SKIN: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn around(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Interior overlap. Boxes that only touch do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min.cmplt(other.max).all() && self.max.cmpgt(other.min).all()
    }
}

#[derive(Debug, Default)]
struct SceneState {
    colliders: RefCell<Vec<Aabb>>,
    live_handles: Cell<usize>,
}

/// Static collidable geometry plus the handles created against it.
#[derive(Debug, Default, Clone)]
pub struct StaticScene {
    state: Rc<SceneState>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_collider(&mut self, aabb: Aabb) {
        self.state.colliders.borrow_mut().push(aabb);
    }

    /// A ground slab whose top face sits at `y`.
    pub fn add_ground(&mut self, width: f32, depth: f32, y: f32) {
        let half = Vec3::new(width / 2.0, 0.5, depth / 2.0);
        self.add_collider(Aabb::around(Vec3::new(0.0, y - 0.5, 0.0), half));
    }

    pub fn add_box(&mut self, center: Vec3, size: f32) {
        self.add_collider(Aabb::around(center, Vec3::splat(size / 2.0)));
    }

    pub fn colliders(&self) -> Vec<Aabb> {
        self.state.colliders.borrow().clone()
    }

    /// Handles created by this scene that have not been dropped.
    pub fn live_handles(&self) -> usize {
        self.state.live_handles.get()
    }
}

impl RenderBackend for StaticScene {
    fn create_sphere(&mut self, id: &EntityId, shape: SphereShape) -> Box<dyn RenderHandle> {
        self.state.live_handles.set(self.state.live_handles.get() + 1);
        tracing::trace!(%id, diameter = ?shape.diameter, "created sphere handle");
        Box::new(SceneHandle {
            id: id.clone(),
            position: Vec3::ZERO,
            half_extents: shape.diameter / 2.0,
            scene: self.state.clone(),
        })
    }
}

/// A body in a [`StaticScene`], collided as its bounding box.
#[derive(Debug)]
pub struct SceneHandle {
    id: EntityId,
    position: Vec3,
    half_extents: Vec3,
    scene: Rc<SceneState>,
}

impl SceneHandle {
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    fn bounds_at(&self, center: Vec3) -> Aabb {
        Aabb::around(center, self.half_extents)
    }
}

impl RenderHandle for SceneHandle {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn move_with_collisions(&mut self, displacement: Vec3) -> Vec3 {
        let start = self.position;
        let colliders = self.scene.colliders.borrow();
        let mut pos = start;

        // One axis at a time so a blocked axis doesn't stop the others.
        for axis in 0..3 {
            let d = displacement[axis];
            if d == 0.0 {
                continue;
            }
            let current = self.bounds_at(pos);
            let mut target = pos;
            target[axis] += d;
            let swept = current.union(&self.bounds_at(target));

            for c in colliders.iter() {
                // Already-overlapping geometry would trap the mover; ignore it.
                if !swept.overlaps(c) || current.overlaps(c) {
                    continue;
                }
                let half = self.half_extents[axis];
                if d > 0.0 {
                    let limit = c.min[axis] - half - SKIN;
                    target[axis] = target[axis].min(limit).max(pos[axis]);
                } else {
                    let limit = c.max[axis] + half + SKIN;
                    target[axis] = target[axis].max(limit).min(pos[axis]);
                }
            }
            pos = target;
        }

        self.position = pos;
        pos - start
    }
}

impl Drop for SceneHandle {
    fn drop(&mut self) {
        let live = &self.scene.live_handles;
        live.set(live.get().saturating_sub(1));
        tracing::trace!(id = %self.id, "disposed sphere handle");
    }
}
