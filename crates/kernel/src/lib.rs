//! World Kernel: entity lifecycle, player locomotion, and the follow camera.
//!
//! # Invariants
//! - Entities update in insertion order; each phase finishes for every entity
//!   before the next phase starts.
//! - The player is always a member of the world.
//! - A render handle's position equals its entity's position after `update`.
//! - One failing entity never stops the rest of a phase.

pub mod camera;
pub mod clock;
pub mod entity;
pub mod player;
pub mod render;
pub mod scene;
pub mod world;

pub use camera::CameraRig;
pub use clock::{FrameClock, FrameTime};
pub use entity::{Entity, EntityCore, EntityError, Prop};
pub use player::Player;
pub use render::{RenderBackend, RenderHandle, SphereShape};
pub use scene::{Aabb, SceneHandle, StaticScene};
pub use world::{Phase, PhaseReport, World, WorldError};
