//! Embodiment input: keyboard and VR thumbstick events mapped to locomotion.
//!
//! # Invariants
//! - Events are delivered synchronously; state changes are visible immediately.
//! - Handlers live only as long as their [`Subscription`].
//! - Unknown keys and axis components are ignored, never errors.

pub mod action;
pub mod controller;
pub mod events;
pub mod keys;

pub use action::Action;
pub use controller::{AxisEvent, ControllerId, ControllerLocomotion, Handedness, SnapTurnLatch};
pub use events::{EventSource, Subscription};
pub use keys::{KeyEvent, KeyState, LogicalKey, MoveDirection};
