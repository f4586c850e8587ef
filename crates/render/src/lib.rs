//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderer cannot mutate world truth directly.
//! - Render state derives from world state and the camera rig.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
