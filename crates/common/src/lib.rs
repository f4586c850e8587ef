//! Shared types and configuration used by every wayfarer crate.

pub mod config;
pub mod types;

pub use config::{CameraConfig, ConfigError, ControllerConfig, PlayerConfig, SceneConfig};
pub use types::{EntityId, Transform};
