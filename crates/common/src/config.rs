//! Scene tuning parameters.
//!
//! Every value has a default matching the shipped feel of the scene; a JSON
//! file only needs to name the fields it overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Player body and keyboard locomotion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Units per second along each held axis.
    pub move_speed: f32,
    /// Diameter of the base sphere the player is created with.
    pub diameter: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            diameter: 0.2,
        }
    }
}

/// Follow camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Blend factor applied once per tick. Not normalized by frame time.
    pub smoothing: f32,
    /// Camera offset from the rig anchor, in rig space.
    pub offset: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.4,
            offset: [0.0, 10.0, -10.0],
        }
    }
}

/// VR thumbstick locomotion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Distance moved per left-stick sample at full deflection.
    pub move_speed: f32,
    /// Snap-turn angle in radians.
    pub snap_angle: f32,
    /// Right-stick deflection that fires a snap turn.
    pub deflection_threshold: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            snap_angle: std::f32::consts::FRAC_PI_8,
            deflection_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub player: PlayerConfig,
    pub camera: CameraConfig,
    pub controller: ControllerConfig,
}

impl SceneConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = serde_json::from_reader(std::fs::File::open(path)?)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded scene config");
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player.move_speed", self.player.move_speed)?;
        positive("player.diameter", self.player.diameter)?;
        positive("controller.move_speed", self.controller.move_speed)?;

        let s = self.camera.smoothing;
        if !(0.0..=1.0).contains(&s) {
            return Err(invalid("camera.smoothing", format!("{s} is outside [0, 1]")));
        }
        if self.camera.offset.iter().any(|c| !c.is_finite()) {
            return Err(invalid("camera.offset", "components must be finite".into()));
        }

        let t = self.controller.deflection_threshold;
        if !(t > 0.0 && t < 1.0) {
            return Err(invalid(
                "controller.deflection_threshold",
                format!("{t} is outside (0, 1)"),
            ));
        }
        if !self.controller.snap_angle.is_finite() {
            return Err(invalid("controller.snap_angle", "must be finite".into()));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is not a positive finite number")))
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
