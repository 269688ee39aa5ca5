//! Render configuration loaded from TOML
use std::path::Path;
use std::time::Duration;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::projection::DEFAULT_TOLERANCE;

/// Device units per world unit on the view plane
pub const DEFAULT_SCALE: f32 = 200.0;

/// Delay between two frames of the embedding loop
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 30;

/// Settings for a scene and the loop that drives it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub scale: f32,
    pub frame_interval_ms: u64,
    pub degenerate_tolerance: f32,
    pub observer: [f32; 3],
    pub window_origin: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            degenerate_tolerance: DEFAULT_TOLERANCE,
            // One unit behind a unit window centered on the Z axis
            observer: [0.0, 0.0, -1.0],
            window_origin: [-0.5, -0.5, 0.0],
        }
    }
}

impl RenderConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !self.degenerate_tolerance.is_finite() || self.degenerate_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "degenerate_tolerance must be zero or positive, got {}",
                self.degenerate_tolerance
            )));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "frame_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    pub fn observer_position(&self) -> Point3<f32> {
        Point3::from(self.observer)
    }

    pub fn window_position(&self) -> Point3<f32> {
        Point3::from(self.window_origin)
    }
}
