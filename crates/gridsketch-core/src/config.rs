//! Editor configuration.

use crate::history::DEFAULT_MAX_HISTORY;
use crate::view::{DEFAULT_SCALE, DEFAULT_ZOOM_SENSITIVITY};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("min_scale ({min}) is greater than max_scale ({max})")]
    ScaleRange { min: f64, max: f64 },
    #[error("initial_scale ({value}) is outside [{min}, {max}]")]
    InitialScale { value: f64, min: f64, max: f64 },
    #[error("click_timeout_ms must be greater than zero")]
    ZeroClickTimeout,
}

/// Tunable editor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Longest press-release interval still treated as a click.
    pub click_timeout_ms: u64,
    /// Scale change per wheel unit.
    pub zoom_sensitivity: f64,
    /// World units per screen pixel at startup.
    pub initial_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Maximum number of undoable point edits.
    pub max_history: usize,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            click_timeout_ms: 200,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            initial_scale: DEFAULT_SCALE,
            min_scale: 1e-6,
            max_scale: 1e6,
            max_history: DEFAULT_MAX_HISTORY,
            viewport_width: 800.0,
            viewport_height: 600.0,
        }
    }
}

impl SketchConfig {
    /// Parse and validate a JSON configuration. Missing fields use defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn click_timeout(&self) -> Duration {
        Duration::from_millis(self.click_timeout_ms)
    }

    /// Check that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("zoom_sensitivity", self.zoom_sensitivity),
            ("initial_scale", self.initial_scale),
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        for (field, value) in [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::ScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if self.initial_scale < self.min_scale || self.initial_scale > self.max_scale {
            return Err(ConfigError::InitialScale {
                value: self.initial_scale,
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if self.click_timeout_ms == 0 {
            return Err(ConfigError::ZeroClickTimeout);
        }
        Ok(())
    }
}
