//! Main DrishtiConfig and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::graph::GraphOptimizerConfig;
use crate::sensors::NoiseConfig;

use super::error::ConfigLoadError;
use super::information::InformationSection;
use super::sensor::SensorSection;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "drishti.toml";

/// Full Drishti configuration loaded from TOML
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct DrishtiConfig {
    /// Optimizer settings (iterations, anchoring, seeding)
    #[serde(default)]
    pub optimizer: GraphOptimizerConfig,

    /// Constraint weighting
    #[serde(default)]
    pub information: InformationSection,

    /// Simulated pose error
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Simulated sensor
    #[serde(default)]
    pub sensor: SensorSection,
}

impl DrishtiConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Load from `drishti.toml` if present, else defaults
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        Self::load_or_default(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load `path` if it exists, else defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigLoadError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Parse from TOML string and validate
    pub fn from_toml(contents: &str) -> Result<Self, ConfigLoadError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigLoadError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would panic the noise sampler or leave `H`
    /// without a positive-definite structure.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let magnitude = self.noise.magnitude;
        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(ConfigLoadError::Invalid(format!(
                "noise.magnitude must be finite and >= 0, got {magnitude}"
            )));
        }

        let anchor_weight = self.optimizer.anchor_weight;
        if !anchor_weight.is_finite() || anchor_weight <= 0.0 {
            return Err(ConfigLoadError::Invalid(format!(
                "optimizer.anchor_weight must be finite and > 0, got {anchor_weight}"
            )));
        }

        if !self.optimizer.seed_spacing.is_finite() {
            return Err(ConfigLoadError::Invalid(format!(
                "optimizer.seed_spacing must be finite, got {}",
                self.optimizer.seed_spacing
            )));
        }

        self.information.validate()?;
        self.sensor.validate()
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigLoadError> {
        toml::to_string_pretty(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }
}
