//! Simulated sensor section.

use serde::{Deserialize, Serialize};

use super::defaults;
use super::error::ConfigLoadError;

/// Cone ray-cast sensor settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorSection {
    /// Maximum ray length (meters)
    #[serde(default = "defaults::sensor_range")]
    pub range: f32,

    /// Half-angle of the sensing cone (degrees)
    #[serde(default = "defaults::cone_angle_deg")]
    pub cone_angle_deg: f32,

    /// Rays cast per sensing event
    #[serde(default = "defaults::num_rays")]
    pub num_rays: usize,
}

impl Default for SensorSection {
    fn default() -> Self {
        Self {
            range: defaults::sensor_range(),
            cone_angle_deg: defaults::cone_angle_deg(),
            num_rays: defaults::num_rays(),
        }
    }
}

impl SensorSection {
    /// Validate the sensor settings.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if !self.range.is_finite() || self.range <= 0.0 {
            return Err(ConfigLoadError::Invalid(format!(
                "sensor.range must be finite and > 0, got {}",
                self.range
            )));
        }

        if !(0.0..=180.0).contains(&self.cone_angle_deg) {
            return Err(ConfigLoadError::Invalid(format!(
                "sensor.cone_angle_deg must be within [0, 180], got {}",
                self.cone_angle_deg
            )));
        }

        Ok(())
    }
}
