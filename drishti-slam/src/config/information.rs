//! Constraint weighting section.

use serde::{Deserialize, Serialize};

use crate::engine::graph::Information3D;

use super::defaults;
use super::error::ConfigLoadError;

/// Information matrix applied to every odometry constraint.
///
/// Either a diagonal (`xx`, `yy`, `zz`) or, when `std_dev` is set,
/// derived from per-axis standard deviations (which takes precedence).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InformationSection {
    /// Weight on x error
    #[serde(default = "defaults::information_weight")]
    pub xx: f32,

    /// Weight on y (height) error
    #[serde(default = "defaults::information_weight")]
    pub yy: f32,

    /// Weight on z error
    #[serde(default = "defaults::information_weight")]
    pub zz: f32,

    /// Per-axis standard deviations (meters)
    #[serde(default)]
    pub std_dev: Option<[f32; 3]>,
}

impl Default for InformationSection {
    fn default() -> Self {
        Self {
            xx: defaults::information_weight(),
            yy: defaults::information_weight(),
            zz: defaults::information_weight(),
            std_dev: None,
        }
    }
}

impl InformationSection {
    /// Convert to Information3D
    pub fn to_information(&self) -> Information3D {
        match self.std_dev {
            Some([sx, sy, sz]) => Information3D::from_std_dev(sx, sy, sz),
            None => Information3D::diagonal(self.xx, self.yy, self.zz),
        }
    }

    /// Every weight must be finite and positive so `Ω` stays positive-definite.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        for (name, value) in [("xx", self.xx), ("yy", self.yy), ("zz", self.zz)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigLoadError::Invalid(format!(
                    "information.{name} must be finite and > 0, got {value}"
                )));
            }
        }

        if let Some(std_dev) = self.std_dev
            && std_dev.iter().any(|s| !s.is_finite() || *s <= 0.0)
        {
            return Err(ConfigLoadError::Invalid(format!(
                "information.std_dev entries must be finite and > 0, got {std_dev:?}"
            )));
        }

        Ok(())
    }
}
