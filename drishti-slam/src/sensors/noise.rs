//! Simulated pose-estimation error.
//!
//! Each sensing event draws a uniform position error per axis. With drift
//! accumulation on, the horizontal (x, z) error of the previous event is
//! carried into the next one, so the estimate wanders like dead reckoning.
//! The vertical error is never carried over; with the clamp on it is drawn
//! from `[0, m]` so estimates never sink below ground level (y = 0).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::types::{Pose, Vector3};

/// Configuration for [`PoseNoiseModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Maximum per-axis error added per event (meters).
    #[serde(default = "default_magnitude")]
    pub magnitude: f32,

    /// Draw the vertical error from `[0, m]` instead of `[-m, m]`.
    #[serde(default = "default_true")]
    pub clamp_vertical: bool,

    /// Carry the previous horizontal error into the next event.
    #[serde(default = "default_true")]
    pub accumulate_drift: bool,

    /// RNG seed for reproducible runs. `None` seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_magnitude() -> f32 {
    1.0
}

fn default_true() -> bool {
    true
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            magnitude: default_magnitude(),
            clamp_vertical: true,
            accumulate_drift: true,
            seed: None,
        }
    }
}

/// Uniform, optionally drifting, position noise.
#[derive(Debug)]
pub struct PoseNoiseModel {
    config: NoiseConfig,
    rng: StdRng,
    /// Error applied at the previous event.
    previous_error: Vector3,
}

impl PoseNoiseModel {
    pub fn new(config: NoiseConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            config,
            rng,
            previous_error: Vector3::zero(),
        }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Error applied at the most recent event.
    pub fn previous_error(&self) -> Vector3 {
        self.previous_error
    }

    /// Forget accumulated drift. The RNG stream is not rewound.
    pub fn reset(&mut self) {
        self.previous_error = Vector3::zero();
    }

    /// Draw one fresh error sample (no drift).
    pub fn sample(&mut self) -> Vector3 {
        let m = self.config.magnitude;
        if !m.is_finite() || m <= 0.0 {
            return Vector3::zero();
        }
        let y = if self.config.clamp_vertical {
            self.rng.random_range(0.0..=m)
        } else {
            self.rng.random_range(-m..=m)
        };
        Vector3::new(
            self.rng.random_range(-m..=m),
            y,
            self.rng.random_range(-m..=m),
        )
    }

    /// Next position error, including carried-over drift.
    pub fn next_error(&mut self) -> Vector3 {
        let carried = if self.config.accumulate_drift {
            Vector3::new(self.previous_error.x, 0.0, self.previous_error.z)
        } else {
            Vector3::zero()
        };
        let error = carried + self.sample();
        self.previous_error = error;
        error
    }

    /// Perturb a ground-truth pose. Rotation is left exact.
    pub fn perturb(&mut self, ground_truth: &Pose) -> Pose {
        let error = self.next_error();
        Pose::new(ground_truth.position + error, ground_truth.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(magnitude: f32, clamp_vertical: bool, accumulate_drift: bool) -> PoseNoiseModel {
        PoseNoiseModel::new(NoiseConfig {
            magnitude,
            clamp_vertical,
            accumulate_drift,
            seed: Some(42),
        })
    }

    #[test]
    fn test_samples_within_bounds() {
        let mut model = seeded(0.5, true, false);

        for _ in 0..1000 {
            let e = model.sample();
            assert!((-0.5..=0.5).contains(&e.x));
            assert!((0.0..=0.5).contains(&e.y), "height error {} below ground", e.y);
            assert!((-0.5..=0.5).contains(&e.z));
        }
    }

    #[test]
    fn test_unclamped_vertical_goes_negative() {
        let mut model = seeded(1.0, false, false);
        assert!((0..1000).any(|_| model.sample().y < 0.0));
    }

    #[test]
    fn test_zero_magnitude_is_exact() {
        let mut model = seeded(0.0, true, false);
        let truth = Pose::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(0.0, 45.0, 0.0));

        assert_eq!(model.perturb(&truth), truth);
    }

    #[test]
    fn test_non_finite_magnitude_adds_no_error() {
        for magnitude in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let mut model = seeded(magnitude, true, true);
            assert_eq!(model.sample(), Vector3::zero());
            assert_eq!(model.next_error(), Vector3::zero());
        }
    }

    #[test]
    fn test_drift_carries_horizontal_error_only() {
        let mut model = seeded(0.2, true, true);

        let first = model.next_error();
        let second = model.next_error();

        // The fresh component is bounded by the magnitude
        assert!((second.x - first.x).abs() <= 0.2 + 1e-6);
        assert!((second.z - first.z).abs() <= 0.2 + 1e-6);
        assert!((0.0..=0.2).contains(&second.y));
    }

    #[test]
    fn test_drift_accumulates_over_many_events() {
        let mut drifting = seeded(1.0, true, true);
        let mut fresh = seeded(1.0, true, false);

        let mut drift_bound_hit = false;
        for _ in 0..200 {
            let d = drifting.next_error();
            let f = fresh.next_error();
            assert!(f.x.abs() <= 1.0);
            if d.x.abs() > 1.0 || d.z.abs() > 1.0 {
                drift_bound_hit = true;
            }
        }
        assert!(drift_bound_hit);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = seeded(1.0, true, true);
        let mut b = seeded(1.0, true, true);

        for _ in 0..10 {
            assert_eq!(a.next_error(), b.next_error());
        }
    }

    #[test]
    fn test_reset_clears_drift() {
        let mut model = seeded(1.0, true, true);
        model.next_error();
        model.reset();

        assert_eq!(model.previous_error(), Vector3::zero());
    }

    #[test]
    fn test_rotation_untouched() {
        let mut model = seeded(1.0, true, true);
        let truth = Pose::new(Vector3::zero(), Vector3::new(10.0, 370.0, -5.0));

        assert_eq!(model.perturb(&truth).rotation, truth.rotation);
    }
}
