//! Absolute and Relative Trajectory Error metrics.
//!
//! Both metrics compare estimated node positions with the ground-truth
//! positions of the same nodes. Inputs are paired by slice position; only
//! the common prefix of the two slices is evaluated.
//!
//! - **ATE**: per-node Euclidean distance, no alignment applied. The RMSE of
//!   these distances is the run's headline accuracy figure.
//! - **RPE**: error of each consecutive displacement, measuring local drift
//!   independently of global offset. A pose graph only contributes pairs
//!   of adjacent nodes that both carry ground truth; a node without it
//!   breaks the chain instead of bridging its neighbours.

use serde::{Deserialize, Serialize};

use crate::core::types::Vector3;

/// Container for all accuracy metrics.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// Absolute Trajectory Error
    pub ate: AbsoluteTrajectoryError,

    /// Relative Pose Error
    pub rpe: RelativePoseError,
}

impl AccuracyMetrics {
    /// Compute all accuracy metrics.
    pub fn compute(estimated: &[Vector3], ground_truth: &[Vector3]) -> Self {
        Self {
            ate: AbsoluteTrajectoryError::compute(estimated, ground_truth),
            rpe: RelativePoseError::compute(estimated, ground_truth),
        }
    }

    /// Whether any node pair was evaluated.
    pub fn is_empty(&self) -> bool {
        self.ate.translation.count == 0
    }

    /// Log all metrics at info level.
    pub fn log_summary(&self) {
        if self.is_empty() {
            log::info!("Accuracy: no nodes with ground truth");
            return;
        }
        log::info!(
            "ATE ({} nodes): {}",
            self.ate.translation.count,
            self.ate.translation.summary()
        );
        log::info!(
            "RPE ({} pairs): {}",
            self.rpe.pairs_evaluated,
            self.rpe.translation.summary()
        );
    }
}

/// Error statistics for trajectory comparison.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryError {
    /// Root mean square error
    pub rmse: f32,

    /// Mean error
    pub mean: f32,

    /// Standard deviation
    pub std: f32,

    /// Minimum error
    pub min: f32,

    /// Maximum error
    pub max: f32,

    /// Median error
    pub median: f32,

    /// Number of samples
    pub count: usize,
}

impl TrajectoryError {
    /// Compute statistics from a list of errors. Empty input yields zeros.
    pub fn from_errors(errors: &[f32]) -> Self {
        if errors.is_empty() {
            return Self::default();
        }

        let count = errors.len();
        let n = count as f32;

        let mean = errors.iter().sum::<f32>() / n;
        let rmse = (errors.iter().map(|e| e * e).sum::<f32>() / n).sqrt();
        let std = (errors.iter().map(|e| (e - mean).powi(2)).sum::<f32>() / n).sqrt();

        let min = errors.iter().copied().fold(f32::INFINITY, f32::min);
        let max = errors.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let mut sorted = errors.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let median = if count.is_multiple_of(2) {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            rmse,
            mean,
            std,
            min,
            max,
            median,
            count,
        }
    }

    /// Format as a single-line summary.
    pub fn summary(&self) -> String {
        format!(
            "rmse: {:.4}, mean: {:.4}, std: {:.4}, min: {:.4}, max: {:.4}",
            self.rmse, self.mean, self.std, self.min, self.max
        )
    }
}

/// Absolute Trajectory Error (ATE).
///
/// Per-node distance between estimated and ground-truth positions, in the
/// frame both are expressed in.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AbsoluteTrajectoryError {
    /// Translational error statistics (meters)
    pub translation: TrajectoryError,
}

impl AbsoluteTrajectoryError {
    pub fn compute(estimated: &[Vector3], ground_truth: &[Vector3]) -> Self {
        let errors: Vec<f32> = estimated
            .iter()
            .zip(ground_truth)
            .map(|(est, gt)| est.distance(gt))
            .collect();

        Self {
            translation: TrajectoryError::from_errors(&errors),
        }
    }
}

/// Relative Pose Error (RPE) over consecutive nodes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RelativePoseError {
    /// Translational error statistics (meters)
    pub translation: TrajectoryError,

    /// Number of pairs evaluated
    pub pairs_evaluated: usize,
}

impl RelativePoseError {
    pub fn compute(estimated: &[Vector3], ground_truth: &[Vector3]) -> Self {
        let n = estimated.len().min(ground_truth.len());
        if n < 2 {
            return Self::default();
        }

        let est_deltas: Vec<Vector3> = estimated[..n].windows(2).map(|w| w[1] - w[0]).collect();
        let gt_deltas: Vec<Vector3> = ground_truth[..n].windows(2).map(|w| w[1] - w[0]).collect();
        Self::from_deltas(&est_deltas, &gt_deltas)
    }

    /// Compare already paired displacements, one entry per evaluated pair.
    pub fn from_deltas(est_deltas: &[Vector3], gt_deltas: &[Vector3]) -> Self {
        let errors: Vec<f32> = est_deltas
            .iter()
            .zip(gt_deltas)
            .map(|(est, gt)| est.distance(gt))
            .collect();
        if errors.is_empty() {
            return Self::default();
        }

        Self {
            pairs_evaluated: errors.len(),
            translation: TrajectoryError::from_errors(&errors),
        }
    }
}
