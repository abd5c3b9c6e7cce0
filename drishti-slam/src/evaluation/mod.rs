//! Trajectory accuracy evaluation.
//!
//! Compares the optimized node positions of a run against the ground truth
//! recorded by the front-end at each sensing event.
//!
//! ## Example
//!
//! ```rust,ignore
//! use drishti_slam::evaluation::AccuracyMetrics;
//!
//! let (estimated, ground_truth) = graph.trajectory_pairs();
//! let metrics = AccuracyMetrics::compute(&estimated, &ground_truth);
//! metrics.log_summary();
//! // ATE (40 nodes): rmse: 0.8312, mean: 0.7421, ...
//! ```

mod accuracy;

pub use accuracy::{AbsoluteTrajectoryError, AccuracyMetrics, RelativePoseError, TrajectoryError};
