//! SLAM engine layer.
//!
//! - [`graph`]: pose graph, linearization and Gauss-Newton optimizer
//! - [`session`]: run controller owning one graph per run

pub mod graph;
pub mod session;

pub use session::{SessionReport, SessionState, SlamSession};
