//! Sensing layer.
//!
//! Turns sensing events into pose graph nodes.
//!
//! # Contents
//!
//! - [`OdometryFrontEnd`]: builds a [`PoseNode`](crate::engine::graph::PoseNode)
//!   per event and hands it to the graph
//! - [`PoseNoiseModel`]: simulated pose-estimation error
//! - [`MotionSource`] / [`SensorSource`]: collaborators supplying the
//!   agent's true pose and its observation

mod frontend;
mod noise;

pub use frontend::OdometryFrontEnd;
pub use noise::{NoiseConfig, PoseNoiseModel};

use crate::core::types::{Point, Pose};

/// Supplies the agent's ground-truth pose at a sensing event.
pub trait MotionSource {
    fn ground_truth_pose(&self) -> Pose;
}

/// Supplies the observation captured at a sensing event.
pub trait SensorSource {
    /// Sampled points; may be empty.
    fn scan(&mut self) -> Vec<Point>;
}
