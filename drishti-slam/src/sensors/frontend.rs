//! Odometry front-end.
//!
//! On each sensing event:
//! 1. read the true pose from the motion collaborator
//! 2. perturb it with the noise model
//! 3. capture the observation from the sensor collaborator
//! 4. append the node to the graph (which links it to its predecessor)

use log::debug;

use crate::core::types::{Point, Pose};
use crate::engine::graph::{PoseGraph, PoseNode, Result};

use super::{MotionSource, NoiseConfig, PoseNoiseModel, SensorSource};

/// Builds one pose node per sensing event.
#[derive(Debug)]
pub struct OdometryFrontEnd {
    noise: PoseNoiseModel,
    next_index: usize,
}

impl OdometryFrontEnd {
    pub fn new(noise: NoiseConfig) -> Self {
        Self {
            noise: PoseNoiseModel::new(noise),
            next_index: 0,
        }
    }

    /// Index the next node will receive.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Restart indices and drift for a new run.
    pub fn reset(&mut self) {
        self.next_index = 0;
        self.noise.reset();
    }

    /// Build a node from a ground-truth pose and observation.
    ///
    /// Consumes one index and one noise sample.
    pub fn make_node(&mut self, ground_truth: Pose, point_cloud: Vec<Point>) -> PoseNode {
        let estimated = self.noise.perturb(&ground_truth);
        let node = PoseNode::new(self.next_index, estimated)
            .with_ground_truth(ground_truth)
            .with_point_cloud(point_cloud);
        self.next_index += 1;
        node
    }

    /// Handle one sensing event end to end. Returns the new node's index.
    pub fn on_sensing_event(
        &mut self,
        graph: &mut PoseGraph,
        motion: &dyn MotionSource,
        sensor: &mut dyn SensorSource,
    ) -> Result<usize> {
        let ground_truth = motion.ground_truth_pose();
        let point_cloud = sensor.scan();
        let node = self.make_node(ground_truth, point_cloud);
        let index = node.index;

        debug!(
            "Sensing event {}: truth {}, estimate {}, {} points",
            index,
            ground_truth,
            node.pose,
            node.point_cloud.len()
        );
        graph.add_node(node)?;
        Ok(index)
    }
}
