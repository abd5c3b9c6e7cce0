//! Pose graph data structure.
//!
//! A pose graph represents the agent trajectory where:
//! - Nodes are estimated poses at sensing events
//! - Edges are relative pose constraints between consecutive nodes

use serde::{Deserialize, Serialize};

use crate::core::math::Mat3;
use crate::core::types::{Point, Pose, Vector3};
use crate::evaluation::{AbsoluteTrajectoryError, AccuracyMetrics, RelativePoseError};

use super::{GraphError, Result};

/// Information matrix (inverse covariance) for a 3D position constraint.
///
/// Stored as the upper triangle of a 3x3 symmetric matrix:
/// ```text
/// | xx  xy  xz |
/// | xy  yy  yz |
/// | xz  yz  zz |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Information3D {
    /// Information for x-x
    pub xx: f32,
    /// Information for x-y
    pub xy: f32,
    /// Information for x-z
    pub xz: f32,
    /// Information for y-y
    pub yy: f32,
    /// Information for y-z
    pub yz: f32,
    /// Information for z-z
    pub zz: f32,
}

impl Information3D {
    /// Create a diagonal information matrix.
    pub fn diagonal(xx: f32, yy: f32, zz: f32) -> Self {
        Self {
            xx,
            xy: 0.0,
            xz: 0.0,
            yy,
            yz: 0.0,
            zz,
        }
    }

    /// Identity weighting.
    pub fn identity() -> Self {
        Self::diagonal(1.0, 1.0, 1.0)
    }

    /// Create from standard deviations.
    pub fn from_std_dev(sigma_x: f32, sigma_y: f32, sigma_z: f32) -> Self {
        Self::diagonal(
            1.0 / (sigma_x * sigma_x),
            1.0 / (sigma_y * sigma_y),
            1.0 / (sigma_z * sigma_z),
        )
    }

    /// Expand to a full symmetric matrix.
    pub fn to_matrix(&self) -> Mat3 {
        let (xx, xy, xz) = (self.xx as f64, self.xy as f64, self.xz as f64);
        let (yy, yz, zz) = (self.yy as f64, self.yz as f64, self.zz as f64);
        [[xx, xy, xz], [xy, yy, yz], [xz, yz, zz]]
    }
}

impl Default for Information3D {
    fn default() -> Self {
        Self::identity()
    }
}

/// A node in the pose graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseNode {
    /// Identity key, strictly increasing within a graph.
    pub index: usize,

    /// Current pose estimate. Rewritten in place by the optimizer.
    pub pose: Pose,

    /// Ground-truth pose, when the simulation knows it.
    pub ground_truth: Option<Pose>,

    /// Point cloud captured at this node (empty if none attached).
    pub point_cloud: Vec<Point>,
}

impl PoseNode {
    /// Create a new pose node.
    pub fn new(index: usize, pose: Pose) -> Self {
        Self {
            index,
            pose,
            ground_truth: None,
            point_cloud: Vec::new(),
        }
    }

    /// Set the ground-truth pose.
    pub fn with_ground_truth(mut self, ground_truth: Pose) -> Self {
        self.ground_truth = Some(ground_truth);
        self
    }

    /// Attach a point cloud.
    pub fn with_point_cloud(mut self, point_cloud: Vec<Point>) -> Self {
        self.point_cloud = point_cloud;
        self
    }

    /// Estimated position.
    #[inline]
    pub fn position(&self) -> Vector3 {
        self.pose.position
    }
}

impl std::fmt::Display for PoseNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PoseNode(index={}, pose={})", self.index, self.pose)
    }
}

/// A relative pose constraint between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseConstraint {
    /// Index of the earlier node.
    pub from: usize,

    /// Index of the later node.
    pub to: usize,

    /// Relative pose measurement: `difference(from.pose, to.pose)` at insertion.
    pub measurement: Pose,

    /// Information matrix (inverse covariance).
    pub information: Information3D,
}

/// Pose graph for SLAM optimization.
///
/// Nodes are kept in insertion order, which is also index order; edges
/// reference nodes by index only.
#[derive(Debug, Clone, Default)]
pub struct PoseGraph {
    /// All nodes in the graph.
    nodes: Vec<PoseNode>,

    /// Odometry chain.
    constraints: Vec<PoseConstraint>,

    /// Information recorded on new odometry constraints.
    information: Information3D,
}

impl PoseGraph {
    /// Create a new empty pose graph with identity information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph whose odometry constraints use `information`.
    pub fn with_information(information: Information3D) -> Self {
        Self {
            information,
            ..Self::default()
        }
    }

    /// Append a node and link it to its predecessor.
    ///
    /// When the graph already holds nodes, records the constraint
    /// `(last, node) → difference(last.pose, node.pose)`. The first node
    /// has no predecessor and adds no constraint.
    ///
    /// Fails with [`GraphError::NonMonotonicIndex`] when `node.index` does
    /// not exceed the current last index; the graph is left unchanged.
    pub fn add_node(&mut self, node: PoseNode) -> Result<()> {
        let measurement = match self.nodes.last() {
            Some(last) if node.index <= last.index => {
                return Err(GraphError::NonMonotonicIndex {
                    index: node.index,
                    last: last.index,
                });
            }
            Some(last) => Some((last.index, Pose::difference(&last.pose, &node.pose))),
            None => None,
        };

        log::debug!("Added node: {}", node);
        let to = node.index;
        self.nodes.push(node);

        if let Some((from, measurement)) = measurement {
            log::debug!(
                "Added constraint between nodes {} and {}, with value {}",
                from,
                to,
                measurement
            );
            self.add_constraint(from, to, measurement);
        }
        Ok(())
    }

    fn add_constraint(&mut self, from: usize, to: usize, measurement: Pose) {
        self.constraints.push(PoseConstraint {
            from,
            to,
            measurement,
            information: self.information,
        });
    }

    /// Remove all nodes and constraints. Idempotent.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.constraints.clear();
    }

    /// Get a node by index.
    pub fn get_node(&self, index: usize) -> Option<&PoseNode> {
        self.slot_of(index).map(|slot| &self.nodes[slot])
    }

    /// Position of the node with `index` in insertion order.
    pub fn slot_of(&self, index: usize) -> Option<usize> {
        self.nodes
            .binary_search_by_key(&index, |node| node.index)
            .ok()
    }

    /// Get all nodes in insertion order.
    pub fn nodes(&self) -> &[PoseNode] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [PoseNode] {
        &mut self.nodes
    }

    /// Get all constraints.
    pub fn constraints(&self) -> &[PoseConstraint] {
        &self.constraints
    }

    /// Get number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Get number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether the graph holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the most recently added node.
    pub fn latest_node(&self) -> Option<&PoseNode> {
        self.nodes.last()
    }

    /// Information recorded on new constraints.
    pub fn information(&self) -> Information3D {
        self.information
    }

    /// Change the information used for constraints added from now on.
    pub fn set_information(&mut self, information: Information3D) {
        self.information = information;
    }

    /// Estimated and ground-truth positions of every node carrying ground truth.
    pub fn trajectory_pairs(&self) -> (Vec<Vector3>, Vec<Vector3>) {
        self.nodes
            .iter()
            .filter_map(|node| {
                node.ground_truth
                    .map(|gt| (node.pose.position, gt.position))
            })
            .unzip()
    }

    /// Root mean square of estimated-vs-ground-truth position distances.
    ///
    /// Returns `None` when no node carries a ground-truth pose.
    pub fn absolute_trajectory_error_rmse(&self) -> Option<f32> {
        let (estimated, ground_truth) = self.trajectory_pairs();
        if estimated.is_empty() {
            return None;
        }
        Some(AbsoluteTrajectoryError::compute(&estimated, &ground_truth).translation.rmse)
    }

    /// Full accuracy report over nodes carrying ground truth.
    ///
    /// RPE only pairs index-adjacent nodes that both carry ground truth.
    pub fn accuracy_metrics(&self) -> AccuracyMetrics {
        let (estimated, ground_truth) = self.trajectory_pairs();
        let (est_deltas, gt_deltas): (Vec<Vector3>, Vec<Vector3>) = self
            .nodes
            .windows(2)
            .filter_map(|w| {
                let (prev_gt, gt) = (w[0].ground_truth?, w[1].ground_truth?);
                Some((
                    w[1].pose.position - w[0].pose.position,
                    gt.position - prev_gt.position,
                ))
            })
            .unzip();

        AccuracyMetrics {
            ate: AbsoluteTrajectoryError::compute(&estimated, &ground_truth),
            rpe: RelativePoseError::from_deltas(&est_deltas, &gt_deltas),
        }
    }
}
