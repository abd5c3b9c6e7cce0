//! Pose graph estimation back-end.
//!
//! Accumulates relative-motion constraints between successive agent poses
//! and re-estimates node positions with a Gauss-Newton pass.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      POSE GRAPH                             │
//! │                                                             │
//! │    Nodes: agent poses at sensing events                     │
//! │                                                             │
//! │    Edges: implicit odometry constraints (sequential only)   │
//! │                                                             │
//! │    [N0] ──odom──▶ [N1] ──odom──▶ [N2] ──odom──▶ [N3]        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     OPTIMIZATION                            │
//! │                                                             │
//! │    Seed:     node k → (k, y_k, k)                           │
//! │    Assemble: H += JᵀΩJ, b += JᵀΩe   (block-sparse 3x3)      │
//! │    Solve:    H · Δx = b  (banded Cholesky, else Gaussian)   │
//! │    Apply:    x += Δx, skipping non-finite components        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`PoseGraph`]: nodes plus the constraint chain between them
//! - [`GraphOptimizer`]: seeding, assembly, solve and update policy
//! - [`BlockCsr3x3`]: sparse storage for the normal-equation matrix
//!
//! # Example
//!
//! ```ignore
//! use drishti_slam::engine::graph::{GraphOptimizer, GraphOptimizerConfig, PoseGraph, PoseNode};
//!
//! let mut graph = PoseGraph::new();
//! graph.add_node(PoseNode::new(0, pose0))?;
//! graph.add_node(PoseNode::new(1, pose1))?;
//!
//! let mut optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());
//! let result = optimizer.optimize(&mut graph)?;
//! ```

use thiserror::Error;

mod linearization;
mod optimizer;
mod pose_graph;
mod solver;
mod sparse;

pub use linearization::{EdgeJacobians, compute_edge_error, compute_jacobians, edge_chi_squared};
pub use optimizer::{
    DEFAULT_ANCHOR_WEIGHT, GraphOptimizer, GraphOptimizerConfig, LinearSystem, OptimizationResult,
    OptimizerState, TerminationReason,
};
pub use pose_graph::{Information3D, PoseConstraint, PoseGraph, PoseNode};
pub use solver::{DenseMatrix, LinearSolution, SolveMethod, solve_linear_system};
pub use sparse::BlockCsr3x3;

/// Number of state dimensions per node (x, y, z position).
pub const POSE_DIM: usize = 3;

/// Pivot magnitude below which a factorization step is treated as singular.
const NEAR_ZERO: f64 = 1e-12;

/// Errors raised by pose graph bookkeeping and assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Node indices must strictly increase in insertion order.
    #[error("node index {index} does not follow last index {last}")]
    NonMonotonicIndex {
        /// Rejected index
        index: usize,
        /// Index of the current last node
        last: usize,
    },

    /// Block coordinates outside the sparse matrix.
    #[error("block index out of bounds: row={row}, col={col}, nrows={nrows}")]
    BlockIndexOutOfBounds {
        /// Block row
        row: usize,
        /// Block column
        col: usize,
        /// Number of block rows
        nrows: usize,
    },

    /// Vector length does not match the matrix dimension.
    #[error("vector length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Expected scalar length
        expected: usize,
        /// Actual scalar length
        actual: usize,
    },
}

/// Result alias for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
