//! Graph optimization using Gauss-Newton.
//!
//! Re-estimates node positions to minimize the weighted constraint error:
//!
//! ```text
//! F(x) = Σ e_ijᵀ · Ω_ij · e_ij
//! ```
//!
//! Each pass seeds the nodes along a reference line, then for a fixed
//! iteration budget assembles `H` and `b`, solves `H · Δx = b` and applies
//! `Δx`. There is no damping and no residual-based stopping test: the
//! iteration count is the only termination criterion, and more than one
//! iteration is not guaranteed to improve the estimate.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::core::math::{
    mat3_mul, mat3_mul_vec, mat3_scaled_identity, mat3_transpose_mul, mat3_transpose_mul_vec,
};

use super::linearization::{compute_edge_error, compute_jacobians, edge_chi_squared};
use super::pose_graph::PoseGraph;
use super::solver::{SolveMethod, solve_linear_system};
use super::sparse::BlockCsr3x3;
use super::{POSE_DIM, Result};

/// Default anchor weight added to the first node's diagonal block.
pub const DEFAULT_ANCHOR_WEIGHT: f64 = 1e9;

/// Configuration for graph optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphOptimizerConfig {
    /// Gauss-Newton iterations per call.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Whether to pin the first node (gauge freedom).
    #[serde(default = "default_anchor_first_node")]
    pub anchor_first_node: bool,

    /// Weight added to the first node's diagonal block when anchored.
    #[serde(default = "default_anchor_weight")]
    pub anchor_weight: f64,

    /// Distance between consecutive seeded nodes along x and z (meters).
    #[serde(default = "default_seed_spacing")]
    pub seed_spacing: f32,
}

fn default_max_iterations() -> u32 {
    1 // more iterations diverge without damping
}

fn default_anchor_first_node() -> bool {
    true
}

fn default_anchor_weight() -> f64 {
    DEFAULT_ANCHOR_WEIGHT
}

fn default_seed_spacing() -> f32 {
    1.0
}

impl Default for GraphOptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            anchor_first_node: default_anchor_first_node(),
            anchor_weight: default_anchor_weight(),
            seed_spacing: default_seed_spacing(),
        }
    }
}

/// Lifecycle of one optimizer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptimizerState {
    /// Nothing run since construction or reset.
    #[default]
    Idle,
    /// Placing nodes on the reference line.
    Seeding,
    /// Assemble/solve/apply loop in progress.
    Iterating,
    /// Iteration budget exhausted (or nothing to do).
    Converged,
}

/// Reason for optimization termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Ran the configured number of iterations.
    IterationBudget,

    /// No constraints to optimize.
    NoConstraints,
}

/// Result of graph optimization.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Number of iterations performed.
    pub iterations: u32,

    /// Chi-squared error right after seeding.
    pub initial_error: f64,

    /// Chi-squared error after the last iteration.
    pub final_error: f64,

    /// Update components dropped because they were non-finite.
    pub skipped_components: usize,

    /// Factorization used by the last iteration.
    pub solve_method: Option<SolveMethod>,

    /// Reason for termination.
    pub termination_reason: TerminationReason,
}

impl OptimizationResult {
    fn no_constraints() -> Self {
        Self {
            iterations: 0,
            initial_error: 0.0,
            final_error: 0.0,
            skipped_components: 0,
            solve_method: None,
            termination_reason: TerminationReason::NoConstraints,
        }
    }
}

/// Normal equations of one iteration.
#[derive(Debug, Clone)]
pub struct LinearSystem {
    /// Block-sparse information matrix.
    pub h: BlockCsr3x3,
    /// Coefficient vector, `num_nodes * 3` long.
    pub b: Vec<f64>,
}

/// Gauss-Newton pose graph optimizer.
#[derive(Debug)]
pub struct GraphOptimizer {
    config: GraphOptimizerConfig,
    state: OptimizerState,
}

impl GraphOptimizer {
    /// Create a new graph optimizer.
    pub fn new(config: GraphOptimizerConfig) -> Self {
        Self {
            config,
            state: OptimizerState::Idle,
        }
    }

    pub fn config(&self) -> &GraphOptimizerConfig {
        &self.config
    }

    pub fn state(&self) -> OptimizerState {
        self.state
    }

    /// Return to [`OptimizerState::Idle`].
    pub fn reset(&mut self) {
        self.state = OptimizerState::Idle;
    }

    /// Optimize the pose graph in place.
    ///
    /// A graph without constraints is returned untouched. Otherwise every
    /// node is seeded, then the configured number of iterations is run.
    /// Non-finite update components are dropped per component; the pass
    /// itself never aborts on numerical failure.
    pub fn optimize(&mut self, graph: &mut PoseGraph) -> Result<OptimizationResult> {
        if graph.num_constraints() == 0 {
            debug!("Nothing to optimize: {} node(s), no constraints", graph.num_nodes());
            self.state = OptimizerState::Converged;
            return Ok(OptimizationResult::no_constraints());
        }

        self.state = OptimizerState::Seeding;
        self.seed(graph);
        let initial_error = self.compute_chi_squared(graph);

        self.state = OptimizerState::Iterating;
        let mut skipped_components = 0;
        let mut solve_method = None;

        for iter in 0..self.config.max_iterations {
            let system = self.build_linear_system(graph)?;
            let solution = solve_linear_system(&system.h, &system.b)?;

            let skipped = self.apply_update(graph, &solution.delta);
            skipped_components += skipped;
            solve_method = Some(solution.method);

            debug!(
                "Iteration {}: {:?} solve over {} blocks, |H dx - b| = {:.3e}, {} skipped component(s), chi2 = {:.6}",
                iter + 1,
                solution.method,
                system.h.num_blocks(),
                solution.residual_norm,
                skipped,
                self.compute_chi_squared(graph)
            );
        }

        let final_error = self.compute_chi_squared(graph);
        self.state = OptimizerState::Converged;

        info!(
            "Optimized {} nodes / {} constraints: chi2 {:.4} -> {:.4}",
            graph.num_nodes(),
            graph.num_constraints(),
            initial_error,
            final_error
        );

        Ok(OptimizationResult {
            iterations: self.config.max_iterations,
            initial_error,
            final_error,
            skipped_components,
            solve_method,
            termination_reason: TerminationReason::IterationBudget,
        })
    }

    /// Place node `k` (in sequence order) at `(k·spacing, y_k, k·spacing)`.
    ///
    /// Height is kept; x and z are overwritten.
    pub fn seed(&self, graph: &mut PoseGraph) {
        let spacing = self.config.seed_spacing;
        for (k, node) in graph.nodes_mut().iter_mut().enumerate() {
            let offset = k as f32 * spacing;
            node.pose.position.x = offset;
            node.pose.position.z = offset;
        }
    }

    /// Assemble `H` and `b` from scratch at the current estimate.
    pub fn build_linear_system(&self, graph: &PoseGraph) -> Result<LinearSystem> {
        let num_nodes = graph.num_nodes();
        let mut h = BlockCsr3x3::new(num_nodes);
        let mut b = vec![0.0; num_nodes * POSE_DIM];
        let nodes = graph.nodes();
        let jacobians = compute_jacobians();

        for constraint in graph.constraints() {
            let (Some(i), Some(j)) = (graph.slot_of(constraint.from), graph.slot_of(constraint.to))
            else {
                continue;
            };

            let error = compute_edge_error(&constraint.measurement, &nodes[i].pose, &nodes[j].pose);
            let omega = constraint.information.to_matrix();
            let omega_a = mat3_mul(&omega, &jacobians.a);
            let omega_b = mat3_mul(&omega, &jacobians.b);

            h.add_to(i, i, &mat3_transpose_mul(&jacobians.a, &omega_a))?;
            h.add_to(i, j, &mat3_transpose_mul(&jacobians.a, &omega_b))?;
            h.add_to(j, i, &mat3_transpose_mul(&jacobians.b, &omega_a))?;
            h.add_to(j, j, &mat3_transpose_mul(&jacobians.b, &omega_b))?;

            let omega_e = mat3_mul_vec(&omega, &error);
            let b_i = mat3_transpose_mul_vec(&jacobians.a, &omega_e);
            let b_j = mat3_transpose_mul_vec(&jacobians.b, &omega_e);
            for r in 0..POSE_DIM {
                b[i * POSE_DIM + r] += b_i[r];
                b[j * POSE_DIM + r] += b_j[r];
            }
        }

        if self.config.anchor_first_node && num_nodes > 0 {
            h.add_to(0, 0, &mat3_scaled_identity(self.config.anchor_weight))?;
            b[..POSE_DIM].fill(0.0);
        }

        Ok(LinearSystem { h, b })
    }

    /// Total weighted error `Σ eᵀ Ω e` over all constraints.
    pub fn compute_chi_squared(&self, graph: &PoseGraph) -> f64 {
        let nodes = graph.nodes();
        graph
            .constraints()
            .iter()
            .filter_map(|constraint| {
                let i = graph.slot_of(constraint.from)?;
                let j = graph.slot_of(constraint.to)?;
                let error =
                    compute_edge_error(&constraint.measurement, &nodes[i].pose, &nodes[j].pose);
                Some(edge_chi_squared(&error, &constraint.information))
            })
            .sum()
    }

    /// Add `delta` to every node position. Returns the number of skipped
    /// components.
    fn apply_update(&self, graph: &mut PoseGraph, delta: &[f64]) -> usize {
        let start = usize::from(self.config.anchor_first_node);
        let mut skipped = 0;

        for (slot, node) in graph.nodes_mut().iter_mut().enumerate().skip(start) {
            let base = slot * POSE_DIM;
            let Some(step) = delta.get(base..base + POSE_DIM) else {
                continue;
            };

            let position = &mut node.pose.position;
            for (component, value) in [&mut position.x, &mut position.y, &mut position.z]
                .into_iter()
                .zip(step)
            {
                let updated = *component + *value as f32;
                if value.is_finite() && updated.is_finite() {
                    *component = updated;
                } else {
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("Dropped {} non-finite update component(s)", skipped);
        }
        skipped
    }
}
