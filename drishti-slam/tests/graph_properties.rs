//! Pose Graph Property Tests
//!
//! Behavioral properties of the pose graph and its optimizer, exercised
//! through the public API only:
//! - Odometry chain bookkeeping (constraint count, measurements, ordering)
//! - Clear/reset semantics and empty-case evaluation
//! - Seeding, anchoring and exact recovery of consistent chains
//! - Containment of singular systems
//! - Sparse solve on chains with thousands of nodes
//!
//! Run with: `cargo test --test graph_properties`

use approx::assert_relative_eq;
use drishti_slam::engine::graph::SolveMethod;
use drishti_slam::{
    GraphError, GraphOptimizer, GraphOptimizerConfig, Information3D, OptimizerState, Pose,
    PoseGraph, PoseNode, TerminationReason, Vector3,
};

// ============================================================================
// Fixtures
// ============================================================================

fn pose_at(x: f32, y: f32, z: f32) -> Pose {
    Pose::from_position(Vector3::new(x, y, z))
}

/// Chain of nodes at the given positions, indices 0..n.
fn chain(positions: &[(f32, f32, f32)]) -> PoseGraph {
    chain_with(PoseGraph::new(), positions)
}

fn chain_with(mut graph: PoseGraph, positions: &[(f32, f32, f32)]) -> PoseGraph {
    for (index, &(x, y, z)) in positions.iter().enumerate() {
        graph
            .add_node(PoseNode::new(index, pose_at(x, y, z)))
            .unwrap();
    }
    graph
}

fn wandering_positions(n: usize) -> Vec<(f32, f32, f32)> {
    (0..n)
        .map(|k| {
            let t = k as f32;
            (3.0 * t.sin() + t, 1.0 + 0.25 * (k % 3) as f32, 2.0 * t.cos() - 0.5 * t)
        })
        .collect()
}

// ============================================================================
// Ingestion
// ============================================================================

#[test]
fn test_constraint_count_is_nodes_minus_one() {
    for n in 2..12 {
        let graph = chain(&wandering_positions(n));

        assert_eq!(graph.num_nodes(), n);
        assert_eq!(graph.num_constraints(), n - 1);
    }
}

#[test]
fn test_measurements_match_consecutive_differences() {
    let mut graph = PoseGraph::new();
    let poses = [
        Pose::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 10.0, 0.0)),
        Pose::new(Vector3::new(2.0, 1.5, -1.0), Vector3::new(0.0, 350.0, 0.0)),
        Pose::new(Vector3::new(2.5, 0.5, 4.0), Vector3::new(5.0, 20.0, 0.0)),
    ];
    for (index, pose) in poses.iter().enumerate() {
        graph.add_node(PoseNode::new(index, *pose)).unwrap();
    }

    for (k, constraint) in graph.constraints().iter().enumerate() {
        assert_eq!(constraint.from, k);
        assert_eq!(constraint.to, k + 1);
        assert_eq!(
            constraint.measurement.position,
            poses[k + 1].position - poses[k].position
        );
        // Rotation differences are recorded raw, never wrapped
        assert_eq!(
            constraint.measurement.rotation,
            poses[k + 1].rotation - poses[k].rotation
        );
    }
    assert_eq!(graph.constraints()[0].measurement.rotation.y, 340.0);
}

#[test]
fn test_constraints_record_information_in_force() {
    let mut graph = PoseGraph::with_information(Information3D::diagonal(4.0, 1.0, 4.0));
    graph.add_node(PoseNode::new(0, pose_at(0.0, 0.0, 0.0))).unwrap();
    graph.add_node(PoseNode::new(1, pose_at(1.0, 0.0, 0.0))).unwrap();
    graph.set_information(Information3D::identity());
    graph.add_node(PoseNode::new(2, pose_at(2.0, 0.0, 0.0))).unwrap();

    assert_eq!(
        graph.constraints()[0].information,
        Information3D::diagonal(4.0, 1.0, 4.0)
    );
    assert_eq!(graph.constraints()[1].information, Information3D::identity());
}

#[test]
fn test_non_increasing_index_rejected() {
    let mut graph = PoseGraph::new();
    graph.add_node(PoseNode::new(3, pose_at(0.0, 0.0, 0.0))).unwrap();

    let err = graph
        .add_node(PoseNode::new(3, pose_at(1.0, 0.0, 0.0)))
        .unwrap_err();
    assert_eq!(err, GraphError::NonMonotonicIndex { index: 3, last: 3 });

    let err = graph
        .add_node(PoseNode::new(1, pose_at(1.0, 0.0, 0.0)))
        .unwrap_err();
    assert_eq!(err, GraphError::NonMonotonicIndex { index: 1, last: 3 });

    assert_eq!(graph.num_nodes(), 1);
    assert_eq!(graph.num_constraints(), 0);
}

#[test]
fn test_difference_round_trip() {
    let a = Pose::new(Vector3::new(1.25, -0.5, 7.0), Vector3::new(0.0, 45.0, 0.0));
    let b = Pose::new(Vector3::new(-3.5, 2.0, 0.125), Vector3::new(0.0, -30.0, 0.0));

    let d = Pose::difference(&a, &b);
    let rebuilt = a.position + d.position;

    assert_relative_eq!(rebuilt.x, b.position.x, epsilon = 1e-6);
    assert_relative_eq!(rebuilt.y, b.position.y, epsilon = 1e-6);
    assert_relative_eq!(rebuilt.z, b.position.z, epsilon = 1e-6);
}

// ============================================================================
// Clear and evaluation
// ============================================================================

#[test]
fn test_clear_matches_fresh_graph() {
    let mut graph = chain(&wandering_positions(5));
    graph.clear();
    graph.clear();

    let fresh = PoseGraph::new();
    assert_eq!(graph.nodes(), fresh.nodes());
    assert_eq!(graph.num_constraints(), 0);
    assert_eq!(graph.absolute_trajectory_error_rmse(), None);
    assert!(graph.accuracy_metrics().is_empty());

    // Indices may restart from zero
    graph.add_node(PoseNode::new(0, pose_at(0.0, 0.0, 0.0))).unwrap();
    assert_eq!(graph.num_nodes(), 1);
}

#[test]
fn test_rmse_over_two_nodes() {
    let mut graph = PoseGraph::new();
    let origin = pose_at(0.0, 0.0, 0.0);
    graph
        .add_node(PoseNode::new(0, origin).with_ground_truth(origin))
        .unwrap();
    graph
        .add_node(PoseNode::new(1, pose_at(3.0, 0.0, 4.0)).with_ground_truth(origin))
        .unwrap();

    let rmse = graph.absolute_trajectory_error_rmse().unwrap();
    assert_relative_eq!(rmse, (25.0f32 / 2.0).sqrt(), epsilon = 1e-5);
    assert_relative_eq!(rmse, 3.5355, epsilon = 1e-4);
}

#[test]
fn test_rmse_ignores_nodes_without_ground_truth() {
    let mut graph = PoseGraph::new();
    graph.add_node(PoseNode::new(0, pose_at(9.0, 9.0, 9.0))).unwrap();
    graph
        .add_node(PoseNode::new(1, pose_at(1.0, 0.0, 0.0)).with_ground_truth(pose_at(0.0, 0.0, 0.0)))
        .unwrap();

    assert_relative_eq!(graph.absolute_trajectory_error_rmse().unwrap(), 1.0);
}

// ============================================================================
// Optimization
// ============================================================================

#[test]
fn test_single_node_optimize_is_noop() {
    let mut graph = chain(&[(4.0, 1.0, -2.0)]);
    let mut optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());

    let result = optimizer.optimize(&mut graph).unwrap();

    assert_eq!(result.termination_reason, TerminationReason::NoConstraints);
    assert_eq!(result.iterations, 0);
    assert_eq!(graph.nodes()[0].position(), Vector3::new(4.0, 1.0, -2.0));
    assert_eq!(optimizer.state(), OptimizerState::Converged);
}

#[test]
fn test_empty_graph_optimize_is_noop() {
    let mut graph = PoseGraph::new();
    let mut optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());

    let result = optimizer.optimize(&mut graph).unwrap();

    assert_eq!(result.termination_reason, TerminationReason::NoConstraints);
    assert!(graph.is_empty());
}

#[test]
fn test_seeding_places_nodes_on_diagonal() {
    // Zero-displacement constraints between coincident nodes
    let mut graph = chain(&[(5.0, 2.0, 7.0), (5.0, 2.0, 7.0), (5.0, 2.0, 7.0)]);
    assert!(
        graph
            .constraints()
            .iter()
            .all(|c| c.measurement.position == Vector3::zero())
    );

    GraphOptimizer::new(GraphOptimizerConfig::default()).seed(&mut graph);

    let positions: Vec<Vector3> = graph.nodes().iter().map(PoseNode::position).collect();
    assert_eq!(
        positions,
        vec![
            Vector3::new(0.0, 2.0, 0.0),
            Vector3::new(1.0, 2.0, 1.0),
            Vector3::new(2.0, 2.0, 2.0),
        ]
    );
}

#[test]
fn test_consistent_chain_recovered_exactly() {
    let positions = wandering_positions(8);
    let mut graph = chain(&positions);
    let measurements: Vec<Vector3> = graph
        .constraints()
        .iter()
        .map(|c| c.measurement.position)
        .collect();
    let mut optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());

    let result = optimizer.optimize(&mut graph).unwrap();

    assert_eq!(result.termination_reason, TerminationReason::IterationBudget);
    assert_eq!(result.skipped_components, 0);
    assert!(result.final_error < result.initial_error);
    assert!(result.final_error < 1e-6, "chi2 = {}", result.final_error);

    // Node 0 stays where seeding put it
    let first = graph.nodes()[0].position();
    assert_relative_eq!(first.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(first.z, 0.0, epsilon = 1e-6);

    for (k, measured) in measurements.iter().enumerate() {
        let nodes = graph.nodes();
        let displacement = nodes[k + 1].position() - nodes[k].position();
        assert_relative_eq!(displacement.x, measured.x, epsilon = 1e-3);
        assert_relative_eq!(displacement.y, measured.y, epsilon = 1e-3);
        assert_relative_eq!(displacement.z, measured.z, epsilon = 1e-3);
    }
}

#[test]
fn test_long_chain_solved_on_sparse_blocks() {
    let n = 3000;
    let positions: Vec<(f32, f32, f32)> = (0..n)
        .map(|k| {
            let t = k as f32 * 0.1;
            (t.sin() + 0.5 * t, 1.0 + 0.25 * (k % 3) as f32, t.cos() - 0.25 * t)
        })
        .collect();
    let mut graph = chain(&positions);
    let mut optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());

    let result = optimizer.optimize(&mut graph).unwrap();

    assert_eq!(result.solve_method, Some(SolveMethod::Cholesky));
    assert_eq!(result.skipped_components, 0);
    let nodes = graph.nodes();
    for k in (0..n - 1).step_by(97) {
        let (x0, y0, z0) = positions[k];
        let (x1, y1, z1) = positions[k + 1];
        let displacement = nodes[k + 1].position() - nodes[k].position();
        assert_relative_eq!(displacement.x, x1 - x0, epsilon = 1e-2);
        assert_relative_eq!(displacement.y, y1 - y0, epsilon = 1e-2);
        assert_relative_eq!(displacement.z, z1 - z0, epsilon = 1e-2);
    }
}

#[test]
fn test_optimized_shape_matches_ground_truth_up_to_translation() {
    let positions = wandering_positions(6);
    let mut graph = chain(&positions);
    GraphOptimizer::new(GraphOptimizerConfig::default())
        .optimize(&mut graph)
        .unwrap();

    // The whole trajectory is shifted so node 0 lands at the seed
    let (x0, _, z0) = positions[0];
    for (node, &(x, y, z)) in graph.nodes().iter().zip(&positions) {
        let p = node.position();
        assert_relative_eq!(p.x, x - x0, epsilon = 1e-3);
        assert_relative_eq!(p.y, y, epsilon = 1e-3);
        assert_relative_eq!(p.z, z - z0, epsilon = 1e-3);
    }
}

#[test]
fn test_singular_system_never_yields_nan() {
    // Duplicate zero-information edges and no anchor: H is all zeros
    let zero = Information3D::diagonal(0.0, 0.0, 0.0);
    let mut graph = chain_with(
        PoseGraph::with_information(zero),
        &[(0.0, 0.0, 0.0), (1.0, 0.0, 1.0), (2.0, 1.0, 0.0)],
    );
    let config = GraphOptimizerConfig {
        anchor_first_node: false,
        max_iterations: 3,
        ..Default::default()
    };
    let mut optimizer = GraphOptimizer::new(config);

    let result = optimizer.optimize(&mut graph).unwrap();

    assert!(result.skipped_components > 0);
    for node in graph.nodes() {
        assert!(node.position().is_finite(), "{}", node);
    }
}

#[test]
fn test_unanchored_chain_stays_finite() {
    let mut graph = chain(&wandering_positions(5));
    let config = GraphOptimizerConfig {
        anchor_first_node: false,
        ..Default::default()
    };

    GraphOptimizer::new(config).optimize(&mut graph).unwrap();

    for node in graph.nodes() {
        assert!(node.position().is_finite(), "{}", node);
    }
}

#[test]
fn test_optimizer_reset_returns_to_idle() {
    let mut graph = chain(&wandering_positions(3));
    let mut optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());
    assert_eq!(optimizer.state(), OptimizerState::Idle);

    optimizer.optimize(&mut graph).unwrap();
    assert_eq!(optimizer.state(), OptimizerState::Converged);

    optimizer.reset();
    assert_eq!(optimizer.state(), OptimizerState::Idle);
}
