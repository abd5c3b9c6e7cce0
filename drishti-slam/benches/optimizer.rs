//! Pose Graph Optimizer Benchmarks
//!
//! Benchmarks for the CPU-heavy steps of a session stop:
//! - Linear system assembly (block-sparse H and b)
//! - Banded Cholesky solve on the block-sparse H
//! - Full optimization pass (seed, assemble, solve, update)
//!
//! Run with: `cargo bench`
//! View HTML reports in: `target/criterion/`

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use drishti_slam::engine::graph::solve_linear_system;
use drishti_slam::harness::ScriptedTrajectory;
use drishti_slam::{
    GraphOptimizer, GraphOptimizerConfig, NoiseConfig, PoseGraph, PoseNoiseModel, PoseNode,
};

// ============================================================================
// Test Fixtures
// ============================================================================

const CHAIN_SIZES: [usize; 4] = [10, 100, 1000, 5000];

/// Noisy circular trajectory as a pose graph.
fn create_graph(num_nodes: usize) -> PoseGraph {
    let trajectory = ScriptedTrajectory::circle(num_nodes, 10.0);
    let mut noise = PoseNoiseModel::new(NoiseConfig {
        seed: Some(42),
        ..Default::default()
    });

    let mut graph = PoseGraph::new();
    for (index, truth) in trajectory.poses().iter().enumerate() {
        let node = PoseNode::new(index, noise.perturb(truth)).with_ground_truth(*truth);
        // Indices are generated in order
        let _ = graph.add_node(node);
    }
    graph
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");
    let optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());

    for &n in &CHAIN_SIZES {
        let graph = create_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            b.iter(|| optimizer.build_linear_system(black_box(graph)))
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");
    let optimizer = GraphOptimizer::new(GraphOptimizerConfig::default());

    for &n in &CHAIN_SIZES {
        let mut graph = create_graph(n);
        optimizer.seed(&mut graph);
        let Ok(system) = optimizer.build_linear_system(&graph) else {
            continue;
        };
        let input = (system.h, system.b);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, (h, rhs)| {
            b.iter(|| solve_linear_system(black_box(h), black_box(rhs)))
        });
    }
    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    group.measurement_time(Duration::from_secs(5));

    for &n in &CHAIN_SIZES {
        let graph = create_graph(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter_batched(
                || {
                    (
                        graph.clone(),
                        GraphOptimizer::new(GraphOptimizerConfig::default()),
                    )
                },
                |(mut graph, mut optimizer)| optimizer.optimize(black_box(&mut graph)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assembly, bench_solve, bench_optimize);
criterion_main!(benches);
