//! Run controller.
//!
//! Owns the single [`PoseGraph`] of a run together with the front-end that
//! feeds it and the optimizer that corrects it. Accumulation (`record`) and
//! optimization (`stop`) never overlap: both take `&mut self`.
//!
//! ```text
//!   Idle ──start──▶ Running ──stop──▶ Stopped
//!                     ▲  │record          │
//!                     │  ▼                │
//!                     └──────start────────┘
//! ```

use log::info;

use crate::config::DrishtiConfig;
use crate::engine::graph::{
    GraphOptimizer, GraphOptimizerConfig, Information3D, OptimizationResult, PoseGraph, PoseNode,
};
use crate::error::Result;
use crate::evaluation::AccuracyMetrics;
use crate::sensors::{MotionSource, NoiseConfig, OdometryFrontEnd, SensorSource};

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Nodes recorded during the run.
    pub num_nodes: usize,
    /// Optimizer outcome.
    pub optimization: OptimizationResult,
    /// Accuracy of the optimized trajectory against ground truth.
    pub accuracy: AccuracyMetrics,
}

impl SessionReport {
    /// ATE RMSE, `None` when no node carried ground truth.
    pub fn ate_rmse(&self) -> Option<f32> {
        (!self.accuracy.is_empty()).then_some(self.accuracy.ate.translation.rmse)
    }
}

/// Single-run SLAM controller.
#[derive(Debug)]
pub struct SlamSession {
    graph: PoseGraph,
    optimizer: GraphOptimizer,
    frontend: OdometryFrontEnd,
    state: SessionState,
}

impl SlamSession {
    pub fn new(
        optimizer: GraphOptimizerConfig,
        information: Information3D,
        noise: NoiseConfig,
    ) -> Self {
        Self {
            graph: PoseGraph::with_information(information),
            optimizer: GraphOptimizer::new(optimizer),
            frontend: OdometryFrontEnd::new(noise),
            state: SessionState::Idle,
        }
    }

    /// Build from a loaded configuration.
    pub fn from_config(config: &DrishtiConfig) -> Self {
        Self::new(
            config.optimizer.clone(),
            config.information.to_information(),
            config.noise.clone(),
        )
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Begin a fresh run, discarding any previous trajectory.
    pub fn start(&mut self) {
        self.graph.clear();
        self.optimizer.reset();
        self.frontend.reset();
        self.state = SessionState::Running;
        info!("Session started");
    }

    /// Ingest one sensing event. Ignored unless running.
    ///
    /// Returns the index of the node created.
    pub fn record(
        &mut self,
        motion: &dyn MotionSource,
        sensor: &mut dyn SensorSource,
    ) -> Result<Option<usize>> {
        if !self.is_running() {
            return Ok(None);
        }
        let index = self
            .frontend
            .on_sensing_event(&mut self.graph, motion, sensor)?;
        Ok(Some(index))
    }

    /// End the run: optimize once and evaluate.
    ///
    /// Returns `None` when no run is in progress.
    pub fn stop(&mut self) -> Result<Option<SessionReport>> {
        if !self.is_running() {
            return Ok(None);
        }
        self.state = SessionState::Stopped;

        let optimization = self.optimizer.optimize(&mut self.graph)?;
        let accuracy = self.graph.accuracy_metrics();
        let report = SessionReport {
            num_nodes: self.graph.num_nodes(),
            optimization,
            accuracy,
        };

        info!(
            "Session stopped: {} nodes, ATE RMSE {}",
            report.num_nodes,
            report
                .ate_rmse()
                .map_or_else(|| "n/a".to_string(), |rmse| format!("{rmse:.4} m"))
        );
        report.accuracy.log_summary();
        Ok(Some(report))
    }

    /// Nodes of the current (or last) run, for display.
    pub fn nodes(&self) -> &[PoseNode] {
        self.graph.nodes()
    }

    pub fn graph(&self) -> &PoseGraph {
        &self.graph
    }
}
