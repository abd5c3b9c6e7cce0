//! DrishtiSLAM - Pose-graph SLAM back-end for a simulated mobile agent
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers, plus configuration and a
//! simulation harness:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 bin/  harness/                      │  ← Executables, simulation
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              engine/   evaluation/                  │  ← Orchestration, accuracy
//! │      (session, graph optimization, ATE/RPE)         │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   sensors/                          │  ← Front-end
//! │        (odometry noise, collaborator traits)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                (types, math)                        │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Pipeline
//!
//! Each sensing event reads the agent's ground-truth pose, corrupts it with
//! odometry noise and appends a node (with its point cloud) to the pose
//! graph, chained to the previous node by an odometry constraint. When the
//! run stops, a Gauss-Newton pass over node positions corrects the
//! trajectory and the result is scored against ground truth.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Sensor front-end (depends on core)
// ============================================================================
pub mod sensors;

// ============================================================================
// Layer 3: SLAM engine and evaluation (depends on core, sensors)
// ============================================================================
pub mod engine;
pub mod evaluation;

// ============================================================================
// Cross-cutting: configuration, errors, simulation harness
// ============================================================================
pub mod config;
pub mod error;
pub mod harness;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Core types
pub use core::math;
pub use core::types::{Color, Point, Pose, Vector3};

// Sensors
pub use sensors::{MotionSource, NoiseConfig, OdometryFrontEnd, PoseNoiseModel, SensorSource};

// Engine - Graph
pub use engine::graph::{
    GraphError, GraphOptimizer, GraphOptimizerConfig, Information3D, OptimizationResult,
    OptimizerState, PoseConstraint, PoseGraph, PoseNode, TerminationReason,
};

// Engine - Session
pub use engine::{SessionReport, SessionState, SlamSession};

// Evaluation
pub use evaluation::{AbsoluteTrajectoryError, AccuracyMetrics, RelativePoseError};

// Config and errors
pub use config::DrishtiConfig;
pub use error::{DrishtiError, Result};
