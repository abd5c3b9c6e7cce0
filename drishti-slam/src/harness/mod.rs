//! Simulation harness for the binary, integration tests and benchmarks.
//!
//! Provides scripted stand-ins for the motion and sensing collaborators and
//! a runner that drives one full session over them.
//!
//! # Usage
//!
//! ```rust,ignore
//! use drishti_slam::config::DrishtiConfig;
//! use drishti_slam::harness::{Scenario, run_scenario};
//!
//! let run = run_scenario(&DrishtiConfig::default(), Scenario::Square, 40)?;
//! println!("ATE RMSE: {:?}", run.report.ate_rmse());
//! ```

mod sensor;
mod trajectory;

pub use sensor::{ConeSensor, Room};
pub use trajectory::{AGENT_HEIGHT, Scenario, ScriptedTrajectory};

use log::info;

use crate::config::DrishtiConfig;
use crate::core::types::Vector3;
use crate::engine::{SessionReport, SlamSession};
use crate::error::{DrishtiError, Result};

/// Clearance between the trajectory and the room walls (meters).
const ROOM_MARGIN: f32 = 5.0;

/// Room height (meters).
const ROOM_HEIGHT: f32 = 3.0;

/// Outcome of one scripted run.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub scenario: Scenario,
    pub report: SessionReport,
    /// Total points attached to nodes.
    pub points_captured: usize,
}

/// Smallest room enclosing every pose with [`ROOM_MARGIN`] to spare.
pub fn room_around(trajectory: &ScriptedTrajectory) -> Room {
    let mut min = Vector3::new(f32::INFINITY, 0.0, f32::INFINITY);
    let mut max = Vector3::new(f32::NEG_INFINITY, ROOM_HEIGHT, f32::NEG_INFINITY);
    for pose in trajectory.poses() {
        min.x = min.x.min(pose.position.x);
        min.z = min.z.min(pose.position.z);
        max.x = max.x.max(pose.position.x);
        max.z = max.z.max(pose.position.z);
    }
    if trajectory.is_empty() {
        return Room::square(ROOM_MARGIN, ROOM_HEIGHT);
    }
    Room::new(
        Vector3::new(min.x - ROOM_MARGIN, 0.0, min.z - ROOM_MARGIN),
        Vector3::new(max.x + ROOM_MARGIN, ROOM_HEIGHT, max.z + ROOM_MARGIN),
    )
}

/// Drive one session over a scripted scenario with `nodes` sensing events.
pub fn run_scenario(config: &DrishtiConfig, scenario: Scenario, nodes: usize) -> Result<ScenarioRun> {
    let mut trajectory = ScriptedTrajectory::for_scenario(scenario, nodes);
    let sensor_seed = config.noise.seed.map(|seed| seed.wrapping_add(1));
    let mut sensor = ConeSensor::new(room_around(&trajectory), config.sensor.clone(), sensor_seed);
    let mut session = SlamSession::from_config(config);

    info!("Running scenario '{}' with {} nodes", scenario, trajectory.len());
    session.start();
    while let Some(pose) = trajectory.current() {
        sensor.set_pose(pose);
        session.record(&trajectory, &mut sensor)?;
        trajectory.advance();
    }

    let points_captured = session.nodes().iter().map(|n| n.point_cloud.len()).sum();
    let report = session.stop()?.ok_or(DrishtiError::NotRunning)?;

    Ok(ScenarioRun {
        scenario,
        report,
        points_captured,
    })
}
