//! Scripted agent trajectories.
//!
//! Stand-in for the interactive motion collaborator: a fixed list of
//! ground-truth poses, one per sensing event. Rotation is Euler degrees
//! with yaw about +y; yaw 0 faces +z.

use std::f32::consts::TAU;
use std::str::FromStr;

use crate::core::types::{Pose, Vector3};
use crate::error::DrishtiError;
use crate::sensors::MotionSource;

/// Eye height of the agent above ground (meters).
pub const AGENT_HEIGHT: f32 = 1.0;

/// Named trajectory shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Straight walk along +x.
    Line,
    /// Closed square, side length scaled to the node count.
    Square,
    /// Full circle.
    Circle,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Line, Scenario::Square, Scenario::Circle];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Line => "line",
            Scenario::Square => "square",
            Scenario::Circle => "circle",
        }
    }
}

impl FromStr for Scenario {
    type Err = DrishtiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DrishtiError::UnknownScenario(s.to_string()))
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Precomputed ground-truth poses walked one event at a time.
#[derive(Debug, Clone)]
pub struct ScriptedTrajectory {
    poses: Vec<Pose>,
    cursor: usize,
}

impl ScriptedTrajectory {
    pub fn from_poses(poses: Vec<Pose>) -> Self {
        Self { poses, cursor: 0 }
    }

    /// `n` poses spaced `step` meters apart along +x.
    pub fn line(n: usize, step: f32) -> Self {
        let poses = (0..n)
            .map(|k| pose_facing(k as f32 * step, 0.0, 90.0))
            .collect();
        Self::from_poses(poses)
    }

    /// `n` poses around a square of the given side, counter-clockwise seen
    /// from above.
    pub fn square(n: usize, side: f32) -> Self {
        let perimeter = 4.0 * side;
        let step = if n > 1 { perimeter / n as f32 } else { 0.0 };
        let poses = (0..n)
            .map(|k| {
                let s = k as f32 * step;
                let edge = ((s / side) as usize).min(3);
                let along = s - edge as f32 * side;
                match edge {
                    0 => pose_facing(along, 0.0, 90.0),
                    1 => pose_facing(side, along, 0.0),
                    2 => pose_facing(side - along, side, 270.0),
                    _ => pose_facing(0.0, side - along, 180.0),
                }
            })
            .collect();
        Self::from_poses(poses)
    }

    /// `n` poses evenly spaced on a circle centered at the origin.
    pub fn circle(n: usize, radius: f32) -> Self {
        let poses = (0..n)
            .map(|k| {
                let angle = TAU * k as f32 / n.max(1) as f32;
                // Tangent heading, degrees, not wrapped
                let yaw = -angle.to_degrees();
                pose_facing(radius * angle.cos(), radius * angle.sin(), yaw)
            })
            .collect();
        Self::from_poses(poses)
    }

    /// Build the named scenario with `n` poses.
    pub fn for_scenario(scenario: Scenario, n: usize) -> Self {
        match scenario {
            Scenario::Line => Self::line(n, 1.0),
            Scenario::Square => Self::square(n, (n as f32 / 4.0).max(1.0)),
            Scenario::Circle => Self::circle(n, (n as f32 / TAU).max(1.0)),
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Pose at the cursor, `None` once the script is exhausted.
    pub fn current(&self) -> Option<Pose> {
        self.poses.get(self.cursor).copied()
    }

    /// Move to the next pose. Returns false when past the end.
    pub fn advance(&mut self) -> bool {
        if self.cursor < self.poses.len() {
            self.cursor += 1;
        }
        self.cursor < self.poses.len()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl MotionSource for ScriptedTrajectory {
    fn ground_truth_pose(&self) -> Pose {
        self.current()
            .or_else(|| self.poses.last().copied())
            .unwrap_or_default()
    }
}

/// Pose at ground coordinates `(x, z)` and agent height, facing `yaw` degrees.
fn pose_facing(x: f32, z: f32, yaw: f32) -> Pose {
    Pose::new(Vector3::new(x, AGENT_HEIGHT, z), Vector3::new(0.0, yaw, 0.0))
}
