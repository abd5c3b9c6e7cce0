//! Synthetic cone ray-cast sensor.
//!
//! Stand-in for the 3D scene: an axis-aligned box room whose floor,
//! ceiling and four walls each have their own color. A sensing event casts
//! rays uniformly inside a cone around the agent's facing direction and
//! returns the hit points.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SensorSection;
use crate::core::types::{Color, Point, Pose, Vector3};
use crate::sensors::SensorSource;

/// Box-shaped environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Room {
    pub min: Vector3,
    pub max: Vector3,
}

impl Room {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Room with floor at y = 0 enclosing `(x, z)` in `[-half, half]`.
    pub fn square(half: f32, height: f32) -> Self {
        Self::new(
            Vector3::new(-half, 0.0, -half),
            Vector3::new(half, height, half),
        )
    }

    pub fn contains(&self, p: &Vector3) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }

    /// Distance to the face an interior ray exits through, plus its color.
    pub fn cast(&self, origin: &Vector3, direction: &Vector3) -> Option<(f32, Color)> {
        let o = [origin.x, origin.y, origin.z];
        let d = [direction.x, direction.y, direction.z];
        let lo = [self.min.x, self.min.y, self.min.z];
        let hi = [self.max.x, self.max.y, self.max.z];

        let mut best: Option<(f32, Color)> = None;
        for axis in 0..3 {
            if d[axis] == 0.0 {
                continue;
            }
            let positive = d[axis] > 0.0;
            let bound = if positive { hi[axis] } else { lo[axis] };
            let t = (bound - o[axis]) / d[axis];
            if t >= 0.0 && best.is_none_or(|(t_best, _)| t < t_best) {
                best = Some((t, face_color(axis, positive)));
            }
        }
        best
    }
}

fn face_color(axis: usize, positive: bool) -> Color {
    match (axis, positive) {
        (0, false) => Color::rgb(0.8, 0.2, 0.2),
        (0, true) => Color::rgb(0.2, 0.8, 0.2),
        (1, false) => Color::rgb(0.5, 0.5, 0.5),
        (1, true) => Color::WHITE,
        (_, false) => Color::rgb(0.2, 0.2, 0.8),
        (_, true) => Color::rgb(0.8, 0.8, 0.2),
    }
}

/// Cone sensor looking out from the agent's current pose.
#[derive(Debug)]
pub struct ConeSensor {
    room: Room,
    config: SensorSection,
    rng: StdRng,
    pose: Pose,
}

impl ConeSensor {
    pub fn new(room: Room, config: SensorSection, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            room,
            config,
            rng,
            pose: Pose::identity(),
        }
    }

    /// Place the sensor at the agent's pose before scanning.
    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    /// Random direction inside the cone around the facing direction.
    fn sample_direction(&mut self) -> Vector3 {
        let max_theta = self.config.cone_angle_deg.to_radians();
        let theta = if max_theta > 0.0 {
            self.rng.random_range(0.0..max_theta)
        } else {
            0.0
        };
        let phi = self.rng.random_range(0.0..TAU);

        // Cone around +z, then yawed to the facing direction
        let local = Vector3::new(
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos(),
        );
        let yaw = self.pose.rotation.y.to_radians();
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        Vector3::new(
            local.x * cos_yaw + local.z * sin_yaw,
            local.y,
            -local.x * sin_yaw + local.z * cos_yaw,
        )
    }
}

impl SensorSource for ConeSensor {
    fn scan(&mut self) -> Vec<Point> {
        let origin = self.pose.position;
        if !self.room.contains(&origin) {
            return Vec::new();
        }

        let mut points = Vec::with_capacity(self.config.num_rays);
        for _ in 0..self.config.num_rays {
            let direction = self.sample_direction();
            if let Some((t, color)) = self.room.cast(&origin, &direction)
                && t <= self.config.range
            {
                points.push(Point::new(origin + direction * t, color));
            }
        }
        points
    }
}
