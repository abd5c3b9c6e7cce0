//! Vector and pose types for 3D SLAM.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 3D vector.
///
/// Used both for positions in meters and for Euler angles in degrees
/// about the x, y and z axes (y is yaw).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component (vertical axis, ground level at 0)
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The zero vector.
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Squared length (avoids sqrt).
    #[inline]
    pub fn length_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared distance to another vector.
    #[inline]
    pub fn distance_squared(&self, other: &Vector3) -> f32 {
        (*other - *self).length_squared()
    }

    /// Distance to another vector.
    #[inline]
    pub fn distance(&self, other: &Vector3) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Whether every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Components widened to f64 for the optimizer.
    #[inline]
    pub fn to_f64(self) -> [f64; 3] {
        [self.x as f64, self.y as f64, self.z as f64]
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    #[inline]
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    #[inline]
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    #[inline]
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    #[inline]
    fn mul(self, rhs: f32) -> Vector3 {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Agent pose in 3D space.
///
/// Position in meters and orientation as Euler angles in degrees.
/// Angles are stored exactly as given: the type never wraps or normalizes
/// them, so callers must not assume wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Position in meters
    pub position: Vector3,
    /// Euler angles in degrees about x, y (yaw) and z
    pub rotation: Vector3,
}

impl Pose {
    /// Create a new pose.
    #[inline]
    pub const fn new(position: Vector3, rotation: Vector3) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` with zero rotation.
    #[inline]
    pub const fn from_position(position: Vector3) -> Self {
        Self::new(position, Vector3::zero())
    }

    /// Identity pose at origin with zero rotation.
    #[inline]
    pub const fn identity() -> Self {
        Self::new(Vector3::zero(), Vector3::zero())
    }

    /// Componentwise difference `b - a` of position and rotation.
    ///
    /// This is the relative-motion measurement recorded between two
    /// consecutive nodes. No frame rotation is applied:
    /// `a.position + difference(a, b).position == b.position`.
    #[inline]
    pub fn difference(a: &Pose, b: &Pose) -> Pose {
        Pose::new(b.position - a.position, b.rotation - a.rotation)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pose(position={}, rotation={})",
            self.position, self.rotation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(0.5, -1.0, 2.0);

        assert_eq!(a + b, Vector3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vector3::new(0.5, 3.0, 1.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_vector_length_and_distance() {
        let v = Vector3::new(3.0, 0.0, 4.0);
        assert_relative_eq!(v.length(), 5.0);
        assert_relative_eq!(v.distance(&Vector3::zero()), 5.0);
        assert_relative_eq!(v.distance_squared(&Vector3::new(3.0, 1.0, 4.0)), 1.0);
    }

    #[test]
    fn test_pose_difference_is_b_minus_a() {
        let a = Pose::new(Vector3::new(1.0, 0.0, 2.0), Vector3::new(0.0, 90.0, 0.0));
        let b = Pose::new(Vector3::new(4.0, 1.0, -1.0), Vector3::new(0.0, 45.0, 10.0));

        let diff = Pose::difference(&a, &b);

        assert_eq!(diff.position, Vector3::new(3.0, 1.0, -3.0));
        assert_eq!(diff.rotation, Vector3::new(0.0, -45.0, 10.0));
    }

    #[test]
    fn test_pose_difference_round_trip() {
        let a = Pose::new(
            Vector3::new(12.37, 0.41, -3.9),
            Vector3::new(1.0, 200.0, -30.0),
        );
        let b = Pose::new(
            Vector3::new(-7.25, 1.83, 15.02),
            Vector3::new(0.0, 370.0, 5.0),
        );

        let diff = Pose::difference(&a, &b);
        let rebuilt = a.position + diff.position;

        assert_relative_eq!(rebuilt.x, b.position.x, epsilon = 1e-5);
        assert_relative_eq!(rebuilt.y, b.position.y, epsilon = 1e-5);
        assert_relative_eq!(rebuilt.z, b.position.z, epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_is_not_wrapped() {
        let a = Pose::new(Vector3::zero(), Vector3::new(0.0, 350.0, 0.0));
        let b = Pose::new(Vector3::zero(), Vector3::new(0.0, 10.0, 0.0));

        // 10 - 350 stays -340; no shortest-path wrapping is applied
        assert_eq!(Pose::difference(&a, &b).rotation.y, -340.0);
    }
}
