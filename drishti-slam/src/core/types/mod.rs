//! Core data types for SLAM operations.
//!
//! - [`Vector3`]: 3D vector in meters (or degrees for Euler angles)
//! - [`Pose`]: position plus Euler-angle orientation
//! - [`Point`] / [`Color`]: colored samples produced by the sensing collaborator

mod point;
mod pose;

pub use point::{Color, Point};
pub use pose::{Pose, Vector3};
