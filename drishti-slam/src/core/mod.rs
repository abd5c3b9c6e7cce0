//! Core foundation layer.
//!
//! This is the bottom layer of the SLAM stack with no internal dependencies.
//! All other layers depend on core.
//!
//! # Contents
//!
//! - [`types`]: Core data types (vectors, poses, colored points)
//! - [`math`]: Small fixed-size matrix primitives used by the optimizer

pub mod math;
pub mod types;
