//! Colored point samples.
//!
//! Points are opaque payload for the optimizer: they ride along on a
//! [`PoseNode`](crate::engine::graph::PoseNode) for downstream map display.

use serde::{Deserialize, Serialize};

use super::Vector3;

/// RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque color from RGB components.
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque white.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A sensed 3D sample with the color of the surface it hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// World position in meters
    pub position: Vector3,
    /// Surface color
    pub color: Color,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(position: Vector3, color: Color) -> Self {
        Self { position, color }
    }
}
