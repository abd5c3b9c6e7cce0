//! Edge error and Jacobians.
//!
//! The error is position-only and linear in the node positions:
//!
//! ```text
//! e_ij = z_ij.position − h(p_i, p_j),   h = p_j − p_i
//! A = ∂h/∂p_i = −I
//! B = ∂h/∂p_j =  I
//! ```
//!
//! `A` and `B` differentiate the predicted displacement `h`, which is the
//! negated derivative of `e`. With `b = Jᵀ Ω e` the Gauss-Newton step is
//! therefore `H · Δx = b` followed by `x += Δx`.
//!
//! Rotation is carried on [`Pose`] but never enters the error.

use crate::core::math::{Mat3, dot3, mat3_mul_vec, mat3_scaled_identity};
use crate::core::types::Pose;

use super::pose_graph::Information3D;

/// Jacobian blocks of one edge with respect to its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeJacobians {
    /// Derivative with respect to the `from` node.
    pub a: Mat3,
    /// Derivative with respect to the `to` node.
    pub b: Mat3,
}

/// Residual of one constraint at the current estimate.
#[inline]
pub fn compute_edge_error(measurement: &Pose, from: &Pose, to: &Pose) -> [f64; 3] {
    let z = measurement.position.to_f64();
    let pi = from.position.to_f64();
    let pj = to.position.to_f64();
    [
        z[0] - (pj[0] - pi[0]),
        z[1] - (pj[1] - pi[1]),
        z[2] - (pj[2] - pi[2]),
    ]
}

/// Jacobian blocks of the predicted displacement. Constant because the
/// prediction is linear in positions.
#[inline]
pub fn compute_jacobians() -> EdgeJacobians {
    EdgeJacobians {
        a: mat3_scaled_identity(-1.0),
        b: mat3_scaled_identity(1.0),
    }
}

/// Weighted squared residual `eᵀ Ω e`.
#[inline]
pub fn edge_chi_squared(error: &[f64; 3], information: &Information3D) -> f64 {
    let weighted = mat3_mul_vec(&information.to_matrix(), error);
    dot3(error, &weighted)
}
