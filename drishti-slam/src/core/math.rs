//! Mathematical primitives for 3x3 block arithmetic.
//!
//! Matrices are stored row-major as `[[f64; 3]; 3]`, the block size of one
//! node's position state.

/// A 3x3 row-major block.
pub type Mat3 = [[f64; 3]; 3];

/// Zero 3x3 block.
#[inline]
pub fn mat3_zero() -> Mat3 {
    [[0.0; 3]; 3]
}

/// Scaled 3x3 identity.
#[inline]
pub fn mat3_scaled_identity(scale: f64) -> Mat3 {
    let mut out = mat3_zero();
    for (i, row) in out.iter_mut().enumerate() {
        row[i] = scale;
    }
    out
}

/// Multiply two 3x3 matrices: A * B.
pub fn mat3_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut c = mat3_zero();
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                c[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    c
}

/// Multiply transpose of first matrix with second: A^T * B.
pub fn mat3_transpose_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut c = mat3_zero();
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                c[i][j] += a[k][i] * b[k][j];
            }
        }
    }
    c
}

/// Multiply a 3x3 matrix with a vector: A * v.
#[inline]
pub fn mat3_mul_vec(a: &Mat3, v: &[f64; 3]) -> [f64; 3] {
    [
        a[0][0] * v[0] + a[0][1] * v[1] + a[0][2] * v[2],
        a[1][0] * v[0] + a[1][1] * v[1] + a[1][2] * v[2],
        a[2][0] * v[0] + a[2][1] * v[1] + a[2][2] * v[2],
    ]
}

/// Multiply the transpose of a 3x3 matrix with a vector: A^T * v.
#[inline]
pub fn mat3_transpose_mul_vec(a: &Mat3, v: &[f64; 3]) -> [f64; 3] {
    [
        a[0][0] * v[0] + a[1][0] * v[1] + a[2][0] * v[2],
        a[0][1] * v[0] + a[1][1] * v[1] + a[2][1] * v[2],
        a[0][2] * v[0] + a[1][2] * v[1] + a[2][2] * v[2],
    ]
}

/// Dot product of two 3-vectors.
#[inline]
pub fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}
