//! Solvers for the normal equations `H · Δx = b`.
//!
//! Cholesky runs directly on the block-sparse `H`: the stored blocks are
//! copied into a lower band whose width follows the block bandwidth, so a
//! sequential chain factors in time linear in the node count. A matrix
//! that is not positive-definite falls through to dense Gaussian
//! elimination with partial pivoting, which leaves unknowns of singular
//! columns as `NaN` instead of failing the whole solve.

use super::sparse::BlockCsr3x3;
use super::{GraphError, NEAR_ZERO, POSE_DIM, Result};

/// Row-major square matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Zero matrix of size `dim x dim`.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; dim * dim],
        }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.dim + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.dim + col] = value;
    }
}

/// Which factorization produced the update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveMethod {
    /// `H` was positive-definite; banded Cholesky on the sparse blocks.
    Cholesky,
    /// Dense fallback for indefinite or singular `H`.
    GaussianElimination,
}

/// Solution vector plus the method that produced it.
#[derive(Debug, Clone)]
pub struct LinearSolution {
    /// Update `Δx`; may contain non-finite entries after a fallback solve.
    pub delta: Vec<f64>,
    /// Factorization used.
    pub method: SolveMethod,
    /// `‖H · Δx − b‖`, `NaN` when `Δx` has non-finite entries.
    pub residual_norm: f64,
}

/// Solve `H · Δx = b`, banded Cholesky first, Gaussian elimination otherwise.
pub fn solve_linear_system(h: &BlockCsr3x3, b: &[f64]) -> Result<LinearSolution> {
    let dim = h.nrows() * POSE_DIM;
    if b.len() != dim {
        return Err(GraphError::LengthMismatch {
            expected: dim,
            actual: b.len(),
        });
    }

    let (delta, method) = match solve_banded_cholesky(h, b) {
        Some(delta) => (delta, SolveMethod::Cholesky),
        None => {
            log::debug!("H not positive-definite, falling back to Gaussian elimination");
            (solve_gaussian(&h.to_dense(), b), SolveMethod::GaussianElimination)
        }
    };

    let residual_norm = residual_norm(h, &delta, b)?;
    Ok(LinearSolution {
        delta,
        method,
        residual_norm,
    })
}

/// Lower band of a symmetric matrix: entries `(i, j)` with `i - half <= j <= i`.
struct LowerBand {
    dim: usize,
    half: usize,
    data: Vec<f64>,
}

impl LowerBand {
    fn zeros(dim: usize, half: usize) -> Self {
        Self {
            dim,
            half,
            data: vec![0.0; dim * (half + 1)],
        }
    }

    fn from_blocks(h: &BlockCsr3x3) -> Self {
        let half = POSE_DIM * (h.block_bandwidth() + 1) - 1;
        let mut band = Self::zeros(h.nrows() * POSE_DIM, half);
        for (row, col, block) in h.lower_blocks() {
            for (r, block_row) in block.iter().enumerate() {
                for (c, value) in block_row.iter().enumerate() {
                    let (i, j) = (row * POSE_DIM + r, col * POSE_DIM + c);
                    if j <= i {
                        band.set(i, j, *value);
                    }
                }
            }
        }
        band
    }

    /// First column stored in row `i`.
    #[inline]
    fn first_col(&self, i: usize) -> usize {
        i.saturating_sub(self.half)
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        i * (self.half + 1) + (j + self.half - i)
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> f64 {
        self.data[self.offset(i, j)]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f64) {
        let offset = self.offset(i, j);
        self.data[offset] = value;
    }
}

/// Cholesky decomposition `H = L Lᵀ` within the band of `H`, then two
/// banded triangular solves.
///
/// Returns `None` when `H` is not (numerically) positive-definite.
pub fn solve_banded_cholesky(h: &BlockCsr3x3, b: &[f64]) -> Option<Vec<f64>> {
    let a = LowerBand::from_blocks(h);
    let dim = a.dim;
    let mut l = LowerBand::zeros(dim, a.half);

    for i in 0..dim {
        let start = a.first_col(i);
        for j in start..=i {
            let mut sum = a.get(i, j);
            for k in start..j {
                sum -= l.get(i, k) * l.get(j, k);
            }

            if i == j {
                if sum.is_nan() || sum <= NEAR_ZERO {
                    return None;
                }
                l.set(i, j, sum.sqrt());
            } else {
                l.set(i, j, sum / l.get(j, j));
            }
        }
    }

    // Forward substitution: L * y = b
    let mut y = vec![0.0; dim];
    for i in 0..dim {
        let mut sum = b[i];
        for k in l.first_col(i)..i {
            sum -= l.get(i, k) * y[k];
        }
        y[i] = sum / l.get(i, i);
    }

    // Backward substitution: Lᵀ * x = y
    let mut x = vec![0.0; dim];
    for i in (0..dim).rev() {
        let mut sum = y[i];
        for k in (i + 1)..(i + l.half + 1).min(dim) {
            sum -= l.get(k, i) * x[k];
        }
        x[i] = sum / l.get(i, i);
    }

    Some(x)
}

/// Gaussian elimination with partial pivoting.
///
/// A column without a usable pivot leaves its unknown `NaN`. Back
/// substitution skips exactly-zero coefficients so unrelated unknowns
/// stay finite.
pub fn solve_gaussian(h: &DenseMatrix, b: &[f64]) -> Vec<f64> {
    let dim = h.dim();
    let mut a = h.data.clone();
    let mut rhs = b.to_vec();
    let mut singular = vec![false; dim];

    for col in 0..dim {
        let Some(pivot) = (col..dim)
            .filter(|&row| a[row * dim + col].abs() > NEAR_ZERO)
            .max_by(|&r1, &r2| a[r1 * dim + col].abs().total_cmp(&a[r2 * dim + col].abs()))
        else {
            singular[col] = true;
            continue;
        };

        if pivot != col {
            for c in 0..dim {
                a.swap(pivot * dim + c, col * dim + c);
            }
            rhs.swap(pivot, col);
        }

        let diag = a[col * dim + col];
        for row in (col + 1)..dim {
            let factor = a[row * dim + col] / diag;
            if factor == 0.0 {
                continue;
            }
            for c in col..dim {
                a[row * dim + c] -= factor * a[col * dim + c];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = vec![f64::NAN; dim];
    for i in (0..dim).rev() {
        if singular[i] {
            continue;
        }
        let mut sum = rhs[i];
        for j in (i + 1)..dim {
            let coefficient = a[i * dim + j];
            if coefficient != 0.0 {
                sum -= coefficient * x[j];
            }
        }
        x[i] = sum / a[i * dim + i];
    }

    x
}

fn residual_norm(h: &BlockCsr3x3, x: &[f64], b: &[f64]) -> Result<f64> {
    if x.iter().any(|v| !v.is_finite()) {
        return Ok(f64::NAN);
    }
    let mut hx = vec![0.0; b.len()];
    h.spmv(x, &mut hx)?;
    Ok(hx
        .iter()
        .zip(b)
        .map(|(hi, bi)| (bi - hi).powi(2))
        .sum::<f64>()
        .sqrt())
}
