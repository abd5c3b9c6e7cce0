//! Block-sparse storage for the normal-equation matrix.
//!
//! Each constraint touches exactly two node blocks, so for a sequential chain
//! `H` is block-tridiagonal: at most three 3x3 blocks per block row.

use crate::core::math::Mat3;

use super::solver::DenseMatrix;
use super::{GraphError, POSE_DIM, Result};

/// Compressed sparse rows of 3x3 blocks, addressed by node slot.
#[derive(Clone, Debug)]
pub struct BlockCsr3x3 {
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<Mat3>,
    nrows: usize,
}

impl BlockCsr3x3 {
    /// Empty `nrows x nrows` block matrix.
    pub fn new(nrows: usize) -> Self {
        Self {
            row_ptr: vec![0; nrows.saturating_add(1)],
            col_idx: Vec::new(),
            values: Vec::new(),
            nrows,
        }
    }

    /// Number of block rows (equals block columns).
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of stored blocks.
    pub fn num_blocks(&self) -> usize {
        self.values.len()
    }

    /// Accumulate `block` into `(row, col)`.
    pub fn add_to(&mut self, row: usize, col: usize, block: &Mat3) -> Result<()> {
        self.validate_index(row, col)?;
        let Some(idx) = self.find_index(row, col) else {
            self.insert_new(row, col, *block);
            return Ok(());
        };
        let stored = &mut self.values[idx];
        for (stored_row, block_row) in stored.iter_mut().zip(block.iter()) {
            for (value, add) in stored_row.iter_mut().zip(block_row.iter()) {
                *value += *add;
            }
        }
        Ok(())
    }

    /// Block at `(row, col)`, if stored.
    pub fn get(&self, row: usize, col: usize) -> Option<Mat3> {
        let idx = self.find_index(row, col)?;
        Some(self.values[idx])
    }

    /// `y = H x` over scalar vectors of length `nrows * 3`.
    pub fn spmv(&self, x: &[f64], y: &mut [f64]) -> Result<()> {
        let expected = self.nrows * POSE_DIM;
        for actual in [x.len(), y.len()] {
            if actual != expected {
                return Err(GraphError::LengthMismatch { expected, actual });
            }
        }
        y.fill(0.0);
        for row in 0..self.nrows {
            let row_base = row * POSE_DIM;
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col_base = self.col_idx[idx] * POSE_DIM;
                let block = &self.values[idx];
                for r in 0..POSE_DIM {
                    let mut sum = 0.0_f64;
                    for c in 0..POSE_DIM {
                        sum += block[r][c] * x[col_base + c];
                    }
                    y[row_base + r] += sum;
                }
            }
        }
        Ok(())
    }

    /// Expand into a dense arena of exactly `nrows * 3` scalars per side.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = DenseMatrix::zeros(self.nrows * POSE_DIM);
        for row in 0..self.nrows {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col = self.col_idx[idx];
                let block = &self.values[idx];
                for (r, block_row) in block.iter().enumerate() {
                    for (c, value) in block_row.iter().enumerate() {
                        dense.set(row * POSE_DIM + r, col * POSE_DIM + c, *value);
                    }
                }
            }
        }
        dense
    }

    /// Largest `|row - col|` over stored blocks. A sequential chain has
    /// bandwidth 1.
    pub fn block_bandwidth(&self) -> usize {
        (0..self.nrows)
            .flat_map(|row| {
                self.col_idx[self.row_ptr[row]..self.row_ptr[row + 1]]
                    .iter()
                    .map(move |&col| row.abs_diff(col))
            })
            .max()
            .unwrap_or(0)
    }

    /// Stored blocks on or below the diagonal as `(row, col, block)`.
    pub(crate) fn lower_blocks(&self) -> impl Iterator<Item = (usize, usize, &Mat3)> + '_ {
        (0..self.nrows).flat_map(move |row| {
            (self.row_ptr[row]..self.row_ptr[row + 1])
                .filter(move |&idx| self.col_idx[idx] <= row)
                .map(move |idx| (row, self.col_idx[idx], &self.values[idx]))
        })
    }

    fn find_index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.nrows || col >= self.nrows {
            return None;
        }
        (self.row_ptr[row]..self.row_ptr[row + 1]).find(|&idx| self.col_idx[idx] == col)
    }

    fn insert_new(&mut self, row: usize, col: usize, block: Mat3) {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        let insert_at = start + self.col_idx[start..end].partition_point(|&c| c <= col);

        self.col_idx.insert(insert_at, col);
        self.values.insert(insert_at, block);
        for ptr in self.row_ptr.iter_mut().skip(row + 1) {
            *ptr += 1;
        }
    }

    fn validate_index(&self, row: usize, col: usize) -> Result<()> {
        if row < self.nrows && col < self.nrows {
            Ok(())
        } else {
            Err(GraphError::BlockIndexOutOfBounds {
                row,
                col,
                nrows: self.nrows,
            })
        }
    }
}
