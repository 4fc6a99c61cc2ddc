//! Dense accumulator with touched-column tracking
//!
//! Like the scanning accumulator this keeps a scratch row as wide as the
//! output, but it remembers which columns were written so that reading the
//! row back costs O(t log t) in the number of touched columns instead of
//! O(K). Useful when the output is very wide and rows are very sparse.

use num_traits::Num;
use std::ops::AddAssign;

use crate::accumulator::Accumulator;

/// Dense accumulator for a single row of sparse matrix multiplication
pub struct DenseAccumulator<T> {
    /// The dense accumulation array
    values: Vec<T>,

    /// Flags to track which positions in the dense array are in use
    occupied: Vec<bool>,

    /// Columns touched by the current row, in first-touch order
    col_indices: Vec<usize>,
}

impl<T> DenseAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    /// Create a new dense accumulator with specified column capacity
    ///
    /// # Arguments
    ///
    /// * `n_cols` - The number of columns in the output matrix (C)
    pub fn new(n_cols: usize) -> Self {
        Self {
            values: vec![T::zero(); n_cols],
            occupied: vec![false; n_cols],
            col_indices: Vec::new(),
        }
    }

    /// Number of distinct columns touched since the last reset
    pub fn touched(&self) -> usize {
        self.col_indices.len()
    }
}

impl<T> Accumulator<T> for DenseAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    fn reset(&mut self) {
        for &col in &self.col_indices {
            self.occupied[col] = false;
            self.values[col] = T::zero();
        }
        self.col_indices.clear();
    }

    fn accumulate(&mut self, col: usize, val: T) {
        if !self.occupied[col] {
            self.occupied[col] = true;
            self.col_indices.push(col);
        }
        // Sums start from zero, as in the scanning accumulator
        self.values[col] += val;
    }

    fn drain_into(&mut self, col_idx: &mut Vec<usize>, values: &mut Vec<T>) {
        self.col_indices.sort_unstable();

        for &col in &self.col_indices {
            let val = self.values[col];
            if !val.is_zero() {
                col_idx.push(col);
                values.push(val);
            }
        }

        self.reset();
    }
}
