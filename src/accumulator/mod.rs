//! Accumulator implementations for sparse matrix multiplication
//!
//! An accumulator collects the intermediate products `a_ik * b_kj` of one
//! output row and hands back the finished row as ascending (column, value)
//! pairs with exact zeros removed. Accumulators are reused from row to row,
//! so draining a row also clears the accumulator for the next one.

pub mod dense;
pub mod scan;

use num_traits::Num;
use std::ops::AddAssign;

use crate::matrix::config::AccumulatorKind;
use crate::matrix::SparseMatrixCRS;

pub use dense::DenseAccumulator;
pub use scan::DenseScanAccumulator;

/// Trait for accumulators that handle intermediate products in SpGEMM
pub trait Accumulator<T>
where
    T: Copy + Num + AddAssign,
{
    /// Reset the accumulator to prepare for a new row
    fn reset(&mut self);

    /// Accumulate a single entry (column and value)
    fn accumulate(&mut self, col: usize, val: T);

    /// Append the row's non-zero entries to `col_idx`/`values` in ascending
    /// column order, then reset
    ///
    /// An entry counts as non-zero when it is not exactly `T::zero()`.
    fn drain_into(&mut self, col_idx: &mut Vec<usize>, values: &mut Vec<T>);
}

/// Create an accumulator of the given kind for an output with `n_cols` columns
pub fn create_accumulator<T>(kind: AccumulatorKind, n_cols: usize) -> Box<dyn Accumulator<T>>
where
    T: Copy + Num + AddAssign + 'static,
{
    match kind {
        AccumulatorKind::DenseScan => Box::new(DenseScanAccumulator::new(n_cols)),
        AccumulatorKind::Dense => Box::new(DenseAccumulator::new(n_cols)),
    }
}

/// Feeds every intermediate product of output row `a_row` into `accumulator`
///
/// Row `a_row` of A selects rows of B by its column indices; each selected
/// B row is scaled by the A value and scattered into the accumulator.
pub fn accumulate_row<T>(
    a_row: usize,
    a: &SparseMatrixCRS<T>,
    b: &SparseMatrixCRS<T>,
    accumulator: &mut dyn Accumulator<T>,
) where
    T: Copy + Num + AddAssign,
{
    let row_start = a.row_ptr[a_row];
    let row_end = a.row_ptr[a_row + 1];

    for a_idx in row_start..row_end {
        let b_row = a.col_idx[a_idx];
        let a_val = a.values[a_idx];

        let b_row_start = b.row_ptr[b_row];
        let b_row_end = b.row_ptr[b_row + 1];

        for b_idx in b_row_start..b_row_end {
            accumulator.accumulate(b.col_idx[b_idx], a_val * b.values[b_idx]);
        }
    }
}
