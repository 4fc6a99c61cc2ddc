//! Row-wise sparse matrix multiplication kernel
//!
//! Each output row `i` is produced independently: the nonzeros of A's row `i`
//! select rows of B, whose scaled entries are summed in a dense scratch row as
//! wide as the output. The finished row is read back in ascending column order
//! and entries that are exactly zero are dropped. Because rows are independent,
//! the same kernel serves the sequential multiplier (all rows) and every
//! parallel worker (one contiguous row block each).

use log::debug;
use num_traits::Num;
use std::ops::{AddAssign, Range};

use crate::accumulator::{accumulate_row, create_accumulator};
use crate::error::{Error, Result};
use crate::matrix::config::AccumulatorKind;
use crate::matrix::crs::check_crs_structure;
use crate::matrix::SparseMatrixCRS;

/// The result rows of one contiguous row block
///
/// `row_ptr` is local: it starts at 0 and has one entry per block row plus a
/// terminator equal to the block's nnz.
#[derive(Debug, Clone, PartialEq)]
pub struct CrsFragment<T> {
    /// Block values in row-major order
    pub values: Vec<T>,
    /// Column index of each value
    pub col_idx: Vec<usize>,
    /// Local row pointers (size: rows in block + 1)
    pub row_ptr: Vec<usize>,
}

impl<T> CrsFragment<T> {
    /// Number of rows covered by the fragment
    pub fn n_rows(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    /// Number of entries in the fragment
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// Checks that both operands are well-formed CRS and that `a.n_cols == b.n_rows`
///
/// The fields of [`SparseMatrixCRS`] are public, so operands built by hand
/// are re-checked here before any kernel indexes into them.
pub fn check_multipliable<T>(a: &SparseMatrixCRS<T>, b: &SparseMatrixCRS<T>) -> Result<()> {
    check_crs_structure(a.n_rows, a.n_cols, &a.row_ptr, &a.col_idx, a.values.len())?;
    check_crs_structure(b.n_rows, b.n_cols, &b.row_ptr, &b.col_idx, b.values.len())?;

    if a.n_cols != b.n_rows {
        return Err(Error::DimensionMismatch {
            a_cols: a.n_cols,
            b_rows: b.n_rows,
        });
    }
    Ok(())
}

/// Multiplies rows `rows` of A by B
///
/// The caller guarantees `a.n_cols == b.n_rows` and `rows.end <= a.n_rows`.
pub fn multiply_rows<T>(
    a: &SparseMatrixCRS<T>,
    b: &SparseMatrixCRS<T>,
    rows: Range<usize>,
    kind: AccumulatorKind,
) -> CrsFragment<T>
where
    T: Copy + Num + AddAssign + 'static,
{
    let mut accumulator = create_accumulator(kind, b.n_cols);

    let mut values = Vec::new();
    let mut col_idx = Vec::new();
    let mut row_ptr = Vec::with_capacity(rows.len() + 1);

    for i in rows {
        row_ptr.push(values.len());
        accumulate_row(i, a, b, accumulator.as_mut());
        accumulator.drain_into(&mut col_idx, &mut values);
    }
    row_ptr.push(values.len());

    CrsFragment {
        values,
        col_idx,
        row_ptr,
    }
}

/// Computes C = A·B on the calling thread
///
/// # Examples
///
/// ```
/// use crsmul::{SparseMatrixCRS, spgemm_seq, AccumulatorKind};
///
/// let a = SparseMatrixCRS::<f64>::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0]);
/// let b = SparseMatrixCRS::<f64>::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![2.0, 2.0]);
///
/// let c = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();
/// assert_eq!(c.values, vec![2.0, 2.0]);
/// assert_eq!(c.row_ptr, vec![0, 1, 2]);
/// ```
pub fn spgemm_seq<T>(
    a: &SparseMatrixCRS<T>,
    b: &SparseMatrixCRS<T>,
    kind: AccumulatorKind,
) -> Result<SparseMatrixCRS<T>>
where
    T: Copy + Num + AddAssign + 'static,
{
    check_multipliable(a, b)?;

    debug!(
        "spgemm_seq: ({} x {}, nnz {}) * ({} x {}, nnz {})",
        a.n_rows, a.n_cols, a.nnz(), b.n_rows, b.n_cols, b.nnz()
    );

    let fragment = multiply_rows(a, b, 0..a.n_rows, kind);
    debug!("spgemm_seq: result nnz {}", fragment.nnz());

    Ok(SparseMatrixCRS {
        n_rows: a.n_rows,
        n_cols: b.n_cols,
        row_ptr: fragment.row_ptr,
        col_idx: fragment.col_idx,
        values: fragment.values,
    })
}
