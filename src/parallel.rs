//! # Shared-memory parallel SpGEMM
//!
//! This module parallelizes the row kernel with Rayon. Rows are split into
//! one contiguous block per Rayon task, every block is multiplied with its own
//! scratch accumulator, and the block fragments are stitched together in row
//! order. The result is identical to [`crate::spgemm_seq`].

use log::debug;
use num_traits::Num;
use rayon::prelude::*;
use std::ops::AddAssign;

use crate::distributed::{row_block, splice_fragments};
use crate::error::Result;
use crate::matrix::config::MulConfig;
use crate::matrix::SparseMatrixCRS;
use crate::spgemm::{check_multipliable, multiply_rows, CrsFragment};

/// Performs sparse general matrix-matrix multiplication (SpGEMM)
/// with parallel row processing.
///
/// # Arguments
///
/// * `a` - Left input matrix in CRS format
/// * `b` - Right input matrix in CRS format
/// * `config` - `n_workers` sets the number of row blocks
///
/// # Examples
///
/// ```
/// use crsmul::{SparseMatrixCRS, MulConfig, spgemm_parallel};
///
/// let a = SparseMatrixCRS::<f64>::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![1.0, 1.0]);
/// let b = SparseMatrixCRS::<f64>::new(2, 2, vec![0, 1, 2], vec![0, 1], vec![2.0, 2.0]);
///
/// let config = MulConfig::default();
/// let c = spgemm_parallel(&a, &b, &config).unwrap();
///
/// // Result should be a diagonal matrix with elements 2.0
/// assert_eq!(c.shape(), (2, 2));
/// assert_eq!(c.values, vec![2.0, 2.0]);
/// ```
pub fn spgemm_parallel<T>(
    a: &SparseMatrixCRS<T>,
    b: &SparseMatrixCRS<T>,
    config: &MulConfig,
) -> Result<SparseMatrixCRS<T>>
where
    T: Copy + Num + AddAssign + Send + Sync + 'static,
{
    check_multipliable(a, b)?;

    let n_blocks = config.n_workers.max(1);
    let kind = config.accumulator;

    debug!("spgemm_parallel: {} rows in {} blocks", a.n_rows, n_blocks);

    let fragments: Vec<CrsFragment<T>> = (0..n_blocks)
        .into_par_iter()
        .map(|block| multiply_rows(a, b, row_block(block, n_blocks, a.n_rows), kind))
        .collect();

    let (values, col_idx, row_ptr) = splice_fragments(fragments);

    Ok(SparseMatrixCRS {
        n_rows: a.n_rows,
        n_cols: b.n_cols,
        row_ptr,
        col_idx,
        values,
    })
}
