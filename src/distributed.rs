//! # Distributed SpGEMM over a worker group
//!
//! The coordinating rank broadcasts both operands in full, every worker
//! multiplies one contiguous block of output rows, and the coordinator
//! gathers the blocks and stitches them into a single CRS matrix.
//!
//! Only output rows are split. Each worker holds a full copy of A and B:
//! a row block of A may reference any row of B, and replicating both
//! operands keeps the exchange to one broadcast and one gather.

use log::debug;
use num_traits::Num;
use std::ops::{AddAssign, Range};

use crate::comm::{Communicator, WorkerPool, ROOT};
use crate::error::{CrsError, Error, Result};
use crate::matrix::config::{AccumulatorKind, MulConfig};
use crate::matrix::SparseMatrixCRS;
use crate::spgemm::{check_multipliable, multiply_rows, CrsFragment};
use crate::utils::exclusive_scan;

/// Row range owned by worker `rank` out of `size` workers
///
/// Every worker gets `n_rows / size` rows; the last worker also takes the
/// remainder. With fewer rows than workers, all rows go to the last worker.
pub fn row_block(rank: usize, size: usize, n_rows: usize) -> Range<usize> {
    let rows_per_worker = n_rows / size;
    let start = rank * rows_per_worker;
    let end = if rank == size - 1 {
        n_rows
    } else {
        start + rows_per_worker
    };
    start..end
}

/// Concatenates row-block fragments into global CRS arrays
///
/// Values and column indices are appended as they are; each fragment's local
/// row pointers are shifted by the number of entries before it.
/// Returns `(values, col_idx, row_ptr)`.
pub fn splice_fragments<T>(fragments: Vec<CrsFragment<T>>) -> (Vec<T>, Vec<usize>, Vec<usize>) {
    let nnz_per_fragment: Vec<usize> = fragments.iter().map(CrsFragment::nnz).collect();
    let offsets = exclusive_scan(&nnz_per_fragment);
    let total_nnz = offsets[fragments.len()];
    let total_rows: usize = fragments.iter().map(CrsFragment::n_rows).sum();

    let mut values = Vec::with_capacity(total_nnz);
    let mut col_idx = Vec::with_capacity(total_nnz);
    let mut row_ptr = Vec::with_capacity(total_rows + 1);
    row_ptr.push(0);

    for (fragment, offset) in fragments.into_iter().zip(offsets) {
        row_ptr.extend(fragment.row_ptr.iter().skip(1).map(|&p| p + offset));
        values.extend(fragment.values);
        col_idx.extend(fragment.col_idx);
    }

    (values, col_idx, row_ptr)
}

/// Runs the distributed multiplication protocol on one worker
///
/// `operands` must be `Some((a, b))` on [`ROOT`] and is ignored elsewhere.
/// Every worker of the group must call this collectively. Returns the
/// product on [`ROOT`] and `None` on every other worker.
pub fn distributed_spgemm<T, C>(
    comm: &C,
    operands: Option<(&SparseMatrixCRS<T>, &SparseMatrixCRS<T>)>,
    kind: AccumulatorKind,
) -> Result<Option<SparseMatrixCRS<T>>>
where
    T: Copy + Num + AddAssign + Send + 'static,
    C: Communicator,
{
    let (mut a, mut b) = if comm.is_root() {
        let (a, b) = operands.ok_or(Error::Protocol("coordinating worker was given no operands"))?;
        check_multipliable(a, b)?;
        (a.clone(), b.clone())
    } else {
        (SparseMatrixCRS::zeros(0, 0), SparseMatrixCRS::zeros(0, 0))
    };

    // Full replication of both operands, row and column counts included
    comm.broadcast(&mut a, ROOT)?;
    comm.broadcast(&mut b, ROOT)?;

    let rows = row_block(comm.rank(), comm.size(), a.n_rows);
    debug!(
        "worker {}/{}: rows {}..{} of {}",
        comm.rank(),
        comm.size(),
        rows.start,
        rows.end,
        a.n_rows
    );

    let local = multiply_rows(&a, &b, rows, kind);
    debug!("worker {}: local nnz {}", comm.rank(), local.nnz());

    // Three variable-length gathers; every worker takes part in each
    let all_values = comm.gather(local.values, ROOT)?;
    let all_col_idx = comm.gather(local.col_idx, ROOT)?;
    let all_row_ptr = comm.gather(local.row_ptr, ROOT)?;

    let (all_values, all_col_idx, all_row_ptr) = match (all_values, all_col_idx, all_row_ptr) {
        (Some(values), Some(col_idx), Some(row_ptr)) => (values, col_idx, row_ptr),
        _ => return Ok(None),
    };

    let mut fragments = Vec::with_capacity(all_values.len());
    for ((values, col_idx), row_ptr) in all_values.into_iter().zip(all_col_idx).zip(all_row_ptr) {
        check_fragment(&values, &col_idx, &row_ptr)?;
        fragments.push(CrsFragment {
            values,
            col_idx,
            row_ptr,
        });
    }

    let (values, col_idx, row_ptr) = splice_fragments(fragments);
    debug!("coordinator: gathered nnz {}", values.len());

    let product = SparseMatrixCRS::try_new(a.n_rows, b.n_cols, row_ptr, col_idx, values)?;
    Ok(Some(product))
}

fn check_fragment<T>(values: &[T], col_idx: &[usize], row_ptr: &[usize]) -> Result<()> {
    if col_idx.len() != values.len() {
        return Err(CrsError::LengthMismatch {
            col_idx: col_idx.len(),
            values: values.len(),
        }
        .into());
    }
    match row_ptr.last() {
        Some(&last) if last == values.len() => Ok(()),
        Some(&last) => Err(CrsError::RowPtrEnd {
            last,
            nnz: values.len(),
        }
        .into()),
        None => Err(CrsError::RowPtrLength {
            expected: 1,
            got: 0,
        }
        .into()),
    }
}

/// Computes C = A·B on a fresh pool of `config.n_workers` workers
///
/// # Examples
///
/// ```
/// use crsmul::{SparseMatrixCRS, MulConfig, spgemm_distributed};
///
/// let a = SparseMatrixCRS::<f64>::identity(3);
/// let b = SparseMatrixCRS::<f64>::new(3, 2, vec![0, 1, 1, 2], vec![1, 0], vec![4.0, 5.0]);
///
/// let c = spgemm_distributed(&a, &b, &MulConfig::default().with_workers(2)).unwrap();
/// assert_eq!(c, b);
/// ```
pub fn spgemm_distributed<T>(
    a: &SparseMatrixCRS<T>,
    b: &SparseMatrixCRS<T>,
    config: &MulConfig,
) -> Result<SparseMatrixCRS<T>>
where
    T: Copy + Num + AddAssign + Send + Sync + 'static,
{
    check_multipliable(a, b)?;

    let pool = WorkerPool::new(config.n_workers)?;
    let mut results = pool.run(|comm| {
        let operands = if comm.is_root() { Some((a, b)) } else { None };
        distributed_spgemm(comm, operands, config.accumulator)
    })?;

    results
        .swap_remove(ROOT)?
        .ok_or(Error::Protocol("coordinating worker returned no product"))
}
