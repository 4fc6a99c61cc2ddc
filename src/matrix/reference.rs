//! Ordered-map SpGEMM used as a test oracle
//!
//! Shares no code with the dense-scratch kernels.

use num_traits::Num;
use std::collections::BTreeMap;
use std::ops::AddAssign;

use crate::matrix::SparseMatrixCRS;

/// Multiplies `a` by `b` with one ordered map per output row
///
/// Follows the same output contract as the kernels: ascending columns, exact
/// zeros dropped.
///
/// # Panics
///
/// Panics if `a.n_cols != b.n_rows`.
pub fn reference_spgemm<T>(a: &SparseMatrixCRS<T>, b: &SparseMatrixCRS<T>) -> SparseMatrixCRS<T>
where
    T: Copy + Num + AddAssign,
{
    assert_eq!(a.n_cols, b.n_rows, "inner dimensions differ");

    let mut row_ptr = vec![0];
    let mut col_idx = Vec::new();
    let mut values = Vec::new();

    for i in 0..a.n_rows {
        let mut row: BTreeMap<usize, T> = BTreeMap::new();

        for (k, &a_val) in a.row_iter(i) {
            for (j, &b_val) in b.row_iter(k) {
                *row.entry(j).or_insert_with(T::zero) += a_val * b_val;
            }
        }

        for (j, val) in row.into_iter().filter(|(_, val)| !val.is_zero()) {
            col_idx.push(j);
            values.push(val);
        }
        row_ptr.push(values.len());
    }

    SparseMatrixCRS::new(a.n_rows, b.n_cols, row_ptr, col_idx, values)
}
