//! Conversion functions between CRS and dense ndarray matrices

use ndarray::Array2;
use num_traits::Num;

use crate::matrix::SparseMatrixCRS;

impl<T: Copy + Num> SparseMatrixCRS<T> {
    /// Builds a CRS matrix from a dense array, keeping entries that are not exactly zero
    ///
    /// Entries are stored row by row in ascending column order.
    pub fn from_dense(dense: &Array2<T>) -> Self {
        let (n_rows, n_cols) = dense.dim();

        let mut row_ptr = Vec::with_capacity(n_rows + 1);
        let mut col_idx = Vec::new();
        let mut values = Vec::new();

        row_ptr.push(0);

        for row in dense.rows() {
            for (j, &val) in row.iter().enumerate() {
                if !val.is_zero() {
                    col_idx.push(j);
                    values.push(val);
                }
            }
            row_ptr.push(values.len());
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Expands this matrix into a dense array
    ///
    /// Duplicate column entries within a row are summed.
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.n_rows, self.n_cols), T::zero());

        for i in 0..self.n_rows {
            for (j, &val) in self.row_iter(i) {
                dense[[i, j]] = dense[[i, j]] + val;
            }
        }

        dense
    }
}
