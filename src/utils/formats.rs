//! Utilities for converting between our CRS format and sprs

use crate::error::{Error, Result};
use crate::matrix::SparseMatrixCRS;
use num_traits::Num;
use sprs::CsMat;

/// Converts our CRS matrix to an sprs CsMat in CSR storage
///
/// sprs requires sorted, duplicate-free column indices within each row;
/// unsorted rows are sorted during conversion and duplicates are rejected.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCRS<T>) -> Result<CsMat<T>>
where
    T: Copy + Num + Default,
{
    CsMat::new_from_unsorted(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
    .map_err(|(_, _, _, err)| Error::Sprs(err.to_string()))
}

/// Converts an sprs CsMat to our CRS format
///
/// CSC input is converted to CSR storage first.
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> Result<SparseMatrixCRS<T>>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let shape = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    Ok(SparseMatrixCRS::try_new(shape.0, shape.1, indptr, indices, data)?)
}
