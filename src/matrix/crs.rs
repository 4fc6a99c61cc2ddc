//! Compressed Row Storage (CRS) matrix format implementation

use std::fmt;
use num_traits::Num;

use crate::error::CrsError;

/// A sparse matrix in Compressed Row Storage (CRS) format
///
/// The CRS format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing offsets into col_idx and values
/// - col_idx: Array of size nnz containing column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// The column count is stored explicitly, so trailing all-zero columns are
/// representable. Column indices within a row need not be sorted.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCRS<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i]..row_ptr[i + 1] delimits row i in col_idx and values
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

/// Checks the CRS invariants for a raw triple without taking ownership.
pub fn check_crs_structure(
    n_rows: usize,
    n_cols: usize,
    row_ptr: &[usize],
    col_idx: &[usize],
    n_values: usize,
) -> Result<(), CrsError> {
    if row_ptr.len() != n_rows + 1 {
        return Err(CrsError::RowPtrLength {
            expected: n_rows + 1,
            got: row_ptr.len(),
        });
    }
    if col_idx.len() != n_values {
        return Err(CrsError::LengthMismatch {
            col_idx: col_idx.len(),
            values: n_values,
        });
    }
    if row_ptr[0] != 0 {
        return Err(CrsError::RowPtrStart(row_ptr[0]));
    }
    for (row, pair) in row_ptr.windows(2).enumerate() {
        if pair[0] > pair[1] {
            return Err(CrsError::RowPtrNotMonotone {
                row,
                prev: pair[0],
                next: pair[1],
            });
        }
    }
    if row_ptr[n_rows] != col_idx.len() {
        return Err(CrsError::RowPtrEnd {
            last: row_ptr[n_rows],
            nnz: col_idx.len(),
        });
    }
    if let Some(&col) = col_idx.iter().find(|&&col| col >= n_cols) {
        return Err(CrsError::ColumnOutOfBounds { col, n_cols });
    }
    Ok(())
}

/// Column count implied by a column-index array: `max + 1`, or 0 when empty.
///
/// An index of `usize::MAX` has no representable width and is reported as
/// out of bounds.
pub fn derived_n_cols(col_idx: &[usize]) -> Result<usize, CrsError> {
    match col_idx.iter().max() {
        None => Ok(0),
        Some(&max) => max.checked_add(1).ok_or(CrsError::ColumnOutOfBounds {
            col: max,
            n_cols: usize::MAX,
        }),
    }
}

impl<T> SparseMatrixCRS<T>
where
    T: Copy + Num,
{
    /// Creates a new CRS matrix with the given dimensions and data
    ///
    /// # Arguments
    ///
    /// * `n_rows` - Number of rows
    /// * `n_cols` - Number of columns
    /// * `row_ptr` - Row pointers
    /// * `col_idx` - Column indices
    /// * `values` - Non-zero values
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent; see [`SparseMatrixCRS::try_new`]
    /// for the non-panicking form.
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        match Self::try_new(n_rows, n_cols, row_ptr, col_idx, values) {
            Ok(matrix) => matrix,
            Err(err) => panic!("{}", err),
        }
    }

    /// Creates a new CRS matrix, reporting structural faults instead of panicking
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self, CrsError> {
        check_crs_structure(n_rows, n_cols, &row_ptr, &col_idx, values.len())?;

        Ok(Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        })
    }

    /// Builds a matrix from bare CRS arrays, deriving the shape from them
    ///
    /// `n_rows` is `row_ptr.len() - 1` and `n_cols` is `max(col_idx) + 1`
    /// (0 for an empty matrix). A matrix whose last columns are all zero comes
    /// out narrower than intended; use [`SparseMatrixCRS::try_new`] when the
    /// true width is known.
    pub fn from_raw_parts(
        values: Vec<T>,
        col_idx: Vec<usize>,
        row_ptr: Vec<usize>,
    ) -> Result<Self, CrsError> {
        if row_ptr.is_empty() {
            return Err(CrsError::RowPtrLength {
                expected: 1,
                got: 0,
            });
        }
        let n_rows = row_ptr.len() - 1;
        let n_cols = derived_n_cols(&col_idx)?;
        Self::try_new(n_rows, n_cols, row_ptr, col_idx, values)
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns (n_rows, n_cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of stored entries in row i
    pub fn row_nnz(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, val)| (col, val))
    }

    /// Re-checks the structural invariants
    pub fn check_structure(&self) -> Result<(), CrsError> {
        check_crs_structure(
            self.n_rows,
            self.n_cols,
            &self.row_ptr,
            &self.col_idx,
            self.values.len(),
        )
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n).collect(),
            values: vec![T::one(); n],
        }
    }
}

impl<T: fmt::Debug + Copy + Num> fmt::Debug for SparseMatrixCRS<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCRS {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                } else {
                    let max_elements = 5.min(end - start);

                    for j in start..(start + max_elements) {
                        write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                    }

                    if end - start > max_elements {
                        write!(f, "... ({} more)", end - start - max_elements)?;
                    }

                    writeln!(f)?;
                }
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
