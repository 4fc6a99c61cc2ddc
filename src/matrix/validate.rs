//! Validation of task data before a multiplication touches any buffer
//!
//! Checks, in order:
//! 1. six input buffers and three output buffers
//! 2. at least six input counts and three output counts
//! 3. each operand has at least one row (`row_ptr` count - 1)
//! 4. A's column count equals B's row count
//! 5. the output row-pointer buffer can hold `A.n_rows + 1` entries
//! 6. both operands are structurally sound CRS triples
//!
//! Column counts come from `TaskData::input_ncols` when set, otherwise from
//! `max(col_idx) + 1`. An operand without any stored entry gives no evidence
//! of its width: A is then taken to be exactly as wide as B is tall, and B
//! to be zero columns wide.

use log::warn;
use num_traits::Num;

use crate::error::{Error, Result};
use crate::matrix::crs::{check_crs_structure, derived_n_cols};
use crate::matrix::SparseMatrixCRS;
use crate::task::TaskData;

/// Borrowed view of one operand inside a [`TaskData`]
#[derive(Debug, Clone, Copy)]
pub struct OperandView<'a, T> {
    /// Entries, cut to their count
    pub values: &'a [T],
    /// Column indices, cut to their count
    pub col_idx: &'a [usize],
    /// Row pointers, cut to their count
    pub row_ptr: &'a [usize],
}

impl<'a, T> OperandView<'a, T> {
    /// Rows implied by the row-pointer count
    pub fn n_rows(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }
}

fn counted<'a, U>(slice: Option<&'a [U]>, count: usize, index: usize) -> Result<&'a [U]> {
    let slice = slice.ok_or_else(|| Error::Validation(format!("input {} has the wrong element type", index)))?;
    if count > slice.len() {
        return Err(Error::Validation(format!(
            "input {} claims {} elements but holds {}",
            index,
            count,
            slice.len()
        )));
    }
    Ok(&slice[..count])
}

/// Borrows operand `which` (0 for A, 1 for B) from `data`
///
/// Assumes checks 1 and 2 have passed.
pub fn operand_view<T>(data: &TaskData<T>, which: usize) -> Result<OperandView<'_, T>> {
    let base = which * 3;
    Ok(OperandView {
        values: counted(data.inputs[base].as_values(), data.inputs_count[base], base)?,
        col_idx: counted(data.inputs[base + 1].as_indices(), data.inputs_count[base + 1], base + 1)?,
        row_ptr: counted(data.inputs[base + 2].as_indices(), data.inputs_count[base + 2], base + 2)?,
    })
}

/// Resolves the column counts of A and B
pub fn resolve_n_cols<T>(
    data: &TaskData<T>,
    a: &OperandView<'_, T>,
    b: &OperandView<'_, T>,
) -> Result<[usize; 2]> {
    if let Some(ncols) = data.input_ncols {
        return Ok(ncols);
    }
    let a_cols = if a.col_idx.is_empty() { b.n_rows() } else { derived_n_cols(a.col_idx)? };
    Ok([a_cols, derived_n_cols(b.col_idx)?])
}

/// Runs every validation check, reporting the first failure
pub fn validate_task_data<T>(data: &TaskData<T>) -> Result<()> {
    if data.inputs.len() != 6 || data.outputs.len() != 3 {
        return Err(Error::Validation(format!(
            "expected 6 inputs and 3 outputs, got {} and {}",
            data.inputs.len(),
            data.outputs.len()
        )));
    }

    if data.inputs_count.len() < 6 || data.outputs_count.len() < 3 {
        return Err(Error::Validation(format!(
            "expected at least 6 input counts and 3 output counts, got {} and {}",
            data.inputs_count.len(),
            data.outputs_count.len()
        )));
    }

    let a = operand_view(data, 0)?;
    let b = operand_view(data, 1)?;

    if a.n_rows() == 0 || b.n_rows() == 0 {
        return Err(Error::Validation(format!(
            "operands need at least one row, got {} and {}",
            a.n_rows(),
            b.n_rows()
        )));
    }

    let [a_cols, b_cols] = resolve_n_cols(data, &a, &b)?;
    if a_cols != b.n_rows() {
        return Err(Error::DimensionMismatch {
            a_cols,
            b_rows: b.n_rows(),
        });
    }

    if data.outputs_count[2] < a.n_rows() + 1 {
        return Err(Error::Validation(format!(
            "output row_ptr holds {} entries, product needs {}",
            data.outputs_count[2],
            a.n_rows() + 1
        )));
    }

    check_crs_structure(a.n_rows(), a_cols, a.row_ptr, a.col_idx, a.values.len())?;
    check_crs_structure(b.n_rows(), b_cols, b.row_ptr, b.col_idx, b.values.len())?;

    Ok(())
}

/// Boolean form of [`validate_task_data`]; logs the reason on failure
pub fn is_valid<T>(data: &TaskData<T>) -> bool {
    match validate_task_data(data) {
        Ok(()) => true,
        Err(err) => {
            warn!("task data rejected: {}", err);
            false
        }
    }
}

/// Copies both operands out of validated task data
pub fn load_operands<T: Copy + Num>(data: &TaskData<T>) -> Result<(SparseMatrixCRS<T>, SparseMatrixCRS<T>)> {
    validate_task_data(data)?;

    let a = operand_view(data, 0)?;
    let b = operand_view(data, 1)?;
    let [a_cols, b_cols] = resolve_n_cols(data, &a, &b)?;

    let to_matrix = |view: OperandView<'_, T>, n_cols: usize| {
        SparseMatrixCRS::try_new(
            view.n_rows(),
            n_cols,
            view.row_ptr.to_vec(),
            view.col_idx.to_vec(),
            view.values.to_vec(),
        )
    };

    Ok((to_matrix(a, a_cols)?, to_matrix(b, b_cols)?))
}
