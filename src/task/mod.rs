//! Task lifecycle and the buffers a task reads from and writes to
//!
//! A harness drives a task through four phases, strictly in order:
//! `validation → pre_processing → run → post_processing`. Each phase
//! reports success as a boolean and assumes the previous ones succeeded.
//! Inputs and outputs travel in a [`TaskData`] bundle.

pub mod distributed;
pub mod seq;

use log::debug;
use num_traits::Num;

use crate::error::{Error, Result};
use crate::matrix::SparseMatrixCRS;

pub use distributed::CrsMulTaskDistributed;
pub use seq::CrsMulTask;

/// The four-phase task contract
pub trait Task {
    /// Checks that the task data is well formed
    fn validation(&mut self) -> bool;

    /// Loads inputs into the task's working state
    fn pre_processing(&mut self) -> bool;

    /// Performs the computation
    fn run(&mut self) -> bool;

    /// Publishes results back into the task data
    fn post_processing(&mut self) -> bool;
}

/// Drives `task` through all four phases, stopping at the first failure
pub fn run_pipeline<K: Task + ?Sized>(task: &mut K) -> Result<()> {
    let phases: [(&'static str, fn(&mut K) -> bool); 4] = [
        ("validation", K::validation),
        ("pre_processing", K::pre_processing),
        ("run", K::run),
        ("post_processing", K::post_processing),
    ];

    for (name, phase) in phases {
        debug!("task phase: {}", name);
        if !phase(task) {
            return Err(Error::PhaseFailed(name));
        }
    }
    Ok(())
}

/// A typed input or output buffer
#[derive(Debug, Clone, PartialEq)]
pub enum Buffer<T> {
    /// Matrix entries
    Values(Vec<T>),
    /// Column indices or row pointers
    Indices(Vec<usize>),
}

impl<T> Buffer<T> {
    /// Number of elements held
    pub fn len(&self) -> usize {
        match self {
            Buffer::Values(v) => v.len(),
            Buffer::Indices(v) => v.len(),
        }
    }

    /// Whether the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contents, if this is a value buffer
    pub fn as_values(&self) -> Option<&[T]> {
        match self {
            Buffer::Values(v) => Some(v),
            Buffer::Indices(_) => None,
        }
    }

    /// The contents, if this is an index buffer
    pub fn as_indices(&self) -> Option<&[usize]> {
        match self {
            Buffer::Indices(v) => Some(v),
            Buffer::Values(_) => None,
        }
    }
}

/// Inputs and outputs of a multiplication task
///
/// Inputs are `[A.values, A.col_idx, A.row_ptr, B.values, B.col_idx, B.row_ptr]`,
/// outputs are `[C.values, C.col_idx, C.row_ptr]`. The count arrays give the
/// number of meaningful elements in each buffer; tasks never read past them.
/// After post-processing, `outputs_count` holds the lengths actually written.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskData<T> {
    /// Input buffers
    pub inputs: Vec<Buffer<T>>,
    /// Meaningful length of each input buffer
    pub inputs_count: Vec<usize>,
    /// Output buffers
    pub outputs: Vec<Buffer<T>>,
    /// Capacity (before the run) or written length (after) of each output
    pub outputs_count: Vec<usize>,
    /// True column counts of A and B; derived from the column indices when absent
    pub input_ncols: Option<[usize; 2]>,
}

impl<T> Default for TaskData<T> {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            inputs_count: Vec::new(),
            outputs: Vec::new(),
            outputs_count: Vec::new(),
            input_ncols: None,
        }
    }
}

impl<T: Copy + Num> TaskData<T> {
    /// Creates an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one input matrix as three buffers
    pub fn push_input_matrix(&mut self, values: Vec<T>, col_idx: Vec<usize>, row_ptr: Vec<usize>) {
        self.inputs_count.extend([values.len(), col_idx.len(), row_ptr.len()]);
        self.inputs.push(Buffer::Values(values));
        self.inputs.push(Buffer::Indices(col_idx));
        self.inputs.push(Buffer::Indices(row_ptr));
    }

    /// Appends preallocated output buffers for a product with `n_rows` rows
    /// and room for `nnz` entries
    pub fn push_output_matrix(&mut self, nnz: usize, n_rows: usize) {
        self.outputs.push(Buffer::Values(vec![T::zero(); nnz]));
        self.outputs.push(Buffer::Indices(vec![0; nnz]));
        self.outputs.push(Buffer::Indices(vec![0; n_rows + 1]));
        self.outputs_count.extend([nnz, nnz, n_rows + 1]);
    }

    /// Records the true column counts of A and B
    pub fn with_input_ncols(mut self, a_cols: usize, b_cols: usize) -> Self {
        self.input_ncols = Some([a_cols, b_cols]);
        self
    }

    /// Builds the bundle for A·B from typed matrices, with explicit column
    /// counts and output room for `out_nnz` entries
    pub fn for_product(a: &SparseMatrixCRS<T>, b: &SparseMatrixCRS<T>, out_nnz: usize) -> Self {
        let mut data = Self::new().with_input_ncols(a.n_cols, b.n_cols);
        data.push_input_matrix(a.values.clone(), a.col_idx.clone(), a.row_ptr.clone());
        data.push_input_matrix(b.values.clone(), b.col_idx.clone(), b.row_ptr.clone());
        data.push_output_matrix(out_nnz, a.n_rows);
        data
    }

    /// Reads the published product back out of the output buffers
    pub fn output_matrix(&self, n_cols: usize) -> Result<SparseMatrixCRS<T>> {
        let (values, col_idx, row_ptr) = match self.outputs.as_slice() {
            [Buffer::Values(v), Buffer::Indices(c), Buffer::Indices(r), ..] => (v, c, r),
            _ => return Err(Error::Validation("output buffers are not a CRS triple".to_string())),
        };
        if self.outputs_count.len() < 3 {
            return Err(Error::Validation("output counts are missing".to_string()));
        }

        let take = |len: usize, count: usize| count.min(len);
        let values = values[..take(values.len(), self.outputs_count[0])].to_vec();
        let col_idx = col_idx[..take(col_idx.len(), self.outputs_count[1])].to_vec();
        let row_ptr = row_ptr[..take(row_ptr.len(), self.outputs_count[2])].to_vec();

        let n_rows = row_ptr.len().saturating_sub(1);
        Ok(SparseMatrixCRS::try_new(n_rows, n_cols, row_ptr, col_idx, values)?)
    }

    /// Replaces the output buffers with `c` and records the written lengths
    pub(crate) fn publish(&mut self, c: &SparseMatrixCRS<T>) -> Result<()> {
        if self.outputs.len() < 3 || self.outputs_count.len() < 3 {
            return Err(Error::Validation("task data has no room for a CRS triple".to_string()));
        }

        self.outputs[0] = Buffer::Values(c.values.clone());
        self.outputs[1] = Buffer::Indices(c.col_idx.clone());
        self.outputs[2] = Buffer::Indices(c.row_ptr.clone());

        self.outputs_count[0] = c.values.len();
        self.outputs_count[1] = c.col_idx.len();
        self.outputs_count[2] = c.row_ptr.len();
        Ok(())
    }
}
