//! Single-process CRS multiplication task

use log::{debug, error};
use num_traits::Num;
use std::ops::AddAssign;

use crate::error::{Error, Result};
use crate::matrix::config::AccumulatorKind;
use crate::matrix::validate::{is_valid, load_operands};
use crate::matrix::SparseMatrixCRS;
use crate::spgemm::spgemm_seq;
use crate::task::{Task, TaskData};

/// Multiplies the two CRS operands held in a [`TaskData`] on the calling thread
pub struct CrsMulTask<T> {
    data: TaskData<T>,
    accumulator: AccumulatorKind,
    operands: Option<(SparseMatrixCRS<T>, SparseMatrixCRS<T>)>,
    product: Option<SparseMatrixCRS<T>>,
}

impl<T> CrsMulTask<T>
where
    T: Copy + Num + AddAssign + 'static,
{
    /// Wraps `data`; nothing is read until the lifecycle runs
    pub fn new(data: TaskData<T>) -> Self {
        Self {
            data,
            accumulator: AccumulatorKind::default(),
            operands: None,
            product: None,
        }
    }

    /// Selects the row accumulation strategy
    pub fn with_accumulator(mut self, accumulator: AccumulatorKind) -> Self {
        self.accumulator = accumulator;
        self
    }

    /// The task data, including published outputs after post-processing
    pub fn data(&self) -> &TaskData<T> {
        &self.data
    }

    /// Releases the task data
    pub fn into_data(self) -> TaskData<T> {
        self.data
    }

    /// The product, once `run` has succeeded
    pub fn result(&self) -> Option<&SparseMatrixCRS<T>> {
        self.product.as_ref()
    }

    fn try_pre_processing(&mut self) -> Result<()> {
        let (a, b) = load_operands(&self.data)?;
        debug!(
            "loaded A {}x{} (nnz {}), B {}x{} (nnz {})",
            a.n_rows, a.n_cols, a.nnz(), b.n_rows, b.n_cols, b.nnz()
        );
        self.operands = Some((a, b));
        self.product = None;
        Ok(())
    }

    fn try_run(&mut self) -> Result<()> {
        let (a, b) = self.operands.as_ref().ok_or(Error::PhaseFailed("pre_processing"))?;
        self.product = Some(spgemm_seq(a, b, self.accumulator)?);
        Ok(())
    }

    fn try_post_processing(&mut self) -> Result<()> {
        let product = self.product.as_ref().ok_or(Error::PhaseFailed("run"))?;
        self.data.publish(product)
    }
}

fn report(phase: &str, outcome: Result<()>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(err) => {
            error!("{} failed: {}", phase, err);
            false
        }
    }
}

impl<T> Task for CrsMulTask<T>
where
    T: Copy + Num + AddAssign + 'static,
{
    fn validation(&mut self) -> bool {
        is_valid(&self.data)
    }

    fn pre_processing(&mut self) -> bool {
        let outcome = self.try_pre_processing();
        report("pre_processing", outcome)
    }

    fn run(&mut self) -> bool {
        let outcome = self.try_run();
        report("run", outcome)
    }

    fn post_processing(&mut self) -> bool {
        let outcome = self.try_post_processing();
        report("post_processing", outcome)
    }
}
