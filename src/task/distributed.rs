//! CRS multiplication task spread over a worker group
//!
//! Every worker constructs the task with its own communicator and runs the
//! lifecycle in lockstep. Only the coordinating worker needs populated task
//! data: it validates and loads the operands, and it alone publishes the
//! product. `run` is collective on all workers.

use log::{debug, error};
use num_traits::Num;
use std::ops::AddAssign;

use crate::comm::Communicator;
use crate::distributed::distributed_spgemm;
use crate::error::{Error, Result};
use crate::matrix::config::AccumulatorKind;
use crate::matrix::validate::{is_valid, load_operands};
use crate::matrix::SparseMatrixCRS;
use crate::task::{Task, TaskData};

/// Distributed counterpart of [`crate::task::CrsMulTask`]
pub struct CrsMulTaskDistributed<'c, T, C> {
    comm: &'c C,
    data: TaskData<T>,
    accumulator: AccumulatorKind,
    operands: Option<(SparseMatrixCRS<T>, SparseMatrixCRS<T>)>,
    product: Option<SparseMatrixCRS<T>>,
}

impl<'c, T, C> CrsMulTaskDistributed<'c, T, C>
where
    T: Copy + Num + AddAssign + Send + 'static,
    C: Communicator,
{
    /// Creates the task for this worker; non-coordinating workers may pass empty data
    pub fn new(comm: &'c C, data: TaskData<T>) -> Self {
        Self {
            comm,
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

    /// The task data, including published outputs on the coordinator
    pub fn data(&self) -> &TaskData<T> {
        &self.data
    }

    /// The gathered product; only ever set on the coordinator
    pub fn result(&self) -> Option<&SparseMatrixCRS<T>> {
        self.product.as_ref()
    }

    fn try_pre_processing(&mut self) -> Result<()> {
        if self.comm.is_root() {
            self.operands = Some(load_operands(&self.data)?);
        }
        self.product = None;
        Ok(())
    }

    fn try_run(&mut self) -> Result<()> {
        let operands = self.operands.as_ref().map(|(a, b)| (a, b));
        self.product = distributed_spgemm(self.comm, operands, self.accumulator)?;
        debug!("worker {} finished run", self.comm.rank());
        Ok(())
    }

    fn try_post_processing(&mut self) -> Result<()> {
        if !self.comm.is_root() {
            return Ok(());
        }
        let product = self.product.as_ref().ok_or(Error::PhaseFailed("run"))?;
        self.data.publish(product)
    }

    fn report(&self, phase: &str, outcome: Result<()>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(err) => {
                error!("worker {}: {} failed: {}", self.comm.rank(), phase, err);
                false
            }
        }
    }
}

impl<'c, T, C> Task for CrsMulTaskDistributed<'c, T, C>
where
    T: Copy + Num + AddAssign + Send + 'static,
    C: Communicator,
{
    fn validation(&mut self) -> bool {
        !self.comm.is_root() || is_valid(&self.data)
    }

    fn pre_processing(&mut self) -> bool {
        let outcome = self.try_pre_processing();
        self.report("pre_processing", outcome)
    }

    fn run(&mut self) -> bool {
        let outcome = self.try_run();
        self.report("run", outcome)
    }

    fn post_processing(&mut self) -> bool {
        let outcome = self.try_post_processing();
        self.report("post_processing", outcome)
    }
}
