//! # crsmul: sparse matrix multiplication in Compressed Row Storage
//!
//! This library multiplies sparse matrices stored in CRS form (values,
//! column indices, row pointers) with a row-wise dense-scratch kernel, and
//! runs that kernel three ways:
//!
//! - **Sequential**: every output row on the calling thread ([`spgemm_seq`]).
//! - **Shared-memory parallel**: row blocks on the Rayon pool ([`spgemm_parallel`]).
//! - **Distributed**: a fixed group of message-passing workers. The
//!   coordinator broadcasts both operands, each worker computes one
//!   contiguous row block, and the coordinator gathers and splices the
//!   blocks ([`spgemm_distributed`], [`distributed::distributed_spgemm`]).
//!
//! All three produce exactly the same matrix: columns ascend within each
//! row and entries that sum to exactly zero are dropped.
//!
//! ## Usage
//!
//! ```
//! use crsmul::{SparseMatrixCRS, MulConfig, spgemm_seq, spgemm_distributed, AccumulatorKind};
//! use ndarray::array;
//!
//! let a = SparseMatrixCRS::from_dense(&array![[1.0, 0.0, 2.0], [0.0, 3.0, 0.0], [4.0, 0.0, 5.0]]);
//! let b = SparseMatrixCRS::from_dense(&array![[7.0, 8.0, 9.0], [0.0, 1.0, 0.0], [6.0, 5.0, 4.0]]);
//!
//! let c = spgemm_seq(&a, &b, AccumulatorKind::DenseScan).unwrap();
//! assert_eq!(c.to_dense(), array![[19.0, 18.0, 17.0], [0.0, 3.0, 0.0], [58.0, 57.0, 56.0]]);
//!
//! let config = MulConfig::default().with_workers(3);
//! assert_eq!(spgemm_distributed(&a, &b, &config).unwrap(), c);
//! ```
//!
//! Harness-driven code uses the four-phase [`Task`] interface instead;
//! see [`CrsMulTask`] and [`CrsMulTaskDistributed`].

pub mod accumulator;
pub mod comm;
pub mod distributed;
pub mod error;
pub mod matrix;
pub mod parallel;
pub mod spgemm;
pub mod task;
pub mod utils;

// Re-export primary components
pub use accumulator::{create_accumulator, Accumulator, DenseAccumulator, DenseScanAccumulator};
pub use comm::{ChannelComm, Communicator, WorkerPool, ROOT};
pub use distributed::{row_block, spgemm_distributed, splice_fragments};
pub use error::{CommError, CrsError, Error, Result};
pub use matrix::{reference_spgemm, AccumulatorKind, MulConfig, SparseMatrixCRS};
pub use matrix::{is_valid, load_operands, validate_task_data};
pub use parallel::spgemm_parallel;
pub use spgemm::{check_multipliable, multiply_rows, spgemm_seq, CrsFragment};
pub use task::{run_pipeline, Buffer, CrsMulTask, CrsMulTaskDistributed, Task, TaskData};
pub use utils::{from_sprs_csr, to_sprs_csr};

/// Version information for the crsmul library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
