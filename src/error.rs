//! Error types for crsmul

use thiserror::Error;

/// Result type alias using crsmul's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Structural faults in a CRS triple
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrsError {
    /// row_ptr must hold one entry per row plus a terminator
    #[error("row_ptr has length {got}, expected n_rows + 1 = {expected}")]
    RowPtrLength {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// row_ptr[0] must be zero
    #[error("row_ptr[0] is {0}, expected 0")]
    RowPtrStart(usize),

    /// row_ptr must never decrease
    #[error("row_ptr decreases at row {row}: {prev} > {next}")]
    RowPtrNotMonotone {
        /// Row whose end precedes its start
        row: usize,
        /// row_ptr[row]
        prev: usize,
        /// row_ptr[row + 1]
        next: usize,
    },

    /// row_ptr[n_rows] must equal nnz
    #[error("row_ptr ends at {last}, but nnz is {nnz}")]
    RowPtrEnd {
        /// row_ptr[n_rows]
        last: usize,
        /// Number of stored values
        nnz: usize,
    },

    /// values and col_idx must be the same length
    #[error("col_idx has {col_idx} entries but values has {values}")]
    LengthMismatch {
        /// col_idx length
        col_idx: usize,
        /// values length
        values: usize,
    },

    /// A column index falls outside the matrix
    #[error("column index {col} out of bounds (n_cols = {n_cols})")]
    ColumnOutOfBounds {
        /// Offending index
        col: usize,
        /// Column count
        n_cols: usize,
    },
}

/// Failures of the worker runtime and its collectives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    /// A pool needs at least one worker
    #[error("worker pool must have at least one worker")]
    EmptyPool,

    /// The root of a collective is not a member of the pool
    #[error("root rank {root} is outside a pool of {size} workers")]
    InvalidRoot {
        /// Requested root
        root: usize,
        /// Pool size
        size: usize,
    },

    /// The peer's end of the link is gone
    #[error("link to rank {peer} is disconnected")]
    Disconnected {
        /// Peer rank
        peer: usize,
    },

    /// The peer sent a payload of a different type than expected
    #[error("payload from rank {peer} has an unexpected type")]
    TypeMismatch {
        /// Peer rank
        peer: usize,
    },

    /// A worker thread panicked
    #[error("worker {rank} panicked")]
    WorkerPanicked {
        /// Rank of the failed worker
        rank: usize,
    },
}

/// Errors that can occur in crsmul operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed CRS input
    #[error("invalid CRS matrix: {0}")]
    Crs(#[from] CrsError),

    /// Worker runtime failure
    #[error("communication failure: {0}")]
    Comm(#[from] CommError),

    /// Inner dimensions of a product disagree
    #[error("cannot multiply: A has {a_cols} columns but B has {b_rows} rows")]
    DimensionMismatch {
        /// Columns of the left operand
        a_cols: usize,
        /// Rows of the right operand
        b_rows: usize,
    },

    /// Task data failed validation
    #[error("validation failed: {0}")]
    Validation(String),

    /// A worker broke the distributed multiplication protocol
    #[error("protocol fault: {0}")]
    Protocol(&'static str),

    /// A task lifecycle phase reported failure
    #[error("task phase '{0}' failed")]
    PhaseFailed(&'static str),

    /// Conversion to or from sprs failed
    #[error("sprs conversion failed: {0}")]
    Sprs(String),
}
