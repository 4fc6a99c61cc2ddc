// Matrix data structures and operations

pub mod config;
pub mod conversion;
pub mod crs;
pub mod reference;
pub mod validate;

pub use config::{AccumulatorKind, MulConfig};
pub use crs::SparseMatrixCRS;
pub use reference::reference_spgemm;
pub use validate::{is_valid, load_operands, validate_task_data};
