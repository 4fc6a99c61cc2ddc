//! Utility functions and helpers

pub mod formats;

pub use formats::{from_sprs_csr, to_sprs_csr};

/// Offsets of consecutive blocks with the given lengths
///
/// The result starts at 0 and has one more element than `lengths`; its last
/// element is the total.
pub fn exclusive_scan(lengths: &[usize]) -> Vec<usize> {
    std::iter::once(0)
        .chain(lengths.iter().scan(0, |total, &len| {
            *total += len;
            Some(*total)
        }))
        .collect()
}
