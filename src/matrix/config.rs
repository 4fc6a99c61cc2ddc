//! Configuration for the CRS multipliers

/// Row accumulation strategy used by the multiplication kernels
///
/// Both strategies use a dense scratch array as wide as the output and
/// produce identical results; they differ only in how the finished row is
/// read back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulatorKind {
    /// Scan the whole scratch row in column order (O(K) per row)
    #[default]
    DenseScan,
    /// Track touched columns and sort them (O(t log t) per row)
    Dense,
}

/// Configuration for parallel and distributed multiplication
#[derive(Debug, Clone)]
pub struct MulConfig {
    /// Number of workers for the distributed multiplier
    pub n_workers: usize,

    /// Row accumulation strategy
    pub accumulator: AccumulatorKind,
}

impl Default for MulConfig {
    fn default() -> Self {
        Self {
            n_workers: num_cpus::get(), // Use all available cores
            accumulator: AccumulatorKind::default(),
        }
    }
}

impl MulConfig {
    /// Sets the worker count
    pub fn with_workers(mut self, n_workers: usize) -> Self {
        self.n_workers = n_workers;
        self
    }

    /// Sets the accumulation strategy
    pub fn with_accumulator(mut self, accumulator: AccumulatorKind) -> Self {
        self.accumulator = accumulator;
        self
    }
}
