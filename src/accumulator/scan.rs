//! Full-width scanning accumulator
//!
//! The scratch row is as wide as the output matrix and is read back by
//! walking every column from 0 to K-1. The scan makes each row cost O(K)
//! even when it has only a handful of products, but it needs no index
//! bookkeeping and yields ascending columns for free.

use num_traits::Num;
use std::ops::AddAssign;

use crate::accumulator::Accumulator;

/// Dense accumulator read back by a full column scan
pub struct DenseScanAccumulator<T> {
    temp: Vec<T>,
}

impl<T> DenseScanAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    /// Create a scratch row of `n_cols` zeros
    pub fn new(n_cols: usize) -> Self {
        Self {
            temp: vec![T::zero(); n_cols],
        }
    }

    /// Width of the scratch row
    pub fn width(&self) -> usize {
        self.temp.len()
    }
}

impl<T> Accumulator<T> for DenseScanAccumulator<T>
where
    T: Copy + Num + AddAssign,
{
    fn reset(&mut self) {
        self.temp.iter_mut().for_each(|v| *v = T::zero());
    }

    fn accumulate(&mut self, col: usize, val: T) {
        self.temp[col] += val;
    }

    fn drain_into(&mut self, col_idx: &mut Vec<usize>, values: &mut Vec<T>) {
        for (col, slot) in self.temp.iter_mut().enumerate() {
            if !slot.is_zero() {
                col_idx.push(col);
                values.push(*slot);
            }
            *slot = T::zero();
        }
    }
}
