//! Message-passing communication between a fixed set of workers
//!
//! A [`Communicator`] is one worker's handle on a group of `size` workers
//! with ranks `0..size`. Membership is fixed when the group is created.
//! Collectives are blocking and must be entered by every worker in the same
//! order; a worker that skips a collective leaves its peers waiting.

pub mod channel;

use crate::error::CommError;

pub use channel::{ChannelComm, WorkerPool};

/// Rank that coordinates collectives by convention
pub const ROOT: usize = 0;

/// Collective operations over a fixed worker group
pub trait Communicator {
    /// Rank of this worker
    fn rank(&self) -> usize;

    /// Number of workers in the group
    fn size(&self) -> usize;

    /// Whether this worker is the coordinating rank
    fn is_root(&self) -> bool {
        self.rank() == ROOT
    }

    /// Replicates `data` from `root` to every worker
    ///
    /// On `root`, `data` is sent unchanged; everywhere else it is overwritten
    /// by the received copy.
    fn broadcast<T>(&self, data: &mut T, root: usize) -> Result<(), CommError>
    where
        T: Clone + Send + 'static;

    /// Collects one value from every worker at `root`
    ///
    /// `root` receives `Some` with the values in rank order; every other
    /// worker receives `None`. Values may differ in length from worker to
    /// worker.
    fn gather<T>(&self, local: T, root: usize) -> Result<Option<Vec<T>>, CommError>
    where
        T: Send + 'static;

    /// Blocks until every worker has entered the barrier
    fn barrier(&self) -> Result<(), CommError> {
        let mut token = ();
        self.gather((), ROOT)?;
        self.broadcast(&mut token, ROOT)
    }
}
