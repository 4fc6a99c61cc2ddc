//! Thread-backed worker group connected by crossbeam channels
//!
//! Every ordered pair of ranks gets its own unbounded channel, so messages
//! from one rank to another arrive in the order they were sent and can never
//! be confused with traffic from a third rank. Payloads are type-erased and
//! checked on receipt.

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::trace;
use std::any::Any;
use std::thread;

use crate::comm::Communicator;
use crate::error::CommError;

type Payload = Box<dyn Any + Send>;

/// One worker's endpoint in a channel mesh
pub struct ChannelComm {
    rank: usize,
    size: usize,
    /// Outgoing links, indexed by destination rank
    senders: Vec<Sender<Payload>>,
    /// Incoming links, indexed by source rank
    receivers: Vec<Receiver<Payload>>,
}

impl ChannelComm {
    /// Builds a fully connected group of `size` endpoints, ordered by rank
    pub fn mesh(size: usize) -> Result<Vec<ChannelComm>, CommError> {
        if size == 0 {
            return Err(CommError::EmptyPool);
        }

        let mut senders: Vec<Vec<Sender<Payload>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();
        let mut receivers: Vec<Vec<Receiver<Payload>>> = (0..size).map(|_| Vec::with_capacity(size)).collect();

        for src in 0..size {
            for dst in 0..size {
                let (tx, rx) = unbounded();
                senders[src].push(tx);
                receivers[dst].push(rx);
            }
        }

        Ok(senders
            .into_iter()
            .zip(receivers)
            .enumerate()
            .map(|(rank, (senders, receivers))| ChannelComm {
                rank,
                size,
                senders,
                receivers,
            })
            .collect())
    }

    /// Sends `value` to rank `dst`
    pub fn send<T: Send + 'static>(&self, dst: usize, value: T) -> Result<(), CommError> {
        trace!("rank {} -> rank {}", self.rank, dst);
        self.senders[dst]
            .send(Box::new(value))
            .map_err(|_| CommError::Disconnected { peer: dst })
    }

    /// Receives the next value sent by rank `src`, blocking until it arrives
    pub fn recv<T: 'static>(&self, src: usize) -> Result<T, CommError> {
        let payload = self.receivers[src]
            .recv()
            .map_err(|_| CommError::Disconnected { peer: src })?;
        trace!("rank {} <- rank {}", self.rank, src);
        payload
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| CommError::TypeMismatch { peer: src })
    }

    fn check_root(&self, root: usize) -> Result<(), CommError> {
        if root >= self.size {
            return Err(CommError::InvalidRoot {
                root,
                size: self.size,
            });
        }
        Ok(())
    }
}

impl Communicator for ChannelComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast<T>(&self, data: &mut T, root: usize) -> Result<(), CommError>
    where
        T: Clone + Send + 'static,
    {
        self.check_root(root)?;

        if self.rank == root {
            for dst in (0..self.size).filter(|&dst| dst != root) {
                self.send(dst, data.clone())?;
            }
        } else {
            *data = self.recv(root)?;
        }
        Ok(())
    }

    fn gather<T>(&self, local: T, root: usize) -> Result<Option<Vec<T>>, CommError>
    where
        T: Send + 'static,
    {
        self.check_root(root)?;

        if self.rank != root {
            self.send(root, local)?;
            return Ok(None);
        }

        let mut own = Some(local);
        let mut gathered = Vec::with_capacity(self.size);
        for src in 0..self.size {
            if src == root {
                gathered.extend(own.take());
            } else {
                gathered.push(self.recv(src)?);
            }
        }
        Ok(Some(gathered))
    }
}

/// A fixed-size group of worker threads running the same program
///
/// Each call to [`WorkerPool::run`] wires a fresh channel mesh, starts one
/// thread per rank, and waits for all of them.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Creates a pool of `size` workers
    pub fn new(size: usize) -> Result<Self, CommError> {
        if size == 0 {
            return Err(CommError::EmptyPool);
        }
        Ok(Self { size })
    }

    /// Number of workers
    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `program` on every worker and returns the per-rank results in rank order
    ///
    /// A worker that panics makes the whole run fail with
    /// [`CommError::WorkerPanicked`]; its peers see disconnected links rather
    /// than blocking forever.
    pub fn run<F, R>(&self, program: F) -> Result<Vec<R>, CommError>
    where
        F: Fn(&ChannelComm) -> R + Sync,
        R: Send,
    {
        let endpoints = ChannelComm::mesh(self.size)?;
        let program = &program;

        let joined: Vec<thread::Result<R>> = thread::scope(|scope| {
            let handles: Vec<_> = endpoints
                .into_iter()
                .map(|comm| scope.spawn(move || program(&comm)))
                .collect();
            handles.into_iter().map(|handle| handle.join()).collect()
        });

        joined
            .into_iter()
            .enumerate()
            .map(|(rank, outcome)| outcome.map_err(|_| CommError::WorkerPanicked { rank }))
            .collect()
    }
}
