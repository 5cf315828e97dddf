//! # Bounded worker pool for ASYNC listeners.
//!
//! [`WorkerPool`] runs submitted [`Job`]s on a fixed number of worker tasks fed
//! by one bounded queue.
//!
//! ## Architecture
//! ```text
//! submit(job)
//!     │                       (shared, bounded)
//!     └──────────► [ queue ] ──┬──► worker 0 ──► job.run
//!                              ├──► worker 1 ──► job.run
//!                              └──► worker N ──► job.run
//! ```
//!
//! ## Rules
//! - **Submission order** is queue order; completion order is unspecified
//! - **Saturation**: `Block` waits for a free slot, `Reject` returns [`SubmitError::Full`]
//! - **Shutdown**: workers prefer cancellation over the queue, so jobs that
//!   have not started are discarded; running jobs get `grace` to finish
//! - **Reentrancy**: shutdown called from inside a job of the same pool does
//!   not wait for the worker running that job; a job of another pool is an
//!   ordinary caller

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::inflight::InFlight;
use crate::config::{EventConfig, SaturationPolicy};

tokio::task_local! {
    /// `(pool id, worker id)` of the worker driving the current job.
    static WORKER: (u64, usize);
}

static POOL_SEQ: AtomicU64 = AtomicU64::new(0);

/// One unit of ASYNC work: a listener invocation bound to its context.
pub(crate) struct Job {
    /// Listener name (for in-flight tracking).
    pub(crate) listener: &'static str,
    /// The invocation; failures are captured inside.
    pub(crate) run: BoxFuture<'static, ()>,
}

/// Why a job could not be queued.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SubmitError {
    /// Queue full under [`SaturationPolicy::Reject`].
    Full,
    /// Pool is shut down.
    Closed,
}

/// Outcome of [`WorkerPool::shutdown`].
#[derive(Debug, Default)]
pub(crate) struct ShutdownReport {
    /// Queued jobs that never started.
    pub(crate) discarded: usize,
    /// Listeners still running when the grace period ran out.
    pub(crate) stuck: Vec<&'static str>,
}

/// Fixed-size pool of workers sharing one bounded queue.
pub(crate) struct WorkerPool {
    id: u64,
    sender: mpsc::Sender<Job>,
    queue: Arc<Mutex<mpsc::Receiver<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    inflight: Arc<InFlight>,
    token: CancellationToken,
    capacity: usize,
    saturation: SaturationPolicy,
}

impl WorkerPool {
    /// Creates the queue and spawns the workers.
    ///
    /// Must be called within a tokio runtime.
    pub(crate) fn new(cfg: &EventConfig) -> Self {
        let capacity = cfg.queue_capacity_clamped();
        let size = cfg.pool_size_clamped();
        let (sender, rx) = mpsc::channel::<Job>(capacity);
        let queue = Arc::new(Mutex::new(rx));
        let inflight = Arc::new(InFlight::new());
        let token = CancellationToken::new();
        let pool_id = POOL_SEQ.fetch_add(1, Ordering::Relaxed);

        let workers = (0..size)
            .map(|worker| {
                tokio::spawn(worker_loop(
                    (pool_id, worker),
                    Arc::clone(&queue),
                    Arc::clone(&inflight),
                    token.clone(),
                ))
            })
            .collect();

        Self {
            id: pool_id,
            sender,
            queue,
            workers: Mutex::new(workers),
            inflight,
            token,
            capacity,
            saturation: cfg.saturation,
        }
    }

    /// Queue capacity in jobs.
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queues one job according to the saturation policy.
    pub(crate) async fn submit(&self, job: Job) -> Result<(), SubmitError> {
        if self.token.is_cancelled() {
            return Err(SubmitError::Closed);
        }
        match self.saturation {
            SaturationPolicy::Block => self
                .sender
                .send(job)
                .await
                .map_err(|_| SubmitError::Closed),
            SaturationPolicy::Reject => match self.sender.try_send(job) {
                Ok(()) => Ok(()),
                Err(mpsc::error::TrySendError::Full(_)) => Err(SubmitError::Full),
                Err(mpsc::error::TrySendError::Closed(_)) => Err(SubmitError::Closed),
            },
        }
    }

    /// Stops the pool: discard queued jobs, wait up to `grace` for running ones.
    ///
    /// Workers that are still busy after `grace` are detached, not aborted.
    pub(crate) async fn shutdown(&self, grace: Duration) -> ShutdownReport {
        self.token.cancel();

        let current = WORKER
            .try_with(|w| *w)
            .ok()
            .filter(|(pool, _)| *pool == self.id)
            .map(|(_, worker)| worker);
        let handles = std::mem::take(&mut *self.workers.lock().await);
        let others: Vec<JoinHandle<()>> = handles
            .into_iter()
            .enumerate()
            .filter(|(id, _)| Some(*id) != current)
            .map(|(_, h)| h)
            .collect();

        let done = async {
            for h in others {
                let _ = h.await;
            }
        };
        let stuck = match tokio::time::timeout(grace, done).await {
            Ok(()) => Vec::new(),
            Err(_) => self.inflight.snapshot_except(current).await,
        };

        let mut rx = self.queue.lock().await;
        rx.close();
        let mut discarded = 0;
        while rx.try_recv().is_ok() {
            discarded += 1;
        }

        if !stuck.is_empty() {
            warn!(?grace, ?stuck, "async listeners still running after grace; abandoning");
        }
        debug!(discarded, "worker pool stopped");
        ShutdownReport { discarded, stuck }
    }
}

async fn worker_loop(
    (pool_id, id): (u64, usize),
    queue: Arc<Mutex<mpsc::Receiver<Job>>>,
    inflight: Arc<InFlight>,
    token: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            job = async { queue.lock().await.recv().await } => job,
        };
        let Some(job) = next else { break };

        inflight.enter(id, job.listener).await;
        WORKER.scope((pool_id, id), job.run).await;
        inflight.leave(id).await;
    }
}
