//! WorkerPool - a fixed set of worker tasks sharing one queue, channel and sink

use std::sync::Arc;

use async_channel::Receiver;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument};

use contracts::{Job, JobOutcome, OutputSink};

use crate::metrics::PoolMetrics;
use crate::worker::run_worker;

/// Handle to the running worker tasks
pub struct WorkerPool {
    /// Worker task handles, indexed by worker id
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `size` workers
    ///
    /// The pool takes ownership of the queue receiver and the result sender:
    /// once every worker has stopped, the result channel closes.
    pub fn spawn<S>(
        size: usize,
        jobs: Receiver<Job>,
        results: mpsc::Sender<JobOutcome>,
        sink: Arc<S>,
        cancel: CancellationToken,
        metrics: Arc<PoolMetrics>,
    ) -> Self
    where
        S: OutputSink + Sync + 'static,
    {
        let handles = (0..size)
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    jobs.clone(),
                    results.clone(),
                    Arc::clone(&sink),
                    cancel.clone(),
                    Arc::clone(&metrics),
                ))
            })
            .collect();

        debug!(count = size, "spawned workers");
        Self { handles }
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to stop
    ///
    /// Returns the number of workers that panicked.
    #[instrument(name = "worker_pool_join", skip(self), fields(size = self.handles.len()))]
    pub async fn join(self) -> usize {
        let mut panicked = 0;
        for (id, handle) in self.handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                error!(worker = id, error = ?e, "Worker task panicked");
                panicked += 1;
            }
        }
        debug!(panicked, "WorkerPool joined");
        panicked
    }
}
