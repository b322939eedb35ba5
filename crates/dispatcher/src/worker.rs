//! Worker loop: pull a job, append it through the sink, report the outcome

use std::sync::Arc;
use std::time::Instant;

use async_channel::Receiver;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace, warn};

use contracts::{Job, JobOutcome, OutputSink};

use crate::metrics::PoolMetrics;

/// Process one job against the sink.
///
/// Never fails: a write error becomes [`JobOutcome::Failed`] carrying the job.
pub async fn process_job<S: OutputSink>(sink: &S, job: Job) -> JobOutcome {
    let started = Instant::now();
    let result = sink.append(job.line()).await;
    observability::record_append_latency_ms(sink.name(), started.elapsed().as_secs_f64() * 1000.0);

    match result {
        Ok(()) => JobOutcome::Succeeded,
        Err(e) => JobOutcome::failed(job, e),
    }
}

/// Worker task that consumes jobs until the queue is closed and drained
/// or the run is cancelled
#[instrument(
    name = "worker_loop",
    skip(jobs, results, sink, cancel, metrics),
    fields(worker = id)
)]
pub(crate) async fn run_worker<S>(
    id: usize,
    jobs: Receiver<Job>,
    results: mpsc::Sender<JobOutcome>,
    sink: Arc<S>,
    cancel: CancellationToken,
    metrics: Arc<PoolMetrics>,
) where
    S: OutputSink + Sync,
{
    metrics.worker_started();
    trace!(worker = id, "Worker started");

    let mut processed: u64 = 0;
    loop {
        let job = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(worker = id, processed, "Worker cancelled");
                break;
            }
            job = jobs.recv() => match job {
                Ok(job) => job,
                // Queue closed and drained
                Err(_) => break,
            },
        };

        let outcome = process_job(sink.as_ref(), job).await;
        processed += 1;

        if results.send(outcome).await.is_err() {
            warn!(worker = id, "Result channel closed, worker stopping");
            break;
        }
    }

    metrics.worker_stopped();
    trace!(worker = id, processed, "Worker stopped");
}
