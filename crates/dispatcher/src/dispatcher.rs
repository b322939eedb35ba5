//! Dispatcher - feeds the worker pool and collects one outcome per job
//!
//! Run phases: INIT → SPAWNING → SUBMITTING → CLOSING → DRAINING → DONE.
//! Draining runs concurrently with submission so a full result channel
//! never stalls the producer; the run still ends with an exact
//! `received == submitted` check.

use std::sync::Arc;
use std::time::Instant;

use async_channel::Sender;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use contracts::{Job, JobOutcome, JobSource, OutputSink, PoolConfig};

use crate::error::DispatchError;
use crate::metrics::PoolMetrics;
use crate::pool::WorkerPool;
use crate::report::RunReport;

/// Why submission stopped
enum SubmitEnd {
    Exhausted,
    Cancelled,
    QueueClosed,
    Source(Box<dyn std::error::Error + Send + Sync>),
}

struct Submission {
    submitted: u64,
    end: SubmitEnd,
}

#[derive(Default)]
struct Tally {
    succeeded: u64,
    failed_jobs: Vec<Job>,
}

impl Tally {
    fn received(&self) -> u64 {
        self.succeeded + self.failed_jobs.len() as u64
    }
}

/// Orchestrates one run of the worker pool over a job source
pub struct Dispatcher<S> {
    config: PoolConfig,
    sink: Arc<S>,
    metrics: Arc<PoolMetrics>,
}

impl<S> Dispatcher<S>
where
    S: OutputSink + Sync + 'static,
{
    /// Create a dispatcher owning `sink`
    pub fn new(config: PoolConfig, sink: S) -> Result<Self, DispatchError> {
        Self::with_shared_sink(config, Arc::new(sink))
    }

    /// Create a dispatcher over a sink the caller keeps a handle to
    pub fn with_shared_sink(config: PoolConfig, sink: Arc<S>) -> Result<Self, DispatchError> {
        config.validate()?;
        Ok(Self {
            config,
            sink,
            metrics: Arc::new(PoolMetrics::new()),
        })
    }

    /// Shared metrics, readable while the run is in progress
    pub fn metrics(&self) -> Arc<PoolMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run every line of `source` through the pool.
    ///
    /// Returns once every worker has stopped. `cancel` is the caller's
    /// shutdown signal; the run derives its own child token from it, which
    /// is also fired when the source fails.
    ///
    /// # Errors
    /// - [`DispatchError::Source`] when the source fails (fatal, no salvage)
    /// - [`DispatchError::Cancelled`] when `cancel` fires before every outcome is drained
    /// - [`DispatchError::Sink`] when the sink cannot be closed
    #[instrument(
        name = "dispatcher_run",
        skip(self, source, cancel),
        fields(workers = self.config.workers, source = %source.describe())
    )]
    pub async fn run<Src>(
        self,
        mut source: Src,
        cancel: &CancellationToken,
    ) -> Result<RunReport, DispatchError>
    where
        Src: JobSource,
    {
        let start_time = Instant::now();
        let workers = self.config.workers;
        let capacity = self.config.capacity();
        let run_token = cancel.child_token();

        // INIT
        let (jobs_tx, jobs_rx) = async_channel::bounded::<Job>(capacity);
        let (results_tx, results_rx) = mpsc::channel::<JobOutcome>(capacity);
        debug!(capacity, "Job queue and result channel allocated");

        // SPAWNING
        let pool = WorkerPool::spawn(
            workers,
            jobs_rx,
            results_tx,
            Arc::clone(&self.sink),
            run_token.clone(),
            Arc::clone(&self.metrics),
        );
        debug!(workers = pool.size(), "Worker pool started, submitting jobs");

        // SUBMITTING → CLOSING, with DRAINING alongside
        let (submission, tally) = tokio::join!(
            submit_all(&mut source, jobs_tx, &run_token, &self.metrics),
            collect_outcomes(results_rx, &self.metrics),
        );

        let panicked = pool.join().await;
        if panicked > 0 {
            warn!(panicked, "Some workers panicked");
        }

        let submitted = submission.submitted;
        let received = tally.received();
        let cancelled = run_token.is_cancelled();
        // Release the run token on every path
        run_token.cancel();

        match submission.end {
            SubmitEnd::Exhausted => {}
            SubmitEnd::Source(source) => {
                return Err(DispatchError::Source { submitted, source });
            }
            SubmitEnd::QueueClosed => return Err(DispatchError::QueueClosed { submitted }),
            SubmitEnd::Cancelled => {
                warn!(submitted, received, "Run cancelled during submission");
                return Err(DispatchError::Cancelled {
                    submitted,
                    received,
                });
            }
        }

        if received != submitted {
            if cancelled {
                warn!(submitted, received, "Run cancelled while draining");
                return Err(DispatchError::Cancelled {
                    submitted,
                    received,
                });
            }
            return Err(DispatchError::ResultCountMismatch {
                submitted,
                received,
            });
        }

        // DONE
        self.sink.close().await.map_err(DispatchError::Sink)?;

        let report = RunReport {
            submitted,
            succeeded: tally.succeeded,
            failed_jobs: tally.failed_jobs,
            workers,
            duration: start_time.elapsed(),
        };

        info!(
            count = report.submitted,
            failed = report.failed(),
            duration_secs = report.duration.as_secs_f64(),
            "Finished running all jobs"
        );

        Ok(report)
    }
}

/// Feed every source line into the queue, then close it
async fn submit_all<Src: JobSource>(
    source: &mut Src,
    jobs: Sender<Job>,
    cancel: &CancellationToken,
    metrics: &PoolMetrics,
) -> Submission {
    let mut submitted: u64 = 0;

    let end = loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => break SubmitEnd::Cancelled,
            next = source.next_line() => next,
        };

        let line = match next {
            Ok(Some(line)) => line,
            Ok(None) => break SubmitEnd::Exhausted,
            Err(e) => {
                error!(error = %e, submitted, "Error reading job source");
                cancel.cancel();
                break SubmitEnd::Source(Box::new(e));
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break SubmitEnd::Cancelled,
            sent = jobs.send(Job::new(submitted, line)) => {
                if sent.is_err() {
                    error!(submitted, "Job queue closed unexpectedly");
                    break SubmitEnd::QueueClosed;
                }
            }
        }

        submitted += 1;
        metrics.inc_submitted();
    };

    // CLOSING
    jobs.close();
    debug!(count = submitted, "Launched all jobs, queue closed");

    Submission { submitted, end }
}

/// Drain outcomes until every worker has dropped its result sender
async fn collect_outcomes(
    mut results: mpsc::Receiver<JobOutcome>,
    metrics: &PoolMetrics,
) -> Tally {
    let mut tally = Tally::default();

    while let Some(outcome) = results.recv().await {
        metrics.record_outcome(outcome.is_success());

        match outcome {
            JobOutcome::Succeeded => tally.succeeded += 1,
            JobOutcome::Failed { job, reason } => {
                error!(seq = job.seq(), line = %job.line(), error = %reason, "Error running job");
                tally.failed_jobs.push(job);
            }
        }

        if tally.received() % 1000 == 0 {
            debug!(drained = tally.received(), "Collector progress");
        }
    }

    debug!(drained = tally.received(), "Result channel drained");
    tally
}
