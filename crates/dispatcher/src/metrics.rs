//! Pool metrics for observability

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Metrics for one worker pool run
///
/// Counters are mirrored to the `metrics` facade as they change.
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Jobs accepted by the job queue
    submitted: AtomicU64,
    /// Outcomes drained with success
    succeeded: AtomicU64,
    /// Outcomes drained with failure
    failed: AtomicU64,
    /// Workers currently running
    active_workers: AtomicUsize,
}

impl PoolMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get submitted count
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    /// Increment submitted count
    pub fn inc_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        observability::record_job_submitted();
    }

    /// Get success count
    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::Relaxed)
    }

    /// Get failure count
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Record one drained outcome
    pub fn record_outcome(&self, success: bool) {
        if success {
            self.succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
        observability::record_job_completed(success);
    }

    /// Get active worker count
    pub fn active_workers(&self) -> usize {
        self.active_workers.load(Ordering::Relaxed)
    }

    /// A worker entered its loop
    pub fn worker_started(&self) {
        let active = self.active_workers.fetch_add(1, Ordering::Relaxed) + 1;
        observability::record_active_workers(active);
    }

    /// A worker left its loop
    pub fn worker_stopped(&self) {
        let active = self.active_workers.fetch_sub(1, Ordering::Relaxed) - 1;
        observability::record_active_workers(active);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            submitted: self.submitted(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            active_workers: self.active_workers(),
        }
    }
}

/// Snapshot of pool metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub submitted: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub active_workers: usize,
}

impl MetricsSnapshot {
    /// Outcomes drained so far
    pub fn completed(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Jobs submitted but not yet drained
    pub fn in_flight(&self) -> u64 {
        self.submitted.saturating_sub(self.completed())
    }
}
