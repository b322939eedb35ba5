//! Ingestion metrics

use std::sync::atomic::{AtomicU64, Ordering};

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Data files opened
    pub files_opened: AtomicU64,

    /// Data files read to the end
    pub files_finished: AtomicU64,

    /// Lines handed out
    pub lines_read: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file being opened
    pub fn record_file_opened(&self) {
        self.files_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a file being exhausted
    pub fn record_file_finished(&self) {
        self.files_finished.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one line read
    pub fn record_line(&self) {
        self.lines_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_opened: self.files_opened.load(Ordering::Relaxed),
            files_finished: self.files_finished.load(Ordering::Relaxed),
            lines_read: self.lines_read.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Data files opened
    pub files_opened: u64,

    /// Data files read to the end
    pub files_finished: u64,

    /// Lines handed out
    pub lines_read: u64,
}
