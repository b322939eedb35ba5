//! Run report returned once every submitted job has been drained

use std::time::Duration;

use contracts::Job;

/// Final counts of a completed run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Jobs submitted to the queue
    pub submitted: u64,

    /// Jobs whose line reached the sink
    pub succeeded: u64,

    /// Jobs whose append failed, in drain order
    pub failed_jobs: Vec<Job>,

    /// Pool size used for the run
    pub workers: usize,

    /// Wall time from INIT to DONE
    pub duration: Duration,
}

impl RunReport {
    /// Number of failed jobs
    pub fn failed(&self) -> u64 {
        self.failed_jobs.len() as u64
    }

    /// True when no job failed
    pub fn is_clean(&self) -> bool {
        self.failed_jobs.is_empty()
    }

    /// Completed jobs per second
    pub fn throughput(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.submitted as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Failure rate as percentage
    pub fn failure_rate(&self) -> f64 {
        if self.submitted > 0 {
            (self.failed() as f64 / self.submitted as f64) * 100.0
        } else {
            0.0
        }
    }
}
