//! Job and outcome types exchanged between dispatcher, workers and collector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One unit of work: a single input line.
///
/// `seq` is the zero-based position in submission order. It carries no
/// meaning for processing and exists so failures can be traced back to
/// the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    seq: u64,
    line: String,
}

impl Job {
    pub fn new(seq: u64, line: impl Into<String>) -> Self {
        Self {
            seq,
            line: line.into(),
        }
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {:?}", self.seq, self.line)
    }
}

/// Outcome of processing one [`Job`].
///
/// Exactly one outcome is published per consumed job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// The line was appended to the output sink
    Succeeded,
    /// The append failed; the job is kept for diagnostics
    Failed { job: Job, reason: String },
}

impl JobOutcome {
    /// Build a failed outcome from any displayable cause
    pub fn failed(job: Job, reason: impl fmt::Display) -> Self {
        Self::Failed {
            job,
            reason: reason.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}
