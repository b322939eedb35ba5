//! Dispatcher error types

use thiserror::Error;

use contracts::ContractError;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Pool configuration rejected
    #[error("invalid pool configuration: {0}")]
    Config(#[from] ContractError),

    /// Sink creation error
    #[error("failed to create sink '{name}': {message}")]
    SinkCreation { name: String, message: String },

    /// The job source failed; the run was aborted
    #[error("job source failed after {submitted} jobs: {source}")]
    Source {
        submitted: u64,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Every worker is gone while jobs were still being submitted
    #[error("job queue closed after {submitted} jobs with no worker left")]
    QueueClosed { submitted: u64 },

    /// The run was cancelled before every result was drained
    #[error("run cancelled: {received} of {submitted} results drained")]
    Cancelled { submitted: u64, received: u64 },

    /// Workers stopped without reporting every job
    #[error("expected {submitted} results, drained {received}")]
    ResultCountMismatch { submitted: u64, received: u64 },

    /// Closing the sink failed
    #[error("sink error: {0}")]
    Sink(#[source] ContractError),
}

impl DispatchError {
    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Number of jobs submitted before the run failed, when known
    pub fn submitted(&self) -> Option<u64> {
        match self {
            Self::Source { submitted, .. }
            | Self::QueueClosed { submitted }
            | Self::Cancelled { submitted, .. }
            | Self::ResultCountMismatch { submitted, .. } => Some(*submitted),
            _ => None,
        }
    }
}
