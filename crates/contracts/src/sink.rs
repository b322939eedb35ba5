//! OutputSink trait - the shared append destination of the worker pool
//!
//! Defines the abstract interface for sinks.

use crate::ContractError;

/// Shared line output trait
///
/// Implementations are shared by every worker (`&self` receivers) and must
/// serialize appends internally: one append is never interleaved with
/// another at the byte level.
#[trait_variant::make(OutputSink: Send)]
pub trait LocalOutputSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Append `line` followed by a line terminator
    ///
    /// # Errors
    /// Returns write error (should include context). A failed append leaves
    /// the sink usable for later appends.
    async fn append(&self, line: &str) -> Result<(), ContractError>;

    /// Flush and close the sink; later appends fail
    async fn close(&self) -> Result<(), ContractError>;
}
