//! JobSource trait - ordered supply of input lines
//!
//! Decouples the dispatcher from where lines come from (a data directory,
//! an in-memory list in tests).

/// Ordered source of input lines
///
/// Lines are yielded in submission order. `Ok(None)` marks exhaustion and
/// any error is fatal for the run that consumes the source.
#[trait_variant::make(JobSource: Send)]
pub trait LocalJobSource {
    /// Error raised when the source cannot produce the next line
    type Error: std::error::Error + Send + Sync + 'static;

    /// Human readable description (used for logging)
    fn describe(&self) -> String;

    /// Next input line, or `None` once every input is exhausted
    async fn next_line(&mut self) -> Result<Option<String>, Self::Error>;
}
