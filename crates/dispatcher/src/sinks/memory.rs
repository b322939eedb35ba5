//! MemorySink - keeps appended lines in memory, with optional failure injection

use std::collections::HashSet;

use contracts::{ContractError, OutputSink};
use tokio::sync::Mutex;
use tracing::trace;

#[derive(Debug, Default)]
struct MemoryState {
    lines: Vec<String>,
    closed: bool,
}

/// Sink that records lines instead of writing them anywhere
///
/// Lines registered with [`MemorySink::failing_on`] are rejected with a
/// simulated I/O error and never recorded.
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    fail_lines: HashSet<String>,
    state: Mutex<MemoryState>,
}

impl MemorySink {
    /// Create a new MemorySink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fail_lines: HashSet::new(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Reject appends of these exact lines
    pub fn failing_on<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fail_lines.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Lines appended so far, in append order
    pub async fn lines(&self) -> Vec<String> {
        self.state.lock().await.lines.clone()
    }

    /// Whether `close` has been called
    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }
}

impl OutputSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append(&self, line: &str) -> Result<(), ContractError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(ContractError::sink_closed(&self.name));
        }
        if self.fail_lines.contains(line) {
            return Err(ContractError::sink_write(
                &self.name,
                "writing to out file: simulated I/O error",
            ));
        }
        trace!(sink = %self.name, line, "line recorded");
        state.lines.push(line.to_string());
        Ok(())
    }

    async fn close(&self) -> Result<(), ContractError> {
        self.state.lock().await.closed = true;
        Ok(())
    }
}
