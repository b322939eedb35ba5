//! FileSink - appends lines to a single shared output file

use std::future::Future;
use std::io::{self, SeekFrom};
use std::path::Path;

use contracts::{ContractError, OutputSink};
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

use crate::error::DispatchError;

/// Writer a [`FileSink`] can roll back after a failed append
pub trait SinkWriter: AsyncWrite + Unpin + Send + Sync {
    /// Drop every byte past `len` and continue writing from there
    fn truncate_to(&mut self, len: u64) -> impl Future<Output = io::Result<()>> + Send;

    /// Make written bytes durable
    fn sync(&mut self) -> impl Future<Output = io::Result<()>> + Send {
        async { Ok(()) }
    }
}

impl SinkWriter for File {
    async fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len).await?;
        self.seek(SeekFrom::Start(len)).await?;
        Ok(())
    }

    async fn sync(&mut self) -> io::Result<()> {
        self.sync_all().await
    }
}

impl SinkWriter for Vec<u8> {
    async fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.truncate(len as usize);
        Ok(())
    }
}

struct WriterState<W> {
    writer: W,
    /// Length of the output up to the last complete line
    committed: u64,
}

/// Sink that appends lines to one writer behind a mutex
///
/// The lock is held for exactly one `write_all` + `flush`, so lines coming
/// from different workers never interleave and nothing stays buffered
/// between appends. A failed append is rolled back to the last complete
/// line before the lock is released; if that rollback fails the sink is
/// closed.
pub struct FileSink<W = File> {
    name: String,
    writer: Mutex<Option<WriterState<W>>>,
}

impl FileSink<File> {
    /// Create (or truncate) the file at `path`
    pub async fn create(name: impl Into<String>, path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path).await?;
        Ok(Self::from_writer(name, file))
    }
}

impl<W: SinkWriter> FileSink<W> {
    /// Wrap an already open, empty writer
    pub fn from_writer(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer: Mutex::new(Some(WriterState {
                writer,
                committed: 0,
            })),
        }
    }

    /// Take the writer back; `None` once the sink is closed
    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().map(|state| state.writer)
    }

    fn write_error(&self, e: io::Error) -> ContractError {
        ContractError::sink_write(&self.name, format!("writing to out file: {e}"))
    }
}

async fn write_record<W: SinkWriter>(writer: &mut W, record: &[u8]) -> io::Result<()> {
    writer.write_all(record).await?;
    writer.flush().await
}

impl<W: SinkWriter> OutputSink for FileSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append(&self, line: &str) -> Result<(), ContractError> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');

        let mut guard = self.writer.lock().await;
        let state = guard
            .as_mut()
            .ok_or_else(|| ContractError::sink_closed(&self.name))?;

        let Err(e) = write_record(&mut state.writer, record.as_bytes()).await else {
            state.committed += record.len() as u64;
            return Ok(());
        };

        // Part of the record may have reached the writer
        let rollback = state.writer.truncate_to(state.committed).await;
        if let Err(rollback) = rollback {
            error!(
                sink = %self.name,
                error = %rollback,
                "Failed to discard partial line, closing sink"
            );
            *guard = None;
        }
        Err(self.write_error(e))
    }

    #[instrument(name = "file_sink_close", skip(self), fields(sink = %self.name))]
    async fn close(&self) -> Result<(), ContractError> {
        let state = self.writer.lock().await.take();
        if let Some(mut state) = state {
            state.writer.shutdown().await?;
            state.writer.sync().await?;
            debug!(sink = %self.name, bytes = state.committed, "FileSink closed");
        }
        Ok(())
    }
}

/// Create the output file sink, mapping failures to [`DispatchError::SinkCreation`]
pub async fn create_file_sink(path: impl AsRef<Path>) -> Result<FileSink<File>, DispatchError> {
    let path = path.as_ref();
    let name = path.display().to_string();
    FileSink::create(name.clone(), path)
        .await
        .map_err(|e| DispatchError::sink_creation(name, format!("creating out file: {e}")))
}
