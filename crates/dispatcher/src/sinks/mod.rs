//! Sink implementations
//!
//! Contains FileSink and MemorySink.

mod file;
mod memory;

pub use self::file::{create_file_sink, FileSink, SinkWriter};
pub use self::memory::MemorySink;
