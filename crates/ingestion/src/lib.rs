//! # Ingestion
//!
//! Input line ingestion module.
//!
//! Responsibilities:
//! - Enumerate the data directory (file-name order, subdirectories skipped)
//! - Read each file as newline-delimited text, one line per job
//! - Surface every enumeration/open/read failure as a fatal `IngestionError`
//!
//! ## Usage Example
//!
//! ```ignore
//! use contracts::JobSource;
//! use ingestion::DataDirSource;
//!
//! let mut source = DataDirSource::open("./data/names").await?;
//! while let Some(line) = source.next_line().await? {
//!     // Submit line as a job
//! }
//! ```
//!
//! ## Testing
//!
//! ```ignore
//! use ingestion::MemorySource;
//!
//! let source = MemorySource::new(["x", "y"]).fail_after(1, "boom");
//! ```

mod config;
mod directory;
mod error;
mod memory;
mod scan;

// Re-exports
pub use config::{IngestionMetrics, MetricsSnapshot};
pub use directory::{list_data_files, DataDirSource};
pub use error::{IngestionError, Result};
pub use memory::MemorySource;
pub use scan::{scan_data_dir, DirSummary, FileSummary};
