//! # Dispatcher
//!
//! Bounded worker pool core.
//!
//! 负责：
//! - Job Queue / Result Channel (bounded, capacity = pool size by default)
//! - Fan-out of jobs to N workers, fan-in of lines into one shared sink
//! - Draining exactly one outcome per submitted job before reporting
//!
//! ## Usage Example
//!
//! ```ignore
//! use dispatcher::{create_file_sink, CancellationToken, Dispatcher, PoolConfig};
//! use ingestion::DataDirSource;
//!
//! let sink = create_file_sink("./output.csv").await?;
//! let dispatcher = Dispatcher::new(PoolConfig::with_workers(100), sink)?;
//! let source = DataDirSource::open("./data/names").await?;
//! let report = dispatcher.run(source, &CancellationToken::new()).await?;
//! println!("submitted={} failed={}", report.submitted, report.failed());
//! ```

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod pool;
pub mod report;
pub mod sinks;
pub mod worker;

pub use contracts::{Job, JobOutcome, JobSource, OutputSink, PoolConfig};
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use metrics::{MetricsSnapshot, PoolMetrics};
pub use pool::WorkerPool;
pub use report::RunReport;
pub use sinks::{create_file_sink, FileSink, MemorySink, SinkWriter};
pub use tokio_util::sync::CancellationToken;
pub use worker::process_job;
