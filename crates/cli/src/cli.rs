//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use contracts::PoolConfig;

/// linepool - bounded worker pool that copies data file lines into one output file
#[derive(Parser, Debug, Clone)]
#[command(
    name = "linepool",
    author,
    version,
    about = "Bounded worker pool over the lines of a data directory",
    long_about = "Reads every file of the data directory line by line, hands each line \n\
                  to a fixed pool of workers and appends it to a single shared output \n\
                  file. Every flag can also be set through its environment variable."
)]
pub struct Cli {
    /// Whether or not to enable debug logging (accepts true/false, 1/0, yes/no, on/off)
    #[arg(
        long,
        env = "DEBUG",
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new(),
        value_name = "BOOL"
    )]
    pub debug: bool,

    /// The directory of data files
    #[arg(long, default_value = "./data/names", env = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// The path to output a csv
    #[arg(long, default_value = "./output.csv", env = "OUT_FILE")]
    pub out_file: PathBuf,

    /// The number of workers in the pool
    #[arg(long, default_value = "100", env = "NUM_WORKERS")]
    pub num_workers: usize,

    /// Job queue and result channel capacity (0 = num-workers)
    #[arg(long, default_value = "0", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        env = "LINEPOOL_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "LINEPOOL_METRICS_PORT")]
    pub metrics_port: u16,

    /// Scan the data directory and exit without writing the output file
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run summary as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,
}

impl Cli {
    /// Pool configuration derived from the flags
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            workers: self.num_workers,
            queue_capacity: if self.queue_capacity == 0 {
                None
            } else {
                Some(self.queue_capacity)
            },
        }
    }

    /// Metrics port, if enabled
    pub fn metrics_port(&self) -> Option<u16> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(self.metrics_port)
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
