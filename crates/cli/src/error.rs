//! Error types for CLI operations.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    /// Data directory unusable
    #[error("Error reading data directory {}: {message}", path.display())]
    DataDir { path: PathBuf, message: String },

    /// Output file could not be created
    #[error("Creating out file {} failed: {message}", path.display())]
    OutputFile { path: PathBuf, message: String },

    /// Pipeline execution error
    #[error("Pipeline execution failed: {message}")]
    PipelineExecution { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    pub fn data_dir(path: &Path, message: impl Into<String>) -> Self {
        Self::DataDir {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn output_file(path: &Path, message: impl Into<String>) -> Self {
        Self::OutputFile {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn pipeline_execution(message: impl Into<String>) -> Self {
        Self::PipelineExecution {
            message: message.into(),
        }
    }
}

