//! Ingestion 错误类型

use std::path::PathBuf;

use thiserror::Error;

/// Ingestion 错误
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 无法列出数据目录
    #[error("failed to read data directory {}: {source}", path.display())]
    ReadDir {
        /// 目录路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// 无法打开数据文件
    #[error("couldn't open data file {}: {source}", path.display())]
    OpenFile {
        /// 文件路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// 读取数据文件失败
    #[error("error reading file {}: {source}", path.display())]
    ReadFile {
        /// 文件路径
        path: PathBuf,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// Mock 源注入的错误
    #[error("injected failure after {after} lines: {message}")]
    Injected {
        /// 已产出的行数
        after: u64,
        /// 错误消息
        message: String,
    },
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
