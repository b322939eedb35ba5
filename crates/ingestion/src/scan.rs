//! Directory scan used for dry runs: counts lines without dispatching them.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::instrument;

use crate::directory::list_data_files;
use crate::error::{IngestionError, Result};

/// Line count of one data file
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub lines: u64,
}

/// Line counts of a whole data directory
#[derive(Debug, Clone, Serialize)]
pub struct DirSummary {
    pub dir: PathBuf,
    pub files: Vec<FileSummary>,
    pub total_lines: u64,
}

/// Count the jobs a run over `dir` would submit.
///
/// Fails on the same conditions a real run would (unreadable directory,
/// unopenable or undecodable file).
#[instrument(name = "ingestion_scan_data_dir", skip(dir), fields(dir = %dir.display()))]
pub async fn scan_data_dir(dir: &Path) -> Result<DirSummary> {
    let mut files = Vec::new();
    for path in list_data_files(dir).await? {
        let lines = count_lines(&path).await?;
        files.push(FileSummary { path, lines });
    }

    let total_lines = files.iter().map(|f| f.lines).sum();
    Ok(DirSummary {
        dir: dir.to_path_buf(),
        files,
        total_lines,
    })
}

async fn count_lines(path: &Path) -> Result<u64> {
    let file = File::open(path)
        .await
        .map_err(|source| IngestionError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;

    let mut lines = BufReader::new(file).lines();
    let mut count = 0;
    while lines
        .next_line()
        .await
        .map_err(|source| IngestionError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?
        .is_some()
    {
        count += 1;
    }
    Ok(count)
}
