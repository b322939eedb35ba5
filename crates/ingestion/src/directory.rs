//! Data directory source: every regular file of a directory, line by line.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contracts::JobSource;
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, instrument};

use crate::config::IngestionMetrics;
use crate::error::{IngestionError, Result};

/// List the data files of `dir` in file-name order.
///
/// Subdirectories are skipped. Any error while enumerating is returned as
/// [`IngestionError::ReadDir`].
#[instrument(name = "ingestion_list_data_files", skip(dir), fields(dir = %dir.display()))]
pub async fn list_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir_err = |source| IngestionError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(read_dir_err)?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
        let file_type = entry.file_type().await.map_err(read_dir_err)?;
        if file_type.is_dir() {
            debug!(path = %entry.path().display(), "skipping subdirectory");
            continue;
        }
        files.push(entry.path());
    }

    files.sort();
    Ok(files)
}

struct OpenDataFile {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

/// Line source over the files of a data directory
///
/// Files are opened lazily one at a time, in the order returned by
/// [`list_data_files`]; lines keep their in-file order.
pub struct DataDirSource {
    dir: PathBuf,
    file_count: usize,
    pending: VecDeque<PathBuf>,
    current: Option<OpenDataFile>,
    metrics: Arc<IngestionMetrics>,
}

impl DataDirSource {
    /// Enumerate `dir` and prepare to read its files
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let files = list_data_files(&dir).await?;
        debug!(dir = %dir.display(), count = files.len(), "collected data files");

        Ok(Self {
            dir,
            file_count: files.len(),
            pending: files.into(),
            current: None,
            metrics: Arc::new(IngestionMetrics::new()),
        })
    }

    /// Number of data files found when the source was opened
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    async fn open_file(&mut self, path: PathBuf) -> Result<()> {
        debug!(path = %path.display(), "launching jobs for lines in file");
        let file = File::open(&path)
            .await
            .map_err(|source| IngestionError::OpenFile {
                path: path.clone(),
                source,
            })?;
        self.metrics.record_file_opened();
        self.current = Some(OpenDataFile {
            path,
            lines: BufReader::new(file).lines(),
        });
        Ok(())
    }
}

impl JobSource for DataDirSource {
    type Error = IngestionError;

    fn describe(&self) -> String {
        format!("data directory {}", self.dir.display())
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(file) = self.current.as_mut() {
                match file.lines.next_line().await {
                    Ok(Some(line)) => {
                        self.metrics.record_line();
                        return Ok(Some(line));
                    }
                    Ok(None) => {
                        debug!(path = %file.path.display(), "finished launching jobs for lines in file");
                        self.metrics.record_file_finished();
                        self.current = None;
                    }
                    Err(source) => {
                        return Err(IngestionError::ReadFile {
                            path: file.path.clone(),
                            source,
                        });
                    }
                }
                continue;
            }

            match self.pending.pop_front() {
                Some(path) => self.open_file(path).await?,
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as stdfs;
    use tempfile::tempdir;

    async fn drain(source: &mut DataDirSource) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = source.next_line().await.unwrap() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn test_reads_files_in_name_order() {
        let dir = tempdir().unwrap();
        stdfs::write(dir.path().join("b.txt"), "z\n").unwrap();
        stdfs::write(dir.path().join("a.txt"), "x\ny\n").unwrap();

        let mut source = DataDirSource::open(dir.path()).await.unwrap();
        assert_eq!(source.file_count(), 2);
        assert_eq!(drain(&mut source).await, vec!["x", "y", "z"]);

        let snapshot = source.metrics().snapshot();
        assert_eq!(snapshot.files_opened, 2);
        assert_eq!(snapshot.files_finished, 2);
        assert_eq!(snapshot.lines_read, 3);
    }

    #[tokio::test]
    async fn test_line_terminators() {
        let dir = tempdir().unwrap();
        stdfs::write(dir.path().join("names.csv"), "a\r\n\nb").unwrap();

        let mut source = DataDirSource::open(dir.path()).await.unwrap();
        assert_eq!(drain(&mut source).await, vec!["a", "", "b"]);
    }

    #[tokio::test]
    async fn test_empty_directory() {
        let dir = tempdir().unwrap();

        let mut source = DataDirSource::open(dir.path()).await.unwrap();
        assert_eq!(source.file_count(), 0);
        assert!(source.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_subdirectories_skipped() {
        let dir = tempdir().unwrap();
        stdfs::create_dir(dir.path().join("nested")).unwrap();
        stdfs::write(dir.path().join("nested").join("inner.txt"), "hidden\n").unwrap();
        stdfs::write(dir.path().join("top.txt"), "visible\n").unwrap();

        let mut source = DataDirSource::open(dir.path()).await.unwrap();
        assert_eq!(drain(&mut source).await, vec!["visible"]);
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = DataDirSource::open(&missing).await;
        assert!(matches!(result, Err(IngestionError::ReadDir { .. })));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_read_error() {
        let dir = tempdir().unwrap();
        stdfs::write(dir.path().join("a.txt"), "ok\n").unwrap();
        stdfs::write(dir.path().join("b.bin"), [0xff, 0xfe, b'\n']).unwrap();

        let mut source = DataDirSource::open(dir.path()).await.unwrap();
        assert_eq!(source.next_line().await.unwrap().as_deref(), Some("ok"));

        let err = source.next_line().await.unwrap_err();
        match err {
            IngestionError::ReadFile { path, .. } => assert!(path.ends_with("b.bin")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_file_removed_after_listing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gone.txt");
        stdfs::write(&path, "x\n").unwrap();

        let mut source = DataDirSource::open(dir.path()).await.unwrap();
        stdfs::remove_file(&path).unwrap();

        let result = source.next_line().await;
        assert!(matches!(result, Err(IngestionError::OpenFile { .. })));
    }
}
