//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 数据目录 → 工作池 → 输出文件 的完整链路
//! - 行数守恒、无交错写入、失败隔离
//! - 致命错误与取消语义

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // 验证 contracts crate 可编译
        let config = contracts::PoolConfig::default();
        assert_eq!(config.workers, contracts::DEFAULT_WORKERS);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashSet;
    use std::fs;
    use std::io;
    use std::path::Path;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};
    use std::time::Duration;

    use contracts::{ContractError, OutputSink, PoolConfig};
    use dispatcher::{
        create_file_sink, CancellationToken, DispatchError, Dispatcher, FileSink, MemorySink,
        SinkWriter,
    };
    use ingestion::{DataDirSource, IngestionError};
    use tempfile::{tempdir, TempDir};
    use tokio::io::AsyncWrite;

    fn write_data_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn sorted_lines(path: &Path) -> Vec<String> {
        let mut lines: Vec<String> = fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        lines.sort();
        lines
    }

    /// Run the full pipeline over `data_dir` into `out_dir/output.csv`
    async fn run_to_file(data_dir: &Path, out_dir: &Path, workers: usize) -> dispatcher::RunReport {
        let out_file = out_dir.join("output.csv");
        let sink = create_file_sink(&out_file).await.unwrap();
        let source = DataDirSource::open(data_dir).await.unwrap();
        Dispatcher::new(PoolConfig::with_workers(workers), sink)
            .unwrap()
            .run(source, &CancellationToken::new())
            .await
            .unwrap()
    }

    /// End-to-end test: two data files, pool of 4
    ///
    /// 验证完整的数据流：
    /// 1. DataDirSource 按文件名顺序读出所有行
    /// 2. 工作池并发写入同一输出文件
    /// 3. 提交数 == 回收数，无失败
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_two_files() {
        let data = write_data_dir(&[("a.txt", "x\ny\n"), ("b.txt", "z\n")]);
        let out = tempdir().unwrap();

        let report = run_to_file(data.path(), out.path(), 4).await;

        assert_eq!(report.submitted, 3);
        assert_eq!(report.failed(), 0);
        assert_eq!(sorted_lines(&out.path().join("output.csv")), vec!["x", "y", "z"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_forced_write_failure() {
        let data = write_data_dir(&[("a.txt", "alice\nbad\nbob\n"), ("b.txt", "carol\n")]);
        let sink = Arc::new(MemorySink::new("mem").failing_on(["bad"]));
        let source = DataDirSource::open(data.path()).await.unwrap();

        let report = Dispatcher::with_shared_sink(PoolConfig::with_workers(4), Arc::clone(&sink))
            .unwrap()
            .run(source, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(report.submitted, 4);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_jobs[0].line(), "bad");

        let mut lines = sink.lines().await;
        lines.sort();
        assert_eq!(lines, vec!["alice", "bob", "carol"]);
    }

    /// Writer that lets 3 bytes of a `bad` line through, then fails.
    /// The buffer is shared so it can be read after the sink is closed.
    #[derive(Default)]
    struct ShortWriter {
        written: Arc<Mutex<Vec<u8>>>,
        fail_next: bool,
    }

    impl AsyncWrite for ShortWriter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            if self.fail_next {
                self.fail_next = false;
                return Poll::Ready(Err(io::Error::other("disk full")));
            }
            let accepted = if buf.starts_with(b"bad") {
                self.fail_next = true;
                3
            } else {
                buf.len()
            };
            self.written.lock().unwrap().extend_from_slice(&buf[..accepted]);
            Poll::Ready(Ok(accepted))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    impl SinkWriter for ShortWriter {
        async fn truncate_to(&mut self, len: u64) -> io::Result<()> {
            self.written.lock().unwrap().truncate(len as usize);
            Ok(())
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_forced_write_failure_to_file() {
        let content: String = (0..200).map(|i| format!("name-{i}\n")).collect();
        let data = write_data_dir(&[("a.txt", &content), ("b.txt", "bad\nlast\n")]);
        let writer = ShortWriter::default();
        let written = Arc::clone(&writer.written);
        let source = DataDirSource::open(data.path()).await.unwrap();

        let report = Dispatcher::new(
            PoolConfig::with_workers(8),
            FileSink::from_writer("out", writer),
        )
        .unwrap()
        .run(source, &CancellationToken::new())
        .await
        .unwrap();

        assert_eq!(report.submitted, 202);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_jobs[0].line(), "bad");

        let output = String::from_utf8(written.lock().unwrap().clone()).unwrap();
        assert!(output.ends_with('\n'));
        let mut lines: Vec<&str> = output.lines().collect();
        lines.sort();
        let mut expected: Vec<String> = (0..200).map(|i| format!("name-{i}")).collect();
        expected.push("last".to_string());
        expected.sort();
        assert_eq!(lines, expected);
    }

    #[tokio::test]
    async fn test_e2e_empty_data_dir() {
        let data = tempdir().unwrap();
        let out = tempdir().unwrap();

        let report = run_to_file(data.path(), out.path(), 100).await;

        assert_eq!(report.submitted, 0);
        assert_eq!(report.succeeded, 0);
        assert!(report.is_clean());

        let out_file = out.path().join("output.csv");
        assert!(out_file.exists());
        assert_eq!(fs::read_to_string(out_file).unwrap(), "");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_pool_size_does_not_change_output() {
        let content: String = (0..500).map(|i| format!("name-{i},{}\n", i % 7)).collect();
        let dup = "dup\ndup\ndup\n";
        let data = write_data_dir(&[("a.csv", &content), ("b.csv", dup)]);

        let single = tempdir().unwrap();
        let pooled = tempdir().unwrap();
        let single_report = run_to_file(data.path(), single.path(), 1).await;
        let pooled_report = run_to_file(data.path(), pooled.path(), 100).await;

        assert_eq!(single_report.submitted, 503);
        assert_eq!(pooled_report.submitted, 503);
        assert_eq!(
            sorted_lines(&single.path().join("output.csv")),
            sorted_lines(&pooled.path().join("output.csv"))
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_e2e_no_partial_lines() {
        let content: String = (0..2000)
            .map(|i| format!("{i:05}-{}\n", "abcdefgh".repeat(32)))
            .collect();
        let data = write_data_dir(&[("long.txt", &content)]);
        let out = tempdir().unwrap();

        let report = run_to_file(data.path(), out.path(), 16).await;
        assert_eq!(report.submitted, 2000);

        let expected: HashSet<String> = content.lines().map(str::to_string).collect();
        let written = sorted_lines(&out.path().join("output.csv"));
        assert_eq!(written.len(), 2000);
        assert!(written.iter().all(|line| expected.contains(line)));
    }

    #[tokio::test]
    async fn test_e2e_unreadable_file_is_fatal() {
        let data = tempdir().unwrap();
        fs::write(data.path().join("a.txt"), "ok\n").unwrap();
        fs::write(data.path().join("b.txt"), [0xc3, 0x28, b'\n']).unwrap();

        let source = DataDirSource::open(data.path()).await.unwrap();
        let err = Dispatcher::new(PoolConfig::with_workers(2), MemorySink::new("mem"))
            .unwrap()
            .run(source, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            DispatchError::Source { submitted, source } => {
                assert_eq!(submitted, 1);
                assert!(source.downcast_ref::<IngestionError>().is_some());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_e2e_missing_data_dir() {
        let data = tempdir().unwrap();
        let result = DataDirSource::open(data.path().join("names")).await;
        assert!(matches!(result, Err(IngestionError::ReadDir { .. })));
    }

    /// Sink that takes a while per line
    struct SlowSink {
        inner: MemorySink,
        delay: Duration,
    }

    impl OutputSink for SlowSink {
        fn name(&self) -> &str {
            "slow"
        }

        async fn append(&self, line: &str) -> Result<(), ContractError> {
            tokio::time::sleep(self.delay).await;
            self.inner.append(line).await
        }

        async fn close(&self) -> Result<(), ContractError> {
            self.inner.close().await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_e2e_cancel_mid_run() {
        let content: String = (0..1000).map(|i| format!("line-{i}\n")).collect();
        let data = write_data_dir(&[("a.txt", &content)]);
        let source = DataDirSource::open(data.path()).await.unwrap();

        let sink = Arc::new(SlowSink {
            inner: MemorySink::new("mem"),
            delay: Duration::from_millis(10),
        });
        let dispatcher =
            Dispatcher::with_shared_sink(PoolConfig::with_workers(2), Arc::clone(&sink)).unwrap();

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = dispatcher.run(source, &cancel).await.unwrap_err();
        match err {
            DispatchError::Cancelled {
                submitted,
                received,
            } => {
                assert!(submitted < 1000);
                assert!(received <= submitted);
            }
            other => panic!("unexpected error: {other}"),
        }

        // Every worker has stopped: nothing is written after the run returns
        let written = sink.inner.lines().await.len();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sink.inner.lines().await.len(), written);
        assert!(!sink.inner.is_closed().await);
    }
}
