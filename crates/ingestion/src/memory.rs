//! 内存行源
//!
//! 用于无数据目录的测试。

use std::collections::VecDeque;

use contracts::JobSource;
use tracing::trace;

use crate::error::{IngestionError, Result};

/// 内存行源
///
/// 按顺序产出预设的行，可选在产出指定行数后注入错误。
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    lines: VecDeque<String>,
    yielded: u64,
    fail_after: Option<(u64, String)>,
}

impl MemorySource {
    /// 创建新的内存行源
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            yielded: 0,
            fail_after: None,
        }
    }

    /// 产出 `after` 行后返回错误
    pub fn fail_after(mut self, after: u64, message: impl Into<String>) -> Self {
        self.fail_after = Some((after, message.into()));
        self
    }
}

impl JobSource for MemorySource {
    type Error = IngestionError;

    fn describe(&self) -> String {
        format!("memory source ({} lines)", self.lines.len())
    }

    async fn next_line(&mut self) -> Result<Option<String>> {
        if let Some((after, message)) = &self.fail_after {
            if self.yielded >= *after {
                return Err(IngestionError::Injected {
                    after: *after,
                    message: message.clone(),
                });
            }
        }

        let line = self.lines.pop_front();
        if line.is_some() {
            self.yielded += 1;
            trace!(yielded = self.yielded, "memory source line");
        }
        Ok(line)
    }
}
