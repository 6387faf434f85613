//! 归档写入服务 - 业务能力层
//!
//! 只负责"追加写 archived_results.txt"能力，不关心流程

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 归档写入服务
///
/// 职责：
/// - 把每次读到的原始结果文本原样追加到归档文件
/// - 每次调用打开、写入、落盘、关闭，不跨轮询持有文件句柄
pub struct ArchiveWriter {
    archive_path: PathBuf,
}

impl ArchiveWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            archive_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.archive_path
    }

    /// 追加原始文本
    ///
    /// 返回前会 `sync_all`，调用方可以放心截断结果文件
    pub async fn append(&self, raw: &str) -> Result<()> {
        debug!(
            "写入归档: {} | 长度: {}",
            self.archive_path.display(),
            raw.len()
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.archive_path)
            .await
            .with_context(|| format!("无法打开归档文件: {}", self.archive_path.display()))?;

        file.write_all(raw.as_bytes())
            .await
            .with_context(|| format!("写入归档文件失败: {}", self.archive_path.display()))?;
        file.sync_all().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArchiveWriter::new(dir.path().join("archived_results.txt"));

        writer.append("first\n").await.unwrap();
        writer.append("second\nthird").await.unwrap();

        let content = std::fs::read_to_string(writer.path()).unwrap();
        assert_eq!(content, "first\nsecond\nthird");
    }
}
