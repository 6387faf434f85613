//! 结果处理流程 - 流程层
//!
//! 核心职责：处理"一次文件变化"
//!
//! 流程顺序：
//! 1. 读取结果文件全部内容
//! 2. 逐行 解析 → 查找任务分配 → 提交（单行失败只记录日志）
//! 3. 原样追加到归档文件
//! 4. 归档成功后清空结果文件

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tracing::{info, warn};

use crate::clients::{ResultSubmitter, SubmissionRequest, SubmitOptions};
use crate::error::AppResult;
use crate::models::AssignmentRegistry;
use crate::services::{ArchiveWriter, ResultLineParser};

/// 单行处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineResult {
    /// 已提交
    Submitted,
    /// 跳过（不是结果行）
    Skipped,
}

/// 单次处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    pub lines: usize,
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// 结果处理流程
///
/// - 持有解析器、任务分配表、提交客户端和归档服务
/// - 不关心何时被调用，轮询由 `FileWatcher` 负责
pub struct ResultProcessor {
    parser: ResultLineParser,
    registry: AssignmentRegistry,
    submitter: Arc<dyn ResultSubmitter>,
    options: SubmitOptions,
    archive: ArchiveWriter,
}

impl ResultProcessor {
    pub fn new(
        registry: AssignmentRegistry,
        submitter: Arc<dyn ResultSubmitter>,
        options: SubmitOptions,
        archive: ArchiveWriter,
    ) -> Result<Self> {
        Ok(Self {
            parser: ResultLineParser::new().context("无法编译结果行正则")?,
            registry,
            submitter,
            options,
            archive,
        })
    }

    /// 处理结果文件中的全部新内容
    ///
    /// 内容为空时既不提交也不归档。归档或清空失败会向上返回
    pub async fn process(&self, results_path: &Path) -> Result<ProcessStats> {
        let content = tokio::fs::read_to_string(results_path)
            .await
            .with_context(|| format!("无法读取结果文件: {}", results_path.display()))?;

        if content.is_empty() {
            return Ok(ProcessStats::default());
        }

        let stats = self.submit_results(&content).await;

        self.archive.append(&content).await?;
        truncate(results_path).await?;

        Ok(stats)
    }

    /// 逐行提交，单行失败不影响后续行
    pub async fn submit_results(&self, content: &str) -> ProcessStats {
        let mut stats = ProcessStats::default();

        for line in content.lines().filter(|line| !line.trim().is_empty()) {
            stats.lines += 1;
            match self.handle_line(line).await {
                Ok(LineResult::Submitted) => stats.submitted += 1,
                Ok(LineResult::Skipped) => stats.skipped += 1,
                Err(e) => {
                    warn!("⚠️ {}", e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }

    async fn handle_line(&self, line: &str) -> AppResult<LineResult> {
        let Some(outcome) = self.parser.parse(line)? else {
            return Ok(LineResult::Skipped);
        };

        let record = self.registry.lookup(outcome.work_unit_id())?;
        info!("{} {}", outcome, record.assignment_id);

        let request = SubmissionRequest::build(&outcome, record, &self.options);
        self.submitter.submit(&request).await?;

        Ok(LineResult::Submitted)
    }
}

/// 清空结果文件（不创建新文件）
async fn truncate(path: &Path) -> Result<()> {
    OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .with_context(|| format!("无法清空结果文件: {}", path.display()))?;
    Ok(())
}
