//! 结果文件监视器 - 编排层
//!
//! ## 职责
//!
//! 按固定间隔轮询结果文件的修改时间，发现变化时驱动 `ResultProcessor`。
//!
//! ## 状态机
//!
//! ```text
//! Uninitialized ──start──▶ WaitingForFile ──文件出现──▶ Watching
//!        │                                               │  ▲
//!        └────────────────start─────────────────────────▶│  │ 修改时间变化 → 处理
//!                                                        │  └─┘
//!                                                        ├──文件被删除──▶ Stopped(Deleted)
//!                                                        └──其他异常────▶ Stopped(Fatal)
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::time::sleep;
use tracing::{error, info};

use crate::error::WatchError;
use crate::utils::logging::log_process_stats;
use crate::workflow::ResultProcessor;

/// 停止原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 结果文件在监视期间被删除
    Deleted,
    /// 轮询中出现无法恢复的错误
    Fatal,
}

/// 监视状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Uninitialized,
    /// 结果文件不存在，等待创建
    WaitingForFile,
    /// 结果文件存在，记录最后一次看到的修改时间
    Watching { last_modified: SystemTime },
    Stopped(StopReason),
}

/// 结果文件监视器
pub struct FileWatcher {
    results_path: PathBuf,
    interval: Duration,
    processor: ResultProcessor,
    state: WatchState,
}

impl FileWatcher {
    pub fn new(
        results_path: impl Into<PathBuf>,
        interval: Duration,
        processor: ResultProcessor,
    ) -> Self {
        Self {
            results_path: results_path.into(),
            interval,
            processor,
            state: WatchState::Uninitialized,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// 一直轮询直到进入终止状态
    pub async fn run(&mut self) -> StopReason {
        self.start().await;

        loop {
            if let WatchState::Stopped(reason) = self.state {
                return reason;
            }
            sleep(self.interval).await;
            self.tick().await;
        }
    }

    /// 读取初始修改时间
    pub async fn start(&mut self) {
        self.state = match modified_time(&self.results_path).await {
            Ok(Some(last_modified)) => WatchState::Watching { last_modified },
            Ok(None) => {
                info!(
                    "⏳ 文件 {} 不存在，等待创建...",
                    self.results_path.display()
                );
                WatchState::WaitingForFile
            }
            Err(e) => {
                error!("❌ 出现异常，停止监视: {}", e);
                WatchState::Stopped(StopReason::Fatal)
            }
        };
    }

    /// 执行一次轮询
    pub async fn tick(&mut self) -> WatchState {
        self.state = match self.next_state().await {
            Ok(state) => state,
            Err(e) => {
                error!("❌ 出现异常，停止监视: {}", e);
                WatchState::Stopped(StopReason::Fatal)
            }
        };
        self.state
    }

    async fn next_state(&mut self) -> Result<WatchState, WatchError> {
        if self.state == WatchState::Uninitialized {
            self.start().await;
            return Ok(self.state);
        }

        let current = modified_time(&self.results_path).await?;

        let next = match (self.state, current) {
            (WatchState::WaitingForFile, None) => WatchState::WaitingForFile,
            (WatchState::WaitingForFile, Some(last_modified)) => {
                info!("📄 文件 {} 已创建", self.results_path.display());
                WatchState::Watching { last_modified }
            }
            (WatchState::Watching { last_modified }, Some(now)) if now == last_modified => {
                self.state
            }
            (WatchState::Watching { .. }, Some(_)) => self.process_changes().await?,
            (WatchState::Watching { .. }, None) => self.deleted(),
            (state, _) => state,
        };

        Ok(next)
    }

    /// 处理一次文件变化，并记录清空后的修改时间
    async fn process_changes(&self) -> Result<WatchState, WatchError> {
        match self.processor.process(&self.results_path).await {
            Ok(stats) => log_process_stats(&stats),
            // 读取或清空之前文件已被删除
            Err(e) if is_not_found(&e) => {
                if modified_time(&self.results_path).await?.is_none() {
                    return Ok(self.deleted());
                }
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }

        match modified_time(&self.results_path).await? {
            Some(last_modified) => Ok(WatchState::Watching { last_modified }),
            None => Ok(self.deleted()),
        }
    }

    fn deleted(&self) -> WatchState {
        info!("🗑️ 文件 {} 已被删除", self.results_path.display());
        WatchState::Stopped(StopReason::Deleted)
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == ErrorKind::NotFound)
    })
}

/// 读取修改时间，文件不存在时返回 `None`
async fn modified_time(path: &Path) -> Result<Option<SystemTime>, WatchError> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(WatchError::Metadata {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    metadata.modified().map(Some).map_err(|source| WatchError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}
