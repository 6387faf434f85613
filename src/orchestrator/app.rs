use crate::clients::{PrimeNetClient, SubmitOptions};
use crate::config::Config;
use crate::models::AssignmentRegistry;
use crate::orchestrator::file_watcher::{FileWatcher, StopReason};
use crate::services::ArchiveWriter;
use crate::utils::logging::{log_registry_loaded, log_startup};
use crate::workflow::ResultProcessor;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    watcher: FileWatcher,
}

impl App {
    /// 初始化应用
    ///
    /// 任务分配文件不存在时直接返回错误，不进入监视
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let registry = AssignmentRegistry::load(&config.assignment_file).await?;
        log_registry_loaded(registry.len());

        let client = PrimeNetClient::new(&config)?;
        let processor = ResultProcessor::new(
            registry,
            Arc::new(client),
            SubmitOptions::new(&config),
            ArchiveWriter::new(config.archive_file.clone()),
        )?;

        let watcher = FileWatcher::new(
            config.results_file.clone(),
            config.check_interval(),
            processor,
        );

        Ok(Self { watcher })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<StopReason> {
        let reason = self.watcher.run().await;

        match reason {
            StopReason::Deleted => info!("👋 结果文件已删除，停止监视"),
            StopReason::Fatal => warn!("⚠️ 出现异常，退出监视..."),
        }

        Ok(reason)
    }
}
