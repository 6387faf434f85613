//! # GIMPS Submit
//!
//! 监视 mfaktc 的结果文件，把试因子结果自动提交到 PrimeNet
//!
//! ## 架构设计
//!
//! ### ① 数据模型（Models）
//! - `models/` - 任务分配表、解析出的结果
//!
//! ### ② 业务能力层（Services / Clients）
//! - `ResultLineParser` - 识别两种结果行
//! - `ArchiveWriter` - 追加写归档文件
//! - `PrimeNetClient` - 提交单条结果
//!
//! ### ③ 流程层（Workflow）
//! - `ResultProcessor` - 读取 → 逐行提交 → 归档 → 清空
//!
//! ### ④ 编排层（Orchestration）
//! - `FileWatcher` - 轮询修改时间，驱动流程层
//! - `App` - 启动时加载配置和任务分配

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AssignmentRecord, AssignmentRegistry, ResultOutcome};
pub use orchestrator::{App, FileWatcher, StopReason, WatchState};
pub use workflow::{ProcessStats, ResultProcessor};
