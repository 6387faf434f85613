//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 管理进程生命周期和轮询节奏，不做具体业务判断。
//!
//! ### `app` - 应用入口
//! - 加载任务分配表（缺失即启动失败）
//! - 组装 PrimeNet 客户端、归档服务和 `ResultProcessor`
//!
//! ### `file_watcher` - 结果文件监视器
//! - 按固定间隔检查修改时间
//! - 文件变化时调用 `ResultProcessor`
//! - 文件被删除或出现异常时停止
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! file_watcher (轮询)
//!     ↓
//! workflow::ResultProcessor (处理一次文件变化)
//!     ↓
//! services / clients (解析 / 归档 / 提交)
//! ```

pub mod app;
pub mod file_watcher;

pub use app::App;
pub use file_watcher::{FileWatcher, StopReason, WatchState};
