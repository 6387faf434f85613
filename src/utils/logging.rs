/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use crate::config::Config;
use crate::workflow::ProcessStats;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// 日志时间前缀格式
const TIMESTAMP_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// 初始化日志
///
/// 输出到标准输出，每行带本地时间前缀；`RUST_LOG` 可覆盖默认的 `info` 级别
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .with_writer(std::io::stdout)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - GIMPS 结果自动提交");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("👀 开始监视文件 {}", config.results_file.display());
    info!("📋 读取任务分配文件 {}", config.assignment_file.display());
    info!("⏱️ 轮询间隔: {} 秒", config.check_interval_secs);
    info!("{}", "=".repeat(60));
}

/// 记录任务分配加载结果
pub fn log_registry_loaded(total: usize) {
    info!("✓ 已加载 {} 个任务分配", total);
}

/// 记录单次处理统计
pub fn log_process_stats(stats: &ProcessStats) {
    if stats.lines == 0 {
        return;
    }
    info!(
        "✓ 处理完成: 共 {} 行 | 提交 {} | 跳过 {} | 失败 {}",
        stats.lines, stats.submitted, stats.skipped, stats.failed
    );
}
