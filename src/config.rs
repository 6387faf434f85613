use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// mfaktc 输出的结果文件
    pub results_file: PathBuf,
    /// 已提交结果的归档文件
    pub archive_file: PathBuf,
    /// 任务分配文件（worktodo）
    pub assignment_file: PathBuf,
    /// 轮询间隔（秒）
    pub check_interval_secs: u64,
    // --- PrimeNet 配置 ---
    pub primenet_url: String,
    pub product_id: String,
    pub protocol_version: String,
    pub computer_id: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 找到因子时按部分范围上报（ef 改为 log2(因子)）
    pub partial_report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_file: PathBuf::from("mfaktc/results.txt"),
            archive_file: PathBuf::from("archived_results.txt"),
            assignment_file: PathBuf::from("assignments.txt"),
            check_interval_secs: 5,
            primenet_url: "http://v5.mersenne.org/v5server".to_string(),
            product_id: "GIMPS".to_string(),
            protocol_version: "0.95".to_string(),
            computer_id: "COMPUTER_ID".to_string(),
            request_timeout_secs: 30,
            partial_report: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            results_file: env_or("RESULTS_FILE", self.results_file),
            archive_file: env_or("ARCHIVE_FILE", self.archive_file),
            assignment_file: env_or("ASSIGNMENT_FILE", self.assignment_file),
            check_interval_secs: env_or("CHECK_INTERVAL_SECS", self.check_interval_secs),
            primenet_url: env_or("PRIMENET_URL", self.primenet_url),
            product_id: self.product_id,
            protocol_version: self.protocol_version,
            computer_id: env_or("COMPUTER_ID", self.computer_id),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", self.request_timeout_secs),
            partial_report: env_or("PARTIAL_REPORT", self.partial_report),
        }
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 读取环境变量，不存在或无法解析时使用默认值
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
