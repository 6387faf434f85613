use std::path::PathBuf;
use thiserror::Error;

/// 单行结果处理错误
///
/// 只记录日志，不会中断后续行的处理
#[derive(Debug, Error)]
pub enum AppError {
    /// 结果行解析错误
    #[error("解析错误: {0}")]
    Parse(#[from] ParseError),
    /// 找不到对应的任务分配
    #[error("查找错误: {0}")]
    Lookup(#[from] LookupMiss),
    /// 提交到 PrimeNet 失败
    #[error("提交错误: {0}")]
    Submission(#[from] SubmissionError),
}

/// 任务分配文件错误
#[derive(Debug, Error)]
pub enum RegistryError {
    /// 文件不存在
    #[error("任务分配文件不存在: {}", path.display())]
    NotFound { path: PathBuf },
    /// 读取文件失败
    #[error("读取任务分配文件失败 ({}): {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 结果行解析错误
///
/// 只针对已识别出形状的行；无法识别的行不算错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// 位数标记数量不是两个
    #[error("M{work_unit_id} 需要 2 个位数标记，实际找到 {found} 个")]
    BitMarkers { work_unit_id: String, found: usize },
    /// 找不到因子
    #[error("M{work_unit_id} 找不到因子")]
    MissingFactor { work_unit_id: String },
    /// 数字无法转换
    #[error("无法解析数字: {value}")]
    InvalidNumber { value: String },
}

/// 工作单元在任务分配中不存在
#[derive(Debug, Error, PartialEq, Eq)]
#[error("M{work_unit_id} 没有对应的任务分配")]
pub struct LookupMiss {
    pub work_unit_id: String,
}

/// 提交错误
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// 网络请求失败
    #[error("请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// 服务器返回非 200 状态码
    #[error("提交失败，状态码: {status}")]
    BadStatus { status: u16 },
}

/// 轮询过程中的致命错误
#[derive(Debug, Error)]
pub enum WatchError {
    /// 读取文件状态失败
    #[error("读取文件状态失败 ({}): {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 处理结果失败
    #[error("处理结果失败: {0:#}")]
    Process(#[from] anyhow::Error),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
