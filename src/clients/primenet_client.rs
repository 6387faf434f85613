/// PrimeNet API 客户端
///
/// 把单条试因子结果映射成 v5server 的 `t=ar`（assignment result）请求
use crate::config::Config;
use crate::error::SubmissionError;
use crate::models::{AssignmentRecord, Factor, ResultOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fmt::Display;
use tracing::debug;

/// 请求类型：提交任务结果
const REQUEST_TYPE: &str = "ar";
const FLAG_FIELD: &str = "1";
const SUCCESS_STATUS: u16 = 200;

/// 结果类型代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultType {
    FactorFound = 1,
    NoFactor = 4,
}

impl ResultType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// 上报的结束位数
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EndBit {
    /// 扫描范围的结束位数
    Range(u32),
    /// 因子所在位数，保留 3 位小数；整数值也带 `.0`
    FactorDepth(f64),
}

impl Display for EndBit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EndBit::Range(bit) => write!(f, "{}", bit),
            EndBit::FactorDepth(depth) if depth.fract() == 0.0 => write!(f, "{:.1}", depth),
            EndBit::FactorDepth(depth) => write!(f, "{}", depth),
        }
    }
}

/// 构造请求时需要的固定字段
#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub product_id: String,
    pub protocol_version: String,
    pub computer_id: String,
    /// 找到因子时按部分范围上报
    pub partial_report: bool,
}

impl SubmitOptions {
    pub fn new(config: &Config) -> Self {
        Self {
            product_id: config.product_id.clone(),
            protocol_version: config.protocol_version.clone(),
            computer_id: config.computer_id.clone(),
            partial_report: config.partial_report,
        }
    }
}

/// 提交请求
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub product_id: String,
    pub protocol_version: String,
    pub computer_id: String,
    pub work_unit_id: String,
    pub start_bit: u32,
    pub end_bit: EndBit,
    pub assignment_id: String,
    pub message: String,
    pub result_type: ResultType,
    pub factor: Option<Factor>,
}

impl SubmissionRequest {
    /// 由结果和对应的任务分配构造请求
    pub fn build(
        outcome: &ResultOutcome,
        record: &AssignmentRecord,
        options: &SubmitOptions,
    ) -> Self {
        let (result_type, end_bit) = match outcome {
            ResultOutcome::NoFactorFound(r) => (ResultType::NoFactor, EndBit::Range(r.end_bit)),
            ResultOutcome::FactorFound(r) if options.partial_report => (
                ResultType::FactorFound,
                EndBit::FactorDepth(round_to_millis(r.factor.bit_depth())),
            ),
            ResultOutcome::FactorFound(r) => (ResultType::FactorFound, EndBit::Range(r.end_bit)),
        };

        Self {
            product_id: options.product_id.clone(),
            protocol_version: options.protocol_version.clone(),
            computer_id: options.computer_id.clone(),
            work_unit_id: outcome.work_unit_id().to_string(),
            start_bit: outcome.start_bit(),
            end_bit,
            assignment_id: record.assignment_id.clone(),
            message: outcome.raw_line().to_string(),
            result_type,
            factor: outcome.factor().cloned(),
        }
    }

    /// GET 请求的查询参数
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("px", self.product_id.clone()),
            ("v", self.protocol_version.clone()),
            ("t", REQUEST_TYPE.to_string()),
            ("g", self.computer_id.clone()),
            ("n", self.work_unit_id.clone()),
            ("d", FLAG_FIELD.to_string()),
            ("sf", self.start_bit.to_string()),
            ("k", self.assignment_id.clone()),
            ("m", self.message.clone()),
            ("r", self.result_type.code().to_string()),
            ("ef", self.end_bit.to_string()),
        ];

        if let Some(factor) = &self.factor {
            pairs.push(("f", factor.to_string()));
        }

        pairs
    }
}

fn round_to_millis(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionResult {
    pub success: bool,
    pub status_code: u16,
}

/// 结果提交能力
#[async_trait]
pub trait ResultSubmitter: Send + Sync {
    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, SubmissionError>;
}

/// PrimeNet 客户端
pub struct PrimeNetClient {
    http: reqwest::Client,
    endpoint: String,
}

impl PrimeNetClient {
    /// 创建新的 PrimeNet 客户端
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("无法创建 HTTP 客户端")?;

        Ok(Self {
            http,
            endpoint: config.primenet_url.clone(),
        })
    }
}

#[async_trait]
impl ResultSubmitter for PrimeNetClient {
    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> Result<SubmissionResult, SubmissionError> {
        let pairs = request.query_pairs();
        debug!("提交 Payload: {:?}", pairs);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&pairs)
            .send()
            .await
            .map_err(|source| SubmissionError::Transport {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        debug!("提交结果状态码: {}", status);

        if status != SUCCESS_STATUS {
            return Err(SubmissionError::BadStatus { status });
        }

        Ok(SubmissionResult {
            success: true,
            status_code: status,
        })
    }
}
