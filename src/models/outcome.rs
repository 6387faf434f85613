//! 结果行解析出的试因子结果

use crate::error::ParseError;
use std::fmt::Display;

/// 取前 17 位有效数字计算 log2，超出 f64 精度的部分对 3 位小数没有影响
const MANTISSA_DIGITS: usize = 17;

/// 因子
///
/// 以十进制数字串保存任意大小的整数，提交时原样发送
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor(String);

impl Factor {
    /// 只接受正整数，全零的数字串无法计算位数
    pub fn new(digits: impl Into<String>) -> Result<Self, ParseError> {
        let digits = digits.into();
        let all_digits = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
        if !all_digits || digits.bytes().all(|b| b == b'0') {
            return Err(ParseError::InvalidNumber { value: digits });
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 因子所在的位数，即 log2(factor)
    pub fn bit_depth(&self) -> f64 {
        let digits = self.0.trim_start_matches('0');
        let head = &digits[..digits.len().min(MANTISSA_DIGITS)];
        let mantissa: f64 = head.parse().unwrap_or(f64::NAN);
        let exponent = (digits.len() - head.len()) as f64;

        mantissa.log2() + exponent * std::f64::consts::LOG2_10
    }
}

impl Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 未找到因子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoFactorFound {
    pub work_unit_id: String,
    pub start_bit: u32,
    pub end_bit: u32,
    pub raw_line: String,
}

/// 找到因子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorFound {
    pub work_unit_id: String,
    pub factor: Factor,
    pub start_bit: u32,
    pub end_bit: u32,
    pub raw_line: String,
}

/// 单行试因子结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultOutcome {
    NoFactorFound(NoFactorFound),
    FactorFound(FactorFound),
}

impl ResultOutcome {
    pub fn work_unit_id(&self) -> &str {
        match self {
            ResultOutcome::NoFactorFound(r) => &r.work_unit_id,
            ResultOutcome::FactorFound(r) => &r.work_unit_id,
        }
    }

    pub fn start_bit(&self) -> u32 {
        match self {
            ResultOutcome::NoFactorFound(r) => r.start_bit,
            ResultOutcome::FactorFound(r) => r.start_bit,
        }
    }

    pub fn end_bit(&self) -> u32 {
        match self {
            ResultOutcome::NoFactorFound(r) => r.end_bit,
            ResultOutcome::FactorFound(r) => r.end_bit,
        }
    }

    /// 原始结果行，作为提交的 message 字段
    pub fn raw_line(&self) -> &str {
        match self {
            ResultOutcome::NoFactorFound(r) => &r.raw_line,
            ResultOutcome::FactorFound(r) => &r.raw_line,
        }
    }

    pub fn factor(&self) -> Option<&Factor> {
        match self {
            ResultOutcome::NoFactorFound(_) => None,
            ResultOutcome::FactorFound(r) => Some(&r.factor),
        }
    }
}

impl Display for ResultOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultOutcome::NoFactorFound(r) => {
                write!(f, "no factor {} {} {}", r.work_unit_id, r.start_bit, r.end_bit)
            }
            ResultOutcome::FactorFound(r) => write!(
                f,
                "has factor {} {} {} {}",
                r.work_unit_id, r.start_bit, r.end_bit, r.factor
            ),
        }
    }
}
