//! 结果行解析服务 - 业务能力层
//!
//! 只识别 mfaktc 输出的两种结果行：
//!
//! ```text
//! no factor for M60009539 from 2^60 to 2^61 [mfaktc 0.21 75bit_mul32_gs]
//! M60009539 has a factor: 1190073291645727853953 [TF:60:61*:mfaktc 0.21 75bit_mul32_gs]
//! ```
//!
//! 其他内容一律跳过，不算错误

use crate::error::ParseError;
use crate::models::{Factor, FactorFound, NoFactorFound, ResultOutcome};
use regex::Regex;

const NO_FACTOR_MARKER: &str = "no factor for M";
const HAS_FACTOR_MARKER: &str = "has a factor: ";

/// 结果行解析器
pub struct ResultLineParser {
    work_unit: Regex,
    power_of_two: Regex,
    factor: Regex,
    colon_bit: Regex,
}

impl ResultLineParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            work_unit: Regex::new(r"M(\d+)")?,
            power_of_two: Regex::new(r"2\^(\d+)")?,
            factor: Regex::new(r"\s(\d+)")?,
            colon_bit: Regex::new(r":(\d+)")?,
        })
    }

    /// 解析单行结果
    ///
    /// # 返回
    /// - `Ok(Some(_))`: 识别出的结果
    /// - `Ok(None)`: 不是结果行
    /// - `Err(_)`: 形状已识别但内容不完整
    pub fn parse(&self, line: &str) -> Result<Option<ResultOutcome>, ParseError> {
        let Some(work_unit_id) = self
            .work_unit
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
        else {
            return Ok(None);
        };

        if line.contains(NO_FACTOR_MARKER) {
            let (start_bit, end_bit) = self.bit_range(&self.power_of_two, line, &work_unit_id)?;
            return Ok(Some(ResultOutcome::NoFactorFound(NoFactorFound {
                work_unit_id,
                start_bit,
                end_bit,
                raw_line: line.to_string(),
            })));
        }

        if line.contains(HAS_FACTOR_MARKER) {
            let factor = self
                .factor
                .captures(line)
                .and_then(|caps| caps.get(1))
                .ok_or_else(|| ParseError::MissingFactor {
                    work_unit_id: work_unit_id.clone(),
                })?;
            let factor = Factor::new(factor.as_str())?;
            let (start_bit, end_bit) = self.bit_range(&self.colon_bit, line, &work_unit_id)?;
            return Ok(Some(ResultOutcome::FactorFound(FactorFound {
                work_unit_id,
                factor,
                start_bit,
                end_bit,
                raw_line: line.to_string(),
            })));
        }

        Ok(None)
    }

    /// 从左到右取恰好两个位数标记
    fn bit_range(
        &self,
        marker: &Regex,
        line: &str,
        work_unit_id: &str,
    ) -> Result<(u32, u32), ParseError> {
        let bits: Vec<&str> = marker
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();

        let [start_bit, end_bit] = bits.as_slice() else {
            return Err(ParseError::BitMarkers {
                work_unit_id: work_unit_id.to_string(),
                found: bits.len(),
            });
        };

        Ok((parse_bit(start_bit)?, parse_bit(end_bit)?))
    }
}

fn parse_bit(value: &str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        value: value.to_string(),
    })
}
