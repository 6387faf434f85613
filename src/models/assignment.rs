//! 任务分配表
//!
//! 从 worktodo 风格的文件加载 `工作单元 -> 任务分配` 的映射，进程生命周期内只读

use crate::error::{LookupMiss, RegistryError};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// 行首可选的标记，解析前去掉
const LINE_MARKER: &str = "Factor=";

/// 单个任务分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRecord {
    /// PrimeNet 下发的任务 ID
    pub assignment_id: String,
    /// 指数（工作单元 ID）
    pub work_unit_id: String,
    pub start_bit: u32,
    pub end_bit: u32,
}

impl AssignmentRecord {
    /// 解析一行 `assignment_id,exponent,start_bit,end_bit`
    ///
    /// 字段数不是 4 的行返回 `None`
    fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();
        let line = line.strip_prefix(LINE_MARKER).unwrap_or(line);
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let [assignment_id, work_unit_id, start_bit, end_bit] = fields.as_slice() else {
            return None;
        };

        match (start_bit.parse::<u32>(), end_bit.parse::<u32>()) {
            (Ok(start_bit), Ok(end_bit)) => Some(Self {
                assignment_id: assignment_id.to_string(),
                work_unit_id: work_unit_id.to_string(),
                start_bit,
                end_bit,
            }),
            _ => {
                debug!("跳过位数无效的任务分配行: {}", line);
                None
            }
        }
    }
}

/// 任务分配表
#[derive(Debug, Clone, Default)]
pub struct AssignmentRegistry {
    records: HashMap<String, AssignmentRecord>,
}

impl AssignmentRegistry {
    /// 从文本解析任务分配表
    ///
    /// 同一个工作单元出现多次时以最后一行为准
    pub fn parse(text: &str) -> Self {
        let records = text
            .lines()
            .filter_map(AssignmentRecord::from_line)
            .map(|record| (record.work_unit_id.clone(), record))
            .collect();

        Self { records }
    }

    /// 从文件加载任务分配表
    pub async fn load(path: &Path) -> Result<Self, RegistryError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => RegistryError::NotFound {
                    path: path.to_path_buf(),
                },
                _ => RegistryError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                },
            })?;

        Ok(Self::parse(&content))
    }

    pub fn lookup(&self, work_unit_id: &str) -> Result<&AssignmentRecord, LookupMiss> {
        self.records.get(work_unit_id).ok_or_else(|| LookupMiss {
            work_unit_id: work_unit_id.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
