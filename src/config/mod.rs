// ==========================================
// 减速电机选型系统 - 配置层
// ==========================================
// 职责: 覆盖率生成的运行参数
// 红线: 配置显式注入引擎，不经模块级全局状态
// ==========================================

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 枚举器硬上限缺省值（用例数）
pub const DEFAULT_ENUMERATION_CAP: usize = 1000;

/// 批量插入缺省批大小（行）
pub const DEFAULT_INSERT_BATCH_SIZE: usize = 100;

// ==========================================
// CoverageConfig - 覆盖率生成配置
// ==========================================

/// 覆盖率生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// 供应商代码
    #[serde(default = "default_vendor")]
    pub vendor: String,
    /// 枚举用例的缺省驱动系列
    #[serde(default = "default_series")]
    pub default_series: String,
    /// 枚举硬上限：达到即截断并告警，不报错
    #[serde(default = "default_enumeration_cap")]
    pub enumeration_cap: usize,
    /// 覆盖率行批量插入的批大小
    #[serde(default = "default_insert_batch_size")]
    pub insert_batch_size: usize,
}

fn default_vendor() -> String {
    "DODGE".to_string()
}

fn default_series() -> String {
    "QD".to_string()
}

fn default_enumeration_cap() -> usize {
    DEFAULT_ENUMERATION_CAP
}

fn default_insert_batch_size() -> usize {
    DEFAULT_INSERT_BATCH_SIZE
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            vendor: default_vendor(),
            default_series: default_series(),
            enumeration_cap: default_enumeration_cap(),
            insert_batch_size: default_insert_batch_size(),
        }
    }
}

impl CoverageConfig {
    /// 从 JSON 文件加载配置（字段缺省按 Default 填充）
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}
