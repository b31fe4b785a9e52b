// ==========================================
// 减速电机选型系统 - 目录部件记录
// ==========================================
// 职责: 表达供应商目录中的一条部件记录
// 约束: 元数据为结构化键值映射，单位已由目录归一
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 性能点记录的 component_type 值
///
/// 性能点不是 BOM 类别，只为枚举器提供目录中实际存在的
/// 减速比与电机功率全集。
pub const COMPONENT_TYPE_PERFORMANCE_POINT: &str = "performance_point";

// ==========================================
// ComponentRecord - 目录部件记录
// ==========================================

/// 供应商目录部件记录
///
/// 最小契约: 件号 + 描述 + 结构化元数据映射。
/// 齿轮箱记录的元数据含机座号与减速比；性能点记录含减速比与功率。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    /// 供应商代码
    pub vendor: String,
    /// 部件类型 (gear_unit / adapter / motor / shaft_kit / performance_point)
    pub component_type: String,
    /// 件号
    pub part_number: String,
    /// 描述
    pub description: Option<String>,
    /// 结构化元数据
    pub metadata: Map<String, Value>,
}

impl ComponentRecord {
    /// 读取字符串型元数据
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }

    /// 读取数值型元数据
    pub fn meta_f64(&self, key: &str) -> Option<f64> {
        self.metadata.get(key).and_then(|v| v.as_f64())
    }

    /// 是否为占位/合成记录（不属于真实供应商目录）
    pub fn is_placeholder(&self) -> bool {
        self.metadata
            .get("placeholder")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

// ==========================================
// AttrFilter - 目录查询属性过滤条件
// ==========================================

/// 属性过滤值
///
/// 数值与文本分开建模，保证数据库侧按正确的类型比较
/// （JSON 数值列与文本参数直接比较会因类型不同而失配）。
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Number(f64),
}

/// 单个属性过滤条件（元数据键 → 期望值）
#[derive(Debug, Clone)]
pub struct AttrFilter {
    pub key: String,
    pub value: AttrValue,
}

impl AttrFilter {
    /// 文本属性过滤
    pub fn text(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: AttrValue::Text(value.to_string()),
        }
    }

    /// 数值属性过滤
    pub fn number(key: &str, value: f64) -> Self {
        Self {
            key: key.to_string(),
            value: AttrValue::Number(value),
        }
    }

    /// 判断一条记录的元数据是否满足本条件
    pub fn matches(&self, record: &ComponentRecord) -> bool {
        match &self.value {
            AttrValue::Text(expected) => record.meta_str(&self.key) == Some(expected.as_str()),
            AttrValue::Number(expected) => record.meta_f64(&self.key) == Some(*expected),
        }
    }
}
