// ==========================================
// 减速电机选型系统 - BOM 解析结果
// ==========================================
// 职责: 表达一次解析调用的产出，返回后不再修改
// ==========================================

use crate::domain::types::ComponentCategory;
use serde::{Deserialize, Serialize};

// ==========================================
// ComponentSlot - 单类别解析槽位
// ==========================================

/// 单个 BOM 类别的解析槽位
///
/// `match_count` 记录该类别查询命中的候选数，当前解析器按
/// 确定性规则只选取单一候选（0 或 1），字段保留为未来
/// 多候选检测的扩展点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSlot {
    /// 部件类别
    pub category: ComponentCategory,
    /// 是否找到匹配
    pub found: bool,
    /// 匹配的件号
    pub part_number: Option<String>,
    /// 匹配的描述
    pub description: Option<String>,
    /// 命中候选数
    pub match_count: u32,
}

impl ComponentSlot {
    /// 构造命中槽位
    pub fn found(
        category: ComponentCategory,
        part_number: String,
        description: Option<String>,
    ) -> Self {
        Self {
            category,
            found: true,
            part_number: Some(part_number),
            description,
            match_count: 1,
        }
    }

    /// 构造未命中槽位
    pub fn missing(category: ComponentCategory) -> Self {
        Self {
            category,
            found: false,
            part_number: None,
            description: None,
            match_count: 0,
        }
    }
}

// ==========================================
// BomResolution - 解析结果
// ==========================================

/// 一次解析调用的完整产出
///
/// 槽位顺序即解析顺序。`complete` 仅当每个必需槽位均命中时为 true。
/// 不需要的类别（如无需输出轴套件的安装方式）根本不出现在槽位中，
/// 而不是"已解析但被忽略"。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomResolution {
    /// 各必需类别的槽位
    pub slots: Vec<ComponentSlot>,
    /// 是否全部命中
    pub complete: bool,
}

impl BomResolution {
    /// 由槽位列表构造，自动推导完整性标志
    pub fn new(slots: Vec<ComponentSlot>) -> Self {
        let complete = !slots.is_empty() && slots.iter().all(|s| s.found);
        Self { slots, complete }
    }

    /// 未命中的类别，按解析顺序
    pub fn missing_categories(&self) -> Vec<ComponentCategory> {
        self.slots
            .iter()
            .filter(|s| !s.found)
            .map(|s| s.category)
            .collect()
    }

    /// 命中的件号，按解析顺序
    pub fn found_part_numbers(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter_map(|s| s.part_number.as_deref())
            .collect()
    }
}
