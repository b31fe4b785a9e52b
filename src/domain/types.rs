// ==========================================
// 减速电机选型系统 - 领域类型定义
// ==========================================
// 依据: 选型规则 - 安装方式决定是否需要输出轴套件
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 安装方式 (Mounting Style)
// ==========================================
// 红线: 只有 BOTTOM_MOUNT 需要输出轴套件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MountingStyle {
    ShaftMounted,  // 轴装式
    FlangeMounted, // 法兰式
    BottomMount,   // 底座式
}

impl MountingStyle {
    /// 枚举器遍历用的固定全集（顺序即枚举顺序）
    pub const ALL: [MountingStyle; 3] = [
        MountingStyle::ShaftMounted,
        MountingStyle::FlangeMounted,
        MountingStyle::BottomMount,
    ];

    /// 该安装方式是否需要输出轴套件
    pub fn requires_output_shaft_kit(&self) -> bool {
        matches!(self, MountingStyle::BottomMount)
    }

    /// 从字符串解析安装方式
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SHAFT_MOUNTED" => Some(MountingStyle::ShaftMounted),
            "FLANGE_MOUNTED" => Some(MountingStyle::FlangeMounted),
            "BOTTOM_MOUNT" => Some(MountingStyle::BottomMount),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MountingStyle::ShaftMounted => "SHAFT_MOUNTED",
            MountingStyle::FlangeMounted => "FLANGE_MOUNTED",
            MountingStyle::BottomMount => "BOTTOM_MOUNT",
        }
    }
}

impl fmt::Display for MountingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 输出轴选项 (Output Shaft Option)
// ==========================================
// 键槽式(KEYED)选项才进一步区分插入轴形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShaftOption {
    InchKeyed,    // 英制键槽
    MetricKeyed,  // 公制键槽
    InchHollow,   // 英制空心
    MetricHollow, // 公制空心
}

impl ShaftOption {
    /// 枚举器遍历用的固定全集（顺序即枚举顺序）
    pub const ALL: [ShaftOption; 4] = [
        ShaftOption::InchKeyed,
        ShaftOption::MetricKeyed,
        ShaftOption::InchHollow,
        ShaftOption::MetricHollow,
    ];

    /// 是否为键槽式选项（键槽式才有插入轴形式）
    pub fn is_keyed(&self) -> bool {
        matches!(self, ShaftOption::InchKeyed | ShaftOption::MetricKeyed)
    }

    /// 从字符串解析输出轴选项
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "INCH_KEYED" => Some(ShaftOption::InchKeyed),
            "METRIC_KEYED" => Some(ShaftOption::MetricKeyed),
            "INCH_HOLLOW" => Some(ShaftOption::InchHollow),
            "METRIC_HOLLOW" => Some(ShaftOption::MetricHollow),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ShaftOption::InchKeyed => "INCH_KEYED",
            ShaftOption::MetricKeyed => "METRIC_KEYED",
            ShaftOption::InchHollow => "INCH_HOLLOW",
            ShaftOption::MetricHollow => "METRIC_HOLLOW",
        }
    }
}

impl fmt::Display for ShaftOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 插入轴形式 (Plug-in Shaft Style)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShaftStyle {
    Single, // 单出轴
    Double, // 双出轴
}

impl ShaftStyle {
    /// 枚举器遍历用的固定全集（顺序即枚举顺序）
    pub const ALL: [ShaftStyle; 2] = [ShaftStyle::Single, ShaftStyle::Double];

    /// 从字符串解析插入轴形式
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SINGLE" => Some(ShaftStyle::Single),
            "DOUBLE" => Some(ShaftStyle::Double),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ShaftStyle::Single => "SINGLE",
            ShaftStyle::Double => "DOUBLE",
        }
    }
}

impl fmt::Display for ShaftStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 部件类别 (Component Category)
// ==========================================
// 顺序即解析顺序: 齿轮箱 → 适配器 → 电机 → 输出轴套件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentCategory {
    GearUnit,       // 齿轮箱
    Adapter,        // 电机适配器
    Motor,          // 电机
    OutputShaftKit, // 输出轴套件
}

impl ComponentCategory {
    /// 目录表中对应的 component_type 值
    pub fn catalog_type(&self) -> &'static str {
        match self {
            ComponentCategory::GearUnit => "gear_unit",
            ComponentCategory::Adapter => "adapter",
            ComponentCategory::Motor => "motor",
            ComponentCategory::OutputShaftKit => "shaft_kit",
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ComponentCategory::GearUnit => "GEAR_UNIT",
            ComponentCategory::Adapter => "ADAPTER",
            ComponentCategory::Motor => "MOTOR",
            ComponentCategory::OutputShaftKit => "OUTPUT_SHAFT_KIT",
        }
    }
}

impl fmt::Display for ComponentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 用例状态 (Case Status)
// ==========================================
// 四态全集: 每个需求输入恰好归入其中一个状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Resolved,   // 完整解析
    Ambiguous,  // 存在多个等价候选
    Unresolved, // 至少一个类别无匹配
    Invalid,    // 解析器报错
}

impl CaseStatus {
    /// 从字符串解析用例状态
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "RESOLVED" => Some(CaseStatus::Resolved),
            "AMBIGUOUS" => Some(CaseStatus::Ambiguous),
            "UNRESOLVED" => Some(CaseStatus::Unresolved),
            "INVALID" => Some(CaseStatus::Invalid),
            _ => None,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            CaseStatus::Resolved => "RESOLVED",
            CaseStatus::Ambiguous => "AMBIGUOUS",
            CaseStatus::Unresolved => "UNRESOLVED",
            CaseStatus::Invalid => "INVALID",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mounting_style_kit_requirement() {
        assert!(!MountingStyle::ShaftMounted.requires_output_shaft_kit());
        assert!(!MountingStyle::FlangeMounted.requires_output_shaft_kit());
        assert!(MountingStyle::BottomMount.requires_output_shaft_kit());
    }

    #[test]
    fn test_shaft_option_keyed() {
        assert!(ShaftOption::InchKeyed.is_keyed());
        assert!(ShaftOption::MetricKeyed.is_keyed());
        assert!(!ShaftOption::InchHollow.is_keyed());
        assert!(!ShaftOption::MetricHollow.is_keyed());
    }

    #[test]
    fn test_db_str_round_trip() {
        for style in MountingStyle::ALL {
            assert_eq!(MountingStyle::from_str(style.to_db_str()), Some(style));
        }
        for option in ShaftOption::ALL {
            assert_eq!(ShaftOption::from_str(option.to_db_str()), Some(option));
        }
        for status in [
            CaseStatus::Resolved,
            CaseStatus::Ambiguous,
            CaseStatus::Unresolved,
            CaseStatus::Invalid,
        ] {
            assert_eq!(CaseStatus::from_str(status.to_db_str()), Some(status));
        }
    }

    #[test]
    fn test_case_status_unknown() {
        assert_eq!(CaseStatus::from_str("PENDING"), None);
    }
}
