// ==========================================
// 减速电机选型系统 - 需求输入
// ==========================================
// 职责: 表达一次选型请求的全部工程约束
// 不变量: 字段相同的两个输入必然产生相同的用例键
// ==========================================

use crate::domain::types::{MountingStyle, ShaftOption, ShaftStyle};
use serde::{Deserialize, Serialize};

/// 缺失的轴字段在用例键中的占位符
pub const SENTINEL_NONE: &str = "none";

/// 缺失的数值字段在用例键中的占位符
pub const SENTINEL_ANY: &str = "any";

// ==========================================
// RequirementInput - 需求输入（不可变值对象）
// ==========================================

/// 选型需求输入
///
/// 一次覆盖率测试用例或一次在线选型请求各构造一份，构造后不再修改。
///
/// # 字段说明
/// - `shaft_option` / `shaft_style`: 仅底座式安装有意义；
///   插入轴形式又仅对键槽式输出轴选项有意义
/// - `ratio` / `motor_power`: 可空，枚举器总会填入代表值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementInput {
    /// 驱动系列标识
    pub series: String,
    /// 齿轮箱机座号
    pub unit_size: String,
    /// 安装方式
    pub mounting_style: MountingStyle,
    /// 输出轴选项
    pub shaft_option: Option<ShaftOption>,
    /// 插入轴形式
    pub shaft_style: Option<ShaftStyle>,
    /// 目标减速比
    pub ratio: Option<f64>,
    /// 电机功率 (kW)
    pub motor_power: Option<f64>,
}

impl RequirementInput {
    /// 计算用例键
    ///
    /// 按固定顺序以 `|` 连接各字段；缺失的轴字段以 `none` 占位，
    /// 缺失的数值字段以 `any` 占位。用例键是覆盖率用例的对外身份，
    /// 不依赖任何插入顺序派生的编号。
    pub fn case_key(&self) -> String {
        let shaft_option = self
            .shaft_option
            .map(|o| o.to_db_str().to_string())
            .unwrap_or_else(|| SENTINEL_NONE.to_string());
        let shaft_style = self
            .shaft_style
            .map(|s| s.to_db_str().to_string())
            .unwrap_or_else(|| SENTINEL_NONE.to_string());
        let ratio = self
            .ratio
            .map(|r| r.to_string())
            .unwrap_or_else(|| SENTINEL_ANY.to_string());
        let motor_power = self
            .motor_power
            .map(|p| p.to_string())
            .unwrap_or_else(|| SENTINEL_ANY.to_string());

        format!(
            "{}|{}|{}|{}|{}|{}|{}",
            self.series,
            self.unit_size,
            self.mounting_style.to_db_str(),
            shaft_option,
            shaft_style,
            ratio,
            motor_power,
        )
    }

    /// 构造选型型号描述符（系列-机座号）
    pub fn model_descriptor(&self) -> String {
        format!("{}-{}", self.series, self.unit_size)
    }
}
