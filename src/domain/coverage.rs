// ==========================================
// 减速电机选型系统 - 覆盖率结果与汇总
// ==========================================
// 依据: 覆盖率生成为全量替换，一次生成是唯一的变更单位
// 不变量: resolved + ambiguous + unresolved + invalid == total
// ==========================================

use crate::domain::bom::ComponentSlot;
use crate::domain::requirement::RequirementInput;
use crate::domain::types::CaseStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// CoverageResult - 单用例覆盖率结果
// ==========================================

/// 一条被测需求输入的覆盖率结果
///
/// `resolved_pns` 只收录经目录独立校验为真实供应商记录的件号，
/// 不是解析命中件号的简单罗列（防御合成/占位条目）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageResult {
    /// 用例键（对外身份）
    pub case_key: String,
    /// 原始需求输入
    pub requirement: RequirementInput,
    /// 分类状态
    pub status: CaseStatus,
    /// 已验证的真实件号
    pub resolved_pns: Vec<String>,
    /// 人类可读消息
    pub message: Option<String>,
    /// 各类别槽位快照
    pub slots: Vec<ComponentSlot>,
    /// 本次检查时间
    pub checked_at: DateTime<Utc>,
}

// ==========================================
// CoverageSummary - 覆盖率汇总
// ==========================================

/// 一次生成运行的聚合计数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// 生成运行 ID
    pub run_id: String,
    /// 用例总数
    pub total: u64,
    /// 完整解析数
    pub resolved: u64,
    /// 多候选数
    pub ambiguous: u64,
    /// 缺件数
    pub unresolved: u64,
    /// 无效输入数
    pub invalid: u64,
    /// 生成时间
    pub generated_at: DateTime<Utc>,
}

impl CoverageSummary {
    /// 创建空汇总
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            total: 0,
            resolved: 0,
            ambiguous: 0,
            unresolved: 0,
            invalid: 0,
            generated_at: Utc::now(),
        }
    }

    /// 记录一个用例的状态
    pub fn record(&mut self, status: CaseStatus) {
        self.total += 1;
        match status {
            CaseStatus::Resolved => self.resolved += 1,
            CaseStatus::Ambiguous => self.ambiguous += 1,
            CaseStatus::Unresolved => self.unresolved += 1,
            CaseStatus::Invalid => self.invalid += 1,
        }
    }

    /// 计数守恒校验
    pub fn is_conserved(&self) -> bool {
        self.resolved + self.ambiguous + self.unresolved + self.invalid == self.total
    }
}

impl Default for CoverageSummary {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// CoverageReport - 生成运行返回值
// ==========================================

/// 生成运行的完整返回：内存汇总 + 批量写入错误列表
///
/// 批量写入失败不中止运行，因此 `errors` 非空时汇总计数可能
/// 多于实际持久化的行数，调用方应将两者分开呈现。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub summary: CoverageSummary,
    pub errors: Vec<String>,
}
