// ==========================================
// 减速电机选型系统 - 用例分类器
// ==========================================
// 职责: 把一次解析产出归入四态之一并给出可读消息
// 红线: 全函数 - 任何产出恰好归入一个状态，绝无第五态
// ==========================================

use crate::domain::bom::BomResolution;
use crate::domain::types::CaseStatus;
use crate::engine::resolver::ResolveError;

/// 无结构化错误文本时的缺省消息
const UNKNOWN_ERROR: &str = "unknown";

// ==========================================
// CaseClassifier - 用例分类器
// ==========================================

/// 用例分类器（无状态，纯函数）
pub struct CaseClassifier;

impl CaseClassifier {
    /// 对一次解析产出分类
    ///
    /// # 规则
    /// - RESOLVED: 完整且无未命中槽位
    /// - AMBIGUOUS: 某槽位报告多于一个等价候选
    ///   （当前解析器按单候选选取，此分支结构上不可达，状态保留）
    /// - UNRESOLVED: 至少一个槽位未命中，消息按解析顺序逗号连接缺失类别
    /// - INVALID: 解析器报错，消息嵌入错误文本（无文本时为 "unknown"）
    pub fn classify_outcome(
        outcome: &Result<BomResolution, ResolveError>,
    ) -> (CaseStatus, Option<String>) {
        match outcome {
            Ok(resolution) => Self::classify(resolution),
            Err(err) => {
                let text = err.to_string();
                let message = if text.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    text
                };
                (CaseStatus::Invalid, Some(message))
            }
        }
    }

    /// 对成功返回的解析结果分类
    fn classify(resolution: &BomResolution) -> (CaseStatus, Option<String>) {
        let ambiguous: Vec<&str> = resolution
            .slots
            .iter()
            .filter(|s| s.match_count > 1)
            .map(|s| s.category.to_db_str())
            .collect();
        if !ambiguous.is_empty() {
            return (
                CaseStatus::Ambiguous,
                Some(format!("存在多个等价候选: {}", ambiguous.join(", "))),
            );
        }

        let missing = resolution.missing_categories();
        if resolution.complete && missing.is_empty() {
            return (CaseStatus::Resolved, None);
        }

        // 不完整一律按缺件处理（空槽位列表也落入此分支，保持全函数性）
        let message = if missing.is_empty() {
            "解析结果为空".to_string()
        } else {
            let names: Vec<&str> = missing.iter().map(|c| c.to_db_str()).collect();
            format!("缺少匹配部件: {}", names.join(", "))
        };
        (CaseStatus::Unresolved, Some(message))
    }
}
