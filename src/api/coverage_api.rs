// ==========================================
// 减速电机选型系统 - 覆盖率 API
// ==========================================
// 职责: 封装编排器与覆盖率仓储，提供生成与只读查询接口
// 架构: API 层 → Engine 层 (CoverageOrchestrator) / Repository 层
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::coverage::{CoverageReport, CoverageResult, CoverageSummary};
use crate::domain::types::CaseStatus;
use crate::engine::orchestrator::CoverageOrchestrator;
use crate::repository::coverage_repo::CoverageStore;
use std::sync::Arc;

// ==========================================
// CoverageApi - 覆盖率 API
// ==========================================

/// 覆盖率API
///
/// 职责：
/// 1. 触发覆盖率生成（委托编排器）
/// 2. 汇总查询：扫描持久化行现算计数，不信任任何缓存汇总
/// 3. 用例列表查询：按状态过滤
pub struct CoverageApi {
    orchestrator: Arc<CoverageOrchestrator>,
    store: Arc<dyn CoverageStore>,
}

impl CoverageApi {
    /// 创建新的CoverageApi实例
    ///
    /// # 参数
    /// - orchestrator: 覆盖率编排器
    /// - store: 覆盖率持久化接口
    pub fn new(orchestrator: Arc<CoverageOrchestrator>, store: Arc<dyn CoverageStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    /// 执行一次覆盖率生成
    ///
    /// # 返回
    /// - Ok(CoverageReport): 内存汇总 + 批量写入错误列表
    ///   （errors 非空时计数可能多于实际落库行数，前端须分开呈现）
    /// - Err(ApiError): 枚举或删除阶段的致命错误
    pub async fn generate_coverage(&self) -> ApiResult<CoverageReport> {
        self.orchestrator
            .generate_coverage()
            .await
            .map_err(|e| ApiError::GenerationError(e.to_string()))
    }

    /// 查询覆盖率汇总（现算）
    ///
    /// # 返回
    /// - Ok(CoverageSummary): 扫描持久化行按状态计数的汇总
    pub fn get_summary(&self) -> ApiResult<CoverageSummary> {
        let counts = self.store.count_by_status()?;

        let mut summary = CoverageSummary::new();
        summary.resolved = counts.get(&CaseStatus::Resolved).copied().unwrap_or(0);
        summary.ambiguous = counts.get(&CaseStatus::Ambiguous).copied().unwrap_or(0);
        summary.unresolved = counts.get(&CaseStatus::Unresolved).copied().unwrap_or(0);
        summary.invalid = counts.get(&CaseStatus::Invalid).copied().unwrap_or(0);
        summary.total = summary.resolved + summary.ambiguous + summary.unresolved + summary.invalid;
        Ok(summary)
    }

    /// 查询覆盖率用例列表
    ///
    /// # 参数
    /// - status_filter: 可选的单一状态过滤
    ///
    /// # 返回
    /// - 按状态、用例键排序的结果行
    pub fn get_cases(&self, status_filter: Option<CaseStatus>) -> ApiResult<Vec<CoverageResult>> {
        Ok(self.store.list(status_filter)?)
    }

    /// 按状态字符串查询覆盖率用例列表（校验入参）
    ///
    /// # 参数
    /// - status: 状态字符串，如 "RESOLVED"；空白等同于不过滤
    pub fn get_cases_by_status_str(&self, status: Option<&str>) -> ApiResult<Vec<CoverageResult>> {
        let filter = match status {
            None => None,
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(CaseStatus::from_str(s).ok_or_else(|| {
                ApiError::InvalidInput(format!("未知的用例状态: {}", s))
            })?),
        };
        self.get_cases(filter)
    }
}
