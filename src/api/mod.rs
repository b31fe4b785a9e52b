// ==========================================
// 减速电机选型系统 - API 层
// ==========================================
// 职责: 校验入参,委托引擎与仓储,转换错误
// ==========================================

pub mod coverage_api;
pub mod error;

// 重导出核心类型
pub use coverage_api::CoverageApi;
pub use error::{ApiError, ApiResult};
