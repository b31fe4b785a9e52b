// ==========================================
// 减速电机选型系统 - 引擎层
// ==========================================
// 职责: 实现选型与覆盖率业务规则,不拼 SQL
// 红线: Engine 不拼 SQL, 所有判定必须输出 reason
// ==========================================

pub mod catalog;
pub mod classifier;
pub mod enumerator;
pub mod orchestrator;
pub mod resolver;

// 重导出核心引擎
pub use catalog::CatalogReader;
pub use classifier::CaseClassifier;
pub use enumerator::InputSpaceEnumerator;
pub use orchestrator::CoverageOrchestrator;
pub use resolver::{BomResolver, ResolveError, ResolveOptions};
