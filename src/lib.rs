// ==========================================
// 带式输送机减速电机选型系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 选型部件解析与覆盖率分析
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    CaseStatus, ComponentCategory, MountingStyle, ShaftOption, ShaftStyle,
};

// 领域实体
pub use domain::{
    BomResolution, ComponentRecord, ComponentSlot, CoverageReport, CoverageResult,
    CoverageSummary, RequirementInput,
};

// 引擎
pub use engine::{
    BomResolver, CaseClassifier, CatalogReader, CoverageOrchestrator, InputSpaceEnumerator,
    ResolveError, ResolveOptions,
};

// 仓储
pub use repository::{ComponentCatalogRepository, CoverageResultRepository, CoverageStore};

// API
pub use api::CoverageApi;

// 配置
pub use config::CoverageConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "带式输送机减速电机选型系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
