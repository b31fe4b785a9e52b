// ==========================================
// 减速电机选型系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod bom;
pub mod component;
pub mod coverage;
pub mod requirement;
pub mod types;

// 重导出核心类型
pub use bom::{BomResolution, ComponentSlot};
pub use component::{
    AttrFilter, AttrValue, ComponentRecord, COMPONENT_TYPE_PERFORMANCE_POINT,
};
pub use coverage::{CoverageReport, CoverageResult, CoverageSummary};
pub use requirement::{RequirementInput, SENTINEL_ANY, SENTINEL_NONE};
pub use types::{CaseStatus, ComponentCategory, MountingStyle, ShaftOption, ShaftStyle};
