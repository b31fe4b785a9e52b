// ==========================================
// 减速电机选型系统 - 导入层
// ==========================================
// 职责: 外部目录数据装载
// ==========================================

pub mod catalog_importer;

pub use catalog_importer::{CatalogImporter, ImportReport};
