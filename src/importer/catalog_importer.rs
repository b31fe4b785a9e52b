// ==========================================
// 减速电机选型系统 - 目录 CSV 导入
// ==========================================
// 职责: 把供应商目录 CSV 装载进 catalog_component 表
// 约束: 行级校验，坏行收集后跳过，不中止整个导入
// ==========================================

use crate::domain::component::ComponentRecord;
use crate::repository::catalog_repo::ComponentCatalogRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// 目录插入批大小
const IMPORT_BATCH_SIZE: usize = 200;

// ==========================================
// RawCatalogRow - CSV 原始行
// ==========================================

/// CSV 原始行
///
/// 可选列为空字符串视同缺失；属性列并入元数据 JSON。
#[derive(Debug, Deserialize)]
struct RawCatalogRow {
    vendor: String,
    component_type: String,
    part_number: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    series: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    ratio: Option<f64>,
    #[serde(default)]
    power: Option<f64>,
    #[serde(default)]
    shaft_option: Option<String>,
    #[serde(default)]
    shaft_style: Option<String>,
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    placeholder: Option<bool>,
}

impl RawCatalogRow {
    /// 校验并转换为目录记录
    fn into_record(self) -> Result<ComponentRecord, String> {
        if self.vendor.trim().is_empty() {
            return Err("vendor 为空".to_string());
        }
        if self.component_type.trim().is_empty() {
            return Err("component_type 为空".to_string());
        }
        if self.part_number.trim().is_empty() {
            return Err("part_number 为空".to_string());
        }

        let mut metadata = Map::new();
        let text_attr = |metadata: &mut Map<String, Value>, key: &str, value: Option<String>| {
            if let Some(v) = value {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    metadata.insert(key.to_string(), Value::String(trimmed.to_string()));
                }
            }
        };
        text_attr(&mut metadata, "series", self.series);
        text_attr(&mut metadata, "size", self.size);
        text_attr(&mut metadata, "shaft_option", self.shaft_option);
        text_attr(&mut metadata, "shaft_style", self.shaft_style);
        text_attr(&mut metadata, "variant", self.variant);
        if let Some(ratio) = self.ratio {
            metadata.insert("ratio".to_string(), Value::from(ratio));
        }
        if let Some(power) = self.power {
            metadata.insert("power".to_string(), Value::from(power));
        }
        if let Some(true) = self.placeholder {
            metadata.insert("placeholder".to_string(), Value::Bool(true));
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(ComponentRecord {
            vendor: self.vendor.trim().to_string(),
            component_type: self.component_type.trim().to_string(),
            part_number: self.part_number.trim().to_string(),
            description,
            metadata,
        })
    }
}

// ==========================================
// ImportReport - 导入结果
// ==========================================

/// 一次目录导入的结果
#[derive(Debug, Clone)]
pub struct ImportReport {
    /// 成功入库行数
    pub imported: usize,
    /// 因校验失败跳过的行数
    pub skipped: usize,
    /// 行级错误消息（行号 + 原因）
    pub errors: Vec<String>,
}

// ==========================================
// CatalogImporter - 目录导入器
// ==========================================

/// 目录导入器
pub struct CatalogImporter {
    catalog_repo: Arc<ComponentCatalogRepository>,
}

impl CatalogImporter {
    /// 创建新的导入器实例
    pub fn new(catalog_repo: Arc<ComponentCatalogRepository>) -> Self {
        Self { catalog_repo }
    }

    /// 从 CSV 文件导入目录
    ///
    /// # 返回
    /// - Ok(ImportReport): 导入统计与行级错误
    /// - Err: 文件不可读或数据库写入失败
    pub fn import_csv(&self, path: &Path) -> RepositoryResult<ImportReport> {
        info!(path = %path.display(), "开始导入目录 CSV");

        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| RepositoryError::ValidationError(format!("CSV 打开失败: {}", e)))?;

        let mut batch: Vec<ComponentRecord> = Vec::new();
        let mut report = ImportReport {
            imported: 0,
            skipped: 0,
            errors: Vec::new(),
        };

        for (index, row) in reader.deserialize::<RawCatalogRow>().enumerate() {
            // CSV 数据行号（表头为第 1 行）
            let line_no = index + 2;
            let record = match row {
                Ok(raw) => match raw.into_record() {
                    Ok(record) => record,
                    Err(reason) => {
                        warn!(line_no, reason = %reason, "目录行校验失败，已跳过");
                        report.skipped += 1;
                        report.errors.push(format!("第{}行: {}", line_no, reason));
                        continue;
                    }
                },
                Err(e) => {
                    warn!(line_no, error = %e, "目录行解析失败，已跳过");
                    report.skipped += 1;
                    report.errors.push(format!("第{}行: {}", line_no, e));
                    continue;
                }
            };

            batch.push(record);
            if batch.len() >= IMPORT_BATCH_SIZE {
                report.imported += self.catalog_repo.insert_batch(&batch)?;
                batch.clear();
            }
        }

        if !batch.is_empty() {
            report.imported += self.catalog_repo.insert_batch(&batch)?;
        }

        info!(
            imported = report.imported,
            skipped = report.skipped,
            "目录 CSV 导入完成"
        );
        Ok(report)
    }
}
