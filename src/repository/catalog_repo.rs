// ==========================================
// 减速电机选型系统 - 供应商目录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================
// 存储: catalog_component 表，元数据为 JSON 文本，
//       属性过滤经 json_extract 下推到数据库
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::component::{AttrFilter, AttrValue, ComponentRecord};
use crate::engine::catalog::CatalogReader;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// ComponentCatalogRepository - 目录仓储
// ==========================================

/// 供应商目录仓储
/// 职责: 管理 catalog_component 表的写入与属性过滤查询
/// 红线: 不含选型规则，只负责数据访问
pub struct ComponentCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ComponentCatalogRepository {
    /// 创建新的 ComponentCatalogRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量插入目录记录（INSERT OR REPLACE，事务内）
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    pub fn insert_batch(&self, records: &[ComponentRecord]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for record in records {
            let metadata = serde_json::to_string(&record.metadata)
                .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;
            tx.execute(
                r#"
                INSERT OR REPLACE INTO catalog_component (
                    vendor, component_type, part_number, description, metadata
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    record.vendor,
                    record.component_type,
                    record.part_number,
                    record.description,
                    metadata,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 按属性过滤查询目录记录
    ///
    /// # 参数
    /// - vendor: 供应商代码
    /// - component_type: 部件类型
    /// - filters: 元数据属性过滤条件（全部满足才命中）
    ///
    /// # 返回
    /// - 按件号升序排列的记录列表（选型确定性依赖此顺序）
    pub fn query_components_sync(
        &self,
        vendor: &str,
        component_type: &str,
        filters: &[AttrFilter],
    ) -> RepositoryResult<Vec<ComponentRecord>> {
        let conn = self.get_conn()?;

        let mut sql = String::from(
            "SELECT vendor, component_type, part_number, description, metadata \
             FROM catalog_component WHERE vendor = ? AND component_type = ?",
        );
        let mut bind_values: Vec<SqlValue> = vec![
            SqlValue::Text(vendor.to_string()),
            SqlValue::Text(component_type.to_string()),
        ];

        for filter in filters {
            sql.push_str(" AND json_extract(metadata, ?) = ?");
            bind_values.push(SqlValue::Text(format!("$.{}", filter.key)));
            match &filter.value {
                AttrValue::Text(s) => bind_values.push(SqlValue::Text(s.clone())),
                AttrValue::Number(n) => bind_values.push(SqlValue::Real(*n)),
            }
        }

        sql.push_str(" ORDER BY part_number");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(bind_values), row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// 目录中实际存在的齿轮箱机座号全集（去重，升序）
    pub fn distinct_gear_unit_sizes_sync(&self, vendor: &str) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT json_extract(metadata, '$.size') \
             FROM catalog_component \
             WHERE vendor = ?1 AND component_type = 'gear_unit' \
               AND json_extract(metadata, '$.size') IS NOT NULL \
             ORDER BY 1",
        )?;
        let rows = stmt.query_map(params![vendor], |row| row.get::<_, String>(0))?;

        let mut sizes = Vec::new();
        for row in rows {
            sizes.push(row?);
        }
        Ok(sizes)
    }

    /// 性能点中实际存在的减速比全集（去重，升序）
    pub fn distinct_ratios_sync(&self, vendor: &str) -> RepositoryResult<Vec<f64>> {
        self.distinct_performance_values(vendor, "$.ratio")
    }

    /// 性能点中实际存在的电机功率全集（去重，升序）
    pub fn distinct_motor_powers_sync(&self, vendor: &str) -> RepositoryResult<Vec<f64>> {
        self.distinct_performance_values(vendor, "$.power")
    }

    fn distinct_performance_values(
        &self,
        vendor: &str,
        json_path: &str,
    ) -> RepositoryResult<Vec<f64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT json_extract(metadata, ?1) \
             FROM catalog_component \
             WHERE vendor = ?2 AND component_type = 'performance_point' \
               AND json_extract(metadata, ?1) IS NOT NULL \
             ORDER BY 1",
        )?;
        let rows = stmt.query_map(params![json_path, vendor], |row| row.get::<_, f64>(0))?;

        let mut values = Vec::new();
        for row in rows {
            values.push(row?);
        }
        Ok(values)
    }

    /// 件号是否为真实目录条目（存在且未标记为占位记录）
    pub fn is_real_part_sync(&self, vendor: &str, part_number: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM catalog_component \
             WHERE vendor = ?1 AND part_number = ?2 \
               AND IFNULL(json_extract(metadata, '$.placeholder'), 0) = 0",
            params![vendor, part_number],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 目录记录总数（按供应商）
    pub fn count_components(&self, vendor: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM catalog_component WHERE vendor = ?1",
            params![vendor],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// 行映射: catalog_component → ComponentRecord
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ComponentRecord> {
    let metadata_text: String = row.get(4)?;
    let metadata = serde_json::from_str(&metadata_text).unwrap_or_default();
    Ok(ComponentRecord {
        vendor: row.get(0)?,
        component_type: row.get(1)?,
        part_number: row.get(2)?,
        description: row.get(3)?,
        metadata,
    })
}

// ==========================================
// CatalogReader 实现 - 引擎层消费的读取接口
// ==========================================

#[async_trait]
impl CatalogReader for ComponentCatalogRepository {
    async fn query_components(
        &self,
        vendor: &str,
        component_type: &str,
        filters: &[AttrFilter],
    ) -> RepositoryResult<Vec<ComponentRecord>> {
        self.query_components_sync(vendor, component_type, filters)
    }

    async fn distinct_gear_unit_sizes(&self, vendor: &str) -> RepositoryResult<Vec<String>> {
        self.distinct_gear_unit_sizes_sync(vendor)
    }

    async fn distinct_ratios(&self, vendor: &str) -> RepositoryResult<Vec<f64>> {
        self.distinct_ratios_sync(vendor)
    }

    async fn distinct_motor_powers(&self, vendor: &str) -> RepositoryResult<Vec<f64>> {
        self.distinct_motor_powers_sync(vendor)
    }

    async fn is_real_part(&self, vendor: &str, part_number: &str) -> RepositoryResult<bool> {
        self.is_real_part_sync(vendor, part_number)
    }
}
