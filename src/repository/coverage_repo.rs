// ==========================================
// 减速电机选型系统 - 覆盖率结果仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 生命周期: 覆盖率表由单次生成运行整表替换（先全删后批量插入）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::coverage::CoverageResult;
use crate::domain::types::CaseStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// CoverageStore - 覆盖率持久化接口
// ==========================================

/// 覆盖率持久化接口
///
/// 编排器只依赖此接口；SQLite 实现见 [`CoverageResultRepository`]。
pub trait CoverageStore: Send + Sync {
    /// 无条件删除全部覆盖率行（整表替换的第一阶段）
    fn delete_all(&self) -> RepositoryResult<usize>;

    /// 批量插入一批覆盖率行（单事务）
    fn insert_batch(&self, results: &[CoverageResult]) -> RepositoryResult<usize>;

    /// 扫描持久化行按状态计数（汇总始终现算，不信任缓存行）
    fn count_by_status(&self) -> RepositoryResult<HashMap<CaseStatus, u64>>;

    /// 查询覆盖率行，按状态、用例键排序，可选按单一状态过滤
    fn list(&self, status_filter: Option<CaseStatus>) -> RepositoryResult<Vec<CoverageResult>>;
}

// ==========================================
// CoverageResultRepository - SQLite 实现
// ==========================================

/// 覆盖率结果仓储
/// 职责: 管理 coverage_result 表的替换写入与只读查询
pub struct CoverageResultRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CoverageResultRepository {
    /// 创建新的 CoverageResultRepository 实例
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
}

impl CoverageStore for CoverageResultRepository {
    fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let deleted = conn.execute("DELETE FROM coverage_result", [])?;
        Ok(deleted)
    }

    fn insert_batch(&self, results: &[CoverageResult]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for result in results {
            let requirement = serde_json::to_string(&result.requirement)
                .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;
            let resolved_pns = serde_json::to_string(&result.resolved_pns)
                .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;
            let slots = serde_json::to_string(&result.slots)
                .map_err(|e| RepositoryError::ValidationError(e.to_string()))?;

            tx.execute(
                r#"
                INSERT OR REPLACE INTO coverage_result (
                    case_key, requirement, status, resolved_pns,
                    message, slots, last_checked_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    result.case_key,
                    requirement,
                    result.status.to_db_str(),
                    resolved_pns,
                    result.message,
                    slots,
                    result.checked_at.to_rfc3339(),
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    fn count_by_status(&self) -> RepositoryResult<HashMap<CaseStatus, u64>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT status, COUNT(*) FROM coverage_result GROUP BY status")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = HashMap::new();
        for row in rows {
            let (status_str, count) = row?;
            let status = CaseStatus::from_str(&status_str).ok_or_else(|| {
                RepositoryError::ValidationError(format!("未知的用例状态: {}", status_str))
            })?;
            counts.insert(status, count as u64);
        }
        Ok(counts)
    }

    fn list(&self, status_filter: Option<CaseStatus>) -> RepositoryResult<Vec<CoverageResult>> {
        let conn = self.get_conn()?;

        let mut results = Vec::new();
        match status_filter {
            Some(status) => {
                let mut stmt = conn.prepare(
                    "SELECT case_key, requirement, status, resolved_pns, message, slots, last_checked_at \
                     FROM coverage_result WHERE status = ?1 ORDER BY status, case_key",
                )?;
                let rows = stmt.query_map(params![status.to_db_str()], row_to_coverage_result)?;
                for row in rows {
                    results.push(row??);
                }
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT case_key, requirement, status, resolved_pns, message, slots, last_checked_at \
                     FROM coverage_result ORDER BY status, case_key",
                )?;
                let rows = stmt.query_map([], row_to_coverage_result)?;
                for row in rows {
                    results.push(row??);
                }
            }
        }
        Ok(results)
    }
}

/// 行映射: coverage_result → CoverageResult
///
/// JSON 列或状态列损坏按 ValidationError 处理（内层 Result）。
fn row_to_coverage_result(
    row: &Row<'_>,
) -> rusqlite::Result<Result<CoverageResult, RepositoryError>> {
    let case_key: String = row.get(0)?;
    let requirement_text: String = row.get(1)?;
    let status_str: String = row.get(2)?;
    let resolved_pns_text: String = row.get(3)?;
    let message: Option<String> = row.get(4)?;
    let slots_text: String = row.get(5)?;
    let checked_at_text: String = row.get(6)?;

    Ok(parse_coverage_row(
        case_key,
        requirement_text,
        status_str,
        resolved_pns_text,
        message,
        slots_text,
        checked_at_text,
    ))
}

fn parse_coverage_row(
    case_key: String,
    requirement_text: String,
    status_str: String,
    resolved_pns_text: String,
    message: Option<String>,
    slots_text: String,
    checked_at_text: String,
) -> Result<CoverageResult, RepositoryError> {
    let requirement = serde_json::from_str(&requirement_text)
        .map_err(|e| RepositoryError::ValidationError(format!("requirement 列损坏: {}", e)))?;
    let status = CaseStatus::from_str(&status_str)
        .ok_or_else(|| RepositoryError::ValidationError(format!("未知的用例状态: {}", status_str)))?;
    let resolved_pns = serde_json::from_str(&resolved_pns_text)
        .map_err(|e| RepositoryError::ValidationError(format!("resolved_pns 列损坏: {}", e)))?;
    let slots = serde_json::from_str(&slots_text)
        .map_err(|e| RepositoryError::ValidationError(format!("slots 列损坏: {}", e)))?;
    let checked_at = DateTime::parse_from_rfc3339(&checked_at_text)
        .map_err(|e| RepositoryError::ValidationError(format!("last_checked_at 列损坏: {}", e)))?
        .with_timezone(&Utc);

    Ok(CoverageResult {
        case_key,
        requirement,
        status,
        resolved_pns,
        message,
        slots,
        checked_at,
    })
}
