// ==========================================
// 减速电机选型系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 集中建表语句，目录表与覆盖率表在同一处初始化
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// # 表说明
/// - `catalog_component`: 供应商目录，元数据以 JSON 文本存储，
///   属性过滤依赖 json_extract
/// - `coverage_result`: 覆盖率结果，以用例键为主键，每次生成
///   整表替换（先全删后批量插入）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS catalog_component (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            vendor TEXT NOT NULL,
            component_type TEXT NOT NULL,
            part_number TEXT NOT NULL,
            description TEXT,
            metadata TEXT NOT NULL DEFAULT '{}',
            UNIQUE(vendor, component_type, part_number)
        );

        CREATE INDEX IF NOT EXISTS idx_catalog_vendor_type
            ON catalog_component(vendor, component_type);

        CREATE TABLE IF NOT EXISTS coverage_result (
            case_key TEXT PRIMARY KEY,
            requirement TEXT NOT NULL,
            status TEXT NOT NULL,
            resolved_pns TEXT NOT NULL DEFAULT '[]',
            message TEXT,
            slots TEXT NOT NULL DEFAULT '[]',
            last_checked_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_coverage_status
            ON coverage_result(status, case_key);
        "#,
    )?;
    Ok(())
}
