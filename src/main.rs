// ==========================================
// 带式输送机减速电机选型系统 - 主入口
// ==========================================
// 用途: 初始化数据库，按需导入目录 CSV，执行一次覆盖率生成
// 用法: gearmotor-aps [--db <路径>] [--catalog <CSV路径>] [--config <JSON路径>]
// ==========================================

use anyhow::{Context, Result};
use gearmotor_aps::api::CoverageApi;
use gearmotor_aps::config::CoverageConfig;
use gearmotor_aps::engine::orchestrator::CoverageOrchestrator;
use gearmotor_aps::importer::CatalogImporter;
use gearmotor_aps::repository::{ComponentCatalogRepository, CoverageResultRepository};
use gearmotor_aps::{db, logging};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// 默认数据库路径（用户数据目录下）
fn default_db_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("无法确定用户数据目录")?;
    let dir = base.join("gearmotor-aps");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("无法创建数据目录: {}", dir.display()))?;
    Ok(dir.join("gearmotor.db"))
}

/// 命令行参数
struct Args {
    db_path: Option<PathBuf>,
    catalog_csv: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        db_path: None,
        catalog_csv: None,
        config_file: None,
    };

    let mut iter = env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut take_value = |name: &str| {
            iter.next()
                .map(PathBuf::from)
                .with_context(|| format!("{} 需要一个路径参数", name))
        };
        match flag.as_str() {
            "--db" => args.db_path = Some(take_value("--db")?),
            "--catalog" => args.catalog_csv = Some(take_value("--catalog")?),
            "--config" => args.config_file = Some(take_value("--config")?),
            other => anyhow::bail!("未知参数: {}", other),
        }
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    info!("==================================================");
    info!("{}", gearmotor_aps::APP_NAME);
    info!("系统版本: {}", gearmotor_aps::VERSION);
    info!("==================================================");

    let args = parse_args()?;

    // 加载配置
    let config = match &args.config_file {
        Some(path) => CoverageConfig::from_file(path)
            .with_context(|| format!("配置加载失败: {}", path.display()))?,
        None => CoverageConfig::default(),
    };
    let config = Arc::new(config);

    // 打开数据库并初始化 schema
    let db_path = match args.db_path {
        Some(path) => path,
        None => default_db_path()?,
    };
    let db_path_str = db_path
        .to_str()
        .context("数据库路径包含非法字符")?
        .to_string();
    info!("使用数据库: {}", db_path_str);

    {
        let conn = db::open_sqlite_connection(&db_path_str)?;
        db::init_schema(&conn)?;
    }

    let catalog_repo = Arc::new(ComponentCatalogRepository::new(&db_path_str)?);
    let coverage_repo = Arc::new(CoverageResultRepository::new(&db_path_str)?);

    // 按需导入目录 CSV
    if let Some(csv_path) = &args.catalog_csv {
        let importer = CatalogImporter::new(catalog_repo.clone());
        let report = importer.import_csv(csv_path)?;
        info!(
            imported = report.imported,
            skipped = report.skipped,
            "目录导入结果"
        );
        for error in &report.errors {
            warn!("导入错误: {}", error);
        }
    }

    let component_count = catalog_repo.count_components(&config.vendor)?;
    info!(vendor = %config.vendor, components = component_count, "目录就绪");

    // 执行覆盖率生成
    let orchestrator = Arc::new(CoverageOrchestrator::new(
        catalog_repo.clone(),
        coverage_repo.clone(),
        config.clone(),
    ));
    let api = CoverageApi::new(orchestrator, coverage_repo);

    let report = api.generate_coverage().await?;
    info!(
        total = report.summary.total,
        resolved = report.summary.resolved,
        ambiguous = report.summary.ambiguous,
        unresolved = report.summary.unresolved,
        invalid = report.summary.invalid,
        "覆盖率汇总"
    );
    if !report.errors.is_empty() {
        // 批量写入失败意味着落库行数可能少于汇总计数
        warn!(errors = report.errors.len(), "存在批量写入错误");
        for error in &report.errors {
            warn!("写入错误: {}", error);
        }
    }

    Ok(())
}
