// ==========================================
// CoverageApi 集成测试
// ==========================================
// 测试目标: 验证汇总现算、状态字符串入口与空库行为
// ==========================================


use gearmotor_aps::api::{ApiError, CoverageApi};
use gearmotor_aps::config::CoverageConfig;
use gearmotor_aps::domain::types::CaseStatus;
use gearmotor_aps::engine::orchestrator::CoverageOrchestrator;
use gearmotor_aps::repository::{ComponentCatalogRepository, CoverageResultRepository};
use std::sync::Arc;
use test_helpers::{create_test_db, seed_catalog};

fn build_api(db_path: &str) -> CoverageApi {
    let catalog = Arc::new(ComponentCatalogRepository::new(db_path).unwrap());
    let store: Arc<CoverageResultRepository> =
        Arc::new(CoverageResultRepository::new(db_path).unwrap());
    let orchestrator = Arc::new(CoverageOrchestrator::new(
        catalog,
        store.clone(),
        Arc::new(CoverageConfig::default()),
    ));
    CoverageApi::new(orchestrator, store)
}

#[tokio::test]
async fn test_summary_on_empty_store_is_zero() {
    let (_file, db_path) = create_test_db().unwrap();
    let api = build_api(&db_path);

    let summary = api.get_summary().unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.resolved, 0);
    assert_eq!(summary.ambiguous, 0);
    assert_eq!(summary.unresolved, 0);
    assert_eq!(summary.invalid, 0);
    assert!(summary.is_conserved());
}

#[tokio::test]
async fn test_summary_matches_generation_report() {
    let (_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();
    let api = build_api(&db_path);

    let report = api.generate_coverage().await.unwrap();
    assert!(report.errors.is_empty());

    // 现算汇总来自持久化行，无写入错误时两者必须相等
    let summary = api.get_summary().unwrap();
    assert_eq!(summary.total, report.summary.total);
    assert_eq!(summary.resolved, report.summary.resolved);
    assert_eq!(summary.ambiguous, report.summary.ambiguous);
    assert_eq!(summary.unresolved, report.summary.unresolved);
    assert_eq!(summary.invalid, report.summary.invalid);
}

#[tokio::test]
async fn test_status_string_entrypoint() {
    let (_file, db_path) = create_test_db().unwrap();
    seed_catalog(&db_path).unwrap();
    let api = build_api(&db_path);
    api.generate_coverage().await.unwrap();

    // 合法状态
    let resolved = api.get_cases_by_status_str(Some("RESOLVED")).unwrap();
    assert_eq!(resolved.len(), 7);
    assert!(resolved.iter().all(|c| c.status == CaseStatus::Resolved));

    // 空白字符串等同不过滤
    let all = api.get_cases_by_status_str(Some("  ")).unwrap();
    assert_eq!(all.len(), 16);
    let all = api.get_cases_by_status_str(None).unwrap();
    assert_eq!(all.len(), 16);

    // 未知状态被拒绝
    let err = api.get_cases_by_status_str(Some("PENDING")).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}
