// ==========================================
// 减速电机选型系统 - 覆盖率编排器
// ==========================================
// 职责: 协调 枚举 → 解析 → 分类 → 持久化 全流程
// ==========================================
// 规则要点:
// - 单飞保护: 并发生成运行经异步互斥锁串行化
// - 全量替换: 先无条件全删（删除失败整次运行中止），再批量插入
// - 批量插入失败不中止运行，错误消息收集后继续后续批次；
//   因此汇总计数可能多于实际落库行数，调用方须分开呈现
// - 用例逐个顺序处理，汇总累加无需同步
// ==========================================

use crate::config::CoverageConfig;
use crate::domain::coverage::{CoverageReport, CoverageResult, CoverageSummary};
use crate::domain::requirement::RequirementInput;
use crate::engine::catalog::CatalogReader;
use crate::engine::classifier::CaseClassifier;
use crate::engine::enumerator::InputSpaceEnumerator;
use crate::engine::resolver::{BomResolver, ResolveOptions};
use crate::repository::coverage_repo::CoverageStore;
use crate::repository::error::RepositoryResult;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

// ==========================================
// CoverageOrchestrator - 覆盖率编排器
// ==========================================

/// 覆盖率编排器
pub struct CoverageOrchestrator {
    catalog: Arc<dyn CatalogReader>,
    store: Arc<dyn CoverageStore>,
    resolver: BomResolver,
    enumerator: InputSpaceEnumerator,
    config: Arc<CoverageConfig>,
    /// 单飞保护: 同一时刻只允许一次生成运行进入删除-插入序列
    run_guard: Mutex<()>,
}

impl CoverageOrchestrator {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - catalog: 目录读取接口
    /// - store: 覆盖率持久化接口
    /// - config: 运行配置
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        store: Arc<dyn CoverageStore>,
        config: Arc<CoverageConfig>,
    ) -> Self {
        Self {
            resolver: BomResolver::new(catalog.clone(), &config.vendor),
            enumerator: InputSpaceEnumerator::new(catalog.clone(), config.clone()),
            catalog,
            store,
            config,
            run_guard: Mutex::new(()),
        }
    }

    /// 执行一次完整覆盖率生成
    ///
    /// # 流程
    /// 1. 枚举输入空间
    /// 2. 无条件删除既有覆盖率行（失败即中止，错误上抛）
    /// 3. 逐用例顺序执行 解析 → 分类，累加汇总计数
    /// 4. 按批大小批量插入（失败批记入 errors，运行继续）
    ///
    /// # 返回
    /// - Ok(CoverageReport): 内存汇总 + 批量写入错误列表
    /// - Err: 枚举或删除阶段的致命错误
    pub async fn generate_coverage(&self) -> RepositoryResult<CoverageReport> {
        let _guard = self.run_guard.lock().await;

        info!(vendor = %self.config.vendor, "开始生成覆盖率报告");

        // ==========================================
        // 步骤1: 枚举输入空间
        // ==========================================
        let inputs = self.enumerator.enumerate().await?;

        // ==========================================
        // 步骤2: 全量删除既有结果（删除失败 = 致命）
        // ==========================================
        let deleted = self.store.delete_all()?;
        debug!(deleted, "既有覆盖率行已清空");

        // ==========================================
        // 步骤3: 逐用例 解析 → 分类
        // ==========================================
        let mut summary = CoverageSummary::new();
        let mut results: Vec<CoverageResult> = Vec::with_capacity(inputs.len());

        for input in &inputs {
            let result = self.run_coverage_case(input).await;
            summary.record(result.status);
            results.push(result);
        }

        // ==========================================
        // 步骤4: 批量持久化（失败批收集后继续）
        // ==========================================
        let mut errors: Vec<String> = Vec::new();
        for batch in results.chunks(self.config.insert_batch_size.max(1)) {
            if let Err(err) = self.store.insert_batch(batch) {
                warn!(batch_size = batch.len(), error = %err, "覆盖率批量插入失败，继续后续批次");
                errors.push(err.to_string());
            }
        }

        info!(
            run_id = %summary.run_id,
            total = summary.total,
            resolved = summary.resolved,
            ambiguous = summary.ambiguous,
            unresolved = summary.unresolved,
            invalid = summary.invalid,
            insert_errors = errors.len(),
            "覆盖率生成完成"
        );

        Ok(CoverageReport { summary, errors })
    }

    /// 执行单个覆盖率用例
    ///
    /// 解析器错误在此被捕获并转为 INVALID 结果行，绝不上抛。
    async fn run_coverage_case(&self, input: &RequirementInput) -> CoverageResult {
        let descriptor = input.model_descriptor();
        let options = ResolveOptions::from_requirement(input);

        let outcome = self
            .resolver
            .resolve(&descriptor, input.motor_power, &options)
            .await;
        let (status, message) = CaseClassifier::classify_outcome(&outcome);

        // 命中件号经目录独立校验后才进入 resolved_pns
        let mut resolved_pns = Vec::new();
        let slots = match &outcome {
            Ok(resolution) => {
                for part_number in resolution.found_part_numbers() {
                    match self
                        .catalog
                        .is_real_part(&self.config.vendor, part_number)
                        .await
                    {
                        Ok(true) => resolved_pns.push(part_number.to_string()),
                        Ok(false) => {
                            warn!(part_number, "命中件号未通过真实目录校验，已剔除");
                        }
                        Err(err) => {
                            warn!(part_number, error = %err, "件号校验失败，按未验证处理");
                        }
                    }
                }
                resolution.slots.clone()
            }
            Err(_) => Vec::new(),
        };

        CoverageResult {
            case_key: input.case_key(),
            requirement: input.clone(),
            status,
            resolved_pns,
            message,
            slots,
            checked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::CaseStatus;
    use crate::engine::catalog::testing::StaticCatalog;
    use crate::repository::error::RepositoryError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    const VENDOR: &str = "DODGE";

    /// 内存覆盖率存储，可注入批次失败
    struct MemoryStore {
        rows: StdMutex<Vec<CoverageResult>>,
        calls: StdMutex<Vec<&'static str>>,
        fail_delete: bool,
        /// 第 N 次 insert_batch 调用失败（1 起）
        fail_batches: Vec<usize>,
        insert_calls: AtomicUsize,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                rows: StdMutex::new(Vec::new()),
                calls: StdMutex::new(Vec::new()),
                fail_delete: false,
                fail_batches: Vec::new(),
                insert_calls: AtomicUsize::new(0),
            }
        }
    }

    impl CoverageStore for MemoryStore {
        fn delete_all(&self) -> RepositoryResult<usize> {
            self.calls.lock().unwrap().push("delete_all");
            if self.fail_delete {
                return Err(RepositoryError::DatabaseQueryError("表被锁定".to_string()));
            }
            let mut rows = self.rows.lock().unwrap();
            let deleted = rows.len();
            rows.clear();
            Ok(deleted)
        }

        fn insert_batch(&self, results: &[CoverageResult]) -> RepositoryResult<usize> {
            self.calls.lock().unwrap().push("insert_batch");
            let call_no = self.insert_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_batches.contains(&call_no) {
                return Err(RepositoryError::DatabaseTransactionError(format!(
                    "批次 {} 写入失败",
                    call_no
                )));
            }
            self.rows.lock().unwrap().extend_from_slice(results);
            Ok(results.len())
        }

        fn count_by_status(&self) -> RepositoryResult<HashMap<CaseStatus, u64>> {
            let mut counts = HashMap::new();
            for row in self.rows.lock().unwrap().iter() {
                *counts.entry(row.status).or_insert(0) += 1;
            }
            Ok(counts)
        }

        fn list(
            &self,
            status_filter: Option<CaseStatus>,
        ) -> RepositoryResult<Vec<CoverageResult>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .filter(|r| status_filter.map_or(true, |s| r.status == s))
                .cloned()
                .collect())
        }
    }

    fn test_catalog() -> Arc<StaticCatalog> {
        Arc::new(StaticCatalog::new(vec![
            StaticCatalog::record(
                VENDOR,
                "gear_unit",
                "QD63A10",
                json!({"series": "QD", "size": "63", "ratio": 10.0}),
            ),
            StaticCatalog::record(VENDOR, "adapter", "AD63", json!({"size": "63"})),
            StaticCatalog::record(VENDOR, "motor", "MT050", json!({"power": 0.5})),
            StaticCatalog::record(
                VENDOR,
                "performance_point",
                "PP-10-050",
                json!({"ratio": 10.0, "power": 0.5}),
            ),
        ]))
    }

    fn orchestrator_with(store: Arc<MemoryStore>, batch_size: usize) -> CoverageOrchestrator {
        let config = CoverageConfig {
            insert_batch_size: batch_size,
            ..CoverageConfig::default()
        };
        CoverageOrchestrator::new(test_catalog(), store, Arc::new(config))
    }

    #[tokio::test]
    async fn test_summary_conservation_and_persistence() {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = orchestrator_with(store.clone(), 100);

        let report = orchestrator.generate_coverage().await.unwrap();

        // 机座号 63 一个: 8 个用例（2 无套件解析成功 + 6 底座式缺套件）
        assert_eq!(report.summary.total, 8);
        assert_eq!(report.summary.resolved, 2);
        assert_eq!(report.summary.unresolved, 6);
        assert_eq!(report.summary.ambiguous, 0);
        assert_eq!(report.summary.invalid, 0);
        assert!(report.summary.is_conserved());
        assert!(report.errors.is_empty());

        // 全部落库
        let rows = store.list(None).unwrap();
        assert_eq!(rows.len(), 8);
    }

    #[tokio::test]
    async fn test_delete_precedes_insert() {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = orchestrator_with(store.clone(), 3);

        orchestrator.generate_coverage().await.unwrap();

        let calls = store.calls.lock().unwrap().clone();
        assert_eq!(calls[0], "delete_all");
        assert!(calls[1..].iter().all(|c| *c == "insert_batch"));
    }

    #[tokio::test]
    async fn test_delete_failure_is_fatal() {
        let mut store = MemoryStore::new();
        store.fail_delete = true;
        let orchestrator = orchestrator_with(Arc::new(store), 100);

        assert!(orchestrator.generate_coverage().await.is_err());
    }

    #[tokio::test]
    async fn test_batch_failure_does_not_abort_run() {
        let mut store = MemoryStore::new();
        store.fail_batches = vec![2];
        let store = Arc::new(store);
        // 8 个用例、批大小 3 → 3 个批次，第 2 批失败
        let orchestrator = orchestrator_with(store.clone(), 3);

        let report = orchestrator.generate_coverage().await.unwrap();

        // 汇总仍报告全量计数；errors 非空；落库行数少于 total
        assert_eq!(report.summary.total, 8);
        assert_eq!(report.errors.len(), 1);
        let rows = store.list(None).unwrap();
        assert_eq!(rows.len(), 5);
    }

    #[tokio::test]
    async fn test_resolved_pns_only_contain_validated_parts() {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = orchestrator_with(store.clone(), 100);

        orchestrator.generate_coverage().await.unwrap();

        for row in store.list(Some(CaseStatus::Resolved)).unwrap() {
            assert_eq!(row.resolved_pns, vec!["QD63A10", "AD63", "MT050"]);
        }
        // 缺件用例仍收录已验证的命中件号
        for row in store.list(Some(CaseStatus::Unresolved)).unwrap() {
            assert_eq!(row.resolved_pns, vec!["QD63A10", "AD63", "MT050"]);
        }
    }

    #[tokio::test]
    async fn test_placeholder_parts_are_filtered() {
        // 电机记录标记为占位 → 解析命中但不进入 resolved_pns
        let mut records = test_catalog().records.clone();
        records.retain(|r| r.part_number != "MT050");
        records.push(StaticCatalog::record(
            VENDOR,
            "motor",
            "MT050",
            json!({"power": 0.5, "placeholder": true}),
        ));

        let store = Arc::new(MemoryStore::new());
        let config = CoverageConfig::default();
        let orchestrator = CoverageOrchestrator::new(
            Arc::new(StaticCatalog::new(records)),
            store.clone(),
            Arc::new(config),
        );

        orchestrator.generate_coverage().await.unwrap();

        for row in store.list(Some(CaseStatus::Resolved)).unwrap() {
            assert!(!row.resolved_pns.contains(&"MT050".to_string()));
            assert_eq!(row.resolved_pns, vec!["QD63A10", "AD63"]);
        }
    }

    #[tokio::test]
    async fn test_regeneration_replaces_previous_rows() {
        let store = Arc::new(MemoryStore::new());
        let orchestrator = orchestrator_with(store.clone(), 100);

        let first = orchestrator.generate_coverage().await.unwrap();
        let second = orchestrator.generate_coverage().await.unwrap();

        // 两次运行计数一致，行数不累加
        assert_eq!(first.summary.total, second.summary.total);
        assert_eq!(store.list(None).unwrap().len() as u64, second.summary.total);

        // 用例键集合一致（确定性）
        let keys = |rows: Vec<CoverageResult>| {
            let mut ks: Vec<String> = rows.into_iter().map(|r| r.case_key).collect();
            ks.sort();
            ks
        };
        let after_second = keys(store.list(None).unwrap());
        assert_eq!(after_second.len(), first.summary.total as usize);
    }
}
