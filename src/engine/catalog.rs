// ==========================================
// 减速电机选型系统 - 目录读取接口
// ==========================================
// 职责: 引擎层消费的目录访问抽象
// 说明: 解析器与枚举器只读目录，不关心存储形态
// ==========================================

use crate::domain::component::{AttrFilter, ComponentRecord};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

/// 目录读取接口
///
/// SQLite 实现见 `repository::ComponentCatalogRepository`；
/// 测试中可用内存实现替换。
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// 按属性过滤查询部件记录（按件号升序）
    async fn query_components(
        &self,
        vendor: &str,
        component_type: &str,
        filters: &[AttrFilter],
    ) -> RepositoryResult<Vec<ComponentRecord>>;

    /// 目录中实际存在的齿轮箱机座号全集
    async fn distinct_gear_unit_sizes(&self, vendor: &str) -> RepositoryResult<Vec<String>>;

    /// 性能点中实际存在的减速比全集
    async fn distinct_ratios(&self, vendor: &str) -> RepositoryResult<Vec<f64>>;

    /// 性能点中实际存在的电机功率全集
    async fn distinct_motor_powers(&self, vendor: &str) -> RepositoryResult<Vec<f64>>;

    /// 件号是否为真实目录条目（防御合成/占位记录）
    async fn is_real_part(&self, vendor: &str, part_number: &str) -> RepositoryResult<bool>;
}

// ==========================================
// 测试辅助: 内存目录
// ==========================================
