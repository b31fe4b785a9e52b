// ==========================================
// 减速电机选型系统 - BOM 解析器
// ==========================================
// 职责: 按需求输入从供应商目录装配完整 BOM
// 红线: Engine 不拼 SQL, 目录访问一律经 CatalogReader
// ==========================================
// 规则要点:
// - 每个必需类别恰好选取一条目录记录（按件号升序取首条）
// - 安装方式决定输出轴套件类别是否出现在需求中
// - 无匹配是槽位状态 (found=false)，不是错误
// - 仅无法建模的输入（描述符损坏、缺少必需数值）才返回错误
// ==========================================

use crate::domain::bom::{BomResolution, ComponentSlot};
use crate::domain::component::AttrFilter;
use crate::domain::requirement::RequirementInput;
use crate::domain::types::{ComponentCategory, MountingStyle, ShaftOption, ShaftStyle};
use crate::engine::catalog::CatalogReader;
use crate::repository::error::RepositoryError;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

// ==========================================
// ResolveError - 解析器错误
// ==========================================

/// 解析器错误
///
/// 分类器把任何解析器错误映射为 INVALID 用例，
/// 错误文本进入用例消息。
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("型号描述符无效: {0}")]
    MalformedDescriptor(String),

    #[error("缺少必需参数: {0}")]
    MissingParameter(&'static str),

    #[error(transparent)]
    Catalog(#[from] RepositoryError),
}

// ==========================================
// ResolveOptions - 解析选项
// ==========================================

/// 解析选项：需求输入中描述符与功率之外的字段
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 齿轮箱机座号
    pub unit_size: String,
    /// 安装方式
    pub mounting_style: MountingStyle,
    /// 输出轴选项（仅需要套件的安装方式有意义）
    pub shaft_option: Option<ShaftOption>,
    /// 插入轴形式（仅键槽式输出轴选项有意义）
    pub shaft_style: Option<ShaftStyle>,
    /// 目标减速比
    pub ratio: Option<f64>,
    /// 安装变体缺省值（齿轮箱查询的附加约束）
    pub mounting_variant: Option<String>,
}

impl ResolveOptions {
    /// 由需求输入构造解析选项
    pub fn from_requirement(input: &RequirementInput) -> Self {
        Self {
            unit_size: input.unit_size.clone(),
            mounting_style: input.mounting_style,
            shaft_option: input.shaft_option,
            shaft_style: input.shaft_style,
            ratio: input.ratio,
            mounting_variant: None,
        }
    }
}

// ==========================================
// BomResolver - BOM 解析器
// ==========================================

/// BOM 解析器
///
/// 纯读操作：目录不被修改，结果每次调用新构造。
/// 不做重试，目录访问的瞬时故障由调用方处理。
pub struct BomResolver {
    catalog: Arc<dyn CatalogReader>,
    vendor: String,
}

impl BomResolver {
    /// 创建新的解析器实例
    ///
    /// # 参数
    /// - catalog: 目录读取接口
    /// - vendor: 供应商代码
    pub fn new(catalog: Arc<dyn CatalogReader>, vendor: &str) -> Self {
        Self {
            catalog,
            vendor: vendor.to_string(),
        }
    }

    /// 执行一次 BOM 解析
    ///
    /// # 参数
    /// - model_descriptor: 型号描述符，格式 `系列-机座号`
    /// - motor_power: 电机功率 (kW)，必需
    /// - options: 其余需求字段
    ///
    /// # 返回
    /// - Ok(BomResolution): 各必需槽位的解析结果（可能含未命中槽位）
    /// - Err(ResolveError): 描述符损坏或缺少必需数值输入
    pub async fn resolve(
        &self,
        model_descriptor: &str,
        motor_power: Option<f64>,
        options: &ResolveOptions,
    ) -> Result<BomResolution, ResolveError> {
        let (series, size) = parse_descriptor(model_descriptor)?;

        // 描述符机座号与选项机座号必须一致
        if !options.unit_size.is_empty() && options.unit_size != size {
            return Err(ResolveError::MalformedDescriptor(format!(
                "描述符机座号 {} 与选项机座号 {} 不一致",
                size, options.unit_size
            )));
        }

        let ratio = options.ratio.ok_or(ResolveError::MissingParameter("ratio"))?;
        let power = motor_power.ok_or(ResolveError::MissingParameter("motor_power"))?;

        debug!(
            series = %series,
            size = %size,
            mounting_style = %options.mounting_style,
            ratio,
            power,
            "开始 BOM 解析"
        );

        let mut slots = Vec::new();

        // ==========================================
        // 类别1: 齿轮箱（系列 + 机座号 + 减速比 [+ 安装变体]）
        // ==========================================
        let mut gear_filters = vec![
            AttrFilter::text("series", &series),
            AttrFilter::text("size", &size),
            AttrFilter::number("ratio", ratio),
        ];
        if let Some(variant) = &options.mounting_variant {
            gear_filters.push(AttrFilter::text("variant", variant));
        }
        slots.push(
            self.resolve_category(ComponentCategory::GearUnit, &gear_filters)
                .await?,
        );

        // ==========================================
        // 类别2: 电机适配器（机座号）
        // ==========================================
        let adapter_filters = vec![AttrFilter::text("size", &size)];
        slots.push(
            self.resolve_category(ComponentCategory::Adapter, &adapter_filters)
                .await?,
        );

        // ==========================================
        // 类别3: 电机（功率）
        // ==========================================
        let motor_filters = vec![AttrFilter::number("power", power)];
        slots.push(
            self.resolve_category(ComponentCategory::Motor, &motor_filters)
                .await?,
        );

        // ==========================================
        // 类别4: 输出轴套件（仅需要套件的安装方式）
        // ==========================================
        // 不需要套件时该类别直接缺席，不是"解析后忽略"
        if options.mounting_style.requires_output_shaft_kit() {
            let shaft_option = options
                .shaft_option
                .ok_or(ResolveError::MissingParameter("shaft_option"))?;

            let mut kit_filters = vec![
                AttrFilter::text("size", &size),
                AttrFilter::text("shaft_option", shaft_option.to_db_str()),
            ];
            // 仅键槽式选项用插入轴形式进一步收窄
            if shaft_option.is_keyed() {
                if let Some(style) = options.shaft_style {
                    kit_filters.push(AttrFilter::text("shaft_style", style.to_db_str()));
                }
            }
            slots.push(
                self.resolve_category(ComponentCategory::OutputShaftKit, &kit_filters)
                    .await?,
            );
        }

        let resolution = BomResolution::new(slots);
        debug!(
            complete = resolution.complete,
            slots = resolution.slots.len(),
            "BOM 解析完成"
        );
        Ok(resolution)
    }

    /// 解析单个类别：查询目录并取首条候选
    async fn resolve_category(
        &self,
        category: ComponentCategory,
        filters: &[AttrFilter],
    ) -> Result<ComponentSlot, ResolveError> {
        let records = self
            .catalog
            .query_components(&self.vendor, category.catalog_type(), filters)
            .await?;

        match records.into_iter().next() {
            Some(record) => {
                debug!(category = %category, part_number = %record.part_number, "类别命中");
                Ok(ComponentSlot::found(
                    category,
                    record.part_number,
                    record.description,
                ))
            }
            None => {
                debug!(category = %category, "类别无匹配");
                Ok(ComponentSlot::missing(category))
            }
        }
    }
}

/// 解析型号描述符（`系列-机座号`）
fn parse_descriptor(descriptor: &str) -> Result<(String, String), ResolveError> {
    let trimmed = descriptor.trim();
    match trimmed.split_once('-') {
        Some((series, size)) if !series.is_empty() && !size.is_empty() => {
            Ok((series.to_string(), size.to_string()))
        }
        _ => Err(ResolveError::MalformedDescriptor(format!(
            "期望 `系列-机座号` 格式, 实际: {:?}",
            descriptor
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::testing::StaticCatalog;
    use serde_json::json;

    const VENDOR: &str = "DODGE";

    fn test_catalog() -> Arc<StaticCatalog> {
        Arc::new(StaticCatalog::new(vec![
            StaticCatalog::record(
                VENDOR,
                "gear_unit",
                "QD63A10",
                json!({"series": "QD", "size": "63", "ratio": 10.0}),
            ),
            StaticCatalog::record(
                VENDOR,
                "gear_unit",
                "QD100A10",
                json!({"series": "QD", "size": "100", "ratio": 10.0}),
            ),
            StaticCatalog::record(VENDOR, "adapter", "AD63", json!({"size": "63"})),
            StaticCatalog::record(VENDOR, "adapter", "AD100", json!({"size": "100"})),
            StaticCatalog::record(VENDOR, "motor", "MT050", json!({"power": 0.5})),
            StaticCatalog::record(
                VENDOR,
                "shaft_kit",
                "SK100-IK-D",
                json!({"size": "100", "shaft_option": "INCH_KEYED", "shaft_style": "DOUBLE"}),
            ),
            StaticCatalog::record(
                VENDOR,
                "shaft_kit",
                "SK100-IH",
                json!({"size": "100", "shaft_option": "INCH_HOLLOW"}),
            ),
        ]))
    }

    fn options(size: &str, style: MountingStyle) -> ResolveOptions {
        ResolveOptions {
            unit_size: size.to_string(),
            mounting_style: style,
            shaft_option: None,
            shaft_style: None,
            ratio: Some(10.0),
            mounting_variant: None,
        }
    }

    #[tokio::test]
    async fn test_shaft_mounted_skips_output_shaft_kit() {
        let resolver = BomResolver::new(test_catalog(), VENDOR);
        let opts = options("63", MountingStyle::ShaftMounted);

        let resolution = resolver.resolve("QD-63", Some(0.5), &opts).await.unwrap();

        // 只有齿轮箱/适配器/电机三个槽位，套件类别不出现
        assert_eq!(resolution.slots.len(), 3);
        assert!(resolution
            .slots
            .iter()
            .all(|s| s.category != ComponentCategory::OutputShaftKit));
        assert!(resolution.complete);
        assert_eq!(
            resolution.found_part_numbers(),
            vec!["QD63A10", "AD63", "MT050"]
        );
    }

    #[tokio::test]
    async fn test_bottom_mount_keyed_style_narrows_query() {
        let resolver = BomResolver::new(test_catalog(), VENDOR);

        // DOUBLE 形式的套件存在
        let mut opts = options("100", MountingStyle::BottomMount);
        opts.shaft_option = Some(ShaftOption::InchKeyed);
        opts.shaft_style = Some(ShaftStyle::Double);
        let resolution = resolver.resolve("QD-100", Some(0.5), &opts).await.unwrap();
        assert!(resolution.complete);
        assert_eq!(resolution.slots.len(), 4);

        // SINGLE 形式的套件不存在 → 槽位未命中，不是错误
        opts.shaft_style = Some(ShaftStyle::Single);
        let resolution = resolver.resolve("QD-100", Some(0.5), &opts).await.unwrap();
        assert!(!resolution.complete);
        let kit_slot = resolution
            .slots
            .iter()
            .find(|s| s.category == ComponentCategory::OutputShaftKit)
            .unwrap();
        assert!(!kit_slot.found);
        assert_eq!(kit_slot.match_count, 0);
    }

    #[tokio::test]
    async fn test_hollow_option_ignores_shaft_style() {
        let resolver = BomResolver::new(test_catalog(), VENDOR);

        let mut opts = options("100", MountingStyle::BottomMount);
        opts.shaft_option = Some(ShaftOption::InchHollow);
        // 空心选项即便带了形式字段也不参与收窄
        opts.shaft_style = Some(ShaftStyle::Single);

        let resolution = resolver.resolve("QD-100", Some(0.5), &opts).await.unwrap();
        assert!(resolution.complete);
        let kit_slot = resolution
            .slots
            .iter()
            .find(|s| s.category == ComponentCategory::OutputShaftKit)
            .unwrap();
        assert_eq!(kit_slot.part_number.as_deref(), Some("SK100-IH"));
    }

    #[tokio::test]
    async fn test_malformed_descriptor() {
        let resolver = BomResolver::new(test_catalog(), VENDOR);
        let opts = options("", MountingStyle::ShaftMounted);

        for bad in ["", "QD63", "-63", "QD-"] {
            let err = resolver.resolve(bad, Some(0.5), &opts).await.unwrap_err();
            assert!(matches!(err, ResolveError::MalformedDescriptor(_)));
        }
    }

    #[tokio::test]
    async fn test_descriptor_size_mismatch() {
        let resolver = BomResolver::new(test_catalog(), VENDOR);
        let opts = options("100", MountingStyle::ShaftMounted);

        let err = resolver.resolve("QD-63", Some(0.5), &opts).await.unwrap_err();
        assert!(matches!(err, ResolveError::MalformedDescriptor(_)));
    }

    #[tokio::test]
    async fn test_missing_numeric_inputs() {
        let resolver = BomResolver::new(test_catalog(), VENDOR);

        let opts = options("63", MountingStyle::ShaftMounted);
        let err = resolver.resolve("QD-63", None, &opts).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingParameter("motor_power")
        ));

        let mut opts = options("63", MountingStyle::ShaftMounted);
        opts.ratio = None;
        let err = resolver.resolve("QD-63", Some(0.5), &opts).await.unwrap_err();
        assert!(matches!(err, ResolveError::MissingParameter("ratio")));
    }

    #[tokio::test]
    async fn test_bottom_mount_requires_shaft_option() {
        let resolver = BomResolver::new(test_catalog(), VENDOR);
        let opts = options("100", MountingStyle::BottomMount);

        let err = resolver.resolve("QD-100", Some(0.5), &opts).await.unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingParameter("shaft_option")
        ));
    }

    #[tokio::test]
    async fn test_first_match_selection_is_deterministic() {
        let mut records = test_catalog().records.clone();
        records.push(StaticCatalog::record(
            VENDOR,
            "motor",
            "MT050-B",
            json!({"power": 0.5}),
        ));
        let resolver = BomResolver::new(Arc::new(StaticCatalog::new(records)), VENDOR);

        let opts = options("63", MountingStyle::ShaftMounted);
        let resolution = resolver.resolve("QD-63", Some(0.5), &opts).await.unwrap();

        // 件号升序首条胜出
        let motor_slot = resolution
            .slots
            .iter()
            .find(|s| s.category == ComponentCategory::Motor)
            .unwrap();
        assert_eq!(motor_slot.part_number.as_deref(), Some("MT050"));
        assert_eq!(motor_slot.match_count, 1);
    }
}
