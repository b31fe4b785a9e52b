// ==========================================
// 减速电机选型系统 - 输入空间枚举器
// ==========================================
// 职责: 从目录实际存在的属性值推导有界的代表性用例集
// ==========================================
// 规则要点:
// - 机座号 × 安装方式为主轴；需要套件的方式再按输出轴选项、
//   （键槽式）插入轴形式展开
// - 减速比/功率取首个可用值作代表（一个代表值足够覆盖
//   机座号/安装方式组合的解析正确性，刻意不做全叉积）
// - 硬上限截断: 达到上限立即返回已积累的用例并告警，不报错
// - 顺序: 机座号 → 安装方式 → 输出轴选项 → 插入轴形式，
//   仅保证用例键序列的确定性
// ==========================================

use crate::config::CoverageConfig;
use crate::domain::requirement::RequirementInput;
use crate::domain::types::{MountingStyle, ShaftOption, ShaftStyle};
use crate::engine::catalog::CatalogReader;
use crate::repository::error::RepositoryResult;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// InputSpaceEnumerator - 输入空间枚举器
// ==========================================

/// 输入空间枚举器
pub struct InputSpaceEnumerator {
    catalog: Arc<dyn CatalogReader>,
    config: Arc<CoverageConfig>,
}

impl InputSpaceEnumerator {
    /// 创建新的枚举器实例
    pub fn new(catalog: Arc<dyn CatalogReader>, config: Arc<CoverageConfig>) -> Self {
        Self { catalog, config }
    }

    /// 枚举待测需求输入
    ///
    /// # 返回
    /// - 按固定顺序排列的需求输入列表，长度不超过枚举硬上限
    pub async fn enumerate(&self) -> RepositoryResult<Vec<RequirementInput>> {
        let vendor = &self.config.vendor;
        let cap = self.config.enumeration_cap;

        let sizes = self.catalog.distinct_gear_unit_sizes(vendor).await?;
        let ratios = self.catalog.distinct_ratios(vendor).await?;
        let powers = self.catalog.distinct_motor_powers(vendor).await?;

        // 代表值: 升序首个可用值，保证固定目录快照下的确定性
        let ratio = ratios.first().copied();
        let motor_power = powers.first().copied();

        info!(
            sizes = sizes.len(),
            ratios = ratios.len(),
            powers = powers.len(),
            "开始枚举输入空间"
        );

        let mut inputs: Vec<RequirementInput> = Vec::new();

        'outer: for size in &sizes {
            for style in MountingStyle::ALL {
                if !style.requires_output_shaft_kit() {
                    // 无需套件: 每个机座号/安装方式组合一个代表用例
                    if !push_case(
                        &mut inputs,
                        cap,
                        self.build_input(size, style, None, None, ratio, motor_power),
                    ) {
                        break 'outer;
                    }
                    continue;
                }

                // 需要套件: 按输出轴选项展开，键槽式再按插入轴形式展开
                for option in ShaftOption::ALL {
                    if option.is_keyed() {
                        for shaft_style in ShaftStyle::ALL {
                            if !push_case(
                                &mut inputs,
                                cap,
                                self.build_input(
                                    size,
                                    style,
                                    Some(option),
                                    Some(shaft_style),
                                    ratio,
                                    motor_power,
                                ),
                            ) {
                                break 'outer;
                            }
                        }
                    } else if !push_case(
                        &mut inputs,
                        cap,
                        self.build_input(size, style, Some(option), None, ratio, motor_power),
                    ) {
                        break 'outer;
                    }
                }
            }
        }

        if inputs.len() >= cap {
            // 截断是刻意的资源权衡: 超出部分静默丢弃，只告警
            warn!(cap, "枚举达到用例硬上限，剩余组合被截断");
        }

        info!(cases = inputs.len(), "输入空间枚举完成");
        Ok(inputs)
    }

    fn build_input(
        &self,
        size: &str,
        mounting_style: MountingStyle,
        shaft_option: Option<ShaftOption>,
        shaft_style: Option<ShaftStyle>,
        ratio: Option<f64>,
        motor_power: Option<f64>,
    ) -> RequirementInput {
        RequirementInput {
            series: self.config.default_series.clone(),
            unit_size: size.to_string(),
            mounting_style,
            shaft_option,
            shaft_style,
            ratio,
            motor_power,
        }
    }
}

/// 未达上限时追加用例；达到上限返回 false
fn push_case(inputs: &mut Vec<RequirementInput>, cap: usize, input: RequirementInput) -> bool {
    if inputs.len() >= cap {
        return false;
    }
    inputs.push(input);
    true
}
