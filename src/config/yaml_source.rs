// ==========================================
// 新品铺货费计算器 - YAML 规则表读取
// ==========================================
// 键: base_fees / sku_discounts / gross_margin_coeffs / payment_coeffs /
//     cost_price_coeffs / return_policy_coeffs / return_ratio_rules /
//     supplier_type_coeffs / min_fee_floors / prescription_categories /
//     war_zones / exemptions
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::rule::{
    normalize_war_zones, ExemptionRule, Factor, FloorRule, Money, RangeRule, RuleConfiguration,
};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct YamlConfig {
    base_fees: Option<BTreeMap<String, BTreeMap<String, Money>>>,
    sku_discounts: Option<YamlSkuDiscounts>,
    gross_margin_coeffs: Vec<YamlRange>,
    payment_coeffs: BTreeMap<String, Factor>,
    #[serde(alias = "cost_price_tiers")]
    cost_price_coeffs: Vec<YamlRange>,
    return_policy_coeffs: BTreeMap<String, Factor>,
    return_ratio_rules: BTreeMap<String, Vec<YamlRange>>,
    supplier_type_coeffs: BTreeMap<String, Factor>,
    min_fee_floors: BTreeMap<String, YamlFloor>,
    prescription_categories: Vec<String>,
    war_zones: Vec<String>,
    exemptions: Vec<YamlExemption>,
}

/// 按品类分组，或不分组的单一列表
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlSkuDiscounts {
    Grouped(BTreeMap<String, Vec<YamlRange>>),
    Flat(Vec<YamlRange>),
}

#[derive(Debug, Deserialize)]
struct YamlRange {
    #[serde(default = "unbounded_min")]
    min: f64,
    #[serde(default = "unbounded_max")]
    max: f64,
    #[serde(alias = "discount", alias = "折扣", alias = "系数")]
    coeff: Factor,
}

fn unbounded_min() -> f64 {
    f64::NEG_INFINITY
}

fn unbounded_max() -> f64 {
    f64::INFINITY
}

impl From<YamlRange> for RangeRule {
    fn from(r: YamlRange) -> Self {
        RangeRule::new(r.min, r.max, r.coeff)
    }
}

/// 单一金额（统采/地采相同），或分别配置
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YamlFloor {
    Flat(Money),
    Split {
        #[serde(default, alias = "统采")]
        bulk: Money,
        #[serde(default, alias = "地采")]
        local: Money,
    },
}

impl From<YamlFloor> for FloorRule {
    fn from(f: YamlFloor) -> Self {
        match f {
            YamlFloor::Flat(v) => FloorRule { bulk: v, local: v },
            YamlFloor::Split { bulk, local } => FloorRule { bulk, local },
        }
    }
}

#[derive(Debug, Deserialize)]
struct YamlExemption {
    #[serde(alias = "新品大类")]
    category: String,
    #[serde(alias = "最低毛利率")]
    min_gross_margin: f64,
}

fn convert(ranges: Vec<YamlRange>) -> Vec<RangeRule> {
    ranges.into_iter().map(RangeRule::from).collect()
}

/// YAML 文本 → 规则配置（未校验）
pub fn from_yaml_str(text: &str) -> ConfigResult<RuleConfiguration> {
    let raw: YamlConfig = serde_yaml::from_str(text)?;

    let base_fees = raw
        .base_fees
        .ok_or_else(|| ConfigError::parse("base_fees", "缺少必需配置项"))?;

    let (sku_discount_tiers, default_sku_discount_tiers) = match raw.sku_discounts {
        Some(YamlSkuDiscounts::Grouped(groups)) => (
            groups
                .into_iter()
                .map(|(category, ranges)| (category, convert(ranges)))
                .collect(),
            Vec::new(),
        ),
        Some(YamlSkuDiscounts::Flat(ranges)) => (BTreeMap::new(), convert(ranges)),
        None => (BTreeMap::new(), Vec::new()),
    };

    let exemptions: Vec<ExemptionRule> = raw
        .exemptions
        .into_iter()
        .map(|e| ExemptionRule {
            category: e.category,
            min_gross_margin: e.min_gross_margin,
        })
        .collect();

    let defaults = RuleConfiguration::default();
    Ok(RuleConfiguration {
        base_fees,
        sku_discount_tiers,
        default_sku_discount_tiers,
        gross_margin_tiers: convert(raw.gross_margin_coeffs),
        payment_coefficients: raw.payment_coeffs,
        cost_price_tiers: convert(raw.cost_price_coeffs),
        return_policy_coefficients: raw.return_policy_coeffs,
        return_ratio_rules: raw
            .return_ratio_rules
            .into_iter()
            .map(|(policy, ranges)| (policy, convert(ranges)))
            .collect(),
        supplier_type_coefficients: raw.supplier_type_coeffs,
        min_fee_floors: raw
            .min_fee_floors
            .into_iter()
            .map(|(category, floor)| (category, floor.into()))
            .collect(),
        exemptions: if exemptions.is_empty() {
            defaults.exemptions
        } else {
            exemptions
        },
        prescription_categories: raw.prescription_categories,
        war_zones: normalize_war_zones(raw.war_zones),
        load_warnings: Vec::new(),
    })
}
