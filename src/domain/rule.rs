// ==========================================
// 新品铺货费计算器 - 规则表领域模型
// ==========================================
// 职责: 基础费用 / 六类系数 / 保底费 / 枚举选项
// 用途: 配置层写入，引擎层只读（加载后不可变）
// ==========================================

use crate::domain::types::{
    ProcurementType, ALL_ZONES, DEFAULT_EXEMPT_CATEGORY, DEFAULT_EXEMPT_MIN_MARGIN,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 金额（元）
pub type Money = f64;

/// 系数
pub type Factor = f64;

// ==========================================
// RangeRule - 区间系数
// ==========================================
// 半开区间 [min, max)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
    pub coefficient: Factor,
}

impl RangeRule {
    pub fn new(min: f64, max: f64, coefficient: Factor) -> Self {
        Self {
            min,
            max,
            coefficient,
        }
    }

    /// min <= value < max
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value < self.max
    }

    /// 两个半开区间是否有交集
    pub fn overlaps(&self, other: &RangeRule) -> bool {
        self.min < other.max && other.min < self.max
    }
}

// ==========================================
// FloorRule - 最低保底费
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloorRule {
    pub bulk: Money,  // 统采保底费
    pub local: Money, // 地采保底费
}

impl FloorRule {
    pub fn for_procurement(&self, procurement: ProcurementType) -> Money {
        match procurement {
            ProcurementType::Bulk => self.bulk,
            ProcurementType::Local => self.local,
        }
    }
}

// ==========================================
// ExemptionRule - 特殊免单
// ==========================================
// 品类命中且毛利率达到阈值 → 折扣置 0，免收保底费
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExemptionRule {
    pub category: String,
    pub min_gross_margin: f64,
}

impl ExemptionRule {
    pub fn applies(&self, category: &str, gross_margin_pct: f64) -> bool {
        self.category == category && gross_margin_pct >= self.min_gross_margin
    }

    /// 保底费来源描述，如 "特殊免单(养生中药>=65%)"
    pub fn describe(&self) -> String {
        format!("特殊免单({}>={}%)", self.category, self.min_gross_margin)
    }
}

impl Default for ExemptionRule {
    fn default() -> Self {
        Self {
            category: DEFAULT_EXEMPT_CATEGORY.to_string(),
            min_gross_margin: DEFAULT_EXEMPT_MIN_MARGIN,
        }
    }
}

// ==========================================
// RuleConfiguration - 规则配置（不可变快照）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfiguration {
    /// 新品大类 → 门店规模 → 单店费用
    pub base_fees: BTreeMap<String, BTreeMap<String, Money>>,
    /// 新品大类 → SKU 数量折扣档位
    pub sku_discount_tiers: BTreeMap<String, Vec<RangeRule>>,
    /// 未分组的 SKU 档位（无品类专属档位时使用）
    pub default_sku_discount_tiers: Vec<RangeRule>,
    pub gross_margin_tiers: Vec<RangeRule>,
    pub payment_coefficients: BTreeMap<String, Factor>,
    pub cost_price_tiers: Vec<RangeRule>,
    pub return_policy_coefficients: BTreeMap<String, Factor>,
    /// 退货条件 → 按退货比例分档
    pub return_ratio_rules: BTreeMap<String, Vec<RangeRule>>,
    pub supplier_type_coefficients: BTreeMap<String, Factor>,
    pub min_fee_floors: BTreeMap<String, FloorRule>,
    pub exemptions: Vec<ExemptionRule>,
    pub prescription_categories: Vec<String>,
    /// 首项恒为 "全集团"
    pub war_zones: Vec<String>,
    /// 加载期校验告警（区间重叠等）
    pub load_warnings: Vec<String>,
}

impl Default for RuleConfiguration {
    fn default() -> Self {
        Self {
            base_fees: BTreeMap::new(),
            sku_discount_tiers: BTreeMap::new(),
            default_sku_discount_tiers: Vec::new(),
            gross_margin_tiers: Vec::new(),
            payment_coefficients: BTreeMap::new(),
            cost_price_tiers: Vec::new(),
            return_policy_coefficients: BTreeMap::new(),
            return_ratio_rules: BTreeMap::new(),
            supplier_type_coefficients: BTreeMap::new(),
            min_fee_floors: BTreeMap::new(),
            exemptions: vec![ExemptionRule::default()],
            prescription_categories: Vec::new(),
            war_zones: vec![ALL_ZONES.to_string()],
            load_warnings: Vec::new(),
        }
    }
}

impl RuleConfiguration {
    /// 单店费用，未配置 → 0
    pub fn unit_fee(&self, category: &str, tier: &str) -> Money {
        self.base_fees
            .get(category)
            .and_then(|fees| fees.get(tier))
            .copied()
            .unwrap_or(0.0)
    }

    /// 品类专属 SKU 档位，缺失时回落到未分组档位
    pub fn sku_tiers_for(&self, category: &str) -> &[RangeRule] {
        self.sku_discount_tiers
            .get(category)
            .map(|v| v.as_slice())
            .unwrap_or(&self.default_sku_discount_tiers)
    }

    /// 该退货条件是否需要退货比例
    pub fn is_ratio_policy(&self, policy: &str) -> bool {
        self.return_ratio_rules.contains_key(policy)
    }

    pub fn floor_rule(&self, category: &str) -> Option<&FloorRule> {
        self.min_fee_floors.get(category)
    }

    /// 命中的免单规则
    pub fn exemption_for(&self, category: &str, gross_margin_pct: f64) -> Option<&ExemptionRule> {
        self.exemptions
            .iter()
            .find(|rule| rule.applies(category, gross_margin_pct))
    }

    /// 全部退货条件（普通 + 按比例），排序去重
    pub fn return_policy_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .return_policy_coefficients
            .keys()
            .chain(self.return_ratio_rules.keys())
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn categories(&self) -> Vec<String> {
        self.base_fees.keys().cloned().collect()
    }
}

/// 战区列表标准化：去空、去重，"全集团" 置于首位
pub fn normalize_war_zones(zones: Vec<String>) -> Vec<String> {
    let mut normalized = vec![ALL_ZONES.to_string()];
    for zone in zones {
        let zone = zone.trim().to_string();
        if zone.is_empty() || normalized.contains(&zone) {
            continue;
        }
        normalized.push(zone);
    }
    normalized
}
