// ==========================================
// 新品铺货费计算器 - 门店领域模型
// ==========================================
// 职责: 门店主数据行、规模计数、筛选条件、受限/黑名单数据
// 用途: 导入层写入，筛选引擎只读
// ==========================================

use crate::domain::types::{split_tokens, ChannelSpec};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

// ==========================================
// StoreRecord - 门店主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreRecord {
    // ===== 主键 =====
    pub store_id: String, // 门店sapid（黑名单关联键）

    // ===== 规模 =====
    pub tier: String, // 销售规模 / 门店类型

    // ===== 区域 =====
    pub company: Option<String>,  // 省公司
    pub province: Option<String>, // 省份
    pub city: Option<String>,     // 城市
    pub war_zone: Option<String>, // 提报战区

    // ===== 属性（文本）=====
    pub age_type: Option<String>,    // 店龄店型
    pub catchment: Option<String>,   // 客流商圈（可含多个标签）
    pub admin_level: Option<String>, // 行政区划等级
    pub o2o_type: Option<String>,    // 公域O2O店型

    // ===== 属性（是/否）=====
    pub insurance: Option<bool>,         // 是否医保店
    pub o2o_enabled: Option<bool>,       // 是否O2O门店
    pub pooled_settlement: Option<bool>, // 是否统筹店

    // ===== 受限批文 =====
    pub restricted_codes: Option<String>, // 受限批文分类编码（逗号分隔）
}

impl StoreRecord {
    /// 受限批文编码列表
    pub fn restricted_code_tokens(&self) -> Vec<String> {
        self.restricted_codes
            .as_deref()
            .map(split_tokens)
            .unwrap_or_default()
    }

    /// 该门店是否被指定批文编码限制经营
    pub fn is_restricted_for(&self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty() && self.restricted_code_tokens().iter().any(|t| t == code)
    }
}

/// 解析 是/否 类取值，无法识别 → None
pub fn parse_yes_no(value: &str) -> Option<bool> {
    match value.trim().to_uppercase().as_str() {
        "是" | "1" | "Y" | "YES" | "TRUE" => Some(true),
        "否" | "0" | "N" | "NO" | "FALSE" => Some(false),
        _ => None,
    }
}

// ==========================================
// StoreTierCounts - 各规模门店数
// ==========================================
// 保持插入顺序（基础费用明细按此顺序输出）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCount {
    pub tier: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreTierCounts {
    entries: Vec<TierCount>,
}

impl StoreTierCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut counts = Self::new();
        for (tier, count) in pairs {
            counts.set(tier, count);
        }
        counts
    }

    /// 设置某规模的门店数（已存在则覆盖）
    pub fn set(&mut self, tier: impl Into<String>, count: u32) {
        let tier = tier.into();
        match self.entries.iter_mut().find(|e| e.tier == tier) {
            Some(entry) => entry.count = count,
            None => self.entries.push(TierCount { tier, count }),
        }
    }

    pub fn get(&self, tier: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.tier == tier)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TierCount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// AttributeFilters - 门店属性筛选
// ==========================================
// 列表为空表示不筛选；Option 为 None 表示"全部"
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeFilters {
    pub companies: Vec<String>,    // 省公司
    pub provinces: Vec<String>,    // 省份
    pub cities: Vec<String>,       // 城市
    pub tiers: Vec<String>,        // 销售规模
    pub age_types: Vec<String>,    // 店龄店型
    pub catchments: Vec<String>,   // 客流商圈（子串匹配）
    pub admin_levels: Vec<String>, // 行政区划等级
    pub o2o_types: Vec<String>,    // 公域O2O店型
    pub insurance: Option<bool>,
    pub o2o_enabled: Option<bool>,
    pub pooled_settlement: Option<bool>,
}

impl AttributeFilters {
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
            && self.provinces.is_empty()
            && self.cities.is_empty()
            && self.tiers.is_empty()
            && self.age_types.is_empty()
            && self.catchments.is_empty()
            && self.admin_levels.is_empty()
            && self.o2o_types.is_empty()
            && self.insurance.is_none()
            && self.o2o_enabled.is_none()
            && self.pooled_settlement.is_none()
    }
}

// ==========================================
// StoreQuery - 门店口径请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreQuery {
    pub channel: ChannelSpec,
    /// 处方类别映射出的受限批文编码
    pub restriction_code: Option<String>,
    /// 为空或含 "全集团" 时不做战区限定
    pub war_zones: Vec<String>,
    pub attributes: AttributeFilters,
    /// 用于黑名单包含匹配的品类标签（处方类别、新品大类）
    pub category_labels: Vec<String>,
}

// ==========================================
// RestrictionMap - 处方类别 → 受限批文编码
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RestrictionMap {
    pub codes: BTreeMap<String, String>,
}

impl RestrictionMap {
    pub fn code_for(&self, prescription_category: &str) -> Option<&str> {
        self.codes
            .get(prescription_category.trim())
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn categories(&self) -> Vec<String> {
        self.codes.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// ==========================================
// Blacklist - 门店黑名单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub store_id: String,
    pub token: String, // 剔除品类关键字
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Blacklist {
    pub entries: Vec<BlacklistEntry>,
}

impl Blacklist {
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(id, token)| BlacklistEntry {
                    store_id: id.into(),
                    token: token.into(),
                })
                .collect(),
        }
    }

    /// 被任一品类标签包含的黑名单关键字
    ///
    /// 包含匹配（"处方药" 命中 "10-处方药"），短关键字可能误命中更长的无关标签。
    pub fn matching_tokens(&self, labels: &[String]) -> HashSet<&str> {
        self.entries
            .iter()
            .map(|e| e.token.trim())
            .filter(|token| !token.is_empty())
            .filter(|token| {
                labels
                    .iter()
                    .any(|label| !label.trim().is_empty() && label.contains(token))
            })
            .collect()
    }

    /// 需剔除的门店ID
    pub fn excluded_store_ids(&self, labels: &[String]) -> HashSet<String> {
        let tokens = self.matching_tokens(labels);
        if tokens.is_empty() {
            return HashSet::new();
        }
        self.entries
            .iter()
            .filter(|e| tokens.contains(e.token.trim()))
            .map(|e| e.store_id.trim().to_string())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
