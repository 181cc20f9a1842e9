// ==========================================
// 新品铺货费计算器 - 门店口径筛选引擎
// ==========================================
// 职责: 通道解析 + 属性筛选 + 战区限定 + 受限批文剔除 + 黑名单剔除 + 按规模计数
// 红线: 各阶段只收窄候选集，不写回门店数据
// ==========================================

use crate::domain::store::{AttributeFilters, Blacklist, StoreQuery, StoreRecord, StoreTierCounts};
use crate::domain::types::ALL_ZONES;
use crate::engine::channel::ChannelResolver;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument};

// ==========================================
// EligibilityOutcome - 筛选结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EligibilityOutcome {
    pub counts: StoreTierCounts,
    /// 通道解析出的规模列表
    pub resolved_tiers: Vec<String>,
    /// 因受限批文剔除的门店数（仅统计通道内规模）
    pub excluded_by_restriction: u32,
    /// 因黑名单剔除的门店数（仅统计通道内规模）
    pub excluded_by_blacklist: u32,
}

impl EligibilityOutcome {
    pub fn excluded_total(&self) -> u32 {
        self.excluded_by_restriction + self.excluded_by_blacklist
    }
}

/// 级联区域选项的层级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegionLevel {
    Company,  // 省公司
    Province, // 省份
    City,     // 城市
}

pub struct StoreEligibilityFilter;

impl StoreEligibilityFilter {
    /// 解析门店口径，返回各规模门店数
    pub fn resolve(
        population: &[StoreRecord],
        query: &StoreQuery,
        blacklist: Option<&Blacklist>,
    ) -> StoreTierCounts {
        Self::evaluate(population, query, blacklist).counts
    }

    /// 解析门店口径，并统计各剔除阶段的影响
    ///
    /// # 流程
    /// 1. 属性筛选（集合 / 是否 / 商圈子串）
    /// 2. 战区限定（"全集团" 不限定）
    /// 3. 受限批文剔除
    /// 4. 黑名单剔除（品类标签包含匹配）
    /// 5. 按通道规模计数（无门店的规模计 0）
    #[instrument(skip_all, fields(population = population.len(), channel = %query.channel))]
    pub fn evaluate(
        population: &[StoreRecord],
        query: &StoreQuery,
        blacklist: Option<&Blacklist>,
    ) -> EligibilityOutcome {
        let resolved_tiers = ChannelResolver::resolve_tiers(&query.channel, &query.attributes.tiers);
        if resolved_tiers.is_empty() {
            debug!("通道未解析出任何门店规模，返回空口径");
            return EligibilityOutcome::default();
        }

        let restriction_code = query
            .restriction_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let blacklisted_ids = blacklist
            .map(|b| b.excluded_store_ids(&query.category_labels))
            .unwrap_or_default();
        let zones = Self::active_zones(&query.war_zones);

        let mut tally: HashMap<&str, u32> = HashMap::new();
        let mut excluded_by_restriction = 0;
        let mut excluded_by_blacklist = 0;

        for store in population {
            if !Self::matches_attributes(store, &query.attributes) {
                continue;
            }
            if !Self::in_war_zone(store, &zones) {
                continue;
            }

            let tier = store.tier.trim();
            let in_channel = resolved_tiers.iter().any(|t| t == tier);

            if let Some(code) = restriction_code {
                if store.is_restricted_for(code) {
                    if in_channel {
                        excluded_by_restriction += 1;
                    }
                    continue;
                }
            }
            if blacklisted_ids.contains(store.store_id.trim()) {
                if in_channel {
                    excluded_by_blacklist += 1;
                }
                continue;
            }

            if in_channel {
                *tally.entry(tier).or_insert(0) += 1;
            }
        }

        let counts = StoreTierCounts::from_pairs(
            resolved_tiers
                .iter()
                .map(|tier| (tier.clone(), tally.get(tier.as_str()).copied().unwrap_or(0))),
        );

        debug!(
            total = counts.total(),
            excluded_by_restriction, excluded_by_blacklist, "门店口径解析完成"
        );

        EligibilityOutcome {
            counts,
            resolved_tiers,
            excluded_by_restriction,
            excluded_by_blacklist,
        }
    }

    /// 属性筛选：所有已设置的条件同时满足
    pub fn matches_attributes(store: &StoreRecord, filters: &AttributeFilters) -> bool {
        Self::in_selection(store.company.as_deref(), &filters.companies)
            && Self::in_selection(store.province.as_deref(), &filters.provinces)
            && Self::in_selection(store.city.as_deref(), &filters.cities)
            && Self::in_selection(Some(store.tier.as_str()), &filters.tiers)
            && Self::in_selection(store.age_type.as_deref(), &filters.age_types)
            && Self::tag_intersects(store.catchment.as_deref(), &filters.catchments)
            && Self::in_selection(store.admin_level.as_deref(), &filters.admin_levels)
            && Self::in_selection(store.o2o_type.as_deref(), &filters.o2o_types)
            && Self::flag_matches(store.insurance, filters.insurance)
            && Self::flag_matches(store.o2o_enabled, filters.o2o_enabled)
            && Self::flag_matches(store.pooled_settlement, filters.pooled_settlement)
    }

    /// 级联区域选项：满足其余两级选择的门店中，该层级的去重取值
    pub fn region_options(
        population: &[StoreRecord],
        level: RegionLevel,
        filters: &AttributeFilters,
    ) -> Vec<String> {
        let values: BTreeSet<String> = population
            .iter()
            .filter(|s| {
                (level == RegionLevel::Company
                    || Self::in_selection(s.company.as_deref(), &filters.companies))
                    && (level == RegionLevel::Province
                        || Self::in_selection(s.province.as_deref(), &filters.provinces))
                    && (level == RegionLevel::City
                        || Self::in_selection(s.city.as_deref(), &filters.cities))
            })
            .filter_map(|s| match level {
                RegionLevel::Company => s.company.clone(),
                RegionLevel::Province => s.province.clone(),
                RegionLevel::City => s.city.clone(),
            })
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        values.into_iter().collect()
    }

    /// 有效战区；为空表示不限定
    fn active_zones(zones: &[String]) -> Vec<&str> {
        let active: Vec<&str> = zones
            .iter()
            .map(|z| z.trim())
            .filter(|z| !z.is_empty())
            .collect();
        if active.iter().any(|z| *z == ALL_ZONES) {
            return Vec::new();
        }
        active
    }

    fn in_war_zone(store: &StoreRecord, zones: &[&str]) -> bool {
        zones.is_empty()
            || store
                .war_zone
                .as_deref()
                .map(|z| zones.contains(&z.trim()))
                .unwrap_or(false)
    }

    /// 集合筛选，空选择视为全选
    fn in_selection(value: Option<&str>, selected: &[String]) -> bool {
        if selected.is_empty() {
            return true;
        }
        match value {
            Some(v) => selected.iter().any(|s| s.trim() == v.trim()),
            None => false,
        }
    }

    /// 多标签文本列：任一选中标签被单元格文本包含即命中
    fn tag_intersects(cell: Option<&str>, selected: &[String]) -> bool {
        if selected.is_empty() {
            return true;
        }
        match cell {
            Some(text) => selected
                .iter()
                .map(|tag| tag.trim())
                .any(|tag| !tag.is_empty() && text.contains(tag)),
            None => false,
        }
    }

    fn flag_matches(value: Option<bool>, wanted: Option<bool>) -> bool {
        match wanted {
            None => true,
            Some(w) => value == Some(w),
        }
    }
}
