// ==========================================
// 新品铺货费计算器 - 铺货费计算 API
// ==========================================
// 职责: 交互层的进程内入口
// 1. 门店口径解析（自动统计 / 手工录入）
// 2. 铺货费计算
// 3. 下拉选项、级联区域选项
// 4. 规则配置热重载
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::config_store::ConfigStore;
use crate::config::paths::DataPaths;
use crate::domain::request::FeeRequest;
use crate::domain::result::FeeCalculationResult;
use crate::domain::rule::RuleConfiguration;
use crate::domain::store::{AttributeFilters, Blacklist, RestrictionMap, StoreQuery, StoreTierCounts};
use crate::domain::types::{ChannelSpec, ALL_ZONES, TIER_LADDER};
use crate::engine::fee_calculator::FeeCalculator;
use crate::engine::manual_counts::extract_manual_counts;
use crate::engine::store_filter::{EligibilityOutcome, RegionLevel, StoreEligibilityFilter};
use crate::importer::blacklist::BlacklistLoader;
use crate::importer::dim_metadata::{DimMetadata, DimMetadataLoader};
use crate::importer::error::ImportError;
use crate::importer::restriction_map::RestrictionMapLoader;
use crate::importer::store_master::{StoreMasterLoader, StorePopulation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// 请求 / 响应 DTO
// ==========================================

/// 自动统计门店时的口径选择
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeSelection {
    pub channel: ChannelSpec,
    pub war_zones: Vec<String>,
    pub attributes: AttributeFilters,
}

/// 门店数来源
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StoreSelection {
    /// 手工录入各规模门店数
    Manual { counts: StoreTierCounts },
    /// 按门店主数据自动统计
    Population { scope: ScopeSelection },
}

impl Default for StoreSelection {
    fn default() -> Self {
        StoreSelection::Population {
            scope: ScopeSelection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub result: FeeCalculationResult,
    /// 自动统计时的筛选明细；手工录入时为空
    pub eligibility: Option<EligibilityOutcome>,
}

impl FeeQuote {
    /// 因资质自动剔除的门店数
    pub fn excluded_stores(&self) -> u32 {
        self.eligibility
            .as_ref()
            .map(|e| e.excluded_total())
            .unwrap_or(0)
    }
}

/// 交互层下拉选项
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeOptions {
    pub categories: Vec<String>,
    pub tiers: Vec<String>,
    pub payment_methods: Vec<String>,
    pub supplier_types: Vec<String>,
    /// 普通 + 按比例分档，排序去重
    pub return_policies: Vec<String>,
    /// 需额外填写退货比例的退货条件
    pub ratio_policies: Vec<String>,
    pub prescription_categories: Vec<String>,
    pub war_zones: Vec<String>,
    pub population_updated_at: Option<String>,
    pub dim_metadata: Option<DimMetadata>,
}

// ==========================================
// FeeApi
// ==========================================
pub struct FeeApi {
    config: Arc<ConfigStore>,
    population: Option<Arc<StorePopulation>>,
    restriction_map: Arc<RestrictionMap>,
    blacklist: Arc<Blacklist>,
    dim_metadata: Option<DimMetadata>,
}

impl FeeApi {
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self {
            config,
            population: None,
            restriction_map: Arc::new(RestrictionMap::default()),
            blacklist: Arc::new(Blacklist::default()),
            dim_metadata: None,
        }
    }

    pub fn with_population(mut self, population: StorePopulation) -> Self {
        self.population = Some(Arc::new(population));
        self
    }

    pub fn with_restriction_map(mut self, restriction_map: RestrictionMap) -> Self {
        self.restriction_map = Arc::new(restriction_map);
        self
    }

    pub fn with_blacklist(mut self, blacklist: Blacklist) -> Self {
        self.blacklist = Arc::new(blacklist);
        self
    }

    pub fn with_dim_metadata(mut self, metadata: DimMetadata) -> Self {
        self.dim_metadata = Some(metadata);
        self
    }

    /// 按数据目录装配
    ///
    /// - 规则配置: 必需，失败即报错
    /// - 门店主数据: 文件不存在时仅告警（仍可手工录入），其余失败报错
    /// - 处方类别映射 / 黑名单 / 维度元数据: 可选，失败降级
    #[instrument(skip_all, fields(data_dir = %paths.data_dir.display()))]
    pub fn open(paths: &DataPaths) -> ApiResult<Self> {
        let config = ConfigStore::open(&paths.config)?;
        let mut api = Self::new(Arc::new(config))
            .with_restriction_map(RestrictionMapLoader::load_or_empty(&paths.restriction_map))
            .with_blacklist(BlacklistLoader::load_or_empty(&paths.blacklist));

        match StoreMasterLoader::load(&paths.store_master) {
            Ok(population) => api = api.with_population(population),
            Err(ImportError::FileNotFound(path)) => {
                warn!(path = %path, "未找到门店主数据，仅支持手工录入门店数");
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(metadata) = DimMetadataLoader::load_optional(&paths.dim_metadata) {
            api = api.with_dim_metadata(metadata);
        }

        info!(
            stores = api.population.as_ref().map(|p| p.len()).unwrap_or(0),
            restriction_entries = api.restriction_map.codes.len(),
            blacklist_entries = api.blacklist.entries.len(),
            "计算服务就绪"
        );
        Ok(api)
    }

    /// 当前规则配置快照
    pub fn config(&self) -> Arc<RuleConfiguration> {
        self.config.current()
    }

    pub fn population(&self) -> Option<&StorePopulation> {
        self.population.as_deref()
    }

    /// 计算一个新品的铺货费
    #[instrument(skip_all, fields(category = %request.category))]
    pub fn calculate(&self, request: &FeeRequest, selection: &StoreSelection) -> ApiResult<FeeQuote> {
        if request.category.trim().is_empty() {
            return Err(ApiError::InvalidInput("新品大类不能为空".to_string()));
        }

        // 整个计算使用同一份配置快照
        let config = self.config.current();

        let (counts, eligibility) = match selection {
            StoreSelection::Manual { counts } => (counts.clone(), None),
            StoreSelection::Population { scope } => {
                let outcome = self.resolve_store_counts(request, scope)?;
                (outcome.counts.clone(), Some(outcome))
            }
        };

        let result = FeeCalculator::calculate_fee(request, &counts, &config);
        Ok(FeeQuote { result, eligibility })
    }

    /// 按门店主数据统计通道内各规模门店数
    pub fn resolve_store_counts(
        &self,
        request: &FeeRequest,
        scope: &ScopeSelection,
    ) -> ApiResult<EligibilityOutcome> {
        let population = self.population.as_ref().ok_or(ApiError::PopulationUnavailable)?;

        let query = StoreQuery {
            channel: scope.channel.clone(),
            restriction_code: self.restriction_code_for(request),
            war_zones: scope.war_zones.clone(),
            attributes: scope.attributes.clone(),
            category_labels: request.category_labels(),
        };

        let blacklist = (!self.blacklist.is_empty()).then(|| self.blacklist.as_ref());
        Ok(StoreEligibilityFilter::evaluate(&population.stores, &query, blacklist))
    }

    /// 表格行计算（列名同交互层字段）
    ///
    /// 通道为 "自定义" 且含手工门店数列时按手工录入，否则按门店主数据统计。
    pub fn calculate_row(&self, row: &HashMap<String, String>) -> ApiResult<FeeQuote> {
        let request = FeeRequest::from_row(row);
        let channel_text = ["channel", "铺货通道", "通道"]
            .iter()
            .filter_map(|k| row.get(*k))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .unwrap_or("");
        let channel = if channel_text.is_empty() {
            ChannelSpec::default()
        } else {
            ChannelSpec::parse(channel_text)
        };

        let has_manual_counts = row.keys().any(|k| k.starts_with("(自定义)"));
        let selection = if channel.is_custom() && has_manual_counts {
            StoreSelection::Manual {
                counts: extract_manual_counts(row),
            }
        } else {
            let war_zones = row
                .get("提报战区")
                .map(|z| z.trim())
                .filter(|z| !z.is_empty())
                .map(|z| vec![z.to_string()])
                .unwrap_or_default();
            StoreSelection::Population {
                scope: ScopeSelection {
                    channel,
                    war_zones,
                    attributes: AttributeFilters::default(),
                },
            }
        };

        self.calculate(&request, &selection)
    }

    fn restriction_code_for(&self, request: &FeeRequest) -> Option<String> {
        request
            .prescription_category
            .as_deref()
            .and_then(|category| self.restriction_map.code_for(category))
            .map(|code| code.to_string())
    }

    /// 交互层下拉选项
    pub fn options(&self) -> FeeOptions {
        let config = self.config.current();

        // 配置未提供处方类别时，退回映射表中的类别
        let prescription_categories = if config.prescription_categories.is_empty() {
            self.restriction_map.categories()
        } else {
            config.prescription_categories.clone()
        };

        FeeOptions {
            categories: config.categories(),
            tiers: TIER_LADDER.iter().map(|t| t.to_string()).collect(),
            payment_methods: config.payment_coefficients.keys().cloned().collect(),
            supplier_types: config.supplier_type_coefficients.keys().cloned().collect(),
            return_policies: config.return_policy_names(),
            ratio_policies: config.return_ratio_rules.keys().cloned().collect(),
            prescription_categories,
            war_zones: if config.war_zones.is_empty() {
                vec![ALL_ZONES.to_string()]
            } else {
                config.war_zones.clone()
            },
            population_updated_at: self
                .population
                .as_ref()
                .and_then(|p| p.source_updated_at.clone()),
            dim_metadata: self.dim_metadata.clone(),
        }
    }

    /// 该退货条件是否需要填写退货比例
    pub fn is_ratio_policy(&self, policy: &str) -> bool {
        self.config.current().is_ratio_policy(policy)
    }

    /// 级联区域选项（省公司 → 省份 → 城市）
    pub fn region_options(&self, level: RegionLevel, filters: &AttributeFilters) -> ApiResult<Vec<String>> {
        let population = self.population.as_ref().ok_or(ApiError::PopulationUnavailable)?;
        Ok(StoreEligibilityFilter::region_options(&population.stores, level, filters))
    }

    /// 重新加载规则配置；失败时沿用当前快照
    pub fn reload_config<P: AsRef<Path>>(&self, path: P) -> ApiResult<Arc<RuleConfiguration>> {
        Ok(self.config.reload(path)?)
    }
}
