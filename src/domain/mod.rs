// ==========================================
// 新品铺货费计算器 - 领域模型层
// ==========================================
// 职责: 定义规则表、请求、门店、结果等实体与类型
// 红线: 不含文件读取逻辑，不含引擎逻辑
// ==========================================

pub mod request;
pub mod result;
pub mod rule;
pub mod store;
pub mod types;

// 重导出核心类型
pub use request::{parse_number_or_zero, FeeRequest};
pub use result::{FeeCalculationResult, NamedCoefficient};
pub use rule::{
    normalize_war_zones, ExemptionRule, Factor, FloorRule, Money, RangeRule, RuleConfiguration,
};
pub use store::{
    parse_yes_no, AttributeFilters, Blacklist, BlacklistEntry, RestrictionMap, StoreQuery,
    StoreRecord, StoreTierCounts, TierCount,
};
pub use types::{
    split_tokens, ChannelSpec, ChannelThreshold, ProcurementType, ALL_ZONES,
    CUSTOM_CHANNEL, TIER_LADDER,
};
