// ==========================================
// 新品铺货费计算器 - 核心库
// ==========================================
// 职责: 规则表驱动的铺货费计算 + 门店口径筛选
// 系统定位: 决策支持（结果附完整计算过程）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 规则表加载与快照
pub mod config;

// 引擎层 - 计算与筛选
pub mod engine;

// 导入层 - 门店主数据等外部数据
pub mod importer;

// API 层 - 交互层接口
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ChannelSpec, ChannelThreshold, ProcurementType};

// 领域实体
pub use domain::{
    AttributeFilters, Blacklist, FeeCalculationResult, FeeRequest, RangeRule, RestrictionMap,
    RuleConfiguration, StoreQuery, StoreRecord, StoreTierCounts,
};

// 配置
pub use config::{ConfigError, ConfigRepository, ConfigStore, DataPaths};

// 引擎
pub use engine::{
    ChannelResolver, CoefficientResolver, EligibilityOutcome, FeeCalculator,
    StoreEligibilityFilter,
};

// 导入
pub use importer::{ImportError, StoreMasterLoader, StorePopulation};

// API
pub use api::{ApiError, FeeApi, FeeQuote, ScopeSelection, StoreSelection};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "新品铺货费计算器";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
