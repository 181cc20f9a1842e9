// ==========================================
// 新品铺货费计算器 - 引擎层
// ==========================================
// 职责: 区间系数查找、铺货费计算、通道解析、门店口径筛选
// 红线: 引擎不读文件，只消费已加载的不可变数据；所有结果必须可追溯
// ==========================================

pub mod channel;
pub mod coefficient_resolver;
pub mod fee_calculator;
pub mod manual_counts;
pub mod store_filter;

// 重导出核心引擎
pub use channel::ChannelResolver;
pub use coefficient_resolver::{CoefficientResolver, DEFAULT_COEFFICIENT};
pub use fee_calculator::FeeCalculator;
pub use manual_counts::{extract_manual_counts, manual_count_key, parse_count};
pub use store_filter::{EligibilityOutcome, RegionLevel, StoreEligibilityFilter};
