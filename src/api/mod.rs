// ==========================================
// 新品铺货费计算器 - API层
// ==========================================
// 职责: 交互层调用的进程内接口（无网络协议）
// ==========================================

pub mod error;
pub mod fee_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use fee_api::{FeeApi, FeeOptions, FeeQuote, ScopeSelection, StoreSelection};
