// ==========================================
// 新品铺货费计算器 - 配置层
// ==========================================
// 职责: 规则表加载、校验、快照发布
// 来源: Excel 工作簿 / YAML 文档
// ==========================================

pub mod config_loader;
pub mod config_store;
pub mod error;
pub mod excel_source;
pub mod paths;
pub mod validator;
pub mod yaml_source;

// 重导出核心类型
pub use config_loader::ConfigRepository;
pub use config_store::ConfigStore;
pub use error::{ConfigError, ConfigResult};
pub use paths::{default_data_dir, DataPaths, DATA_DIR_ENV};
pub use validator::ConfigValidator;
