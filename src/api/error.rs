// ==========================================
// 新品铺货费计算器 - API层错误类型
// ==========================================
// 职责: 汇总配置层 / 导入层错误，转换为面向操作员的错误消息
// 约定: 只有配置加载、门店主数据加载失败对用户可见
// ==========================================

use crate::config::error::ConfigError;
use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 数据源错误
    // ==========================================
    #[error("规则配置不可用: {0}")]
    Config(#[from] ConfigError),

    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("未找到门店主数据，无法自动统计门店数")]
    PopulationUnavailable,

    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_conversion() {
        let api_error: ApiError = ConfigError::NotFound("coefficients.xlsx".to_string()).into();
        assert!(matches!(api_error, ApiError::Config(ConfigError::NotFound(_))));
        assert!(api_error.to_string().contains("coefficients.xlsx"));
    }

    #[test]
    fn test_population_unavailable_message() {
        assert!(ApiError::PopulationUnavailable.to_string().contains("门店主数据"));
    }
}
