// ==========================================
// 新品铺货费计算器 - 规则配置仓库
// ==========================================
// 职责: 配置文件 → 已校验、不可变的 RuleConfiguration
// 支持: Excel (.xlsx/.xls) / YAML (.yaml/.yml)
// 红线: 纯转换，无业务逻辑
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::excel_source;
use crate::config::validator::ConfigValidator;
use crate::config::yaml_source;
use crate::domain::rule::RuleConfiguration;
use crate::importer::file_parser::ExcelParser;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

pub struct ConfigRepository;

impl ConfigRepository {
    /// 加载规则配置
    ///
    /// # 错误
    /// - NotFound: 文件不存在
    /// - UnsupportedFormat: 扩展名不支持
    /// - Parse / InvalidValue / InvalidRange: 必需表缺失或取值错误
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<RuleConfiguration> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let config = match ext.as_str() {
            "xlsx" | "xls" => {
                let sheets = ExcelParser.parse_workbook(path)?;
                excel_source::from_workbook(&sheets)?
            }
            "yaml" | "yml" => {
                let text = fs::read_to_string(path)?;
                yaml_source::from_yaml_str(&text)?
            }
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        Self::finish(config)
    }

    /// 从 YAML 文本加载（含校验）
    pub fn from_yaml_str(text: &str) -> ConfigResult<RuleConfiguration> {
        Self::finish(yaml_source::from_yaml_str(text)?)
    }

    fn finish(mut config: RuleConfiguration) -> ConfigResult<RuleConfiguration> {
        ConfigValidator::validate(&mut config)?;

        info!(
            categories = config.base_fees.len(),
            sku_groups = config.sku_discount_tiers.len(),
            gross_margin_tiers = config.gross_margin_tiers.len(),
            payment_methods = config.payment_coefficients.len(),
            cost_price_tiers = config.cost_price_tiers.len(),
            return_policies = config.return_policy_coefficients.len(),
            ratio_policies = config.return_ratio_rules.len(),
            supplier_types = config.supplier_type_coefficients.len(),
            floors = config.min_fee_floors.len(),
            warnings = config.load_warnings.len(),
            "规则配置加载完成"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_missing_file() {
        let result = ConfigRepository::load("no_such_coefficients.xlsx");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_unsupported_format() {
        let file = Builder::new().suffix(".toml").tempfile().unwrap();
        let result = ConfigRepository::load(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_yaml_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "base_fees:\n  护肤:\n    旗舰店: 300").unwrap();
        writeln!(file, "gross_margin_coeffs:\n  - {{min: 0, max: 50, coeff: 1.0}}\n  - {{min: 40, max: 100, coeff: 0.9}}").unwrap();

        let config = ConfigRepository::load(file.path()).unwrap();
        assert_eq!(config.unit_fee("护肤", "旗舰店"), 300.0);
        assert_eq!(config.load_warnings.len(), 1);
    }

    #[test]
    fn test_from_yaml_str_rejects_inverted_range() {
        let text = "base_fees: {}\ncost_price_coeffs:\n  - {min: 10, max: 5, coeff: 1.0}\n";
        let result = ConfigRepository::from_yaml_str(text);
        assert!(matches!(result, Err(ConfigError::InvalidRange { .. })));
    }
}
