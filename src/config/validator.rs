// ==========================================
// 新品铺货费计算器 - 规则配置加载期校验
// ==========================================
// 致命: 区间 min > max、NaN 系数
// 告警: 同一档位列表内区间重叠（按声明顺序首个命中）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::rule::{RangeRule, RuleConfiguration};
use tracing::warn;

pub struct ConfigValidator;

impl ConfigValidator {
    /// 校验全部区间表；告警写入 `load_warnings`
    pub fn validate(config: &mut RuleConfiguration) -> ConfigResult<()> {
        let mut warnings = Vec::new();

        for (category, tiers) in &config.sku_discount_tiers {
            Self::check_ranges(&format!("SKU数量折扣/{}", category), tiers, &mut warnings)?;
        }
        Self::check_ranges("SKU数量折扣", &config.default_sku_discount_tiers, &mut warnings)?;
        Self::check_ranges("毛利率系数", &config.gross_margin_tiers, &mut warnings)?;
        Self::check_ranges("底价系数", &config.cost_price_tiers, &mut warnings)?;
        for (policy, tiers) in &config.return_ratio_rules {
            Self::check_ranges(&format!("退货比例系数/{}", policy), tiers, &mut warnings)?;
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        config.load_warnings.extend(warnings);
        Ok(())
    }

    /// 单个档位列表：结构错误直接返回，重叠记为告警
    pub fn check_ranges(
        table: &str,
        rules: &[RangeRule],
        warnings: &mut Vec<String>,
    ) -> ConfigResult<()> {
        for (idx, rule) in rules.iter().enumerate() {
            if rule.min.is_nan() || rule.max.is_nan() || rule.coefficient.is_nan() {
                return Err(ConfigError::parse(table, format!("第{}条档位含非数值", idx + 1)));
            }
            if rule.min > rule.max {
                return Err(ConfigError::InvalidRange {
                    sheet: table.to_string(),
                    row: idx + 1,
                    min: rule.min,
                    max: rule.max,
                });
            }
        }

        for (i, later) in rules.iter().enumerate() {
            for (j, earlier) in rules[..i].iter().enumerate() {
                if earlier.overlaps(later) {
                    warnings.push(format!(
                        "[{}] 第{}条档位 [{}, {}) 与第{}条 [{}, {}) 重叠，按声明顺序取首个命中",
                        table,
                        i + 1,
                        later.min,
                        later.max,
                        j + 1,
                        earlier.min,
                        earlier.max
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_range_is_error() {
        let mut config = RuleConfiguration::default();
        config.gross_margin_tiers = vec![RangeRule::new(0.0, 10.0, 1.0), RangeRule::new(30.0, 20.0, 1.0)];

        let result = ConfigValidator::validate(&mut config);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRange { row: 2, .. })
        ));
    }

    #[test]
    fn test_overlap_is_warning() {
        let mut config = RuleConfiguration::default();
        config.cost_price_tiers = vec![RangeRule::new(0.0, 10.0, 1.0), RangeRule::new(5.0, 20.0, 0.9)];

        ConfigValidator::validate(&mut config).unwrap();
        assert_eq!(config.load_warnings.len(), 1);
        assert!(config.load_warnings[0].contains("底价系数"));
    }

    #[test]
    fn test_adjacent_ranges_are_clean() {
        let mut warnings = Vec::new();
        let rules = vec![
            RangeRule::new(0.0, 10.0, 1.0),
            RangeRule::new(10.0, 20.0, 0.9),
            RangeRule::new(20.0, f64::INFINITY, 0.8),
        ];
        ConfigValidator::check_ranges("毛利率系数", &rules, &mut warnings).unwrap();
        assert!(warnings.is_empty());
    }
}
