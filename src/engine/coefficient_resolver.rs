// ==========================================
// 新品铺货费计算器 - 区间系数查找
// ==========================================
// 职责: SKU数 / 毛利率 / 底价 / 退货比例 四类档位共用的区间查找
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::domain::rule::{Factor, RangeRule};

/// 未命中任何档位时的默认系数
pub const DEFAULT_COEFFICIENT: Factor = 1.0;

pub struct CoefficientResolver;

impl CoefficientResolver {
    /// 按声明顺序查找第一个满足 min <= value < max 的档位
    ///
    /// # 参数
    /// - value: 待匹配数值
    /// - ranges: 档位列表（声明顺序即优先顺序）
    /// - default: 未命中时返回的系数
    pub fn resolve(value: f64, ranges: &[RangeRule], default: Factor) -> Factor {
        ranges
            .iter()
            .find(|rule| rule.contains(value))
            .map(|rule| rule.coefficient)
            .unwrap_or(default)
    }

    /// 默认系数为 1.0 的查找
    pub fn resolve_or_neutral(value: f64, ranges: &[RangeRule]) -> Factor {
        Self::resolve(value, ranges, DEFAULT_COEFFICIENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiers() -> Vec<RangeRule> {
        vec![
            RangeRule::new(1.0, 5.0, 1.0),
            RangeRule::new(5.0, 10.0, 0.9),
            RangeRule::new(10.0, 9999.0, 0.8),
        ]
    }

    #[test]
    fn test_resolve_min_inclusive_max_exclusive() {
        let ranges = tiers();
        assert_eq!(CoefficientResolver::resolve(5.0, &ranges, 1.0), 0.9);
        assert_eq!(CoefficientResolver::resolve(4.999, &ranges, 1.0), 1.0);
        assert_eq!(CoefficientResolver::resolve(10.0, &ranges, 1.0), 0.8);
    }

    #[test]
    fn test_resolve_default_when_no_match() {
        let ranges = tiers();
        assert_eq!(CoefficientResolver::resolve(0.0, &ranges, 0.5), 0.5);
        assert_eq!(CoefficientResolver::resolve(9999.0, &ranges, 0.7), 0.7);
        assert_eq!(CoefficientResolver::resolve_or_neutral(42.0, &[]), 1.0);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let ranges = vec![
            RangeRule::new(0.0, 50.0, 1.0),
            RangeRule::new(30.0, 60.0, 0.6),
        ];
        // 重叠区间内以先声明者为准
        assert_eq!(CoefficientResolver::resolve(40.0, &ranges, 1.0), 1.0);
        assert_eq!(CoefficientResolver::resolve(55.0, &ranges, 1.0), 0.6);
    }
}
