// ==========================================
// 新品铺货费计算器 - 手工门店数提取
// ==========================================
// 职责: 自定义通道（手动输入）下读取各规模门店数
// 红线: 空白/非法值按 0 处理，不报错
// ==========================================

use crate::domain::request::parse_number_or_zero;
use crate::domain::store::StoreTierCounts;
use crate::domain::types::{LEGACY_TIERS, TIER_LADDER};
use std::collections::HashMap;

/// 手工录入列名，如 "(自定义)旗舰店数"
pub fn manual_count_key(tier: &str) -> String {
    format!("(自定义){}数", tier)
}

/// 门店数文本 → u32（空白、非法、负数 → 0，小数截断）
pub fn parse_count(value: &str) -> u32 {
    let number = parse_number_or_zero(value);
    if number <= 0.0 {
        0
    } else {
        number.trunc().min(u32::MAX as f64) as u32
    }
}

/// 从一行录入数据中提取各规模门店数
///
/// 六档销售规模始终输出（缺失计 0）；旧版门店类型仅在列存在时输出。
pub fn extract_manual_counts(row: &HashMap<String, String>) -> StoreTierCounts {
    let mut counts = StoreTierCounts::new();

    for tier in TIER_LADDER {
        let value = row
            .get(&manual_count_key(tier))
            .map(|v| parse_count(v))
            .unwrap_or(0);
        counts.set(tier, value);
    }

    for tier in LEGACY_TIERS.iter().filter(|t| !TIER_LADDER.contains(*t)) {
        if let Some(v) = row.get(&manual_count_key(tier)) {
            counts.set(*tier, parse_count(v));
        }
    }

    counts
}
