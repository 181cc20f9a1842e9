// ==========================================
// 新品铺货费计算器 - 通道口径解析
// ==========================================
// 职责: ChannelSpec → 参与计算的门店规模列表
// 优先级: 显式列表 > 标准通道关键字 > 自由文本 > 自定义
// ==========================================

use crate::domain::types::{split_tokens, ChannelSpec, ChannelThreshold, CUSTOM_CHANNEL};
use tracing::debug;

pub struct ChannelResolver;

impl ChannelResolver {
    /// 解析通道口径
    ///
    /// # 参数
    /// - channel: 通道口径
    /// - selected_tiers: 属性筛选中勾选的销售规模（仅自定义通道使用）
    ///
    /// # 返回
    /// - Vec<String>: 规模列表（去重，保持声明顺序）；自定义且无规模信息时为空
    pub fn resolve_tiers(channel: &ChannelSpec, selected_tiers: &[String]) -> Vec<String> {
        let tiers = match channel {
            ChannelSpec::Tiers(list) => list.clone(),
            ChannelSpec::Threshold(threshold) => threshold.tiers(),
            ChannelSpec::FreeForm(raw) => Self::parse_free_form(raw, selected_tiers),
            ChannelSpec::Custom => selected_tiers.to_vec(),
        };
        Self::dedup(tiers)
    }

    /// 自由文本：关键字优先，否则按中英文逗号切分
    fn parse_free_form(raw: &str, selected_tiers: &[String]) -> Vec<String> {
        let trimmed = raw.trim();
        if trimmed == CUSTOM_CHANNEL {
            return selected_tiers.to_vec();
        }
        if let Some(threshold) = ChannelThreshold::from_keyword(trimmed) {
            return threshold.tiers();
        }
        let tokens = split_tokens(trimmed);
        debug!(raw = trimmed, tokens = tokens.len(), "自由文本通道解析");
        tokens
    }

    fn dedup(tiers: Vec<String>) -> Vec<String> {
        let mut result: Vec<String> = Vec::with_capacity(tiers.len());
        for tier in tiers {
            let tier = tier.trim().to_string();
            if !tier.is_empty() && !result.contains(&tier) {
                result.push(tier);
            }
        }
        result
    }
}
