// ==========================================
// 新品铺货费计算器 - 领域类型定义
// ==========================================
// 职责: 门店规模阶梯、采购方式、通道口径等基础类型
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 哨兵值
// ==========================================

/// 战区全集（不做战区限定）
pub const ALL_ZONES: &str = "全集团";

/// 自定义通道
pub const CUSTOM_CHANNEL: &str = "自定义";

/// 默认免保底品类
pub const DEFAULT_EXEMPT_CATEGORY: &str = "养生中药";

/// 默认免保底毛利率阈值（%）
pub const DEFAULT_EXEMPT_MIN_MARGIN: f64 = 65.0;

/// 销售规模阶梯（由高到低）
pub const TIER_LADDER: [&str; 6] = ["超级旗舰店", "旗舰店", "大店", "中店", "小店", "成长店"];

/// 旧版门店类型（黄/蓝/绿通道）
pub const LEGACY_TIERS: [&str; 4] = ["超级旗舰店", "旗舰店", "标准店", "普通店"];

// ==========================================
// 采购方式 (Procurement Type)
// ==========================================
// 决定保底费取统采还是地采列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProcurementType {
    #[default]
    #[serde(rename = "统采", alias = "bulk", alias = "BULK")]
    Bulk, // 统采
    #[serde(rename = "地采", alias = "local", alias = "LOCAL")]
    Local, // 地采
}

impl ProcurementType {
    pub fn label(&self) -> &'static str {
        match self {
            ProcurementType::Bulk => "统采",
            ProcurementType::Local => "地采",
        }
    }
}

impl fmt::Display for ProcurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ProcurementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "统采" | "bulk" | "BULK" => Ok(ProcurementType::Bulk),
            "地采" | "local" | "LOCAL" => Ok(ProcurementType::Local),
            other => Err(format!("未知采购方式: {}", other)),
        }
    }
}

// ==========================================
// 标准通道 (Channel Threshold)
// ==========================================
// 命名口径 → 固定规模集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelThreshold {
    AllStores,          // 全量门店
    SmallAndAbove,      // 小店及以上
    MediumAndAbove,     // 中店及以上
    LargeAndAbove,      // 大店及以上
    FlagshipAndAbove,   // 旗舰店及以上
    SuperFlagshipOnly,  // 超级旗舰店
    LegacyYellow,       // 黄色（旧版）
    LegacyBlue,         // 蓝色（旧版）
    LegacyGreen,        // 绿色（旧版）
}

impl ChannelThreshold {
    /// 从关键字识别标准通道
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.trim() {
            "全量门店" => Some(ChannelThreshold::AllStores),
            "小店及以上" => Some(ChannelThreshold::SmallAndAbove),
            "中店及以上" => Some(ChannelThreshold::MediumAndAbove),
            "大店及以上" => Some(ChannelThreshold::LargeAndAbove),
            "旗舰店及以上" => Some(ChannelThreshold::FlagshipAndAbove),
            "超级旗舰店" => Some(ChannelThreshold::SuperFlagshipOnly),
            "黄色" => Some(ChannelThreshold::LegacyYellow),
            "蓝色" => Some(ChannelThreshold::LegacyBlue),
            "绿色" => Some(ChannelThreshold::LegacyGreen),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ChannelThreshold::AllStores => "全量门店",
            ChannelThreshold::SmallAndAbove => "小店及以上",
            ChannelThreshold::MediumAndAbove => "中店及以上",
            ChannelThreshold::LargeAndAbove => "大店及以上",
            ChannelThreshold::FlagshipAndAbove => "旗舰店及以上",
            ChannelThreshold::SuperFlagshipOnly => "超级旗舰店",
            ChannelThreshold::LegacyYellow => "黄色",
            ChannelThreshold::LegacyBlue => "蓝色",
            ChannelThreshold::LegacyGreen => "绿色",
        }
    }

    /// 展开为规模集合（按阶梯由高到低）
    pub fn tiers(&self) -> Vec<String> {
        let slice: &[&str] = match self {
            ChannelThreshold::AllStores => &TIER_LADDER,
            ChannelThreshold::SmallAndAbove => &TIER_LADDER[..5],
            ChannelThreshold::MediumAndAbove => &TIER_LADDER[..4],
            ChannelThreshold::LargeAndAbove => &TIER_LADDER[..3],
            ChannelThreshold::FlagshipAndAbove => &TIER_LADDER[..2],
            ChannelThreshold::SuperFlagshipOnly => &TIER_LADDER[..1],
            ChannelThreshold::LegacyYellow => &LEGACY_TIERS[..2],
            ChannelThreshold::LegacyBlue => &LEGACY_TIERS[..3],
            ChannelThreshold::LegacyGreen => &LEGACY_TIERS,
        };
        slice.iter().map(|t| t.to_string()).collect()
    }
}

impl fmt::Display for ChannelThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

// ==========================================
// 通道口径 (Channel Spec)
// ==========================================
// 解析优先级: 显式列表 > 标准通道关键字 > 自由文本 > 自定义
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelSpec {
    Tiers(Vec<String>),
    Threshold(ChannelThreshold),
    FreeForm(String),
    Custom,
}

impl ChannelSpec {
    /// 从操作员输入的文本识别通道口径
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == CUSTOM_CHANNEL {
            return ChannelSpec::Custom;
        }
        match ChannelThreshold::from_keyword(trimmed) {
            Some(threshold) => ChannelSpec::Threshold(threshold),
            None => ChannelSpec::FreeForm(trimmed.to_string()),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ChannelSpec::Custom)
    }
}

impl Default for ChannelSpec {
    fn default() -> Self {
        ChannelSpec::Threshold(ChannelThreshold::AllStores)
    }
}

impl fmt::Display for ChannelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelSpec::Tiers(tiers) => write!(f, "{}", tiers.join(",")),
            ChannelSpec::Threshold(t) => write!(f, "{}", t),
            ChannelSpec::FreeForm(s) => write!(f, "{}", s),
            ChannelSpec::Custom => write!(f, "{}", CUSTOM_CHANNEL),
        }
    }
}

/// 按中英文逗号切分并去空白
pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c == '，')
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_expansion() {
        assert_eq!(ChannelThreshold::AllStores.tiers().len(), 6);
        assert_eq!(
            ChannelThreshold::FlagshipAndAbove.tiers(),
            vec!["超级旗舰店".to_string(), "旗舰店".to_string()]
        );
        assert_eq!(ChannelThreshold::SmallAndAbove.tiers().last().unwrap(), "小店");
        assert_eq!(ChannelThreshold::LegacyGreen.tiers().len(), 4);
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!(ChannelSpec::parse("自定义"), ChannelSpec::Custom);
        assert_eq!(
            ChannelSpec::parse(" 中店及以上 "),
            ChannelSpec::Threshold(ChannelThreshold::MediumAndAbove)
        );
        assert_eq!(
            ChannelSpec::parse("大店，小店"),
            ChannelSpec::FreeForm("大店，小店".to_string())
        );
    }

    #[test]
    fn test_split_tokens_mixed_commas() {
        assert_eq!(
            split_tokens("A01, B02，,C03 "),
            vec!["A01".to_string(), "B02".to_string(), "C03".to_string()]
        );
        assert!(split_tokens("").is_empty());
    }

    #[test]
    fn test_procurement_type_parse() {
        assert_eq!("地采".parse::<ProcurementType>(), Ok(ProcurementType::Local));
        assert_eq!("bulk".parse::<ProcurementType>(), Ok(ProcurementType::Bulk));
        assert!("其他".parse::<ProcurementType>().is_err());
        assert_eq!(ProcurementType::default().to_string(), "统采");
    }
}
