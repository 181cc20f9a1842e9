// ==========================================
// 新品铺货费计算器 - 门店字段映射器
// ==========================================
// 职责: 门店主数据源字段 → StoreRecord（支持列名别名）
// ==========================================

use crate::domain::store::{parse_yes_no, StoreRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;

pub struct StoreFieldMapper;

impl StoreFieldMapper {
    /// 映射一行门店数据
    ///
    /// # 参数
    /// - row: 原始行
    /// - row_number: 行号（从 1 开始，用于报错）
    pub fn map_to_store(&self, row: &RawRow, row_number: usize) -> ImportResult<StoreRecord> {
        let tier = self
            .get_string(row, "销售规模")
            .ok_or_else(|| ImportError::EmptyRequiredField {
                row: row_number,
                field: "销售规模".to_string(),
            })?;

        // 无门店编码时以行号兜底，保证黑名单匹配不会误中
        let store_id = self
            .get_string(row, "门店sapid")
            .unwrap_or_else(|| format!("#ROW{}", row_number));

        Ok(StoreRecord {
            store_id,
            tier,
            company: self.get_string(row, "省公司"),
            province: self.get_string(row, "省份"),
            city: self.get_string(row, "城市"),
            war_zone: self.get_string(row, "提报战区"),
            age_type: self.get_string(row, "店龄店型"),
            catchment: self.get_string(row, "客流商圈"),
            admin_level: self.get_string(row, "行政区划等级"),
            o2o_type: self.get_string(row, "公域O2O店型"),
            insurance: self.get_flag(row, "是否医保店"),
            o2o_enabled: self.get_flag(row, "是否O2O门店"),
            pooled_settlement: self.get_flag(row, "是否统筹店"),
            restricted_codes: self.get_string(row, "受限批文分类编码"),
        })
    }

    /// 提取字符串字段（返回 Option），支持多个可能的列名（别名）
    pub fn get_string(&self, row: &RawRow, key: &str) -> Option<String> {
        let aliases: Vec<&str> = match key {
            "门店sapid" => vec!["门店sapid", "门店编码", "门店ID", "门店名称"],
            "销售规模" => vec!["销售规模", "门店类型"],
            "提报战区" => vec!["提报战区", "战区"],
            "受限批文分类编码" => vec!["受限批文分类编码", "受限批文"],
            "省公司" => vec!["省公司", "区域"],
            _ => vec![key],
        };

        for alias in aliases {
            if let Some(v) = row.get(alias) {
                let trimmed = v.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }

    fn get_flag(&self, row: &RawRow, key: &str) -> Option<bool> {
        self.get_string(row, key).and_then(|v| parse_yes_no(&v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_to_store_basic() {
        let mut row = RawRow::new();
        row.insert("门店sapid".to_string(), "S001".to_string());
        row.insert("销售规模".to_string(), "旗舰店".to_string());
        row.insert("是否医保店".to_string(), "是".to_string());
        row.insert("受限批文分类编码".to_string(), "A01,B02".to_string());
        row.insert("客流商圈".to_string(), "".to_string());

        let store = StoreFieldMapper.map_to_store(&row, 1).unwrap();

        assert_eq!(store.store_id, "S001");
        assert_eq!(store.tier, "旗舰店");
        assert_eq!(store.insurance, Some(true));
        assert_eq!(store.o2o_enabled, None);
        assert_eq!(store.catchment, None);
        assert!(store.is_restricted_for("B02"));
    }

    #[test]
    fn test_map_to_store_aliases() {
        let mut row = RawRow::new();
        row.insert("门店名称".to_string(), "门店1".to_string());
        row.insert("门店类型".to_string(), "标准店".to_string());
        row.insert("区域".to_string(), "华东".to_string());

        let store = StoreFieldMapper.map_to_store(&row, 3).unwrap();
        assert_eq!(store.store_id, "门店1");
        assert_eq!(store.tier, "标准店");
        assert_eq!(store.company.as_deref(), Some("华东"));
    }

    #[test]
    fn test_map_to_store_missing_tier() {
        let mut row = RawRow::new();
        row.insert("门店sapid".to_string(), "S001".to_string());

        let result = StoreFieldMapper.map_to_store(&row, 7);
        assert!(matches!(
            result,
            Err(ImportError::EmptyRequiredField { row: 7, .. })
        ));
    }
}
