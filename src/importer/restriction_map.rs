// ==========================================
// 新品铺货费计算器 - 处方类别映射加载
// ==========================================
// 职责: 处方类别与批文分类表 → RestrictionMap
// 缺失或损坏时降级为空映射（不剔除任何门店）
// ==========================================

use crate::domain::store::RestrictionMap;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument, warn};

const CATEGORY_COLUMNS: &[&str] = &["处方类别", "处方分类"];
const CODE_COLUMNS: &[&str] = &["批文分类编码", "受限批文分类编码", "受限批文"];

pub struct RestrictionMapLoader;

impl RestrictionMapLoader {
    /// 严格加载：任何问题都返回错误
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<RestrictionMap> {
        let path = path.as_ref();
        let table = UniversalFileParser.parse(path)?;

        let missing = |column: &str| ImportError::MissingColumn {
            file: path.display().to_string(),
            column: column.to_string(),
        };
        let category_col = table
            .find_column(CATEGORY_COLUMNS)
            .ok_or_else(|| missing("处方类别"))?;
        let code_col = table
            .find_column(CODE_COLUMNS)
            .ok_or_else(|| missing("批文分类编码"))?;

        let mut codes = BTreeMap::new();
        for row in &table.rows {
            let category = row.get(category_col).map(|s| s.trim()).unwrap_or("");
            if category.is_empty() {
                continue;
            }
            let code = row.get(code_col).map(|s| s.trim()).unwrap_or("");
            // 同一处方类别重复出现时，以首条为准
            codes
                .entry(category.to_string())
                .or_insert_with(|| code.to_string());
        }

        info!(entries = codes.len(), "处方类别映射加载完成");
        Ok(RestrictionMap { codes })
    }

    /// 宽松加载：失败时记录警告并返回空映射
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> RestrictionMap {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(map) => map,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "处方类别映射不可用，不做受限批文剔除");
                RestrictionMap::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_load_restriction_map() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "处方类别,批文分类编码").unwrap();
        writeln!(file, "10-处方药,RX01").unwrap();
        writeln!(file, "20-非处方药,").unwrap();
        writeln!(file, "10-处方药,RX99").unwrap();

        let map = RestrictionMapLoader::load(file.path()).unwrap();
        assert_eq!(map.code_for("10-处方药"), Some("RX01"));
        // 编码为空视为无限制
        assert_eq!(map.code_for("20-非处方药"), None);
        assert_eq!(map.categories().len(), 2);
    }

    #[test]
    fn test_load_or_empty_on_missing_file() {
        let map = RestrictionMapLoader::load_or_empty("missing_restriction.csv");
        assert!(map.is_empty());
    }

    #[test]
    fn test_load_missing_code_column() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "处方类别,备注").unwrap();
        writeln!(file, "10-处方药,x").unwrap();

        let result = RestrictionMapLoader::load(file.path());
        assert!(matches!(result, Err(ImportError::MissingColumn { .. })));
    }
}
