// ==========================================
// 新品铺货费计算器 - 门店黑名单加载
// ==========================================
// 职责: 黑名单表（门店 + 剔除品类关键字）→ Blacklist
// 缺失或损坏时降级为空黑名单
// ==========================================

use crate::domain::store::{Blacklist, BlacklistEntry};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use std::path::Path;
use tracing::{info, instrument, warn};

const STORE_COLUMNS: &[&str] = &["门店sapid", "门店编码", "门店ID"];
const TOKEN_COLUMNS: &[&str] = &["黑名单品类", "剔除品类", "品类"];

pub struct BlacklistLoader;

impl BlacklistLoader {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<Blacklist> {
        let path = path.as_ref();
        let table = UniversalFileParser.parse(path)?;

        let missing = |column: &str| ImportError::MissingColumn {
            file: path.display().to_string(),
            column: column.to_string(),
        };
        let store_col = table
            .find_column(STORE_COLUMNS)
            .ok_or_else(|| missing("门店sapid"))?;
        let token_col = table
            .find_column(TOKEN_COLUMNS)
            .ok_or_else(|| missing("黑名单品类"))?;

        let entries: Vec<BlacklistEntry> = table
            .rows
            .iter()
            .filter_map(|row| {
                let store_id = row.get(store_col)?.trim();
                let token = row.get(token_col)?.trim();
                if store_id.is_empty() || token.is_empty() {
                    return None;
                }
                Some(BlacklistEntry {
                    store_id: store_id.to_string(),
                    token: token.to_string(),
                })
            })
            .collect();

        info!(entries = entries.len(), "门店黑名单加载完成");
        Ok(Blacklist { entries })
    }

    /// 宽松加载：失败时记录警告并返回空黑名单
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Blacklist {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(blacklist) => blacklist,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "门店黑名单不可用，不做黑名单剔除");
                Blacklist::default()
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
    fn test_load_blacklist_skips_incomplete_rows() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "门店sapid,黑名单品类").unwrap();
        writeln!(file, "S001,处方药").unwrap();
        writeln!(file, "S002,").unwrap();
        writeln!(file, ",处方药").unwrap();

        let blacklist = BlacklistLoader::load(file.path()).unwrap();
        assert_eq!(blacklist.entries.len(), 1);
        assert_eq!(blacklist.entries[0].store_id, "S001");
    }

    #[test]
    fn test_load_blacklist_alias_column() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "门店编码,剔除品类").unwrap();
        writeln!(file, "S009,保健品").unwrap();

        let blacklist = BlacklistLoader::load(file.path()).unwrap();
        assert_eq!(blacklist.entries[0].token, "保健品");
    }

    #[test]
    fn test_load_or_empty_on_missing_file() {
        assert!(BlacklistLoader::load_or_empty("missing_blacklist.csv").is_empty());
    }
}
