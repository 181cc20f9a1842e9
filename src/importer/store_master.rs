// ==========================================
// 新品铺货费计算器 - 门店主数据加载
// ==========================================
// 职责: 门店主数据文件 → StorePopulation 快照（只读）
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// ==========================================

use crate::domain::store::StoreRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::StoreFieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument, warn};

/// 门店表更新时间列
const UPDATED_AT_COLUMN: &str = "门店表更新时间";

// ==========================================
// StorePopulation - 门店主数据快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePopulation {
    pub stores: Vec<StoreRecord>,
    /// 源表中的更新时间（原样保留）
    pub source_updated_at: Option<String>,
    pub loaded_at: DateTime<Utc>,
    /// 缺少销售规模而跳过的行数
    pub skipped_rows: usize,
}

impl StorePopulation {
    pub fn from_stores(stores: Vec<StoreRecord>) -> Self {
        Self {
            stores,
            source_updated_at: None,
            loaded_at: Utc::now(),
            skipped_rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

pub struct StoreMasterLoader;

impl StoreMasterLoader {
    /// 加载门店主数据
    ///
    /// # 错误
    /// - 文件不存在 / 格式不支持 / 解析失败
    /// - 缺少销售规模列
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<StorePopulation> {
        let path = path.as_ref();
        let table = UniversalFileParser.parse(path)?;

        if table.find_column(&["销售规模", "门店类型"]).is_none() {
            return Err(ImportError::MissingColumn {
                file: path.display().to_string(),
                column: "销售规模".to_string(),
            });
        }

        let source_updated_at = table
            .rows
            .first()
            .and_then(|row| row.get(UPDATED_AT_COLUMN))
            .filter(|v| !v.is_empty())
            .cloned();

        let mapper = StoreFieldMapper;
        let mut stores = Vec::with_capacity(table.rows.len());
        let mut skipped_rows = 0;
        for (idx, row) in table.rows.iter().enumerate() {
            match mapper.map_to_store(row, idx + 1) {
                Ok(store) => stores.push(store),
                Err(e) => {
                    warn!(error = %e, "跳过门店行");
                    skipped_rows += 1;
                }
            }
        }

        info!(stores = stores.len(), skipped_rows, "门店主数据加载完成");

        Ok(StorePopulation {
            stores,
            source_updated_at,
            loaded_at: Utc::now(),
            skipped_rows,
        })
    }
}
