// ==========================================
// 新品铺货费计算器 - 默认数据文件路径
// ==========================================

use std::path::{Path, PathBuf};

/// 数据目录环境变量
pub const DATA_DIR_ENV: &str = "LISTING_FEE_DATA_DIR";

pub const CONFIG_FILE: &str = "coefficients.xlsx";
pub const STORE_MASTER_FILE: &str = "store_master.xlsx";
pub const RESTRICTION_MAP_FILE: &str = "处方类别与批文分类表.xlsx";
pub const BLACKLIST_FILE: &str = "blacklist.xlsx";
pub const DIM_METADATA_FILE: &str = "dim_metadata.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data_dir: PathBuf,
    pub config: PathBuf,
    pub store_master: PathBuf,
    pub restriction_map: PathBuf,
    pub blacklist: PathBuf,
    pub dim_metadata: PathBuf,
}

impl DataPaths {
    /// 指定目录下的标准文件名
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            data_dir: dir.to_path_buf(),
            config: dir.join(CONFIG_FILE),
            store_master: dir.join(STORE_MASTER_FILE),
            restriction_map: dir.join(RESTRICTION_MAP_FILE),
            blacklist: dir.join(BLACKLIST_FILE),
            dim_metadata: dir.join(DIM_METADATA_FILE),
        }
    }

    /// 默认数据目录
    ///
    /// 优先级: 环境变量 LISTING_FEE_DATA_DIR > 用户数据目录/listing-fee > ./data
    pub fn resolve() -> Self {
        Self::in_dir(default_data_dir())
    }
}

pub fn default_data_dir() -> PathBuf {
    // 允许通过环境变量显式指定（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => data_dir.join("listing-fee"),
        None => PathBuf::from("./data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_dir_layout() {
        let paths = DataPaths::in_dir("/tmp/listing");
        assert_eq!(paths.config, PathBuf::from("/tmp/listing/coefficients.xlsx"));
        assert_eq!(paths.dim_metadata, PathBuf::from("/tmp/listing/dim_metadata.json"));
        assert!(paths.restriction_map.ends_with("处方类别与批文分类表.xlsx"));
    }

    #[test]
    fn test_default_data_dir_not_empty() {
        assert!(!default_data_dir().as_os_str().is_empty());
    }
}
