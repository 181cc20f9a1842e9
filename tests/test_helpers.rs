// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 定位测试夹具、加载规则配置与门店主数据、构造请求
// ==========================================

#![allow(dead_code)]

use listing_fee::api::FeeApi;
use listing_fee::config::{ConfigRepository, ConfigStore, DataPaths};
use listing_fee::domain::{FeeRequest, RuleConfiguration, StoreTierCounts};
use listing_fee::importer::{BlacklistLoader, RestrictionMapLoader, StoreMasterLoader, StorePopulation};
use std::path::PathBuf;
use std::sync::Arc;

/// 夹具文件路径
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// 夹具数据目录（规则配置为 YAML，门店数据为 CSV）
pub fn fixture_paths() -> DataPaths {
    let dir = fixture_path("");
    DataPaths {
        config: fixture_path("coefficients.yaml"),
        store_master: fixture_path("store_master.csv"),
        restriction_map: fixture_path("restriction_map.csv"),
        blacklist: fixture_path("blacklist.csv"),
        dim_metadata: fixture_path("dim_metadata.json"),
        data_dir: dir,
    }
}

pub fn load_fixture_config() -> RuleConfiguration {
    ConfigRepository::load(fixture_path("coefficients.yaml")).unwrap()
}

pub fn load_fixture_population() -> StorePopulation {
    StoreMasterLoader::load(fixture_path("store_master.csv")).unwrap()
}

/// 基于夹具装配的 FeeApi
pub fn fixture_api() -> FeeApi {
    FeeApi::new(Arc::new(ConfigStore::new(load_fixture_config())))
        .with_population(load_fixture_population())
        .with_restriction_map(RestrictionMapLoader::load(fixture_path("restriction_map.csv")).unwrap())
        .with_blacklist(BlacklistLoader::load(fixture_path("blacklist.csv")).unwrap())
}

/// 中性条款请求（所有系数均为 1.0）
pub fn neutral_request(category: &str) -> FeeRequest {
    FeeRequest {
        sku_count: 3,
        gross_margin_pct: 40.0,
        payment_method: "30天账期".to_string(),
        cost_price: 5.0,
        return_policy: "有条件退货".to_string(),
        supplier_type: "经销商".to_string(),
        ..FeeRequest::new(category)
    }
}

pub fn counts(pairs: &[(&str, u32)]) -> StoreTierCounts {
    StoreTierCounts::from_pairs(pairs.iter().map(|(tier, count)| (tier.to_string(), *count)))
}
