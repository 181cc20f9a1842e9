// ==========================================
// ConfigRepository 集成测试
// ==========================================
// 测试目标: 夹具规则表加载、缺失/损坏配置、快照重载
// ==========================================

mod test_helpers;

use listing_fee::config::{ConfigError, ConfigRepository, ConfigStore};
use listing_fee::domain::{FloorRule, ProcurementType};
use std::io::Write;
use tempfile::Builder;
use test_helpers::{fixture_path, load_fixture_config};

#[test]
fn test_fixture_config_loads() {
    let config = load_fixture_config();

    assert_eq!(config.unit_fee("护肤", "超级旗舰店"), 500.0);
    assert_eq!(config.unit_fee("护肤", "标准店"), 150.0);
    assert_eq!(config.sku_tiers_for("养生中药").len(), 2);
    assert_eq!(
        config.floor_rule("护肤").map(|f| f.for_procurement(ProcurementType::Bulk)),
        Some(1000.0)
    );
    assert_eq!(config.min_fee_floors["养生中药"], FloorRule { bulk: 2000.0, local: 1000.0 });
    assert!(config.load_warnings.is_empty());
}

#[test]
fn test_war_zones_normalized() {
    let config = load_fixture_config();
    assert_eq!(config.war_zones, vec!["全集团", "华东战区", "华北战区", "华南战区"]);
}

#[test]
fn test_return_policy_options_merge_both_modes() {
    let config = load_fixture_config();

    let names = config.return_policy_names();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"效期内可退".to_string()));
    assert!(config.is_ratio_policy("效期内可退"));
    assert!(!config.is_ratio_policy("有条件退货"));
}

#[test]
fn test_xlsx_config_loads() {
    let config = ConfigRepository::load(fixture_path("coefficients.xlsx")).unwrap();

    assert_eq!(config.unit_fee("护肤", "超级旗舰店"), 500.0);
    assert_eq!(config.unit_fee("养生中药", "旗舰店"), 600.0);
    // 空单元格不产生费用项
    assert!(!config.base_fees["养生中药"].contains_key("大店"));

    assert_eq!(config.gross_margin_tiers.len(), 2);
    assert_eq!(config.gross_margin_tiers[1].min, 30.0);
    assert_eq!(config.gross_margin_tiers[1].max, f64::INFINITY);
    assert_eq!(config.gross_margin_tiers[1].coefficient, 1.1);

    assert_eq!(config.payment_coefficients["现结"], 0.9);
    assert_eq!(config.supplier_type_coefficients["厂家"], 0.95);
    assert_eq!(config.min_fee_floors["护肤"], FloorRule { bulk: 1000.0, local: 500.0 });
    assert_eq!(config.war_zones, vec!["全集团", "华东战区", "华北战区"]);
}

#[test]
fn test_missing_config_is_not_found() {
    let result = ConfigRepository::load(fixture_path("does_not_exist.xlsx"));
    match result {
        Err(e) => assert!(e.is_not_found()),
        Ok(_) => panic!("缺失的配置文件应报错"),
    }
}

#[test]
fn test_optional_tables_default_to_empty() {
    let config = ConfigRepository::from_yaml_str("base_fees:\n  零食:\n    大店: 100\n").unwrap();

    assert!(config.gross_margin_tiers.is_empty());
    assert!(config.return_ratio_rules.is_empty());
    assert!(config.min_fee_floors.is_empty());
    assert!(config.payment_coefficients.is_empty());
}

#[test]
fn test_non_numeric_coefficient_is_parse_error() {
    let result = ConfigRepository::from_yaml_str("base_fees: {}\npayment_coeffs:\n  现结: 九折\n");
    assert!(matches!(result, Err(ConfigError::Yaml(_))));
}

#[test]
fn test_reload_replaces_snapshot() {
    let store = ConfigStore::open(fixture_path("coefficients.yaml")).unwrap();
    let before = store.current();

    let mut file = Builder::new().suffix(".yml").tempfile().unwrap();
    writeln!(file, "base_fees:\n  护肤:\n    超级旗舰店: 600").unwrap();
    store.reload(file.path()).unwrap();

    assert_eq!(before.unit_fee("护肤", "超级旗舰店"), 500.0);
    assert_eq!(store.current().unit_fee("护肤", "超级旗舰店"), 600.0);

    // 重载失败保留当前快照
    assert!(store.reload(fixture_path("does_not_exist.yaml")).is_err());
    assert_eq!(store.current().unit_fee("护肤", "超级旗舰店"), 600.0);
}
