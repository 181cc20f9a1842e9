// ==========================================
// FeeCalculator 集成测试
// ==========================================
// 测试目标: 基于夹具规则表验证费用组成、保底、免单、取整
// ==========================================

mod test_helpers;

use listing_fee::domain::{FeeRequest, ProcurementType};
use listing_fee::engine::FeeCalculator;
use test_helpers::{counts, load_fixture_config, neutral_request};

// ==========================================
// 典型场景
// ==========================================

#[test]
fn test_super_flagship_neutral_scenario() {
    let config = load_fixture_config();
    let request = neutral_request("护肤");

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("超级旗舰店", 10)]), &config);

    assert_eq!(result.theoretical_fee, 5000.0);
    assert_eq!(result.discount_factor, 1.0);
    assert_eq!(result.final_fee, 5000.0);
    assert!(!result.is_floor_triggered);
    assert_eq!(result.floor_source, "统采保底");
    assert!(result.trace.contains(&"超级旗舰店: 10家 * 500元 = 5000元".to_string()));
}

#[test]
fn test_single_standard_store_triggers_floor() {
    let config = load_fixture_config();
    let request = neutral_request("护肤");

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("标准店", 1)]), &config);

    assert_eq!(result.raw_fee, 150.0);
    assert_eq!(result.rounded_fee, 150.0);
    assert_eq!(result.min_floor, 1000.0);
    assert_eq!(result.final_fee, 1000.0);
    assert!(result.is_floor_triggered);
    assert!(result
        .trace_text()
        .contains("触发最低兜底 (统采保底): 1000元"));
}

#[test]
fn test_local_procurement_uses_local_floor() {
    let config = load_fixture_config();
    let mut request = neutral_request("护肤");
    request.procurement_type = ProcurementType::Local;

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("标准店", 1)]), &config);

    assert_eq!(result.final_fee, 500.0);
    assert_eq!(result.floor_source, "地采保底");
}

// ==========================================
// 系数
// ==========================================

#[test]
fn test_discount_composition_and_rounding() {
    let config = load_fixture_config();
    let mut request = neutral_request("护肤");
    request.payment_method = "现结".to_string(); // 0.9
    request.supplier_type = "厂家".to_string(); // 0.95

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("旗舰店", 7)]), &config);

    // 0.9 * 0.95 = 0.8549.. → 0.85；2100 * 0.85 = 1785 → 1790
    assert_eq!(result.discount_factor, 0.85);
    assert_eq!(result.theoretical_fee, 2100.0);
    assert_eq!(result.rounded_fee, 1790.0);
    assert_eq!(result.final_fee, 1790.0);
}

#[test]
fn test_unknown_keys_resolve_to_neutral() {
    let config = load_fixture_config();
    let mut request = neutral_request("护肤");
    request.payment_method = "未知付款方式".to_string();
    request.supplier_type = "未知供应商".to_string();
    request.return_policy = "未知退货条件".to_string();

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("超级旗舰店", 2)]), &config);

    assert_eq!(result.coefficient("付款方式系数"), Some(1.0));
    assert_eq!(result.coefficient("供应商类型系数"), Some(1.0));
    assert_eq!(result.coefficient("退货条件系数(未知退货条件)"), Some(1.0));
    assert_eq!(result.final_fee, 1000.0);
}

#[test]
fn test_ratio_return_policy_dispatch() {
    let config = load_fixture_config();
    let mut request = neutral_request("护肤");
    request.return_policy = "效期内可退".to_string();
    request.return_ratio_pct = Some(15.0);

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("超级旗舰店", 10)]), &config);
    assert_eq!(result.coefficient("退货条件系数(效期内可退 @ 15%)"), Some(1.2));
    assert_eq!(result.final_fee, 6000.0);

    // 未填比例按 0 处理
    request.return_ratio_pct = None;
    let result = FeeCalculator::calculate_fee(&request, &counts(&[("超级旗舰店", 10)]), &config);
    assert_eq!(result.discount_factor, 1.0);
}

#[test]
fn test_unconfigured_category_is_zero_without_floor() {
    let config = load_fixture_config();
    let request = neutral_request("不存在的品类");

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("旗舰店", 3)]), &config);

    assert_eq!(result.theoretical_fee, 0.0);
    assert_eq!(result.final_fee, 0.0);
    assert_eq!(result.floor_source, "未知标准");
}

// ==========================================
// 特殊免单
// ==========================================

#[test]
fn test_exemption_forces_zero_discount_and_floor() {
    let config = load_fixture_config();
    let mut request = neutral_request("养生中药");
    request.gross_margin_pct = 65.0;

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("旗舰店", 5)]), &config);

    assert_eq!(result.theoretical_fee, 3000.0);
    assert_eq!(result.discount_factor, 0.0);
    assert_eq!(result.min_floor, 0.0);
    assert_eq!(result.final_fee, 0.0);
    assert!(result.is_exempt_from_floor);
    assert!(!result.is_floor_triggered);
    assert_eq!(result.floor_source, "特殊免单(养生中药>=65%)");
}

#[test]
fn test_exemption_threshold_not_reached() {
    let config = load_fixture_config();
    let mut request = neutral_request("养生中药");
    request.gross_margin_pct = 64.9;

    let result = FeeCalculator::calculate_fee(&request, &counts(&[("大店", 1)]), &config);

    assert!(!result.is_exempt_from_floor);
    assert_eq!(result.final_fee, 2000.0);
}

// ==========================================
// 性质
// ==========================================

#[test]
fn test_calculation_is_idempotent() {
    let config = load_fixture_config();
    let request = FeeRequest {
        return_policy: "效期内可退".to_string(),
        return_ratio_pct: Some(12.5),
        ..neutral_request("护肤")
    };
    let store_counts = counts(&[("超级旗舰店", 3), ("大店", 4), ("成长店", 0)]);

    let first = FeeCalculator::calculate_fee(&request, &store_counts, &config);
    let second = FeeCalculator::calculate_fee(&request, &store_counts, &config);
    assert_eq!(first, second);
}

#[test]
fn test_final_fee_never_below_floor() {
    let config = load_fixture_config();
    for count in 0..12 {
        let result = FeeCalculator::calculate_fee(
            &neutral_request("护肤"),
            &counts(&[("成长店", count)]),
            &config,
        );
        assert!(result.final_fee >= result.min_floor);
        assert_eq!(result.final_fee % 10.0, 0.0);
    }
}

#[test]
fn test_round_up_to_ten_boundaries() {
    assert_eq!(FeeCalculator::round_up_to_ten(120.0), 120.0);
    assert_eq!(FeeCalculator::round_up_to_ten(121.0), 130.0);
    assert_eq!(FeeCalculator::round_up_to_ten(129.0), 130.0);
    // 先截断再进位
    assert_eq!(FeeCalculator::round_up_to_ten(120.9), 120.0);

    let mut raw = 0.0;
    while raw < 500.0 {
        let rounded = FeeCalculator::round_up_to_ten(raw);
        assert_eq!(rounded % 10.0, 0.0);
        assert!(rounded >= raw.floor());
        raw += 3.7;
    }
}
