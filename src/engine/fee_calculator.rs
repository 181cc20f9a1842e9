// ==========================================
// 新品铺货费计算器 - 铺货费计算引擎
// ==========================================
// 职责: 基础费用汇总 → 六类系数 → 综合折扣 → 特殊免单 → 取整 → 保底
// 输入: FeeRequest + 各规模门店数 + 规则配置
// 输出: FeeCalculationResult（含完整计算过程）
// 红线: 查找未命中不得报错，按默认值降级（费用 0，系数 1.0）
// ==========================================

use crate::domain::request::FeeRequest;
use crate::domain::result::{FeeCalculationResult, NamedCoefficient};
use crate::domain::rule::{Factor, Money, RuleConfiguration};
use crate::domain::store::StoreTierCounts;
use crate::engine::coefficient_resolver::{CoefficientResolver, DEFAULT_COEFFICIENT};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, instrument};

pub struct FeeCalculator;

impl FeeCalculator {
    /// 计算单个新品的铺货费
    ///
    /// # 参数
    /// - request: 业务条款
    /// - store_counts: 各规模门店数（筛选得出或手工录入）
    /// - config: 规则配置快照
    ///
    /// # 返回
    /// - FeeCalculationResult: 同样输入恒得同样结果
    #[instrument(skip_all, fields(category = %request.category, stores = store_counts.total()))]
    pub fn calculate_fee(
        request: &FeeRequest,
        store_counts: &StoreTierCounts,
        config: &RuleConfiguration,
    ) -> FeeCalculationResult {
        let mut trace = Vec::new();

        // === 步骤 1: 基础费用 ===
        trace.push("--- 基础费用 ---".to_string());
        let mut theoretical_fee: Money = 0.0;
        for entry in store_counts.iter().filter(|e| e.count > 0) {
            let unit_fee = config.unit_fee(&request.category, &entry.tier);
            let subtotal = unit_fee * entry.count as f64;
            theoretical_fee += subtotal;
            trace.push(format!(
                "{}: {}家 * {}元 = {}元",
                entry.tier, entry.count, unit_fee, subtotal
            ));
        }
        trace.push(format!("基础费用合计: {}元", theoretical_fee));

        // === 步骤 2: 六类系数 ===
        let coefficients = Self::resolve_coefficients(request, config);

        // === 步骤 3: 综合折扣 ===
        trace.push(String::new());
        trace.push("--- 系数调整 ---".to_string());
        let mut product: Factor = 1.0;
        for coeff in &coefficients {
            product *= coeff.value;
            trace.push(format!("{}: x{}", coeff.name, coeff.value));
        }
        let mut discount_factor = Self::round_discount(product);
        trace.push(format!("综合折扣: {:.2}", discount_factor));

        // === 步骤 4: 特殊免单 ===
        let exemption = config.exemption_for(&request.category, request.gross_margin_pct);
        if let Some(rule) = exemption {
            discount_factor = 0.0;
            trace.push(format!(
                "满足({} & 毛利率>={}%)：折扣置0，且免收保底费",
                rule.category, rule.min_gross_margin
            ));
        }

        // === 步骤 5/6: 折后金额与取整 ===
        let raw_fee = theoretical_fee * discount_factor;
        let rounded_fee = Self::round_up_to_ten(raw_fee);

        // === 步骤 7: 最低保底 ===
        let procurement = request.procurement_type;
        let (min_floor, floor_source) = match (exemption, config.floor_rule(&request.category)) {
            (Some(rule), _) => (0.0, rule.describe()),
            (None, Some(floor)) => (
                floor.for_procurement(procurement),
                format!("{}保底", procurement),
            ),
            (None, None) => (0.0, "未知标准".to_string()),
        };

        trace.push(String::new());
        trace.push("--- 最终核算 ---".to_string());
        trace.push(format!(
            "折后金额: {}元 * {:.2} = {}元",
            theoretical_fee, discount_factor, raw_fee
        ));
        trace.push(format!("计算金额: {:.2}元", rounded_fee));

        let mut final_fee = rounded_fee;
        let mut is_floor_triggered = false;
        if rounded_fee < min_floor {
            trace.push(format!("触发最低兜底 ({}): {}元", floor_source, min_floor));
            final_fee = min_floor;
            is_floor_triggered = true;
        } else {
            trace.push(format!(
                "未触发兜底 (当前{}线: {}元)",
                floor_source, min_floor
            ));
        }
        trace.push(format!("最终铺货费: {}元", final_fee));

        debug!(
            theoretical_fee,
            discount_factor, final_fee, is_floor_triggered, "铺货费计算完成"
        );

        FeeCalculationResult {
            theoretical_fee,
            discount_factor,
            raw_fee,
            rounded_fee,
            final_fee,
            min_floor,
            is_floor_triggered,
            is_exempt_from_floor: exemption.is_some(),
            floor_source,
            procurement_type: procurement,
            coefficients,
            trace,
            store_counts: store_counts.clone(),
        }
    }

    /// 解析六类系数（顺序固定）
    ///
    /// 退货条件两种模式：
    /// - 条件名在按比例分档表中 → 以退货比例（缺省 0）做区间查找
    /// - 否则 → 普通退货条件系数表直查
    pub fn resolve_coefficients(
        request: &FeeRequest,
        config: &RuleConfiguration,
    ) -> Vec<NamedCoefficient> {
        let named = |name: String, value: Factor| NamedCoefficient { name, value };

        let sku = CoefficientResolver::resolve_or_neutral(
            request.sku_count as f64,
            config.sku_tiers_for(&request.category),
        );
        let margin = CoefficientResolver::resolve_or_neutral(
            request.gross_margin_pct,
            &config.gross_margin_tiers,
        );
        let payment = config
            .payment_coefficients
            .get(&request.payment_method)
            .copied()
            .unwrap_or(DEFAULT_COEFFICIENT);
        let cost = CoefficientResolver::resolve_or_neutral(
            request.cost_price,
            &config.cost_price_tiers,
        );

        let policy = &request.return_policy;
        let return_coeff = match config.return_ratio_rules.get(policy) {
            Some(ratio_rules) => {
                let ratio = request.return_ratio_pct.unwrap_or(0.0);
                named(
                    format!("退货条件系数({} @ {}%)", policy, ratio),
                    CoefficientResolver::resolve_or_neutral(ratio, ratio_rules),
                )
            }
            None => named(
                format!("退货条件系数({})", policy),
                config
                    .return_policy_coefficients
                    .get(policy)
                    .copied()
                    .unwrap_or(DEFAULT_COEFFICIENT),
            ),
        };

        let supplier = config
            .supplier_type_coefficients
            .get(&request.supplier_type)
            .copied()
            .unwrap_or(DEFAULT_COEFFICIENT);

        vec![
            named("SKU数量折扣".to_string(), sku),
            named("毛利率系数".to_string(), margin),
            named("付款方式系数".to_string(), payment),
            named("底价系数".to_string(), cost),
            return_coeff,
            named("供应商类型系数".to_string(), supplier),
        ]
    }

    /// 综合折扣保留两位小数
    ///
    /// 按浮点数的精确二进制值取舍，恰为中点时取偶数（0.9 * 0.95 存储值略小于 0.855 → 0.85）
    pub fn round_discount(product: Factor) -> Factor {
        Decimal::from_f64_retain(product)
            .map(|exact| exact.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
            .and_then(|rounded| rounded.to_f64())
            .unwrap_or(product)
    }

    /// 十位取整：先截断为整数，非 10 的倍数则进位到下一个 10 的倍数
    ///
    /// 121 → 130, 129 → 130, 120 → 120
    pub fn round_up_to_ten(raw: Money) -> Money {
        let truncated = raw.trunc();
        (truncated / 10.0).ceil() * 10.0
    }
}
