// ==========================================
// 新品铺货费计算器 - 计算结果
// ==========================================
// 红线: 所有中间值与系数必须可追溯（输出完整计算过程）
// ==========================================

use crate::domain::rule::{Factor, Money};
use crate::domain::store::StoreTierCounts;
use crate::domain::types::ProcurementType;
use serde::{Deserialize, Serialize};

/// 具名系数（计算过程展示用）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedCoefficient {
    pub name: String,
    pub value: Factor,
}

// ==========================================
// FeeCalculationResult - 铺货费计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeCalculationResult {
    /// 理论总铺货费（折前）
    pub theoretical_fee: Money,
    /// 综合折扣（两位小数）
    pub discount_factor: Factor,
    /// 折后原始金额
    pub raw_fee: Money,
    /// 取整到十位后的金额
    pub rounded_fee: Money,
    /// 最终铺货费
    pub final_fee: Money,
    pub min_floor: Money,
    pub is_floor_triggered: bool,
    pub is_exempt_from_floor: bool,
    pub floor_source: String,
    pub procurement_type: ProcurementType,
    pub coefficients: Vec<NamedCoefficient>,
    pub trace: Vec<String>,
    pub store_counts: StoreTierCounts,
}

impl FeeCalculationResult {
    /// 计算过程全文
    pub fn trace_text(&self) -> String {
        self.trace.join("\n")
    }

    /// 纳入计算的门店总数
    pub fn store_total(&self) -> u32 {
        self.store_counts.total()
    }

    pub fn coefficient(&self, name: &str) -> Option<Factor> {
        self.coefficients
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }
}
