// ==========================================
// 新品铺货费计算器 - 计算请求
// ==========================================
// 职责: 单次铺货费计算的业务条款
// 缺省约定: SKU数=1, 采购方式=统采, 数值缺失或非法=0
// ==========================================

use crate::domain::types::ProcurementType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

// ==========================================
// FeeRequest - 计算请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeRequest {
    #[serde(alias = "新品大类")]
    pub category: String,
    #[serde(alias = "统采or地采")]
    pub procurement_type: ProcurementType,
    #[serde(alias = "处方类别")]
    pub prescription_category: Option<String>,
    #[serde(alias = "同一供应商单次引进SKU数")]
    pub sku_count: u32,
    #[serde(alias = "底价")]
    pub cost_price: f64,
    #[serde(alias = "预估毛利率(%)")]
    pub gross_margin_pct: f64,
    #[serde(alias = "付款方式")]
    pub payment_method: String,
    #[serde(alias = "退货条件")]
    pub return_policy: String,
    /// 仅按比例分档的退货条件使用，缺省按 0
    #[serde(alias = "退货比例(%)")]
    pub return_ratio_pct: Option<f64>,
    #[serde(alias = "供应商类型")]
    pub supplier_type: String,
}

impl Default for FeeRequest {
    fn default() -> Self {
        Self {
            category: String::new(),
            procurement_type: ProcurementType::Bulk,
            prescription_category: None,
            sku_count: 1,
            cost_price: 0.0,
            gross_margin_pct: 0.0,
            payment_method: String::new(),
            return_policy: String::new(),
            return_ratio_pct: None,
            supplier_type: String::new(),
        }
    }
}

impl FeeRequest {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// 从表格行（列名 → 文本）构造请求
    ///
    /// 数值列无法解析时按 0 处理，不报错。
    pub fn from_row(row: &HashMap<String, String>) -> Self {
        let text = |keys: &[&str]| -> String {
            keys.iter()
                .filter_map(|k| row.get(*k))
                .map(|v| v.trim())
                .find(|v| !v.is_empty())
                .unwrap_or("")
                .to_string()
        };

        let sku_raw = text(&["同一供应商单次引进SKU数", "SKU数"]);
        let sku_count = if sku_raw.is_empty() {
            1
        } else {
            parse_number_or_zero(&sku_raw).max(0.0) as u32
        };

        let ratio_raw = text(&["退货比例(%)"]);
        let prescription = text(&["处方类别"]);

        let procurement_raw = text(&["统采or地采"]);
        let procurement_type = if procurement_raw.is_empty() {
            ProcurementType::default()
        } else {
            procurement_raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "采购方式无法识别，按统采处理");
                ProcurementType::default()
            })
        };

        Self {
            category: text(&["新品大类", "商品品类"]),
            procurement_type,
            prescription_category: (!prescription.is_empty()).then_some(prescription),
            sku_count,
            cost_price: parse_number_or_zero(&text(&["底价", "进价"])),
            gross_margin_pct: parse_number_or_zero(&text(&["预估毛利率(%)"])),
            payment_method: text(&["付款方式"]),
            return_policy: text(&["退货条件"]),
            return_ratio_pct: (!ratio_raw.is_empty()).then(|| parse_number_or_zero(&ratio_raw)),
            supplier_type: text(&["供应商类型"]),
        }
    }

    /// 参与黑名单匹配的品类标签
    pub fn category_labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if let Some(p) = &self.prescription_category {
            if !p.trim().is_empty() {
                labels.push(p.trim().to_string());
            }
        }
        if !self.category.trim().is_empty() {
            labels.push(self.category.trim().to_string());
        }
        labels
    }
}

/// 数值文本 → f64，空白/非法/非有限值 → 0
pub fn parse_number_or_zero(value: &str) -> f64 {
    let cleaned = value.trim().trim_end_matches('%').replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}
