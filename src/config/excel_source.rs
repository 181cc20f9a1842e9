// ==========================================
// 新品铺货费计算器 - Excel 规则表读取
// ==========================================
// 输入: 工作表名 → 表格（由 ExcelParser 读出）
// 输出: RuleConfiguration（未校验）
// 约定: 仅"基础费用"为必需表，其余缺表 → 空
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::rule::{
    normalize_war_zones, ExemptionRule, Factor, FloorRule, RangeRule, RuleConfiguration,
};
use crate::importer::file_parser::{RawRow, SheetTable};
use std::collections::BTreeMap;

// ===== 工作表名（含历史别名）=====
pub const SHEET_BASE_FEES: &str = "基础费用";
const SHEET_SKU: &[&str] = &["单次引入SKU数量折扣", "SKU数量折扣"];
const SHEET_GROSS_MARGIN: &[&str] = &["毛利率系数"];
const SHEET_PAYMENT: &[&str] = &["付款方式系数"];
const SHEET_COST_PRICE: &[&str] = &["底价系数", "进价系数"];
const SHEET_RETURN_POLICY: &[&str] = &["退货条件系数"];
const SHEET_RETURN_RATIO: &[&str] = &["退货比例系数"];
const SHEET_SUPPLIER: &[&str] = &["供应商类型系数"];
const SHEET_FLOORS: &[&str] = &["最低保底费"];
const SHEET_PRESCRIPTION: &[&str] = &["处方类别"];
const SHEET_WAR_ZONES: &[&str] = &["提报战区"];
const SHEET_EXEMPTIONS: &[&str] = &["特殊免单"];

// ===== 列名（含别名）=====
const COL_CATEGORY: &[&str] = &["新品大类", "品类"];
const COL_MIN: &[&str] = &["min", "最小值", "下限"];
const COL_MAX: &[&str] = &["max", "最大值", "上限"];
const COL_COEFF: &[&str] = &["discount", "coeff", "折扣", "系数"];
const COL_RETURN_POLICY: &[&str] = &["退货条件"];

/// 工作簿 → 规则配置
pub fn from_workbook(sheets: &BTreeMap<String, SheetTable>) -> ConfigResult<RuleConfiguration> {
    let base = sheets
        .get(SHEET_BASE_FEES)
        .ok_or_else(|| ConfigError::parse(SHEET_BASE_FEES, "缺少必需工作表"))?;

    let mut config = RuleConfiguration {
        base_fees: read_base_fees(base)?,
        ..RuleConfiguration::default()
    };

    if let Some((name, table)) = find_sheet(sheets, SHEET_SKU) {
        let (grouped, ungrouped) = read_grouped_ranges(name, table, COL_CATEGORY)?;
        config.sku_discount_tiers = grouped;
        config.default_sku_discount_tiers = ungrouped;
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_GROSS_MARGIN) {
        config.gross_margin_tiers = read_ranges(name, table)?;
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_PAYMENT) {
        config.payment_coefficients = read_named_factors(name, table, &["付款方式"])?;
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_COST_PRICE) {
        config.cost_price_tiers = read_ranges(name, table)?;
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_RETURN_POLICY) {
        config.return_policy_coefficients = read_named_factors(name, table, COL_RETURN_POLICY)?;
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_RETURN_RATIO) {
        let (grouped, ungrouped) = read_grouped_ranges(name, table, COL_RETURN_POLICY)?;
        if !ungrouped.is_empty() {
            return Err(ConfigError::parse(name, "退货比例档位缺少退货条件列"));
        }
        config.return_ratio_rules = grouped;
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_SUPPLIER) {
        config.supplier_type_coefficients = read_named_factors(name, table, &["供应商类型"])?;
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_FLOORS) {
        config.min_fee_floors = read_floors(name, table)?;
    }
    if let Some((_, table)) = find_sheet(sheets, SHEET_PRESCRIPTION) {
        config.prescription_categories = table.first_column_values();
    }
    if let Some((_, table)) = find_sheet(sheets, SHEET_WAR_ZONES) {
        config.war_zones = normalize_war_zones(table.first_column_values());
    }
    if let Some((name, table)) = find_sheet(sheets, SHEET_EXEMPTIONS) {
        let exemptions = read_exemptions(name, table)?;
        if !exemptions.is_empty() {
            config.exemptions = exemptions;
        }
    }

    Ok(config)
}

fn find_sheet<'a>(
    sheets: &'a BTreeMap<String, SheetTable>,
    names: &[&'a str],
) -> Option<(&'a str, &'a SheetTable)> {
    names
        .iter()
        .find_map(|name| sheets.get(*name).map(|table| (*name, table)))
}

fn require_column<'a>(
    sheet: &str,
    table: &SheetTable,
    candidates: &[&'a str],
) -> ConfigResult<&'a str> {
    table
        .find_column(candidates)
        .ok_or_else(|| ConfigError::parse(sheet, format!("缺少列: {}", candidates.join("/"))))
}

fn cell<'r>(row: &'r RawRow, column: &str) -> &'r str {
    row.get(column).map(|s| s.trim()).unwrap_or("")
}

/// 数值单元格；空值返回 None
fn parse_cell(sheet: &str, row_no: usize, column: &str, raw: &str) -> ConfigResult<Option<f64>> {
    let text = raw.trim().replace(',', "");
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<f64>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            sheet: sheet.to_string(),
            row: row_no,
            column: column.to_string(),
            value: raw.to_string(),
        })
}

fn required_cell(sheet: &str, row_no: usize, column: &str, raw: &str) -> ConfigResult<f64> {
    parse_cell(sheet, row_no, column, raw)?.ok_or_else(|| ConfigError::InvalidValue {
        sheet: sheet.to_string(),
        row: row_no,
        column: column.to_string(),
        value: String::new(),
    })
}

// 表头行为第 1 行，数据从第 2 行起
fn row_number(idx: usize) -> usize {
    idx + 2
}

// ==========================================
// 基础费用: 新品大类 × 门店规模
// ==========================================
fn read_base_fees(table: &SheetTable) -> ConfigResult<BTreeMap<String, BTreeMap<String, f64>>> {
    let category_col = require_column(SHEET_BASE_FEES, table, COL_CATEGORY)?;
    let tier_cols: Vec<&String> = table
        .headers
        .iter()
        .filter(|h| !h.is_empty() && h.as_str() != category_col)
        .collect();

    let mut base_fees = BTreeMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let category = cell(row, category_col);
        if category.is_empty() {
            continue;
        }
        let mut fees = BTreeMap::new();
        for tier in &tier_cols {
            if let Some(fee) = parse_cell(SHEET_BASE_FEES, row_number(idx), tier, cell(row, tier))? {
                fees.insert(tier.to_string(), fee);
            }
        }
        base_fees.insert(category.to_string(), fees);
    }
    Ok(base_fees)
}

// ==========================================
// 区间表: min / max / (discount | coeff)
// ==========================================
fn read_range_row(sheet: &str, table: &SheetTable, idx: usize, row: &RawRow) -> ConfigResult<RangeRule> {
    let min_col = require_column(sheet, table, COL_MIN)?;
    let max_col = require_column(sheet, table, COL_MAX)?;
    let coeff_col = require_column(sheet, table, COL_COEFF)?;
    let row_no = row_number(idx);

    let min = parse_cell(sheet, row_no, min_col, cell(row, min_col))?.unwrap_or(f64::NEG_INFINITY);
    // 上限留空表示不封顶
    let max = parse_cell(sheet, row_no, max_col, cell(row, max_col))?.unwrap_or(f64::INFINITY);
    let coefficient = required_cell(sheet, row_no, coeff_col, cell(row, coeff_col))?;
    Ok(RangeRule::new(min, max, coefficient))
}

fn read_ranges(sheet: &str, table: &SheetTable) -> ConfigResult<Vec<RangeRule>> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| read_range_row(sheet, table, idx, row))
        .collect()
}

type GroupedRanges = (BTreeMap<String, Vec<RangeRule>>, Vec<RangeRule>);

/// 按分组列聚合区间；分组列缺失或为空的行归入未分组
fn read_grouped_ranges(sheet: &str, table: &SheetTable, group_cols: &[&str]) -> ConfigResult<GroupedRanges> {
    let group_col = table.find_column(group_cols);
    let mut grouped: BTreeMap<String, Vec<RangeRule>> = BTreeMap::new();
    let mut ungrouped = Vec::new();

    for (idx, row) in table.rows.iter().enumerate() {
        let rule = read_range_row(sheet, table, idx, row)?;
        match group_col.map(|col| cell(row, col)).filter(|g| !g.is_empty()) {
            Some(group) => grouped.entry(group.to_string()).or_default().push(rule),
            None => ungrouped.push(rule),
        }
    }
    Ok((grouped, ungrouped))
}

// ==========================================
// 名称 → 系数
// ==========================================
fn read_named_factors(
    sheet: &str,
    table: &SheetTable,
    name_cols: &[&str],
) -> ConfigResult<BTreeMap<String, Factor>> {
    let name_col = require_column(sheet, table, name_cols)?;
    let coeff_col = require_column(sheet, table, COL_COEFF)?;

    let mut factors = BTreeMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let name = cell(row, name_col);
        if name.is_empty() {
            continue;
        }
        let value = required_cell(sheet, row_number(idx), coeff_col, cell(row, coeff_col))?;
        factors.insert(name.to_string(), value);
    }
    Ok(factors)
}

// ==========================================
// 最低保底费: 统采保底费 / 地采保底费（旧版单列"保底费"）
// ==========================================
fn read_floors(sheet: &str, table: &SheetTable) -> ConfigResult<BTreeMap<String, FloorRule>> {
    let category_col = require_column(sheet, table, COL_CATEGORY)?;
    let bulk_col = table.find_column(&["统采保底费"]);
    let local_col = table.find_column(&["地采保底费"]);
    let legacy_col = table.find_column(&["保底费"]);
    if bulk_col.is_none() && local_col.is_none() && legacy_col.is_none() {
        return Err(ConfigError::parse(sheet, "缺少列: 统采保底费/地采保底费"));
    }

    let amount = |idx: usize, row: &RawRow, col: Option<&str>| -> ConfigResult<f64> {
        match col {
            Some(col) => Ok(parse_cell(sheet, row_number(idx), col, cell(row, col))?.unwrap_or(0.0)),
            None => Ok(0.0),
        }
    };

    let mut floors = BTreeMap::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let category = cell(row, category_col);
        if category.is_empty() {
            continue;
        }
        let floor = if bulk_col.is_some() || local_col.is_some() {
            FloorRule {
                bulk: amount(idx, row, bulk_col)?,
                local: amount(idx, row, local_col)?,
            }
        } else {
            let flat = amount(idx, row, legacy_col)?;
            FloorRule {
                bulk: flat,
                local: flat,
            }
        };
        floors.insert(category.to_string(), floor);
    }
    Ok(floors)
}

// ==========================================
// 特殊免单: 新品大类 + 最低毛利率
// ==========================================
fn read_exemptions(sheet: &str, table: &SheetTable) -> ConfigResult<Vec<ExemptionRule>> {
    let category_col = require_column(sheet, table, COL_CATEGORY)?;
    let margin_col = require_column(sheet, table, &["最低毛利率", "毛利率阈值", "min_gross_margin"])?;

    let mut rules = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let category = cell(row, category_col);
        if category.is_empty() {
            continue;
        }
        let margin = required_cell(sheet, row_number(idx), margin_col, cell(row, margin_col))?;
        rules.push(ExemptionRule {
            category: category.to_string(),
            min_gross_margin: margin,
        });
    }
    Ok(rules)
}
