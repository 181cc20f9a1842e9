// ==========================================
// 新品铺货费计算器 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 表头 + 行（列名 → 去空白文本），完全空白的行跳过
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Data, Range, Reader};
use chrono::NaiveDateTime;
use csv::ReaderBuilder;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

/// 一行原始数据（列名 → 文本）
pub type RawRow = HashMap<String, String>;

/// Excel 日期单元格统一输出格式
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// SheetTable - 单个工作表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl SheetTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// 第一个存在的列名（别名查找）
    pub fn find_column<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        candidates.iter().copied().find(|c| self.has_column(c))
    }

    /// 第一列的非空取值
    pub fn first_column_values(&self) -> Vec<String> {
        match self.headers.first() {
            Some(header) => self
                .rows
                .iter()
                .filter_map(|row| row.get(header))
                .filter(|v| !v.is_empty())
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn from_records<I>(headers: Vec<String>, records: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut rows = Vec::new();
        for record in records {
            let mut row_map = HashMap::new();
            for (col_idx, value) in record.into_iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    if !header.is_empty() {
                        row_map.insert(header.clone(), value.trim().to_string());
                    }
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(row_map);
        }
        Self { headers, rows }
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser {
    /// 解析首个工作表为原始行
    fn parse_table(&self, file_path: &Path) -> ImportResult<SheetTable>;

    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        Ok(self.parse_table(file_path)?.rows)
    }
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<SheetTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            records.push(record.iter().map(|v| v.to_string()).collect::<Vec<_>>());
        }

        Ok(SheetTable::from_records(headers, records))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    /// 读取工作簿中全部工作表（表名 → 表格）
    pub fn parse_workbook(&self, file_path: &Path) -> ImportResult<BTreeMap<String, SheetTable>> {
        ensure_exists(file_path)?;
        Self::check_extension(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;
        let mut sheets = BTreeMap::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;
            sheets.insert(sheet_name.trim().to_string(), Self::range_to_table(&range));
        }
        Ok(sheets)
    }

    fn check_extension(path: &Path) -> ImportResult<()> {
        let ext = extension_of(path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }
        Ok(())
    }

    fn range_to_table(range: &Range<Data>) -> SheetTable {
        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(header_row) => header_row
                .iter()
                .map(|cell| Self::cell_text(cell).trim().to_string())
                .collect(),
            None => return SheetTable::default(),
        };

        let records = rows.map(|data_row| {
            data_row
                .iter()
                .map(Self::cell_text)
                .collect::<Vec<_>>()
        });
        SheetTable::from_records(headers, records)
    }

    /// 单元格 → 文本；日期单元格转为可读时间，其余按原样显示（500.0 → "500"）
    fn cell_text(cell: &Data) -> String {
        match cell {
            Data::DateTime(dt) if dt.is_datetime() => dt
                .as_datetime()
                .map(|value| value.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| dt.to_string()),
            Data::DateTimeIso(iso) => NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|value| value.format(DATETIME_FORMAT).to_string())
                .unwrap_or_else(|_| iso.clone()),
            other => other.to_string(),
        }
    }
}

impl FileParser for ExcelParser {
    fn parse_table(&self, file_path: &Path) -> ImportResult<SheetTable> {
        ensure_exists(file_path)?;
        Self::check_extension(file_path)?;

        let mut workbook = open_workbook_auto(file_path)?;
        let sheet_names = workbook.sheet_names();
        let first = sheet_names
            .first()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(first)?;
        Ok(Self::range_to_table(&range))
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<SheetTable> {
        let path = file_path.as_ref();
        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_table(path),
            "xlsx" | "xls" => ExcelParser.parse_table(path),
            other => {
                ensure_exists(path)?;
                Err(ImportError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}
