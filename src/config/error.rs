// ==========================================
// 新品铺货费计算器 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 仅"配置缺失 / 结构错误"致命，表内查找缺失不报错
// ==========================================

use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 来源错误 =====
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    #[error("配置文件格式不支持: {0}（仅支持 .xlsx/.xls/.yaml/.yml）")]
    UnsupportedFormat(String),

    // ===== 结构错误 =====
    #[error("配置解析失败 [{sheet}]: {message}")]
    Parse { sheet: String, message: String },

    #[error("配置取值无效 [{sheet}] 第{row}行 {column}: {value}")]
    InvalidValue {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("区间无效 [{sheet}] 第{row}行: min={min} > max={max}")]
    InvalidRange {
        sheet: String,
        row: usize,
        min: f64,
        max: f64,
    },

    // ===== 底层错误 =====
    #[error("配置读取失败: {0}")]
    Io(String),

    #[error("Excel 配置解析失败: {0}")]
    Excel(String),

    #[error("YAML 配置解析失败: {0}")]
    Yaml(String),
}

impl ConfigError {
    pub fn parse(sheet: &str, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            sheet: sheet.to_string(),
            message: message.into(),
        }
    }

    /// 是否为"配置缺失"类错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound(_))
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err.to_string())
    }
}

impl From<calamine::Error> for ConfigError {
    fn from(err: calamine::Error) -> Self {
        ConfigError::Excel(err.to_string())
    }
}

// 工作簿读取复用导入层解析器
impl From<ImportError> for ConfigError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ConfigError::NotFound(path),
            ImportError::UnsupportedFormat(ext) => ConfigError::UnsupportedFormat(ext),
            ImportError::FileReadError(msg) => ConfigError::Io(msg),
            other => ConfigError::Excel(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
