// ==========================================
// 新品铺货费计算器 - 维度元数据加载
// ==========================================
// 职责: dim_metadata.json → 各筛选维度的可选值 + 数据更新时间
// 格式: { "销售规模": [...], "店龄店型": [...], "更新时间": "..." }
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const UPDATED_AT_KEY: &str = "更新时间";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimMetadata {
    /// 维度名 → 可选值
    pub options: BTreeMap<String, Vec<String>>,
    pub updated_at: Option<String>,
}

impl DimMetadata {
    pub fn options_for(&self, dimension: &str) -> &[String] {
        self.options
            .get(dimension)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// 从 JSON 文本解析（非数组、非字符串的字段忽略）
    pub fn from_json_str(text: &str) -> ImportResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        let object = value
            .as_object()
            .ok_or_else(|| ImportError::JsonParseError("顶层必须是对象".to_string()))?;

        let mut metadata = DimMetadata::default();
        for (key, value) in object {
            if key == UPDATED_AT_KEY {
                metadata.updated_at = value.as_str().map(|s| s.to_string());
                continue;
            }
            if let Some(items) = value.as_array() {
                let values = items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s.trim().to_string()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .filter(|s| !s.is_empty())
                    .collect();
                metadata.options.insert(key.clone(), values);
            }
        }
        Ok(metadata)
    }
}

pub struct DimMetadataLoader;

impl DimMetadataLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<DimMetadata> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let text = fs::read_to_string(path)?;
        let metadata = DimMetadata::from_json_str(&text)?;
        debug!(dimensions = metadata.options.len(), "维度元数据加载完成");
        Ok(metadata)
    }

    /// 可选文件：不存在或无法解析时返回 None
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Option<DimMetadata> {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(metadata) => Some(metadata),
            Err(ImportError::FileNotFound(_)) => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "维度元数据不可用");
                None
            }
        }
    }
}
