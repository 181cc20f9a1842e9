// ==========================================
// 新品铺货费计算器 - 导入层
// ==========================================
// 职责: 外部数据文件 → 内存快照（门店主数据、处方类别映射、黑名单、维度元数据）
// 支持: Excel, CSV, JSON
// ==========================================

// 模块声明
pub mod blacklist;
pub mod dim_metadata;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod restriction_map;
pub mod store_master;

// 重导出核心类型
pub use blacklist::BlacklistLoader;
pub use dim_metadata::{DimMetadata, DimMetadataLoader};
pub use error::{ImportError, ImportResult};
pub use field_mapper::StoreFieldMapper;
pub use file_parser::{
    CsvParser, ExcelParser, FileParser, RawRow, SheetTable, UniversalFileParser,
};
pub use restriction_map::RestrictionMapLoader;
pub use store_master::{StoreMasterLoader, StorePopulation};
