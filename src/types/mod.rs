//! 通用数据类型定义
//!
//! 定义字段序列化值、文档以及查询选择器

pub mod data_value;
pub mod query;

// 重新导出所有公共类型
pub use data_value::{DataValue, Document, document_from_json};
pub use query::{
    ID_FIELD, LogicalOperator, PaginationConfig, QueryCondition, QueryConditionGroup, QueryOperator,
    QueryOptions, SortConfig, SortDirection,
};
