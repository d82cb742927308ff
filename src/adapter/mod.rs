//! 存储适配器模块
//!
//! ODM 只通过这里的 [`Database`] / [`Collection`] 两个特征接触存储，
//! 驱动本身对上层不透明。内存后端始终可用，MongoDB 后端按特性启用。

use crate::error::OdmResult;
use crate::types::{Document, QueryConditionGroup, QueryOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod memory;
#[cfg(feature = "mongodb-support")]
pub mod mongodb;

pub use memory::{MemoryCollection, MemoryDatabase};
#[cfg(feature = "mongodb-support")]
pub use mongodb::{MongoCollection, MongoDatabase};

/// 索引定义
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// 索引名称
    pub name: String,
    /// 索引字段（升序）
    pub fields: Vec<String>,
    /// 是否唯一索引
    pub unique: bool,
}

impl IndexDefinition {
    /// 单字段升序索引，名称为 `<field>_1`
    pub fn single(field: impl Into<String>, unique: bool) -> Self {
        let field = field.into();
        Self {
            name: format!("{}_1", field),
            fields: vec![field],
            unique,
        }
    }
}

/// 集合操作接口
#[async_trait]
pub trait Collection: Send + Sync {
    /// 集合名称
    fn name(&self) -> &str;

    /// 按选择器查询，应用排序、分页和投影
    async fn find(&self, selector: &QueryConditionGroup, options: &QueryOptions) -> OdmResult<Vec<Document>>;

    /// 统计匹配的文档数量
    async fn count(&self, selector: &QueryConditionGroup) -> OdmResult<u64>;

    /// 批量插入，整批要么全部写入要么全部失败；返回每个文档的标识
    ///
    /// 文档缺少 `_id` 时由存储生成。唯一索引冲突返回 `DuplicateKey`。
    async fn insert_many(&self, documents: Vec<Document>) -> OdmResult<Vec<String>>;

    /// 对第一个匹配的文档执行 `$set`，返回匹配数量（0 或 1）
    async fn update_one(&self, selector: &QueryConditionGroup, set: &Document) -> OdmResult<u64>;

    /// 删除所有匹配的文档，返回删除数量
    async fn delete_many(&self, selector: &QueryConditionGroup) -> OdmResult<u64>;

    /// 创建索引
    async fn create_index(&self, index: &IndexDefinition) -> OdmResult<()>;

    /// 删除除主键外的全部索引
    async fn drop_indexes(&self) -> OdmResult<()>;

    /// 列出除主键外的全部索引
    async fn list_indexes(&self) -> OdmResult<Vec<IndexDefinition>>;
}

/// 数据库操作接口
#[async_trait]
pub trait Database: Send + Sync {
    /// 后端类型名称
    fn backend(&self) -> &'static str;

    /// 集合是否存在
    async fn collection_exists(&self, name: &str) -> OdmResult<bool>;

    /// 显式创建集合，集合已存在时返回错误
    async fn create_collection(&self, name: &str) -> OdmResult<()>;

    /// 获取集合句柄（不会创建集合）
    fn collection(&self, name: &str) -> Arc<dyn Collection>;

    /// 列出所有集合
    async fn list_collections(&self) -> OdmResult<Vec<String>>;
}
