//! MongoDB数据库与集合实现

use super::query_builder::{build_filter, build_find_options};
use super::utils::{data_value_to_bson, from_bson_document, map_driver_error, to_bson_document};
use crate::adapter::{Collection, Database, IndexDefinition};
use crate::error::OdmResult;
use crate::types::{
    DataValue, Document, ID_FIELD, QueryCondition, QueryConditionGroup, QueryOperator, QueryOptions,
};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::IndexModel;
use mongodb::bson::{self, doc};
use mongodb::options::IndexOptions;
use rat_logger::{debug, error, info, warn};
use std::sync::Arc;

/// MongoDB 主键索引名称，不属于 ODM 管理的索引
const PRIMARY_INDEX: &str = "_id_";

/// MongoDB数据库
#[derive(Debug, Clone)]
pub struct MongoDatabase {
    database: mongodb::Database,
}

impl MongoDatabase {
    /// 通过连接串连接数据库
    pub async fn connect(uri: &str, database: &str) -> OdmResult<Self> {
        info!("连接MongoDB: 数据库 {}", database);
        let client = mongodb::Client::with_uri_str(uri)
            .await
            .map_err(|e| map_driver_error("连接MongoDB失败", e))?;
        Ok(Self::from_database(client.database(database)))
    }

    /// 包装已有的驱动数据库句柄
    pub fn from_database(database: mongodb::Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn collection_exists(&self, name: &str) -> OdmResult<bool> {
        let names = self
            .database
            .list_collection_names(None)
            .await
            .map_err(|e| map_driver_error("检查MongoDB集合是否存在失败", e))?;
        Ok(names.iter().any(|n| n == name))
    }

    async fn create_collection(&self, name: &str) -> OdmResult<()> {
        debug!("创建MongoDB集合: {}", name);
        self.database
            .create_collection(name, None)
            .await
            .map_err(|e| map_driver_error("创建MongoDB集合失败", e))
    }

    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        Arc::new(MongoCollection {
            name: name.to_string(),
            inner: self.database.collection::<bson::Document>(name),
        })
    }

    async fn list_collections(&self) -> OdmResult<Vec<String>> {
        let mut names = self
            .database
            .list_collection_names(None)
            .await
            .map_err(|e| map_driver_error("列出MongoDB集合失败", e))?;
        names.sort();
        Ok(names)
    }
}

/// MongoDB集合
#[derive(Debug, Clone)]
pub struct MongoCollection {
    name: String,
    inner: mongodb::Collection<bson::Document>,
}

#[async_trait]
impl Collection for MongoCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn find(&self, selector: &QueryConditionGroup, options: &QueryOptions) -> OdmResult<Vec<Document>> {
        let filter = build_filter(selector);
        let cursor = self
            .inner
            .find(filter, build_find_options(options))
            .await
            .map_err(|e| map_driver_error("MongoDB查询失败", e))?;
        let rows: Vec<bson::Document> = cursor
            .try_collect()
            .await
            .map_err(|e| map_driver_error("读取MongoDB游标失败", e))?;
        debug!("MongoDB集合 {} 查询返回 {} 条", self.name, rows.len());
        Ok(rows.iter().map(from_bson_document).collect())
    }

    async fn count(&self, selector: &QueryConditionGroup) -> OdmResult<u64> {
        self.inner
            .count_documents(build_filter(selector), None)
            .await
            .map_err(|e| map_driver_error("MongoDB计数失败", e))
    }

    async fn insert_many(&self, documents: Vec<Document>) -> OdmResult<Vec<String>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::with_capacity(documents.len());
        let mut generated = Vec::new();
        let mut rows = Vec::with_capacity(documents.len());
        for mut doc in documents {
            let id = match doc.get(ID_FIELD) {
                Some(DataValue::String(id)) => id.clone(),
                _ => {
                    let id = bson::oid::ObjectId::new().to_hex();
                    doc.insert(ID_FIELD.to_string(), DataValue::String(id.clone()));
                    generated.push(DataValue::String(id.clone()));
                    id
                }
            };
            ids.push(id);
            rows.push(to_bson_document(&doc));
        }

        if let Err(e) = self.inner.insert_many(rows, None).await {
            // 有序插入在第一条失败处停止，补偿删除本批由存储生成标识的文档
            let rollback = QueryConditionGroup::Single(QueryCondition::new(
                ID_FIELD,
                QueryOperator::In,
                DataValue::Array(generated),
            ));
            if let Err(cleanup) = self.inner.delete_many(build_filter(&rollback), None).await {
                error!("MongoDB集合 {} 批量插入回滚失败: {}", self.name, cleanup);
            }
            let err = map_driver_error("MongoDB批量插入失败", e);
            if err.is_uniqueness() {
                warn!("MongoDB集合 {} 唯一索引拒绝写入", self.name);
            }
            return Err(err);
        }
        Ok(ids)
    }

    async fn update_one(&self, selector: &QueryConditionGroup, set: &Document) -> OdmResult<u64> {
        let mut fields = bson::Document::new();
        for (key, value) in set {
            if key != ID_FIELD {
                fields.insert(key, data_value_to_bson(value));
            }
        }
        if fields.is_empty() {
            return self.count(selector).await.map(|n| n.min(1));
        }
        let result = self
            .inner
            .update_one(build_filter(selector), doc! { "$set": fields }, None)
            .await
            .map_err(|e| map_driver_error("MongoDB更新失败", e))?;
        Ok(result.matched_count)
    }

    async fn delete_many(&self, selector: &QueryConditionGroup) -> OdmResult<u64> {
        let result = self
            .inner
            .delete_many(build_filter(selector), None)
            .await
            .map_err(|e| map_driver_error("MongoDB删除失败", e))?;
        Ok(result.deleted_count)
    }

    async fn create_index(&self, index: &IndexDefinition) -> OdmResult<()> {
        let mut keys = bson::Document::new();
        for field in &index.fields {
            keys.insert(field.clone(), 1);
        }
        let mut options = IndexOptions::default();
        options.name = Some(index.name.clone());
        options.unique = Some(index.unique);
        if index.unique {
            // 空值不参与唯一约束，与内存后端保持一致
            let mut filter = bson::Document::new();
            for field in &index.fields {
                filter.insert(
                    field.clone(),
                    doc! { "$type": ["string", "number", "bool", "date", "objectId", "object"] },
                );
            }
            options.partial_filter_expression = Some(filter);
        }
        let model = IndexModel::builder().keys(keys).options(options).build();

        debug!("创建MongoDB索引: {} 在集合 {}", index.name, self.name);
        self.inner
            .create_index(model, None)
            .await
            .map_err(|e| map_driver_error("创建MongoDB索引失败", e))?;
        Ok(())
    }

    async fn drop_indexes(&self) -> OdmResult<()> {
        self.inner
            .drop_indexes(None)
            .await
            .map_err(|e| map_driver_error("删除MongoDB索引失败", e))
    }

    async fn list_indexes(&self) -> OdmResult<Vec<IndexDefinition>> {
        let cursor = self
            .inner
            .list_indexes(None)
            .await
            .map_err(|e| map_driver_error("列出MongoDB索引失败", e))?;
        let models: Vec<IndexModel> = cursor
            .try_collect()
            .await
            .map_err(|e| map_driver_error("读取MongoDB索引失败", e))?;

        Ok(models
            .into_iter()
            .filter_map(|model| {
                let options = model.options.unwrap_or_default();
                let name = options.name.unwrap_or_default();
                if name == PRIMARY_INDEX {
                    return None;
                }
                Some(IndexDefinition {
                    name,
                    fields: model.keys.keys().cloned().collect(),
                    unique: options.unique.unwrap_or(false),
                })
            })
            .collect())
    }
}
