//! 模型核心：集合绑定与初始化

use super::instance::ModelInstance;
use crate::adapter::{Collection, Database, IndexDefinition};
use crate::error::{OdmError, OdmResult};
use crate::schema::Schema;
use crate::types::{DataValue, Document, ID_FIELD};
use rat_logger::{debug, error, info};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// 模型：一个集合的模式、索引和 CRUD 的唯一入口
///
/// 模板模式在构造后不再修改，只被克隆。集合句柄在 `initialize`
/// 成功后绑定一次，此前所有 CRUD 操作都会立即失败。
pub struct Model {
    collection_name: String,
    template: Schema,
    collection: OnceCell<Arc<dyn Collection>>,
}

impl Model {
    /// 创建未初始化的模型
    pub fn new(collection_name: impl Into<String>, template: Schema) -> Self {
        Self {
            collection_name: collection_name.into(),
            template,
            collection: OnceCell::new(),
        }
    }

    /// 集合名称
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    /// 模板模式
    pub fn template(&self) -> &Schema {
        &self.template
    }

    /// 是否已初始化
    pub fn is_initialized(&self) -> bool {
        self.collection.initialized()
    }

    /// 初始化：确保集合存在，删除全部索引后按模板重建
    ///
    /// 幂等，已初始化时直接返回。任何一步失败都会保持未初始化状态，
    /// 调用方可以重试。并发调用只会执行一次。
    pub async fn initialize(&self, db: &dyn Database) -> OdmResult<()> {
        if self.is_initialized() {
            debug!("模型 {} 已初始化，跳过", self.collection_name);
            return Ok(());
        }
        self.collection
            .get_or_try_init(|| self.prepare_collection(db))
            .await
            .map_err(|e| {
                error!("模型 {} 初始化失败: {}", self.collection_name, e);
                e
            })?;
        Ok(())
    }

    async fn prepare_collection(&self, db: &dyn Database) -> OdmResult<Arc<dyn Collection>> {
        let name = self.collection_name.as_str();
        if !db.collection_exists(name).await? {
            db.create_collection(name).await?;
            info!("模型 {} 创建集合 ({})", name, db.backend());
        }

        let collection = db.collection(name);
        collection.drop_indexes().await?;
        debug!("模型 {} 已删除全部索引", name);

        let indexes = self.index_definitions();
        for index in &indexes {
            collection.create_index(index).await?;
        }
        info!("模型 {} 初始化完成，重建 {} 个索引", name, indexes.len());
        Ok(collection)
    }

    /// 模板对应的索引集合：每个索引字段一个，唯一字段总是得到唯一索引
    pub fn index_definitions(&self) -> Vec<IndexDefinition> {
        self.template
            .fields()
            .filter(|f| f.is_indexable() || f.is_unique())
            .map(|f| IndexDefinition::single(f.name(), f.is_unique()))
            .collect()
    }

    /// 已绑定的集合，未初始化时返回 `NotInitialized`
    pub(crate) fn collection(&self) -> OdmResult<&Arc<dyn Collection>> {
        self.collection.get().ok_or_else(|| OdmError::NotInitialized {
            collection: self.collection_name.clone(),
        })
    }

    /// 从模板派生新的空实例
    pub fn new_instance(&self) -> ModelInstance {
        ModelInstance::new(self.template.clone())
    }

    /// 把持久化文档物化为实例
    pub(crate) fn materialize(&self, document: &Document) -> OdmResult<ModelInstance> {
        let mut instance = self.new_instance();
        instance.schema_mut().deserialize(document)?;
        if let Some(DataValue::String(id)) = document.get(ID_FIELD) {
            instance.set_id(id.clone());
        }
        Ok(instance)
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("collection_name", &self.collection_name)
            .field("fields", &self.template.field_names())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
