//! 模型 CRUD 操作
//!
//! 所有写入路径都先在实例的模式上校验，再访问存储。应用层的唯一性检查
//! 只是快速路径，存储层唯一索引的拒绝会被映射回同一种唯一性错误。

use super::core::Model;
use super::instance::ModelInstance;
use crate::error::{OdmError, OdmResult};
use crate::types::{
    DataValue, Document, ID_FIELD, QueryCondition, QueryConditionGroup, QueryOptions,
};
use rat_logger::{debug, error, warn};

/// 字段值是否“存在”：非空且非空串、非空数组
fn is_present(value: &DataValue) -> bool {
    match value {
        DataValue::Null => false,
        DataValue::String(s) => !s.is_empty(),
        DataValue::Array(items) => !items.is_empty(),
        _ => true,
    }
}

impl Model {
    /// 实例中有值的唯一字段及其值
    ///
    /// 唯一字段集合总是取自模板，实例只提供值
    fn present_unique_values(&self, instance: &ModelInstance) -> Vec<(String, DataValue)> {
        self.template()
            .unique_fields()
            .into_iter()
            .filter_map(|name| {
                let value = instance.schema().field(name)?.serialize();
                is_present(&value).then(|| (name.to_string(), value))
            })
            .collect()
    }

    /// 一批实例中有值的唯一字段名，按模板声明顺序
    fn present_unique_fields(&self, instances: &[ModelInstance]) -> Vec<String> {
        self.template()
            .unique_fields()
            .into_iter()
            .filter(|name| {
                instances.iter().any(|instance| {
                    instance
                        .schema()
                        .field(name)
                        .is_some_and(|f| is_present(&f.serialize()))
                })
            })
            .map(str::to_string)
            .collect()
    }

    /// 把存储错误中的唯一索引冲突映射为唯一性错误，`fields` 为写入中有值的唯一字段
    fn map_storage_error(&self, err: OdmError, fields: &[String]) -> OdmError {
        match err {
            OdmError::DuplicateKey { message } => {
                warn!("模型 {} 存储层唯一索引拒绝写入: {}", self.collection_name(), message);
                let fields = if fields.is_empty() {
                    self.template().unique_fields().into_iter().map(str::to_string).collect()
                } else {
                    fields.to_vec()
                };
                OdmError::UniquenessError { fields }
            }
            other => {
                error!("模型 {} 存储操作失败: {}", self.collection_name(), other);
                other
            }
        }
    }

    /// 唯一性检查
    ///
    /// 对所有有值的唯一字段构造一个 OR 查询，命中任一文档即拒绝，
    /// 错误中列出参与检查的全部字段名。`exclude_id` 用于更新时排除自身。
    pub async fn check_uniqueness(&self, instance: &ModelInstance, exclude_id: Option<&str>) -> OdmResult<()> {
        let collection = self.collection()?;
        let mut fields = Vec::new();
        let mut conditions = Vec::new();
        for (name, value) in self.present_unique_values(instance) {
            conditions.push(QueryConditionGroup::equals(name.as_str(), value));
            fields.push(name);
        }
        if conditions.is_empty() {
            return Ok(());
        }

        let mut selector = QueryConditionGroup::or(conditions);
        if let Some(id) = exclude_id {
            selector = QueryConditionGroup::and(vec![
                selector,
                QueryCondition::not_equals(ID_FIELD, id).into(),
            ]);
        }

        let count = collection
            .count(&selector)
            .await
            .map_err(|e| self.map_storage_error(e, &fields))?;
        if count > 0 {
            warn!("模型 {} 唯一性检查失败: {}", self.collection_name(), selector);
            return Err(OdmError::UniquenessError { fields });
        }
        Ok(())
    }

    /// 批量插入
    ///
    /// 先逐个校验，任一实例失败则整批放弃且不发生任何写入；
    /// 校验全部通过后以一次批量调用写入，并把生成的标识写回实例。
    pub async fn insert(&self, instances: &mut [ModelInstance]) -> OdmResult<Vec<String>> {
        let collection = self.collection()?;
        let mut documents = Vec::with_capacity(instances.len());
        for instance in instances.iter_mut() {
            instance.schema_mut().check()?;
            documents.push(instance.schema().serialize());
        }

        let ids = collection
            .insert_many(documents)
            .await
            .map_err(|e| self.map_storage_error(e, &self.present_unique_fields(instances)))?;
        for (instance, id) in instances.iter_mut().zip(ids.iter()) {
            instance.set_id(id.clone());
        }
        debug!("模型 {} 插入 {} 条文档", self.collection_name(), ids.len());
        Ok(ids)
    }

    /// 创建实例：赋值、唯一性检查、校验并写入
    pub async fn create_instance(&self, data: Document) -> OdmResult<ModelInstance> {
        self.collection()?;
        debug!("模型 {} 创建实例", self.collection_name());
        let mut instance = self.new_instance();
        instance.schema_mut().set_many(data);
        self.check_uniqueness(&instance, None).await?;

        let mut batch = [instance];
        self.insert(&mut batch).await?;
        let [instance] = batch;
        Ok(instance)
    }

    /// 更新实例：加载、赋值、校验，只对发生变化的字段执行 `$set`
    pub async fn update_instance(&self, id: &str, data: Document) -> OdmResult<ModelInstance> {
        let collection = self.collection()?;
        debug!("模型 {} 更新实例 {}", self.collection_name(), id);
        let selector = QueryConditionGroup::by_id(id);
        let Some(mut instance) = self.find_one(selector.clone()).await? else {
            return Err(self.not_found(&selector));
        };

        let before = instance.schema().serialize();
        instance.schema_mut().set_many(data);
        instance.schema_mut().check()?;
        self.check_uniqueness(&instance, Some(id)).await?;

        let changed: Document = instance
            .schema()
            .serialize()
            .into_iter()
            .filter(|(key, value)| before.get(key) != Some(value))
            .collect();
        if changed.is_empty() {
            return Ok(instance);
        }

        let matched = collection
            .update_one(&selector, &changed)
            .await
            .map_err(|e| {
                self.map_storage_error(e, &self.present_unique_fields(std::slice::from_ref(&instance)))
            })?;
        if matched == 0 {
            return Err(self.not_found(&selector));
        }
        Ok(instance)
    }

    fn not_found(&self, selector: &QueryConditionGroup) -> OdmError {
        OdmError::NotFound {
            collection: self.collection_name().to_string(),
            selector: selector.to_string(),
        }
    }

    /// 查询并物化为实例
    pub async fn find_instances(
        &self,
        selector: QueryConditionGroup,
        options: QueryOptions,
    ) -> OdmResult<Vec<ModelInstance>> {
        let collection = self.collection()?;
        debug!("模型 {} 查询: {}", self.collection_name(), selector);
        let documents = collection
            .find(&selector, &options)
            .await
            .map_err(|e| self.map_storage_error(e, &[]))?;
        documents.iter().map(|doc| self.materialize(doc)).collect()
    }

    /// 查询第一个匹配的实例
    pub async fn find_one(&self, selector: QueryConditionGroup) -> OdmResult<Option<ModelInstance>> {
        let mut found = self
            .find_instances(selector, QueryOptions::new().with_range(0, 1))
            .await?;
        Ok(found.pop())
    }

    /// 按标识查询
    pub async fn find_by_id(&self, id: &str) -> OdmResult<Option<ModelInstance>> {
        self.find_one(QueryConditionGroup::by_id(id)).await
    }

    /// 统计匹配数量
    pub async fn count(&self, selector: QueryConditionGroup) -> OdmResult<u64> {
        let collection = self.collection()?;
        collection
            .count(&selector)
            .await
            .map_err(|e| self.map_storage_error(e, &[]))
    }

    /// 是否存在匹配的文档
    pub async fn exists(&self, selector: QueryConditionGroup) -> OdmResult<bool> {
        Ok(self.count(selector).await? > 0)
    }

    /// 删除所有匹配的文档，返回删除数量（0 不是错误）
    pub async fn delete_instances(&self, selector: QueryConditionGroup) -> OdmResult<u64> {
        let collection = self.collection()?;
        let removed = collection
            .delete_many(&selector)
            .await
            .map_err(|e| self.map_storage_error(e, &[]))?;
        debug!("模型 {} 删除 {} 条文档: {}", self.collection_name(), removed, selector);
        Ok(removed)
    }
}
