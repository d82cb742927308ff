//! 模型实例

use crate::schema::Schema;
use crate::types::{DataValue, Document};

/// 一个内存中的文档：可选的标识加上模板模式的克隆
///
/// 标识只由模型在插入成功后写入。同一文档查询两次得到两个互不相关的实例。
#[derive(Debug)]
pub struct ModelInstance {
    id: Option<String>,
    schema: Schema,
}

impl ModelInstance {
    pub(crate) fn new(schema: Schema) -> Self {
        Self { id: None, schema }
    }

    /// 持久化后的标识
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_mut(&mut self) -> &mut Schema {
        &mut self.schema
    }

    /// 读取字段值
    pub fn get(&self, name: &str) -> Option<DataValue> {
        self.schema.get(name)
    }

    /// 写入字段值，未知字段被忽略
    pub fn set(&mut self, name: &str, value: impl Into<DataValue>) {
        self.schema.set(name, value.into());
    }

    /// 对外数据，`sanitize` 为真时去掉敏感字段
    pub fn generate_clean_data(&self, sanitize: bool) -> Document {
        self.schema.generate_clean_data(sanitize, self.id())
    }

    /// 对外 JSON
    pub fn to_json(&self, sanitize: bool) -> serde_json::Value {
        self.schema.to_json(sanitize, self.id())
    }
}
