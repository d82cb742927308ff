//! 模式容器模块
//!
//! 模式是一组有序的命名字段，描述一个集合的文档形状。
//! 模型持有一份模板模式，每个实例持有模板的深拷贝。

use crate::error::{OdmError, OdmResult};
use crate::field::{Field, FieldOptions};
use crate::types::{DataValue, Document, ID_FIELD};
use rat_logger::debug;

/// 模式
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Box<dyn Field>>,
    error: Option<String>,
}

impl Schema {
    /// 创建空模式
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册字段，返回其约束供链式设置
    ///
    /// ```ignore
    /// schema.add(TextField::new("slug"))?.required(true).unique(true);
    /// ```
    pub fn add<F: Field + 'static>(&mut self, field: F) -> OdmResult<&mut FieldOptions> {
        self.add_boxed(Box::new(field))
    }

    /// 注册已装箱的字段
    pub fn add_boxed(&mut self, field: Box<dyn Field>) -> OdmResult<&mut FieldOptions> {
        if self.contains(field.name()) {
            return Err(crate::odm_error!(
                config,
                format!("字段名重复: {}", field.name())
            ));
        }
        self.fields.push(field);
        let last = self.fields.len() - 1;
        Ok(self.fields[last].options_mut())
    }

    /// 是否包含指定字段
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name() == name)
    }

    /// 按名称获取字段
    pub fn field(&self, name: &str) -> Option<&dyn Field> {
        self.fields.iter().find(|f| f.name() == name).map(|f| f.as_ref())
    }

    /// 按名称获取可变字段
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Box<dyn Field>> {
        self.fields.iter_mut().find(|f| f.name() == name)
    }

    /// 按声明顺序遍历字段
    pub fn fields(&self) -> impl Iterator<Item = &dyn Field> {
        self.fields.iter().map(|f| f.as_ref())
    }

    /// 字段名列表（声明顺序）
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 写入单个字段，未知字段名被忽略
    pub fn set(&mut self, name: &str, value: DataValue) {
        match self.field_mut(name) {
            Some(field) => field.set(value),
            None => debug!("忽略未知字段: {}", name),
        }
    }

    /// 批量写入
    pub fn set_many<I, K>(&mut self, data: I)
    where
        I: IntoIterator<Item = (K, DataValue)>,
        K: AsRef<str>,
    {
        for (name, value) in data {
            self.set(name.as_ref(), value);
        }
    }

    /// 读取字段当前值
    pub fn get(&self, name: &str) -> Option<DataValue> {
        self.field(name).map(|f| f.get())
    }

    /// 按声明顺序校验，遇到第一个失败即停止并记录错误
    pub fn validate(&mut self) -> bool {
        self.check().is_ok()
    }

    /// 与 [`Schema::validate`] 相同，但返回带字段名的错误
    pub fn check(&mut self) -> OdmResult<()> {
        for field in &self.fields {
            if let Err(message) = field.validate() {
                self.error = Some(message.clone());
                return Err(OdmError::ValidationError {
                    field: field.name().to_string(),
                    message,
                });
            }
        }
        self.error = None;
        Ok(())
    }

    /// 最近一次校验失败的消息
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 生成可持久化的文档，每个字段一项
    pub fn serialize(&self) -> Document {
        self.fields
            .iter()
            .map(|f| (f.name().to_string(), f.serialize()))
            .collect()
    }

    /// 从持久化文档恢复，缺失的键保持字段当前值
    pub fn deserialize(&mut self, document: &Document) -> OdmResult<()> {
        for field in self.fields.iter_mut() {
            if let Some(raw) = document.get(field.name()) {
                field.deserialize(raw.clone())?;
            }
        }
        Ok(())
    }

    /// 生成对外数据：`sanitize` 为真时去掉敏感字段，并注入实例标识
    pub fn generate_clean_data(&self, sanitize: bool, id: Option<&str>) -> Document {
        let mut data: Document = self
            .fields
            .iter()
            .filter(|f| !(sanitize && f.is_sensitive()))
            .map(|f| (f.name().to_string(), f.serialize()))
            .collect();
        data.insert(
            ID_FIELD.to_string(),
            id.map(|id| DataValue::String(id.to_string())).unwrap_or(DataValue::Null),
        );
        data
    }

    /// 唯一字段名
    pub fn unique_fields(&self) -> Vec<&str> {
        self.fields.iter().filter(|f| f.is_unique()).map(|f| f.name()).collect()
    }

    /// 索引字段名
    pub fn indexable_fields(&self) -> Vec<&str> {
        self.fields.iter().filter(|f| f.is_indexable()).map(|f| f.name()).collect()
    }

    /// 以 JSON 对象形式输出
    pub fn to_json(&self, sanitize: bool, id: Option<&str>) -> serde_json::Value {
        let data = self.generate_clean_data(sanitize, id);
        serde_json::Value::Object(
            data.into_iter().map(|(k, v)| (k, v.to_json_value())).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{BooleanField, FieldBuilder, TextField};

    fn post_schema() -> Schema {
        let mut schema = Schema::new();
        schema.add(TextField::new("title").required()).unwrap();
        schema
            .add(TextField::new("slug"))
            .unwrap()
            .required(true)
            .unique(true)
            .max_length(20);
        schema.add(TextField::new("description")).unwrap();
        schema.add(TextField::new("secret").sensitive()).unwrap();
        schema
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut schema = post_schema();
        assert!(schema.add(BooleanField::new("slug")).is_err());
        assert_eq!(schema.len(), 4);
    }

    #[test]
    fn test_clone_isolation() {
        let template = post_schema();
        let mut clone = template.clone();
        clone.set("title", "changed".into());
        assert_eq!(template.get("title"), Some(DataValue::String(String::new())));
        assert_eq!(clone.get("title"), Some(DataValue::String("changed".into())));
    }

    #[test]
    fn test_validation_order_first_failure_wins() {
        let mut schema = post_schema();
        assert!(!schema.validate());
        assert_eq!(schema.error(), Some("title cannot be empty"));

        schema.set("title", "Test".into());
        let err = schema.check().unwrap_err();
        assert_eq!(err.to_string(), "slug cannot be empty");

        schema.set("slug", "t1".into());
        assert!(schema.validate());
        assert_eq!(schema.error(), None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let mut schema = post_schema();
        schema.set_many(crate::document! { "title" => "x", "extra" => 1 });
        assert_eq!(schema.get("title"), Some(DataValue::String("x".into())));
        assert_eq!(schema.get("extra"), None);
    }

    #[test]
    fn test_clean_data_sanitizes_and_injects_id() {
        let mut schema = post_schema();
        schema.set("secret", "hidden".into());
        let data = schema.generate_clean_data(true, Some("abc"));
        assert!(!data.contains_key("secret"));
        assert_eq!(data.get(ID_FIELD), Some(&DataValue::String("abc".into())));

        let verbose = schema.generate_clean_data(false, None);
        assert_eq!(verbose.get("secret"), Some(&DataValue::String("hidden".into())));
        assert_eq!(verbose.get(ID_FIELD), Some(&DataValue::Null));
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut schema = post_schema();
        schema.set_many(crate::document! { "title" => "T", "slug" => "s" });
        let doc = schema.serialize();
        assert_eq!(doc.len(), 4);

        let mut restored = post_schema();
        restored.deserialize(&doc).unwrap();
        assert_eq!(restored.serialize(), doc);
    }

    #[test]
    fn test_flag_queries() {
        let schema = post_schema();
        assert_eq!(schema.unique_fields(), vec!["slug"]);
        assert!(schema.indexable_fields().is_empty());
        assert_eq!(schema.field_names(), vec!["title", "slug", "description", "secret"]);
    }
}
