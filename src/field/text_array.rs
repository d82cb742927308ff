//! 文本数组字段

use super::{Field, FieldBuilder, FieldKind, FieldOptions, TextField, check_length, deserialize_mismatch, type_mismatch};
use crate::error::OdmResult;
use crate::types::DataValue;

/// 文本数组字段
///
/// 长度约束作用于元素个数；每个元素通过同一套文本字段规则独立校验，
/// 元素规则默认要求非空。
#[derive(Debug, Clone)]
pub struct TextArrayField {
    name: String,
    value: Vec<String>,
    default: Vec<String>,
    options: FieldOptions,
    item: TextField,
    rejected: Option<DataValue>,
}

impl TextArrayField {
    /// 创建新的文本数组字段
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            item: TextField::new(name.clone()).required(),
            name,
            value: Vec::new(),
            default: Vec::new(),
            options: FieldOptions::default(),
            rejected: None,
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, default: Vec<String>) -> Self {
        self.default = default;
        self.value = self.default.clone();
        self
    }

    /// 设置元素规则，元素字段的名字会被替换为数组字段名
    pub fn with_item(mut self, item: TextField) -> Self {
        self.item = item.renamed(self.name.clone());
        self
    }

    /// 当前值
    pub fn values(&self) -> &[String] {
        &self.value
    }

    fn parse(raw: &DataValue) -> Option<Vec<String>> {
        match raw {
            DataValue::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            DataValue::Json(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => None,
        }
    }
}

impl Field for TextArrayField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        FieldKind::TextArray
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn get(&self) -> DataValue {
        DataValue::Array(self.value.iter().cloned().map(DataValue::String).collect())
    }

    fn set(&mut self, value: DataValue) {
        if value.is_null() {
            self.reset();
            return;
        }
        match Self::parse(&value) {
            Some(items) => {
                self.value = items;
                self.rejected = None;
            }
            None => self.rejected = Some(value),
        }
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
        self.rejected = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.rejected.is_some() {
            return Err(type_mismatch(&self.name, "an array of strings"));
        }
        if self.value.is_empty() && self.options.required {
            return Err(format!("{} cannot be empty", self.name));
        }
        check_length(&self.name, self.value.len(), &self.options, "items")?;
        let mut item = self.item.clone();
        for value in &self.value {
            item.set(DataValue::String(value.clone()));
            item.validate()?;
        }
        Ok(())
    }

    fn deserialize(&mut self, raw: DataValue) -> OdmResult<()> {
        if raw.is_null() {
            self.reset();
            return Ok(());
        }
        match Self::parse(&raw) {
            Some(items) => {
                self.value = items;
                self.rejected = None;
                Ok(())
            }
            None => Err(deserialize_mismatch(&self.name, self.kind(), &raw)),
        }
    }
}
