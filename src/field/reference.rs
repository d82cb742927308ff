//! 标识引用字段

use super::{Field, FieldKind, FieldOptions, deserialize_mismatch, type_mismatch};
use crate::error::OdmResult;
use crate::types::DataValue;
use once_cell::sync::Lazy;
use regex::Regex;

static OBJECT_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[0-9a-fA-F]{24}$").expect("对象标识正则为常量"));

/// 判断字符串是否为24位十六进制对象标识
pub fn is_object_id(value: &str) -> bool {
    OBJECT_ID_PATTERN.is_match(value)
}

/// 指向另一个集合中文档的标识引用
#[derive(Debug, Clone)]
pub struct ReferenceField {
    name: String,
    value: Option<String>,
    target_collection: Option<String>,
    options: FieldOptions,
    rejected: Option<DataValue>,
}

impl ReferenceField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            target_collection: None,
            options: FieldOptions::default(),
            rejected: None,
        }
    }

    /// 设置引用的目标集合
    pub fn with_target(mut self, collection: impl Into<String>) -> Self {
        self.target_collection = Some(collection.into());
        self
    }

    pub fn target_collection(&self) -> Option<&str> {
        self.target_collection.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl Field for ReferenceField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Reference
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn get(&self) -> DataValue {
        self.value.clone().map(DataValue::String).unwrap_or(DataValue::Null)
    }

    fn set(&mut self, value: DataValue) {
        match value {
            DataValue::String(s) if s.is_empty() => self.reset(),
            DataValue::String(s) => {
                self.value = Some(s);
                self.rejected = None;
            }
            DataValue::Null => self.reset(),
            other => self.rejected = Some(other),
        }
    }

    fn reset(&mut self) {
        self.value = None;
        self.rejected = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.rejected.is_some() {
            return Err(type_mismatch(&self.name, "a valid identifier"));
        }
        match &self.value {
            None if self.options.required => Err(format!("{} cannot be empty", self.name)),
            None => Ok(()),
            Some(id) if !is_object_id(id) => Err(type_mismatch(&self.name, "a valid identifier")),
            Some(_) => Ok(()),
        }
    }

    fn deserialize(&mut self, raw: DataValue) -> OdmResult<()> {
        match raw {
            DataValue::String(s) => {
                self.value = if s.is_empty() { None } else { Some(s) };
                self.rejected = None;
                Ok(())
            }
            DataValue::Null => {
                self.reset();
                Ok(())
            }
            other => Err(deserialize_mismatch(&self.name, self.kind(), &other)),
        }
    }
}
