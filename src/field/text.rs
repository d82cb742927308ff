//! 文本字段

use super::{Field, FieldKind, FieldOptions, check_length, deserialize_mismatch, type_mismatch};
use crate::error::OdmResult;
use crate::types::DataValue;
use regex::Regex;

/// 文本字段
///
/// 必填时空字符串校验失败；长度按字符计算，非空时检查
/// `[min_length, max_length]`；可选的正则约束。
#[derive(Debug, Clone)]
pub struct TextField {
    name: String,
    value: String,
    default: String,
    options: FieldOptions,
    pattern: Option<Regex>,
    rejected: Option<DataValue>,
}

impl TextField {
    /// 创建新的文本字段
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            default: String::new(),
            options: FieldOptions::default(),
            pattern: None,
            rejected: None,
        }
    }

    /// 设置默认值（同时作为当前值）
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self.value = self.default.clone();
        self
    }

    /// 设置正则约束
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// 改名，保留全部规则
    pub(crate) fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 当前值
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Field for TextField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Text
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn get(&self) -> DataValue {
        DataValue::String(self.value.clone())
    }

    fn set(&mut self, value: DataValue) {
        match value {
            DataValue::String(s) => {
                self.value = s;
                self.rejected = None;
            }
            DataValue::Null => self.reset(),
            other => self.rejected = Some(other),
        }
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
        self.rejected = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.rejected.is_some() {
            return Err(type_mismatch(&self.name, "a string"));
        }
        if self.value.is_empty() {
            if self.options.required {
                return Err(format!("{} cannot be empty", self.name));
            }
            return Ok(());
        }
        check_length(&self.name, self.value.chars().count(), &self.options, "characters")?;
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&self.value) {
                return Err(format!("{} is not in a valid format", self.name));
            }
        }
        Ok(())
    }

    fn deserialize(&mut self, raw: DataValue) -> OdmResult<()> {
        match raw {
            DataValue::String(s) => {
                self.value = s;
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
