//! 日期字段

use super::{Field, FieldKind, FieldOptions, deserialize_mismatch, type_mismatch};
use crate::error::OdmResult;
use crate::types::DataValue;
use chrono::{DateTime, TimeZone, Utc};

/// 默认值策略
#[derive(Debug, Clone, Copy, PartialEq)]
enum DateDefault {
    None,
    Fixed(DateTime<Utc>),
    Now,
}

/// 日期字段
///
/// 接受 `DateTime` 值、RFC3339 字符串和毫秒时间戳。
/// `default_now()` 让模板每次克隆时都重新取当前时间。
#[derive(Debug, Clone)]
pub struct DateField {
    name: String,
    value: Option<DateTime<Utc>>,
    default: DateDefault,
    options: FieldOptions,
    rejected: Option<DataValue>,
}

impl DateField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            default: DateDefault::None,
            options: FieldOptions::default(),
            rejected: None,
        }
    }

    /// 固定默认值
    pub fn with_default(mut self, default: DateTime<Utc>) -> Self {
        self.default = DateDefault::Fixed(default);
        self.value = Some(default);
        self
    }

    /// 默认取当前时间，并在克隆时重新求值
    pub fn default_now(mut self) -> Self {
        self.default = DateDefault::Now;
        self.value = Some(Utc::now());
        self.options.reset_on_clone = true;
        self
    }

    pub fn value(&self) -> Option<DateTime<Utc>> {
        self.value
    }

    fn coerce(raw: &DataValue) -> Option<DateTime<Utc>> {
        match raw {
            DataValue::DateTime(dt) => Some(*dt),
            DataValue::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            DataValue::Int(millis) => Utc.timestamp_millis_opt(*millis).single(),
            DataValue::Json(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }
}

impl Field for DateField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Date
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn get(&self) -> DataValue {
        self.value.map(DataValue::DateTime).unwrap_or(DataValue::Null)
    }

    fn set(&mut self, value: DataValue) {
        if value.is_null() {
            self.reset();
            return;
        }
        match Self::coerce(&value) {
            Some(dt) => {
                self.value = Some(dt);
                self.rejected = None;
            }
            None => self.rejected = Some(value),
        }
    }

    fn reset(&mut self) {
        self.value = match self.default {
            DateDefault::None => None,
            DateDefault::Fixed(dt) => Some(dt),
            DateDefault::Now => Some(Utc::now()),
        };
        self.rejected = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.rejected.is_some() {
            return Err(type_mismatch(&self.name, "a valid date"));
        }
        if self.value.is_none() && self.options.required {
            return Err(format!("{} cannot be empty", self.name));
        }
        Ok(())
    }

    fn deserialize(&mut self, raw: DataValue) -> OdmResult<()> {
        if raw.is_null() {
            self.value = None;
            self.rejected = None;
            return Ok(());
        }
        match Self::coerce(&raw) {
            Some(dt) => {
                self.value = Some(dt);
                self.rejected = None;
                Ok(())
            }
            None => Err(deserialize_mismatch(&self.name, self.kind(), &raw)),
        }
    }
}
