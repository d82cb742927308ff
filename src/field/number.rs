//! 数值字段

use super::{Field, FieldKind, FieldOptions, deserialize_mismatch, type_mismatch};
use crate::error::OdmResult;
use crate::types::DataValue;

/// 数值字段
///
/// 值为 `Option<f64>`，未设置时序列化为 `Null`。整数会被接受；
/// 整数值序列化时保持为整数，便于存储层按整数比较。
#[derive(Debug, Clone)]
pub struct NumberField {
    name: String,
    value: Option<f64>,
    default: Option<f64>,
    options: FieldOptions,
    min: Option<f64>,
    max: Option<f64>,
    rejected: Option<DataValue>,
}

impl NumberField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            default: None,
            options: FieldOptions::default(),
            min: None,
            max: None,
            rejected: None,
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = Some(default);
        self.value = Some(default);
        self
    }

    /// 设置最小值（包含）
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// 设置最大值（包含）
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    fn coerce(raw: &DataValue) -> Option<f64> {
        match raw {
            DataValue::Int(i) => Some(*i as f64),
            DataValue::Float(f) if !f.is_nan() => Some(*f),
            DataValue::Json(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    fn format_bound(bound: f64) -> String {
        if bound.fract() == 0.0 && bound.abs() < i64::MAX as f64 {
            format!("{}", bound as i64)
        } else {
            format!("{}", bound)
        }
    }
}

impl Field for NumberField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Number
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn get(&self) -> DataValue {
        match self.value {
            Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => DataValue::Int(v as i64),
            Some(v) => DataValue::Float(v),
            None => DataValue::Null,
        }
    }

    fn set(&mut self, value: DataValue) {
        if value.is_null() {
            self.reset();
            return;
        }
        match Self::coerce(&value) {
            Some(n) => {
                self.value = Some(n);
                self.rejected = None;
            }
            None => self.rejected = Some(value),
        }
    }

    fn reset(&mut self) {
        self.value = self.default;
        self.rejected = None;
    }

    fn validate(&self) -> Result<(), String> {
        if self.rejected.is_some() {
            return Err(type_mismatch(&self.name, "a number"));
        }
        let Some(value) = self.value else {
            if self.options.required {
                return Err(format!("{} cannot be empty", self.name));
            }
            return Ok(());
        };
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("{} cannot be less than {}", self.name, Self::format_bound(min)));
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} cannot be greater than {}", self.name, Self::format_bound(max)));
            }
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
            Some(n) => {
                self.value = Some(n);
                self.rejected = None;
                Ok(())
            }
            None => Err(deserialize_mismatch(&self.name, self.kind(), &raw)),
        }
    }
}
