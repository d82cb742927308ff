//! 自由 JSON 字段

use super::{Field, FieldKind, FieldOptions};
use crate::error::OdmResult;
use crate::types::DataValue;
use serde_json::Value;

/// 自由形式的 JSON 字段，任何值都被接受
#[derive(Debug, Clone)]
pub struct JsonField {
    name: String,
    value: Value,
    default: Value,
    options: FieldOptions,
}

impl JsonField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
            default: Value::Null,
            options: FieldOptions::default(),
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self.value = self.default.clone();
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Field for JsonField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Json
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn get(&self) -> DataValue {
        match &self.value {
            Value::Null => DataValue::Null,
            value => DataValue::Json(value.clone()),
        }
    }

    fn set(&mut self, value: DataValue) {
        match value {
            DataValue::Null => self.reset(),
            DataValue::Json(json) => self.value = json,
            other => self.value = other.to_json_value(),
        }
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }

    fn validate(&self) -> Result<(), String> {
        if self.value.is_null() && self.options.required {
            return Err(format!("{} cannot be empty", self.name));
        }
        Ok(())
    }

    fn deserialize(&mut self, raw: DataValue) -> OdmResult<()> {
        self.value = match raw {
            DataValue::Json(json) => json,
            other => other.to_json_value(),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldBuilder;
    use serde_json::json;

    #[test]
    fn test_accepts_anything() {
        let mut field = JsonField::new("content");
        field.set(DataValue::Int(3));
        assert_eq!(field.value(), &json!(3));
        field.set(DataValue::Json(json!({"blocks": []})));
        assert_eq!(field.value(), &json!({"blocks": []}));
        assert!(field.validate().is_ok());
    }

    #[test]
    fn test_required() {
        let field = JsonField::new("meta").required();
        assert_eq!(field.validate(), Err("meta cannot be empty".to_string()));
    }

    #[test]
    fn test_round_trip() {
        let mut field = JsonField::new("meta").with_default(json!({}));
        field.set(DataValue::Json(json!({"a": [1, 2]})));
        let mut other = JsonField::new("meta");
        other.deserialize(field.serialize()).unwrap();
        assert_eq!(other.value(), &json!({"a": [1, 2]}));

        let mut other = JsonField::new("meta").with_default(json!({"x": 1}));
        other.deserialize(JsonField::new("meta").serialize()).unwrap();
        assert_eq!(other.value(), &Value::Null);
    }
}
