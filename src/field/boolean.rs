//! 布尔字段

use super::{Field, FieldKind, FieldOptions, deserialize_mismatch, type_mismatch};
use crate::error::OdmResult;
use crate::types::DataValue;

/// 布尔字段，默认值为 `false`
///
/// 整数 0/1 会被当作布尔值接受，其他类型视为类型不匹配。
#[derive(Debug, Clone)]
pub struct BooleanField {
    name: String,
    value: bool,
    default: bool,
    options: FieldOptions,
    rejected: Option<DataValue>,
}

impl BooleanField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: false,
            default: false,
            options: FieldOptions::default(),
            rejected: None,
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self.value = default;
        self
    }

    pub fn value(&self) -> bool {
        self.value
    }

    fn coerce(raw: &DataValue) -> Option<bool> {
        match raw {
            DataValue::Bool(b) => Some(*b),
            DataValue::Int(0) => Some(false),
            DataValue::Int(1) => Some(true),
            DataValue::Json(serde_json::Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}

impl Field for BooleanField {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> FieldKind {
        FieldKind::Boolean
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }

    fn get(&self) -> DataValue {
        DataValue::Bool(self.value)
    }

    fn set(&mut self, value: DataValue) {
        if value.is_null() {
            self.reset();
            return;
        }
        match Self::coerce(&value) {
            Some(b) => {
                self.value = b;
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
        match self.rejected {
            Some(_) => Err(type_mismatch(&self.name, "a boolean")),
            None => Ok(()),
        }
    }

    fn deserialize(&mut self, raw: DataValue) -> OdmResult<()> {
        if raw.is_null() {
            self.reset();
            return Ok(());
        }
        match Self::coerce(&raw) {
            Some(b) => {
                self.value = b;
                self.rejected = None;
                Ok(())
            }
            None => Err(deserialize_mismatch(&self.name, self.kind(), &raw)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_false() {
        let field = BooleanField::new("public");
        assert!(!field.value());
        assert!(field.validate().is_ok());
    }

    #[test]
    fn test_accepts_int_flags() {
        let mut field = BooleanField::new("public");
        field.set(DataValue::Int(1));
        assert!(field.value());
        field.set(DataValue::Int(0));
        assert!(!field.value());
    }

    #[test]
    fn test_mismatch() {
        let mut field = BooleanField::new("public").with_default(true);
        field.set("yes".into());
        assert!(field.value());
        assert_eq!(field.validate(), Err("public must be a boolean".to_string()));
        field.set(DataValue::Null);
        assert!(field.validate().is_ok());
    }

    #[test]
    fn test_round_trip() {
        for value in [true, false] {
            let mut field = BooleanField::new("public");
            field.set(value.into());
            let mut other = BooleanField::new("public").with_default(!value);
            other.deserialize(field.serialize()).unwrap();
            assert_eq!(other.value(), value);
        }
    }
}
