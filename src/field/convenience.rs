//! 字段便捷函数模块
//!
//! 提供创建各种字段类型的便捷函数，约束通过 [`super::FieldBuilder`] 链式追加

use super::{BooleanField, DateField, JsonField, NumberField, ReferenceField, TextArrayField, TextField};

/// 便捷函数：创建文本字段
pub fn text_field(name: &str) -> TextField {
    TextField::new(name)
}

/// 便捷函数：创建带长度约束的文本字段
pub fn bounded_text_field(name: &str, min_length: Option<usize>, max_length: Option<usize>) -> TextField {
    let mut field = TextField::new(name);
    if let Some(min) = min_length {
        super::Field::options_mut(&mut field).min_length(min);
    }
    if let Some(max) = max_length {
        super::Field::options_mut(&mut field).max_length(max);
    }
    field
}

/// 便捷函数：创建文本数组字段
pub fn text_array_field(name: &str) -> TextArrayField {
    TextArrayField::new(name)
}

/// 便捷函数：创建布尔字段
pub fn boolean_field(name: &str) -> BooleanField {
    BooleanField::new(name)
}

/// 便捷函数：创建数值字段
pub fn number_field(name: &str, min: Option<f64>, max: Option<f64>) -> NumberField {
    let mut field = NumberField::new(name);
    if let Some(min) = min {
        field = field.min(min);
    }
    if let Some(max) = max {
        field = field.max(max);
    }
    field
}

/// 便捷函数：创建日期字段
pub fn date_field(name: &str) -> DateField {
    DateField::new(name)
}

/// 便捷函数：创建默认为当前时间的日期字段
pub fn timestamp_field(name: &str) -> DateField {
    DateField::new(name).default_now()
}

/// 便捷函数：创建引用字段
pub fn reference_field(name: &str, target_collection: &str) -> ReferenceField {
    ReferenceField::new(name).with_target(target_collection)
}

/// 便捷函数：创建JSON字段
pub fn json_field(name: &str) -> JsonField {
    JsonField::new(name)
}
