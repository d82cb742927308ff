//! 用户模型

use crate::error::OdmResult;
use crate::field::{FieldBuilder, JsonField, TextField, bounded_text_field, timestamp_field};
use crate::model::Model;
use crate::schema::Schema;
use once_cell::sync::Lazy;
use regex::Regex;

/// 集合名
pub const COLLECTION: &str = "users";

/// 默认用户类型
pub const DEFAULT_USER_TYPE: &str = "regular";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("邮箱正则为常量")
});

/// 用户模式，`password` 为敏感字段，非详细输出时隐藏
pub fn schema() -> OdmResult<Schema> {
    let mut schema = Schema::new();
    schema.add(
        bounded_text_field("username", Some(3), Some(100))
            .required()
            .unique()
            .indexable(),
    )?;
    schema.add(
        TextField::new("email")
            .with_pattern(EMAIL_PATTERN.clone())
            .required()
            .unique(),
    )?;
    schema.add(TextField::new("password").required().sensitive())?;
    schema.add(TextField::new("type").with_default(DEFAULT_USER_TYPE))?;
    schema.add(timestamp_field("created_on"))?;
    schema.add(JsonField::new("meta"))?;
    Ok(schema)
}

/// 用户模型
pub fn model() -> OdmResult<Model> {
    Ok(Model::new(COLLECTION, schema()?))
}
