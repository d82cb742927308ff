//! 文件模型

use crate::error::OdmResult;
use crate::field::{FieldBuilder, number_field, reference_field, text_field, timestamp_field};
use crate::model::Model;
use crate::schema::Schema;

/// 集合名
pub const COLLECTION: &str = "files";

/// 文件模式，`volume` 建立索引以便按存储卷列出文件
pub fn schema() -> OdmResult<Schema> {
    let mut schema = Schema::new();
    schema.add(text_field("name"))?;
    schema.add(reference_field("volume", super::volumes::COLLECTION).indexable())?;
    schema.add(text_field("url"))?;
    schema.add(text_field("mime_type"))?;
    schema.add(number_field("size", Some(0.0), None))?;
    schema.add(timestamp_field("created_on"))?;
    schema.add(reference_field("user", super::users::COLLECTION))?;
    Ok(schema)
}

/// 文件模型
pub fn model() -> OdmResult<Model> {
    Ok(Model::new(COLLECTION, schema()?))
}
