//! 存储卷模型

use crate::error::OdmResult;
use crate::field::{FieldBuilder, number_field, reference_field, text_array_field, text_field};
use crate::model::Model;
use crate::schema::Schema;

/// 集合名
pub const COLLECTION: &str = "volumes";

pub fn schema() -> OdmResult<Schema> {
    let mut schema = Schema::new();
    schema.add(text_field("name").required().unique())?;
    schema.add(text_field("type"))?;
    schema.add(number_field("memory_used", Some(0.0), None))?;
    schema.add(number_field("memory_allocated", Some(0.0), None))?;
    schema.add(text_array_field("read_privileges"))?;
    schema.add(text_array_field("write_privileges"))?;
    schema.add(reference_field("user", super::users::COLLECTION))?;
    schema.add(text_field("identifier"))?;
    Ok(schema)
}

/// 存储卷模型
pub fn model() -> OdmResult<Model> {
    Ok(Model::new(COLLECTION, schema()?))
}
