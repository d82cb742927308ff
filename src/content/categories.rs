//! 分类模型

use crate::error::OdmResult;
use crate::field::{ReferenceField, TextField, timestamp_field};
use crate::model::Model;
use crate::schema::Schema;

/// 集合名
pub const COLLECTION: &str = "categories";

/// 分类模式，`parent` 指向同一集合中的上级分类
pub fn schema() -> OdmResult<Schema> {
    let mut schema = Schema::new();
    schema.add(TextField::new("title"))?.required(true);
    schema.add(TextField::new("slug"))?.required(true).unique(true).indexable(true);
    schema.add(TextField::new("description"))?;
    schema.add(ReferenceField::new("parent").with_target(COLLECTION))?;
    schema.add(timestamp_field("created_on"))?;
    Ok(schema)
}

/// 分类模型
pub fn model() -> OdmResult<Model> {
    Ok(Model::new(COLLECTION, schema()?))
}
