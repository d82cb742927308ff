//! 文章模型

use crate::error::OdmResult;
use crate::field::{
    FieldBuilder, boolean_field, bounded_text_field, json_field, reference_field, text_array_field,
    text_field, timestamp_field,
};
use crate::model::Model;
use crate::schema::Schema;

/// 集合名
pub const COLLECTION: &str = "posts";

/// 文章模式
pub fn schema() -> OdmResult<Schema> {
    let mut schema = Schema::new();
    schema.add(reference_field("author", super::users::COLLECTION).required())?;
    schema.add(text_field("name").required())?;
    schema.add(
        bounded_text_field("slug", None, Some(100))
            .required()
            .unique()
            .indexable(),
    )?;
    schema.add(boolean_field("public"))?;
    schema.add(json_field("content"))?;
    schema.add(text_field("brief"))?;
    schema.add(timestamp_field("created_on"))?;
    schema.add(timestamp_field("last_updated"))?;
    schema.add(text_array_field("categories"))?;
    schema.add(text_array_field("tags"))?;
    schema.add(text_field("featured_image"))?;
    Ok(schema)
}

/// 文章模型
pub fn model() -> OdmResult<Model> {
    Ok(Model::new(COLLECTION, schema()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_object_id;
    use crate::types::DataValue;

    #[test]
    fn test_post_defaults() {
        let model = model().unwrap();
        let post = model.new_instance();
        assert_eq!(post.get("public"), Some(DataValue::Bool(false)));
        assert!(matches!(post.get("created_on"), Some(DataValue::DateTime(_))));
        assert_eq!(post.get("tags"), Some(DataValue::Array(vec![])));
    }

    #[test]
    fn test_post_validation() {
        let model = model().unwrap();
        let mut post = model.new_instance();
        post.set("name", "Hello");
        post.set("slug", "hello");
        assert!(!post.schema_mut().validate());
        assert_eq!(post.schema().error(), Some("author cannot be empty"));

        post.set("author", "not-an-id");
        assert!(!post.schema_mut().validate());
        assert_eq!(post.schema().error(), Some("author must be a valid identifier"));

        post.set("author", generate_object_id());
        post.set("slug", "x".repeat(101));
        assert!(!post.schema_mut().validate());
        assert_eq!(post.schema().error(), Some("slug cannot be more than 100 characters"));

        post.set("slug", "hello");
        assert!(post.schema_mut().validate());
    }
}
