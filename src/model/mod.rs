//! 模型系统模块
//!
//! - core.rs: 模型结构、集合绑定与索引重建
//! - operations.rs: CRUD 与唯一性检查
//! - instance.rs: 模型实例
//! - registry.rs: 显式注入的模型注册表

pub mod core;
pub mod instance;
pub mod operations;
pub mod registry;

pub use self::core::Model;
pub use instance::ModelInstance;
pub use registry::ModelRegistry;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Database, MemoryDatabase};
    use crate::document;
    use crate::error::{OdmError, OdmErrorKind};
    use crate::field::{FieldBuilder, TextField};
    use crate::schema::Schema;
    use crate::types::{DataValue, QueryConditionGroup, QueryOptions};

    fn category_model() -> Model {
        let mut schema = Schema::new();
        schema.add(TextField::new("title").required()).unwrap();
        schema.add(TextField::new("slug").required().unique()).unwrap();
        schema.add(TextField::new("name").unique()).unwrap();
        schema.add(TextField::new("description").indexable()).unwrap();
        Model::new("categories", schema)
    }

    #[tokio::test]
    async fn test_index_definitions() {
        let model = category_model();
        let names: Vec<String> = model.index_definitions().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["slug_1", "name_1", "description_1"]);
    }

    #[tokio::test]
    async fn test_initialize_failure_leaves_model_uninitialized() {
        let db = MemoryDatabase::new();
        let posts = db.collection("categories");
        posts
            .insert_many(vec![document! { "slug" => "a" }, document! { "slug" => "a" }])
            .await
            .unwrap();

        let model = category_model();
        let err = model.initialize(&db).await.unwrap_err();
        assert!(err.is_uniqueness());
        assert!(!model.is_initialized());

        posts.delete_many(&QueryConditionGroup::equals("slug", "a")).await.unwrap();
        model.initialize(&db).await.unwrap();
        assert!(model.is_initialized());
    }

    #[tokio::test]
    async fn test_uniqueness_lists_present_fields() {
        let db = MemoryDatabase::new();
        let model = category_model();
        model.initialize(&db).await.unwrap();
        model
            .create_instance(document! { "title" => "A", "slug" => "a", "name" => "n" })
            .await
            .unwrap();

        let err = model
            .create_instance(document! { "title" => "B", "slug" => "b", "name" => "n" })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "'slug, name' must be unique");

        let err = model
            .create_instance(document! { "title" => "C", "slug" => "a" })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "'slug' must be unique");
    }

    #[tokio::test]
    async fn test_insert_batch_validates_before_write() {
        let db = MemoryDatabase::new();
        let model = category_model();
        model.initialize(&db).await.unwrap();

        let mut good = model.new_instance();
        good.set("title", "ok");
        good.set("slug", "ok");
        let bad = model.new_instance();
        let mut batch = [good, bad];
        let err = model.insert(&mut batch).await.unwrap_err();
        assert_eq!(err.kind(), OdmErrorKind::Validation);
        assert_eq!(err.to_string(), "title cannot be empty");
        assert_eq!(batch[1].schema().error(), Some("title cannot be empty"));
        assert!(batch[0].id().is_none());
        assert_eq!(model.count(QueryConditionGroup::all()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_backstop_maps_to_uniqueness() {
        let db = MemoryDatabase::new();
        let model = category_model();
        model.initialize(&db).await.unwrap();

        let mut first = model.new_instance();
        first.set("title", "x");
        first.set("slug", "dup");
        let mut second = model.new_instance();
        second.set("title", "y");
        second.set("slug", "dup");

        // 跳过应用层检查，直接走批量插入
        let mut batch = [first, second];
        let err = model.insert(&mut batch).await.unwrap_err();
        assert!(matches!(err, OdmError::UniquenessError { .. }));
        // 与应用层检查给出相同的消息，只列出有值的唯一字段
        assert_eq!(err.to_string(), "'slug' must be unique");
    }

    #[tokio::test]
    async fn test_empty_unique_array_does_not_collide() {
        let db = MemoryDatabase::new();
        let mut schema = Schema::new();
        schema.add(TextField::new("name").required()).unwrap();
        schema.add(crate::field::TextArrayField::new("aliases").unique()).unwrap();
        let model = Model::new("authors", schema);
        model.initialize(&db).await.unwrap();

        model.create_instance(document! { "name" => "a" }).await.unwrap();
        model.create_instance(document! { "name" => "b" }).await.unwrap();
        assert_eq!(model.count(QueryConditionGroup::all()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unique_flags_come_from_template() {
        let db = MemoryDatabase::new();
        let model = category_model();
        model.initialize(&db).await.unwrap();
        model
            .create_instance(document! { "title" => "A", "slug" => "a" })
            .await
            .unwrap();

        let mut instance = model.new_instance();
        instance.set("title", "B");
        instance.set("slug", "a");
        instance
            .schema_mut()
            .field_mut("slug")
            .unwrap()
            .options_mut()
            .unique(false);

        let err = model.check_uniqueness(&instance, None).await.unwrap_err();
        assert_eq!(err.to_string(), "'slug' must be unique");
    }

    #[tokio::test]
    async fn test_update_instance() {
        let db = MemoryDatabase::new();
        let model = category_model();
        model.initialize(&db).await.unwrap();
        let a = model
            .create_instance(document! { "title" => "A", "slug" => "a" })
            .await
            .unwrap();
        model
            .create_instance(document! { "title" => "B", "slug" => "b" })
            .await
            .unwrap();
        let id = a.id().unwrap().to_string();

        let updated = model
            .update_instance(&id, document! { "title" => "A2", "unknown" => 1 })
            .await
            .unwrap();
        assert_eq!(updated.get("title"), Some(DataValue::String("A2".into())));
        assert_eq!(updated.id(), Some(id.as_str()));

        // 保持自身的唯一值不算冲突
        model.update_instance(&id, document! { "slug" => "a" }).await.unwrap();

        let err = model.update_instance(&id, document! { "slug" => "b" }).await.unwrap_err();
        assert_eq!(err.to_string(), "'slug' must be unique");

        let err = model.update_instance(&id, document! { "title" => "" }).await.unwrap_err();
        assert_eq!(err.to_string(), "title cannot be empty");

        let stored = model.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.get("title"), Some(DataValue::String("A2".into())));
        assert_eq!(stored.get("slug"), Some(DataValue::String("a".into())));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let db = MemoryDatabase::new();
        let model = category_model();
        model.initialize(&db).await.unwrap();
        let err = model
            .update_instance("65a1b2c3d4e5f60718293a4b", document! { "title" => "x" })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), OdmErrorKind::NotFound);
        assert!(err.to_string().starts_with("could not find any categories matching the given selector"));
    }

    #[tokio::test]
    async fn test_find_with_options() {
        let db = MemoryDatabase::new();
        let model = category_model();
        model.initialize(&db).await.unwrap();
        for i in 0..4 {
            model
                .create_instance(document! { "title" => format!("t{}", i), "slug" => format!("s{}", i) })
                .await
                .unwrap();
        }
        let found = model
            .find_instances(
                QueryConditionGroup::all(),
                QueryOptions::new()
                    .with_sort(vec![crate::types::SortConfig::desc("slug")])
                    .with_range(1, 2),
            )
            .await
            .unwrap();
        let slugs: Vec<DataValue> = found.iter().filter_map(|i| i.get("slug")).collect();
        assert_eq!(slugs, vec![DataValue::from("s2"), DataValue::from("s1")]);
        assert!(found.iter().all(|i| i.id().is_some()));

        assert!(model.exists(QueryConditionGroup::equals("slug", "s3")).await.unwrap());
        assert!(model.find_one(QueryConditionGroup::equals("slug", "zz")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_registry() {
        let db = MemoryDatabase::new();
        let registry = ModelRegistry::new();
        registry.register(category_model()).unwrap();
        assert!(registry.register(category_model()).is_err());
        registry
            .register(Model::new("tags", Schema::new()))
            .unwrap();
        assert_eq!(registry.names(), vec!["categories".to_string(), "tags".to_string()]);

        registry.initialize_all(&db).await.unwrap();
        assert!(registry.get("categories").unwrap().is_initialized());
        assert!(db.collection_exists("tags").await.unwrap());
        assert!(registry.get("missing").is_none());
    }
}
