//! 内存存储后端
//!
//! - database.rs: 集合注册表
//! - collection.rs: 文档存储、唯一索引约束
//! - matcher.rs: 选择器求值与排序

mod collection;
mod database;
mod matcher;

pub use collection::MemoryCollection;
pub use database::MemoryDatabase;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Collection, Database, IndexDefinition};
    use crate::document;
    use crate::error::OdmErrorKind;
    use crate::types::{DataValue, ID_FIELD, QueryConditionGroup, QueryOptions, SortConfig};

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let db = MemoryDatabase::new();
        assert!(!db.collection_exists("posts").await.unwrap());
        let _handle = db.collection("posts");
        assert!(!db.collection_exists("posts").await.unwrap());

        db.create_collection("posts").await.unwrap();
        assert!(db.collection_exists("posts").await.unwrap());
        assert!(db.create_collection("posts").await.is_err());
        assert_eq!(db.list_collections().await.unwrap(), vec!["posts".to_string()]);
    }

    #[tokio::test]
    async fn test_insert_generates_ids_and_marks_existence() {
        let db = MemoryDatabase::new();
        let posts = db.collection("posts");
        let ids = posts
            .insert_many(vec![document! { "slug" => "a" }, document! { "slug" => "b" }])
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert!(ids.iter().all(|id| id.len() == 24));
        assert!(db.collection_exists("posts").await.unwrap());

        let found = posts.find(&QueryConditionGroup::by_id(ids[1].clone()), &QueryOptions::new()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get("slug"), Some(&DataValue::String("b".into())));
    }

    #[tokio::test]
    async fn test_unique_index_rejects_whole_batch() {
        let db = MemoryDatabase::new();
        let posts = db.memory_collection("posts");
        posts.create_index(&IndexDefinition::single("slug", true)).await.unwrap();
        posts.insert_many(vec![document! { "slug" => "a" }]).await.unwrap();

        let err = posts
            .insert_many(vec![document! { "slug" => "b" }, document! { "slug" => "a" }])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), OdmErrorKind::Storage);
        assert!(err.is_uniqueness());
        assert_eq!(posts.len(), 1);

        let err = posts
            .insert_many(vec![document! { "slug" => "c" }, document! { "slug" => "c" }])
            .await
            .unwrap_err();
        assert!(err.is_uniqueness());
        assert_eq!(posts.len(), 1);
    }

    #[tokio::test]
    async fn test_unique_index_ignores_empty_values() {
        let db = MemoryDatabase::new();
        let users = db.collection("users");
        users.create_index(&IndexDefinition::single("email", true)).await.unwrap();
        users
            .insert_many(vec![
                document! { "email" => DataValue::Null },
                document! { "email" => DataValue::Null },
                document! { "name" => "no email" },
                document! { "email" => "" },
                document! { "email" => "" },
                document! { "email" => DataValue::Array(vec![]) },
                document! { "email" => DataValue::Array(vec![]) },
            ])
            .await
            .unwrap();
        assert_eq!(users.count(&QueryConditionGroup::all()).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_update_respects_unique_index() {
        let db = MemoryDatabase::new();
        let posts = db.collection("posts");
        posts.create_index(&IndexDefinition::single("slug", true)).await.unwrap();
        let ids = posts
            .insert_many(vec![document! { "slug" => "a" }, document! { "slug" => "b" }])
            .await
            .unwrap();

        let selector = QueryConditionGroup::by_id(ids[1].clone());
        assert!(posts.update_one(&selector, &document! { "slug" => "a" }).await.unwrap_err().is_uniqueness());
        assert_eq!(posts.update_one(&selector, &document! { "slug" => "b" }).await.unwrap(), 1);
        assert_eq!(posts.update_one(&selector, &document! { "slug" => "z", ID_FIELD => "x" }).await.unwrap(), 1);

        let found = posts.find(&selector, &QueryOptions::new()).await.unwrap();
        assert_eq!(found[0].get("slug"), Some(&DataValue::String("z".into())));
        assert_eq!(
            posts.update_one(&QueryConditionGroup::by_id("000000000000000000000000"), &document! { "slug" => "q" }).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_create_index_over_duplicates_fails() {
        let db = MemoryDatabase::new();
        let posts = db.collection("posts");
        posts
            .insert_many(vec![document! { "slug" => "a" }, document! { "slug" => "a" }])
            .await
            .unwrap();
        assert!(posts.create_index(&IndexDefinition::single("slug", true)).await.is_err());
        posts.create_index(&IndexDefinition::single("slug", false)).await.unwrap();
        posts.create_index(&IndexDefinition::single("slug", false)).await.unwrap();
        assert_eq!(posts.list_indexes().await.unwrap().len(), 1);
        posts.drop_indexes().await.unwrap();
        assert!(posts.list_indexes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_sort_paginate_project() {
        let db = MemoryDatabase::new();
        let posts = db.collection("posts");
        let docs = (0..5).map(|i| document! { "n" => i, "title" => format!("t{}", i) }).collect();
        posts.insert_many(docs).await.unwrap();

        let options = QueryOptions::new()
            .with_sort(vec![SortConfig::desc("n")])
            .with_range(1, 2)
            .with_fields(vec!["n".to_string()]);
        let found = posts.find(&QueryConditionGroup::all(), &options).await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].get("n"), Some(&DataValue::Int(3)));
        assert_eq!(found[1].get("n"), Some(&DataValue::Int(2)));
        assert!(found[0].get("title").is_none());
        assert!(found[0].contains_key(ID_FIELD));
    }

    #[tokio::test]
    async fn test_zero_limit_means_unlimited() {
        let db = MemoryDatabase::new();
        let posts = db.collection("posts");
        let docs = (0..4).map(|i| document! { "n" => i }).collect();
        posts.insert_many(docs).await.unwrap();

        let options = QueryOptions::new().with_range(1, 0);
        let found = posts.find(&QueryConditionGroup::all(), &options).await.unwrap();
        assert_eq!(found.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_many_counts() {
        let db = MemoryDatabase::new();
        let posts = db.collection("posts");
        posts
            .insert_many(vec![document! { "k" => 1 }, document! { "k" => 2 }, document! { "k" => 1 }])
            .await
            .unwrap();
        assert_eq!(posts.delete_many(&QueryConditionGroup::equals("k", 1)).await.unwrap(), 2);
        assert_eq!(posts.delete_many(&QueryConditionGroup::equals("k", 1)).await.unwrap(), 0);
        assert_eq!(posts.count(&QueryConditionGroup::all()).await.unwrap(), 1);
    }
}
