//! 内容模型集成测试

use rat_cms_odm::content::{self, categories, posts, users, volumes};
use rat_cms_odm::{
    DataValue, MemoryDatabase, ModelRegistry, QueryConditionGroup, QueryOptions, SortConfig,
    document, generate_object_id,
};

#[tokio::test]
async fn test_posts_reference_authors() {
    let db = MemoryDatabase::new();
    let registry = ModelRegistry::new();
    content::register_all(&registry).unwrap();
    registry.initialize_all(&db).await.unwrap();

    let users = registry.get(users::COLLECTION).unwrap();
    let author = users
        .create_instance(document! {
            "username" => "alice",
            "email" => "alice@example.com",
            "password" => "hunter2",
        })
        .await
        .unwrap();
    let author_id = author.id().unwrap().to_string();

    let clean = author.generate_clean_data(true);
    assert!(!clean.contains_key("password"));
    assert_eq!(clean.get("_id"), Some(&DataValue::String(author_id.clone())));

    let posts = registry.get(posts::COLLECTION).unwrap();
    for (i, slug) in ["second", "first", "third"].iter().enumerate() {
        posts
            .create_instance(document! {
                "author" => author_id.clone(),
                "name" => format!("Post {}", i),
                "slug" => *slug,
                "tags" => vec!["rust", "odm"],
            })
            .await
            .unwrap();
    }

    let found = posts
        .find_instances(
            QueryConditionGroup::equals("author", author_id.clone()),
            QueryOptions::new().with_sort(vec![SortConfig::asc("slug")]),
        )
        .await
        .unwrap();
    let slugs: Vec<DataValue> = found.iter().filter_map(|p| p.get("slug")).collect();
    assert_eq!(
        slugs,
        vec![DataValue::from("first"), DataValue::from("second"), DataValue::from("third")]
    );
    assert_eq!(
        found[0].get("tags"),
        Some(DataValue::Array(vec![DataValue::from("rust"), DataValue::from("odm")]))
    );
}

#[tokio::test]
async fn test_user_uniqueness_covers_username_and_email() {
    let db = MemoryDatabase::new();
    let users = users::model().unwrap();
    users.initialize(&db).await.unwrap();

    users
        .create_instance(document! {
            "username" => "bob",
            "email" => "bob@example.com",
            "password" => "pw",
        })
        .await
        .unwrap();

    let err = users
        .create_instance(document! {
            "username" => "bobby",
            "email" => "bob@example.com",
            "password" => "pw",
        })
        .await
        .unwrap_err();
    assert!(err.is_uniqueness());
    assert_eq!(err.to_string(), "'username, email' must be unique");
}

#[tokio::test]
async fn test_category_tree() {
    let db = MemoryDatabase::new();
    let categories = categories::model().unwrap();
    categories.initialize(&db).await.unwrap();

    let root = categories
        .create_instance(document! { "title" => "News", "slug" => "news" })
        .await
        .unwrap();
    let root_id = root.id().unwrap().to_string();
    categories
        .create_instance(document! { "title" => "Local", "slug" => "local", "parent" => root_id.clone() })
        .await
        .unwrap();

    let children = categories
        .find_instances(QueryConditionGroup::equals("parent", root_id), QueryOptions::new())
        .await
        .unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].get("slug"), Some(DataValue::from("local")));

    assert_eq!(
        categories.delete_instances(QueryConditionGroup::all()).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn test_volume_names_are_unique() {
    let db = MemoryDatabase::new();
    let volumes = volumes::model().unwrap();
    volumes.initialize(&db).await.unwrap();

    let owner = generate_object_id();
    volumes
        .create_instance(document! { "name" => "local", "user" => owner.clone(), "memory_used" => 0 })
        .await
        .unwrap();
    let err = volumes
        .create_instance(document! { "name" => "local", "user" => owner })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "'name' must be unique");
}
