//! Repository-level behavior against an in-memory database.

use resource_controllers::errors::ResourceError;
use resource_controllers::models::FormData;
use resource_controllers::repository::{QueryOp, ResourceRepository};
use resource_controllers::validation::FieldRule;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, Select,
};
use serde_json::json;

mod common;
use common::category::{self, CategoryRepository};
use common::item::{self, ItemRepository};
use common::setup_test_db;

fn form(value: serde_json::Value) -> FormData {
    serde_json::from_value(value).expect("form data fixture")
}

#[tokio::test]
async fn test_create_persists_object() {
    let db = setup_test_db().await.expect("db");
    let repository = CategoryRepository;

    let object = repository
        .create(&db, &form(json!({"name": "Hardware"})))
        .await
        .expect("create");

    assert!(object.id > 0);
    assert_eq!(object.name, "Hardware");

    let rows = category::Entity::find().all(&db).await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Hardware");
}

#[tokio::test]
async fn test_create_with_invalid_data_persists_nothing() {
    let db = setup_test_db().await.expect("db");
    let repository = CategoryRepository;

    let err = repository
        .create(&db, &form(json!({})))
        .await
        .expect_err("missing name must fail validation");
    assert!(matches!(err, ResourceError::Validation { .. }));

    let rows = category::Entity::find().all(&db).await.expect("rows");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_update_changes_object() {
    let db = setup_test_db().await.expect("db");
    let repository = CategoryRepository;
    let object = repository
        .create(&db, &form(json!({"name": "Hardware"})))
        .await
        .expect("create");

    let updated = repository
        .update(&db, object.id, &form(json!({"name": "Software"})))
        .await
        .expect("update");
    assert_eq!(updated.id, object.id);
    assert_eq!(updated.name, "Software");
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() {
    let db = setup_test_db().await.expect("db");
    let repository = CategoryRepository;
    repository
        .create(&db, &form(json!({"name": "Hardware"})))
        .await
        .expect("create");

    let err = repository
        .update(&db, 999, &form(json!({"name": "Software"})))
        .await
        .expect_err("unknown id must fail");
    assert!(matches!(err, ResourceError::NotFound { .. }));

    // nothing was touched
    let rows = category::Entity::find().all(&db).await.expect("rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Hardware");
}

#[tokio::test]
async fn test_delete_removes_object() {
    let db = setup_test_db().await.expect("db");
    let repository = CategoryRepository;
    let object = repository
        .create(&db, &form(json!({"name": "Hardware"})))
        .await
        .expect("create");

    let removed = repository.delete(&db, object.id).await.expect("delete");
    assert_eq!(removed.id, object.id);

    let err = repository
        .find(&db, object.id)
        .await
        .expect_err("deleted object must be gone");
    assert!(matches!(err, ResourceError::NotFound { .. }));
}

#[tokio::test]
async fn test_absent_checkbox_defaults_to_unchecked() {
    let db = setup_test_db().await.expect("db");
    let repository = ItemRepository;

    let unchecked = repository
        .create(&db, &form(json!({"name": "Widget", "category_id": "1"})))
        .await
        .expect("create without checkbox");
    assert!(!unchecked.published);

    let checked = repository
        .create(
            &db,
            &form(json!({"name": "Gadget", "category_id": "1", "published": "1"})),
        )
        .await
        .expect("create with checkbox");
    assert!(checked.published);
}

#[tokio::test]
async fn test_checkbox_rejects_non_boolean_values() {
    let db = setup_test_db().await.expect("db");
    let repository = ItemRepository;

    let err = repository
        .create(
            &db,
            &form(json!({"name": "Widget", "category_id": "1", "published": "maybe"})),
        )
        .await
        .expect_err("non-boolean checkbox must fail");
    assert!(matches!(err, ResourceError::Validation { .. }));
}

#[tokio::test]
async fn test_lists_orders_by_name() {
    let db = setup_test_db().await.expect("db");
    let repository = CategoryRepository;
    for name in ["Zebra", "Apple", "Mango"] {
        repository
            .create(&db, &form(json!({"name": name})))
            .await
            .expect("create");
    }

    let lists = repository.lists(&db, None, None, None).await.expect("lists");
    let names: Vec<&str> = lists.iter().map(|(_, name)| name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "Mango", "Zebra"]);
}

#[tokio::test]
async fn test_lists_where_filters() {
    let db = setup_test_db().await.expect("db");
    let repository = ItemRepository;
    repository
        .create(&db, &form(json!({"name": "Widget", "category_id": "1"})))
        .await
        .expect("create");
    repository
        .create(&db, &form(json!({"name": "Gadget", "category_id": "2"})))
        .await
        .expect("create");

    let lists = repository
        .lists_where(&db, item::Column::CategoryId, 2i64.into(), None, None)
        .await
        .expect("lists_where");
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].1, "Gadget");
}

#[tokio::test]
async fn test_object_key_reads_primary_key() {
    let db = setup_test_db().await.expect("db");
    let repository = CategoryRepository;
    let object = repository
        .create(&db, &form(json!({"name": "Hardware"})))
        .await
        .expect("create");
    assert_eq!(repository.object_key(&object).expect("key"), object.id);
}

/// Repository whose lists queries only see published items.
#[derive(Clone, Debug, Default)]
struct PublishedItemRepository;

impl ResourceRepository for PublishedItemRepository {
    type EntityType = item::Entity;
    type ColumnType = item::Column;
    type ActiveModelType = item::ActiveModel;

    const KEY_COLUMN: item::Column = item::Column::Id;
    const NAME_COLUMN: item::Column = item::Column::Name;
    const RESOURCE_NAME_SINGULAR: &'static str = "item";
    const RESOURCE_NAME_PLURAL: &'static str = "items";

    fn validation_rules(&self, _is_new: bool, _data: &FormData) -> Vec<FieldRule> {
        vec![FieldRule::new("name").required()]
    }

    fn fill(
        &self,
        model: item::ActiveModel,
        _data: &FormData,
    ) -> Result<item::ActiveModel, ResourceError> {
        Ok(model)
    }

    fn extend_query(
        &self,
        op: QueryOp,
        query: Select<item::Entity>,
    ) -> Option<Select<item::Entity>> {
        match op {
            QueryOp::Lists => Some(query.filter(item::Column::Published.eq(true))),
            _ => None,
        }
    }
}

#[tokio::test]
async fn test_extend_query_override_wins_over_callback() {
    let db = setup_test_db().await.expect("db");
    for (name, published) in [("Widget", true), ("Gadget", false)] {
        item::ActiveModel {
            name: Set(name.to_string()),
            category_id: Set(1),
            published: Set(published),
            ..Default::default()
        }
        .insert(&db)
        .await
        .expect("seed");
    }

    let repository = PublishedItemRepository;

    // the callback would widen the listing back out, but the override wins
    let callback = |query: Select<item::Entity>| query;
    let lists = repository
        .lists(&db, None, None, Some(&callback))
        .await
        .expect("lists");
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].1, "Widget");

    // find is tagged with a different operation and stays unfiltered
    let unpublished = repository.find(&db, 2).await.expect("find");
    assert_eq!(unpublished.name, "Gadget");
}
