use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use resource_controllers::controller::{Collaborators, FormConfig};
use resource_controllers::i18n::StaticTranslator;
use resource_controllers::resource::ScaffoldController;
use resource_controllers::routes::{ScaffoldState, nested_resource_router, resource_router};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

pub mod category;
pub mod item;

use category::{CategoryController, CategoryRepository};
use item::ItemController;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn category_config() -> FormConfig {
    FormConfig::new(&StaticTranslator::new()).with_form_view("categories/form")
}

pub fn item_config() -> FormConfig {
    FormConfig::new(&StaticTranslator::new()).with_form_view("items/form")
}

pub fn category_controller() -> CategoryController {
    ScaffoldController::new(
        CategoryRepository,
        category_config(),
        Collaborators::defaults("/categories"),
    )
}

pub fn setup_category_app(db: DatabaseConnection) -> Router {
    let state = ScaffoldState::new(db, category_controller());
    Router::new().nest("/categories", resource_router(state))
}

pub fn setup_item_app(db: DatabaseConnection) -> Router {
    setup_item_app_with(db, item_config(), Collaborators::defaults("/items"))
}

pub fn setup_item_app_with(
    db: DatabaseConnection,
    config: FormConfig,
    collaborators: Collaborators,
) -> Router {
    let controller = ItemController::new(config, collaborators);
    let state = ScaffoldState::new(db, controller);
    Router::new().nest("/items", nested_resource_router(state))
}

pub fn form_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .header("referer", "/previous-page")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn response_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    serde_json::from_slice(&body).expect("response json")
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCategoryTable), Box::new(CreateItemTable)]
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Name,
    CategoryId,
    Published,
}

pub struct CreateCategoryTable;

impl MigrationName for CreateCategoryTable {
    fn name(&self) -> &'static str {
        "m20250101_000001_create_category_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCategoryTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Categories::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Categories::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Categories::Name).string().not_null())
            .to_owned();
        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

pub struct CreateItemTable;

impl MigrationName for CreateItemTable {
    fn name(&self) -> &'static str {
        "m20250101_000002_create_item_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateItemTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Items::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Items::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Items::Name).string().not_null())
            .col(ColumnDef::new(Items::CategoryId).big_integer().not_null())
            .col(ColumnDef::new(Items::Published).boolean().not_null())
            .to_owned();
        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}
