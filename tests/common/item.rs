use resource_controllers::controller::{Collaborators, FormConfig, FormController};
use resource_controllers::errors::ResourceError;
use resource_controllers::models::FormData;
use resource_controllers::nested::NestedResourceController;
use resource_controllers::repository::ResourceRepository;
use resource_controllers::resource::ScaffoldController;
use resource_controllers::validation::FieldRule;
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

use super::category::CategoryRepository;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub published: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default)]
pub struct ItemRepository;

impl ResourceRepository for ItemRepository {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;

    const KEY_COLUMN: Column = Column::Id;
    const NAME_COLUMN: Column = Column::Name;
    const RESOURCE_NAME_SINGULAR: &'static str = "item";
    const RESOURCE_NAME_PLURAL: &'static str = "items";

    fn checkbox_fields(&self) -> &[&str] {
        &["published"]
    }

    fn validation_rules(&self, _is_new: bool, _data: &FormData) -> Vec<FieldRule> {
        vec![
            FieldRule::new("name").required().length(Some(1), Some(255)),
            FieldRule::new("category_id").required().integer(),
        ]
    }

    fn fill(&self, mut model: ActiveModel, data: &FormData) -> Result<ActiveModel, ResourceError> {
        if let Some(name) = data.str_value("name") {
            model.name = Set(name.to_string());
        }
        if let Some(category_id) = data.i64_value("category_id") {
            model.category_id = Set(category_id);
        }
        if let Some(published) = data.i64_value("published") {
            model.published = Set(published != 0);
        }
        Ok(model)
    }
}

/// Nested controller for items under a category.
#[derive(Clone)]
pub struct ItemController {
    repository: ItemRepository,
    config: FormConfig,
    collaborators: Collaborators,
}

impl ItemController {
    pub fn new(config: FormConfig, collaborators: Collaborators) -> Self {
        Self {
            repository: ItemRepository,
            config,
            collaborators,
        }
    }
}

impl FormController for ItemController {
    type Repo = ItemRepository;

    fn repository(&self) -> &ItemRepository {
        &self.repository
    }

    fn config(&self) -> &FormConfig {
        &self.config
    }

    fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }
}

impl NestedResourceController for ItemController {
    type ParentController = ScaffoldController<CategoryRepository>;

    fn parent_controller(&self) -> Self::ParentController {
        ScaffoldController::new(
            CategoryRepository,
            FormConfig::new(self.collaborators.translator.as_ref())
                .with_form_view("categories/form"),
            Collaborators::defaults("/categories"),
        )
    }

    fn parent_index(&self) -> &str {
        "category"
    }
}
