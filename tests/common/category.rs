use resource_controllers::errors::ResourceError;
use resource_controllers::models::FormData;
use resource_controllers::repository::ResourceRepository;
use resource_controllers::resource::ScaffoldController;
use resource_controllers::validation::FieldRule;
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Default)]
pub struct CategoryRepository;

impl ResourceRepository for CategoryRepository {
    type EntityType = Entity;
    type ColumnType = Column;
    type ActiveModelType = ActiveModel;

    const KEY_COLUMN: Column = Column::Id;
    const NAME_COLUMN: Column = Column::Name;
    const RESOURCE_NAME_SINGULAR: &'static str = "category";
    const RESOURCE_NAME_PLURAL: &'static str = "categories";

    fn validation_rules(&self, _is_new: bool, _data: &FormData) -> Vec<FieldRule> {
        vec![FieldRule::new("name").required().length(Some(1), Some(255))]
    }

    fn fill(&self, mut model: ActiveModel, data: &FormData) -> Result<ActiveModel, ResourceError> {
        if let Some(name) = data.str_value("name") {
            model.name = Set(name.to_string());
        }
        Ok(model)
    }
}

pub type CategoryController = ScaffoldController<CategoryRepository>;
