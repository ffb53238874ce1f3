//! The persistence facade behind every resource controller.
//!
//! [`ResourceRepository`] wraps one Sea-ORM entity with the conventional
//! find/create/update/delete operations plus the redirect-carrying variants
//! the controllers delegate to. Implementations stay small: the required
//! hooks are [`validation_rules`](ResourceRepository::validation_rules) and
//! [`fill`](ResourceRepository::fill); everything else has a default.
//!
//! Query customization is explicit rather than name-based: each operation
//! passes a [`QueryOp`] tag through
//! [`new_query`](ResourceRepository::new_query), where an
//! [`extend_query`](ResourceRepository::extend_query) override wins over a
//! per-call callback, which wins over the plain query.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Select, Value,
};
use serde::Serialize;

use crate::errors::ResourceError;
use crate::models::{FormData, apply_checkbox_defaults};
use crate::redirect::{FlashRedirect, RedirectTarget, Redirects};
use crate::validation::{FieldRule, validate};

/// The entity model managed by a repository.
pub type ModelOf<R> = <<R as ResourceRepository>::EntityType as EntityTrait>::Model;

/// Logical operation tag handed to the query-extension hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOp {
    /// Single-object lookup (`find`)
    Find,
    /// Key/name listing (`lists`, `lists_where`)
    Lists,
    /// A caller-defined operation
    Custom(&'static str),
}

/// Per-call query customization.
pub type QueryCallback<E> = dyn Fn(Select<E>) -> Select<E> + Send + Sync;

#[async_trait]
pub trait ResourceRepository: Sized + Send + Sync
where
    <Self::EntityType as EntityTrait>::Model:
        IntoActiveModel<Self::ActiveModelType> + Serialize + Sync,
{
    type EntityType: EntityTrait<Column = Self::ColumnType> + Sync;
    type ColumnType: ColumnTrait + std::fmt::Debug;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + Send
        + Sync;

    /// Primary key column
    const KEY_COLUMN: Self::ColumnType;
    /// Display-name column, used by `lists` ordering and edit titles
    const NAME_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &str;
    const RESOURCE_NAME_PLURAL: &str;
    /// Flash-message key attached to success redirects
    const FLASH_KEY: &'static str = "success";

    /// Checkbox fields validated as `sometimes boolean` and defaulted to `0`
    /// when absent from a submission.
    fn checkbox_fields(&self) -> &[&str] {
        &[]
    }

    /// Validation rules applied to every create (`is_new`) and update.
    fn validation_rules(&self, is_new: bool, data: &FormData) -> Vec<FieldRule>;

    /// Copy validated form data onto the active model.
    ///
    /// # Errors
    ///
    /// Implementations return [`ResourceError`] when a value cannot be
    /// converted to the column type.
    fn fill(
        &self,
        model: Self::ActiveModelType,
        data: &FormData,
    ) -> Result<Self::ActiveModelType, ResourceError>;

    /// Per-operation query override; `None` leaves the query untouched.
    fn extend_query(
        &self,
        _op: QueryOp,
        _query: Select<Self::EntityType>,
    ) -> Option<Select<Self::EntityType>> {
        None
    }

    /// New query for the entity, customized for the given operation.
    ///
    /// Resolution order: an [`extend_query`](Self::extend_query) override if
    /// it returns `Some`, else the explicit `callback`, else the plain query.
    fn new_query(
        &self,
        op: QueryOp,
        callback: Option<&QueryCallback<Self::EntityType>>,
    ) -> Select<Self::EntityType> {
        let query = Self::EntityType::find();
        if let Some(extended) = self.extend_query(op, query.clone()) {
            return extended;
        }
        match callback {
            Some(callback) => callback(query),
            None => query,
        }
    }

    /// Look up an object by its key.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when no row matches.
    async fn find(&self, db: &DatabaseConnection, id: i64) -> Result<ModelOf<Self>, ResourceError> {
        self.new_query(QueryOp::Find, None)
            .filter(Self::KEY_COLUMN.eq(id))
            .one(db)
            .await
            .map_err(ResourceError::database)?
            .ok_or_else(|| {
                ResourceError::not_found(Self::RESOURCE_NAME_SINGULAR, Some(id.to_string()))
            })
    }

    /// `(key, name)` pairs ordered by name, for select boxes and the like.
    ///
    /// Column arguments default to [`KEY_COLUMN`](Self::KEY_COLUMN) and
    /// [`NAME_COLUMN`](Self::NAME_COLUMN).
    ///
    /// # Errors
    ///
    /// [`ResourceError::Database`] on query failure.
    async fn lists(
        &self,
        db: &DatabaseConnection,
        name_column: Option<Self::ColumnType>,
        key_column: Option<Self::ColumnType>,
        callback: Option<&QueryCallback<Self::EntityType>>,
    ) -> Result<Vec<(i64, String)>, ResourceError> {
        let name = name_column.unwrap_or(Self::NAME_COLUMN);
        let key = key_column.unwrap_or(Self::KEY_COLUMN);
        self.new_query(QueryOp::Lists, callback)
            .select_only()
            .column(key)
            .column(name)
            .order_by_asc(name)
            .into_tuple()
            .all(db)
            .await
            .map_err(ResourceError::database)
    }

    /// [`lists`](Self::lists) narrowed by an equality condition.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Database`] on query failure.
    async fn lists_where(
        &self,
        db: &DatabaseConnection,
        column: Self::ColumnType,
        value: Value,
        name_column: Option<Self::ColumnType>,
        key_column: Option<Self::ColumnType>,
    ) -> Result<Vec<(i64, String)>, ResourceError> {
        let filter = move |query: Select<Self::EntityType>| query.filter(column.eq(value.clone()));
        self.lists(db, name_column, key_column, Some(&filter)).await
    }

    /// Validate, fill and insert a new object.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Validation`] when the declared rules fail, before
    /// anything is persisted.
    async fn create(
        &self,
        db: &DatabaseConnection,
        data: &FormData,
    ) -> Result<ModelOf<Self>, ResourceError> {
        let model = <Self::ActiveModelType as ActiveModelBehavior>::new();
        self.save_with_data(db, model, true, data).await
    }

    /// Validate, fill and save an existing object.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when the id does not exist; the lookup
    /// runs before validation, so nothing is persisted on a miss.
    async fn update(
        &self,
        db: &DatabaseConnection,
        id: i64,
        data: &FormData,
    ) -> Result<ModelOf<Self>, ResourceError> {
        let existing = self.find(db, id).await?;
        self.save_with_data(db, existing.into_active_model(), false, data)
            .await
    }

    /// Load and remove an object, returning the removed model.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when the id does not exist.
    async fn delete(
        &self,
        db: &DatabaseConnection,
        id: i64,
    ) -> Result<ModelOf<Self>, ResourceError> {
        let object = self.find(db, id).await?;
        object
            .clone()
            .into_active_model()
            .delete(db)
            .await
            .map_err(ResourceError::database)?;
        Ok(object)
    }

    /// Shared save path: check the request data, fill, persist.
    ///
    /// # Errors
    ///
    /// Validation, fill or database errors, in that order.
    async fn save_with_data(
        &self,
        db: &DatabaseConnection,
        model: Self::ActiveModelType,
        is_new: bool,
        data: &FormData,
    ) -> Result<ModelOf<Self>, ResourceError> {
        let mut data = data.clone();
        let mut rules = self.validation_rules(is_new, &data);
        for field in self.checkbox_fields() {
            rules.push(FieldRule::new(*field).boolean());
        }
        validate(&data, &rules)?;
        apply_checkbox_defaults(&mut data, self.checkbox_fields());

        let filled = self.fill(model, &data)?;
        let saved = if is_new {
            filled.insert(db).await
        } else {
            filled.update(db).await
        };
        saved.map_err(ResourceError::from)
    }

    /// Primary key of a saved model, as used in redirect URLs.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Logic`] when the key column is not an integer type.
    fn object_key(&self, model: &ModelOf<Self>) -> Result<i64, ResourceError> {
        match model.get(Self::KEY_COLUMN) {
            Value::BigInt(Some(id)) => Ok(id),
            Value::Int(Some(id)) => Ok(i64::from(id)),
            Value::SmallInt(Some(id)) => Ok(i64::from(id)),
            Value::TinyInt(Some(id)) => Ok(i64::from(id)),
            other => Err(ResourceError::logic(format!(
                "{} key column is not an integer: {other:?}",
                Self::RESOURCE_NAME_SINGULAR
            ))),
        }
    }

    /// [`create`](Self::create) followed by a success redirect carrying the
    /// localized "created" message.
    ///
    /// # Errors
    ///
    /// Validation/database errors from the create, or target resolution
    /// failures from [`Redirects::with_success`].
    async fn create_with_redirect(
        &self,
        db: &DatabaseConnection,
        data: &FormData,
        redirects: &Redirects<'_>,
        target: Option<&RedirectTarget>,
    ) -> Result<FlashRedirect, ResourceError> {
        let object = self.create(db, data).await?;
        let key = self.object_key(&object)?;
        redirects.with_success("messages.created", Some(key), target)
    }

    /// [`update`](Self::update) followed by a success redirect.
    ///
    /// # Errors
    ///
    /// As [`create_with_redirect`](Self::create_with_redirect).
    async fn update_with_redirect(
        &self,
        db: &DatabaseConnection,
        id: i64,
        data: &FormData,
        redirects: &Redirects<'_>,
        target: Option<&RedirectTarget>,
    ) -> Result<FlashRedirect, ResourceError> {
        let object = self.update(db, id, data).await?;
        let key = self.object_key(&object)?;
        redirects.with_success("messages.updated", Some(key), target)
    }

    /// [`delete`](Self::delete) followed by a success redirect. There is no
    /// object left to key, so a keyed action target is a logic error here.
    ///
    /// # Errors
    ///
    /// As [`create_with_redirect`](Self::create_with_redirect).
    async fn delete_with_redirect(
        &self,
        db: &DatabaseConnection,
        id: i64,
        redirects: &Redirects<'_>,
        target: Option<&RedirectTarget>,
    ) -> Result<FlashRedirect, ResourceError> {
        self.delete(db, id).await?;
        redirects.with_success("messages.deleted", None, target)
    }
}
