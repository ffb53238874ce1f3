//! Parent/child ("nested") resource controllers.
//!
//! Routes carry the parent id in front of the usual resource parameters
//! (`/{parent_id}/...`), and the child object references its parent through
//! a `<parent index>_id` field. The controller enforces that reference on
//! every write: a submission whose parent field disagrees with the route
//! fails with a logic error before anything touches the database.
//!
//! The plain action bodies are reused through an internal
//! [`ScaffoldController`] sharing this controller's repository; the parent
//! object itself is resolved through a parent controller built by the
//! [`parent_controller`](NestedResourceController::parent_controller)
//! factory, which also gets its navigation invoked.

use async_trait::async_trait;
use axum::response::Response;
use sea_orm::{DatabaseConnection, IdenStatic};
use serde::Serialize;
use serde_json::Value;

use crate::controller::FormController;
use crate::errors::ResourceError;
use crate::models::{FormData, RequestContext};
use crate::redirect::{FlashRedirect, StoreRedirect};
use crate::repository::{ModelOf, ResourceRepository};
use crate::resource::{ResourceController, ScaffoldController};
use crate::view::ViewData;

/// The parent controller's entity model.
pub type ParentModelOf<C> =
    ModelOf<<<C as NestedResourceController>::ParentController as FormController>::Repo>;

#[async_trait]
pub trait NestedResourceController: FormController + Sized
where
    Self::Repo: Clone,
    ModelOf<Self::Repo>: Serialize,
    ParentModelOf<Self>: Serialize,
{
    /// Controller for the parent resource; built per request through
    /// [`parent_controller`](Self::parent_controller).
    type ParentController: ResourceController;

    fn parent_controller(&self) -> Self::ParentController;

    /// Key the parent object is exposed under in the view data. The child's
    /// parent-reference field is this name with `_id` appended.
    fn parent_index(&self) -> &str {
        "parent"
    }

    fn parent_key_field(&self) -> String {
        format!("{}_id", self.parent_index())
    }

    /// Plain resource controller sharing this controller's repository, used
    /// to reuse the store/update/destroy bodies.
    fn resource_actions(&self) -> ScaffoldController<Self::Repo> {
        ScaffoldController::new(
            self.repository().clone(),
            self.config().clone(),
            self.collaborators().clone(),
        )
    }

    /// Render the create form under the given parent.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] for an unknown parent, otherwise
    /// rendering errors.
    async fn create(
        &self,
        db: &DatabaseConnection,
        parent_id: i64,
        ctx: &RequestContext,
    ) -> Result<Response, ResourceError> {
        let parent = self
            .resolve_parent(db, parent_id, Some(self.config().create_title.clone()))
            .await?;
        self.render_nested_form(&parent, None, ctx)
    }

    /// Persist a new child after verifying its parent reference.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Logic`] when the submitted parent field does not
    /// equal the route's parent id; nothing is persisted in that case.
    async fn store(
        &self,
        db: &DatabaseConnection,
        parent_id: i64,
        ctx: &RequestContext,
    ) -> Result<FlashRedirect, ResourceError> {
        self.check_parent_reference(&ctx.data, parent_id)?;

        // A nested resource has no index action of its own: store redirects
        // back unless the edit form was asked for.
        let mut inner = self.resource_actions();
        inner.config_mut().store_redirect = StoreRedirect::Back;
        inner.store(db, ctx).await
    }

    /// Render the edit form for a child of the given parent.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] for unknown ids, [`ResourceError::Logic`]
    /// when the child belongs to a different parent.
    async fn edit(
        &self,
        db: &DatabaseConnection,
        parent_id: i64,
        id: i64,
        ctx: &RequestContext,
    ) -> Result<Response, ResourceError> {
        let object = self.repository().find(db, id).await?;
        if let Some(existing) = self.object_parent_key(&object)? {
            self.ensure_same_parent(parent_id, Some(existing))?;
        }

        let title = self.edit_title_for(&object)?;
        let parent = self.resolve_parent(db, parent_id, Some(title)).await?;
        self.render_nested_form(&parent, Some(object), ctx)
    }

    /// Persist changes to a child after verifying its parent reference.
    ///
    /// # Errors
    ///
    /// As [`store`](Self::store), plus [`ResourceError::NotFound`] for an
    /// unknown child id.
    async fn update(
        &self,
        db: &DatabaseConnection,
        parent_id: i64,
        id: i64,
        ctx: &RequestContext,
    ) -> Result<FlashRedirect, ResourceError> {
        self.check_parent_reference(&ctx.data, parent_id)?;
        self.resource_actions().update(db, id, ctx).await
    }

    /// Remove a child.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] for an unknown child id.
    async fn destroy(
        &self,
        db: &DatabaseConnection,
        _parent_id: i64,
        id: i64,
        ctx: &RequestContext,
    ) -> Result<FlashRedirect, ResourceError> {
        self.resource_actions().destroy(db, id, ctx).await
    }

    /// Prepare data shared by both nested forms. Default no-op.
    fn prepare_nested_form_data(
        &self,
        _data: &mut ViewData,
        _object: Option<&ModelOf<Self::Repo>>,
        _parent: &ParentModelOf<Self>,
        _ctx: &RequestContext,
    ) {
    }

    /// Prepare data for the nested create form. Default no-op.
    fn prepare_nested_create_form_data(
        &self,
        _data: &mut ViewData,
        _parent: &ParentModelOf<Self>,
        _ctx: &RequestContext,
    ) {
    }

    /// Prepare data for the nested edit form. Default no-op.
    fn prepare_nested_edit_form_data(
        &self,
        _data: &mut ViewData,
        _object: &ModelOf<Self::Repo>,
        _parent: &ParentModelOf<Self>,
        _ctx: &RequestContext,
    ) {
    }

    /// Load the parent object and run both navigations: the parent
    /// controller's (showing the parent) and this controller's (with the
    /// given title).
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] when the parent does not exist.
    async fn resolve_parent(
        &self,
        db: &DatabaseConnection,
        parent_id: i64,
        title: Option<String>,
    ) -> Result<ParentModelOf<Self>, ResourceError> {
        let parent_controller = self.parent_controller();
        let parent = parent_controller.repository().find(db, parent_id).await?;
        parent_controller.create_navigation(None, Some(&parent));
        self.create_navigation(title.as_deref(), None);
        Ok(parent)
    }

    /// Assemble the nested form view: the parent object goes into the data
    /// under [`parent_index`](Self::parent_index) before the plain form
    /// assembly runs.
    ///
    /// # Errors
    ///
    /// Rendering/configuration errors from
    /// [`render_form`](FormController::render_form).
    fn render_nested_form(
        &self,
        parent: &ParentModelOf<Self>,
        object: Option<ModelOf<Self::Repo>>,
        ctx: &RequestContext,
    ) -> Result<Response, ResourceError> {
        let parent_value = serde_json::to_value(parent).map_err(|err| {
            ResourceError::render(
                "failed to serialize the parent object for the form view",
                Some(err.to_string()),
            )
        })?;

        let mut data = ViewData::new();
        data.insert(self.parent_index().to_string(), parent_value);
        self.prepare_nested_form_data(&mut data, object.as_ref(), parent, ctx);
        if let Some(object) = &object {
            self.prepare_nested_edit_form_data(&mut data, object, parent, ctx);
        } else {
            self.prepare_nested_create_form_data(&mut data, parent, ctx);
        }
        self.render_form(data, object, ctx)
    }

    /// The child's parent reference, read through the `<parent index>_id`
    /// naming convention. `None` when the model carries no such field.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Render`] when the model cannot be serialized.
    fn object_parent_key(
        &self,
        object: &ModelOf<Self::Repo>,
    ) -> Result<Option<i64>, ResourceError> {
        let value = serde_json::to_value(object).map_err(|err| {
            ResourceError::render(
                "failed to read the object's parent reference",
                Some(err.to_string()),
            )
        })?;
        Ok(value.get(self.parent_key_field()).and_then(Value::as_i64))
    }

    /// Verify the submitted parent field against the route's parent id.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Logic`] on mismatch or when the field is missing.
    fn check_parent_reference(
        &self,
        data: &FormData,
        parent_id: i64,
    ) -> Result<(), ResourceError> {
        self.ensure_same_parent(parent_id, data.i64_value(&self.parent_key_field()))
    }

    /// # Errors
    ///
    /// [`ResourceError::Logic`] unless `other` equals the route parent id.
    fn ensure_same_parent(
        &self,
        parent_id: i64,
        other: Option<i64>,
    ) -> Result<(), ResourceError> {
        if other == Some(parent_id) {
            Ok(())
        } else {
            Err(ResourceError::logic(format!(
                "parent id mismatch: route has {parent_id}, request has {other:?}"
            )))
        }
    }

    /// Edit title carrying the object's display name.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Render`] when the model cannot be serialized.
    fn edit_title_for(&self, object: &ModelOf<Self::Repo>) -> Result<String, ResourceError> {
        let value = serde_json::to_value(object).map_err(|err| {
            ResourceError::render(
                "failed to read the object's display name",
                Some(err.to_string()),
            )
        })?;
        let name = value
            .get(<Self::Repo as ResourceRepository>::NAME_COLUMN.as_str())
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(format!("{} {name}", self.config().edit_title)
            .trim_end()
            .to_string())
    }
}
