//! The conventional resource actions.
//!
//! [`ResourceController`] adds the five create/store/edit/update/destroy
//! actions on top of [`FormController`], all as default methods delegating
//! to the repository. [`ScaffoldController`] is the hook-free concrete
//! implementation: simple resources use it directly, and the nested layer
//! holds one internally to reuse these actions.

use async_trait::async_trait;
use axum::response::Response;
use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::controller::{Collaborators, FormConfig, FormController};
use crate::errors::ResourceError;
use crate::models::RequestContext;
use crate::redirect::{FlashRedirect, RedirectTarget, StoreRedirect};
use crate::repository::{ModelOf, ResourceRepository};
use crate::view::ViewData;

#[async_trait]
pub trait ResourceController: FormController {
    /// Render the create form.
    ///
    /// # Errors
    ///
    /// Rendering/configuration errors from
    /// [`render_form`](FormController::render_form).
    async fn create(&self, ctx: &RequestContext) -> Result<Response, ResourceError> {
        self.create_navigation(Some(&self.config().create_title), None);
        self.render_form(ViewData::new(), None, ctx)
    }

    /// Persist a new object and redirect with the "created" flash.
    ///
    /// # Errors
    ///
    /// Validation, database or redirect-resolution errors.
    async fn store(
        &self,
        db: &DatabaseConnection,
        ctx: &RequestContext,
    ) -> Result<FlashRedirect, ResourceError> {
        let target = self.store_redirect_target();
        let redirects = self.redirects(ctx.back.as_deref());
        self.repository()
            .create_with_redirect(db, &ctx.data, &redirects, target.as_ref())
            .await
    }

    /// Render the edit form for an existing object.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] for an unknown id, otherwise rendering
    /// errors.
    async fn edit(
        &self,
        db: &DatabaseConnection,
        id: i64,
        ctx: &RequestContext,
    ) -> Result<Response, ResourceError> {
        let object = self.repository().find(db, id).await?;
        self.create_navigation(Some(&self.config().edit_title), Some(&object));
        self.render_form(ViewData::new(), Some(object), ctx)
    }

    /// Persist changes and redirect back with the "updated" flash.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] for an unknown id, else validation or
    /// database errors.
    async fn update(
        &self,
        db: &DatabaseConnection,
        id: i64,
        ctx: &RequestContext,
    ) -> Result<FlashRedirect, ResourceError> {
        let redirects = self.redirects(ctx.back.as_deref());
        self.repository()
            .update_with_redirect(db, id, &ctx.data, &redirects, None)
            .await
    }

    /// Remove the object and redirect back with the "deleted" flash.
    ///
    /// # Errors
    ///
    /// [`ResourceError::NotFound`] for an unknown id.
    async fn destroy(
        &self,
        db: &DatabaseConnection,
        id: i64,
        ctx: &RequestContext,
    ) -> Result<FlashRedirect, ResourceError> {
        let redirects = self.redirects(ctx.back.as_deref());
        self.repository()
            .delete_with_redirect(db, id, &redirects, None)
            .await
    }

    /// Resolve where `store` redirects, in precedence order: the edit action
    /// when redirect-to-edit-on-create is set; else the index action for the
    /// default configuration; else the configured override; else `None`,
    /// meaning redirect back.
    fn store_redirect_target(&self) -> Option<RedirectTarget> {
        let config = self.config();
        if config.redirect_to_edit_on_create {
            return Some(RedirectTarget::Action("edit".to_string()));
        }
        match &config.store_redirect {
            StoreRedirect::Index => Some(RedirectTarget::Action("index".to_string())),
            StoreRedirect::Action(action) => Some(RedirectTarget::Action(action.clone())),
            StoreRedirect::Url(url) => Some(RedirectTarget::Url(url.clone())),
            StoreRedirect::Back => None,
        }
    }
}

/// Concrete controller with no custom hooks.
///
/// Holds a repository, configuration and collaborators, nothing else. The
/// nested controller builds one around its own repository to reuse the
/// plain actions.
#[derive(Clone)]
pub struct ScaffoldController<R> {
    repository: R,
    config: FormConfig,
    collaborators: Collaborators,
}

impl<R> ScaffoldController<R>
where
    R: ResourceRepository,
{
    #[must_use]
    pub fn new(repository: R, config: FormConfig, collaborators: Collaborators) -> Self {
        Self {
            repository,
            config,
            collaborators,
        }
    }

    pub fn set_repository(&mut self, repository: R) {
        self.repository = repository;
    }

    pub fn config_mut(&mut self) -> &mut FormConfig {
        &mut self.config
    }
}

impl<R> FormController for ScaffoldController<R>
where
    R: ResourceRepository,
    ModelOf<R>: Serialize,
{
    type Repo = R;

    fn repository(&self) -> &R {
        &self.repository
    }

    fn config(&self) -> &FormConfig {
        &self.config
    }

    fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }
}

impl<R> ResourceController for ScaffoldController<R>
where
    R: ResourceRepository,
    ModelOf<R>: Serialize,
{
}
