//! Generic Axum handlers and router builders.
//!
//! The handlers are thin: extract the path/form pieces, call the matching
//! controller action, let `ResourceError`/`FlashRedirect` turn themselves
//! into responses. `resource_router` / `nested_resource_router` wire the
//! conventional paths.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::errors::ResourceError;
use crate::models::RequestContext;
use crate::nested::NestedResourceController;
use crate::redirect::FlashRedirect;
use crate::resource::ResourceController;

/// Shared state for the generic handlers: the database plus the controller
/// serving this route group.
pub struct ScaffoldState<C> {
    pub db: DatabaseConnection,
    pub controller: Arc<C>,
}

impl<C> ScaffoldState<C> {
    #[must_use]
    pub fn new(db: DatabaseConnection, controller: C) -> Self {
        Self {
            db,
            controller: Arc::new(controller),
        }
    }
}

impl<C> Clone for ScaffoldState<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            controller: Arc::clone(&self.controller),
        }
    }
}

/// GET `/create`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn create_form<C>(
    State(state): State<ScaffoldState<C>>,
    ctx: RequestContext,
) -> Result<Response, ResourceError>
where
    C: ResourceController + 'static,
{
    state.controller.create(&ctx).await
}

/// POST `/`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn store<C>(
    State(state): State<ScaffoldState<C>>,
    ctx: RequestContext,
) -> Result<FlashRedirect, ResourceError>
where
    C: ResourceController + 'static,
{
    state.controller.store(&state.db, &ctx).await
}

/// GET `/{id}/edit`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn edit_form<C>(
    State(state): State<ScaffoldState<C>>,
    Path(id): Path<i64>,
    ctx: RequestContext,
) -> Result<Response, ResourceError>
where
    C: ResourceController + 'static,
{
    state.controller.edit(&state.db, id, &ctx).await
}

/// PUT/PATCH `/{id}`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn update<C>(
    State(state): State<ScaffoldState<C>>,
    Path(id): Path<i64>,
    ctx: RequestContext,
) -> Result<FlashRedirect, ResourceError>
where
    C: ResourceController + 'static,
{
    state.controller.update(&state.db, id, &ctx).await
}

/// DELETE `/{id}`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn destroy<C>(
    State(state): State<ScaffoldState<C>>,
    Path(id): Path<i64>,
    ctx: RequestContext,
) -> Result<FlashRedirect, ResourceError>
where
    C: ResourceController + 'static,
{
    state.controller.destroy(&state.db, id, &ctx).await
}

/// Router for a plain resource: `GET /create`, `POST /`, `GET /{id}/edit`,
/// `PUT|PATCH /{id}`, `DELETE /{id}`.
pub fn resource_router<C>(state: ScaffoldState<C>) -> Router
where
    C: ResourceController + 'static,
{
    Router::new()
        .route("/create", get(create_form::<C>))
        .route("/", post(store::<C>))
        .route("/{id}/edit", get(edit_form::<C>))
        .route(
            "/{id}",
            put(update::<C>).patch(update::<C>).delete(destroy::<C>),
        )
        .with_state(state)
}

/// GET `/{parent_id}/create`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn nested_create_form<C>(
    State(state): State<ScaffoldState<C>>,
    Path(parent_id): Path<i64>,
    ctx: RequestContext,
) -> Result<Response, ResourceError>
where
    C: NestedResourceController + 'static,
    C::Repo: Clone,
{
    state.controller.create(&state.db, parent_id, &ctx).await
}

/// POST `/{parent_id}`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn nested_store<C>(
    State(state): State<ScaffoldState<C>>,
    Path(parent_id): Path<i64>,
    ctx: RequestContext,
) -> Result<FlashRedirect, ResourceError>
where
    C: NestedResourceController + 'static,
    C::Repo: Clone,
{
    state.controller.store(&state.db, parent_id, &ctx).await
}

/// GET `/{parent_id}/{id}/edit`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn nested_edit_form<C>(
    State(state): State<ScaffoldState<C>>,
    Path((parent_id, id)): Path<(i64, i64)>,
    ctx: RequestContext,
) -> Result<Response, ResourceError>
where
    C: NestedResourceController + 'static,
    C::Repo: Clone,
{
    state.controller.edit(&state.db, parent_id, id, &ctx).await
}

/// PUT/PATCH `/{parent_id}/{id}`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn nested_update<C>(
    State(state): State<ScaffoldState<C>>,
    Path((parent_id, id)): Path<(i64, i64)>,
    ctx: RequestContext,
) -> Result<FlashRedirect, ResourceError>
where
    C: NestedResourceController + 'static,
    C::Repo: Clone,
{
    state
        .controller
        .update(&state.db, parent_id, id, &ctx)
        .await
}

/// DELETE `/{parent_id}/{id}`
///
/// # Errors
///
/// Whatever the controller action surfaces.
pub async fn nested_destroy<C>(
    State(state): State<ScaffoldState<C>>,
    Path((parent_id, id)): Path<(i64, i64)>,
    ctx: RequestContext,
) -> Result<FlashRedirect, ResourceError>
where
    C: NestedResourceController + 'static,
    C::Repo: Clone,
{
    state
        .controller
        .destroy(&state.db, parent_id, id, &ctx)
        .await
}

/// Router for a nested resource: the plain layout with the parent id in
/// front.
pub fn nested_resource_router<C>(state: ScaffoldState<C>) -> Router
where
    C: NestedResourceController + 'static,
    C::Repo: Clone,
{
    Router::new()
        .route("/{parent_id}/create", get(nested_create_form::<C>))
        .route("/{parent_id}", post(nested_store::<C>))
        .route("/{parent_id}/{id}/edit", get(nested_edit_form::<C>))
        .route(
            "/{parent_id}/{id}",
            put(nested_update::<C>)
                .patch(nested_update::<C>)
                .delete(nested_destroy::<C>),
        )
        .with_state(state)
}
