//! The form layer shared by plain and nested resource controllers.
//!
//! A controller is transient, per-request state: one repository, one
//! [`FormConfig`], and the injected [`Collaborators`]. [`FormController`]
//! provides the form-view assembly with overridable preparation hooks; the
//! action sets live in [`resource`](crate::resource) and
//! [`nested`](crate::nested).

use axum::response::Response;
use serde::Serialize;
use std::sync::Arc;

use crate::errors::ResourceError;
use crate::i18n::{StaticTranslator, Translator};
use crate::models::RequestContext;
use crate::redirect::{ActionRouter, PathActionRouter, Redirects, StoreRedirect};
use crate::repository::{ModelOf, ResourceRepository};
use crate::view::{JsonViewRenderer, ViewData, ViewRenderer};

/// The framework services a controller talks to, injected at construction
/// so tests and hosts can substitute each one.
#[derive(Clone)]
pub struct Collaborators {
    pub views: Arc<dyn ViewRenderer>,
    pub translator: Arc<dyn Translator>,
    pub actions: Arc<dyn ActionRouter>,
}

impl Collaborators {
    #[must_use]
    pub fn new(
        views: Arc<dyn ViewRenderer>,
        translator: Arc<dyn Translator>,
        actions: Arc<dyn ActionRouter>,
    ) -> Self {
        Self {
            views,
            translator,
            actions,
        }
    }

    /// In-crate defaults: JSON view rendering, English messages, and
    /// conventional paths under `base`.
    #[must_use]
    pub fn defaults(base: impl Into<String>) -> Self {
        Self {
            views: Arc::new(JsonViewRenderer),
            translator: Arc::new(StaticTranslator::new()),
            actions: Arc::new(PathActionRouter::new(base)),
        }
    }
}

/// Per-controller configuration.
///
/// Titles default to the translator's `titles.create` / `titles.edit`;
/// `form_view` has no default on purpose, rendering without one is a logic
/// error surfaced during development.
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub form_view: Option<String>,
    /// Key the edited object is exposed under in the view data
    pub object_index: String,
    pub create_title: String,
    pub edit_title: String,
    /// Send the store redirect to the new object's edit form
    pub redirect_to_edit_on_create: bool,
    pub store_redirect: StoreRedirect,
}

impl FormConfig {
    #[must_use]
    pub fn new(translator: &dyn Translator) -> Self {
        Self {
            form_view: None,
            object_index: "object".to_string(),
            create_title: translator.translate("titles.create"),
            edit_title: translator.translate("titles.edit"),
            redirect_to_edit_on_create: false,
            store_redirect: StoreRedirect::Index,
        }
    }

    #[must_use]
    pub fn with_form_view(mut self, view: impl Into<String>) -> Self {
        self.form_view = Some(view.into());
        self
    }

    #[must_use]
    pub fn with_object_index(mut self, index: impl Into<String>) -> Self {
        self.object_index = index.into();
        self
    }

    #[must_use]
    pub fn with_create_title(mut self, title: impl Into<String>) -> Self {
        self.create_title = title.into();
        self
    }

    #[must_use]
    pub fn with_edit_title(mut self, title: impl Into<String>) -> Self {
        self.edit_title = title.into();
        self
    }

    #[must_use]
    pub fn redirect_to_edit_on_create(mut self, redirect: bool) -> Self {
        self.redirect_to_edit_on_create = redirect;
        self
    }

    #[must_use]
    pub fn with_store_redirect(mut self, store_redirect: StoreRedirect) -> Self {
        self.store_redirect = store_redirect;
        self
    }
}

pub trait FormController: Send + Sync
where
    ModelOf<Self::Repo>: Serialize,
{
    type Repo: ResourceRepository;

    fn repository(&self) -> &Self::Repo;
    fn config(&self) -> &FormConfig;
    fn collaborators(&self) -> &Collaborators;

    /// Prepare data shared by the create and edit forms. Default no-op.
    fn prepare_form_data(
        &self,
        _data: &mut ViewData,
        _object: Option<&ModelOf<Self::Repo>>,
        _ctx: &RequestContext,
    ) {
    }

    /// Prepare data for the create form only. Default no-op.
    fn prepare_create_form_data(&self, _data: &mut ViewData, _ctx: &RequestContext) {}

    /// Prepare data for the edit form only. Default no-op.
    fn prepare_edit_form_data(
        &self,
        _data: &mut ViewData,
        _object: &ModelOf<Self::Repo>,
        _ctx: &RequestContext,
    ) {
    }

    /// Navigation hook invoked before a form renders and, for nested
    /// resources, for the parent object. Default no-op; hosts with a
    /// breadcrumb/navigation facility override it.
    fn create_navigation(&self, _title: Option<&str>, _object: Option<&ModelOf<Self::Repo>>) {}

    /// Assemble the form view: run the preparation hooks, expose the edited
    /// object under [`FormConfig::object_index`], and delegate to the view
    /// renderer.
    ///
    /// # Errors
    ///
    /// [`ResourceError::Logic`] when no form view was configured,
    /// [`ResourceError::Render`] when the object cannot be serialized or the
    /// renderer fails.
    fn render_form(
        &self,
        mut data: ViewData,
        object: Option<ModelOf<Self::Repo>>,
        ctx: &RequestContext,
    ) -> Result<Response, ResourceError> {
        let config = self.config();
        let Some(view) = config.form_view.as_deref() else {
            return Err(ResourceError::logic(
                "form view is not set, configure it with FormConfig::with_form_view",
            ));
        };

        self.prepare_form_data(&mut data, object.as_ref(), ctx);

        if let Some(object) = object {
            let value = serde_json::to_value(&object).map_err(|err| {
                ResourceError::render(
                    "failed to serialize the object for the form view",
                    Some(err.to_string()),
                )
            })?;
            data.insert(config.object_index.clone(), value);
            self.prepare_edit_form_data(&mut data, &object, ctx);
        } else {
            self.prepare_create_form_data(&mut data, ctx);
        }

        self.collaborators().views.render(view, &data)
    }

    /// Redirect builder for the current request.
    fn redirects<'a>(&'a self, back: Option<&'a str>) -> Redirects<'a> {
        let collaborators = self.collaborators();
        Redirects {
            translator: collaborators.translator.as_ref(),
            actions: collaborators.actions.as_ref(),
            flash_key: <Self::Repo as ResourceRepository>::FLASH_KEY,
            back,
        }
    }
}
