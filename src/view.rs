//! View rendering.
//!
//! Controllers hand a view identifier and a data map to the [`ViewRenderer`]
//! collaborator; what "rendering" means (a template engine, a JSON payload
//! for a frontend) is the host's choice.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::errors::ResourceError;

/// Data passed to the view, keyed by the names the template expects.
pub type ViewData = serde_json::Map<String, serde_json::Value>;

/// Produces a response from a view identifier and its data.
pub trait ViewRenderer: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ResourceError::Render`] when the view cannot be produced.
    fn render(&self, view: &str, data: &ViewData) -> Result<Response, ResourceError>;
}

/// Renderer that emits the view id and data as a JSON document.
///
/// Suitable for JSON-driven frontends and for tests; template-engine hosts
/// supply their own implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonViewRenderer;

impl ViewRenderer for JsonViewRenderer {
    fn render(&self, view: &str, data: &ViewData) -> Result<Response, ResourceError> {
        Ok(Json(json!({ "view": view, "data": data })).into_response())
    }
}
