//! Redirect-on-success plumbing.
//!
//! Every write operation ends in a [`FlashRedirect`]: a 303 redirect whose
//! flash message travels as a cookie for the next page load to display.
//! Targets are resolved through the [`ActionRouter`] collaborator; an action
//! whose name contains `index` addresses the collection and therefore gets
//! no object key appended, every other action is keyed.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use hyper::HeaderMap;

use crate::errors::ResourceError;
use crate::i18n::Translator;

/// Where a write operation redirects once it succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectTarget {
    /// A literal URL, used as-is
    Url(String),
    /// A named controller action, resolved through the [`ActionRouter`]
    Action(String),
}

/// Store-action redirect override held by the controller configuration.
///
/// Resolution precedence lives in
/// [`ResourceController::store_redirect_target`](crate::resource::ResourceController::store_redirect_target):
/// the edit action wins when redirect-to-edit-on-create is set, then this
/// value applies, where `Back` means "no target, redirect back".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreRedirect {
    /// The conventional index action (the default)
    #[default]
    Index,
    /// Redirect back to the submitting page
    Back,
    /// An explicit action name
    Action(String),
    /// An explicit URL
    Url(String),
}

/// Maps a named action, plus the object key for keyed actions, to a URL.
pub trait ActionRouter: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ResourceError::Logic`] when the action cannot be resolved
    /// (unknown name, or a keyed action without a key).
    fn action_url(&self, action: &str, id: Option<i64>) -> Result<String, ResourceError>;
}

/// Conventional path-based router: `index` maps to the base path, `create`
/// to `base/create`, `show` to `base/{id}` and any other action to
/// `base/{id}/{action}`.
#[derive(Debug, Clone)]
pub struct PathActionRouter {
    base: String,
}

impl PathActionRouter {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base }
    }
}

impl ActionRouter for PathActionRouter {
    fn action_url(&self, action: &str, id: Option<i64>) -> Result<String, ResourceError> {
        match action {
            "index" => Ok(self.base.clone()),
            "create" => Ok(format!("{}/create", self.base)),
            keyed => {
                let id = id.ok_or_else(|| {
                    ResourceError::logic(format!("action '{keyed}' requires an object key"))
                })?;
                if keyed == "show" {
                    Ok(format!("{}/{id}", self.base))
                } else {
                    Ok(format!("{}/{id}/{keyed}", self.base))
                }
            }
        }
    }
}

/// One-shot message surfaced on the page after a redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub key: String,
    pub message: String,
}

/// 303 redirect carrying a flash message cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashRedirect {
    pub location: String,
    pub flash: Flash,
}

impl FlashRedirect {
    #[must_use]
    pub fn new(location: impl Into<String>, flash: Flash) -> Self {
        Self {
            location: location.into(),
            flash,
        }
    }

    fn flash_cookie(&self) -> String {
        format!(
            "{}={}; Path=/",
            self.flash.key,
            url_escape::encode_component(&self.flash.message)
        )
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let Ok(location) = HeaderValue::from_str(&self.location) else {
            return ResourceError::logic(format!("invalid redirect location: {}", self.location))
                .into_response();
        };
        let Ok(cookie) = HeaderValue::from_str(&self.flash_cookie()) else {
            return ResourceError::logic("invalid flash cookie value").into_response();
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, location);
        headers.insert(header::SET_COOKIE, cookie);
        (StatusCode::SEE_OTHER, headers).into_response()
    }
}

/// Builds success redirects for the repository write helpers.
///
/// Borrowed from the controller per request: the translator and action
/// router come from the injected collaborators, `back` from the request
/// context.
pub struct Redirects<'a> {
    pub translator: &'a dyn Translator,
    pub actions: &'a dyn ActionRouter,
    pub flash_key: &'a str,
    pub back: Option<&'a str>,
}

impl Redirects<'_> {
    /// Resolve the target and attach the localized success message.
    ///
    /// No target redirects back (Referer, falling back to `/`). An action
    /// target gets the object key appended unless its name contains
    /// `index`; a keyed action without a saved object is a logic error.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Logic`] from target resolution.
    pub fn with_success(
        &self,
        message_key: &str,
        object_key: Option<i64>,
        target: Option<&RedirectTarget>,
    ) -> Result<FlashRedirect, ResourceError> {
        let location = match target {
            None => self.back.unwrap_or("/").to_string(),
            Some(RedirectTarget::Url(url)) => url.clone(),
            Some(RedirectTarget::Action(action)) => {
                let is_index = action.contains("index");
                let id = if is_index {
                    None
                } else {
                    Some(object_key.ok_or_else(|| {
                        ResourceError::logic(format!(
                            "redirect to action '{action}' requires a saved object"
                        ))
                    })?)
                };
                self.actions.action_url(action, id)?
            }
        };

        Ok(FlashRedirect::new(
            location,
            Flash {
                key: self.flash_key.to_string(),
                message: self.translator.translate(message_key),
            },
        ))
    }
}
