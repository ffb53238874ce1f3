//! Request-scoped data carried into the repository and controller layers.

use axum::{
    extract::{Form, FromRequest, Request},
    http::{Method, header},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::errors::ResourceError;

/// Submitted form data, one value per field.
///
/// Values arriving over HTTP are strings; the accessors coerce where the
/// repository needs typed values (`i64_value` parses numeric strings, so a
/// `parent_id` posted as `"5"` compares equal to a route parameter `5`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(Map<String, Value>);

impl FormData {
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(field.into(), value.into());
    }

    /// The value as a string slice, if it is one
    #[must_use]
    pub fn str_value(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// The value as an integer; numeric strings and booleans coerce
    #[must_use]
    pub fn i64_value(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.trim().parse().ok(),
            Value::Bool(flag) => Some(i64::from(*flag)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<HashMap<String, String>> for FormData {
    fn from(fields: HashMap<String, String>) -> Self {
        Self(
            fields
                .into_iter()
                .map(|(field, value)| (field, Value::String(value)))
                .collect(),
        )
    }
}

impl From<Map<String, Value>> for FormData {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Insert `0` for every declared checkbox field absent from the data.
///
/// Unchecked HTML checkboxes are simply missing from the submission, so the
/// default has to be added after validation. Re-applying is a no-op.
pub fn apply_checkbox_defaults(data: &mut FormData, checkboxes: &[&str]) {
    for field in checkboxes {
        if !data.contains(field) {
            data.insert(*field, 0);
        }
    }
}

/// Per-request context handed to every controller action.
///
/// Built by the Axum extractor below: `data` holds the query string on
/// GET/HEAD or the urlencoded body otherwise, `back` is the Referer-derived
/// URL used for "redirect back" targets.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub data: FormData,
    pub back: Option<String>,
}

impl RequestContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(data: FormData) -> Self {
        Self { data, back: None }
    }

    #[must_use]
    pub fn with_back(mut self, back: impl Into<String>) -> Self {
        self.back = Some(back.into());
        self
    }
}

impl<S> FromRequest<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ResourceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let back = req
            .headers()
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let has_form_body = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| {
                content_type.starts_with("application/x-www-form-urlencoded")
            });

        // DELETE submissions from link-style buttons carry no body at all;
        // only parse when there is something to parse.
        let data = if req.method() == Method::GET || req.method() == Method::HEAD || has_form_body {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|err| ResourceError::bad_request(format!("malformed form data: {err}")))?;
            FormData::from(fields)
        } else {
            FormData::new()
        };

        Ok(Self { data, back })
    }
}
