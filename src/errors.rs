//! Error handling for resource controllers.
//!
//! One error type covers the whole crate: repository lookups, request
//! validation, redirect construction and view rendering all surface a
//! [`ResourceError`], which converts into an HTTP response with a sanitized
//! JSON body. Internal details (database errors, render failures) are logged
//! through `tracing` and never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

use crate::validation::ValidationErrors;

/// Error type for every repository and controller operation.
///
/// `Logic` marks programming or configuration errors (an unset form view, a
/// nested resource whose parent reference does not match the route). These
/// are not recoverable at runtime and are meant to fail loudly during
/// development.
#[derive(Debug)]
pub enum ResourceError {
    /// 404 Not Found - object lookup by id failed
    NotFound {
        /// Resource name (e.g. "category")
        resource: String,
        /// Optional id that wasn't found
        id: Option<String>,
    },

    /// 400 Bad Request - the request body could not be read as form data
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 422 Unprocessable Entity - declared validation rules failed
    Validation {
        /// Per-field validation errors
        errors: ValidationErrors,
    },

    /// 500 Internal Server Error - programming/configuration error
    Logic {
        /// What was misconfigured or violated
        message: String,
    },

    /// 500 Internal Server Error - database error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - view rendering failed
    Render {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ResourceError {
    /// Create a 404 Not Found error
    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a logic/configuration error
    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic {
            message: message.into(),
        }
    }

    /// Create a 500 Internal Server Error from a database error
    ///
    /// The database error details are logged but NOT sent to the user.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: "A database error occurred".to_string(),
            internal: err,
        }
    }

    /// Create a rendering error with optional internal details
    pub fn render(message: impl Into<String>, internal: Option<String>) -> Self {
        Self::Render {
            message: message.into(),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Logic { .. } | Self::Database { .. } | Self::Render { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::NotFound { resource, id } => {
                if let Some(id) = id {
                    format!("{resource} with id '{id}' not found")
                } else {
                    format!("{resource} not found")
                }
            }
            Self::BadRequest { message }
            | Self::Logic { message }
            | Self::Database { message, .. }
            | Self::Render { message, .. } => message.clone(),
            Self::Validation { errors } => errors.to_string(),
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(error = ?internal, "database error");
            }
            Self::Render {
                internal: Some(details),
                ..
            } => {
                tracing::error!(details = %details, "view rendering failed");
            }
            Self::Logic { message } => {
                tracing::error!(details = %message, "logic error");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "request error"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ResourceError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let response = match &self {
            Self::Validation { errors } => ErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(errors.errors().iter().map(ToString::to_string).collect()),
            },
            _ => ErrorResponse {
                error: self.user_message(),
                details: None,
            },
        };

        (status, Json(response)).into_response()
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ResourceError {}

/// Convert Sea-ORM errors: `RecordNotFound` becomes 404, everything else a
/// sanitized 500.
impl From<DbErr> for ResourceError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::RecordNotFound(msg) => {
                let resource = msg.split_whitespace().next().unwrap_or("resource");
                Self::NotFound {
                    resource: resource.to_string(),
                    id: None,
                }
            }
            _ => Self::database(err),
        }
    }
}

impl From<ValidationErrors> for ResourceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation { errors }
    }
}
