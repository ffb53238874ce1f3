//! Request-data validation.
//!
//! Repositories declare their rules through
//! [`ResourceRepository::validation_rules`](crate::repository::ResourceRepository::validation_rules);
//! this module holds the rule builder and the checker that runs before every
//! create/update. A rule only fires for absent fields when it is marked
//! `required`, mirroring the usual "sometimes" semantics of web form
//! validators.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::models::FormData;

/// Validation error with field name and message
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Create a new empty validation errors collection
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add a validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Check if there are any errors
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Convert to Result
    ///
    /// # Errors
    ///
    /// Returns `Err(self)` if any error was collected.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A single check applied to a present field value.
#[derive(Debug, Clone)]
enum Check {
    Boolean,
    Integer,
    Length {
        min: Option<usize>,
        max: Option<usize>,
    },
    Range {
        min: Option<i64>,
        max: Option<i64>,
    },
}

/// Declarative rule for one form field.
///
/// Built fluently: `FieldRule::new("name").required().length(Some(1), Some(255))`.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: String,
    required: bool,
    checks: Vec<Check>,
}

impl FieldRule {
    /// Start a rule for the given field
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            required: false,
            checks: Vec::new(),
        }
    }

    /// The field must be present and non-empty
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The value must read as a boolean (`true`/`false`, `0`/`1`, `on`)
    #[must_use]
    pub fn boolean(mut self) -> Self {
        self.checks.push(Check::Boolean);
        self
    }

    /// The value must read as an integer
    #[must_use]
    pub fn integer(mut self) -> Self {
        self.checks.push(Check::Integer);
        self
    }

    /// String length bounds (characters)
    #[must_use]
    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        self.checks.push(Check::Length { min, max });
        self
    }

    /// Numeric value bounds
    #[must_use]
    pub fn range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.checks.push(Check::Range { min, max });
        self
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    fn run(&self, data: &FormData, errors: &mut ValidationErrors) {
        let value = data.get(&self.field);
        if !is_present(value) {
            if self.required {
                errors.add(ValidationError::new(&self.field, "This field is required"));
            }
            return;
        }
        let value = value.unwrap_or(&Value::Null);

        for check in &self.checks {
            if let Some(message) = check.apply(value) {
                errors.add(ValidationError::new(&self.field, message));
            }
        }
    }
}

impl Check {
    fn apply(&self, value: &Value) -> Option<String> {
        match self {
            Self::Boolean => {
                as_bool(value).map_or_else(|| Some("Must be a boolean".to_string()), |_| None)
            }
            Self::Integer => {
                as_i64(value).map_or_else(|| Some("Must be an integer".to_string()), |_| None)
            }
            Self::Length { min, max } => {
                let Some(text) = value.as_str() else {
                    return Some("Must be a string".to_string());
                };
                let len = text.chars().count();
                if let Some(min) = min
                    && len < *min
                {
                    return Some(format!("Must be at least {min} characters"));
                }
                if let Some(max) = max
                    && len > *max
                {
                    return Some(format!("Must be at most {max} characters"));
                }
                None
            }
            Self::Range { min, max } => {
                let Some(number) = as_i64(value) else {
                    return Some("Must be an integer".to_string());
                };
                if let Some(min) = min
                    && number < *min
                {
                    return Some(format!("Must be at least {min}"));
                }
                if let Some(max) = max
                    && number > *max
                {
                    return Some(format!("Must be at most {max}"));
                }
                None
            }
        }
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(_) => true,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Value::String(text) => match text.trim() {
            "0" | "false" => Some(false),
            "1" | "true" | "on" => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Run every rule against the submitted data.
///
/// # Errors
///
/// Returns the collected [`ValidationErrors`] when any rule fails.
pub fn validate(data: &FormData, rules: &[FieldRule]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for rule in rules {
        rule.run(data, &mut errors);
    }
    errors.result()
}
