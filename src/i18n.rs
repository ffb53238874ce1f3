//! Message translation.
//!
//! Flash messages and default form titles are resolved through the
//! [`Translator`] collaborator so hosts can plug in their own localization
//! layer. Keys are scoped to this package's namespace; an unresolved key is
//! echoed back namespaced, which makes a missing translation visible instead
//! of silent.

use std::collections::HashMap;

/// Namespace prefixed to unresolved message keys.
pub const PACKAGE_NAMESPACE: &str = "resource-controllers";

/// Resolves package-scoped message keys to localized strings.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// In-memory translator preloaded with the package's English messages.
///
/// Hosts override or extend individual messages with
/// [`with_message`](Self::with_message), or replace the collaborator
/// entirely.
#[derive(Debug, Clone)]
pub struct StaticTranslator {
    messages: HashMap<String, String>,
}

impl StaticTranslator {
    #[must_use]
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        for (key, text) in [
            ("messages.created", "Successfully created"),
            ("messages.updated", "Successfully updated"),
            ("messages.deleted", "Successfully deleted"),
            ("titles.create", "Create"),
            ("titles.edit", "Edit"),
        ] {
            messages.insert(key.to_string(), text.to_string());
        }
        Self { messages }
    }

    /// Override or add a message
    #[must_use]
    pub fn with_message(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.messages.insert(key.into(), text.into());
        self
    }
}

impl Default for StaticTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for StaticTranslator {
    fn translate(&self, key: &str) -> String {
        self.messages
            .get(key)
            .cloned()
            .unwrap_or_else(|| format!("{PACKAGE_NAMESPACE}::{key}"))
    }
}
