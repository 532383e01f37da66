//! Read-only generator configuration.
//!
//! The generation engine owns two tables that both the operation key classifier
//! and the schema adjuster consult:
//!
//! - the **default mapping**, from a lowercase HTTP method to the action name it
//!   resolves to when a view has no explicit action;
//! - the **coercion table**, renaming an action to the name displayed in the
//!   document (`retrieve` becomes `read`, `destroy` becomes `delete`).
//!
//! Both are passed explicitly by reference; nothing here is mutated during a
//! generation pass.

use http::Method;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::BulkSpecError;

/// Configuration tables for operation classification.
///
/// # Example
///
/// ```rust
/// use bulkspec_core::GeneratorConfig;
/// use http::Method;
///
/// let config = GeneratorConfig::default().with_coercion("list", "index");
///
/// assert_eq!(config.default_action(&Method::PATCH), Some("partial_update"));
/// assert_eq!(config.coerce("list"), "index");
/// assert_eq!(config.coerce("create"), "create");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Lowercase HTTP method to action name.
    pub default_mapping: IndexMap<String, String>,
    /// Action name to display name.
    pub coerce_method_names: IndexMap<String, String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let default_mapping = [
            ("get", "retrieve"),
            ("post", "create"),
            ("put", "update"),
            ("patch", "partial_update"),
            ("delete", "destroy"),
        ]
        .into_iter()
        .map(|(method, action)| (method.to_string(), action.to_string()))
        .collect();

        let coerce_method_names = [("retrieve", "read"), ("destroy", "delete")]
            .into_iter()
            .map(|(action, name)| (action.to_string(), name.to_string()))
            .collect();

        Self {
            default_mapping,
            coerce_method_names,
        }
    }
}

impl GeneratorConfig {
    /// Creates a configuration with empty tables.
    pub fn empty() -> Self {
        Self {
            default_mapping: IndexMap::new(),
            coerce_method_names: IndexMap::new(),
        }
    }

    /// Sets the action a method maps to.
    pub fn with_mapping(mut self, method: &Method, action: impl Into<String>) -> Self {
        self.default_mapping
            .insert(method.as_str().to_ascii_lowercase(), action.into());
        self
    }

    /// Sets the display name of an action.
    pub fn with_coercion(mut self, action: impl Into<String>, name: impl Into<String>) -> Self {
        self.coerce_method_names.insert(action.into(), name.into());
        self
    }

    /// Returns the action name the default mapping gives to `method`.
    pub fn default_action(&self, method: &Method) -> Option<&str> {
        let key = method.as_str().to_ascii_lowercase();
        self.default_mapping.get(&key).map(String::as_str)
    }

    /// Returns the default action for `method`, falling back to the lowercase method
    /// name when the mapping has no entry for it.
    pub(crate) fn default_action_or_method(&self, method: &Method) -> String {
        if let Some(action) = self.default_action(method) {
            return action.to_string();
        }

        warn!(%method, "method missing from default mapping, using method name as action");
        method.as_str().to_ascii_lowercase()
    }

    /// Looks up the display name for `action`, returning the action unchanged if the
    /// coercion table has no entry.
    pub fn coerce<'a>(&'a self, action: &'a str) -> &'a str {
        self.coerce_method_names
            .get(action)
            .map_or(action, String::as_str)
    }

    /// Parses a configuration from JSON.
    ///
    /// Missing tables take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`BulkSpecError::JsonError`] for malformed JSON and
    /// [`BulkSpecError::InvalidConfig`] if the tables are inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, BulkSpecError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Parses a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`BulkSpecError::InvalidConfig`] for malformed YAML or
    /// inconsistent tables.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Self, BulkSpecError> {
        let config: Self =
            serde_saphyr::from_str(yaml).map_err(|err| BulkSpecError::InvalidConfig {
                error: err.to_string(),
            })?;
        config.validate()
    }

    fn validate(self) -> Result<Self, BulkSpecError> {
        if let Some(method) = self.default_mapping.keys().find(|method| {
            method.is_empty() || method.chars().any(|ch| ch.is_ascii_uppercase())
        }) {
            return Err(BulkSpecError::InvalidConfig {
                error: format!(
                    "default mapping keys must be lowercase HTTP methods, got '{method}'"
                ),
            });
        }

        if let Some((method, _)) = self
            .default_mapping
            .iter()
            .find(|(_, action)| action.is_empty())
        {
            return Err(BulkSpecError::InvalidConfig {
                error: format!("empty action name mapped to method '{method}'"),
            });
        }

        Ok(self)
    }
}
