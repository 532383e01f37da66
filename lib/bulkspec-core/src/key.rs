//! Operation keys: grouping HTTP operations into document sections.
//!
//! ```text
//! /users/                   ("users", "list"), ("users", "create")
//! /users/{pk}/              ("users", "read"), ("users", "update"), ("users", "delete")
//! /users/enabled/           ("users", "enabled")          # custom list action
//! /users/{pk}/star/         ("users", "star")             # custom detail action
//! /users/                   ("users", "bulk_update")      # bulk action next to list/create
//! /users/{pk}/groups/       ("users", "groups", "list"), ("users", "groups", "create")
//! /users/{pk}/groups/{pk}/  ("users", "groups", "read"), ("users", "groups", "update")
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::action::{is_bulk_action, is_custom_action};
use crate::config::GeneratorConfig;
use crate::heuristics::{DefaultListViewDetector, ListViewDetector};
use crate::view::RouteContext;

/// Ordered, non-empty list of names grouping an operation in the document.
///
/// Equal keys end up in the same section. The last element names the verb
/// (`list`, `create`, `read`, a custom or bulk action, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::Deref)]
#[serde(transparent)]
pub struct OperationKey(Vec<String>);

impl OperationKey {
    /// Builds a key from the named path components and the action name.
    pub fn new<S>(components: impl IntoIterator<Item = S>, action: impl Into<String>) -> Self
    where
        S: Into<String>,
    {
        let mut parts: Vec<String> = components.into_iter().map(Into::into).collect();
        parts.push(action.into());
        Self(parts)
    }

    /// The verb part of the key.
    pub fn action(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// The first element, used as the operation's tag.
    pub fn tag(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    /// The operation id derived from the key: elements joined with `_`.
    pub fn operation_id(&self) -> String {
        self.0.join("_")
    }

    /// Consumes the key into its parts.
    pub fn into_parts(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// Strategy computing the operation key of a route.
pub trait OperationKeyClassifier: Send + Sync {
    /// Returns the key grouping `route` in the document.
    fn operation_key(&self, route: &RouteContext<'_>) -> OperationKey;

    /// The list-view heuristic behind the keys.
    ///
    /// Schema shaping uses the same detector, so a `list` key always comes with a
    /// list-shaped response.
    fn detector(&self) -> &dyn ListViewDetector {
        &DefaultListViewDetector
    }
}

/// Operation key classifier aware of the bulk extension's actions.
///
/// Bulk actions (`bulk_create`, `bulk_update`, `partial_bulk_update`,
/// `bulk_destroy`) share their path with the `list`/`create` actions. On such a
/// multiplexed route they keep their own name, while any other custom action
/// falls back to the name the default mapping gives to its method.
///
/// # Preconditions
///
/// Viewsets reaching the custom-action branch are expected to carry an action
/// map. A view without one is handled like a single-action route.
///
/// # Example
///
/// ```rust
/// use bulkspec_core::{BulkOperationKeyClassifier, GeneratorConfig, OperationKeyClassifier};
/// use bulkspec_core::{RouteContext, RouteView};
/// use http::Method;
///
/// let config = GeneratorConfig::default();
/// let classifier = BulkOperationKeyClassifier::new(&config);
///
/// let view = RouteView::viewset("bulk_create")
///     .with_action_map([(Method::GET, "list"), (Method::POST, "bulk_create")]);
/// let key = classifier.operation_key(&RouteContext::new("/users/", &Method::POST, &view));
///
/// assert_eq!(key.operation_id(), "users_bulk_create");
/// ```
#[derive(Clone, Copy)]
pub struct BulkOperationKeyClassifier<'a> {
    config: &'a GeneratorConfig,
    detector: &'a dyn ListViewDetector,
}

impl fmt::Debug for BulkOperationKeyClassifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkOperationKeyClassifier")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

impl<'a> BulkOperationKeyClassifier<'a> {
    /// Creates a classifier using the [`DefaultListViewDetector`].
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            detector: &DefaultListViewDetector,
        }
    }

    /// Replaces the list-view detector.
    pub fn with_detector(mut self, detector: &'a dyn ListViewDetector) -> Self {
        self.detector = detector;
        self
    }

    fn resolve_action(&self, route: &RouteContext<'_>) -> String {
        if let Some(action) = route.view.action() {
            return action.to_string();
        }

        if self
            .detector
            .is_list_view(route.subpath, route.method, route.view)
        {
            "list".to_string()
        } else {
            self.config.default_action_or_method(route.method)
        }
    }
}

impl OperationKeyClassifier for BulkOperationKeyClassifier<'_> {
    fn operation_key(&self, route: &RouteContext<'_>) -> OperationKey {
        let action = self.resolve_action(route);
        let mut components = route.named_path_components();

        let key = if is_custom_action(&action) {
            if route.view.action_count() > 1 {
                let action = if is_bulk_action(&action) {
                    action
                } else {
                    let fallback = self.config.default_action_or_method(route.method);
                    debug!(
                        path = route.subpath,
                        %action,
                        %fallback,
                        "custom action on a multiplexed route, using default action"
                    );
                    fallback
                };
                OperationKey::new(components, self.config.coerce(&action))
            } else {
                let dropped = components.pop();
                debug!(
                    path = route.subpath,
                    %action,
                    ?dropped,
                    "custom action, dropping its path segment"
                );
                OperationKey::new(components, action)
            }
        } else {
            OperationKey::new(components, self.config.coerce(&action))
        };

        trace!(path = route.subpath, method = %route.method, %key, "operation key");
        key
    }

    fn detector(&self) -> &dyn ListViewDetector {
        self.detector
    }
}
