//! Route and view descriptions handed over by the generation engine.

use http::Method;
use indexmap::IndexMap;

/// What the generation engine knows about the view serving a route.
///
/// Plain views carry no action; viewsets carry the resolved `action` and the
/// `action_map` of the route (every HTTP method bound on that path, with the
/// action it resolves to).
///
/// # Example
///
/// ```rust
/// use bulkspec_core::RouteView;
/// use http::Method;
///
/// let view = RouteView::viewset("bulk_update")
///     .with_action_map([(Method::PUT, "bulk_update"), (Method::PATCH, "partial_bulk_update")])
///     .with_filter_backend("SearchFilter");
///
/// assert_eq!(view.action(), Some("bulk_update"));
/// assert_eq!(view.action_count(), 2);
/// assert!(view.has_filter_backends());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteView {
    action: Option<String>,
    action_map: Option<IndexMap<Method, String>>,
    detail: Option<bool>,
    filter_backends: Vec<String>,
}

impl RouteView {
    /// A plain view without explicit action.
    pub fn new() -> Self {
        Self::default()
    }

    /// A viewset view resolved to `action`.
    pub fn viewset(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    /// Sets the resolved action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Sets the method-to-action map of the route.
    pub fn with_action_map<A>(mut self, actions: impl IntoIterator<Item = (Method, A)>) -> Self
    where
        A: Into<String>,
    {
        let map = actions
            .into_iter()
            .map(|(method, action)| (method, action.into()))
            .collect();
        self.action_map = Some(map);
        self
    }

    /// Marks the action as operating on a single instance (`true`) or on the
    /// collection (`false`).
    pub fn with_detail(mut self, detail: bool) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Adds a filter backend declared on the view.
    pub fn with_filter_backend(mut self, backend: impl Into<String>) -> Self {
        self.filter_backends.push(backend.into());
        self
    }

    /// The resolved action, if any.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// The route's method-to-action map, if any.
    pub fn action_map(&self) -> Option<&IndexMap<Method, String>> {
        self.action_map.as_ref()
    }

    /// Number of methods multiplexed on the route (0 without an action map).
    pub fn action_count(&self) -> usize {
        self.action_map.as_ref().map_or(0, IndexMap::len)
    }

    /// The detail flag of the action, if known.
    pub fn detail(&self) -> Option<bool> {
        self.detail
    }

    /// Filter backends declared on the view.
    pub fn filter_backends(&self) -> &[String] {
        &self.filter_backends
    }

    /// Whether the view declares at least one filter backend.
    pub fn has_filter_backends(&self) -> bool {
        !self.filter_backends.is_empty()
    }
}

/// One `(subpath, method, view)` triple visited by the generation engine.
#[derive(Debug, Clone, Copy)]
pub struct RouteContext<'a> {
    /// Path template with any common prefix removed, e.g. `/users/{pk}/`.
    pub subpath: &'a str,
    /// The HTTP method of the operation.
    pub method: &'a Method,
    /// The view serving the route.
    pub view: &'a RouteView,
}

impl<'a> RouteContext<'a> {
    /// Bundles a route triple.
    pub fn new(subpath: &'a str, method: &'a Method, view: &'a RouteView) -> Self {
        Self {
            subpath,
            method,
            view,
        }
    }

    /// Path segments that are not dynamic parameters, in order.
    ///
    /// Any segment containing `{` counts as a parameter, even a literal one.
    pub fn named_path_components(&self) -> Vec<&'a str> {
        self.subpath
            .split('/')
            .filter(|segment| !segment.is_empty() && !segment.contains('{'))
            .collect()
    }
}
