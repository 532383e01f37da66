use std::fmt;

use http::Method;

use crate::action::is_bulk_action;
use crate::heuristics::{DefaultListViewDetector, ListViewDetector};
use crate::view::{RouteContext, RouteView};

/// A route together with the list-view heuristic used to interpret it.
///
/// Shared by the [`BulkAwareSchema`](super::BulkAwareSchema) and every
/// [`SchemaInspector`](super::SchemaInspector) callback.
#[derive(Clone, Copy)]
pub struct OperationContext<'a> {
    route: RouteContext<'a>,
    detector: &'a dyn ListViewDetector,
}

impl fmt::Debug for OperationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

impl<'a> OperationContext<'a> {
    /// Creates a context using the [`DefaultListViewDetector`].
    pub fn new(route: RouteContext<'a>) -> Self {
        Self {
            route,
            detector: &DefaultListViewDetector,
        }
    }

    /// Replaces the list-view detector.
    pub fn with_detector(mut self, detector: &'a dyn ListViewDetector) -> Self {
        self.detector = detector;
        self
    }

    /// The underlying route.
    pub fn route(&self) -> &RouteContext<'a> {
        &self.route
    }

    /// The route path.
    pub fn path(&self) -> &'a str {
        self.route.subpath
    }

    /// The HTTP method.
    pub fn method(&self) -> &'a Method {
        self.route.method
    }

    /// The view serving the route.
    pub fn view(&self) -> &'a RouteView {
        self.route.view
    }

    /// The resolved action of the view, if any.
    pub fn action(&self) -> Option<&'a str> {
        self.route.view.action()
    }

    /// Whether the operation concerns a collection.
    pub fn is_list_view(&self) -> bool {
        self.detector
            .is_list_view(self.route.subpath, self.route.method, self.route.view)
    }

    /// Whether the view's action belongs to the bulk extension.
    pub fn is_bulk_action(&self) -> bool {
        self.action().is_some_and(is_bulk_action)
    }

    /// Whether the operation is a bulk view: a list view running a bulk action.
    pub fn is_bulk_view(&self) -> bool {
        self.is_list_view() && self.is_bulk_action()
    }
}
