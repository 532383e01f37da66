//! Predicates the generation engine normally provides.
//!
//! They are exposed as free functions and as the [`ListViewDetector`] trait so the
//! engine can plug its own list-view heuristic in.

use http::Method;
use mime::Mime;

use crate::view::RouteView;

/// Decides whether an operation concerns a collection rather than a single resource.
pub trait ListViewDetector: Send + Sync {
    /// Whether `path` at `method` on `view` denotes a collection endpoint.
    fn is_list_view(&self, path: &str, method: &Method, view: &RouteView) -> bool;
}

/// The usual list-view heuristic.
///
/// 1. Action `list` or `create`, or a non-detail action, is a list view.
/// 2. Action `retrieve`, `update`, `partial_update` or `destroy`, or a detail
///    action, is not.
/// 3. Otherwise a path ending with a parameter segment is not a list view.
/// 4. Anything else is assumed to be a list view.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultListViewDetector;

impl ListViewDetector for DefaultListViewDetector {
    fn is_list_view(&self, path: &str, _method: &Method, view: &RouteView) -> bool {
        let action = view.action().unwrap_or_default();

        if matches!(action, "list" | "create") || view.detail() == Some(false) {
            return true;
        }
        if matches!(action, "retrieve" | "update" | "partial_update" | "destroy")
            || view.detail() == Some(true)
        {
            return false;
        }

        let last_segment = path.trim_matches('/').rsplit('/').next();
        !last_segment.is_some_and(|segment| segment.contains('{'))
    }
}

/// The status code documented by default for `method`.
///
/// `POST` creates (201), `DELETE` has no content (204), everything else is 200.
pub fn guess_response_status(method: &Method) -> u16 {
    match *method {
        Method::POST => 201,
        Method::DELETE => 204,
        _ => 200,
    }
}

/// Whether `media_type` is a form encoding (`application/x-www-form-urlencoded` or
/// `multipart/form-data`), ignoring parameters such as `charset` or `boundary`.
///
/// Unparseable media types are not form encodings.
pub fn is_form_media_type(media_type: &str) -> bool {
    let Ok(mime) = media_type.trim().parse::<Mime>() else {
        return false;
    };

    let essence = mime.essence_str();
    essence == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str()
        || essence == mime::MULTIPART_FORM_DATA.essence_str()
}
