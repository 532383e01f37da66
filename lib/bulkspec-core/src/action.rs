//! Action-name conventions of the bulk extension and of the web framework.

/// Prefixes identifying a bulk action.
pub const BULK_ACTION_PREFIXES: &[&str] = &["bulk", "partial_bulk"];

/// Create several resources in one call.
pub const BULK_CREATE: &str = "bulk_create";
/// Replace several resources in one call.
pub const BULK_UPDATE: &str = "bulk_update";
/// Partially update several resources in one call.
pub const PARTIAL_BULK_UPDATE: &str = "partial_bulk_update";
/// Delete several resources in one call.
pub const BULK_DESTROY: &str = "bulk_destroy";

/// Actions the framework derives from HTTP methods on its own.
const BUILTIN_ACTIONS: &[&str] = &[
    "retrieve",
    "list",
    "create",
    "update",
    "partial_update",
    "destroy",
];

/// Whether `action` belongs to the bulk extension.
///
/// ```rust
/// use bulkspec_core::is_bulk_action;
///
/// assert!(is_bulk_action("bulk_create"));
/// assert!(is_bulk_action("partial_bulk_update"));
/// assert!(!is_bulk_action("partial_update"));
/// ```
pub fn is_bulk_action(action: &str) -> bool {
    BULK_ACTION_PREFIXES
        .iter()
        .any(|prefix| action.starts_with(prefix))
}

/// Whether `action` is a custom action, i.e. not one of the built-in CRUD verbs.
pub fn is_custom_action(action: &str) -> bool {
    !BUILTIN_ACTIONS.contains(&action)
}
