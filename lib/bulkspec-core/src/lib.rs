//! # Bulkspec Core
//!
//! Document bulk operations correctly in generated OpenAPI specifications.
//!
//! Bulk extensions add `bulk_create`, `bulk_update`, `partial_bulk_update` and
//! `bulk_destroy` actions next to the usual `list`/`create` actions of a
//! collection route. A schema generator unaware of them groups these operations
//! under the wrong names and documents their bodies as single resources. This
//! crate provides two strategies the generator calls back into:
//!
//! - **[`BulkOperationKeyClassifier`]** - computes the [`OperationKey`] grouping an
//!   operation in the document, keeping bulk action names on multiplexed routes
//! - **[`BulkAwareSchema`]** - shapes request bodies and default responses as
//!   arrays for bulk actions, and decides whether filter parameters apply
//!
//! [`OperationAssembler`] combines both into a utoipa
//! [`Operation`](utoipa::openapi::path::Operation).
//!
//! ## Quick Start
//!
//! ```rust
//! use bulkspec_core::{
//!     BulkOperationKeyClassifier, GeneratorConfig, ModelSchema, OperationAssembler,
//!     RouteContext, RouteView, StaticInspector,
//! };
//! use http::Method;
//! use utoipa::openapi::{Paths, Ref, RefOr};
//!
//! # fn main() -> Result<(), bulkspec_core::BulkSpecError> {
//! let config = GeneratorConfig::default();
//! let classifier = BulkOperationKeyClassifier::new(&config);
//! let assembler = OperationAssembler::new(&classifier);
//!
//! let user = ModelSchema::new("User", RefOr::Ref(Ref::from_schema_name("User")));
//! let inspector = StaticInspector::new().with_request_model(user);
//!
//! let view = RouteView::viewset("bulk_update")
//!     .with_detail(false)
//!     .with_action_map([(Method::GET, "list"), (Method::PUT, "bulk_update")]);
//!
//! let route = RouteContext::new("/users/", &Method::PUT, &view);
//! let assembled = assembler.assemble(route, &inspector)?;
//! assert_eq!(assembled.key.operation_id(), "users_bulk_update");
//!
//! let mut paths = Paths::new();
//! assembled.insert_into(&mut paths);
//! # Ok(())
//! # }
//! ```
//!
//! ## Operation keys
//!
//! | Route                      | Method | Action                | Key                            |
//! |----------------------------|--------|-----------------------|--------------------------------|
//! | `/users/`                  | GET    | `list`                | `("users", "list")`            |
//! | `/users/{pk}/`             | GET    | `retrieve`            | `("users", "read")`            |
//! | `/users/{pk}/star/`        | POST   | `star`                | `("users", "star")`            |
//! | `/users/`                  | PATCH  | `partial_bulk_update` | `("users", "partial_bulk_update")` |
//! | `/users/{pk}/groups/{pk}/` | GET    | `retrieve`            | `("users", "groups", "read")`  |
//!
//! ## Features
//!
//! - `yaml`: load a [`GeneratorConfig`] from YAML

mod action;
mod config;
mod error;
mod heuristics;
mod key;
mod operation;
mod view;

pub mod schema;

pub use self::action::{
    BULK_ACTION_PREFIXES, BULK_CREATE, BULK_DESTROY, BULK_UPDATE, PARTIAL_BULK_UPDATE,
    is_bulk_action, is_custom_action,
};
pub use self::config::GeneratorConfig;
pub use self::error::BulkSpecError;
pub use self::heuristics::{
    DefaultListViewDetector, ListViewDetector, guess_response_status, is_form_media_type,
};
pub use self::key::{BulkOperationKeyClassifier, OperationKey, OperationKeyClassifier};
pub use self::operation::{AssembledOperation, OperationAssembler};
pub use self::schema::{
    BulkAwareSchema, DefaultResponses, ModelSchema, OperationContext, PaginationEnvelope,
    RequestParameter, SchemaInspector, SerializerOrSchema, StaticInspector,
};
pub use self::view::{RouteContext, RouteView};
