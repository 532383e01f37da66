//! Bulk-aware request and response shapes.
//!
//! - [`BulkAwareSchema`] - per-operation adjuster: body parameters, default
//!   responses, filter parameter decision
//! - [`SchemaInspector`] - callbacks into the generation engine
//! - [`StaticInspector`] - an inspector backed by fixed [`ModelSchema`]s

mod adjuster;
pub use self::adjuster::{BulkAwareSchema, DefaultResponses};

mod context;
pub use self::context::OperationContext;

mod inspector;
pub use self::inspector::{
    ModelSchema, PaginationEnvelope, SchemaInspector, SerializerOrSchema, StaticInspector,
};

mod parameter;
pub use self::parameter::{BODY_PARAMETER_NAME, ParameterLocation, RequestParameter, array_of};
