use http::Method;

/// Errors raised while shaping bulk operations.
///
/// The only generation-time failure is [`BulkSpecError::SchemaConflict`]; the other
/// variants come from loading a [`GeneratorConfig`](crate::GeneratorConfig).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum BulkSpecError {
    /// A form-encoded request was negotiated for an operation whose request body
    /// already resolves to a schema.
    ///
    /// This is a contradiction in the view setup: form fields cannot be derived
    /// from a schema object. The pipeline decides whether to skip the operation
    /// or abort the whole document.
    #[display("form request body cannot be a Schema ({method} {path})")]
    #[from(skip)]
    SchemaConflict {
        /// The route path of the operation.
        path: String,
        /// The HTTP method of the operation.
        method: Method,
    },

    /// JSON configuration could not be parsed.
    JsonError(serde_json::Error),

    /// The configuration was parsed but is not usable.
    #[display("Invalid configuration: {error}")]
    #[from(skip)]
    InvalidConfig {
        /// Description of why the configuration is invalid.
        error: String,
    },
}
