use utoipa::openapi::schema::Array;
use utoipa::openapi::{RefOr, Schema};

/// Name of the single body parameter of an operation.
pub const BODY_PARAMETER_NAME: &str = "data";

/// Where a request parameter travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    /// The whole request body, described by one schema.
    Body,
    /// One field of a form-encoded body.
    FormData,
}

/// A request parameter produced for an operation's body.
///
/// Either the single body parameter, or one form field per serializer field.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestParameter {
    /// The parameter name.
    pub name: String,
    /// Body or form field.
    pub location: ParameterLocation,
    /// Whether the parameter must be provided.
    pub required: bool,
    /// Schema of the parameter value.
    pub schema: RefOr<Schema>,
}

impl RequestParameter {
    /// The required body parameter carrying `schema`.
    pub fn body(schema: RefOr<Schema>) -> Self {
        Self {
            name: BODY_PARAMETER_NAME.to_string(),
            location: ParameterLocation::Body,
            required: true,
            schema,
        }
    }

    /// A form field.
    pub fn form_field(name: impl Into<String>, schema: RefOr<Schema>, required: bool) -> Self {
        Self {
            name: name.into(),
            location: ParameterLocation::FormData,
            required,
            schema,
        }
    }

    /// Whether this is the body parameter.
    pub fn is_body(&self) -> bool {
        self.location == ParameterLocation::Body
    }
}

/// Wraps `items` in an array schema.
pub fn array_of(items: RefOr<Schema>) -> RefOr<Schema> {
    RefOr::T(Schema::Array(Array::new(items)))
}
