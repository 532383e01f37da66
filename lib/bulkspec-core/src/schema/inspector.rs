//! The seam between the schema adjuster and the generation engine.

use http::Method;
use utoipa::ToSchema;
use utoipa::openapi::path::Parameter;
use utoipa::openapi::schema::{ObjectBuilder, SchemaFormat, Type};
use utoipa::openapi::{Ref, RefOr, Schema};

use super::{OperationContext, RequestParameter};

/// What a request or response serializer resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializerOrSchema<S> {
    /// The serializer was overridden by a ready-made schema or reference.
    Schema(RefOr<Schema>),
    /// A serializer still to be converted.
    Serializer(S),
}

/// Engine callbacks used by [`BulkAwareSchema`](super::BulkAwareSchema).
///
/// Each callback receives the operation being documented. Conversions and
/// pagination stay the engine's business; the adjuster only decides when to wrap
/// their output in arrays.
pub trait SchemaInspector {
    /// The engine's serializer type.
    type Serializer;

    /// The serializer describing the request body, if the operation has one.
    fn request_serializer(
        &self,
        ctx: &OperationContext<'_>,
    ) -> Option<SerializerOrSchema<Self::Serializer>>;

    /// Converts a request serializer into a body schema.
    fn request_body_schema(
        &self,
        ctx: &OperationContext<'_>,
        serializer: &Self::Serializer,
    ) -> Option<RefOr<Schema>>;

    /// Converts a request serializer into form-field parameters.
    fn request_form_parameters(
        &self,
        ctx: &OperationContext<'_>,
        serializer: &Self::Serializer,
    ) -> Vec<RequestParameter>;

    /// The serializer describing the default response.
    fn default_response_serializer(
        &self,
        ctx: &OperationContext<'_>,
    ) -> Option<SerializerOrSchema<Self::Serializer>>;

    /// Converts a response serializer into a schema.
    fn serializer_to_schema(
        &self,
        ctx: &OperationContext<'_>,
        serializer: &Self::Serializer,
    ) -> Option<RefOr<Schema>>;

    /// Whether the response of this operation is paginated.
    fn should_page(&self, _ctx: &OperationContext<'_>) -> bool {
        false
    }

    /// Wraps a response schema in the pagination envelope.
    ///
    /// Returning `None` keeps the unpaginated schema.
    fn paginated_response(
        &self,
        _ctx: &OperationContext<'_>,
        _schema: &RefOr<Schema>,
    ) -> Option<RefOr<Schema>> {
        None
    }

    /// Query parameters contributed by the view's filter backends.
    fn filter_parameters(&self, _ctx: &OperationContext<'_>) -> Vec<Parameter> {
        Vec::new()
    }
}

/// A named component schema standing in for a serializer.
///
/// It converts to a `$ref` to `#/components/schemas/<name>`, and to one form field
/// per property when its schema is an inline object.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    name: String,
    schema: RefOr<Schema>,
}

impl ModelSchema {
    /// Creates a model from a component name and its schema.
    pub fn new(name: impl Into<String>, schema: RefOr<Schema>) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Creates a model from a [`ToSchema`] type.
    pub fn of<T: ToSchema>() -> Self {
        Self::new(T::name(), T::schema())
    }

    /// The component name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The component schema.
    pub fn schema(&self) -> &RefOr<Schema> {
        &self.schema
    }

    /// A reference to the component.
    pub fn reference(&self) -> RefOr<Schema> {
        RefOr::Ref(Ref::from_schema_name(&self.name))
    }

    /// One form field per object property, required when the object requires it.
    pub fn form_fields(&self) -> Vec<RequestParameter> {
        let RefOr::T(Schema::Object(object)) = &self.schema else {
            tracing::warn!(name = %self.name, "form fields requested for a non-object schema");
            return Vec::new();
        };

        object
            .properties
            .iter()
            .map(|(field, schema)| {
                let required = object.required.contains(field);
                RequestParameter::form_field(field, schema.clone(), required)
            })
            .collect()
    }
}

/// Shape of a paginated list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationEnvelope {
    /// `count`, `next`, `previous` and `results`, as page-number and limit-offset
    /// paginators produce.
    CountNextPrevious,
    /// `next`, `previous` and `results`, as cursor paginators produce.
    Cursor,
}

impl PaginationEnvelope {
    /// Wraps `results` in the envelope object.
    pub fn wrap(self, results: RefOr<Schema>) -> RefOr<Schema> {
        let link = || {
            ObjectBuilder::new()
                .schema_type(Type::String)
                .format(Some(SchemaFormat::Custom("uri".into())))
        };

        let mut builder = ObjectBuilder::new().schema_type(Type::Object);
        if self == Self::CountNextPrevious {
            builder = builder
                .property("count", ObjectBuilder::new().schema_type(Type::Integer))
                .required("count");
        }

        let envelope = builder
            .property("next", link())
            .property("previous", link())
            .property("results", results)
            .required("results")
            .build();

        RefOr::T(Schema::Object(envelope))
    }
}

/// A [`SchemaInspector`] backed by fixed models.
///
/// Only `POST`, `PUT` and `PATCH` operations get a request body. The default
/// response falls back to the request model when no response model is set.
/// Responses are paginated for `GET` list views once an envelope is configured.
///
/// # Example
///
/// ```rust
/// use bulkspec_core::{ModelSchema, PaginationEnvelope, StaticInspector};
/// use utoipa::openapi::{ObjectBuilder, RefOr, Schema};
///
/// let user = ModelSchema::new("User", RefOr::T(Schema::Object(ObjectBuilder::new().build())));
/// let inspector = StaticInspector::new()
///     .with_request_model(user)
///     .with_pagination(PaginationEnvelope::CountNextPrevious);
/// # let _ = inspector;
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticInspector {
    request: Option<SerializerOrSchema<ModelSchema>>,
    response: Option<SerializerOrSchema<ModelSchema>>,
    pagination: Option<PaginationEnvelope>,
    filter_parameters: Vec<Parameter>,
}

impl StaticInspector {
    /// An inspector without request nor response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `model` as request serializer.
    pub fn with_request_model(mut self, model: ModelSchema) -> Self {
        self.request = Some(SerializerOrSchema::Serializer(model));
        self
    }

    /// Uses a ready-made schema as request body.
    pub fn with_request_schema(mut self, schema: RefOr<Schema>) -> Self {
        self.request = Some(SerializerOrSchema::Schema(schema));
        self
    }

    /// Uses `model` as response serializer.
    pub fn with_response_model(mut self, model: ModelSchema) -> Self {
        self.response = Some(SerializerOrSchema::Serializer(model));
        self
    }

    /// Uses a ready-made schema as response.
    pub fn with_response_schema(mut self, schema: RefOr<Schema>) -> Self {
        self.response = Some(SerializerOrSchema::Schema(schema));
        self
    }

    /// Paginates list responses with `envelope`.
    pub fn with_pagination(mut self, envelope: PaginationEnvelope) -> Self {
        self.pagination = Some(envelope);
        self
    }

    /// Adds a query parameter contributed by the filter backends.
    pub fn with_filter_parameter(mut self, parameter: Parameter) -> Self {
        self.filter_parameters.push(parameter);
        self
    }
}

impl SchemaInspector for StaticInspector {
    type Serializer = ModelSchema;

    fn request_serializer(
        &self,
        ctx: &OperationContext<'_>,
    ) -> Option<SerializerOrSchema<ModelSchema>> {
        if !matches!(*ctx.method(), Method::POST | Method::PUT | Method::PATCH) {
            return None;
        }
        self.request.clone()
    }

    fn request_body_schema(
        &self,
        _ctx: &OperationContext<'_>,
        serializer: &ModelSchema,
    ) -> Option<RefOr<Schema>> {
        Some(serializer.reference())
    }

    fn request_form_parameters(
        &self,
        _ctx: &OperationContext<'_>,
        serializer: &ModelSchema,
    ) -> Vec<RequestParameter> {
        serializer.form_fields()
    }

    fn default_response_serializer(
        &self,
        _ctx: &OperationContext<'_>,
    ) -> Option<SerializerOrSchema<ModelSchema>> {
        self.response.clone().or_else(|| self.request.clone())
    }

    fn serializer_to_schema(
        &self,
        _ctx: &OperationContext<'_>,
        serializer: &ModelSchema,
    ) -> Option<RefOr<Schema>> {
        Some(serializer.reference())
    }

    fn should_page(&self, ctx: &OperationContext<'_>) -> bool {
        self.pagination.is_some() && *ctx.method() == Method::GET && ctx.is_list_view()
    }

    fn paginated_response(
        &self,
        _ctx: &OperationContext<'_>,
        schema: &RefOr<Schema>,
    ) -> Option<RefOr<Schema>> {
        self.pagination
            .map(|envelope| envelope.wrap(schema.clone()))
    }

    fn filter_parameters(&self, _ctx: &OperationContext<'_>) -> Vec<Parameter> {
        self.filter_parameters.clone()
    }
}
