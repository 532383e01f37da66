use http::Method;
use indexmap::IndexMap;
use tracing::{debug, warn};
use utoipa::openapi::{RefOr, Schema};

use super::OperationContext;
use super::inspector::{SchemaInspector, SerializerOrSchema};
use super::parameter::{RequestParameter, array_of};
use crate::BulkSpecError;
use crate::action::BULK_DESTROY;
use crate::heuristics::{guess_response_status, is_form_media_type};

/// Default responses of an operation: status code to schema.
///
/// The schema is `None` when the operation documents no response body.
pub type DefaultResponses = IndexMap<String, Option<RefOr<Schema>>>;

/// Request and response shaping aware of bulk actions.
///
/// Bulk endpoints take and return lists of resources, so their body schemas are
/// wrapped in arrays. `bulk_destroy` brings its own selection of the resources to
/// delete, so filter backends are not advertised for it.
///
/// # Example
///
/// ```rust
/// use bulkspec_core::{BulkAwareSchema, ModelSchema, OperationContext, RouteContext};
/// use bulkspec_core::{RouteView, StaticInspector};
/// use http::Method;
/// use utoipa::openapi::{Ref, RefOr};
///
/// let user = ModelSchema::new("User", RefOr::Ref(Ref::from_schema_name("User")));
/// let inspector = StaticInspector::new().with_request_model(user);
///
/// let view = RouteView::viewset("bulk_create");
/// let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));
/// let schema = BulkAwareSchema::new(ctx, &inspector);
///
/// let parameters = schema.request_body_parameters(&["application/json"])?;
/// assert_eq!(parameters.len(), 1);
/// # Ok::<(), bulkspec_core::BulkSpecError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BulkAwareSchema<'a, I> {
    ctx: OperationContext<'a>,
    inspector: &'a I,
}

impl<'a, I> BulkAwareSchema<'a, I>
where
    I: SchemaInspector,
{
    /// Creates the adjuster for one operation.
    pub fn new(ctx: OperationContext<'a>, inspector: &'a I) -> Self {
        Self { ctx, inspector }
    }

    /// The operation being documented.
    pub fn context(&self) -> &OperationContext<'a> {
        &self.ctx
    }

    /// The request body parameters of the operation.
    ///
    /// Returns either a single body parameter, one parameter per form field when
    /// any of `consumes` is a form encoding, or nothing when the operation has no
    /// request serializer. A body schema derived for a bulk action is wrapped in
    /// an array; a schema set directly on the operation is used as is.
    ///
    /// # Errors
    ///
    /// Returns [`BulkSpecError::SchemaConflict`] when the operation consumes a form
    /// encoding but its request body already resolves to a schema.
    pub fn request_body_parameters<S>(
        &self,
        consumes: &[S],
    ) -> Result<Vec<RequestParameter>, BulkSpecError>
    where
        S: AsRef<str>,
    {
        let Some(serializer) = self.inspector.request_serializer(&self.ctx) else {
            return Ok(Vec::new());
        };

        let is_form = consumes
            .iter()
            .any(|media_type| is_form_media_type(media_type.as_ref()));

        let schema = match serializer {
            SerializerOrSchema::Schema(schema) => {
                if is_form {
                    warn!(
                        path = self.ctx.path(),
                        method = %self.ctx.method(),
                        "form request body cannot be a schema"
                    );
                    return Err(BulkSpecError::SchemaConflict {
                        path: self.ctx.path().to_string(),
                        method: self.ctx.method().clone(),
                    });
                }
                Some(schema)
            }
            SerializerOrSchema::Serializer(serializer) => {
                if is_form {
                    return Ok(self
                        .inspector
                        .request_form_parameters(&self.ctx, &serializer));
                }

                let schema = self.inspector.request_body_schema(&self.ctx, &serializer);
                if self.ctx.is_bulk_action() {
                    debug!(
                        path = self.ctx.path(),
                        action = self.ctx.action(),
                        "bulk request body, documenting a list"
                    );
                    schema.map(array_of)
                } else {
                    schema
                }
            }
        };

        Ok(schema.map(RequestParameter::body).into_iter().collect())
    }

    /// The default response of the operation, keyed by its guessed status code.
    ///
    /// Only `GET`, `POST`, `PUT` and `PATCH` document a response body. The body is
    /// an array for `GET` list views and for bulk views, then wrapped in the
    /// pagination envelope when the operation is paginated.
    pub fn default_responses(&self) -> DefaultResponses {
        let method = self.ctx.method();
        let status = guess_response_status(method);

        let source = if matches!(
            *method,
            Method::GET | Method::POST | Method::PUT | Method::PATCH
        ) {
            self.inspector.default_response_serializer(&self.ctx)
        } else {
            None
        };

        let schema = source
            .and_then(|source| match source {
                SerializerOrSchema::Schema(schema) => Some(schema),
                SerializerOrSchema::Serializer(serializer) => {
                    self.inspector.serializer_to_schema(&self.ctx, &serializer)
                }
            })
            .map(|schema| self.shape_response(schema));

        IndexMap::from([(status.to_string(), schema)])
    }

    fn shape_response(&self, schema: RefOr<Schema>) -> RefOr<Schema> {
        let is_list_get = *self.ctx.method() == Method::GET && self.ctx.is_list_view();
        let schema = if is_list_get || self.ctx.is_bulk_view() {
            array_of(schema)
        } else {
            schema
        };

        if !self.inspector.should_page(&self.ctx) {
            return schema;
        }

        self.inspector
            .paginated_response(&self.ctx, &schema)
            .unwrap_or(schema)
    }

    /// Whether the filter backends' query parameters apply to this operation.
    ///
    /// Only `GET` and `DELETE` list views of a view with filter backends qualify,
    /// `bulk_destroy` excepted.
    pub fn should_include_filter_parameters(&self) -> bool {
        let view = self.ctx.view();
        if !view.has_filter_backends() {
            return false;
        }

        if view.action() == Some(BULK_DESTROY) {
            return false;
        }

        if !matches!(*self.ctx.method(), Method::GET | Method::DELETE) {
            return false;
        }

        self.ctx.is_list_view()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use utoipa::openapi::Ref;

    use super::*;
    use crate::schema::{ModelSchema, PaginationEnvelope, StaticInspector};
    use crate::view::{RouteContext, RouteView};

    fn user() -> ModelSchema {
        ModelSchema::new("User", RefOr::Ref(Ref::from_schema_name("User")))
    }

    fn to_json(schema: &RefOr<Schema>) -> serde_json::Value {
        serde_json::to_value(schema).expect("schema should serialize")
    }

    #[test]
    fn should_return_no_body_without_serializer() {
        let inspector = StaticInspector::new();
        let view = RouteView::viewset("create");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));

        let parameters = BulkAwareSchema::new(ctx, &inspector)
            .request_body_parameters(&["application/json"])
            .expect("no conflict");

        assert!(parameters.is_empty());
    }

    #[test]
    fn should_keep_single_body_for_plain_create() {
        let inspector = StaticInspector::new().with_request_model(user());
        let view = RouteView::viewset("create");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));

        let parameters = BulkAwareSchema::new(ctx, &inspector)
            .request_body_parameters(&["application/json"])
            .expect("no conflict");

        assert_eq!(parameters, [RequestParameter::body(user().reference())]);
    }

    #[test]
    fn should_wrap_bulk_body_in_array() {
        let inspector = StaticInspector::new().with_request_model(user());
        let view = RouteView::viewset("partial_bulk_update");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::PATCH, &view));

        let parameters = BulkAwareSchema::new(ctx, &inspector)
            .request_body_parameters(&["application/json"])
            .expect("no conflict");

        assert_eq!(parameters.len(), 1);
        assert!(parameters[0].is_body());
        assert_eq!(
            to_json(&parameters[0].schema),
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/User" } })
        );
    }

    #[test]
    fn should_return_no_body_when_bulk_schema_is_not_derived() {
        struct Unconvertible;
        impl SchemaInspector for Unconvertible {
            type Serializer = ();

            fn request_serializer(
                &self,
                _ctx: &OperationContext<'_>,
            ) -> Option<SerializerOrSchema<()>> {
                Some(SerializerOrSchema::Serializer(()))
            }

            fn request_body_schema(
                &self,
                _ctx: &OperationContext<'_>,
                _serializer: &(),
            ) -> Option<RefOr<Schema>> {
                None
            }

            fn request_form_parameters(
                &self,
                _ctx: &OperationContext<'_>,
                _serializer: &(),
            ) -> Vec<RequestParameter> {
                Vec::new()
            }

            fn default_response_serializer(
                &self,
                _ctx: &OperationContext<'_>,
            ) -> Option<SerializerOrSchema<()>> {
                None
            }

            fn serializer_to_schema(
                &self,
                _ctx: &OperationContext<'_>,
                _serializer: &(),
            ) -> Option<RefOr<Schema>> {
                None
            }
        }

        let view = RouteView::viewset("bulk_create");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));

        let parameters = BulkAwareSchema::new(ctx, &Unconvertible)
            .request_body_parameters(&["application/json"])
            .expect("no conflict");

        assert!(parameters.is_empty());
    }

    #[test]
    fn should_not_wrap_direct_schema() {
        let inspector = StaticInspector::new().with_request_schema(user().reference());
        let view = RouteView::viewset("bulk_create");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));

        let parameters = BulkAwareSchema::new(ctx, &inspector)
            .request_body_parameters(&["application/json"])
            .expect("no conflict");

        assert_eq!(parameters, [RequestParameter::body(user().reference())]);
    }

    #[test]
    fn should_reject_form_with_direct_schema() {
        let inspector = StaticInspector::new().with_request_schema(user().reference());
        let view = RouteView::viewset("create");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));

        let result = BulkAwareSchema::new(ctx, &inspector)
            .request_body_parameters(&["application/json", "multipart/form-data"]);

        assert!(matches!(
            result,
            Err(BulkSpecError::SchemaConflict { ref path, ref method })
                if path == "/users/" && *method == Method::POST
        ));
    }

    #[test]
    fn should_return_empty_responses_for_delete() {
        let inspector = StaticInspector::new().with_response_model(user());
        let view = RouteView::viewset("destroy");
        let ctx = OperationContext::new(RouteContext::new("/users/{pk}/", &Method::DELETE, &view));

        let responses = BulkAwareSchema::new(ctx, &inspector).default_responses();

        let expected: DefaultResponses = IndexMap::from([("204".to_string(), None)]);
        assert_eq!(responses, expected);
    }

    #[test]
    fn should_keep_single_response_for_retrieve() {
        let inspector = StaticInspector::new().with_response_model(user());
        let view = RouteView::viewset("retrieve");
        let ctx = OperationContext::new(RouteContext::new("/users/{pk}/", &Method::GET, &view));

        let responses = BulkAwareSchema::new(ctx, &inspector).default_responses();

        assert_eq!(
            responses,
            IndexMap::from([("200".to_string(), Some(user().reference()))])
        );
    }

    #[test]
    fn should_wrap_list_response_in_array() {
        let inspector = StaticInspector::new().with_response_model(user());
        let view = RouteView::viewset("list");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::GET, &view));

        let responses = BulkAwareSchema::new(ctx, &inspector).default_responses();

        let schema = responses["200"].as_ref().expect("list response");
        assert_eq!(
            to_json(schema),
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/User" } })
        );
    }

    #[test]
    fn should_not_wrap_plain_create_response() {
        let inspector = StaticInspector::new().with_response_model(user());
        let view = RouteView::viewset("create");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));

        let responses = BulkAwareSchema::new(ctx, &inspector).default_responses();

        assert_eq!(
            responses,
            IndexMap::from([("201".to_string(), Some(user().reference()))])
        );
    }

    #[test]
    fn should_wrap_bulk_response_in_array() {
        let inspector = StaticInspector::new().with_response_model(user());
        let view = RouteView::viewset("bulk_create").with_detail(false);
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));

        let responses = BulkAwareSchema::new(ctx, &inspector).default_responses();

        let schema = responses["201"].as_ref().expect("bulk response");
        assert!(matches!(schema, RefOr::T(Schema::Array(_))));
    }

    #[test]
    fn should_paginate_list_response() {
        let inspector = StaticInspector::new()
            .with_response_model(user())
            .with_pagination(PaginationEnvelope::CountNextPrevious);
        let view = RouteView::viewset("list");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::GET, &view));

        let responses = BulkAwareSchema::new(ctx, &inspector).default_responses();

        let schema = responses["200"].as_ref().expect("paginated response");
        let value = to_json(schema);
        assert_eq!(
            value["properties"]["results"],
            json!({ "type": "array", "items": { "$ref": "#/components/schemas/User" } })
        );
        assert_eq!(value["required"], json!(["count", "results"]));
    }

    #[test]
    fn should_filter_list_get() {
        let inspector = StaticInspector::new();
        let view = RouteView::viewset("list").with_filter_backend("SearchFilter");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::GET, &view));

        assert!(BulkAwareSchema::new(ctx, &inspector).should_include_filter_parameters());
    }

    #[test]
    fn should_not_filter_bulk_destroy() {
        let inspector = StaticInspector::new();
        let view = RouteView::viewset("bulk_destroy")
            .with_detail(false)
            .with_filter_backend("SearchFilter");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::DELETE, &view));

        assert!(ctx.is_list_view());
        assert!(!BulkAwareSchema::new(ctx, &inspector).should_include_filter_parameters());
    }

    #[test]
    fn should_not_filter_without_backends_or_on_writes() {
        let inspector = StaticInspector::new();

        let view = RouteView::viewset("list");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::GET, &view));
        assert!(!BulkAwareSchema::new(ctx, &inspector).should_include_filter_parameters());

        let view = RouteView::viewset("create").with_filter_backend("SearchFilter");
        let ctx = OperationContext::new(RouteContext::new("/users/", &Method::POST, &view));
        assert!(!BulkAwareSchema::new(ctx, &inspector).should_include_filter_parameters());

        let view = RouteView::viewset("retrieve").with_filter_backend("SearchFilter");
        let ctx = OperationContext::new(RouteContext::new("/users/{pk}/", &Method::GET, &view));
        assert!(!BulkAwareSchema::new(ctx, &inspector).should_include_filter_parameters());
    }
}
