//! Assembling utoipa operations from the classifier and the schema adjuster.

use std::fmt;

use http::Method;
use tracing::{debug, warn};
use utoipa::openapi::path::{Operation, OperationBuilder, PathItemBuilder};
use utoipa::openapi::request_body::{RequestBody, RequestBodyBuilder};
use utoipa::openapi::schema::{ObjectBuilder, Type};
use utoipa::openapi::{Content, Paths, RefOr, Required, ResponseBuilder, Schema};

use crate::BulkSpecError;
use crate::heuristics::is_form_media_type;
use crate::key::{OperationKey, OperationKeyClassifier};
use crate::schema::{BulkAwareSchema, OperationContext, RequestParameter, SchemaInspector};
use crate::view::RouteContext;

const JSON_MEDIA_TYPE: &str = "application/json";

/// An operation ready to be inserted in the document.
#[derive(Debug, Clone)]
pub struct AssembledOperation {
    /// The key grouping the operation.
    pub key: OperationKey,
    /// The route path.
    pub path: String,
    /// The HTTP method.
    pub method: Method,
    /// The utoipa operation.
    pub operation: Operation,
}

impl AssembledOperation {
    /// Inserts the operation in `paths`, next to the other methods of its path.
    ///
    /// Methods without a slot in a path item (`CONNECT`, extensions) are skipped.
    pub fn insert_into(self, paths: &mut Paths) {
        let item = paths
            .paths
            .entry(self.path)
            .or_insert_with(|| PathItemBuilder::new().build());

        let slot = match self.method {
            Method::GET => &mut item.get,
            Method::PUT => &mut item.put,
            Method::POST => &mut item.post,
            Method::DELETE => &mut item.delete,
            Method::OPTIONS => &mut item.options,
            Method::HEAD => &mut item.head,
            Method::PATCH => &mut item.patch,
            Method::TRACE => &mut item.trace,
            _ => {
                warn!(
                    method = %self.method,
                    key = %self.key,
                    "no path item slot for method, skipping"
                );
                return;
            }
        };
        *slot = Some(self.operation);
    }
}

/// Builds utoipa [`Operation`]s for routes.
///
/// The operation id and the tag come from the [`OperationKey`], the request body,
/// responses and filter parameters from the [`BulkAwareSchema`]. Both sides use
/// the classifier's list-view detector.
#[derive(Clone)]
pub struct OperationAssembler<'a> {
    classifier: &'a dyn OperationKeyClassifier,
    consumes: Vec<String>,
}

impl fmt::Debug for OperationAssembler<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationAssembler")
            .field("consumes", &self.consumes)
            .finish_non_exhaustive()
    }
}

impl<'a> OperationAssembler<'a> {
    /// Creates an assembler consuming JSON.
    pub fn new(classifier: &'a dyn OperationKeyClassifier) -> Self {
        Self {
            classifier,
            consumes: vec![JSON_MEDIA_TYPE.to_string()],
        }
    }

    /// Replaces the media types accepted for request bodies.
    pub fn with_consumes<S>(mut self, consumes: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.consumes = consumes.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the operation of `route`.
    ///
    /// # Errors
    ///
    /// Propagates [`BulkSpecError::SchemaConflict`] from the request body shaping.
    pub fn assemble<I>(
        &self,
        route: RouteContext<'_>,
        inspector: &I,
    ) -> Result<AssembledOperation, BulkSpecError>
    where
        I: SchemaInspector,
    {
        let key = self.classifier.operation_key(&route);
        let ctx = OperationContext::new(route).with_detector(self.classifier.detector());
        let schema = BulkAwareSchema::new(ctx, inspector);

        let parameters = schema.request_body_parameters(&self.consumes)?;
        let request_body = self.build_request_body(parameters);

        let mut builder = OperationBuilder::new()
            .operation_id(Some(key.operation_id()))
            .tags(Some(vec![key.tag().to_string()]))
            .request_body(request_body);

        for (status, response_schema) in schema.default_responses() {
            let mut response = ResponseBuilder::new().description("");
            if let Some(response_schema) = response_schema {
                let content = Content::builder().schema(Some(response_schema)).build();
                response = response.content(JSON_MEDIA_TYPE, content);
            }
            builder = builder.response(status, response.build());
        }

        if schema.should_include_filter_parameters() {
            let filters = inspector.filter_parameters(&ctx);
            if !filters.is_empty() {
                builder = builder.parameters(Some(filters));
            }
        }

        debug!(path = route.subpath, method = %route.method, %key, "operation assembled");
        Ok(AssembledOperation {
            key,
            path: route.subpath.to_string(),
            method: route.method.clone(),
            operation: builder.build(),
        })
    }

    fn build_request_body(&self, parameters: Vec<RequestParameter>) -> Option<RequestBody> {
        let (body, fields): (Vec<_>, Vec<_>) =
            parameters.into_iter().partition(RequestParameter::is_body);

        if let Some(body) = body.into_iter().next() {
            let builder = self
                .consumes
                .iter()
                .filter(|media_type| !is_form_media_type(media_type))
                .fold(RequestBodyBuilder::new(), |builder, media_type| {
                    let content = Content::builder().schema(Some(body.schema.clone())).build();
                    builder.content(media_type.as_str(), content)
                });
            return Some(builder.required(Some(Required::True)).build());
        }

        if fields.is_empty() {
            return None;
        }

        let form = fields
            .iter()
            .fold(
                ObjectBuilder::new().schema_type(Type::Object),
                |builder, field| {
                    let builder = builder.property(field.name.as_str(), field.schema.clone());
                    if field.required {
                        builder.required(field.name.as_str())
                    } else {
                        builder
                    }
                },
            )
            .build();
        let form: RefOr<Schema> = RefOr::T(Schema::Object(form));

        let builder = self
            .consumes
            .iter()
            .filter(|media_type| is_form_media_type(media_type))
            .fold(RequestBodyBuilder::new(), |builder, media_type| {
                let content = Content::builder().schema(Some(form.clone())).build();
                builder.content(media_type.as_str(), content)
            });
        Some(builder.build())
    }
}
