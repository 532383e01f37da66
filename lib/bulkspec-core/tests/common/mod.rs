use bulkspec_core::{GeneratorConfig, ModelSchema, RouteView};
use http::Method;
use rstest::fixture;
use tracing::info;
use utoipa::ToSchema;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub fn config() -> GeneratorConfig {
    init_tracing();
    GeneratorConfig::default()
}

#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
}

#[fixture]
pub fn user() -> ModelSchema {
    ModelSchema::of::<User>()
}

/// The collection route of a bulk viewset: list, create and the four bulk actions.
pub fn bulk_collection_view(action: &str) -> RouteView {
    RouteView::viewset(action)
        .with_detail(false)
        .with_action_map([
            (Method::GET, "list"),
            (Method::POST, "bulk_create"),
            (Method::PUT, "bulk_update"),
            (Method::PATCH, "partial_bulk_update"),
            (Method::DELETE, "bulk_destroy"),
        ])
        .with_filter_backend("SearchFilter")
}
