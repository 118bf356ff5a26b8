pub mod dtos;
pub mod handlers;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{app_state::AppState, health};

#[derive(OpenApi)]
#[openapi(
    paths(handlers::upload, handlers::library, health::health_check),
    components(schemas(
        dtos::UploadResponse,
        dtos::ErrorResponse,
        crate::entities::LibraryEntry,
        health::HealthResponse
    )),
    tags(
        (name = "reupload", description = "Submit media to the dashboard"),
        (name = "library", description = "Successful reuploads"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Routes without docs or middleware; what the integration tests drive.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/jonell/upload", get(handlers::upload))
        .route("/library", get(handlers::library))
        .route("/healthz", get(health::health_check))
        .with_state(state)
}

/// Full application router.
pub fn app(state: AppState) -> Router {
    routes(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
