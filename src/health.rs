use axum::{Json, extract::State};
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::app_state::AppState;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    library_entries: usize,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let library_entries = state.library.len().await;
    debug!(library_entries, "health check");
    Json(HealthResponse {
        status: "OK".to_string(),
        library_entries,
    })
}
