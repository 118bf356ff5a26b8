use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{
    api::dtos::{ErrorResponse, UploadQuery, UploadResponse},
    app_state::AppState,
    entities::{LibraryEntry, Outcome},
};

#[utoipa::path(
    get,
    path = "/jonell/upload",
    tag = "reupload",
    params(UploadQuery),
    responses(
        (status = 200, description = "Song reuploaded, or rejected by the dashboard", body = UploadResponse),
        (status = 400, description = "Missing url or title", body = ErrorResponse),
        (status = 500, description = "Failed to submit form", body = ErrorResponse)
    )
)]
pub async fn upload(State(state): State<AppState>, Query(query): Query<UploadQuery>) -> Response {
    let job = match query.into_job() {
        Ok(job) => job,
        Err(error) => {
            return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response();
        }
    };

    match state.reuploader.run(&job).await {
        Ok(Outcome::Success { remote_id }) => {
            Json(UploadResponse { songid: remote_id }).into_response()
        }
        Ok(Outcome::Error { category }) => Json(ErrorResponse {
            error: category.message().to_string(),
        })
        .into_response(),
        Err(e) => {
            error!(url = %job.source_url, stage = ?e.stage(), "reupload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to submit form".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/library",
    tag = "library",
    responses(
        (status = 200, description = "Every successful reupload, oldest first", body = [LibraryEntry])
    )
)]
pub async fn library(State(state): State<AppState>) -> Json<Vec<LibraryEntry>> {
    Json(state.library.entries().await)
}
