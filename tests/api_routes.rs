mod helpers;

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use helpers::{Harness, html, mount_reupload};
use reuploader::{api, app_state::AppState, entities::LibraryEntry, library::LibraryStore};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{any, method, path},
};

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn app(harness: &Harness) -> Router {
    api::routes(AppState::new(harness.reuploader().await))
}

fn upload_uri(url: &str, title: &str) -> String {
    format!(
        "/jonell/upload?url={}&title={}",
        helpers::form_encoded(url),
        helpers::form_encoded(title)
    )
}

#[tokio::test]
async fn test_missing_parameters_make_no_outbound_calls() {
    let harness = Harness::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&harness.extractor)
        .await;
    Mock::given(method("GET"))
        .and(path(helpers::REUPLOAD_PATH))
        .respond_with(html("<form></form>"))
        .expect(0)
        .mount(&harness.dashboard)
        .await;
    let app = app(&harness).await;

    for uri in [
        "/jonell/upload",
        "/jonell/upload?url=https%3A%2F%2Fyoutu.be%2Fabc",
        "/jonell/upload?title=Jumper",
        "/jonell/upload?url=&title=Jumper",
    ] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({ "error": "Missing url or title" }));
    }
}

#[tokio::test]
async fn test_upload_success_returns_songid() {
    let harness = Harness::start().await;
    mount_reupload(&harness.dashboard, "<p>Song Reuploaded: 12345</p>", 1).await;
    let app = app(&harness).await;

    let (status, body) = get(app.clone(), &upload_uri("https://youtu.be/abc", "Jumper")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "songid": "12345" }));

    let (status, body) = get(app, "/library").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "title": "Jumper", "url": "https://youtu.be/abc", "songId": "12345" }])
    );
}

#[tokio::test]
async fn test_classified_errors_are_200() {
    for (marker, message) in [
        ("-3", "This song has been reuploaded already"),
        ("-2", "Invalid URL"),
        ("-1", "An unknown error has occurred"),
    ] {
        let harness = Harness::start().await;
        mount_reupload(
            &harness.dashboard,
            &format!("<p>An error has occured: {marker}</p>"),
            1,
        )
        .await;

        let (status, body) = get(app(&harness).await, &upload_uri("https://youtu.be/a", "T")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "error": message }));
    }
}

#[tokio::test]
async fn test_pipeline_failure_is_500() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/extract"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&harness.extractor)
        .await;

    let (status, body) = get(
        app(&harness).await,
        &upload_uri("https://soundcloud.test/a/b", "Stereo Madness"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to submit form" }));
}

#[tokio::test]
async fn test_library_survives_restart() {
    let harness = Harness::start().await;
    Mock::given(method("GET"))
        .and(path(helpers::REUPLOAD_PATH))
        .respond_with(html("<form></form>"))
        .mount(&harness.dashboard)
        .await;
    Mock::given(method("POST"))
        .and(path(helpers::REUPLOAD_PATH))
        .respond_with(html("<p>Song Reuploaded: 42</p>"))
        .expect(3)
        .mount(&harness.dashboard)
        .await;

    let first = app(&harness).await;
    for title in ["One", "Two", "Three"] {
        let (status, _) = get(first.clone(), &upload_uri("https://youtu.be/x", title)).await;
        assert_eq!(status, StatusCode::OK);
    }
    drop(first);

    // a fresh process: reload from disk
    let library = Arc::new(LibraryStore::load(harness.library_path()).await.unwrap());
    let restarted = api::routes(AppState::new(harness.reuploader_with(library).await));
    let (status, body) = get(restarted, "/library").await;

    assert_eq!(status, StatusCode::OK);
    let entries: Vec<LibraryEntry> = serde_json::from_value(body).unwrap();
    let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["One", "Two", "Three"]);
}

#[tokio::test]
async fn test_health_reports_library_size() {
    let harness = Harness::start().await;
    let (status, body) = get(app(&harness).await, "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "OK", "library_entries": 0 }));
}

#[tokio::test]
async fn test_full_app_sets_request_id() {
    let harness = Harness::start().await;
    let app = api::app(AppState::new(harness.reuploader().await));

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
