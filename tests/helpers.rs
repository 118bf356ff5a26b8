#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use reuploader::{
    library::LibraryStore,
    reupload::{JobRouter, RehostPipeline, RehostSettings, Reuploader},
    fetcher::build_client,
    session::{DashboardEndpoints, Session},
};
use serde_json::json;
use tempfile::TempDir;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

pub const SESSION_COOKIE: &str = "PHPSESSID=test-session";
pub const REUPLOAD_PATH: &str = "/reupload/songAdd.php";
pub const AUDIO_BYTES: &[u8] = b"ID3\x03\x00fake-audio-frames";

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{body}</body></html>"),
        "text/html; charset=utf-8",
    )
}

pub fn form_encoded(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Mock dashboard, extraction service and file host plus scratch space.
pub struct Harness {
    pub dashboard: MockServer,
    pub extractor: MockServer,
    pub file_host: MockServer,
    pub dir: TempDir,
}

impl Harness {
    pub async fn start() -> Self {
        let harness = Self {
            dashboard: MockServer::start().await,
            extractor: MockServer::start().await,
            file_host: MockServer::start().await,
            dir: tempfile::tempdir().unwrap(),
        };
        mount_login(&harness.dashboard, 200).await;
        harness
    }

    pub fn library_path(&self) -> std::path::PathBuf {
        self.dir.path().join("library.json")
    }

    pub fn transient_dir(&self) -> std::path::PathBuf {
        let dir = self.dir.path().join("transient");
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn endpoints(&self) -> DashboardEndpoints {
        DashboardEndpoints::new(&self.dashboard.uri()).unwrap()
    }

    pub async fn session(&self) -> Session {
        Session::authenticate(build_client(true).unwrap(), self.endpoints(), "harold", "pw")
            .await
            .unwrap()
    }

    pub fn rehost_settings(&self) -> RehostSettings {
        RehostSettings {
            extractor_url: Url::parse(&format!("{}/extract", self.extractor.uri())).unwrap(),
            extractor_version: "v1".to_string(),
            file_host: Url::parse(&format!("{}/", self.file_host.uri())).unwrap(),
            transient_dir: self.transient_dir(),
        }
    }

    pub async fn library(&self) -> Arc<LibraryStore> {
        Arc::new(LibraryStore::load(self.library_path()).await.unwrap())
    }

    pub async fn reuploader_with(&self, library: Arc<LibraryStore>) -> Reuploader {
        let rehost = RehostPipeline::new(build_client(false).unwrap(), self.rehost_settings());
        Reuploader::new(self.session().await, JobRouter::default(), rehost, library)
    }

    pub async fn reuploader(&self) -> Reuploader {
        let library = self.library().await;
        self.reuploader_with(library).await
    }

    /// URL the file host mock ends up publishing the audio under.
    pub fn final_audio_url(&self) -> String {
        format!("{}/d/xyz/track.mp3", self.file_host.uri())
    }

    /// Extraction service and file host both behaving.
    pub async fn mount_rehost_happy_path(&self, source_url: &str) {
        mount_extractor(&self.extractor, source_url).await;
        mount_file_host(&self.file_host).await;
    }
}

pub async fn mount_login(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/login/login.php"))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("set-cookie", format!("{SESSION_COOKIE}; Path=/").as_str())
                .set_body_raw("<p>Logged in</p>", "text/html"),
        )
        .mount(server)
        .await;
}

/// Reupload form GET plus a POST answering with `result_body`.
pub async fn mount_reupload(server: &MockServer, result_body: &str, expected_posts: u64) {
    Mock::given(method("GET"))
        .and(path(REUPLOAD_PATH))
        .respond_with(html(r#"<form method="post"><input name="url"><input name="title"></form>"#))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(REUPLOAD_PATH))
        .respond_with(html(result_body))
        .expect(expected_posts)
        .mount(server)
        .await;
}

pub async fn mount_extractor(server: &MockServer, source_url: &str) {
    Mock::given(method("GET"))
        .and(path("/extract"))
        .and(query_param("url", source_url))
        .and(query_param("version", "v1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "audio": format!("{}/media/track.mp3", server.uri()) })),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/track.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(AUDIO_BYTES.to_vec(), "audio/mpeg"))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_file_host(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<form action="/upload.php" method="post" enctype="multipart/form-data">
                 <input type="file" name="file"></form>"#,
        ))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/upload.php"))
        .respond_with(html(r#"<a class="share-link" href="/s/xyz">Your file</a>"#))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/s/xyz"))
        .respond_with(html(r#"<input class="share-link" value="/d/xyz/track.mp3">"#))
        .expect(1)
        .mount(server)
        .await;
}

pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
