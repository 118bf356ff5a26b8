use reqwest::StatusCode;
use url::Url;

/// A decoded HTML page returned by the dashboard or the file host.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub url_final: Url,
    pub status: StatusCode,
    pub body_utf8: String,
}
