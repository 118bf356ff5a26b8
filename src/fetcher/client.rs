use crate::fetcher::{decode::decode_page, errors::FetchError, types::PageResponse};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use std::{path::Path, time::Duration};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, instrument};

const MAX_PAGE_SIZE: u64 = 5 * 1024 * 1024; // 5MB
const MAX_DOWNLOAD_SIZE: u64 = 200 * 1024 * 1024; // 200MB
const USER_AGENT: &str = "Mozilla/5.0";

/// Build the HTTP client used for outbound calls.
///
/// With `cookies` enabled the client keeps a cookie jar, which is how the
/// dashboard session is carried between requests.
pub fn build_client(cookies: bool) -> Result<Client, FetchError> {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .cookie_store(cookies)
        .build()
        .map_err(FetchError::from_reqwest_error)
}

/// Send a prepared request and decode the HTML page it returns.
///
/// Non-2xx statuses are errors: neither the dashboard nor the file host use
/// them for anything but failures.
pub async fn send_page(request: RequestBuilder) -> Result<PageResponse, FetchError> {
    let response = request
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    if let Some(content_length) = response.content_length()
        && content_length > MAX_PAGE_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body = response
        .bytes()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Content-Length may be absent
    if body.len() as u64 > MAX_PAGE_SIZE {
        return Err(FetchError::BodyTooLarge(body.len() as u64));
    }

    Ok(decode_page(final_url, status, &body, &content_type))
}

/// GET an HTML page with the given client.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(client: &Client, url: &str) -> Result<PageResponse, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    send_page(client.get(parsed_url)).await
}

/// Stream the body at `url` into a file at `dest`, returning the number of
/// bytes written. The file is created (or truncated) before the first chunk
/// arrives; removing it on failure is the caller's job.
#[instrument(skip_all, fields(url = %url))]
pub async fn download_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64, FetchError> {
    let parsed_url = url::Url::parse(url)?;
    let mut response = client
        .get(parsed_url)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http { status });
    }
    if let Some(content_length) = response.content_length()
        && content_length > MAX_DOWNLOAD_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let mut file = File::create(dest).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(FetchError::from_reqwest_error)?
    {
        written += chunk.len() as u64;
        if written > MAX_DOWNLOAD_SIZE {
            return Err(FetchError::BodyTooLarge(written));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    debug!(bytes = written, "download finished");
    Ok(written)
}
