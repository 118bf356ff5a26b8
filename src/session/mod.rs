//! The single authenticated identity used for every dashboard call.

pub mod endpoints;

pub use endpoints::DashboardEndpoints;

use reqwest::{Client, Method, StatusCode, header::HeaderMap};
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::fetcher::{FetchError, PageResponse, send_page};

#[derive(Error, Debug)]
pub enum LoginFailure {
    #[error("login rejected with status {0}")]
    Rejected(StatusCode),

    #[error("login request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Authenticated dashboard session.
///
/// The credential lives in the cookie jar of `client`; it is obtained once and
/// never refreshed. Cloning is cheap and shares the jar.
#[derive(Clone, Debug)]
pub struct Session {
    client: Client,
    endpoints: DashboardEndpoints,
}

impl Session {
    /// Log in with a form-encoded POST. Anything but a 200 is a failure.
    ///
    /// `client` must have a cookie store enabled, otherwise the credential is
    /// dropped as soon as this returns.
    #[instrument(skip_all, fields(login_url = %endpoints.login(), username = %username))]
    pub async fn authenticate(
        client: Client,
        endpoints: DashboardEndpoints,
        username: &str,
        password: &str,
    ) -> Result<Self, LoginFailure> {
        let response = client
            .post(endpoints.login().clone())
            .form(&[("userName", username), ("password", password)])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, "dashboard login rejected");
            return Err(LoginFailure::Rejected(status));
        }

        info!("Login successful");
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &DashboardEndpoints {
        &self.endpoints
    }

    /// Issue a request carrying the session state and decode the HTML reply.
    /// A `form` body is sent url-encoded, the only encoding the dashboard takes.
    pub async fn request(
        &self,
        method: Method,
        url: Url,
        form: Option<&[(&str, &str)]>,
        headers: Option<HeaderMap>,
    ) -> Result<PageResponse, FetchError> {
        let mut request = self.client.request(method, url);
        if let Some(headers) = headers {
            request = request.headers(headers);
        }
        if let Some(fields) = form {
            request = request.form(fields);
        }
        send_page(request).await
    }

    pub async fn get(&self, url: Url) -> Result<PageResponse, FetchError> {
        self.request(Method::GET, url, None, None).await
    }

    pub async fn post_form(
        &self,
        url: Url,
        fields: &[(&str, &str)],
    ) -> Result<PageResponse, FetchError> {
        self.request(Method::POST, url, Some(fields), None).await
    }
}
