use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::Job;

/// Query string of `GET /jonell/upload`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Media to reupload.
    pub url: Option<String>,
    /// Title to store it under.
    pub title: Option<String>,
}

impl UploadQuery {
    /// Empty values count as missing.
    pub fn into_job(self) -> Result<Job, String> {
        match (non_empty(self.url), non_empty(self.title)) {
            (Some(url), Some(title)) => Ok(Job::new(url, title)),
            _ => Err("Missing url or title".to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub songid: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
