use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single reupload request: media at `source_url` to be stored under `title`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub source_url: String,
    pub title: String,
}

impl Job {
    pub fn new(source_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            title: title.into(),
        }
    }
}

/// Failure categories the dashboard reports in its response page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Duplicate,
    InvalidSource,
    Unknown,
}

impl ErrorCategory {
    /// Message handed back to API clients.
    pub fn message(self) -> &'static str {
        match self {
            Self::Duplicate => "This song has been reuploaded already",
            Self::InvalidSource => "Invalid URL",
            Self::Unknown => "An unknown error has occurred",
        }
    }
}

/// Result of one reupload as reported by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { remote_id: String },
    Error { category: ErrorCategory },
}

impl Outcome {
    pub fn success(remote_id: impl Into<String>) -> Self {
        Self::Success {
            remote_id: remote_id.into(),
        }
    }

    pub fn error(category: ErrorCategory) -> Self {
        Self::Error { category }
    }

    pub fn remote_id(&self) -> Option<&str> {
        match self {
            Self::Success { remote_id } => Some(remote_id),
            Self::Error { .. } => None,
        }
    }
}

/// --- Persisted ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LibraryEntry {
    pub title: String,
    pub url: String, // the job's source url, not the rehosted link
    #[serde(rename = "songId")]
    pub song_id: String,
}

impl LibraryEntry {
    pub fn new(job: &Job, song_id: impl Into<String>) -> Self {
        Self {
            title: job.title.clone(),
            url: job.source_url.clone(),
            song_id: song_id.into(),
        }
    }
}
