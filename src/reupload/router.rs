use std::fmt::{Display, Formatter};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entities::Job;

/// URLs the dashboard can import by itself.
pub const DEFAULT_DIRECT_HOST_PATTERN: &str =
    r"(?i)^https?://([a-z0-9-]+\.)*(youtube\.com|youtu\.be)(:\d+)?(/|\?|$)";

static DEFAULT_DIRECT_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_DIRECT_HOST_PATTERN).unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineChoice {
    Direct,
    AudioRehost,
}

impl Display for PipelineChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => f.write_str("direct"),
            Self::AudioRehost => f.write_str("audio_rehost"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JobRouter {
    direct_host: Regex,
}

impl JobRouter {
    pub fn new(direct_host_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            direct_host: Regex::new(direct_host_pattern)?,
        })
    }

    pub fn route(&self, job: &Job) -> PipelineChoice {
        if self.direct_host.is_match(job.source_url.trim()) {
            PipelineChoice::Direct
        } else {
            PipelineChoice::AudioRehost
        }
    }
}

impl Default for JobRouter {
    fn default() -> Self {
        Self {
            direct_host: DEFAULT_DIRECT_HOST.clone(),
        }
    }
}
