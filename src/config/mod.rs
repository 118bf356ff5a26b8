//! Configuration handling for the service.
//!
//! Everything comes from environment variables with development defaults,
//! except the dashboard credentials which have no sensible default.
//! `Config::from_env` validates what it reads so the binary fails before it
//! logs in or binds a socket.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use url::Url;

use crate::reupload::{DEFAULT_DIRECT_HOST_PATTERN, JobRouter, RehostSettings};
use crate::session::DashboardEndpoints;

/// Environment variable names.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_DASHBOARD_URL: &str = "DASHBOARD_URL";
pub const ENV_DASHBOARD_USERNAME: &str = "DASHBOARD_USERNAME";
pub const ENV_DASHBOARD_PASSWORD: &str = "DASHBOARD_PASSWORD";
pub const ENV_LIBRARY_PATH: &str = "LIBRARY_PATH";
pub const ENV_TRANSIENT_DIR: &str = "TRANSIENT_DIR";
pub const ENV_AUDIO_EXTRACTOR_URL: &str = "AUDIO_EXTRACTOR_URL";
pub const ENV_AUDIO_EXTRACTOR_VERSION: &str = "AUDIO_EXTRACTOR_VERSION";
pub const ENV_FILE_HOST_URL: &str = "FILE_HOST_URL";
pub const ENV_DIRECT_HOST_PATTERN: &str = "DIRECT_HOST_PATTERN";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_DASHBOARD_URL: &str = "https://geodash.click/dashboard";
const DEFAULT_LIBRARY_PATH: &str = "library.json";
const DEFAULT_AUDIO_EXTRACTOR_URL: &str = "http://127.0.0.1:8081/extract";
const DEFAULT_AUDIO_EXTRACTOR_VERSION: &str = "v1";
const DEFAULT_FILE_HOST_URL: &str = "http://127.0.0.1:8082/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    bind_addr: String,
    dashboard_url: String,
    username: String,
    password: String,
    library_path: PathBuf,
    transient_dir: PathBuf,
    extractor_url: Url,
    extractor_version: String,
    file_host_url: Url,
    direct_host_pattern: String,
    log_format: LogFormat,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| env::var(key).unwrap_or_else(|_| default.to_string());

        let username = required(ENV_DASHBOARD_USERNAME)?;
        let password = required(ENV_DASHBOARD_PASSWORD)?;

        let dashboard_url = var(ENV_DASHBOARD_URL, DEFAULT_DASHBOARD_URL);
        DashboardEndpoints::new(&dashboard_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_DASHBOARD_URL,
            reason: e.to_string(),
        })?;

        let direct_host_pattern = var(ENV_DIRECT_HOST_PATTERN, DEFAULT_DIRECT_HOST_PATTERN);
        JobRouter::new(&direct_host_pattern).map_err(|e| ConfigError::InvalidValue {
            field: ENV_DIRECT_HOST_PATTERN,
            reason: e.to_string(),
        })?;

        let log_format = match var(ENV_LOG_FORMAT, "pretty").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" | "text" => LogFormat::Pretty,
            other => {
                return Err(ConfigError::InvalidValue {
                    field: ENV_LOG_FORMAT,
                    reason: format!("expected 'json' or 'pretty', got '{other}'"),
                });
            }
        };

        Ok(Self {
            bind_addr: var(ENV_BIND_ADDR, DEFAULT_BIND_ADDR),
            dashboard_url,
            username,
            password,
            library_path: PathBuf::from(var(ENV_LIBRARY_PATH, DEFAULT_LIBRARY_PATH)),
            transient_dir: env::var_os(ENV_TRANSIENT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            extractor_url: url_var(ENV_AUDIO_EXTRACTOR_URL, DEFAULT_AUDIO_EXTRACTOR_URL)?,
            extractor_version: var(ENV_AUDIO_EXTRACTOR_VERSION, DEFAULT_AUDIO_EXTRACTOR_VERSION),
            file_host_url: url_var(ENV_FILE_HOST_URL, DEFAULT_FILE_HOST_URL)?,
            direct_host_pattern,
            log_format,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn password(&self) -> &str {
        &self.password
    }
    /// Path of the JSON library file.
    pub fn library_path(&self) -> &Path {
        &self.library_path
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    pub fn dashboard_endpoints(&self) -> Result<DashboardEndpoints, ConfigError> {
        DashboardEndpoints::new(&self.dashboard_url).map_err(|e| ConfigError::InvalidValue {
            field: ENV_DASHBOARD_URL,
            reason: e.to_string(),
        })
    }

    pub fn job_router(&self) -> Result<JobRouter, ConfigError> {
        JobRouter::new(&self.direct_host_pattern).map_err(|e| ConfigError::InvalidValue {
            field: ENV_DIRECT_HOST_PATTERN,
            reason: e.to_string(),
        })
    }

    pub fn rehost_settings(&self) -> RehostSettings {
        RehostSettings {
            extractor_url: self.extractor_url.clone(),
            extractor_version: self.extractor_version.clone(),
            file_host: self.file_host_url.clone(),
            transient_dir: self.transient_dir.clone(),
        }
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn url_var(key: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
        field: key,
        reason: e.to_string(),
    })
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(field) => write!(f, "missing required variable '{}'", field),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
