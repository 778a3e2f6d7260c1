//! Client configuration loaded via OrthoConfig.
//!
//! Values come from `MYFLIX_*` environment variables or a configuration
//! file; everything is optional and falls back to the hosted API with a
//! session directory under the working directory.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::outbound::http::DEFAULT_BASE_URL;

const DEFAULT_SESSION_DIR: &str = ".myflix";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured base URL does not parse.
    #[error("invalid base URL '{value}': {source}")]
    InvalidBaseUrl {
        /// Raw configured value.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Settings controlling where the client talks to and where it keeps its
/// session.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MYFLIX")]
pub struct ClientSettings {
    /// Root URL of the catalogue API.
    pub base_url: Option<String>,
    /// Directory holding the persisted session.
    pub session_dir: Option<PathBuf>,
    /// Whole-request timeout in seconds; zero disables it.
    #[ortho_config(default = 0)]
    pub request_timeout_secs: u64,
}

impl ClientSettings {
    /// Return the configured API root, falling back to the hosted API.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] when the value does not parse.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Return the session directory, falling back to `.myflix`.
    #[must_use]
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR))
    }

    /// Return the per-request timeout, if any.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}
