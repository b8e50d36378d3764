//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Content backend connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    ///
    /// A missing base URL or API key is reported here, but the client still
    /// runs without them; every fetch then fails at request time.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::validation("api.base_url is empty"));
        }
        url::Url::parse(&self.api.base_url)
            .map_err(|e| AppError::validation(format!("api.base_url is invalid: {e}")))?;
        if self.api.api_key.trim().is_empty() {
            return Err(AppError::validation("api.api_key is empty"));
        }
        if self.api.namespace.trim().is_empty() {
            return Err(AppError::validation("api.namespace is empty"));
        }
        if self.api.timeout_ms == 0 {
            return Err(AppError::validation("api.timeout_ms must be > 0"));
        }
        if self.api.max_concurrent == 0 {
            return Err(AppError::validation("api.max_concurrent must be > 0"));
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        Ok(())
    }
}

/// Content backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the content server (e.g. `https://cms.example.edu`)
    #[serde(default)]
    pub base_url: String,

    /// Value sent in the `X-API-Key` header
    #[serde(default)]
    pub api_key: String,

    /// REST namespace under `/wp-json/`
    #[serde(default = "defaults::namespace")]
    pub namespace: String,

    /// Request timeout in milliseconds
    #[serde(default = "defaults::timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Maximum sections fetched at once by `fetch-all`
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl ApiConfig {
    /// Content endpoint for a section slug: `<base>/wp-json/<namespace>/v1/<slug>`.
    ///
    /// No validation happens here; an empty base yields a relative URL that
    /// fails when requested.
    pub fn endpoint(&self, slug: &str) -> String {
        format!(
            "{}/wp-json/{}/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.namespace.trim_matches('/'),
            slug
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            namespace: defaults::namespace(),
            timeout_ms: defaults::timeout_ms(),
            user_agent: defaults::user_agent(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum level: debug, info, warn or error
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    pub fn namespace() -> String {
        "university".into()
    }
    pub fn timeout_ms() -> u64 {
        10_000
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; campus-site/0.1)".into()
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn level() -> String {
        "info".into()
    }
}
