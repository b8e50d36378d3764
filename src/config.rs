// src/config.rs

//! Configuration loading utilities.
//!
//! Settings come from a TOML file, then process environment variables
//! override individual API fields.

use std::path::Path;

use crate::models::Config;

/// Environment variable overriding `api.base_url`.
pub const ENV_API_URL: &str = "CAMPUS_API_URL";
/// Environment variable overriding `api.api_key`.
pub const ENV_API_KEY: &str = "CAMPUS_API_KEY";
/// Environment variable overriding `api.timeout_ms`.
pub const ENV_API_TIMEOUT_MS: &str = "CAMPUS_API_TIMEOUT_MS";

/// Load configuration from `path` (defaults if unreadable) and apply
/// environment overrides.
pub fn load(path: &Path) -> Config {
    let mut config = Config::load_or_default(path);
    apply_env(&mut config);
    config
}

/// Apply overrides from the process environment.
pub fn apply_env(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from any variable lookup.
pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        log::debug!("Using {ENV_API_URL} for api.base_url");
        config.api.base_url = url.trim().to_string();
    }
    if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
        log::debug!("Using {ENV_API_KEY} for api.api_key");
        config.api.api_key = key.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_API_TIMEOUT_MS) {
        match raw.trim().parse::<u64>() {
            Ok(ms) => config.api.timeout_ms = ms,
            Err(e) => log::warn!("Ignoring {ENV_API_TIMEOUT_MS}={raw:?}: {e}"),
        }
    }
}
