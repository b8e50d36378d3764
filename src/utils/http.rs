// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Header carrying the configured API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Source of JSON payloads for section stores.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// GET `url` and return its parsed JSON body.
    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// Options for a single request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Extra headers, sent after the fixed ones
    pub headers: Vec<(String, String)>,
    /// JSON body, serialized as-is
    pub body: Option<Value>,
    /// Overrides the client's default timeout
    pub timeout: Option<Duration>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
            timeout: None,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// JSON client for the content backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_key: String,
    default_timeout: Duration,
}

impl ApiClient {
    /// Create a client from API settings.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            default_timeout: config.timeout(),
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Perform a request and parse the JSON response.
    ///
    /// The whole exchange, body included, runs under the timeout. When it
    /// fires the in-flight future is dropped, which closes the connection.
    pub async fn request(&self, url: &str, options: RequestOptions) -> Result<Value> {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let headers = self.headers(&options.headers)?;

        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(AppError::http_status(status));
            }
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes).map_err(AppError::Parse)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Request to {url} timed out after {}ms", timeout.as_millis());
                Err(AppError::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
        }
    }

    /// GET `url` with query-string parameters.
    pub async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = if query.is_empty() {
            url.to_string()
        } else {
            let mut parsed = url::Url::parse(url)?;
            parsed.query_pairs_mut().extend_pairs(query);
            parsed.to_string()
        };
        self.request(&url, RequestOptions::get()).await
    }

    fn headers(&self, extra: &[(String, String)]) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            header_value(&self.api_key)?,
        );
        for (name, value) in extra {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::validation(format!("invalid header name {name:?}: {e}")))?;
            headers.insert(name, header_value(value)?);
        }
        Ok(headers)
    }
}

#[async_trait]
impl ContentSource for ApiClient {
    async fn fetch_json(&self, url: &str) -> Result<Value> {
        log::debug!("GET {url}");
        self.request(url, RequestOptions::get()).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::validation(format!("invalid header value: {e}")))
}
