use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// An outbound API call awaiting dispatch.
///
/// Built fresh for every attempt; `bearer` holds the token snapshot taken
/// when the attempt was assembled, so a retry after refresh carries the new
/// token rather than a stale reference.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// A completed exchange. HTTP error statuses are responses, not `Err`s;
/// only transport-level failures (connect, timeout) surface as errors.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The seam between the refreshing client and the wire. Production code uses
/// [`HttpTransport`]; tests inject a scripted implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, req: &ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport.
///
/// The cookie store carries the HTTP-only refresh credential set by the
/// backend on login; this crate never reads or writes that cookie itself.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(&self, req: &ApiRequest) -> Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, req.path);

        let mut builder = self.client.request(req.method.clone(), &url);
        if let Some(ref token) = req.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(super::error::ApiError::NetworkError)
            .with_context(|| format!("Failed to send {} request to {}", req.method, url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        Ok(ApiResponse { status, body })
    }
}
