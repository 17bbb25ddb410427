//! Authenticated API client with transparent token refresh.
//!
//! Every request goes out with the session's current bearer token attached.
//! A 401 answer triggers exactly one refresh-and-retry for that request; a
//! failed refresh ends the session, broadcasts the logout signal, and
//! surfaces as [`ApiError::SessionExpired`]. All other failures pass through
//! to the caller unchanged - no retry, no backoff.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Method;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Session;

use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Fixed refresh endpoint. The long-lived credential rides on the
/// transport's cookie store, so the call carries no bearer token.
pub const REFRESH_PATH: &str = "/iam/auth/refresh";

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "expiresIn", default)]
    expires_in: Option<i64>,
}

/// API client for the Nexus backend.
/// Clone is cheap - the transport and session are shared behind Arcs.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client talking HTTP to `base_url`.
    pub fn new(base_url: &str, session: Arc<Session>) -> Result<Self> {
        let transport = HttpTransport::new(base_url)?;
        Ok(Self::with_transport(Arc::new(transport), session))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    /// The session this client reads tokens from and writes them to.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::GET, path, None).await?;
        serde_json::from_str(&response.body)
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        let response = self.execute(Method::POST, path, Some(body)).await?;
        serde_json::from_str(&response.body)
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    /// Dispatch a request, refreshing the access token at most once if the
    /// first attempt comes back 401.
    ///
    /// `refresh_attempted` is scoped to this original request: independent
    /// requests that each hit a stale token each perform their own refresh.
    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse> {
        let mut refresh_attempted = false;

        loop {
            let mut request =
                ApiRequest::new(method.clone(), path).with_bearer(self.session.token());
            if let Some(ref b) = body {
                request = request.with_body(b.clone());
            }

            let response = self.transport.dispatch(&request).await?;

            if response.status.as_u16() == 401 && !refresh_attempted {
                refresh_attempted = true;
                debug!(path, "request unauthorized, attempting token refresh");

                match self.refresh().await {
                    Ok(token) => {
                        self.session.set_token(token);
                        continue;
                    }
                    Err(err) => {
                        warn!(path, error = %err, "token refresh failed, ending session");
                        self.session.end_session();
                        return Err(ApiError::SessionExpired(format!("{err:#}")).into());
                    }
                }
            }

            return Self::check_response(response);
        }
    }

    /// Exchange the transport-held refresh credential for a new access
    /// token. Goes straight to the transport: the refresh call itself is
    /// never retried or refreshed.
    async fn refresh(&self) -> Result<String> {
        let request = ApiRequest::new(Method::POST, REFRESH_PATH).with_body(serde_json::json!({}));
        let response = self.transport.dispatch(&request).await?;
        let response = Self::check_response(response)?;

        let refresh: RefreshResponse =
            serde_json::from_str(&response.body).context("Failed to parse refresh response")?;
        debug!(expires_in = ?refresh.expires_in, "access token refreshed");
        Ok(refresh.access_token)
    }

    /// Map error statuses to `ApiError`, passing successful responses through.
    fn check_response(response: ApiResponse) -> Result<ApiResponse> {
        if response.status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, &response.body).into())
        }
    }
}
