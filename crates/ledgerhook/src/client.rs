//! Authenticated request execution against the accounting API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::constants::{INVALID_TOKEN_CODE, REQUEST_TIMEOUT_SECS};
use crate::error::ReconcileError;
use crate::token::TokenStore;

/// One outbound call to the accounting API, described independently of the
/// client so a failed attempt can be re-sent unchanged after a token
/// refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Client for the accounting service's REST API.
///
/// Wraps `reqwest::Client`. Every call carries the mandatory
/// `organization_id` query parameter and a bearer access token from the
/// shared [`TokenStore`]. On an authentication failure (HTTP 401, or the
/// service's invalid-token error code in the body) the token is refreshed
/// and the request re-sent exactly once; a second authentication failure is
/// surfaced as an error, not retried again.
pub struct AccountingClient {
    http: reqwest::Client,
    tokens: Arc<TokenStore>,
    api_base: String,
    organization_id: String,
}

impl AccountingClient {
    pub fn new(tokens: Arc<TokenStore>, api_base: &str, organization_id: &str) -> Self {
        Self::with_http_client(
            reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("failed to build HTTP client"),
            tokens,
            api_base,
            organization_id,
        )
    }

    /// Create a client with a custom `reqwest::Client`.
    pub fn with_http_client(
        http: reqwest::Client,
        tokens: Arc<TokenStore>,
        api_base: &str,
        organization_id: &str,
    ) -> Self {
        Self {
            http,
            tokens,
            api_base: api_base.trim_end_matches('/').to_string(),
            organization_id: organization_id.to_string(),
        }
    }

    /// Execute a request under the one-retry token recovery policy and
    /// return the decoded response body.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Value, ReconcileError> {
        let token = self.tokens.current().await;
        let (status, body) = self.send(request, &token).await?;

        if !is_auth_failure(status, &body) {
            return decode(status, body);
        }

        tracing::debug!(path = %request.path, "authentication failure; refreshing access token");
        let fresh = self.tokens.refresh_and_get(&self.http).await?;

        let (status, body) = self.send(request, &fresh).await?;
        if is_auth_failure(status, &body) {
            return Err(ReconcileError::Request(format!(
                "authentication still failing after token refresh: {} {} returned {status}",
                request.method, request.path,
            )));
        }
        decode(status, body)
    }

    async fn send(
        &self,
        request: &ApiRequest,
        token: &str,
    ) -> Result<(StatusCode, String), ReconcileError> {
        let url = format!("{}{}", self.api_base, request.path);
        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .bearer_auth(token)
            .query(&[("organization_id", self.organization_id.as_str())])
            .query(&request.query);
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            ReconcileError::Request(format!("{} {} failed: {e}", request.method, request.path))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ReconcileError::Request(format!("failed to read response body: {e}"))
        })?;
        Ok((status, body))
    }
}

/// HTTP 401, or a body whose top-level `code` is the service's
/// invalid-token error code.
fn is_auth_failure(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::UNAUTHORIZED {
        return true;
    }
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("code").and_then(Value::as_i64))
        == Some(INVALID_TOKEN_CODE)
}

fn decode(status: StatusCode, body: String) -> Result<Value, ReconcileError> {
    if !status.is_success() {
        return Err(ReconcileError::Request(format!(
            "accounting API returned {status}: {}",
            body.chars().take(200).collect::<String>(),
        )));
    }
    serde_json::from_str(&body)
        .map_err(|e| ReconcileError::Request(format!("malformed API response: {e}")))
}
