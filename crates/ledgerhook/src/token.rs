//! OAuth credential storage and refresh.

use std::fmt;

use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use crate::constants::TOKEN_ENDPOINT_PATH;
use crate::error::ReconcileError;

/// Immutable client identity used for the refresh exchange.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Thread-safe holder for the process-wide access token.
///
/// The access token is the only mutable field and is replaced wholesale by
/// [`TokenStore::refresh_and_get`]. Refreshes are serialized: a caller that
/// loses the race waits for the in-flight exchange to finish, then performs
/// its own. Both exchanges produce a valid token, so correctness holds
/// either way.
pub struct TokenStore {
    credentials: Credentials,
    token_url: String,
    access: RwLock<String>,
    refresh_gate: Mutex<()>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl TokenStore {
    /// `auth_base` is the identity provider origin,
    /// e.g. `https://accounts.zoho.com`.
    pub fn new(credentials: Credentials, initial_access_token: String, auth_base: &str) -> Self {
        Self {
            credentials,
            token_url: format!("{}{}", auth_base.trim_end_matches('/'), TOKEN_ENDPOINT_PATH),
            access: RwLock::new(initial_access_token),
            refresh_gate: Mutex::new(()),
        }
    }

    /// The access token currently in effect.
    pub async fn current(&self) -> String {
        self.access.read().await.clone()
    }

    /// Exchange the refresh credential for a new access token, store it, and
    /// return it.
    ///
    /// Any transport error or non-2xx response surfaces as
    /// [`ReconcileError::TokenRefresh`], which is fatal for the calling
    /// request chain.
    pub async fn refresh_and_get(
        &self,
        http: &reqwest::Client,
    ) -> Result<String, ReconcileError> {
        let _serialized = self.refresh_gate.lock().await;

        let response = http
            .post(&self.token_url)
            .form(&[
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                ReconcileError::TokenRefresh(format!("token endpoint unreachable: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReconcileError::TokenRefresh(format!(
                "token endpoint returned {status}: {}",
                body.chars().take(200).collect::<String>(),
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ReconcileError::TokenRefresh(format!("malformed token response: {e}"))
        })?;

        tracing::info!("access token refreshed");
        *self.access.write().await = token.access_token.clone();
        Ok(token.access_token)
    }
}
