use std::env;

use url::Url;

use ledgerhook::constants::{DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RATE_LIMIT_RPM: u64 = 60;

#[derive(Clone)]
pub struct ServerConfig {
    /// Initial access token. May be empty: the first authenticated call
    /// then fails authentication and triggers a refresh.
    pub access_token: String,
    /// Long-lived refresh credential
    pub refresh_token: String,
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Accounting organization the invoices live in
    pub organization_id: String,
    /// Accounting API base URL
    pub api_base_url: String,
    /// Identity provider origin for token refresh
    pub auth_base_url: String,
    /// Server port
    pub port: u16,
    /// Rate limit requests per minute
    pub rate_limit_rpm: u64,
    /// Bearer token required for /metrics (None = protected by default)
    pub metrics_token: Option<String>,
    /// Opt-in flag exposing /metrics without a token
    pub public_metrics: bool,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("organization_id", &self.organization_id)
            .field("api_base_url", &self.api_base_url)
            .field("auth_base_url", &self.auth_base_url)
            .field("port", &self.port)
            .field("rate_limit_rpm", &self.rate_limit_rpm)
            .field(
                "metrics_token",
                &self.metrics_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("public_metrics", &self.public_metrics)
            .finish()
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let refresh_token = required("REFRESH_TOKEN")?;
        let client_id = required("CLIENT_ID")?;
        let client_secret = required("CLIENT_SECRET")?;
        let organization_id = required("ORGANIZATION_ID")?;

        let access_token = env::var("ACCESS_TOKEN").unwrap_or_default();

        let api_base_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());
        Url::parse(&api_base_url).map_err(|_| ConfigError::InvalidUrl(api_base_url.clone()))?;

        let auth_base_url =
            env::var("AUTH_BASE_URL").unwrap_or_else(|_| DEFAULT_AUTH_BASE_URL.to_string());
        Url::parse(&auth_base_url).map_err(|_| ConfigError::InvalidUrl(auth_base_url.clone()))?;

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let rate_limit_rpm = env::var("RATE_LIMIT_RPM")
            .ok()
            .and_then(|r| r.parse().ok())
            .unwrap_or(DEFAULT_RATE_LIMIT_RPM);

        let metrics_token = env::var("METRICS_TOKEN").ok().filter(|s| !s.is_empty());

        let public_metrics = env::var("LEDGERHOOK_PUBLIC_METRICS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        if access_token.is_empty() {
            tracing::info!("ACCESS_TOKEN not set — first API call will refresh before succeeding");
        }
        if metrics_token.is_none() && !public_metrics {
            tracing::warn!(
                "METRICS_TOKEN not set — /metrics is inaccessible. \
                 Set it, or set LEDGERHOOK_PUBLIC_METRICS=true to expose metrics publicly."
            );
        }

        Ok(Self {
            access_token,
            refresh_token,
            client_id,
            client_secret,
            organization_id,
            api_base_url,
            auth_base_url,
            port,
            rate_limit_rpm,
            metrics_token,
            public_metrics,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or(ConfigError::MissingRequired(name))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingRequired(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}
