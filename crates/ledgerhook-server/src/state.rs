use std::sync::Arc;

use ledgerhook::{AccountingClient, Credentials, TokenStore};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<AccountingClient>,
    /// Bearer token required for /metrics (None = protected by default)
    pub metrics_token: Option<String>,
    /// Opt-in flag exposing /metrics without a token
    pub public_metrics: bool,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        let tokens = Arc::new(TokenStore::new(
            Credentials {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                refresh_token: config.refresh_token.clone(),
            },
            config.access_token.clone(),
            &config.auth_base_url,
        ));

        Self {
            client: Arc::new(AccountingClient::new(
                tokens,
                &config.api_base_url,
                &config.organization_id,
            )),
            metrics_token: config.metrics_token.clone(),
            public_metrics: config.public_metrics,
        }
    }
}
