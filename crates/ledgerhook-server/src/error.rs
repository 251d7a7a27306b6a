use actix_web::{HttpResponse, ResponseError};
use std::fmt;

use ledgerhook::ReconcileError;

#[derive(Debug)]
pub enum WebhookError {
    /// The inbound batch carried no items
    EmptyBatch,
    /// Reconciliation failed
    Reconcile(ReconcileError),
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebhookError::EmptyBatch => write!(f, "webhook body carries no items"),
            WebhookError::Reconcile(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WebhookError {}

impl From<ReconcileError> for WebhookError {
    fn from(e: ReconcileError) -> Self {
        WebhookError::Reconcile(e)
    }
}

impl ResponseError for WebhookError {
    fn error_response(&self) -> HttpResponse {
        tracing::error!(error = %self, "webhook processing failed");
        crate::metrics::WEBHOOK_EVENTS
            .with_label_values(&["failed"])
            .inc();
        HttpResponse::InternalServerError().json(serde_json::json!({
            "message": "failed to process transaction",
            "error": self.to_string(),
        }))
    }
}
