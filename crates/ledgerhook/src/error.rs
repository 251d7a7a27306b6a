use thiserror::Error;

/// Errors surfaced by the reconciliation pipeline.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The identity provider rejected the refresh exchange. Fatal for the
    /// current request chain; nothing above this layer retries it.
    #[error("token refresh failed: {0}")]
    TokenRefresh(String),

    /// An authenticated call failed after the single permitted retry, or
    /// failed for a non-authentication reason.
    #[error("request failed: {0}")]
    Request(String),

    /// Invoice fetch or payment submission failed while recording a payment.
    #[error("payment creation failed: {0}")]
    PaymentCreation(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ReconcileError {
    /// Rewrap a failure raised inside the payment-recording chain. Token
    /// refresh failures keep their variant; everything else reports as
    /// `PaymentCreation`.
    pub(crate) fn into_payment_creation(self) -> ReconcileError {
        match self {
            err @ ReconcileError::TokenRefresh(_) => err,
            other => ReconcileError::PaymentCreation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_creation_wraps_request_errors() {
        let err = ReconcileError::Request("boom".into()).into_payment_creation();
        assert!(matches!(err, ReconcileError::PaymentCreation(_)));
        assert_eq!(err.to_string(), "payment creation failed: request failed: boom");
    }

    #[test]
    fn test_token_refresh_keeps_its_variant() {
        let err = ReconcileError::TokenRefresh("rejected".into()).into_payment_creation();
        assert!(matches!(err, ReconcileError::TokenRefresh(_)));
    }
}
