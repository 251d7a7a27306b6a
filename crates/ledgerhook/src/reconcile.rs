//! One-event reconciliation: locate the invoice, record the payment.

use rust_decimal::Decimal;

use crate::client::AccountingClient;
use crate::error::ReconcileError;
use crate::event::TransactionEvent;
use crate::payments::PaymentOutcome;

/// Terminal outcome of one webhook delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// No invoice matches the transaction reference, or the lookup could not
    /// be completed. Both stop processing the same way.
    NoInvoice { reference: String },
    /// The event requested no payment (`balance_payment <= 0`).
    NothingRequested { reference: String },
    /// The matched invoice has no outstanding balance.
    NoBalance { invoice_id: String },
    /// A payment was recorded.
    Recorded { invoice_id: String, amount: Decimal },
}

impl ReconcileOutcome {
    /// Human-readable summary for the HTTP response body.
    pub fn message(&self) -> String {
        match self {
            ReconcileOutcome::NoInvoice { reference } => {
                format!("no invoice found for transaction {reference}")
            }
            ReconcileOutcome::NothingRequested { reference } => {
                format!("no balance payment requested for transaction {reference}; nothing to record")
            }
            ReconcileOutcome::NoBalance { invoice_id } => {
                format!("invoice {invoice_id} has no outstanding balance; payment skipped")
            }
            ReconcileOutcome::Recorded { invoice_id, amount } => {
                format!("payment of {amount} recorded against invoice {invoice_id}")
            }
        }
    }

    /// Label for the webhook outcome metric.
    pub fn label(&self) -> &'static str {
        match self {
            ReconcileOutcome::NoInvoice { .. } => "no_invoice",
            ReconcileOutcome::NothingRequested { .. } => "nothing_requested",
            ReconcileOutcome::NoBalance { .. } => "no_balance",
            ReconcileOutcome::Recorded { .. } => "recorded",
        }
    }
}

/// Run the full locate-then-record pipeline for one event.
///
/// Lookup failures are collapsed into [`ReconcileOutcome::NoInvoice`]:
/// "cannot determine whether an invoice exists" stops processing exactly
/// like "no invoice exists", and is logged at WARN rather than failing the
/// delivery. Recorder and token-refresh failures propagate.
///
/// Deliveries are handled independently and statelessly; nothing here
/// deduplicates two concurrent events carrying the same transaction ID, so
/// such a pair can both pass the lookup and record twice.
pub async fn reconcile_transaction(
    client: &AccountingClient,
    event: &TransactionEvent,
) -> Result<ReconcileOutcome, ReconcileError> {
    let invoice = match client.find_invoice(&event.transaction_id).await {
        Ok(Some(invoice)) => invoice,
        Ok(None) => {
            tracing::info!(reference = %event.transaction_id, "no matching invoice");
            return Ok(ReconcileOutcome::NoInvoice {
                reference: event.transaction_id.clone(),
            });
        }
        Err(err) => {
            tracing::warn!(
                reference = %event.transaction_id,
                error = %err,
                "invoice lookup failed; treating as no match"
            );
            return Ok(ReconcileOutcome::NoInvoice {
                reference: event.transaction_id.clone(),
            });
        }
    };

    if event.balance_payment <= Decimal::ZERO {
        tracing::info!(reference = %event.transaction_id, "event requests no payment");
        return Ok(ReconcileOutcome::NothingRequested {
            reference: event.transaction_id.clone(),
        });
    }

    let outcome = client
        .record_payment(
            &invoice.invoice_id,
            event.balance_payment,
            &event.transaction_id,
            &event.balance_payment_mode,
        )
        .await?;

    Ok(match outcome {
        PaymentOutcome::Recorded { invoice_id, amount } => {
            ReconcileOutcome::Recorded { invoice_id, amount }
        }
        PaymentOutcome::Skipped { invoice_id } => ReconcileOutcome::NoBalance { invoice_id },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Credentials, TokenStore};
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn client(server: &MockServer) -> AccountingClient {
        let tokens = Arc::new(TokenStore::new(
            Credentials {
                client_id: "client-1".into(),
                client_secret: "secret".into(),
                refresh_token: "refresh-1".into(),
            },
            "good".into(),
            &server.base_url(),
        ));
        AccountingClient::new(tokens, &server.base_url(), "ORG-1")
    }

    fn event(amount: Decimal) -> TransactionEvent {
        TransactionEvent {
            transaction_id: "T-100".into(),
            balance_payment: amount,
            balance_payment_mode: "banktransfer".into(),
        }
    }

    #[tokio::test]
    async fn test_no_match_stops_before_any_payment_call() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices");
                then.status(200)
                    .json_body(serde_json::json!({ "code": 0, "invoices": [] }));
            })
            .await;
        let submit = server
            .mock_async(|when, then| {
                when.method(POST).path("/customerpayments");
                then.status(201).json_body(serde_json::json!({ "code": 0 }));
            })
            .await;

        let outcome = reconcile_transaction(&client(&server), &event(dec!(50)))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::NoInvoice {
                reference: "T-100".into()
            }
        );
        assert_eq!(submit.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_collapses_to_no_invoice() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices");
                then.status(503).body("unavailable");
            })
            .await;

        let outcome = reconcile_transaction(&client(&server), &event(dec!(50)))
            .await
            .unwrap();
        assert!(matches!(outcome, ReconcileOutcome::NoInvoice { .. }));
    }

    #[tokio::test]
    async fn test_zero_requested_amount_skips_recorder_entirely() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices");
                then.status(200).json_body(serde_json::json!({
                    "code": 0,
                    "invoices": [{
                        "invoice_id": "INV-1",
                        "reference_number": "T-100",
                        "customer_id": "C-1",
                        "balance": 80
                    }]
                }));
            })
            .await;
        let detail = server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices/INV-1");
                then.status(200).json_body(serde_json::json!({ "code": 0 }));
            })
            .await;

        let outcome = reconcile_transaction(&client(&server), &event(dec!(0)))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::NothingRequested {
                reference: "T-100".into()
            }
        );
        assert_eq!(detail.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_matched_invoice_flows_into_a_recorded_payment() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/invoices")
                    .query_param("reference_number", "T-100");
                then.status(200).json_body(serde_json::json!({
                    "code": 0,
                    "invoices": [{
                        "invoice_id": "INV-1",
                        "reference_number": "T-100",
                        "customer_id": "C-1",
                        "balance": 80
                    }]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices/INV-1");
                then.status(200).json_body(serde_json::json!({
                    "code": 0,
                    "invoice": {
                        "invoice_id": "INV-1",
                        "reference_number": "T-100",
                        "customer_id": "C-1",
                        "balance": 80
                    }
                }));
            })
            .await;
        let submit = server
            .mock_async(|when, then| {
                when.method(POST).path("/customerpayments");
                then.status(201).json_body(serde_json::json!({ "code": 0 }));
            })
            .await;

        let outcome = reconcile_transaction(&client(&server), &event(dec!(50)))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::Recorded {
                invoice_id: "INV-1".into(),
                amount: dec!(50)
            }
        );
        submit.assert_async().await;
    }

    #[tokio::test]
    async fn test_recorder_failure_propagates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/invoices")
                    .query_param("reference_number", "T-100");
                then.status(200).json_body(serde_json::json!({
                    "code": 0,
                    "invoices": [{
                        "invoice_id": "INV-1",
                        "reference_number": "T-100",
                        "customer_id": "C-1",
                        "balance": 80
                    }]
                }));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices/INV-1");
                then.status(500).body("boom");
            })
            .await;

        let err = reconcile_transaction(&client(&server), &event(dec!(50)))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::PaymentCreation(_)));
    }
}
