//! Invoice lookup against the accounting API.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::client::{AccountingClient, ApiRequest};
use crate::error::ReconcileError;

/// An invoice as returned by the accounting service. Read-only from this
/// system's perspective; the balance is authoritative only at fetch time.
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    pub invoice_id: String,
    #[serde(default)]
    pub reference_number: String,
    pub customer_id: String,
    pub balance: Decimal,
}

#[derive(Debug, Deserialize)]
struct InvoiceListResponse {
    #[serde(default)]
    invoices: Vec<Invoice>,
}

#[derive(Debug, Deserialize)]
struct InvoiceDetailResponse {
    invoice: Invoice,
}

impl AccountingClient {
    /// Find the invoice whose reference number equals `reference`.
    ///
    /// The service-side `reference_number` filter is not trusted to be an
    /// exact match, so the returned set is filtered again client-side. When
    /// several invoices match exactly, the first in the service's ordering
    /// wins. Zero matches is `Ok(None)`, not an error.
    pub async fn find_invoice(
        &self,
        reference: &str,
    ) -> Result<Option<Invoice>, ReconcileError> {
        let request = ApiRequest::get("/invoices").query("reference_number", reference);
        let body = self.execute(&request).await?;
        let list: InvoiceListResponse = serde_json::from_value(body)?;
        Ok(list
            .invoices
            .into_iter()
            .find(|invoice| invoice.reference_number == reference))
    }

    /// Fetch one invoice by id for its authoritative customer and balance.
    pub async fn fetch_invoice(&self, invoice_id: &str) -> Result<Invoice, ReconcileError> {
        let request = ApiRequest::get(format!("/invoices/{invoice_id}"));
        let body = self.execute(&request).await?;
        let detail: InvoiceDetailResponse = serde_json::from_value(body)?;
        Ok(detail.invoice)
    }
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

    #[tokio::test]
    async fn test_fuzzy_remote_matches_are_filtered_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/invoices")
                    .query_param("reference_number", "T-10");
                // The remote filter matched by substring; only one entry is exact.
                then.status(200).json_body(serde_json::json!({
                    "code": 0,
                    "invoices": [
                        { "invoice_id": "INV-A", "reference_number": "T-100",
                          "customer_id": "C-1", "balance": 10 },
                        { "invoice_id": "INV-B", "reference_number": "T-10",
                          "customer_id": "C-2", "balance": 20 },
                        { "invoice_id": "INV-C", "reference_number": "T-101",
                          "customer_id": "C-3", "balance": 30 }
                    ]
                }));
            })
            .await;

        let invoice = client(&server).find_invoice("T-10").await.unwrap().unwrap();
        assert_eq!(invoice.invoice_id, "INV-B");
        assert_eq!(invoice.balance, dec!(20));
    }

    #[tokio::test]
    async fn test_first_exact_match_wins() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices");
                then.status(200).json_body(serde_json::json!({
                    "code": 0,
                    "invoices": [
                        { "invoice_id": "INV-1", "reference_number": "T-7",
                          "customer_id": "C-1", "balance": 5 },
                        { "invoice_id": "INV-2", "reference_number": "T-7",
                          "customer_id": "C-1", "balance": 15 }
                    ]
                }));
            })
            .await;

        let invoice = client(&server).find_invoice("T-7").await.unwrap().unwrap();
        assert_eq!(invoice.invoice_id, "INV-1");
    }

    #[tokio::test]
    async fn test_no_match_is_none_not_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices");
                then.status(200)
                    .json_body(serde_json::json!({ "code": 0, "invoices": [] }));
            })
            .await;

        assert!(client(&server).find_invoice("T-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_invoice_parses_detail_envelope() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/invoices/INV-9");
                then.status(200).json_body(serde_json::json!({
                    "code": 0,
                    "invoice": {
                        "invoice_id": "INV-9",
                        "reference_number": "T-9",
                        "customer_id": "C-9",
                        "balance": 42.5
                    }
                }));
            })
            .await;

        let invoice = client(&server).fetch_invoice("INV-9").await.unwrap();
        assert_eq!(invoice.customer_id, "C-9");
        assert_eq!(invoice.balance, dec!(42.5));
    }
}
