//! Payment recording: balance clamp and submission.

use chrono::Local;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::client::{AccountingClient, ApiRequest};
use crate::constants::PAYMENT_DATE_FORMAT;
use crate::error::ReconcileError;

/// Payment creation body for `POST /customerpayments`.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub customer_id: String,
    pub payment_mode: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: String,
    pub reference_number: String,
    pub invoices: Vec<PaymentApplication>,
}

/// Application of a payment amount to a single invoice.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentApplication {
    pub invoice_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_applied: Decimal,
}

/// Result of a recording attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// A payment was submitted to the accounting service.
    Recorded { invoice_id: String, amount: Decimal },
    /// The invoice carries no outstanding balance; nothing was submitted.
    Skipped { invoice_id: String },
}

impl AccountingClient {
    /// Record a payment of up to `requested` against `invoice_id`.
    ///
    /// The invoice is re-fetched first so the clamp runs against the
    /// service's current balance, not a stale one from the lookup:
    /// `amount = min(requested, balance)`. A clamped amount of zero or less
    /// is a legitimate no-op, not a failure; no submission call is made.
    ///
    /// The payment date is always "today" in the process-local timezone.
    pub async fn record_payment(
        &self,
        invoice_id: &str,
        requested: Decimal,
        reference: &str,
        payment_mode: &str,
    ) -> Result<PaymentOutcome, ReconcileError> {
        let invoice = self
            .fetch_invoice(invoice_id)
            .await
            .map_err(ReconcileError::into_payment_creation)?;

        let amount = requested.min(invoice.balance);
        if amount <= Decimal::ZERO {
            tracing::info!(
                invoice_id = %invoice.invoice_id,
                balance = %invoice.balance,
                "no outstanding balance; skipping payment"
            );
            return Ok(PaymentOutcome::Skipped {
                invoice_id: invoice.invoice_id,
            });
        }

        let payment = PaymentRequest {
            customer_id: invoice.customer_id.clone(),
            payment_mode: payment_mode.to_string(),
            amount,
            date: Local::now().format(PAYMENT_DATE_FORMAT).to_string(),
            reference_number: reference.to_string(),
            invoices: vec![PaymentApplication {
                invoice_id: invoice.invoice_id.clone(),
                amount_applied: amount,
            }],
        };

        let request = ApiRequest::post("/customerpayments", serde_json::to_value(&payment)?);
        self.execute(&request)
            .await
            .map_err(ReconcileError::into_payment_creation)?;

        tracing::info!(
            invoice_id = %invoice.invoice_id,
            amount = %amount,
            reference,
            "payment recorded"
        );
        Ok(PaymentOutcome::Recorded {
            invoice_id: invoice.invoice_id,
            amount,
        })
    }
}
