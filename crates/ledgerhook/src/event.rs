//! Inbound webhook payload model.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::constants::DEFAULT_PAYMENT_MODE;

/// Raw webhook body posted by the automation tool.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub items: Vec<WebhookItem>,
}

/// One entry of the inbound batch, in the automation tool's field naming.
///
/// `Balance Payment` arrives as either a JSON string or a number depending
/// on how the sending workflow was configured; both parse into a `Decimal`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookItem {
    #[serde(rename = "Transaction ID")]
    pub transaction_id: String,
    #[serde(rename = "Balance Payment")]
    pub balance_payment: Decimal,
    #[serde(rename = "Balance Payment Mode", default)]
    pub balance_payment_mode: Option<String>,
}

/// A validated transaction-completion event, derived from the first element
/// of the inbound batch. Remaining entries are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEvent {
    pub transaction_id: String,
    pub balance_payment: Decimal,
    pub balance_payment_mode: String,
}

impl TransactionEvent {
    /// Extract the event from a webhook payload, or `None` when the batch
    /// carries no items.
    pub fn from_payload(payload: &WebhookPayload) -> Option<Self> {
        let item = payload.items.first()?;
        let mode = item
            .balance_payment_mode
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_PAYMENT_MODE);
        Some(Self {
            transaction_id: item.transaction_id.clone(),
            balance_payment: item.balance_payment,
            balance_payment_mode: mode.to_string(),
        })
    }
}
