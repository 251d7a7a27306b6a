//! Webhook-driven invoice reconciliation against a Zoho Books-style
//! accounting API.
//!
//! One inbound transaction-completion event becomes zero or one payment
//! record:
//!
//! 1. [`AccountingClient::find_invoice`] matches the event's transaction ID
//!    against invoice reference numbers, exact-match only.
//! 2. [`AccountingClient::record_payment`] re-reads the invoice balance,
//!    clamps the requested amount against it, and submits the payment.
//!
//! Every outbound call goes through [`AccountingClient::execute`], which
//! recovers from access-token expiry transparently: on an authentication
//! failure it refreshes the token via the shared [`TokenStore`] and re-sends
//! the request exactly once.
//!
//! # Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ledgerhook::{reconcile_transaction, AccountingClient, Credentials, TokenStore};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let tokens = Arc::new(TokenStore::new(
//!     Credentials {
//!         client_id: "client-id".into(),
//!         client_secret: "client-secret".into(),
//!         refresh_token: "refresh-token".into(),
//!     },
//!     "initial-access-token".into(),
//!     "https://accounts.zoho.com",
//! ));
//! let client = AccountingClient::new(tokens, "https://www.zohoapis.com/books/v3", "1234567");
//!
//! let event = ledgerhook::TransactionEvent {
//!     transaction_id: "T-100".into(),
//!     balance_payment: "50".parse().unwrap(),
//!     balance_payment_mode: "banktransfer".into(),
//! };
//! let outcome = reconcile_transaction(&client, &event).await.unwrap();
//! println!("{}", outcome.message());
//! # }
//! ```

pub mod client;
pub mod constants;
pub mod error;
pub mod event;
pub mod invoices;
pub mod payments;
pub mod reconcile;
pub mod token;

pub use client::{AccountingClient, ApiRequest};
pub use error::ReconcileError;
pub use event::{TransactionEvent, WebhookItem, WebhookPayload};
pub use invoices::Invoice;
pub use payments::{PaymentApplication, PaymentOutcome, PaymentRequest};
pub use reconcile::{reconcile_transaction, ReconcileOutcome};
pub use token::{Credentials, TokenStore};
