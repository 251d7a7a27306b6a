//! Webhook HTTP shell around the `ledgerhook` reconciliation core.
//!
//! Exposes `POST /webhook` for transaction-completion events from the
//! automation tool, plus `GET /health` and a token-gated `GET /metrics`.
//! All reconciliation logic lives in the core crate; this crate owns
//! configuration, routing, and observability.

pub mod config;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod security;
pub mod state;
