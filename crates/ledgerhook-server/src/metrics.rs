use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use std::sync::LazyLock;

pub static WEBHOOK_EVENTS: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "ledgerhook_webhook_events_total",
        "Webhook deliveries by terminal outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Render every registered metric in Prometheus text exposition format.
pub fn metrics_output() -> String {
    let mut buffer = Vec::new();
    match TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
        Ok(()) => String::from_utf8(buffer).unwrap_or_default(),
        Err(_) => String::new(),
    }
}
