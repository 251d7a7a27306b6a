use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use ledgerhook::{reconcile_transaction, TransactionEvent, WebhookPayload};

use crate::error::WebhookError;
use crate::metrics;
use crate::security::constant_time_eq;
use crate::state::AppState;

/// Transaction-completion events from the automation tool. Only the first
/// item of the batch is considered; a batch with no items is an error, not
/// a silent no-op.
#[post("/webhook")]
pub async fn webhook(
    state: web::Data<AppState>,
    body: web::Json<WebhookPayload>,
) -> Result<HttpResponse, WebhookError> {
    let event = TransactionEvent::from_payload(&body).ok_or(WebhookError::EmptyBatch)?;

    tracing::info!(
        reference = %event.transaction_id,
        amount = %event.balance_payment,
        mode = %event.balance_payment_mode,
        "transaction event received"
    );

    let outcome = reconcile_transaction(&state.client, &event).await?;

    metrics::WEBHOOK_EVENTS
        .with_label_values(&[outcome.label()])
        .inc();
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": outcome.message() })))
}

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": "ledgerhook",
    }))
}

#[get("/metrics")]
pub async fn metrics_endpoint(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match state.metrics_token.as_deref() {
        Some(expected) => {
            let authorized = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|token| constant_time_eq(token.as_bytes(), expected.as_bytes()))
                .unwrap_or(false);

            if !authorized {
                return HttpResponse::Unauthorized().json(serde_json::json!({
                    "error": "unauthorized",
                    "message": "/metrics requires a valid bearer token"
                }));
            }
        }
        None => {
            // No token configured: metrics stay inaccessible unless the
            // deployment opted into public exposure.
            if !state.public_metrics {
                return HttpResponse::Forbidden().json(serde_json::json!({
                    "error": "forbidden",
                    "message": "set METRICS_TOKEN, or LEDGERHOOK_PUBLIC_METRICS=true to expose /metrics"
                }));
            }
        }
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(metrics::metrics_output())
}
