// --- File: crates/timelish_payments/src/handlers.rs ---
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::logic::{process_processor_webhook, verify_processor_signature, ProcessorEvent};
use timelish_common::services::{AppointmentStore, EventSink};
use timelish_config::AppConfig;

/// Header carrying the processor's webhook signature.
pub const PROCESSOR_SIGNATURE_HEADER: &str = "X-Processor-Signature";

// --- State for Payments Handlers ---
#[derive(Clone)]
pub struct PaymentsState {
    pub config: Arc<AppConfig>,
    pub store: Option<Arc<dyn AppointmentStore>>,
    pub events: Option<Arc<dyn EventSink>>,
}

/// Axum handler for the inbound processor webhook.
///
/// The raw body is verified against the `PROCESSOR_WEBHOOK_SECRET` signing
/// secret BEFORE any deserialization happens.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/payments/webhook", // Path relative to /api
    responses(
        (status = 200, description = "Webhook received and acknowledged"),
        (status = 400, description = "Bad Request (invalid payload)"),
        (status = 401, description = "Invalid signature"),
        (status = 500, description = "Internal Server Error processing webhook")
    ),
    tag = "Payments Webhooks"
))]
pub async fn processor_webhook_handler(
    State(state): State<Arc<PaymentsState>>,
    headers: HeaderMap,
    body: String, // Raw body for signature verification
) -> Response {
    if !state.config.use_payments {
        return (StatusCode::SERVICE_UNAVAILABLE, "Payments disabled.").into_response();
    }

    let webhook_secret = match std::env::var("PROCESSOR_WEBHOOK_SECRET") {
        Ok(s) => s,
        Err(_) => {
            error!("🚨 PROCESSOR_WEBHOOK_SECRET environment variable not set!");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let sig_header = headers
        .get(PROCESSOR_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok());

    if let Err(e) = verify_processor_signature(body.as_bytes(), sig_header, &webhook_secret) {
        warn!("Processor webhook signature verification failed: {}", e);
        return (StatusCode::UNAUTHORIZED, format!("Invalid signature: {}", e)).into_response();
    }

    // Deserialize the raw body AFTER signature verification.
    let event: ProcessorEvent = match serde_json::from_str(&body) {
        Ok(ev) => ev,
        Err(e) => {
            warn!("Failed to deserialize processor webhook event: {}", e);
            return (StatusCode::BAD_REQUEST, "Invalid payload format".to_string())
                .into_response();
        }
    };

    let Some(store) = state.store.as_ref() else {
        error!("🚨 Processor webhook received but no appointment store is available.");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    match process_processor_webhook(event, store.as_ref(), state.events.as_ref()).await {
        Ok(()) => {
            info!("Processor webhook processed successfully.");
            StatusCode::OK.into_response()
        }
        Err(e) => {
            error!("Error processing processor webhook: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Webhook processing error: {}", e),
            )
                .into_response()
        }
    }
}
