// --- File: crates/timelish_payments/src/routes.rs ---

use crate::handlers::{processor_webhook_handler, PaymentsState};
use axum::{routing::post, Router};
use std::sync::Arc;
use timelish_common::services::ServiceFactory;
use timelish_config::AppConfig;

/// Creates a router containing all routes for the payments feature.
pub fn routes(config: Arc<AppConfig>, factory: Arc<dyn ServiceFactory>) -> Router {
    let payments_state = Arc::new(PaymentsState {
        config,
        store: factory.appointment_store(),
        events: factory.event_sink(),
    });

    Router::new()
        .route("/payments/webhook", post(processor_webhook_handler))
        .with_state(payments_state)
}
