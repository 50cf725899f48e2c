// --- File: crates/timelish_dispatch/src/service.rs ---
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::logic::{deliver_to_endpoint, endpoint_accepts, EventEnvelope};
use timelish_common::is_dispatch_enabled;
use timelish_common::models::DomainEvent;
use timelish_common::services::EventSink;
use timelish_config::AppConfig;

/// Event sink delivering domain events to the tenant's configured webhook
/// endpoints.
///
/// Publishing is fire-and-forget: deliveries are spawned onto the runtime
/// and failures are logged, never surfaced to the publishing request.
pub struct WebhookDispatcher {
    config: Arc<AppConfig>,
}

impl WebhookDispatcher {
    /// Create a new webhook dispatcher
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self { config }
    }
}

impl EventSink for WebhookDispatcher {
    fn publish(&self, event: DomainEvent) {
        if !is_dispatch_enabled(&self.config) {
            return;
        }
        let Some(dispatch_config) = self.config.dispatch.clone() else {
            return;
        };

        let envelope = EventEnvelope::new(event);
        let kind = envelope.event.kind();
        let body = match serde_json::to_string(&envelope) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize {} envelope: {}", kind, e);
                return;
            }
        };

        for endpoint in dispatch_config.endpoints {
            if !endpoint_accepts(&endpoint, kind) {
                continue;
            }
            let body = body.clone();
            tokio::spawn(async move {
                match deliver_to_endpoint(&endpoint, &body).await {
                    Ok(()) => {
                        info!("Delivered {} to {}", kind, endpoint.url);
                    }
                    Err(e) => {
                        warn!("Webhook delivery to {} failed: {}", endpoint.url, e);
                    }
                }
            });
        }
    }
}
