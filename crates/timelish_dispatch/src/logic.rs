// --- File: crates/timelish_dispatch/src/logic.rs ---
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;
use uuid::Uuid;

use timelish_common::models::DomainEvent;
use timelish_common::HTTP_CLIENT;
use timelish_config::WebhookEndpointConfig;

/// Header carrying the delivery signature on outbound webhooks.
pub const DISPATCH_SIGNATURE_HEADER: &str = "X-Timelish-Signature";

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Webhook delivery request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Endpoint {url} answered with status {status}")]
    EndpointError { url: String, status: u16 },

    #[error("Failed to serialize event envelope: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Invalid signing secret")]
    SecretError,
}

// --- Event Envelope ---

/// The JSON envelope delivered to webhook endpoints. One envelope (with a
/// fresh delivery id) is produced per published event.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: DomainEvent,
}

impl EventEnvelope {
    pub fn new(event: DomainEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            event,
        }
    }
}

// --- Signing ---

/// Signs a delivery body, producing the `t=<unix>,v1=<hex>` header value.
/// The HMAC-SHA256 is computed over `"{t}.{body}"`, mirroring the format the
/// payments crate verifies on inbound processor webhooks.
pub fn sign_payload(secret: &str, timestamp: i64, body: &str) -> Result<String, DispatchError> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| DispatchError::SecretError)?;
    mac.update(format!("{}.{}", timestamp, body).as_bytes());
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}

// --- Delivery ---

/// Whether an endpoint subscribes to the given event kind.
/// An endpoint without a filter receives every event.
pub fn endpoint_accepts(endpoint: &WebhookEndpointConfig, kind: &str) -> bool {
    match &endpoint.events {
        None => true,
        Some(kinds) => kinds.iter().any(|k| k == kind),
    }
}

/// Delivers a serialized envelope to a single endpoint.
///
/// Callers spawn this; a non-2xx answer is an error so the caller can log
/// it, but nothing is retried.
pub async fn deliver_to_endpoint(
    endpoint: &WebhookEndpointConfig,
    body: &str,
) -> Result<(), DispatchError> {
    let mut request = HTTP_CLIENT
        .post(&endpoint.url)
        .header("Content-Type", "application/json")
        .body(body.to_string());

    if let Some(secret) = &endpoint.secret {
        let signature = sign_payload(secret, Utc::now().timestamp(), body)?;
        request = request.header(DISPATCH_SIGNATURE_HEADER, signature);
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DispatchError::EndpointError {
            url: endpoint.url.clone(),
            status: status.as_u16(),
        });
    }
    Ok(())
}
