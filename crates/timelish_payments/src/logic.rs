// --- File: crates/timelish_payments/src/logic.rs ---
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{info, warn};

use crate::error::PaymentError;
use timelish_common::models::{
    AppointmentStatus, DomainEvent, IntentStatus, PaymentIntentRecord,
};
use timelish_common::services::{
    AppointmentStore, BoxedError, EventSink, PaymentService,
};
use timelish_policy::PaymentRequirement;

// --- Data Structures ---

/// Represents the `data` field within a processor event.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProcessorEventData {
    /// The actual object related to the event. Using serde_json::Value
    /// because the structure of 'object' varies by event type.
    pub object: serde_json::Value,
}

/// The outer event object delivered by the payment processor webhook.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProcessorEvent {
    pub id: String,
    pub created: i64, // Unix timestamp
    #[serde(rename = "type")]
    pub event_type: String, // e.g., "payment_intent.succeeded"
    pub data: ProcessorEventData,
}

/// The `data.object` payload for payment_intent events. Only the fields we
/// act on are modeled.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProcessorIntentObject {
    pub id: String, // Payment intent ID (pi_...)
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub status: Option<String>,
}

// --- Webhook Signature Verification ---

/// Maximum accepted age (or clock skew) of a signed webhook, in seconds.
const SIGNATURE_TOLERANCE_SECONDS: i64 = 300;

/// Verifies the signature of an incoming processor webhook request.
///
/// The signature header carries `t=<unix>,v1=<hex hmac>` with possibly
/// several `v1` entries. The HMAC-SHA256 is computed over
/// `"{t}.{raw body}"` with the endpoint's signing secret.
///
/// Returns Ok(()) if any `v1` signature matches and the timestamp is within
/// tolerance, otherwise PaymentError::WebhookSignatureError.
pub fn verify_processor_signature(
    payload_bytes: &[u8],
    sig_header: Option<&str>,
    secret: &str,
) -> Result<(), PaymentError> {
    let sig_header_value = sig_header.ok_or_else(|| {
        PaymentError::WebhookSignatureError("Missing signature header".to_string())
    })?;

    let mut timestamp_str: Option<&str> = None;
    let mut v1_signatures_hex: Vec<&str> = Vec::new();

    for item in sig_header_value.split(',') {
        let parts: Vec<&str> = item.trim().splitn(2, '=').collect();
        if parts.len() == 2 {
            match parts[0] {
                "t" => timestamp_str = Some(parts[1]),
                "v1" => v1_signatures_hex.push(parts[1]),
                _ => {} // Ignore other scheme versions
            }
        }
    }

    let timestamp_str = timestamp_str.ok_or_else(|| {
        PaymentError::WebhookSignatureError("Missing timestamp 't' in signature header".to_string())
    })?;
    let parsed_timestamp = timestamp_str.parse::<i64>().map_err(|_| {
        PaymentError::WebhookSignatureError("Invalid timestamp format in signature header".to_string())
    })?;

    if v1_signatures_hex.is_empty() {
        return Err(PaymentError::WebhookSignatureError(
            "Missing v1 signature in signature header".to_string(),
        ));
    }

    let current_timestamp = Utc::now().timestamp();
    if (current_timestamp - parsed_timestamp).abs() > SIGNATURE_TOLERANCE_SECONDS {
        return Err(PaymentError::WebhookSignatureError(format!(
            "Timestamp outside tolerance (event: {}, now: {})",
            parsed_timestamp, current_timestamp
        )));
    }

    let signed_payload_string = format!(
        "{}.{}",
        timestamp_str,
        String::from_utf8_lossy(payload_bytes)
    );

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        PaymentError::WebhookSignatureError("Invalid webhook secret format for HMAC".to_string())
    })?;
    mac.update(signed_payload_string.as_bytes());
    let calculated_signature_hex = hex::encode(mac.finalize().into_bytes());

    for provided_sig_hex in v1_signatures_hex {
        if constant_time_eq(
            calculated_signature_hex.as_bytes(),
            provided_sig_hex.as_bytes(),
        ) {
            return Ok(());
        }
    }
    Err(PaymentError::WebhookSignatureError(
        "Signature mismatch".to_string(),
    ))
}

/// Helper for constant-time string comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

// --- Intent Reconciliation ---

/// How an intent was brought in line with a payment requirement.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Nothing was required and no intent existed.
    NotRequired,
    /// A fresh intent was created.
    Created { intent: PaymentIntentRecord },
    /// The stale intent was replaced with one for the new amount.
    AmountUpdated {
        previous: i64,
        intent: PaymentIntentRecord,
    },
    /// A matching live (or already settled) intent was kept as-is.
    Reused { intent: PaymentIntentRecord },
    /// The requirement vanished; the outstanding intent was cancelled.
    Cancelled,
}

impl ReconcileOutcome {
    /// The intent to attach to the appointment after reconciliation.
    pub fn intent(&self) -> Option<&PaymentIntentRecord> {
        match self {
            ReconcileOutcome::Created { intent }
            | ReconcileOutcome::AmountUpdated { intent, .. }
            | ReconcileOutcome::Reused { intent } => Some(intent),
            ReconcileOutcome::NotRequired | ReconcileOutcome::Cancelled => None,
        }
    }
}

/// Brings the payment intent attached to an appointment in line with a
/// [`PaymentRequirement`].
///
/// Settled intents are never mutated: a changed requirement against a
/// succeeded intent is an [`PaymentError::IntentConflict`]. Live intents are
/// reused when the amount and currency already match, otherwise cancelled
/// and replaced.
pub async fn reconcile_intent(
    payments: &dyn PaymentService<Error = BoxedError>,
    existing: Option<&PaymentIntentRecord>,
    requirement: &PaymentRequirement,
    currency: &str,
    description: Option<&str>,
    metadata: Option<serde_json::Value>,
) -> Result<ReconcileOutcome, PaymentError> {
    let amount_due = requirement.amount_due();

    if amount_due == 0 {
        return match existing {
            Some(intent) if intent.status.is_live() => {
                payments
                    .cancel_payment_intent(&intent.id)
                    .await
                    .map_err(|e| PaymentError::ServiceError(e.to_string()))?;
                info!("Cancelled outstanding intent {} (nothing due)", intent.id);
                Ok(ReconcileOutcome::Cancelled)
            }
            _ => Ok(ReconcileOutcome::NotRequired),
        };
    }

    if let Some(intent) = existing {
        if intent.status == IntentStatus::Succeeded {
            if intent.amount == amount_due && intent.currency == currency {
                return Ok(ReconcileOutcome::Reused {
                    intent: intent.clone(),
                });
            }
            return Err(PaymentError::IntentConflict(format!(
                "Intent {} already succeeded for {} {}, cannot change to {}",
                intent.id, intent.amount, intent.currency, amount_due
            )));
        }

        if intent.status.is_live() {
            if intent.amount == amount_due && intent.currency == currency {
                return Ok(ReconcileOutcome::Reused {
                    intent: intent.clone(),
                });
            }
            payments
                .cancel_payment_intent(&intent.id)
                .await
                .map_err(|e| PaymentError::ServiceError(e.to_string()))?;
            let created = payments
                .create_payment_intent(amount_due, currency, description, metadata)
                .await
                .map_err(|e| PaymentError::ServiceError(e.to_string()))?;
            info!(
                "Replaced intent {} ({} -> {} {})",
                intent.id, intent.amount, amount_due, currency
            );
            return Ok(ReconcileOutcome::AmountUpdated {
                previous: intent.amount,
                intent: PaymentIntentRecord::from(created),
            });
        }
        // Cancelled intents fall through and get replaced.
    }

    let created = payments
        .create_payment_intent(amount_due, currency, description, metadata)
        .await
        .map_err(|e| PaymentError::ServiceError(e.to_string()))?;
    Ok(ReconcileOutcome::Created {
        intent: PaymentIntentRecord::from(created),
    })
}

// --- Webhook Processing Logic ---

/// Processes a verified processor webhook event.
///
/// `payment_intent.succeeded` marks the matching appointment's payment as
/// collected and publishes [`DomainEvent::PaymentReceived`]. Failed intents
/// are logged and leave state untouched. Unknown event types are
/// acknowledged and ignored.
pub async fn process_processor_webhook(
    event: ProcessorEvent,
    store: &dyn AppointmentStore,
    events: Option<&std::sync::Arc<dyn EventSink>>,
) -> Result<(), PaymentError> {
    info!("Processing processor event type: {}", event.event_type);

    match event.event_type.as_str() {
        "payment_intent.succeeded" => {
            let object: ProcessorIntentObject = serde_json::from_value(event.data.object)
                .map_err(|e| {
                    PaymentError::WebhookProcessingError(format!(
                        "Failed to parse payment intent object: {}",
                        e
                    ))
                })?;

            let Some(mut appointment) = store
                .get_by_intent_id(&object.id)
                .await
                .map_err(|e| PaymentError::StoreError(e.to_string()))?
            else {
                warn!(
                    "No appointment attached to intent {}; acknowledging event {}",
                    object.id, event.id
                );
                return Ok(());
            };

            let collected = object
                .amount
                .or_else(|| appointment.payment.intent.as_ref().map(|i| i.amount))
                .unwrap_or(0);

            if let Some(intent) = appointment.payment.intent.as_mut() {
                intent.status = IntentStatus::Succeeded;
                intent.client_secret = None;
            }
            appointment.payment.settled_intent_id = Some(object.id.clone());
            appointment.payment.collected += collected;
            if appointment.status == AppointmentStatus::Pending {
                appointment.status = AppointmentStatus::Confirmed;
            }
            appointment.updated_at = Utc::now();

            let appointment = store
                .update_appointment(appointment)
                .await
                .map_err(|e| PaymentError::StoreError(e.to_string()))?;

            info!(
                "Payment of {} collected for appointment {}",
                collected, appointment.id
            );

            if let Some(sink) = events {
                sink.publish(DomainEvent::PaymentReceived {
                    appointment_id: appointment.id,
                    amount_cents: collected,
                });
            }
        }
        "payment_intent.payment_failed" => {
            let payment_intent_id: Option<&str> =
                event.data.object.get("id").and_then(|v| v.as_str());
            warn!("PaymentIntent failed: {:?}", payment_intent_id);
        }
        _ => {
            info!("Received unhandled processor event type: {}", event.event_type);
        }
    }
    Ok(())
}
