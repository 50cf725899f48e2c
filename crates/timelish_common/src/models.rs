// --- File: crates/timelish_common/src/models.rs ---
//! Domain models shared across the application.
//!
//! These are the objects the orchestration layer fetches through injected
//! services, evaluates policies over, and mutates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timelish_config::{
    CancellationScheduleConfig, DepositRuleConfig, RescheduleScheduleConfig,
};
use uuid::Uuid;

/// Lifecycle of an appointment.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, waiting for a required payment.
    Pending,
    /// Booked and paid (or no payment was required).
    Confirmed,
    Cancelled,
    Completed,
}

/// Status of a payment intent, mirrored from the processor.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    RequiresPayment,
    Processing,
    Succeeded,
    Cancelled,
}

impl IntentStatus {
    /// Maps a processor status string onto the local enum. Unknown statuses
    /// are treated as still collectable.
    pub fn from_processor(status: &str) -> Self {
        match status {
            "succeeded" => IntentStatus::Succeeded,
            "processing" => IntentStatus::Processing,
            "canceled" | "cancelled" => IntentStatus::Cancelled,
            _ => IntentStatus::RequiresPayment,
        }
    }

    /// A live intent can still be updated or cancelled.
    pub fn is_live(&self) -> bool {
        matches!(self, IntentStatus::RequiresPayment | IntentStatus::Processing)
    }
}

/// A payment intent record kept on the appointment, mirrored from the
/// processor via [`PaymentIntentResult`].
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentRecord {
    pub id: String,
    pub status: IntentStatus,
    /// Amount in cents.
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl From<PaymentIntentResult> for PaymentIntentRecord {
    fn from(result: PaymentIntentResult) -> Self {
        Self {
            id: result.id,
            status: IntentStatus::from_processor(&result.status),
            amount: result.amount,
            currency: result.currency,
            client_secret: result.client_secret,
        }
    }
}

/// Money collected and refunded for an appointment, plus the live intent.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentState {
    /// Cents captured by the processor so far.
    pub collected: i64,
    /// Cents refunded so far.
    pub refunded: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<PaymentIntentRecord>,
    /// Id of the settled intent refunds are issued against. Survives the
    /// `intent` slot being taken over by a later (e.g. reschedule-fee)
    /// intent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_intent_id: Option<String>,
}

/// A booked time slot between the business and a customer.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub option_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: i64,
    /// Price in cents.
    pub price: i64,
    pub currency: String,
    pub status: AppointmentStatus,
    pub payment: PaymentState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer of the tenant. The deposit rule, when not `Inherit`,
/// overrides both the option rule and the tenant default.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub deposit_rule: DepositRuleConfig,
}

/// A bookable service option with its price and policy overrides.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOption {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i64,
    /// Price in cents.
    pub price: i64,
    #[serde(default)]
    pub deposit_rule: DepositRuleConfig,
    #[serde(default)]
    pub cancellation: Option<CancellationScheduleConfig>,
    #[serde(default)]
    pub reschedule: Option<RescheduleScheduleConfig>,
}

/// Domain events published on appointment and payment mutations, delivered
/// to configured webhook endpoints by the dispatch layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum DomainEvent {
    AppointmentBooked {
        appointment_id: Uuid,
        customer_id: Uuid,
        start_time: DateTime<Utc>,
    },
    AppointmentCancelled {
        appointment_id: Uuid,
        refund_cents: i64,
    },
    AppointmentRescheduled {
        appointment_id: Uuid,
        start_time: DateTime<Utc>,
    },
    PaymentReceived {
        appointment_id: Uuid,
        amount_cents: i64,
    },
}

impl DomainEvent {
    /// Stable event kind string, also used by endpoint event filters.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::AppointmentBooked { .. } => "appointment_booked",
            DomainEvent::AppointmentCancelled { .. } => "appointment_cancelled",
            DomainEvent::AppointmentRescheduled { .. } => "appointment_rescheduled",
            DomainEvent::PaymentReceived { .. } => "payment_received",
        }
    }

    pub fn appointment_id(&self) -> Uuid {
        match self {
            DomainEvent::AppointmentBooked { appointment_id, .. }
            | DomainEvent::AppointmentCancelled { appointment_id, .. }
            | DomainEvent::AppointmentRescheduled { appointment_id, .. }
            | DomainEvent::PaymentReceived { appointment_id, .. } => *appointment_id,
        }
    }
}

// Re-exported here so domain models and service results live side by side.
pub use crate::services::{NotificationResult, PaymentIntentResult, RefundResult};
