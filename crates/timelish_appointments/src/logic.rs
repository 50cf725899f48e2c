// --- File: crates/timelish_appointments/src/logic.rs ---
//! Appointment modification orchestration.
//!
//! Each operation fetches the domain objects through the injected store,
//! runs the pure policy evaluators, applies mutations through the injected
//! services, and publishes the resulting domain event. Policy time is
//! measured against the appointment's *current* start time at the moment
//! the request is handled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppointmentError;
use timelish_common::models::{
    Appointment, AppointmentStatus, Customer, DomainEvent, IntentStatus, PaymentState,
};
use timelish_common::services::{
    AppointmentStore, BoxedError, EventSink, NotificationService, PaymentService,
};
use timelish_config::{AppConfig, DepositRuleConfig};
use timelish_payments::{reconcile_intent, ReconcileOutcome};
use timelish_policy::{
    cancellation_refund, evaluate_payment_requirement, reschedule_charge, CancellationOutcome,
    ChargeDecision, DepositRule, PaymentRequirement, PolicySchedule, RefundDecision,
    RescheduleOutcome,
};

/// The injected services an appointment operation runs against.
pub struct AppointmentServices<'a> {
    pub store: &'a dyn AppointmentStore,
    pub payments: Option<&'a Arc<dyn PaymentService<Error = BoxedError>>>,
    pub notifications: Option<&'a Arc<dyn NotificationService<Error = BoxedError>>>,
    pub events: Option<&'a Arc<dyn EventSink>>,
}

// --- Request / Response Structures ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CustomerInput {
    pub name: String,
    pub phone: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookAppointmentRequest {
    pub option_id: Uuid,
    /// A registered customer id; mutually exclusive with `customer`.
    pub customer_id: Option<Uuid>,
    /// Inline customer details for first-time bookers.
    pub customer: Option<CustomerInput>,
    /// ISO 8601 start time, e.g. "2026-09-01T10:00:00Z".
    pub start_time: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingResponse {
    pub appointment: Appointment,
    pub requirement: PaymentRequirement,
    /// Client secret of the payment intent, when a payment is due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CancellationResponse {
    pub appointment: Appointment,
    /// Cents refunded as part of this cancellation.
    pub refund_cents: i64,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RescheduleAppointmentRequest {
    /// ISO 8601 start time of the new slot.
    pub new_start_time: String,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RescheduleResponse {
    pub appointment: Appointment,
    /// Reschedule fee in cents, zero when the move was free.
    pub fee_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

// --- Helpers ---

fn parse_start_time(raw: &str) -> Result<DateTime<Utc>, AppointmentError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppointmentError::ValidationError(format!("Invalid start_time: {}", e)))
}

fn currency_of(config: &AppConfig) -> String {
    config
        .payments
        .as_ref()
        .map(|p| p.currency.clone())
        .unwrap_or_else(|| "usd".to_string())
}

fn require_payments<'a>(
    services: &AppointmentServices<'a>,
) -> Result<&'a Arc<dyn PaymentService<Error = BoxedError>>, AppointmentError> {
    services.payments.ok_or_else(|| {
        AppointmentError::ServiceUnavailable("Payment processor is not available".to_string())
    })
}

fn publish(services: &AppointmentServices<'_>, event: DomainEvent) {
    if let Some(sink) = services.events {
        sink.publish(event);
    }
}

/// Sends a templated SMS to the customer, fire-and-forget. Failures are
/// logged and never fail the operation.
fn notify_sms(
    config: &AppConfig,
    services: &AppointmentServices<'_>,
    phone: Option<&str>,
    message: String,
) {
    if !config.use_sms {
        return;
    }
    let (Some(notifications), Some(phone)) = (services.notifications, phone) else {
        return;
    };
    let notifications = Arc::clone(notifications);
    let phone = phone.to_string();
    tokio::spawn(async move {
        if let Err(e) = notifications.send_sms(&phone, &message).await {
            warn!("Failed to send SMS to {}: {}", phone, e);
        }
    });
}

async fn resolve_customer(
    services: &AppointmentServices<'_>,
    request_customer_id: Option<Uuid>,
    request_customer: Option<CustomerInput>,
) -> Result<Customer, AppointmentError> {
    match (request_customer_id, request_customer) {
        (Some(id), _) => services
            .store
            .get_customer(id)
            .await?
            .ok_or(AppointmentError::CustomerNotFound(id)),
        (None, Some(input)) => {
            let customer = Customer {
                id: Uuid::new_v4(),
                name: input.name,
                phone: input.phone,
                deposit_rule: DepositRuleConfig::Inherit,
            };
            Ok(services.store.insert_customer(customer).await?)
        }
        (None, None) => Err(AppointmentError::ValidationError(
            "Either customer_id or customer is required".to_string(),
        )),
    }
}

// --- Book ---

/// Books a new appointment.
///
/// Evaluates the payment requirement over the customer → option → tenant
/// default precedence chain, reconciles a payment intent when something is
/// due, and persists the appointment as `Pending` (payment outstanding) or
/// `Confirmed` (nothing due).
pub async fn book_appointment(
    config: &Arc<AppConfig>,
    services: &AppointmentServices<'_>,
    request: BookAppointmentRequest,
) -> Result<BookingResponse, AppointmentError> {
    let start_time = parse_start_time(&request.start_time)?;
    if start_time <= Utc::now() {
        return Err(AppointmentError::ValidationError(
            "start_time must be in the future".to_string(),
        ));
    }

    let option = services
        .store
        .get_option(request.option_id)
        .await?
        .ok_or(AppointmentError::OptionNotFound(request.option_id))?;
    let customer = resolve_customer(services, request.customer_id, request.customer).await?;

    let requirement = evaluate_payment_requirement(
        &DepositRule::try_from(&customer.deposit_rule)?,
        &DepositRule::try_from(&option.deposit_rule)?,
        &DepositRule::try_from(&config.scheduling.default_deposit)?,
        option.price,
    );

    let appointment_id = Uuid::new_v4();
    let currency = currency_of(config);

    let intent = if requirement == PaymentRequirement::None {
        None
    } else {
        let payments = require_payments(services)?;
        let outcome = reconcile_intent(
            payments.as_ref(),
            None,
            &requirement,
            &currency,
            Some(&option.name),
            Some(json!({ "appointment_id": appointment_id })),
        )
        .await?;
        outcome.intent().cloned()
    };

    let client_secret = intent.as_ref().and_then(|i| i.client_secret.clone());
    let status = if intent.is_some() {
        AppointmentStatus::Pending
    } else {
        AppointmentStatus::Confirmed
    };

    let now = Utc::now();
    let appointment = Appointment {
        id: appointment_id,
        customer_id: customer.id,
        option_id: option.id,
        start_time,
        duration_minutes: option.duration_minutes,
        price: option.price,
        currency,
        status,
        payment: PaymentState {
            collected: 0,
            refunded: 0,
            intent,
            settled_intent_id: None,
        },
        created_at: now,
        updated_at: now,
    };
    let appointment = services.store.insert_appointment(appointment).await?;

    info!(
        "Booked appointment {} for customer {} ({:?})",
        appointment.id, customer.id, appointment.status
    );

    publish(
        services,
        DomainEvent::AppointmentBooked {
            appointment_id: appointment.id,
            customer_id: customer.id,
            start_time: appointment.start_time,
        },
    );
    notify_sms(
        config,
        services,
        customer.phone.as_deref(),
        format!(
            "Your {} appointment on {} is booked.",
            option.name,
            appointment.start_time.to_rfc3339()
        ),
    );

    Ok(BookingResponse {
        appointment,
        requirement,
        client_secret,
    })
}

// --- Cancel ---

/// Cancels an appointment under the applicable cancellation policy tier.
///
/// `policy_override` replaces the resolved tier outcome; the admin surface
/// uses it to bypass the policy with a full refund.
pub async fn cancel_appointment(
    config: &Arc<AppConfig>,
    services: &AppointmentServices<'_>,
    appointment_id: Uuid,
    request: CancelAppointmentRequest,
    policy_override: Option<CancellationOutcome>,
) -> Result<CancellationResponse, AppointmentError> {
    let mut appointment = services
        .store
        .get_appointment(appointment_id)
        .await?
        .ok_or(AppointmentError::NotFound(appointment_id))?;

    match appointment.status {
        AppointmentStatus::Cancelled => {
            return Err(AppointmentError::Conflict(
                "Appointment is already cancelled".to_string(),
            ))
        }
        AppointmentStatus::Completed => {
            return Err(AppointmentError::Conflict(
                "Completed appointments cannot be cancelled".to_string(),
            ))
        }
        AppointmentStatus::Pending | AppointmentStatus::Confirmed => {}
    }

    let outcome = match policy_override {
        Some(outcome) => outcome,
        None => {
            let option = services.store.get_option(appointment.option_id).await?;
            let schedule_config = option
                .as_ref()
                .and_then(|o| o.cancellation.as_ref())
                .unwrap_or(&config.scheduling.cancellation);
            let schedule = PolicySchedule::try_from(schedule_config)?;
            let minutes_before = (appointment.start_time - Utc::now()).num_minutes();
            *schedule.resolve(minutes_before)
        }
    };

    let refundable = appointment.payment.collected - appointment.payment.refunded;
    let refund_cents = match cancellation_refund(refundable, &outcome) {
        RefundDecision::Denied => {
            return Err(AppointmentError::PolicyDenied(
                "Cancellation is not allowed this close to the appointment".to_string(),
            ))
        }
        RefundDecision::NotDue => 0,
        RefundDecision::Due { amount } => {
            let settled_intent_id = appointment
                .payment
                .settled_intent_id
                .clone()
                .or_else(|| {
                    appointment
                        .payment
                        .intent
                        .as_ref()
                        .filter(|i| i.status == IntentStatus::Succeeded)
                        .map(|i| i.id.clone())
                })
                .ok_or_else(|| {
                    AppointmentError::InternalError(
                        "Collected payment without a settled intent record".to_string(),
                    )
                })?;
            let payments = require_payments(services)?;
            payments
                .create_refund(&settled_intent_id, Some(amount), request.reason.as_deref())
                .await
                .map_err(|e| {
                    AppointmentError::Payment(timelish_payments::PaymentError::ServiceError(
                        e.to_string(),
                    ))
                })?;
            appointment.payment.refunded += amount;
            amount
        }
    };

    // A still-unpaid intent is cancelled so the customer is never charged
    // after the fact.
    if let Some(intent) = appointment.payment.intent.as_mut() {
        if intent.status.is_live() {
            let payments = require_payments(services)?;
            payments.cancel_payment_intent(&intent.id).await.map_err(|e| {
                AppointmentError::Payment(timelish_payments::PaymentError::ServiceError(
                    e.to_string(),
                ))
            })?;
            intent.status = IntentStatus::Cancelled;
            intent.client_secret = None;
        }
    }

    appointment.status = AppointmentStatus::Cancelled;
    appointment.updated_at = Utc::now();
    let appointment = services.store.update_appointment(appointment).await?;

    info!(
        "Cancelled appointment {} (refund: {} cents)",
        appointment.id, refund_cents
    );

    publish(
        services,
        DomainEvent::AppointmentCancelled {
            appointment_id: appointment.id,
            refund_cents,
        },
    );
    if let Some(customer) = services.store.get_customer(appointment.customer_id).await? {
        notify_sms(
            config,
            services,
            customer.phone.as_deref(),
            format!(
                "Your appointment on {} has been cancelled.",
                appointment.start_time.to_rfc3339()
            ),
        );
    }

    Ok(CancellationResponse {
        appointment,
        refund_cents,
    })
}

// --- Reschedule ---

/// Moves an appointment to a new slot under the applicable reschedule
/// policy tier. A resolved fee is collected by reconciling the
/// appointment's live intent to cover it (on top of anything still
/// outstanding).
pub async fn reschedule_appointment(
    config: &Arc<AppConfig>,
    services: &AppointmentServices<'_>,
    appointment_id: Uuid,
    request: RescheduleAppointmentRequest,
) -> Result<RescheduleResponse, AppointmentError> {
    let new_start_time = parse_start_time(&request.new_start_time)?;
    if new_start_time <= Utc::now() {
        return Err(AppointmentError::ValidationError(
            "new_start_time must be in the future".to_string(),
        ));
    }

    let mut appointment = services
        .store
        .get_appointment(appointment_id)
        .await?
        .ok_or(AppointmentError::NotFound(appointment_id))?;

    match appointment.status {
        AppointmentStatus::Cancelled => {
            return Err(AppointmentError::Conflict(
                "Cancelled appointments cannot be rescheduled".to_string(),
            ))
        }
        AppointmentStatus::Completed => {
            return Err(AppointmentError::Conflict(
                "Completed appointments cannot be rescheduled".to_string(),
            ))
        }
        AppointmentStatus::Pending | AppointmentStatus::Confirmed => {}
    }

    let option = services.store.get_option(appointment.option_id).await?;
    let schedule_config = option
        .as_ref()
        .and_then(|o| o.reschedule.as_ref())
        .unwrap_or(&config.scheduling.reschedule);
    let schedule = PolicySchedule::try_from(schedule_config)?;
    let minutes_before = (appointment.start_time - Utc::now()).num_minutes();
    let outcome: RescheduleOutcome = *schedule.resolve(minutes_before);

    let fee_cents = match reschedule_charge(appointment.price, &outcome) {
        ChargeDecision::Denied => {
            return Err(AppointmentError::PolicyDenied(
                "Rescheduling is not allowed this close to the appointment".to_string(),
            ))
        }
        ChargeDecision::Free => 0,
        ChargeDecision::Due { amount } => amount,
    };

    let mut client_secret = None;
    if fee_cents > 0 {
        let payments = require_payments(services)?;
        // The fee stacks onto whatever is still outstanding on a live
        // intent; a settled intent stays untouched and the fee gets its own.
        let existing = appointment
            .payment
            .intent
            .as_ref()
            .filter(|i| i.status.is_live());
        let outstanding = existing.map(|i| i.amount).unwrap_or(0);
        let reconcile_outcome = reconcile_intent(
            payments.as_ref(),
            existing,
            &PaymentRequirement::Deposit {
                amount_due: outstanding + fee_cents,
            },
            &appointment.currency,
            Some("Reschedule fee"),
            Some(json!({ "appointment_id": appointment.id })),
        )
        .await?;
        if let Some(intent) = reconcile_outcome.intent() {
            // Keep the settled intent reachable for later refunds before the
            // fee intent takes over the slot.
            if let Some(previous) = appointment.payment.intent.as_ref() {
                if previous.status == IntentStatus::Succeeded {
                    appointment.payment.settled_intent_id = Some(previous.id.clone());
                }
            }
            client_secret = intent.client_secret.clone();
            appointment.payment.intent = Some(intent.clone());
        }
        if matches!(reconcile_outcome, ReconcileOutcome::Created { .. }) {
            // Fee intent replaced a settled one only logically; the settled
            // money remains accounted in `collected`.
            appointment.status = AppointmentStatus::Pending;
        }
    }

    let previous_start = appointment.start_time;
    appointment.start_time = new_start_time;
    appointment.updated_at = Utc::now();
    let appointment = services.store.update_appointment(appointment).await?;

    info!(
        "Rescheduled appointment {} from {} to {} (fee: {} cents)",
        appointment.id, previous_start, new_start_time, fee_cents
    );

    publish(
        services,
        DomainEvent::AppointmentRescheduled {
            appointment_id: appointment.id,
            start_time: appointment.start_time,
        },
    );
    if let Some(customer) = services.store.get_customer(appointment.customer_id).await? {
        notify_sms(
            config,
            services,
            customer.phone.as_deref(),
            format!(
                "Your appointment has been moved to {}.",
                appointment.start_time.to_rfc3339()
            ),
        );
    }

    Ok(RescheduleResponse {
        appointment,
        fee_cents,
        client_secret,
    })
}

// --- Reads ---

pub async fn get_appointment(
    services: &AppointmentServices<'_>,
    appointment_id: Uuid,
) -> Result<Appointment, AppointmentError> {
    services
        .store
        .get_appointment(appointment_id)
        .await?
        .ok_or(AppointmentError::NotFound(appointment_id))
}

pub async fn list_appointments(
    services: &AppointmentServices<'_>,
) -> Result<Vec<Appointment>, AppointmentError> {
    Ok(services.store.list_appointments().await?)
}
