// --- File: crates/timelish_appointments/src/handlers.rs ---
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::error::AppointmentError;
use crate::logic::{
    book_appointment, cancel_appointment, get_appointment, list_appointments,
    reschedule_appointment, AppointmentServices, BookAppointmentRequest, BookingResponse,
    CancelAppointmentRequest, CancellationResponse, RescheduleAppointmentRequest,
    RescheduleResponse,
};
use timelish_common::models::Appointment;
use timelish_common::services::{
    AppointmentStore, BoxedError, EventSink, NotificationService, PaymentService, ServiceFactory,
};
use timelish_common::HttpStatusCode;
use timelish_config::AppConfig;
use timelish_policy::CancellationOutcome;

// --- State for Appointment Handlers ---
#[derive(Clone)]
pub struct AppointmentsState {
    pub config: Arc<AppConfig>,
    pub store: Option<Arc<dyn AppointmentStore>>,
    pub payments: Option<Arc<dyn PaymentService<Error = BoxedError>>>,
    pub notifications: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
    pub events: Option<Arc<dyn EventSink>>,
}

impl AppointmentsState {
    pub fn from_factory(config: Arc<AppConfig>, factory: &Arc<dyn ServiceFactory>) -> Self {
        Self {
            config,
            store: factory.appointment_store(),
            payments: factory.payment_service(),
            notifications: factory.notification_service(),
            events: factory.event_sink(),
        }
    }

    /// Borrows the injected services for a logic call. Errors when no store
    /// is wired in, which is a deployment problem, not a caller problem.
    fn services(&self) -> Result<AppointmentServices<'_>, (StatusCode, String)> {
        let store = self.store.as_ref().ok_or_else(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Appointment store is not available.".to_string(),
            )
        })?;
        Ok(AppointmentServices {
            store: store.as_ref(),
            payments: self.payments.as_ref(),
            notifications: self.notifications.as_ref(),
            events: self.events.as_ref(),
        })
    }
}

fn error_response(err: AppointmentError) -> (StatusCode, String) {
    warn!("Appointment operation failed: {}", err);
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string())
}

/// Axum handler to book a new appointment.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments", // Path relative to /api
    request_body = BookAppointmentRequest,
    responses(
        (status = 200, description = "Appointment booked", body = BookingResponse),
        (status = 400, description = "Bad Request"),
        (status = 404, description = "Unknown option or customer"),
        (status = 503, description = "Required payment service unavailable")
    ),
    tag = "Appointments"
))]
pub async fn book_appointment_handler(
    State(state): State<Arc<AppointmentsState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<Json<BookingResponse>, (StatusCode, String)> {
    let services = state.services()?;
    book_appointment(&state.config, &services, payload)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Axum handler to fetch a single appointment.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/appointments/{id}", // Path relative to /api
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "The appointment", body = Appointment),
        (status = 404, description = "Appointment not found")
    ),
    tag = "Appointments"
))]
pub async fn get_appointment_handler(
    State(state): State<Arc<AppointmentsState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, (StatusCode, String)> {
    let services = state.services()?;
    get_appointment(&services, id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Axum handler to cancel an appointment under the cancellation policy.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments/{id}/cancel", // Path relative to /api
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = CancelAppointmentRequest,
    responses(
        (status = 200, description = "Appointment cancelled", body = CancellationResponse),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Refused by policy or state")
    ),
    tag = "Appointments"
))]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<AppointmentsState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<Json<CancellationResponse>, (StatusCode, String)> {
    let services = state.services()?;
    cancel_appointment(&state.config, &services, id, payload, None)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Axum handler to reschedule an appointment under the reschedule policy.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments/{id}/reschedule", // Path relative to /api
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = RescheduleAppointmentRequest,
    responses(
        (status = 200, description = "Appointment rescheduled", body = RescheduleResponse),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Refused by policy or state")
    ),
    tag = "Appointments"
))]
pub async fn reschedule_appointment_handler(
    State(state): State<Arc<AppointmentsState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RescheduleAppointmentRequest>,
) -> Result<Json<RescheduleResponse>, (StatusCode, String)> {
    let services = state.services()?;
    reschedule_appointment(&state.config, &services, id, payload)
        .await
        .map(Json)
        .map_err(error_response)
}

// --- Admin Handlers (behind the shared-secret middleware) ---

/// Axum handler to list all appointments (admin).
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/admin/appointments", // Path relative to /api
    responses(
        (status = 200, description = "All appointments", body = Vec<Appointment>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Appointments Admin"
))]
pub async fn list_appointments_handler(
    State(state): State<Arc<AppointmentsState>>,
) -> Result<Json<Vec<Appointment>>, (StatusCode, String)> {
    let services = state.services()?;
    list_appointments(&services)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Axum handler to cancel an appointment bypassing the policy (admin).
/// The customer is refunded in full.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/appointments/{id}/cancel", // Path relative to /api
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = CancelAppointmentRequest,
    responses(
        (status = 200, description = "Appointment cancelled", body = CancellationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Appointment not found")
    ),
    tag = "Appointments Admin"
))]
pub async fn admin_cancel_appointment_handler(
    State(state): State<Arc<AppointmentsState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelAppointmentRequest>,
) -> Result<Json<CancellationResponse>, (StatusCode, String)> {
    let services = state.services()?;
    cancel_appointment(
        &state.config,
        &services,
        id,
        payload,
        Some(CancellationOutcome::FullRefund),
    )
    .await
    .map(Json)
    .map_err(error_response)
}
