// --- File: crates/timelish_appointments/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    BookAppointmentRequest, BookingResponse, CancelAppointmentRequest, CancellationResponse,
    CustomerInput, RescheduleAppointmentRequest, RescheduleResponse,
};
use timelish_common::models::{
    Appointment, AppointmentStatus, IntentStatus, PaymentIntentRecord, PaymentState,
};
use timelish_policy::PaymentRequirement;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::book_appointment_handler,
        crate::handlers::get_appointment_handler,
        crate::handlers::cancel_appointment_handler,
        crate::handlers::reschedule_appointment_handler,
        crate::handlers::list_appointments_handler,
        crate::handlers::admin_cancel_appointment_handler
    ),
    components(
        schemas(
            BookAppointmentRequest, BookingResponse, CustomerInput,
            CancelAppointmentRequest, CancellationResponse,
            RescheduleAppointmentRequest, RescheduleResponse,
            Appointment, AppointmentStatus, PaymentState, PaymentIntentRecord, IntentStatus,
            PaymentRequirement
        )
    ),
    tags(
        (name = "Appointments", description = "Public booking and modification API"),
        (name = "Appointments Admin", description = "Admin operations behind the shared-secret header")
    )
)]
pub struct AppointmentsApiDoc;
