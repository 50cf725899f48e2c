// --- File: crates/timelish_appointments/src/error.rs ---
use thiserror::Error;
use timelish_common::services::StoreError;
use timelish_common::{HttpStatusCode, TimelishError};
use timelish_payments::PaymentError;
use timelish_policy::PolicyError;
use uuid::Uuid;

/// Appointment-operation-specific error types.
#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Appointment not found: {0}")]
    NotFound(Uuid),

    #[error("Booking option not found: {0}")]
    OptionNotFound(Uuid),

    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The applicable policy tier refuses the operation.
    #[error("Refused by policy: {0}")]
    PolicyDenied(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The tenant's policy tables are invalid.
    #[error("Policy table error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Required service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convert AppointmentError to TimelishError
impl From<AppointmentError> for TimelishError {
    fn from(err: AppointmentError) -> Self {
        match err {
            AppointmentError::NotFound(id) => {
                TimelishError::NotFoundError(format!("Appointment {}", id))
            }
            AppointmentError::OptionNotFound(id) => {
                TimelishError::NotFoundError(format!("Booking option {}", id))
            }
            AppointmentError::CustomerNotFound(id) => {
                TimelishError::NotFoundError(format!("Customer {}", id))
            }
            AppointmentError::Conflict(msg) => TimelishError::ConflictError(msg),
            AppointmentError::PolicyDenied(msg) => TimelishError::ConflictError(msg),
            AppointmentError::ValidationError(msg) => TimelishError::ValidationError(msg),
            AppointmentError::Policy(e) => TimelishError::ConfigError(e.to_string()),
            AppointmentError::Payment(e) => e.into(),
            AppointmentError::Store(e) => TimelishError::InternalError(e.to_string()),
            AppointmentError::ServiceUnavailable(msg) => TimelishError::ConfigError(msg),
            AppointmentError::InternalError(msg) => TimelishError::InternalError(msg),
        }
    }
}

impl HttpStatusCode for AppointmentError {
    fn status_code(&self) -> u16 {
        match self {
            AppointmentError::NotFound(_)
            | AppointmentError::OptionNotFound(_)
            | AppointmentError::CustomerNotFound(_) => 404,
            AppointmentError::Conflict(_) | AppointmentError::PolicyDenied(_) => 409,
            AppointmentError::ValidationError(_) => 400,
            AppointmentError::Policy(_) => 500,
            AppointmentError::Payment(e) => e.status_code(),
            AppointmentError::Store(e) => match e {
                StoreError::NotFound(_) => 404,
                StoreError::Conflict(_) => 409,
                StoreError::Internal(_) => 500,
            },
            AppointmentError::ServiceUnavailable(_) => 503,
            AppointmentError::InternalError(_) => 500,
        }
    }
}
