// --- File: crates/timelish_payments/src/error.rs ---
use thiserror::Error;
use timelish_common::{external_service_error, HttpStatusCode, TimelishError};

/// Payment-processor-specific error types.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Error occurred during a processor API request
    #[error("Processor API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the processor API
    #[error("Processor API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing a processor API response
    #[error("Failed to parse processor API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete payment configuration
    #[error("Payment configuration missing or incomplete")]
    ConfigError,

    /// Webhook signature verification failed
    #[error("Processor webhook signature verification failed: {0}")]
    WebhookSignatureError(String),

    /// Webhook event processing error
    #[error("Processor webhook event processing error: {0}")]
    WebhookProcessingError(String),

    /// A reconciliation request contradicts a settled intent
    #[error("Payment intent conflict: {0}")]
    IntentConflict(String),

    /// Error from the injected payment service
    #[error("Payment service error: {0}")]
    ServiceError(String),

    /// Error from the appointment store
    #[error("Store error: {0}")]
    StoreError(String),

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Convert PaymentError to TimelishError
impl From<PaymentError> for TimelishError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::RequestError(e) => {
                TimelishError::HttpError(format!("Processor request error: {}", e))
            }
            PaymentError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Payment processor",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            PaymentError::ParseError(e) => {
                TimelishError::ParseError(format!("Processor response parse error: {}", e))
            }
            PaymentError::ConfigError => {
                TimelishError::ConfigError("Payment configuration missing or incomplete".to_string())
            }
            PaymentError::WebhookSignatureError(msg) => {
                TimelishError::AuthError(format!("Processor webhook signature error: {}", msg))
            }
            PaymentError::WebhookProcessingError(msg) => {
                external_service_error("Processor webhook", msg)
            }
            PaymentError::IntentConflict(msg) => TimelishError::ConflictError(msg),
            PaymentError::ServiceError(msg) => external_service_error("Payment service", msg),
            PaymentError::StoreError(msg) => TimelishError::InternalError(msg),
            PaymentError::InternalError(msg) => {
                TimelishError::InternalError(format!("Payment internal error: {}", msg))
            }
        }
    }
}

impl HttpStatusCode for PaymentError {
    fn status_code(&self) -> u16 {
        match self {
            PaymentError::RequestError(_) => 500,
            PaymentError::ApiError { status_code, .. } => *status_code,
            PaymentError::ParseError(_) => 400,
            PaymentError::ConfigError => 500,
            PaymentError::WebhookSignatureError(_) => 401,
            PaymentError::WebhookProcessingError(_) => 500,
            PaymentError::IntentConflict(_) => 409,
            PaymentError::ServiceError(_) => 502,
            PaymentError::StoreError(_) => 500,
            PaymentError::InternalError(_) => 500,
        }
    }
}
