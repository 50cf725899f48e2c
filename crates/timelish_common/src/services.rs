// --- File: crates/timelish_common/src/services.rs ---
//! Service abstractions for injected services.
//!
//! This module provides trait definitions for the services the application
//! logic is written against: the payment processor, the notification
//! gateway, the appointment store, and the domain event sink. These traits
//! allow for dependency injection and easier testing by decoupling the
//! orchestration layer from specific implementations.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Appointment, BookingOption, Customer, DomainEvent};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for
/// Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// A trait for payment service operations.
///
/// This trait defines the operations performed against the payment
/// processor: creating and cancelling payment intents and issuing refunds.
pub trait PaymentService: Send + Sync {
    /// Error type returned by payment service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a payment intent.
    fn create_payment_intent(
        &self,
        amount: i64,
        currency: &str,
        description: Option<&str>,
        metadata: Option<serde_json::Value>,
    ) -> BoxFuture<'_, PaymentIntentResult, Self::Error>;

    /// Cancel a payment intent.
    fn cancel_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> BoxFuture<'_, PaymentIntentResult, Self::Error>;

    /// Create a refund against a (captured) payment intent.
    fn create_refund(
        &self,
        payment_intent_id: &str,
        amount: Option<i64>,
        reason: Option<&str>,
    ) -> BoxFuture<'_, RefundResult, Self::Error>;
}

/// A trait for notification service operations.
pub trait NotificationService: Send + Sync {
    /// Error type returned by notification service operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send an SMS notification.
    fn send_sms(&self, to: &str, body: &str) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// Errors returned by [`AppointmentStore`] implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store failure: {0}")]
    Internal(String),
}

/// A trait for appointment persistence.
///
/// Persistence proper is delegated to whatever backs an implementation;
/// the orchestration layer only ever talks to this trait.
pub trait AppointmentStore: Send + Sync {
    fn insert_appointment(&self, appointment: Appointment)
        -> BoxFuture<'_, Appointment, StoreError>;

    fn get_appointment(&self, id: Uuid) -> BoxFuture<'_, Option<Appointment>, StoreError>;

    /// Looks an appointment up by the id of its attached payment intent.
    fn get_by_intent_id(&self, intent_id: &str)
        -> BoxFuture<'_, Option<Appointment>, StoreError>;

    /// Replaces the stored appointment with the same id. Errors when the
    /// appointment does not exist.
    fn update_appointment(&self, appointment: Appointment)
        -> BoxFuture<'_, Appointment, StoreError>;

    fn list_appointments(&self) -> BoxFuture<'_, Vec<Appointment>, StoreError>;

    fn get_customer(&self, id: Uuid) -> BoxFuture<'_, Option<Customer>, StoreError>;

    fn insert_customer(&self, customer: Customer) -> BoxFuture<'_, Customer, StoreError>;

    fn get_option(&self, id: Uuid) -> BoxFuture<'_, Option<BookingOption>, StoreError>;
}

/// A sink for domain events.
///
/// Publishing is fire-and-forget: implementations hand the event off (e.g.
/// spawn the webhook deliveries) and return immediately. A failed delivery
/// never propagates to the caller.
pub trait EventSink: Send + Sync {
    fn publish(&self, event: DomainEvent);
}

/// A factory for creating service instances.
///
/// This trait provides access to the per-tenant service instances the
/// application needs. Each accessor returns `None` when the corresponding
/// integration is not built in or not enabled at runtime.
pub trait ServiceFactory: Send + Sync {
    /// Get a payment service instance.
    fn payment_service(&self) -> Option<Arc<dyn PaymentService<Error = BoxedError>>>;

    /// Get a notification service instance.
    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>>;

    /// Get the appointment store.
    fn appointment_store(&self) -> Option<Arc<dyn AppointmentStore>>;

    /// Get the domain event sink.
    fn event_sink(&self) -> Option<Arc<dyn EventSink>>;
}

/// Data structures for payment service operations.
/// Represents the result of a payment intent operation.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentResult {
    /// The ID of the payment intent.
    pub id: String,
    /// The status of the payment intent.
    pub status: String,
    /// The amount of the payment intent, in cents.
    pub amount: i64,
    /// The currency of the payment intent.
    pub currency: String,
    /// The client secret for the payment intent.
    pub client_secret: Option<String>,
}

/// Represents the result of a refund operation.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundResult {
    /// The ID of the refund.
    pub id: String,
    /// The status of the refund.
    pub status: String,
    /// The amount of the refund, in cents.
    pub amount: i64,
    /// The currency of the refund.
    pub currency: String,
}

/// Represents the result of a notification operation.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// The ID of the notification.
    pub id: String,
    /// The status of the notification.
    pub status: String,
}
