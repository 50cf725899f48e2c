// --- File: crates/timelish_payments/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod service;

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

pub use error::PaymentError;
pub use logic::{
    process_processor_webhook, reconcile_intent, verify_processor_signature, ProcessorEvent,
    ReconcileOutcome,
};
pub use service::RestPaymentService;
