// --- File: crates/timelish_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; //    Error handling
pub mod features; // Feature flag handling
pub mod http; //     HTTP utilities
pub mod logging; //  Logging utilities
pub mod models; //   Shared domain models
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, conflict, external_service_error, internal_error, not_found, validation_error,
    Context, HttpStatusCode, TimelishError,
};

// Re-export HTTP utilities for easier access
pub use http::client::{create_client, HTTP_CLIENT};

// Re-export feature flag handling utilities for easier access
pub use features::{is_dispatch_enabled, is_feature_enabled, is_payments_enabled, is_sms_enabled};
