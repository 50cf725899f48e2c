// --- File: crates/timelish_appointments/src/auth.rs ---

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq; // For secure string comparison
use std::sync::Arc;
use tracing::{error, warn};

use timelish_config::AppConfig;

// The state that this auth middleware will have access to.
// It needs the AppConfig to get the shared secret.
#[derive(Clone)]
pub struct AdminAuthState {
    pub config: Arc<AppConfig>,
}

pub const INTERNAL_AUTH_HEADER: &str = "X-Internal-Auth-Secret";

/// Axum middleware to authenticate admin requests.
/// Checks for a shared secret in the `X-Internal-Auth-Secret` header,
/// configured in the `admin` section or the `ADMIN_SHARED_SECRET` env var.
pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    req: Request,
    next: Next,
) -> Response {
    let expected_secret = auth_state
        .config
        .admin
        .as_ref()
        .and_then(|admin| admin.shared_secret.clone())
        .or_else(|| std::env::var("ADMIN_SHARED_SECRET").ok());

    let Some(expected_secret) = expected_secret else {
        error!("🚨 Admin shared secret not configured!");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server configuration error for admin auth.".to_string(),
        )
            .into_response();
    };

    let provided_secret = req
        .headers()
        .get(INTERNAL_AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided_secret {
        Some(provided_secret) => {
            if constant_time_eq(provided_secret.as_bytes(), expected_secret.as_bytes()) {
                next.run(req).await
            } else {
                warn!("🚨 Admin request: invalid secret provided.");
                (
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized: Invalid credentials.".to_string(),
                )
                    .into_response()
            }
        }
        None => {
            warn!("🚨 Admin request: missing '{}' header.", INTERNAL_AUTH_HEADER);
            (
                StatusCode::UNAUTHORIZED,
                format!("Unauthorized: Missing {} header.", INTERNAL_AUTH_HEADER),
            )
                .into_response()
        }
    }
}
