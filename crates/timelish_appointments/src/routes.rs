// --- File: crates/timelish_appointments/src/routes.rs ---

use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::handlers::{
    admin_cancel_appointment_handler, book_appointment_handler, cancel_appointment_handler,
    get_appointment_handler, list_appointments_handler, reschedule_appointment_handler,
    AppointmentsState,
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use timelish_common::services::ServiceFactory;
use timelish_config::AppConfig;

/// Creates a router containing all routes for the appointments feature.
pub fn routes(config: Arc<AppConfig>, factory: Arc<dyn ServiceFactory>) -> Router {
    let handler_state = Arc::new(AppointmentsState::from_factory(config.clone(), &factory));
    let auth_middleware_state = Arc::new(AdminAuthState { config });

    let public_router = Router::new()
        .route("/appointments", post(book_appointment_handler))
        .route("/appointments/{id}", get(get_appointment_handler))
        .route(
            "/appointments/{id}/cancel",
            post(cancel_appointment_handler),
        )
        .route(
            "/appointments/{id}/reschedule",
            post(reschedule_appointment_handler),
        )
        .with_state(handler_state.clone());

    let admin_router = Router::new()
        .route("/admin/appointments", get(list_appointments_handler))
        .route(
            "/admin/appointments/{id}/cancel",
            post(admin_cancel_appointment_handler),
        )
        .layer(middleware::from_fn_with_state(
            auth_middleware_state,
            admin_auth_middleware,
        ))
        .with_state(handler_state);

    public_router.merge(admin_router)
}
