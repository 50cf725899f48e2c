// File: services/timelish_backend/src/main.rs
use axum::{routing::get, Router};
use std::sync::Arc;
use timelish_config::load_config;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[cfg(feature = "appointments")]
use timelish_appointments::routes as appointments_routes;
#[cfg(feature = "payments")]
use timelish_payments::routes as payments_routes;

mod app_state;
mod service_factory;

use app_state::AppState;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    timelish_common::logging::init();

    let state = AppState::new(config.clone());

    let api_router = Router::new().route("/", get(|| async { "Welcome to Timelish API!" }));

    #[cfg(feature = "appointments")]
    let appointments_router = appointments_routes(config.clone(), state.service_factory.clone());
    #[cfg(feature = "payments")]
    let payments_router = payments_routes(config.clone(), state.service_factory.clone());

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut router = api_router;
        #[cfg(feature = "appointments")]
        {
            router = router.merge(appointments_router);
        }
        #[cfg(feature = "payments")]
        {
            router = router.merge(payments_router);
        }
        router
    });

    #[allow(unused_mut)] // mutated when the openapi feature is enabled
    let mut app = api_router;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        #[cfg(feature = "appointments")]
        use timelish_appointments::doc::AppointmentsApiDoc;
        #[cfg(feature = "payments")]
        use timelish_payments::doc::PaymentsApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the Merged OpenAPI Documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Timelish API",
                version = "0.1.0",
                description = "Timelish booking service API docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Timelish", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut openapi_doc = ApiDoc::openapi();
        #[cfg(feature = "appointments")]
        openapi_doc.merge(AppointmentsApiDoc::openapi());
        #[cfg(feature = "payments")]
        openapi_doc.merge(PaymentsApiDoc::openapi());
        info!("📖 Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind server address");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
