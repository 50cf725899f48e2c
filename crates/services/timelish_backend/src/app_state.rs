// --- File: crates/services/timelish_backend/src/app_state.rs ---
use std::sync::Arc;
use timelish_common::services::ServiceFactory;
use timelish_config::AppConfig;

use crate::service_factory::TimelishServiceFactory;

/// Application state shared across all routes.
///
/// Holds the loaded configuration and the service factory the route layers
/// pull their injected services from. Keeping both behind one struct keeps
/// the dependency injection seam in a single place.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration loaded at startup.
    #[allow(dead_code)]
    pub config: Arc<AppConfig>,

    /// Service factory for accessing injected services.
    pub service_factory: Arc<dyn ServiceFactory>,
}

impl AppState {
    /// Create a new AppState with the given configuration.
    pub fn new(config: Arc<AppConfig>) -> Self {
        let service_factory: Arc<dyn ServiceFactory> =
            Arc::new(TimelishServiceFactory::new(config.clone()));
        Self {
            config,
            service_factory,
        }
    }
}
