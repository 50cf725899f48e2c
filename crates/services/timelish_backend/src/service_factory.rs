// --- File: crates/services/timelish_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! This module provides the [`ServiceFactory`] implementation for the
//! backend service: it initializes the payment processor client, the SMS
//! notification service, the webhook event sink and the appointment store
//! based on compile-time features and runtime configuration, and hands them
//! to the route layers through the trait.

use std::sync::Arc;
use timelish_config::AppConfig;
#[allow(unused_imports)] // some imports are only used by certain features
use {
    timelish_common::services::{
        AppointmentStore, BoxedError, EventSink, NotificationService, PaymentService,
        ServiceFactory,
    },
    timelish_common::{is_dispatch_enabled, is_payments_enabled, is_sms_enabled},
    tracing::{error, info, warn},
};

#[cfg(feature = "appointments")]
use timelish_appointments::InMemoryAppointmentStore;

#[cfg(feature = "dispatch")]
use timelish_dispatch::{SmsNotificationService, WebhookDispatcher};

#[cfg(feature = "payments")]
use timelish_payments::RestPaymentService;

/// Service factory for the backend.
///
/// Services are initialized once at startup; a feature that is compiled in
/// but disabled via runtime config (or missing its config section) simply
/// yields `None` and the depending routes degrade to 503s.
pub struct TimelishServiceFactory {
    #[allow(dead_code)]
    config: Arc<AppConfig>,
    #[cfg(feature = "payments")]
    payment_service: Option<Arc<dyn PaymentService<Error = BoxedError>>>,
    #[cfg(feature = "dispatch")]
    notification_service: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
    #[cfg(feature = "dispatch")]
    event_sink: Option<Arc<dyn EventSink>>,
    #[cfg(feature = "appointments")]
    appointment_store: Option<Arc<dyn AppointmentStore>>,
}

impl TimelishServiceFactory {
    /// Create a new service factory.
    pub fn new(config: Arc<AppConfig>) -> Self {
        #[allow(unused_mut)]
        let mut factory = Self {
            config: config.clone(),
            #[cfg(feature = "payments")]
            payment_service: None,
            #[cfg(feature = "dispatch")]
            notification_service: None,
            #[cfg(feature = "dispatch")]
            event_sink: None,
            #[cfg(feature = "appointments")]
            appointment_store: None,
        };

        #[cfg(feature = "payments")]
        {
            if is_payments_enabled(&config) {
                info!("ℹ️ Initializing payment processor service...");
                factory.payment_service =
                    Some(Arc::new(RestPaymentService::new(config.clone())));
                info!("✅ Payment processor service initialized.");
            } else {
                info!("ℹ️ Payments compiled, but disabled via runtime config or missing payments config section.");
            }
        }

        #[cfg(feature = "dispatch")]
        {
            if is_sms_enabled(&config) {
                info!("ℹ️ Initializing SMS notification service...");
                factory.notification_service =
                    Some(Arc::new(SmsNotificationService::new(config.clone())));
                info!("✅ SMS notification service initialized.");
            }
            if is_dispatch_enabled(&config) {
                let endpoints = config
                    .dispatch
                    .as_ref()
                    .map(|d| d.endpoints.len())
                    .unwrap_or(0);
                info!(
                    "ℹ️ Initializing webhook dispatcher for {} endpoint(s)...",
                    endpoints
                );
                factory.event_sink = Some(Arc::new(WebhookDispatcher::new(config.clone())));
                info!("✅ Webhook dispatcher initialized.");
            }
        }

        #[cfg(feature = "appointments")]
        {
            info!(
                "ℹ️ Seeding appointment store with {} option(s) and {} customer(s).",
                config.catalog.options.len(),
                config.catalog.customers.len()
            );
            factory.appointment_store = Some(Arc::new(InMemoryAppointmentStore::from_catalog(
                &config.catalog,
            )));
        }

        factory
    }
}

impl ServiceFactory for TimelishServiceFactory {
    fn payment_service(&self) -> Option<Arc<dyn PaymentService<Error = BoxedError>>> {
        #[cfg(feature = "payments")]
        {
            if let Some(service) = self.payment_service.clone() {
                return Some(service);
            }
        }
        None
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>> {
        #[cfg(feature = "dispatch")]
        {
            if let Some(service) = self.notification_service.clone() {
                return Some(service);
            }
        }
        None
    }

    fn appointment_store(&self) -> Option<Arc<dyn AppointmentStore>> {
        #[cfg(feature = "appointments")]
        {
            if let Some(store) = self.appointment_store.clone() {
                return Some(store);
            }
        }
        None
    }

    fn event_sink(&self) -> Option<Arc<dyn EventSink>> {
        #[cfg(feature = "dispatch")]
        {
            if let Some(sink) = self.event_sink.clone() {
                return Some(sink);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timelish_config::{CatalogConfig, SchedulingConfig, ServerConfig};

    fn config(use_payments: bool) -> Arc<AppConfig> {
        Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            use_payments,
            use_dispatch: false,
            use_sms: false,
            scheduling: SchedulingConfig::default(),
            catalog: CatalogConfig::default(),
            payments: None,
            dispatch: None,
            sms: None,
            admin: None,
        })
    }

    #[test]
    fn disabled_payments_yield_no_service() {
        // use_payments without a payments section stays off too.
        let factory = TimelishServiceFactory::new(config(true));
        assert!(factory.payment_service().is_none());
        assert!(factory.notification_service().is_none());
        assert!(factory.event_sink().is_none());
    }

    #[cfg(feature = "appointments")]
    #[test]
    fn appointment_store_is_always_wired() {
        let factory = TimelishServiceFactory::new(config(false));
        assert!(factory.appointment_store().is_some());
    }
}
