//! Feature flag handling for the Timelish application.
//!
//! Feature flags are used in two ways:
//!
//! 1. Compile-time feature flags using `#[cfg(feature = "...")]` on the
//!    backend crate, selecting which integration crates are built in.
//! 2. Runtime feature flags using configuration values (`use_*` fields of
//!    [`AppConfig`]), selecting which built-in integrations are active.
//!
//! This module provides helper functions for the runtime side.

use std::sync::Arc;
use timelish_config::AppConfig;

/// Check if a feature is enabled at runtime based on configuration.
///
/// A feature counts as enabled when its `use_*` flag is set and its
/// configuration section is present.
pub fn is_feature_enabled<T>(
    _config: &Arc<AppConfig>,
    use_feature: bool,
    feature_config: Option<&T>,
) -> bool {
    use_feature && feature_config.is_some()
}

/// Check if the payment processor integration is enabled at runtime.
pub fn is_payments_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_payments, config.payments.as_ref())
}

/// Check if outbound webhook dispatch is enabled at runtime.
pub fn is_dispatch_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_dispatch, config.dispatch.as_ref())
}

/// Check if the SMS gateway integration is enabled at runtime.
pub fn is_sms_enabled(config: &Arc<AppConfig>) -> bool {
    is_feature_enabled(config, config.use_sms, config.sms.as_ref())
}
