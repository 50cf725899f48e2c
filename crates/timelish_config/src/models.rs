// --- File: crates/timelish_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Payment Processor Config ---
// Holds non-secret processor config. Secrets loaded directly from env vars:
// PROCESSOR_SECRET_KEY, PROCESSOR_WEBHOOK_SECRET
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentsConfig {
    pub processor_url: String, // Mandatory, e.g. https://api.processor.example/v1
    pub currency: String,      // Mandatory, ISO code used for new intents
    pub statement_label: Option<String>,
}

// --- SMS Gateway Config ---
// Secret auth token loaded directly from env var: SMS_AUTH_TOKEN
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmsConfig {
    pub gateway_url: String, // Mandatory
    pub account: String,     // Mandatory, gateway account id
    pub sender: String,      // Mandatory, "From" number or alphanumeric id
}

// --- Outbound Webhook Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebhookEndpointConfig {
    pub url: String,
    /// Shared secret used to sign deliveries for this endpoint.
    pub secret: Option<String>,
    /// Event kinds this endpoint subscribes to. `None` means all events.
    pub events: Option<Vec<String>>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DispatchConfig {
    #[serde(default)]
    pub endpoints: Vec<WebhookEndpointConfig>,
}

// --- Admin Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    pub shared_secret: Option<String>, // Or from env var: ADMIN_SHARED_SECRET
}

// --- Deposit Rules ---

/// Whether (and how much of) a payment is required before a booking
/// is confirmed. `Inherit` defers to the next level in the
/// customer → option → tenant default precedence chain.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DepositRuleConfig {
    #[default]
    Inherit,
    NotRequired,
    Percentage {
        percent: u8,
    },
    Fixed {
        /// Amount in cents.
        amount: i64,
    },
    Full,
}

// --- Cancellation / Reschedule Policy Tables ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CancellationOutcomeConfig {
    Denied,
    FullRefund,
    PartialRefund { refund_percent: u8 },
    NoRefund,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RescheduleOutcomeConfig {
    Denied,
    Free,
    Fee { charge_percent: u8 },
}

/// One row of a policy table: the outcome applies when the request lands
/// at most `up_to_minutes_before` minutes before the appointment start.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CancellationTierConfig {
    pub up_to_minutes_before: i64,
    #[serde(flatten)]
    pub outcome: CancellationOutcomeConfig,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RescheduleTierConfig {
    pub up_to_minutes_before: i64,
    #[serde(flatten)]
    pub outcome: RescheduleOutcomeConfig,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CancellationScheduleConfig {
    #[serde(default)]
    pub tiers: Vec<CancellationTierConfig>,
    pub otherwise: CancellationOutcomeConfig,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RescheduleScheduleConfig {
    #[serde(default)]
    pub tiers: Vec<RescheduleTierConfig>,
    pub otherwise: RescheduleOutcomeConfig,
}

// --- Tenant Scheduling Defaults ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Tenant-wide deposit default, applied when neither the customer nor
    /// the booking option carries a rule of its own.
    #[serde(default)]
    pub default_deposit: DepositRuleConfig,
    #[serde(default = "default_cancellation_schedule")]
    pub cancellation: CancellationScheduleConfig,
    #[serde(default = "default_reschedule_schedule")]
    pub reschedule: RescheduleScheduleConfig,
}

fn default_cancellation_schedule() -> CancellationScheduleConfig {
    CancellationScheduleConfig {
        tiers: Vec::new(),
        otherwise: CancellationOutcomeConfig::FullRefund,
    }
}

fn default_reschedule_schedule() -> RescheduleScheduleConfig {
    RescheduleScheduleConfig {
        tiers: Vec::new(),
        otherwise: RescheduleOutcomeConfig::Free,
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            default_deposit: DepositRuleConfig::default(),
            cancellation: default_cancellation_schedule(),
            reschedule: default_reschedule_schedule(),
        }
    }
}

// --- Booking Catalog ---
// Options (services) a tenant offers, plus pre-registered customers.
// Seeded into the appointment store at startup.

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingOptionConfig {
    pub id: Uuid,
    pub name: String,
    pub duration_minutes: i64,
    /// Price in cents.
    pub price: i64,
    #[serde(default)]
    pub deposit: DepositRuleConfig,
    /// Per-option policy overrides; tenant defaults apply when absent.
    #[serde(default)]
    pub cancellation: Option<CancellationScheduleConfig>,
    #[serde(default)]
    pub reschedule: Option<RescheduleScheduleConfig>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CustomerConfig {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub deposit: DepositRuleConfig,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub options: Vec<BookingOptionConfig>,
    #[serde(default)]
    pub customers: Vec<CustomerConfig>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_payments: bool,
    #[serde(default)]
    pub use_dispatch: bool,
    #[serde(default)]
    pub use_sms: bool,

    // --- Tenant rule tables (defaults apply when the section is absent) ---
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub payments: Option<PaymentsConfig>,
    #[serde(default)]
    pub dispatch: Option<DispatchConfig>,
    #[serde(default)]
    pub sms: Option<SmsConfig>,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}
