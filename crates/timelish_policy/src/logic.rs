// --- File: crates/timelish_policy/src/logic.rs ---
//! Policy resolution and payment requirement evaluation.
//!
//! Everything in this module is pure: callers fetch the domain objects,
//! measure `minutes_before_start` against their own clock, and apply the
//! returned decisions. All money amounts are `i64` cents and every
//! percentage computation rounds down to whole cents.

use serde::Serialize;
use thiserror::Error;
use timelish_config::{
    CancellationOutcomeConfig, CancellationScheduleConfig, DepositRuleConfig,
    RescheduleOutcomeConfig, RescheduleScheduleConfig,
};

// --- Error Handling ---
#[derive(Error, Debug, PartialEq)]
pub enum PolicyError {
    #[error("Percentage out of range: {0} (expected 0..=100)")]
    InvalidPercent(u8),
    #[error("Policy tier bound must be positive, got {0}")]
    InvalidTierBound(i64),
    #[error("Duplicate policy tier bound: {0}")]
    DuplicateTierBound(i64),
    #[error("Deposit amount must not be negative, got {0}")]
    InvalidDepositAmount(i64),
}

// --- Percent ---

/// An integer percentage, validated into `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Percent(u8);

impl Percent {
    pub fn new(value: u8) -> Result<Self, PolicyError> {
        if value > 100 {
            return Err(PolicyError::InvalidPercent(value));
        }
        Ok(Percent(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// This percentage of `amount` cents, rounded down to whole cents.
    /// Negative amounts are clamped to zero.
    pub fn of(&self, amount: i64) -> i64 {
        amount.max(0) * i64::from(self.0) / 100
    }
}

// --- Policy Outcomes ---

/// What a cancellation yields in a given time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CancellationOutcome {
    /// Cancellation is not allowed in this window.
    Denied,
    FullRefund,
    PartialRefund { refund: Percent },
    NoRefund,
}

/// What a reschedule costs in a given time window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RescheduleOutcome {
    /// Rescheduling is not allowed in this window.
    Denied,
    Free,
    /// A fee of this percentage of the appointment price is charged.
    Fee { charge: Percent },
}

impl TryFrom<&CancellationOutcomeConfig> for CancellationOutcome {
    type Error = PolicyError;

    fn try_from(config: &CancellationOutcomeConfig) -> Result<Self, Self::Error> {
        Ok(match config {
            CancellationOutcomeConfig::Denied => CancellationOutcome::Denied,
            CancellationOutcomeConfig::FullRefund => CancellationOutcome::FullRefund,
            CancellationOutcomeConfig::PartialRefund { refund_percent } => {
                CancellationOutcome::PartialRefund {
                    refund: Percent::new(*refund_percent)?,
                }
            }
            CancellationOutcomeConfig::NoRefund => CancellationOutcome::NoRefund,
        })
    }
}

impl TryFrom<&RescheduleOutcomeConfig> for RescheduleOutcome {
    type Error = PolicyError;

    fn try_from(config: &RescheduleOutcomeConfig) -> Result<Self, Self::Error> {
        Ok(match config {
            RescheduleOutcomeConfig::Denied => RescheduleOutcome::Denied,
            RescheduleOutcomeConfig::Free => RescheduleOutcome::Free,
            RescheduleOutcomeConfig::Fee { charge_percent } => RescheduleOutcome::Fee {
                charge: Percent::new(*charge_percent)?,
            },
        })
    }
}

// --- Policy Schedule ---

/// One row of a policy table. The outcome applies when the request lands at
/// most `up_to_minutes_before` minutes before the appointment start
/// (inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyTier<O> {
    pub up_to_minutes_before: i64,
    pub outcome: O,
}

/// A validated, ordered policy table plus the outcome applying to requests
/// earlier than every tier window.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicySchedule<O> {
    tiers: Vec<PolicyTier<O>>,
    otherwise: O,
}

impl<O> PolicySchedule<O> {
    /// Builds a schedule, validating that tier bounds are positive and
    /// unique. Tiers are kept sorted ascending by bound.
    pub fn new(mut tiers: Vec<PolicyTier<O>>, otherwise: O) -> Result<Self, PolicyError> {
        for tier in &tiers {
            if tier.up_to_minutes_before <= 0 {
                return Err(PolicyError::InvalidTierBound(tier.up_to_minutes_before));
            }
        }
        tiers.sort_by_key(|tier| tier.up_to_minutes_before);
        for window in tiers.windows(2) {
            if window[0].up_to_minutes_before == window[1].up_to_minutes_before {
                return Err(PolicyError::DuplicateTierBound(window[0].up_to_minutes_before));
            }
        }
        Ok(Self { tiers, otherwise })
    }

    /// Selects the applicable outcome for a request landing
    /// `minutes_before_start` minutes before the appointment start.
    ///
    /// The applicable tier is the tightest one whose bound still covers the
    /// request. Requests at or after the start (`minutes_before_start <= 0`)
    /// clamp to zero and therefore hit the tightest tier. Requests earlier
    /// than every tier bound resolve to the `otherwise` outcome.
    pub fn resolve(&self, minutes_before_start: i64) -> &O {
        let minutes = minutes_before_start.max(0);
        self.tiers
            .iter()
            .find(|tier| tier.up_to_minutes_before >= minutes)
            .map(|tier| &tier.outcome)
            .unwrap_or(&self.otherwise)
    }

    pub fn tiers(&self) -> &[PolicyTier<O>] {
        &self.tiers
    }

    pub fn otherwise(&self) -> &O {
        &self.otherwise
    }
}

impl TryFrom<&CancellationScheduleConfig> for PolicySchedule<CancellationOutcome> {
    type Error = PolicyError;

    fn try_from(config: &CancellationScheduleConfig) -> Result<Self, Self::Error> {
        let tiers = config
            .tiers
            .iter()
            .map(|tier| {
                Ok(PolicyTier {
                    up_to_minutes_before: tier.up_to_minutes_before,
                    outcome: CancellationOutcome::try_from(&tier.outcome)?,
                })
            })
            .collect::<Result<Vec<_>, PolicyError>>()?;
        PolicySchedule::new(tiers, CancellationOutcome::try_from(&config.otherwise)?)
    }
}

impl TryFrom<&RescheduleScheduleConfig> for PolicySchedule<RescheduleOutcome> {
    type Error = PolicyError;

    fn try_from(config: &RescheduleScheduleConfig) -> Result<Self, Self::Error> {
        let tiers = config
            .tiers
            .iter()
            .map(|tier| {
                Ok(PolicyTier {
                    up_to_minutes_before: tier.up_to_minutes_before,
                    outcome: RescheduleOutcome::try_from(&tier.outcome)?,
                })
            })
            .collect::<Result<Vec<_>, PolicyError>>()?;
        PolicySchedule::new(tiers, RescheduleOutcome::try_from(&config.otherwise)?)
    }
}

// --- Refund / Charge Computation ---

/// The refund side of a resolved cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RefundDecision {
    /// Cancellation is denied outright.
    Denied,
    /// Cancellation proceeds; no refund is due.
    NotDue,
    /// Cancellation proceeds with this refund, in cents.
    Due { amount: i64 },
}

/// Computes the refund for a cancellation with `amount_paid` cents collected.
///
/// A refund of zero cents collapses to [`RefundDecision::NotDue`] so that no
/// zero-amount refund calls reach the payment processor.
pub fn cancellation_refund(amount_paid: i64, outcome: &CancellationOutcome) -> RefundDecision {
    let amount = match outcome {
        CancellationOutcome::Denied => return RefundDecision::Denied,
        CancellationOutcome::NoRefund => 0,
        CancellationOutcome::FullRefund => amount_paid.max(0),
        CancellationOutcome::PartialRefund { refund } => refund.of(amount_paid),
    };
    if amount == 0 {
        RefundDecision::NotDue
    } else {
        RefundDecision::Due { amount }
    }
}

/// The charge side of a resolved reschedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ChargeDecision {
    /// Rescheduling is denied outright.
    Denied,
    /// Rescheduling proceeds free of charge.
    Free,
    /// Rescheduling proceeds against this fee, in cents.
    Due { amount: i64 },
}

/// Computes the fee for a reschedule of an appointment priced `price` cents.
/// A fee of zero cents collapses to [`ChargeDecision::Free`].
pub fn reschedule_charge(price: i64, outcome: &RescheduleOutcome) -> ChargeDecision {
    let amount = match outcome {
        RescheduleOutcome::Denied => return ChargeDecision::Denied,
        RescheduleOutcome::Free => 0,
        RescheduleOutcome::Fee { charge } => charge.of(price),
    };
    if amount == 0 {
        ChargeDecision::Free
    } else {
        ChargeDecision::Due { amount }
    }
}

// --- Payment Requirement Evaluation ---

/// A validated deposit rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum DepositRule {
    Inherit,
    NotRequired,
    Percentage(Percent),
    /// Fixed amount in cents.
    Fixed(i64),
    Full,
}

impl TryFrom<&DepositRuleConfig> for DepositRule {
    type Error = PolicyError;

    fn try_from(config: &DepositRuleConfig) -> Result<Self, Self::Error> {
        Ok(match config {
            DepositRuleConfig::Inherit => DepositRule::Inherit,
            DepositRuleConfig::NotRequired => DepositRule::NotRequired,
            DepositRuleConfig::Percentage { percent } => {
                DepositRule::Percentage(Percent::new(*percent)?)
            }
            DepositRuleConfig::Fixed { amount } => {
                if *amount < 0 {
                    return Err(PolicyError::InvalidDepositAmount(*amount));
                }
                DepositRule::Fixed(*amount)
            }
            DepositRuleConfig::Full => DepositRule::Full,
        })
    }
}

/// What a new booking must pay before it is confirmed.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentRequirement {
    None,
    Deposit { amount_due: i64 },
    Full { amount_due: i64 },
}

impl PaymentRequirement {
    pub fn amount_due(&self) -> i64 {
        match self {
            PaymentRequirement::None => 0,
            PaymentRequirement::Deposit { amount_due } | PaymentRequirement::Full { amount_due } => {
                *amount_due
            }
        }
    }
}

/// Evaluates whether a deposit is required for a new booking.
///
/// Precedence: the customer override wins over the option rule, which wins
/// over the tenant default. `Inherit` falls through to the next level; an
/// `Inherit` tenant default behaves as `NotRequired`.
///
/// A deposit can never exceed the price: `Fixed` amounts are clamped and a
/// deposit covering the whole price escalates to
/// [`PaymentRequirement::Full`]. A computed amount of zero yields
/// [`PaymentRequirement::None`].
pub fn evaluate_payment_requirement(
    customer_rule: &DepositRule,
    option_rule: &DepositRule,
    default_rule: &DepositRule,
    price: i64,
) -> PaymentRequirement {
    let effective = [customer_rule, option_rule, default_rule]
        .into_iter()
        .find(|rule| !matches!(rule, DepositRule::Inherit))
        .unwrap_or(&DepositRule::NotRequired);

    let price = price.max(0);
    let amount_due = match effective {
        DepositRule::Inherit | DepositRule::NotRequired => 0,
        DepositRule::Percentage(percent) => percent.of(price),
        DepositRule::Fixed(amount) => (*amount).min(price),
        DepositRule::Full => price,
    };

    if amount_due == 0 {
        PaymentRequirement::None
    } else if amount_due >= price {
        PaymentRequirement::Full { amount_due: price }
    } else {
        PaymentRequirement::Deposit { amount_due }
    }
}
