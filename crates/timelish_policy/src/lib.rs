// --- File: crates/timelish_policy/src/lib.rs ---
// Declare modules within this crate
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;

pub use logic::{
    cancellation_refund, evaluate_payment_requirement, reschedule_charge, CancellationOutcome,
    ChargeDecision, DepositRule, PaymentRequirement, Percent, PolicyError, PolicySchedule,
    PolicyTier, RefundDecision, RescheduleOutcome,
};
