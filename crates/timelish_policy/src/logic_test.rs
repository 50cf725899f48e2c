#[cfg(test)]
mod tests {
    use crate::logic::*;
    use timelish_config::{
        CancellationOutcomeConfig, CancellationScheduleConfig, CancellationTierConfig,
        DepositRuleConfig,
    };

    fn percent(value: u8) -> Percent {
        Percent::new(value).unwrap()
    }

    fn cancellation_schedule() -> PolicySchedule<CancellationOutcome> {
        // 0..=60 min before start: no refund
        // 61..=1440: 50% refund
        // earlier than that: full refund
        PolicySchedule::new(
            vec![
                PolicyTier {
                    up_to_minutes_before: 1440,
                    outcome: CancellationOutcome::PartialRefund {
                        refund: percent(50),
                    },
                },
                PolicyTier {
                    up_to_minutes_before: 60,
                    outcome: CancellationOutcome::NoRefund,
                },
            ],
            CancellationOutcome::FullRefund,
        )
        .unwrap()
    }

    #[test]
    fn resolve_picks_tightest_covering_tier() {
        let schedule = cancellation_schedule();
        assert_eq!(schedule.resolve(30), &CancellationOutcome::NoRefund);
        assert_eq!(
            schedule.resolve(61),
            &CancellationOutcome::PartialRefund {
                refund: percent(50)
            }
        );
        assert_eq!(schedule.resolve(2000), &CancellationOutcome::FullRefund);
    }

    #[test]
    fn resolve_bound_is_inclusive() {
        let schedule = cancellation_schedule();
        assert_eq!(schedule.resolve(60), &CancellationOutcome::NoRefund);
        assert_eq!(
            schedule.resolve(1440),
            &CancellationOutcome::PartialRefund {
                refund: percent(50)
            }
        );
        assert_eq!(schedule.resolve(1441), &CancellationOutcome::FullRefund);
    }

    #[test]
    fn resolve_clamps_started_appointments_to_tightest_tier() {
        let schedule = cancellation_schedule();
        // At start and after start both behave like "0 minutes before".
        assert_eq!(schedule.resolve(0), &CancellationOutcome::NoRefund);
        assert_eq!(schedule.resolve(-90), &CancellationOutcome::NoRefund);
    }

    #[test]
    fn resolve_empty_table_falls_back_to_otherwise() {
        let schedule =
            PolicySchedule::new(Vec::new(), CancellationOutcome::FullRefund).unwrap();
        assert_eq!(schedule.resolve(0), &CancellationOutcome::FullRefund);
        assert_eq!(schedule.resolve(99_999), &CancellationOutcome::FullRefund);
    }

    #[test]
    fn schedule_rejects_non_positive_and_duplicate_bounds() {
        let err = PolicySchedule::new(
            vec![PolicyTier {
                up_to_minutes_before: 0,
                outcome: CancellationOutcome::NoRefund,
            }],
            CancellationOutcome::FullRefund,
        )
        .unwrap_err();
        assert_eq!(err, PolicyError::InvalidTierBound(0));

        let err = PolicySchedule::new(
            vec![
                PolicyTier {
                    up_to_minutes_before: 60,
                    outcome: CancellationOutcome::NoRefund,
                },
                PolicyTier {
                    up_to_minutes_before: 60,
                    outcome: CancellationOutcome::FullRefund,
                },
            ],
            CancellationOutcome::FullRefund,
        )
        .unwrap_err();
        assert_eq!(err, PolicyError::DuplicateTierBound(60));
    }

    #[test]
    fn schedule_sorts_tiers_given_out_of_order() {
        let config = CancellationScheduleConfig {
            tiers: vec![
                CancellationTierConfig {
                    up_to_minutes_before: 1440,
                    outcome: CancellationOutcomeConfig::PartialRefund { refund_percent: 25 },
                },
                CancellationTierConfig {
                    up_to_minutes_before: 120,
                    outcome: CancellationOutcomeConfig::Denied,
                },
            ],
            otherwise: CancellationOutcomeConfig::FullRefund,
        };
        let schedule = PolicySchedule::try_from(&config).unwrap();
        assert_eq!(schedule.tiers()[0].up_to_minutes_before, 120);
        assert_eq!(schedule.resolve(90), &CancellationOutcome::Denied);
    }

    #[test]
    fn invalid_percent_in_config_is_rejected() {
        let config = CancellationScheduleConfig {
            tiers: vec![CancellationTierConfig {
                up_to_minutes_before: 60,
                outcome: CancellationOutcomeConfig::PartialRefund {
                    refund_percent: 101,
                },
            }],
            otherwise: CancellationOutcomeConfig::FullRefund,
        };
        assert_eq!(
            PolicySchedule::try_from(&config).unwrap_err(),
            PolicyError::InvalidPercent(101)
        );
    }

    #[test]
    fn cancellation_refund_floors_to_whole_cents() {
        let outcome = CancellationOutcome::PartialRefund {
            refund: percent(33),
        };
        // 33% of 101 cents = 33.33 cents, floored to 33.
        assert_eq!(
            cancellation_refund(101, &outcome),
            RefundDecision::Due { amount: 33 }
        );
    }

    #[test]
    fn cancellation_refund_of_nothing_collected_is_not_due() {
        assert_eq!(
            cancellation_refund(0, &CancellationOutcome::FullRefund),
            RefundDecision::NotDue
        );
        assert_eq!(
            cancellation_refund(
                2,
                &CancellationOutcome::PartialRefund {
                    refund: percent(10)
                }
            ),
            RefundDecision::NotDue
        );
        assert_eq!(
            cancellation_refund(5000, &CancellationOutcome::Denied),
            RefundDecision::Denied
        );
    }

    #[test]
    fn reschedule_charge_zero_fee_collapses_to_free() {
        assert_eq!(
            reschedule_charge(
                10,
                &RescheduleOutcome::Fee {
                    charge: percent(5)
                }
            ),
            ChargeDecision::Free
        );
        assert_eq!(
            reschedule_charge(
                7500,
                &RescheduleOutcome::Fee {
                    charge: percent(20)
                }
            ),
            ChargeDecision::Due { amount: 1500 }
        );
        assert_eq!(
            reschedule_charge(7500, &RescheduleOutcome::Denied),
            ChargeDecision::Denied
        );
    }

    // --- Payment requirement precedence ---

    #[test]
    fn customer_rule_wins_over_option_and_default() {
        let requirement = evaluate_payment_requirement(
            &DepositRule::NotRequired,
            &DepositRule::Percentage(percent(50)),
            &DepositRule::Full,
            10_000,
        );
        assert_eq!(requirement, PaymentRequirement::None);
    }

    #[test]
    fn option_rule_applies_when_customer_inherits() {
        let requirement = evaluate_payment_requirement(
            &DepositRule::Inherit,
            &DepositRule::Percentage(percent(30)),
            &DepositRule::Full,
            10_000,
        );
        assert_eq!(
            requirement,
            PaymentRequirement::Deposit { amount_due: 3_000 }
        );
    }

    #[test]
    fn default_applies_when_everything_inherits() {
        let requirement = evaluate_payment_requirement(
            &DepositRule::Inherit,
            &DepositRule::Inherit,
            &DepositRule::Fixed(2_500),
            10_000,
        );
        assert_eq!(
            requirement,
            PaymentRequirement::Deposit { amount_due: 2_500 }
        );

        // An Inherit default behaves as NotRequired.
        let requirement = evaluate_payment_requirement(
            &DepositRule::Inherit,
            &DepositRule::Inherit,
            &DepositRule::Inherit,
            10_000,
        );
        assert_eq!(requirement, PaymentRequirement::None);
    }

    #[test]
    fn deposit_never_exceeds_price() {
        // Fixed amount above the price clamps and escalates to Full.
        let requirement = evaluate_payment_requirement(
            &DepositRule::Fixed(20_000),
            &DepositRule::Inherit,
            &DepositRule::Inherit,
            10_000,
        );
        assert_eq!(requirement, PaymentRequirement::Full { amount_due: 10_000 });

        // 100% deposit is a full payment.
        let requirement = evaluate_payment_requirement(
            &DepositRule::Percentage(percent(100)),
            &DepositRule::Inherit,
            &DepositRule::Inherit,
            10_000,
        );
        assert_eq!(requirement, PaymentRequirement::Full { amount_due: 10_000 });
    }

    #[test]
    fn free_services_never_require_payment() {
        let requirement = evaluate_payment_requirement(
            &DepositRule::Full,
            &DepositRule::Inherit,
            &DepositRule::Inherit,
            0,
        );
        assert_eq!(requirement, PaymentRequirement::None);

        let requirement = evaluate_payment_requirement(
            &DepositRule::Percentage(percent(50)),
            &DepositRule::Inherit,
            &DepositRule::Inherit,
            0,
        );
        assert_eq!(requirement, PaymentRequirement::None);
    }

    #[test]
    fn deposit_rule_config_conversion_validates() {
        assert_eq!(
            DepositRule::try_from(&DepositRuleConfig::Fixed { amount: -1 }).unwrap_err(),
            PolicyError::InvalidDepositAmount(-1)
        );
        assert_eq!(
            DepositRule::try_from(&DepositRuleConfig::Percentage { percent: 120 }).unwrap_err(),
            PolicyError::InvalidPercent(120)
        );
        assert_eq!(
            DepositRule::try_from(&DepositRuleConfig::Inherit).unwrap(),
            DepositRule::Inherit
        );
    }
}
