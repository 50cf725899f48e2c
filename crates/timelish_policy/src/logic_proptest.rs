#[cfg(test)]
mod proptests {
    use crate::logic::*;
    use proptest::prelude::*;

    fn schedule() -> PolicySchedule<CancellationOutcome> {
        PolicySchedule::new(
            vec![
                PolicyTier {
                    up_to_minutes_before: 60,
                    outcome: CancellationOutcome::NoRefund,
                },
                PolicyTier {
                    up_to_minutes_before: 1440,
                    outcome: CancellationOutcome::PartialRefund {
                        refund: Percent::new(50).unwrap(),
                    },
                },
            ],
            CancellationOutcome::FullRefund,
        )
        .unwrap()
    }

    proptest! {
        // Resolution is total over the whole i64 minute range.
        #[test]
        fn resolve_is_total(minutes in i64::MIN / 2..i64::MAX / 2) {
            let _ = schedule().resolve(minutes);
        }

        // Percentages never produce more than the input amount and never
        // go negative.
        #[test]
        fn percent_of_is_bounded(amount in 0i64..1_000_000_000, value in 0u8..=100) {
            let p = Percent::new(value).unwrap();
            let cut = p.of(amount);
            prop_assert!(cut >= 0);
            prop_assert!(cut <= amount);
        }

        // A refund is never larger than what was collected.
        #[test]
        fn refund_never_exceeds_collected(amount in 0i64..1_000_000_000, value in 0u8..=100) {
            let outcome = CancellationOutcome::PartialRefund {
                refund: Percent::new(value).unwrap(),
            };
            match cancellation_refund(amount, &outcome) {
                RefundDecision::Due { amount: refund } => prop_assert!(refund <= amount),
                RefundDecision::NotDue => {}
                RefundDecision::Denied => prop_assert!(false, "partial refund never denies"),
            }
        }

        // The amount due never exceeds the price, whatever the rule stack.
        #[test]
        fn requirement_never_exceeds_price(
            price in 0i64..1_000_000_000,
            fixed in 0i64..2_000_000_000,
            value in 0u8..=100,
        ) {
            for rule in [
                DepositRule::NotRequired,
                DepositRule::Percentage(Percent::new(value).unwrap()),
                DepositRule::Fixed(fixed),
                DepositRule::Full,
            ] {
                let requirement = evaluate_payment_requirement(
                    &rule,
                    &DepositRule::Inherit,
                    &DepositRule::Inherit,
                    price,
                );
                prop_assert!(requirement.amount_due() <= price);
            }
        }
    }
}
