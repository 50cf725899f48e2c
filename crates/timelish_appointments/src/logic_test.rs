#[cfg(test)]
mod tests {
    use crate::error::AppointmentError;
    use crate::logic::*;
    use crate::store::InMemoryAppointmentStore;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::{Arc, Mutex};
    use timelish_common::models::{
        Appointment, AppointmentStatus, DomainEvent, IntentStatus, PaymentIntentRecord,
        PaymentState,
    };
    use timelish_common::services::{
        AppointmentStore, BoxFuture, BoxedError, EventSink, PaymentIntentResult, PaymentService,
        RefundResult,
    };
    use timelish_config::{
        AppConfig, BookingOptionConfig, CancellationOutcomeConfig, CancellationScheduleConfig,
        CancellationTierConfig, CatalogConfig, CustomerConfig, DepositRuleConfig, PaymentsConfig,
        RescheduleOutcomeConfig, RescheduleScheduleConfig, RescheduleTierConfig, SchedulingConfig,
        ServerConfig,
    };
    use timelish_policy::PaymentRequirement;
    use uuid::Uuid;

    // --- Stub services ---

    #[derive(Default)]
    struct StubPayments {
        calls: Mutex<Vec<String>>,
    }

    impl StubPayments {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PaymentService for StubPayments {
        type Error = BoxedError;

        fn create_payment_intent(
            &self,
            amount: i64,
            currency: &str,
            _description: Option<&str>,
            _metadata: Option<serde_json::Value>,
        ) -> BoxFuture<'_, PaymentIntentResult, Self::Error> {
            let currency = currency.to_string();
            Box::pin(async move {
                self.calls
                    .lock()
                    .unwrap()
                    .push(format!("create:{}", amount));
                Ok(PaymentIntentResult {
                    id: format!("pi_{}", amount),
                    status: "requires_payment_method".to_string(),
                    amount,
                    currency,
                    client_secret: Some("cs_test".to_string()),
                })
            })
        }

        fn cancel_payment_intent(
            &self,
            payment_intent_id: &str,
        ) -> BoxFuture<'_, PaymentIntentResult, Self::Error> {
            let payment_intent_id = payment_intent_id.to_string();
            Box::pin(async move {
                self.calls
                    .lock()
                    .unwrap()
                    .push(format!("cancel:{}", payment_intent_id));
                Ok(PaymentIntentResult {
                    id: payment_intent_id,
                    status: "canceled".to_string(),
                    amount: 0,
                    currency: "usd".to_string(),
                    client_secret: None,
                })
            })
        }

        fn create_refund(
            &self,
            payment_intent_id: &str,
            amount: Option<i64>,
            _reason: Option<&str>,
        ) -> BoxFuture<'_, RefundResult, Self::Error> {
            let payment_intent_id = payment_intent_id.to_string();
            Box::pin(async move {
                self.calls.lock().unwrap().push(format!(
                    "refund:{}:{}",
                    payment_intent_id,
                    amount.unwrap_or(0)
                ));
                Ok(RefundResult {
                    id: "re_test".to_string(),
                    status: "succeeded".to_string(),
                    amount: amount.unwrap_or(0),
                    currency: "usd".to_string(),
                })
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn kinds(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl EventSink for RecordingSink {
        fn publish(&self, event: DomainEvent) {
            self.events.lock().unwrap().push(event.kind().to_string());
        }
    }

    // --- Fixture ---

    fn option_id() -> Uuid {
        Uuid::from_u128(1)
    }

    fn customer_id() -> Uuid {
        Uuid::from_u128(2)
    }

    struct TestEnv {
        config: Arc<AppConfig>,
        store: InMemoryAppointmentStore,
        payments: Arc<StubPayments>,
        payments_dyn: Arc<dyn PaymentService<Error = BoxedError>>,
        sink: Arc<RecordingSink>,
        sink_dyn: Arc<dyn EventSink>,
    }

    impl TestEnv {
        fn services(&self) -> AppointmentServices<'_> {
            AppointmentServices {
                store: &self.store,
                payments: Some(&self.payments_dyn),
                notifications: None,
                events: Some(&self.sink_dyn),
            }
        }
    }

    fn env_with(
        scheduling: SchedulingConfig,
        option_deposit: DepositRuleConfig,
        customer_deposit: DepositRuleConfig,
    ) -> TestEnv {
        let catalog = CatalogConfig {
            options: vec![BookingOptionConfig {
                id: option_id(),
                name: "Consultation".to_string(),
                duration_minutes: 60,
                price: 10_000,
                deposit: option_deposit,
                cancellation: None,
                reschedule: None,
            }],
            customers: vec![CustomerConfig {
                id: customer_id(),
                name: "Ada".to_string(),
                phone: Some("+15550100".to_string()),
                deposit: customer_deposit,
            }],
        };
        let config = Arc::new(AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            use_payments: true,
            use_dispatch: false,
            use_sms: false,
            scheduling,
            catalog: catalog.clone(),
            payments: Some(PaymentsConfig {
                processor_url: "http://processor.test/v1".to_string(),
                currency: "usd".to_string(),
                statement_label: None,
            }),
            dispatch: None,
            sms: None,
            admin: None,
        });
        let store = InMemoryAppointmentStore::from_catalog(&catalog);
        let payments = Arc::new(StubPayments::default());
        let payments_dyn: Arc<dyn PaymentService<Error = BoxedError>> = payments.clone();
        let sink = Arc::new(RecordingSink::default());
        let sink_dyn: Arc<dyn EventSink> = sink.clone();
        TestEnv {
            config,
            store,
            payments,
            payments_dyn,
            sink,
            sink_dyn,
        }
    }

    /// Tight cancellation/reschedule windows used by the modification tests:
    /// within 1h no refund / deny, within 24h half refund / 20% fee,
    /// earlier everything is free.
    fn strict_scheduling() -> SchedulingConfig {
        SchedulingConfig {
            default_deposit: DepositRuleConfig::NotRequired,
            cancellation: CancellationScheduleConfig {
                tiers: vec![
                    CancellationTierConfig {
                        up_to_minutes_before: 60,
                        outcome: CancellationOutcomeConfig::NoRefund,
                    },
                    CancellationTierConfig {
                        up_to_minutes_before: 1440,
                        outcome: CancellationOutcomeConfig::PartialRefund { refund_percent: 50 },
                    },
                ],
                otherwise: CancellationOutcomeConfig::FullRefund,
            },
            reschedule: RescheduleScheduleConfig {
                tiers: vec![
                    RescheduleTierConfig {
                        up_to_minutes_before: 60,
                        outcome: RescheduleOutcomeConfig::Denied,
                    },
                    RescheduleTierConfig {
                        up_to_minutes_before: 1440,
                        outcome: RescheduleOutcomeConfig::Fee { charge_percent: 20 },
                    },
                ],
                otherwise: RescheduleOutcomeConfig::Free,
            },
        }
    }

    fn book_request(start: DateTime<Utc>) -> BookAppointmentRequest {
        BookAppointmentRequest {
            option_id: option_id(),
            customer_id: Some(customer_id()),
            customer: None,
            start_time: start.to_rfc3339(),
        }
    }

    async fn insert_appointment(
        env: &TestEnv,
        minutes_from_now: i64,
        status: AppointmentStatus,
        collected: i64,
        intent: Option<PaymentIntentRecord>,
    ) -> Uuid {
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            customer_id: customer_id(),
            option_id: option_id(),
            start_time: now + Duration::minutes(minutes_from_now),
            duration_minutes: 60,
            price: 10_000,
            currency: "usd".to_string(),
            status,
            payment: PaymentState {
                collected,
                refunded: 0,
                settled_intent_id: intent
                    .as_ref()
                    .filter(|i| i.status == IntentStatus::Succeeded)
                    .map(|i| i.id.clone()),
                intent,
            },
            created_at: now,
            updated_at: now,
        };
        let id = appointment.id;
        env.store.insert_appointment(appointment).await.unwrap();
        id
    }

    fn settled_intent(amount: i64) -> PaymentIntentRecord {
        PaymentIntentRecord {
            id: "pi_settled".to_string(),
            status: IntentStatus::Succeeded,
            amount,
            currency: "usd".to_string(),
            client_secret: None,
        }
    }

    fn live_intent(amount: i64) -> PaymentIntentRecord {
        PaymentIntentRecord {
            id: "pi_live".to_string(),
            status: IntentStatus::RequiresPayment,
            amount,
            currency: "usd".to_string(),
            client_secret: Some("cs_live".to_string()),
        }
    }

    // --- Booking ---

    #[tokio::test]
    async fn booking_with_deposit_is_pending_with_intent() {
        let env = env_with(
            SchedulingConfig::default(),
            DepositRuleConfig::Percentage { percent: 25 },
            DepositRuleConfig::Inherit,
        );
        let response = book_appointment(
            &env.config,
            &env.services(),
            book_request(Utc::now() + Duration::days(3)),
        )
        .await
        .unwrap();

        assert_eq!(
            response.requirement,
            PaymentRequirement::Deposit { amount_due: 2_500 }
        );
        assert_eq!(response.appointment.status, AppointmentStatus::Pending);
        assert_eq!(response.client_secret.as_deref(), Some("cs_test"));
        let intent = response.appointment.payment.intent.unwrap();
        assert_eq!(intent.amount, 2_500);
        assert_eq!(intent.status, IntentStatus::RequiresPayment);
        assert_eq!(env.payments.calls(), vec!["create:2500"]);
        assert_eq!(env.sink.kinds(), vec!["appointment_booked"]);
    }

    #[tokio::test]
    async fn booking_without_payment_confirms_immediately() {
        let env = env_with(
            SchedulingConfig::default(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let response = book_appointment(
            &env.config,
            &env.services(),
            book_request(Utc::now() + Duration::days(3)),
        )
        .await
        .unwrap();

        assert_eq!(response.requirement, PaymentRequirement::None);
        assert_eq!(response.appointment.status, AppointmentStatus::Confirmed);
        assert!(response.appointment.payment.intent.is_none());
        assert!(env.payments.calls().is_empty());
    }

    #[tokio::test]
    async fn customer_override_beats_option_rule() {
        // Option demands full payment, but this customer is trusted.
        let env = env_with(
            SchedulingConfig::default(),
            DepositRuleConfig::Full,
            DepositRuleConfig::NotRequired,
        );
        let response = book_appointment(
            &env.config,
            &env.services(),
            book_request(Utc::now() + Duration::days(3)),
        )
        .await
        .unwrap();
        assert_eq!(response.requirement, PaymentRequirement::None);
        assert!(env.payments.calls().is_empty());
    }

    #[tokio::test]
    async fn booking_in_the_past_is_rejected() {
        let env = env_with(
            SchedulingConfig::default(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let err = book_appointment(
            &env.config,
            &env.services(),
            book_request(Utc::now() - Duration::hours(1)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppointmentError::ValidationError(_)));
    }

    #[tokio::test]
    async fn booking_unknown_option_is_not_found() {
        let env = env_with(
            SchedulingConfig::default(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let mut request = book_request(Utc::now() + Duration::days(1));
        request.option_id = Uuid::from_u128(99);
        let err = book_appointment(&env.config, &env.services(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, AppointmentError::OptionNotFound(_)));
    }

    #[tokio::test]
    async fn inline_customer_is_registered_on_booking() {
        let env = env_with(
            SchedulingConfig::default(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let request = BookAppointmentRequest {
            option_id: option_id(),
            customer_id: None,
            customer: Some(CustomerInput {
                name: "Grace".to_string(),
                phone: None,
            }),
            start_time: (Utc::now() + Duration::days(1)).to_rfc3339(),
        };
        let response = book_appointment(&env.config, &env.services(), request)
            .await
            .unwrap();
        let created = env
            .store
            .get_customer(response.appointment.customer_id)
            .await
            .unwrap()
            .expect("inline customer must be stored");
        assert_eq!(created.name, "Grace");
    }

    // --- Cancellation ---

    #[tokio::test]
    async fn early_cancellation_refunds_in_full() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            3 * 24 * 60,
            AppointmentStatus::Confirmed,
            10_000,
            Some(settled_intent(10_000)),
        )
        .await;

        let response = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            None,
        )
        .await
        .unwrap();

        assert_eq!(response.refund_cents, 10_000);
        assert_eq!(response.appointment.status, AppointmentStatus::Cancelled);
        assert_eq!(response.appointment.payment.refunded, 10_000);
        assert_eq!(env.payments.calls(), vec!["refund:pi_settled:10000"]);
        assert_eq!(env.sink.kinds(), vec!["appointment_cancelled"]);
    }

    #[tokio::test]
    async fn mid_window_cancellation_refunds_half() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            12 * 60,
            AppointmentStatus::Confirmed,
            10_000,
            Some(settled_intent(10_000)),
        )
        .await;

        let response = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(response.refund_cents, 5_000);
        assert_eq!(env.payments.calls(), vec!["refund:pi_settled:5000"]);
    }

    #[tokio::test]
    async fn late_cancellation_keeps_the_money() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            30,
            AppointmentStatus::Confirmed,
            10_000,
            Some(settled_intent(10_000)),
        )
        .await;

        let response = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(response.refund_cents, 0);
        assert_eq!(response.appointment.status, AppointmentStatus::Cancelled);
        assert!(env.payments.calls().is_empty());
    }

    #[tokio::test]
    async fn denied_window_blocks_cancellation() {
        let mut scheduling = strict_scheduling();
        scheduling.cancellation.tiers[0].outcome = CancellationOutcomeConfig::Denied;
        let env = env_with(
            scheduling,
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(&env, 30, AppointmentStatus::Confirmed, 0, None).await;

        let err = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppointmentError::PolicyDenied(_)));

        // Nothing was mutated.
        let stored = env.store.get_appointment(id).await.unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Confirmed);
        assert!(env.sink.kinds().is_empty());
    }

    #[tokio::test]
    async fn admin_override_refunds_in_full_inside_a_no_refund_window() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            30,
            AppointmentStatus::Confirmed,
            10_000,
            Some(settled_intent(10_000)),
        )
        .await;

        let response = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            Some(timelish_policy::CancellationOutcome::FullRefund),
        )
        .await
        .unwrap();
        assert_eq!(response.refund_cents, 10_000);
    }

    #[tokio::test]
    async fn cancelling_twice_conflicts() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id =
            insert_appointment(&env, 3 * 24 * 60, AppointmentStatus::Cancelled, 0, None).await;
        let err = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppointmentError::Conflict(_)));
    }

    #[tokio::test]
    async fn cancelling_unpaid_booking_voids_the_intent() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            3 * 24 * 60,
            AppointmentStatus::Pending,
            0,
            Some(live_intent(2_500)),
        )
        .await;

        let response = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(response.refund_cents, 0);
        assert_eq!(env.payments.calls(), vec!["cancel:pi_live"]);
        let intent = response.appointment.payment.intent.unwrap();
        assert_eq!(intent.status, IntentStatus::Cancelled);
    }

    // --- Reschedule ---

    #[tokio::test]
    async fn early_reschedule_is_free() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id =
            insert_appointment(&env, 3 * 24 * 60, AppointmentStatus::Confirmed, 0, None).await;
        let new_start = Utc::now() + Duration::days(7);

        let response = reschedule_appointment(
            &env.config,
            &env.services(),
            id,
            RescheduleAppointmentRequest {
                new_start_time: new_start.to_rfc3339(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.fee_cents, 0);
        assert!(env.payments.calls().is_empty());
        assert_eq!(response.appointment.start_time, new_start);
        assert_eq!(env.sink.kinds(), vec!["appointment_rescheduled"]);
    }

    #[tokio::test]
    async fn mid_window_reschedule_charges_a_fee() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            12 * 60,
            AppointmentStatus::Confirmed,
            10_000,
            Some(settled_intent(10_000)),
        )
        .await;

        let response = reschedule_appointment(
            &env.config,
            &env.services(),
            id,
            RescheduleAppointmentRequest {
                new_start_time: (Utc::now() + Duration::days(7)).to_rfc3339(),
            },
        )
        .await
        .unwrap();

        // 20% of 10_000; the settled intent stays untouched, the fee gets
        // its own intent and the appointment waits for it.
        assert_eq!(response.fee_cents, 2_000);
        assert_eq!(env.payments.calls(), vec!["create:2000"]);
        assert_eq!(response.appointment.status, AppointmentStatus::Pending);
        assert_eq!(response.client_secret.as_deref(), Some("cs_test"));
    }

    #[tokio::test]
    async fn fee_stacks_onto_outstanding_intent() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            12 * 60,
            AppointmentStatus::Pending,
            0,
            Some(live_intent(2_500)),
        )
        .await;

        let response = reschedule_appointment(
            &env.config,
            &env.services(),
            id,
            RescheduleAppointmentRequest {
                new_start_time: (Utc::now() + Duration::days(7)).to_rfc3339(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.fee_cents, 2_000);
        // 2_500 outstanding + 2_000 fee = 4_500 on the replacement intent.
        assert_eq!(env.payments.calls(), vec!["cancel:pi_live", "create:4500"]);
        let intent = response.appointment.payment.intent.unwrap();
        assert_eq!(intent.amount, 4_500);
    }

    #[tokio::test]
    async fn cancel_after_fee_reschedule_still_refunds_the_settled_intent() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            12 * 60,
            AppointmentStatus::Confirmed,
            10_000,
            Some(settled_intent(10_000)),
        )
        .await;

        // Fee reschedule parks a fresh intent in the slot...
        reschedule_appointment(
            &env.config,
            &env.services(),
            id,
            RescheduleAppointmentRequest {
                new_start_time: (Utc::now() + Duration::days(7)).to_rfc3339(),
            },
        )
        .await
        .unwrap();

        // ...but cancelling a week out still refunds against the settled one.
        let response = cancel_appointment(
            &env.config,
            &env.services(),
            id,
            CancelAppointmentRequest::default(),
            None,
        )
        .await
        .unwrap();
        assert_eq!(response.refund_cents, 10_000);
        let calls = env.payments.calls();
        assert!(calls.contains(&"refund:pi_settled:10000".to_string()));
        // The outstanding fee intent was voided, not collected.
        assert!(calls.contains(&"cancel:pi_2000".to_string()));
    }

    #[tokio::test]
    async fn denied_window_blocks_reschedule() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(&env, 30, AppointmentStatus::Confirmed, 0, None).await;
        let err = reschedule_appointment(
            &env.config,
            &env.services(),
            id,
            RescheduleAppointmentRequest {
                new_start_time: (Utc::now() + Duration::days(7)).to_rfc3339(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppointmentError::PolicyDenied(_)));
    }

    #[tokio::test]
    async fn rescheduling_into_the_past_is_rejected() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id =
            insert_appointment(&env, 3 * 24 * 60, AppointmentStatus::Confirmed, 0, None).await;
        let err = reschedule_appointment(
            &env.config,
            &env.services(),
            id,
            RescheduleAppointmentRequest {
                new_start_time: (Utc::now() - Duration::hours(1)).to_rfc3339(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppointmentError::ValidationError(_)));
    }

    // --- Processor webhook reconciliation against the store ---

    #[tokio::test]
    async fn settled_webhook_confirms_the_appointment() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let id = insert_appointment(
            &env,
            3 * 24 * 60,
            AppointmentStatus::Pending,
            0,
            Some(live_intent(2_500)),
        )
        .await;

        let event: timelish_payments::ProcessorEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_1",
            "created": Utc::now().timestamp(),
            "type": "payment_intent.succeeded",
            "data": { "object": {
                "id": "pi_live",
                "amount": 2_500,
                "currency": "usd",
                "status": "succeeded"
            }}
        }))
        .unwrap();

        timelish_payments::process_processor_webhook(event, &env.store, Some(&env.sink_dyn))
            .await
            .unwrap();

        let stored = env.store.get_appointment(id).await.unwrap().unwrap();
        assert_eq!(stored.status, AppointmentStatus::Confirmed);
        assert_eq!(stored.payment.collected, 2_500);
        assert_eq!(
            stored.payment.intent.as_ref().unwrap().status,
            IntentStatus::Succeeded
        );
        assert_eq!(env.sink.kinds(), vec!["payment_received"]);
    }

    #[tokio::test]
    async fn webhook_for_unknown_intent_is_acknowledged() {
        let env = env_with(
            strict_scheduling(),
            DepositRuleConfig::NotRequired,
            DepositRuleConfig::Inherit,
        );
        let event: timelish_payments::ProcessorEvent = serde_json::from_value(serde_json::json!({
            "id": "evt_2",
            "created": Utc::now().timestamp(),
            "type": "payment_intent.succeeded",
            "data": { "object": { "id": "pi_unknown" } }
        }))
        .unwrap();
        timelish_payments::process_processor_webhook(event, &env.store, Some(&env.sink_dyn))
            .await
            .unwrap();
        assert!(env.sink.kinds().is_empty());
    }
}
