#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use crate::mock::MockBackend;
    use mentorpay_common::models::RefundOutcome;
    use mentorpay_common::BackendApi;

    fn fast_mock() -> MockBackend {
        MockBackend::with_delay(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn mock_payment_intent_matches_the_real_wire_shape() {
        let summary = fast_mock()
            .create_payment_intent(2500, Some("usd"), Some("1hr session"), None)
            .await
            .unwrap();

        assert_eq!(summary.amount, 2500);
        assert_eq!(summary.currency, "usd");
        assert!(summary.id.starts_with("pi_mock_"));

        let wire = serde_json::to_value(&summary).unwrap();
        assert!(wire.get("clientSecret").is_some());
        assert!(wire.get("status").is_some());
    }

    #[tokio::test]
    async fn mock_refund_references_the_given_intent() {
        let outcome = fast_mock()
            .create_refund("pi_abc", Some("requested_by_customer"))
            .await
            .unwrap();

        match &outcome {
            RefundOutcome::Refunded {
                payment_intent_id,
                amount,
                ..
            } => {
                assert_eq!(payment_intent_id, "pi_abc");
                assert!(*amount >= 0);
            }
            other => panic!("expected refunded outcome, got {:?}", other),
        }

        let wire = serde_json::to_value(&outcome).unwrap();
        assert!(wire.get("paymentIntentId").is_some());
    }

    #[tokio::test]
    async fn mock_connect_account_produces_id_status_and_link() {
        let summary = fast_mock()
            .create_connect_account("m1", "a@b.com", None)
            .await
            .unwrap();

        assert!(summary.account_id.starts_with("acct_mock_"));
        assert_eq!(summary.status, "pending");
        assert!(summary.account_link.is_some());

        let wire = serde_json::to_value(&summary).unwrap();
        assert!(wire.get("accountId").is_some());
        assert!(wire.get("accountLink").is_some());
    }

    #[tokio::test]
    async fn mock_balance_has_the_three_buckets() {
        let balance = fast_mock().get_mentor_balance("m1").await.unwrap();

        assert!(!balance.available.is_empty());
        assert!(!balance.pending.is_empty());
        assert!(balance.instant_available.is_empty());

        let wire = serde_json::to_value(&balance).unwrap();
        assert!(wire.get("available").is_some());
        assert!(wire.get("pending").is_some());
        assert!(wire.get("instant_available").is_some());
    }

    #[tokio::test]
    async fn mock_webhook_is_acknowledged() {
        let ack = fast_mock()
            .post_webhook_event(json!({"id": "evt_1", "type": "payment_intent.succeeded"}))
            .await
            .unwrap();
        assert!(ack.received);
    }

    #[tokio::test]
    async fn mock_calls_take_the_configured_delay() {
        let mock = MockBackend::with_delay(Duration::from_millis(20));
        let started = std::time::Instant::now();
        mock.get_mentor_balance("m1").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
