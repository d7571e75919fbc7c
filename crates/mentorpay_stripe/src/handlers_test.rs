#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::{SystemTime, UNIX_EPOCH};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hmac::{Hmac, Mac};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use sha2::Sha256;
    use tower::ServiceExt;

    use crate::handlers::StripeState;
    use crate::routes::router;
    use mentorpay_common::BoxFuture;
    use mentorpay_config::AppConfig;
    use mentorpay_firestore::{FirestoreError, MentorRecord, MentorStore};

    /// In-memory mentor store: mentor id -> optional linked account id.
    #[derive(Default)]
    struct FakeMentorStore {
        records: Mutex<HashMap<String, Option<String>>>,
    }

    impl FakeMentorStore {
        fn with_mentor(self, mentor_id: &str, account_id: Option<&str>) -> Self {
            self.records
                .lock()
                .unwrap()
                .insert(mentor_id.to_string(), account_id.map(String::from));
            self
        }
    }

    impl MentorStore for FakeMentorStore {
        fn find(&self, mentor_id: &str) -> BoxFuture<'_, Option<MentorRecord>, FirestoreError> {
            let record = self.records.lock().unwrap().get(mentor_id).map(|account| {
                MentorRecord {
                    id: mentor_id.to_string(),
                    stripe_account_id: account.clone(),
                }
            });
            Box::pin(async move { Ok(record) })
        }

        fn link_stripe_account(
            &self,
            mentor_id: &str,
            account_id: &str,
        ) -> BoxFuture<'_, (), FirestoreError> {
            self.records
                .lock()
                .unwrap()
                .insert(mentor_id.to_string(), Some(account_id.to_string()));
            Box::pin(async move { Ok(()) })
        }
    }

    fn test_config(webhook_secret: Option<&str>) -> Arc<AppConfig> {
        Arc::new(
            serde_json::from_value(json!({
                "server": {"host": "127.0.0.1", "port": 0},
                "use_stripe": true,
                "use_firestore": true,
                "stripe": {
                    "secret_key": "sk_test_123",
                    "webhook_secret": webhook_secret,
                    "default_currency": "usd",
                    "default_country": "US"
                }
            }))
            .unwrap(),
        )
    }

    fn test_router(webhook_secret: Option<&str>, store: FakeMentorStore) -> axum::Router {
        router(Arc::new(StripeState {
            config: test_config(webhook_secret),
            mentors: Some(Arc::new(store)),
        }))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // --- Payment intent validation ---

    #[tokio::test]
    async fn missing_amount_is_rejected_before_any_processor_call() {
        let response = test_router(None, FakeMentorStore::default())
            .oneshot(post_json(
                "/payments/create-payment-intent",
                json!({"currency": "usd", "description": "1hr session"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Amount is required"));
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        for amount in [0, -2500] {
            let response = test_router(None, FakeMentorStore::default())
                .oneshot(post_json(
                    "/payments/create-payment-intent",
                    json!({"amount": amount}),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert!(body_string(response).await.contains("positive"));
        }
    }

    // --- Refund validation ---

    #[tokio::test]
    async fn refund_without_payment_intent_id_is_rejected() {
        let response = test_router(None, FakeMentorStore::default())
            .oneshot(post_json(
                "/payments/create-refund",
                json!({"reason": "requested_by_customer"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Missing paymentIntentId"));
    }

    // --- Connect account ---

    #[tokio::test]
    async fn connect_account_requires_mentor_id_and_email() {
        let response = test_router(None, FakeMentorStore::default())
            .oneshot(post_json(
                "/payments/create-connect-account",
                json!({"email": "a@b.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Missing mentorId"));

        let response = test_router(None, FakeMentorStore::default())
            .oneshot(post_json(
                "/payments/create-connect-account",
                json!({"mentorId": "m1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Missing email"));
    }

    #[tokio::test]
    async fn already_linked_mentor_gets_existing_account_back() {
        // Two identical requests: both return the stored id, neither creates
        // anything (creation would require a live processor call).
        for _ in 0..2 {
            let store = FakeMentorStore::default().with_mentor("m1", Some("acct_existing"));
            let response = test_router(None, store)
                .oneshot(post_json(
                    "/payments/create-connect-account",
                    json!({"mentorId": "m1", "email": "a@b.com"}),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(body["accountId"], "acct_existing");
            assert_eq!(body["status"], "existing");
            assert!(body.get("accountLink").is_none());
        }
    }

    // --- Balance lookups ---

    #[tokio::test]
    async fn balance_for_unknown_mentor_is_404() {
        let response = test_router(None, FakeMentorStore::default())
            .oneshot(
                Request::builder()
                    .uri("/payments/mentor-balance/m404")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "Mentor not found");
    }

    #[tokio::test]
    async fn balance_for_unlinked_mentor_is_a_distinct_404() {
        let store = FakeMentorStore::default().with_mentor("m1", None);
        let response = test_router(None, store)
            .oneshot(
                Request::builder()
                    .uri("/payments/mentor-balance/m1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_string(response).await,
            "Mentor has no connected payout account"
        );
    }

    // --- Origin derivation for onboarding links ---

    #[test]
    fn origin_header_wins_over_host() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("origin", "https://app.example.com".parse().unwrap());
        headers.insert("host", "api.example.com".parse().unwrap());
        assert_eq!(
            crate::handlers::request_origin(&headers).as_deref(),
            Some("https://app.example.com")
        );
    }

    #[test]
    fn host_fallback_uses_forwarded_proto() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("host", "api.example.com".parse().unwrap());
        assert_eq!(
            crate::handlers::request_origin(&headers).as_deref(),
            Some("https://api.example.com")
        );

        headers.insert("x-forwarded-proto", "http".parse().unwrap());
        assert_eq!(
            crate::handlers::request_origin(&headers).as_deref(),
            Some("http://api.example.com")
        );
    }

    #[test]
    fn null_origin_falls_back_to_host() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert("origin", "null".parse().unwrap());
        headers.insert("host", "localhost:8086".parse().unwrap());
        assert_eq!(
            crate::handlers::request_origin(&headers).as_deref(),
            Some("https://localhost:8086")
        );
    }

    // --- Webhooks ---

    fn sign(payload: &str, secret: &str, timestamp: i64) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, payload).as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn webhook_request(body: &str, sig_header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/payments/stripe-webhook")
            .header("content-type", "application/json");
        if let Some(sig) = sig_header {
            builder = builder.header("Stripe-Signature", sig);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn webhook_without_secret_is_acknowledged_unverified() {
        for event_type in ["payment_intent.succeeded", "some.unknown.event"] {
            let body = json!({
                "id": "evt_1",
                "type": event_type,
                "data": {"object": {"id": "pi_1"}}
            })
            .to_string();

            let response = test_router(None, FakeMentorStore::default())
                .oneshot(webhook_request(&body, None))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let ack: Value = serde_json::from_str(&body_string(response).await).unwrap();
            assert_eq!(ack, json!({"received": true}));
        }
    }

    #[tokio::test]
    async fn webhook_with_invalid_json_is_rejected() {
        let response = test_router(None, FakeMentorStore::default())
            .oneshot(webhook_request("not json at all", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Invalid payload"));
    }

    #[tokio::test]
    async fn webhook_with_bad_signature_is_rejected() {
        let body = json!({"id": "evt_1", "type": "payment_intent.succeeded"}).to_string();
        let header = format!("t={},v1={}", current_timestamp(), "0".repeat(64));

        let response = test_router(Some("whsec_test"), FakeMentorStore::default())
            .oneshot(webhook_request(&body, Some(&header)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.contains("Invalid signature"));
    }

    #[tokio::test]
    async fn webhook_with_valid_signature_is_acknowledged() {
        let body = json!({
            "id": "evt_1",
            "type": "account.updated",
            "data": {"object": {"id": "acct_1", "details_submitted": true}}
        })
        .to_string();
        let timestamp = current_timestamp();
        let header = format!("t={},v1={}", timestamp, sign(&body, "whsec_test", timestamp));

        let response = test_router(Some("whsec_test"), FakeMentorStore::default())
            .oneshot(webhook_request(&body, Some(&header)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let ack: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(ack, json!({"received": true}));
    }

    #[tokio::test]
    async fn webhook_with_secret_but_no_signature_falls_back_unverified() {
        let body = json!({"id": "evt_1", "type": "payment_intent.canceled"}).to_string();

        let response = test_router(Some("whsec_test"), FakeMentorStore::default())
            .oneshot(webhook_request(&body, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    fn current_timestamp() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }
}
