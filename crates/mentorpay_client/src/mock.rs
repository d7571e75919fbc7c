// --- File: crates/mentorpay_client/src/mock.rs ---
//! Offline mock implementation of the backend API.
//!
//! Used when no real backend is reachable (static preview, demo mode). Every
//! call waits a fixed artificial delay and then fabricates a plausible
//! response from random identifiers — nothing here contacts any external
//! service, and every value is fictitious.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tokio::time::sleep;
use tracing::debug;
use uuid::Uuid;

use mentorpay_common::models::{
    BalanceFunds, ConnectAccountSummary, MentorBalance, PaymentIntentSummary, RefundOutcome,
    WebhookAck,
};
use mentorpay_common::{BackendApi, BoxFuture, MentorPayError};

/// Simulated network latency applied to every mock call.
const DEFAULT_DELAY_MS: u64 = 600;

pub struct MockBackend {
    delay: Duration,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Short random hex token for fabricated identifiers.
fn mock_token() -> String {
    Uuid::new_v4().simple().to_string()[..16].to_string()
}

/// Pseudo-random amount in minor units, within a plausible range.
fn mock_amount(max_units: u64) -> i64 {
    let entropy = Uuid::new_v4().as_u128() as u64;
    ((entropy % max_units) * 100) as i64
}

impl BackendApi for MockBackend {
    fn create_payment_intent(
        &self,
        amount: i64,
        currency: Option<&str>,
        _description: Option<&str>,
        _mentor_account_id: Option<&str>,
    ) -> BoxFuture<'_, PaymentIntentSummary, MentorPayError> {
        let currency = currency.unwrap_or("usd").to_lowercase();
        Box::pin(async move {
            sleep(self.delay).await;
            let token = mock_token();
            debug!("Mock payment intent pi_mock_{}", token);
            Ok(PaymentIntentSummary {
                client_secret: format!("pi_mock_{}_secret_{}", token, mock_token()),
                id: format!("pi_mock_{}", token),
                amount,
                currency,
                status: "requires_payment_method".to_string(),
            })
        })
    }

    fn create_refund(
        &self,
        payment_intent_id: &str,
        _reason: Option<&str>,
    ) -> BoxFuture<'_, RefundOutcome, MentorPayError> {
        let payment_intent_id = payment_intent_id.to_string();
        Box::pin(async move {
            sleep(self.delay).await;
            Ok(RefundOutcome::Refunded {
                id: format!("re_mock_{}", mock_token()),
                payment_intent_id,
                amount: mock_amount(100),
                status: "succeeded".to_string(),
                created: Utc::now().timestamp(),
            })
        })
    }

    fn create_connect_account(
        &self,
        mentor_id: &str,
        _email: &str,
        _country: Option<&str>,
    ) -> BoxFuture<'_, ConnectAccountSummary, MentorPayError> {
        let mentor_id = mentor_id.to_string();
        Box::pin(async move {
            sleep(self.delay).await;
            let token = mock_token();
            debug!("Mock connect account acct_mock_{} for {}", token, mentor_id);
            Ok(ConnectAccountSummary {
                account_id: format!("acct_mock_{}", token),
                status: "pending".to_string(),
                account_link: Some(format!(
                    "https://connect.stripe.com/setup/e/mock/{}",
                    mock_token()
                )),
            })
        })
    }

    fn get_mentor_balance(
        &self,
        _mentor_id: &str,
    ) -> BoxFuture<'_, MentorBalance, MentorPayError> {
        Box::pin(async move {
            sleep(self.delay).await;
            Ok(MentorBalance {
                available: vec![BalanceFunds {
                    amount: mock_amount(500),
                    currency: "usd".to_string(),
                }],
                pending: vec![BalanceFunds {
                    amount: mock_amount(200),
                    currency: "usd".to_string(),
                }],
                instant_available: Vec::new(),
            })
        })
    }

    fn post_webhook_event(&self, _event: Value) -> BoxFuture<'_, WebhookAck, MentorPayError> {
        Box::pin(async move {
            sleep(self.delay).await;
            Ok(WebhookAck { received: true })
        })
    }
}
