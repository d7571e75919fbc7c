// --- File: crates/mentorpay_common/src/services.rs ---
//! Service abstractions for the payment backend.
//!
//! This module defines the `BackendApi` trait: the five operations the payment
//! layer exposes to a front-end. Implementations can talk to the real backend
//! over HTTP or synthesize responses locally, which decouples calling code
//! from whichever implementation is active.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::error::MentorPayError;
use crate::models::{
    ConnectAccountSummary, MentorBalance, PaymentIntentSummary, RefundOutcome, WebhookAck,
};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// The operations a payment backend offers to a front-end.
///
/// Both the HTTP client and the offline mock implement this trait with the
/// same response shapes, so calling code is agnostic to which one is active.
pub trait BackendApi: Send + Sync {
    /// Create a manual-capture payment authorization.
    fn create_payment_intent(
        &self,
        amount: i64,
        currency: Option<&str>,
        description: Option<&str>,
        mentor_account_id: Option<&str>,
    ) -> BoxFuture<'_, PaymentIntentSummary, MentorPayError>;

    /// Refund a captured payment, or cancel an uncaptured authorization.
    fn create_refund(
        &self,
        payment_intent_id: &str,
        reason: Option<&str>,
    ) -> BoxFuture<'_, RefundOutcome, MentorPayError>;

    /// Create (or look up) a mentor's connected account and onboarding link.
    fn create_connect_account(
        &self,
        mentor_id: &str,
        email: &str,
        country: Option<&str>,
    ) -> BoxFuture<'_, ConnectAccountSummary, MentorPayError>;

    /// Fetch a mentor's connected-account balance.
    fn get_mentor_balance(&self, mentor_id: &str)
        -> BoxFuture<'_, MentorBalance, MentorPayError>;

    /// Deliver a webhook event body to the backend.
    fn post_webhook_event(&self, event: Value) -> BoxFuture<'_, WebhookAck, MentorPayError>;
}
