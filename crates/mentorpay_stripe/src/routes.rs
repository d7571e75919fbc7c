// --- File: crates/mentorpay_stripe/src/routes.rs ---

use crate::handlers::{
    create_connect_account_handler, create_payment_intent_handler, create_refund_handler,
    mentor_balance_handler, stripe_webhook_handler, StripeState,
};
use axum::{
    routing::{get, post},
    Router,
};
use mentorpay_config::AppConfig;
use mentorpay_firestore::{FirestoreClient, MentorRepository, MentorStore};
use std::sync::Arc;

/// Creates a router containing all routes for the payment feature.
///
/// The mentor store is built from the Firestore config when enabled; without
/// it the Connect and balance endpoints answer 500.
pub fn routes(config: Arc<AppConfig>) -> Router {
    let mentors: Option<Arc<dyn MentorStore>> = config
        .firestore
        .as_ref()
        .filter(|_| config.use_firestore)
        .map(|firestore_config| {
            Arc::new(MentorRepository::new(FirestoreClient::new(
                firestore_config.clone(),
            ))) as Arc<dyn MentorStore>
        });

    router(Arc::new(StripeState { config, mentors }))
}

/// Wires the payment routes onto an already-built state. Split out so tests
/// can supply their own mentor store.
pub fn router(state: Arc<StripeState>) -> Router {
    Router::new()
        .route(
            "/payments/create-payment-intent",
            post(create_payment_intent_handler),
        )
        .route("/payments/create-refund", post(create_refund_handler))
        .route(
            "/payments/create-connect-account",
            post(create_connect_account_handler),
        )
        .route(
            "/payments/mentor-balance/{mentor_id}",
            get(mentor_balance_handler),
        )
        .route("/payments/stripe-webhook", post(stripe_webhook_handler))
        .with_state(state)
}
