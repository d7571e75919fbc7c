// --- File: crates/mentorpay_stripe/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    CreateConnectAccountRequest, CreatePaymentIntentRequest, CreateRefundRequest,
};
use crate::webhook::{StripeEvent, StripeEventData};
use mentorpay_common::models::{
    BalanceFunds, ConnectAccountSummary, MentorBalance, PaymentIntentSummary, RefundOutcome,
    WebhookAck,
};

#[utoipa::path(
    post,
    path = "/payments/create-payment-intent", // Path relative to /api
    request_body(content = CreatePaymentIntentRequest, example = json!({
        "amount": 2500,
        "currency": "usd",
        "description": "1hr session",
        "mentorAccountId": "acct_1A2b3C"
    })),
    responses(
        (status = 200, description = "Payment intent created (manual capture)", body = PaymentIntentSummary),
        (status = 400, description = "Missing or non-positive amount"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
)]
fn doc_create_payment_intent_handler() {}

#[utoipa::path(
    post,
    path = "/payments/create-refund", // Path relative to /api
    request_body(content = CreateRefundRequest, example = json!({
        "paymentIntentId": "pi_3NxyzAbc",
        "reason": "requested_by_customer"
    })),
    responses(
        (status = 200, description = "Refund created, or uncaptured intent canceled", body = RefundOutcome),
        (status = 400, description = "Missing paymentIntentId or non-refundable state"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
)]
fn doc_create_refund_handler() {}

#[utoipa::path(
    post,
    path = "/payments/create-connect-account", // Path relative to /api
    request_body(content = CreateConnectAccountRequest, example = json!({
        "mentorId": "m1",
        "email": "mentor@example.com",
        "country": "US"
    })),
    responses(
        (status = 201, description = "Connect account and onboarding link created", body = ConnectAccountSummary),
        (status = 200, description = "Mentor already linked to an account", body = ConnectAccountSummary),
        (status = 400, description = "Missing mentorId or email"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
)]
fn doc_create_connect_account_handler() {}

#[utoipa::path(
    get,
    path = "/payments/mentor-balance/{mentor_id}", // Path relative to /api
    params(("mentor_id" = String, Path, description = "The mentor's document id")),
    responses(
        (status = 200, description = "Connected account balance", body = MentorBalance),
        (status = 404, description = "Mentor not found, or mentor has no connected account"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
)]
fn doc_mentor_balance_handler() {}

#[utoipa::path(
    post,
    path = "/payments/stripe-webhook", // Path relative to /api
    request_body = StripeEvent,
    responses(
        (status = 200, description = "Webhook received and acknowledged", body = WebhookAck),
        (status = 400, description = "Signature verification or payload parse failure")
    ),
    tag = "Payment Webhooks"
)]
fn doc_stripe_webhook_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_payment_intent_handler,
        doc_create_refund_handler,
        doc_create_connect_account_handler,
        doc_mentor_balance_handler,
        doc_stripe_webhook_handler
    ),
    components(
        schemas(
            CreatePaymentIntentRequest,
            CreateRefundRequest,
            CreateConnectAccountRequest,
            PaymentIntentSummary,
            RefundOutcome,
            ConnectAccountSummary,
            MentorBalance,
            BalanceFunds,
            WebhookAck,
            StripeEvent,
            StripeEventData
        )
    ),
    tags(
        (name = "Payments", description = "Payment, refund and Connect account API"),
        (name = "Payment Webhooks", description = "Stripe server-to-server webhooks")
    )
)]
pub struct PaymentsApiDoc;
