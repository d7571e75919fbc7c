// --- File: crates/mentorpay_stripe/src/webhook.rs ---
//! Webhook signature verification and event dispatch.
//!
//! Verification follows Stripe's scheme: the `Stripe-Signature` header
//! carries a timestamp `t` and one or more `v1` HMAC-SHA256 signatures over
//! `"{t}.{raw_body}"`. Events are modeled as a closed enum with an explicit
//! unhandled fallback so dispatch stays exhaustive at compile time.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use crate::error::StripeError;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Signatures older (or newer) than this are rejected outright.
const TOLERANCE_SECONDS: i64 = 300;

/// Represents the `data` field within a Stripe Event.
#[derive(Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeEventData {
    /// The object the event describes; its shape varies by event type.
    #[serde(default)]
    pub object: serde_json::Value,
}

/// The outer Stripe event object.
#[derive(Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub livemode: bool,
    #[serde(default)]
    pub data: StripeEventData,
}

/// The webhook event types this layer recognizes.
///
/// Everything else lands in `Unhandled`, which is logged and acknowledged
/// exactly like a recognized type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEventKind {
    PaymentIntentSucceeded,
    PaymentIntentPaymentFailed,
    PaymentIntentCanceled,
    AccountUpdated,
    Unhandled(String),
}

impl WebhookEventKind {
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            "payment_intent.succeeded" => WebhookEventKind::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => WebhookEventKind::PaymentIntentPaymentFailed,
            "payment_intent.canceled" => WebhookEventKind::PaymentIntentCanceled,
            "account.updated" => WebhookEventKind::AccountUpdated,
            other => WebhookEventKind::Unhandled(other.to_string()),
        }
    }
}

/// Verifies the signature of an incoming Stripe webhook request.
///
/// # Arguments
/// * `payload_bytes` - The raw request body bytes.
/// * `sig_header` - The value of the 'Stripe-Signature' header.
/// * `secret` - The webhook signing secret (whsec_...).
///
/// Returns Ok(()) if any v1 signature matches, otherwise
/// StripeError::WebhookSignatureError.
pub fn verify_stripe_signature(
    payload_bytes: &[u8],
    sig_header: Option<&str>,
    secret: &str,
) -> Result<(), StripeError> {
    let sig_header_value = sig_header.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing Stripe-Signature header".to_string())
    })?;

    let mut timestamp_str: Option<&str> = None;
    let mut v1_signatures_hex: Vec<&str> = Vec::new();

    for item in sig_header_value.split(',') {
        let parts: Vec<&str> = item.trim().splitn(2, '=').collect();
        if parts.len() == 2 {
            match parts[0] {
                "t" => timestamp_str = Some(parts[1]),
                "v1" => v1_signatures_hex.push(parts[1]),
                _ => {} // Ignore other schemes like v0
            }
        }
    }

    let timestamp_str = timestamp_str.ok_or_else(|| {
        StripeError::WebhookSignatureError("Missing timestamp 't' in Stripe-Signature".to_string())
    })?;
    let parsed_timestamp = timestamp_str.parse::<i64>().map_err(|_| {
        StripeError::WebhookSignatureError("Invalid timestamp format in Stripe-Signature".to_string())
    })?;

    if v1_signatures_hex.is_empty() {
        return Err(StripeError::WebhookSignatureError(
            "Missing v1 signature in Stripe-Signature".to_string(),
        ));
    }

    let current_timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs() as i64;
    if (current_timestamp - parsed_timestamp).abs() > TOLERANCE_SECONDS {
        return Err(StripeError::WebhookSignatureError(
            "Timestamp outside tolerance".to_string(),
        ));
    }

    // Sign "{t}.{body}" with the original string timestamp from the header
    let signed_payload_string = format!(
        "{}.{}",
        timestamp_str,
        String::from_utf8_lossy(payload_bytes)
    );

    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| {
        StripeError::WebhookSignatureError("Invalid webhook secret format for HMAC".to_string())
    })?;
    mac.update(signed_payload_string.as_bytes());
    let calculated_signature_hex = hex::encode(mac.finalize().into_bytes());

    for provided_sig_hex in v1_signatures_hex {
        if constant_time_eq(
            calculated_signature_hex.as_bytes(),
            provided_sig_hex.as_bytes(),
        ) {
            return Ok(());
        }
    }
    Err(StripeError::WebhookSignatureError(
        "Signature mismatch".to_string(),
    ))
}

/// Helper for constant-time string comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Dispatches a trusted (or assumed-trusted) event.
///
/// Every case, recognized or not, is observe-and-acknowledge: the interesting
/// state already lives with the processor, this layer only records that the
/// notification arrived.
pub fn process_webhook_event(event: &StripeEvent) {
    let object_id = event.data.object.get("id").and_then(|v| v.as_str());

    match WebhookEventKind::from_type(&event.event_type) {
        WebhookEventKind::PaymentIntentSucceeded => {
            info!("PaymentIntent succeeded: {:?}", object_id);
        }
        WebhookEventKind::PaymentIntentPaymentFailed => {
            let failure_message = event
                .data
                .object
                .get("last_payment_error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str());
            warn!(
                "PaymentIntent failed: {:?} ({})",
                object_id,
                failure_message.unwrap_or("no failure message")
            );
        }
        WebhookEventKind::PaymentIntentCanceled => {
            info!("PaymentIntent canceled: {:?}", object_id);
        }
        WebhookEventKind::AccountUpdated => {
            let details_submitted = event
                .data
                .object
                .get("details_submitted")
                .and_then(|v| v.as_bool());
            info!(
                "Connect account updated: {:?} (details_submitted: {:?})",
                object_id, details_submitted
            );
        }
        WebhookEventKind::Unhandled(event_type) => {
            info!("Received unhandled Stripe event type: {}", event_type);
        }
    }
}
