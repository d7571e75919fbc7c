// --- File: crates/mentorpay_common/src/models.rs ---
//! Wire models shared between the HTTP handlers and the front-end API shim.
//!
//! These are the exact JSON shapes the payment endpoints produce. Keeping them
//! in one crate guarantees the mock shim stays interface-compatible with the
//! real handlers.

use serde::{Deserialize, Serialize};

/// Response for a freshly created payment authorization (manual capture).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PaymentIntentSummary {
    /// Client-usable secret token for confirming the payment in the browser.
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    /// The payment intent id (pi_...).
    pub id: String,
    /// Amount in the smallest currency unit (e.g., cents).
    pub amount: i64,
    pub currency: String,
    /// Processor-defined status, e.g. "requires_payment_method".
    pub status: String,
}

/// Outcome of the refund-or-cancel operation.
///
/// An uncaptured authorization is canceled (no processor fees); a captured one
/// is refunded. The two paths produce different JSON shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(untagged)]
pub enum RefundOutcome {
    Refunded {
        /// The refund id (re_...).
        id: String,
        #[serde(rename = "paymentIntentId")]
        payment_intent_id: String,
        amount: i64,
        status: String,
        /// Unix timestamp of refund creation.
        created: i64,
    },
    Canceled {
        /// The canceled payment intent id.
        id: String,
        status: String,
        canceled: bool,
    },
}

/// Response for Connect account creation (or idempotent lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConnectAccountSummary {
    #[serde(rename = "accountId")]
    pub account_id: String,
    /// "active" once account details are submitted, "pending" before,
    /// "existing" when the mentor was already linked.
    pub status: String,
    /// Single-use onboarding link; absent for an already-linked mentor.
    #[serde(rename = "accountLink", skip_serializing_if = "Option::is_none")]
    pub account_link: Option<String>,
}

/// One amount/currency breakdown inside a balance bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BalanceFunds {
    pub amount: i64,
    pub currency: String,
}

/// A connected account's balance, passed through from the processor.
/// Field names stay snake_case to match the processor's own response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MentorBalance {
    pub available: Vec<BalanceFunds>,
    pub pending: Vec<BalanceFunds>,
    /// Defaults to an empty list when the processor omits it.
    #[serde(default)]
    pub instant_available: Vec<BalanceFunds>,
}

/// Webhook acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct WebhookAck {
    pub received: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn refund_outcome_shapes_are_distinguishable() {
        let canceled: RefundOutcome = serde_json::from_value(json!({
            "id": "pi_123",
            "status": "canceled",
            "canceled": true
        }))
        .unwrap();
        assert!(matches!(canceled, RefundOutcome::Canceled { .. }));

        let refunded: RefundOutcome = serde_json::from_value(json!({
            "id": "re_123",
            "paymentIntentId": "pi_123",
            "amount": 2500,
            "status": "succeeded",
            "created": 1735689600
        }))
        .unwrap();
        assert!(matches!(refunded, RefundOutcome::Refunded { .. }));
    }

    #[test]
    fn instant_available_defaults_to_empty() {
        let balance: MentorBalance = serde_json::from_value(json!({
            "available": [{"amount": 1000, "currency": "usd"}],
            "pending": []
        }))
        .unwrap();
        assert!(balance.instant_available.is_empty());
        assert_eq!(balance.available[0].amount, 1000);
    }

    #[test]
    fn client_secret_serializes_camel_case() {
        let summary = PaymentIntentSummary {
            client_secret: "pi_1_secret_2".into(),
            id: "pi_1".into(),
            amount: 2500,
            currency: "usd".into(),
            status: "requires_payment_method".into(),
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("clientSecret").is_some());
        assert!(value.get("client_secret").is_none());
    }
}
