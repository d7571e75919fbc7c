// --- File: crates/mentorpay_stripe/src/logic.rs ---
//! Core Stripe API calls for the payment layer.
//!
//! Everything here talks to the Stripe REST API directly with form-encoded
//! bodies over the shared HTTP client. No call is retried; a failed call
//! surfaces immediately as an error for the handler to map.

use mentorpay_config::StripeConfig;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{error, info};

use crate::error::StripeError;
use mentorpay_common::models::{BalanceFunds, MentorBalance, PaymentIntentSummary, RefundOutcome};
use mentorpay_common::HTTP_CLIENT;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Currency applied when a payment request does not name one.
const FALLBACK_CURRENCY: &str = "usd";
/// Country applied when a Connect account request does not name one.
const FALLBACK_COUNTRY: &str = "US";

// --- Request Data Structures ---

/// Request from our frontend to create a manual-capture payment intent.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    /// Amount in the smallest currency unit (e.g. cents). Must be positive.
    #[cfg_attr(feature = "openapi", schema(example = 2500))]
    pub amount: Option<i64>,
    #[cfg_attr(feature = "openapi", schema(example = "usd"))]
    pub currency: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "1hr session"))]
    pub description: Option<String>,
    /// Opaque reference to the mentor's connected account. Recorded as
    /// metadata only; it does not route funds in this call.
    #[cfg_attr(feature = "openapi", schema(example = "acct_1A2b3C"))]
    pub mentor_account_id: Option<String>,
}

/// Request from our frontend to refund or cancel a payment intent.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateRefundRequest {
    #[cfg_attr(feature = "openapi", schema(example = "pi_3NxyzAbc"))]
    pub payment_intent_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "requested_by_customer"))]
    pub reason: Option<String>,
}

/// Request from our frontend to create a mentor's Connect account.
#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateConnectAccountRequest {
    #[cfg_attr(feature = "openapi", schema(example = "m1"))]
    pub mentor_id: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "mentor@example.com"))]
    pub email: Option<String>,
    #[cfg_attr(feature = "openapi", schema(example = "US"))]
    pub country: Option<String>,
}

// --- Stripe API Response Structures ---

#[derive(Deserialize, Debug, Clone)]
pub struct StripePaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

#[derive(Deserialize, Debug)]
pub struct StripeRefund {
    pub id: String,
    pub payment_intent: Option<String>,
    pub amount: i64,
    pub status: Option<String>,
    pub created: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct StripeAccount {
    pub id: String,
    #[serde(default)]
    pub details_submitted: bool,
}

#[derive(Deserialize, Debug)]
pub struct StripeAccountLink {
    pub url: String,
}

#[derive(Deserialize, Debug)]
struct StripeBalance {
    #[serde(default)]
    available: Vec<BalanceFunds>,
    #[serde(default)]
    pending: Vec<BalanceFunds>,
    instant_available: Option<Vec<BalanceFunds>>,
}

// --- Validation ---

/// Validates the requested amount before anything leaves the process.
/// Absent or non-positive amounts are rejected; the processor is never
/// contacted for them.
pub fn validate_amount(amount: Option<i64>) -> Result<i64, String> {
    match amount {
        None => Err("Amount is required".to_string()),
        Some(amount) if amount <= 0 => {
            Err("Amount must be a positive integer in minor units (e.g. cents)".to_string())
        }
        Some(amount) => Ok(amount),
    }
}

/// What to do with a payment intent the caller wants undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefundAction {
    /// Funds are reserved but not captured: cancel, which avoids processor
    /// fees entirely.
    Cancel,
    /// Funds already moved: issue a real refund.
    Refund,
    /// Neither applies; carries the actual state for the error message.
    Reject(String),
}

/// Decides between cancellation and refund from the intent's current state.
pub fn refund_action(status: &str) -> RefundAction {
    match status {
        "requires_capture" => RefundAction::Cancel,
        "succeeded" => RefundAction::Refund,
        other => RefundAction::Reject(other.to_string()),
    }
}

// --- Core Logic Functions ---

fn secret_key(config: &StripeConfig) -> Result<&str, StripeError> {
    config.secret_key.as_deref().ok_or(StripeError::ConfigError)
}

/// Creates a manual-capture payment intent. Funds are reserved at
/// confirmation time and stay reserved until a capture step performed
/// outside this layer.
pub async fn create_payment_intent(
    config: &StripeConfig,
    request_data: CreatePaymentIntentRequest,
    amount: i64,
) -> Result<PaymentIntentSummary, StripeError> {
    let currency = request_data
        .currency
        .as_deref()
        .unwrap_or_else(|| config.default_currency.as_deref().unwrap_or(FALLBACK_CURRENCY))
        .to_lowercase();

    let mut form_body: Vec<(String, String)> = vec![
        ("amount".to_string(), amount.to_string()),
        ("currency".to_string(), currency),
        ("capture_method".to_string(), "manual".to_string()),
        ("payment_method_types[]".to_string(), "card".to_string()),
    ];
    if let Some(description) = &request_data.description {
        form_body.push(("description".to_string(), description.clone()));
    }
    if let Some(mentor_account_id) = &request_data.mentor_account_id {
        form_body.push((
            "metadata[mentor_account]".to_string(),
            mentor_account_id.clone(),
        ));
    }

    let api_url = format!("{}/payment_intents", STRIPE_API_BASE);
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key(config)?, None::<&str>)
        .form(&form_body)
        .send()
        .await?;

    let intent: StripePaymentIntent = parse_stripe_response(response).await?;
    info!(
        "Created payment intent {} ({} {})",
        intent.id, intent.amount, intent.currency
    );

    let client_secret = intent.client_secret.ok_or_else(|| {
        StripeError::InternalError("Stripe response missing client_secret".to_string())
    })?;
    Ok(PaymentIntentSummary {
        client_secret,
        id: intent.id,
        amount: intent.amount,
        currency: intent.currency,
        status: intent.status,
    })
}

/// Retrieves the current state of a payment intent.
pub async fn retrieve_payment_intent(
    config: &StripeConfig,
    payment_intent_id: &str,
) -> Result<StripePaymentIntent, StripeError> {
    let api_url = format!("{}/payment_intents/{}", STRIPE_API_BASE, payment_intent_id);
    let response = HTTP_CLIENT
        .get(&api_url)
        .basic_auth(secret_key(config)?, None::<&str>)
        .send()
        .await?;
    parse_stripe_response(response).await
}

async fn cancel_payment_intent(
    config: &StripeConfig,
    payment_intent_id: &str,
) -> Result<StripePaymentIntent, StripeError> {
    let api_url = format!(
        "{}/payment_intents/{}/cancel",
        STRIPE_API_BASE, payment_intent_id
    );
    let form_body: Vec<(String, String)> = Vec::new();
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key(config)?, None::<&str>)
        .form(&form_body)
        .send()
        .await?;
    parse_stripe_response(response).await
}

async fn create_refund(
    config: &StripeConfig,
    payment_intent_id: &str,
    reason: Option<&str>,
) -> Result<StripeRefund, StripeError> {
    let mut form_body: Vec<(String, String)> = vec![(
        "payment_intent".to_string(),
        payment_intent_id.to_string(),
    )];
    if let Some(reason) = reason {
        form_body.push(("reason".to_string(), reason.to_string()));
    }

    let api_url = format!("{}/refunds", STRIPE_API_BASE);
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key(config)?, None::<&str>)
        .form(&form_body)
        .send()
        .await?;
    parse_stripe_response(response).await
}

/// Refunds a captured payment intent, or cancels an uncaptured one.
///
/// The intent's current state is fetched first; cancellation of a
/// still-reserved authorization avoids processor fees, so it is preferred
/// whenever possible. Any other state is rejected without a mutation call.
pub async fn refund_or_cancel(
    config: &StripeConfig,
    payment_intent_id: &str,
    reason: Option<&str>,
) -> Result<RefundOutcome, StripeError> {
    let intent = retrieve_payment_intent(config, payment_intent_id).await?;

    match refund_action(&intent.status) {
        RefundAction::Cancel => {
            let canceled = cancel_payment_intent(config, payment_intent_id).await?;
            info!("Canceled uncaptured payment intent {}", canceled.id);
            Ok(RefundOutcome::Canceled {
                id: canceled.id,
                status: canceled.status,
                canceled: true,
            })
        }
        RefundAction::Refund => {
            let refund = create_refund(config, payment_intent_id, reason).await?;
            info!("Refunded payment intent {} via {}", payment_intent_id, refund.id);
            Ok(RefundOutcome::Refunded {
                id: refund.id,
                payment_intent_id: refund
                    .payment_intent
                    .unwrap_or_else(|| payment_intent_id.to_string()),
                amount: refund.amount,
                status: refund.status.unwrap_or_else(|| "pending".to_string()),
                created: refund.created.unwrap_or_default(),
            })
        }
        RefundAction::Reject(state) => Err(StripeError::NonRefundableState(state)),
    }
}

/// Creates an express Connect account for a mentor: card payments and
/// transfers, individual business type, tagged with the mentor id.
pub async fn create_connect_account(
    config: &StripeConfig,
    mentor_id: &str,
    email: &str,
    country: Option<&str>,
) -> Result<StripeAccount, StripeError> {
    let country = country
        .unwrap_or_else(|| config.default_country.as_deref().unwrap_or(FALLBACK_COUNTRY));

    let form_body: Vec<(String, String)> = vec![
        ("type".to_string(), "express".to_string()),
        ("country".to_string(), country.to_string()),
        ("email".to_string(), email.to_string()),
        (
            "capabilities[card_payments][requested]".to_string(),
            "true".to_string(),
        ),
        (
            "capabilities[transfers][requested]".to_string(),
            "true".to_string(),
        ),
        ("business_type".to_string(), "individual".to_string()),
        ("metadata[mentorId]".to_string(), mentor_id.to_string()),
    ];

    let api_url = format!("{}/accounts", STRIPE_API_BASE);
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key(config)?, None::<&str>)
        .form(&form_body)
        .send()
        .await?;

    let account: StripeAccount = parse_stripe_response(response).await?;
    info!("Created Connect account {} for mentor {}", account.id, mentor_id);
    Ok(account)
}

/// Creates a single-use onboarding link for a Connect account. Refresh and
/// return URLs both point at the dashboard path on the caller's own origin.
pub async fn create_account_link(
    config: &StripeConfig,
    account_id: &str,
    origin: &str,
) -> Result<StripeAccountLink, StripeError> {
    let dashboard_url = format!("{}{}", origin, config.dashboard_path);

    let form_body: Vec<(String, String)> = vec![
        ("account".to_string(), account_id.to_string()),
        ("refresh_url".to_string(), dashboard_url.clone()),
        ("return_url".to_string(), dashboard_url),
        ("type".to_string(), "account_onboarding".to_string()),
    ];

    let api_url = format!("{}/account_links", STRIPE_API_BASE);
    let response = HTTP_CLIENT
        .post(&api_url)
        .basic_auth(secret_key(config)?, None::<&str>)
        .form(&form_body)
        .send()
        .await?;
    parse_stripe_response(response).await
}

/// Fetches a connected account's balance, acting on behalf of that account
/// via the Stripe-Account header.
pub async fn get_account_balance(
    config: &StripeConfig,
    account_id: &str,
) -> Result<MentorBalance, StripeError> {
    let api_url = format!("{}/balance", STRIPE_API_BASE);
    let response = HTTP_CLIENT
        .get(&api_url)
        .basic_auth(secret_key(config)?, None::<&str>)
        .header("Stripe-Account", account_id)
        .send()
        .await?;

    let balance: StripeBalance = parse_stripe_response(response).await?;
    Ok(MentorBalance {
        available: balance.available,
        pending: balance.pending,
        instant_available: balance.instant_available.unwrap_or_default(),
    })
}

/// Reads a Stripe API response: success bodies parse into `T`, error bodies
/// are mined for Stripe's `error.message`.
async fn parse_stripe_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, StripeError> {
    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        Ok(serde_json::from_str(&body_text)?)
    } else {
        let error_message = match serde_json::from_str::<serde_json::Value>(&body_text) {
            Ok(json_body) => json_body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or(&body_text)
                .to_string(),
            Err(_) => body_text,
        };
        error!(
            "Stripe API request failed with HTTP status: {}. Message: {}",
            status, error_message
        );
        Err(StripeError::ApiError {
            status_code: status.as_u16(),
            message: error_message,
        })
    }
}
