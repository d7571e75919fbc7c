// --- File: crates/mentorpay_stripe/src/handlers.rs ---
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, warn};

use crate::logic::{
    create_account_link, create_connect_account, create_payment_intent, get_account_balance,
    refund_or_cancel, validate_amount, CreateConnectAccountRequest, CreatePaymentIntentRequest,
    CreateRefundRequest,
};
use crate::webhook::{process_webhook_event, verify_stripe_signature, StripeEvent};
use crate::StripeError;
use mentorpay_config::{AppConfig, StripeConfig};
use mentorpay_common::models::{
    ConnectAccountSummary, MentorBalance, PaymentIntentSummary, RefundOutcome, WebhookAck,
};
use mentorpay_firestore::MentorStore;

// --- State for payment handlers ---
#[derive(Clone)]
pub struct StripeState {
    pub config: Arc<AppConfig>,
    /// Mentor record store; None when the document store is not configured.
    pub mentors: Option<Arc<dyn MentorStore>>,
}

impl StripeState {
    fn stripe_config(&self) -> Result<&StripeConfig, (StatusCode, String)> {
        self.config.stripe.as_ref().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Stripe configuration not loaded.".to_string(),
        ))
    }

    fn mentor_store(&self) -> Result<&Arc<dyn MentorStore>, (StatusCode, String)> {
        self.mentors.as_ref().ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Document store not configured.".to_string(),
        ))
    }
}

/// Maps Stripe errors to HTTP responses. Processor-side failures stay opaque
/// to the caller; the original error is logged here.
fn map_stripe_error(err: StripeError) -> (StatusCode, String) {
    match err {
        StripeError::ConfigError => {
            error!("Stripe configuration error.");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Stripe configuration error on server.".to_string(),
            )
        }
        StripeError::RequestError(e) => {
            error!("Stripe request error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to communicate with payment provider.".to_string(),
            )
        }
        StripeError::ParseError(e) => {
            error!("Stripe parse error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to understand payment provider response.".to_string(),
            )
        }
        StripeError::ApiError {
            status_code,
            message,
        } => {
            error!("Stripe API error ({}): {}", status_code, message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Payment provider rejected the request.".to_string(),
            )
        }
        StripeError::NonRefundableState(state) => (
            StatusCode::BAD_REQUEST,
            format!(
                "Payment intent in state '{}' cannot be refunded or canceled",
                state
            ),
        ),
        StripeError::WebhookSignatureError(msg) => (StatusCode::BAD_REQUEST, msg),
        StripeError::InternalError(msg) => {
            error!("Stripe internal logic error: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, msg)
        }
    }
}

/// Derives the caller's origin for building redirect URLs: the Origin header
/// when the browser sent one, otherwise scheme + Host.
pub(crate) fn request_origin(headers: &HeaderMap) -> Option<String> {
    if let Some(origin) = headers
        .get("origin")
        .and_then(|v| v.to_str().ok())
        .filter(|v| *v != "null" && !v.is_empty())
    {
        return Some(origin.to_string());
    }

    let host = headers.get("host").and_then(|v| v.to_str().ok())?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");
    Some(format!("{}://{}", scheme, host))
}

/// Handler to create a manual-capture payment intent.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/payments/create-payment-intent", // Path relative to /api
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 200, description = "Payment intent created", body = PaymentIntentSummary),
        (status = 400, description = "Missing or non-positive amount"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
))]
pub async fn create_payment_intent_handler(
    State(state): State<Arc<StripeState>>,
    Json(payload): Json<CreatePaymentIntentRequest>,
) -> Result<Json<PaymentIntentSummary>, (StatusCode, String)> {
    let stripe_config = state.stripe_config()?;

    // Validation happens before anything leaves the process; invalid amounts
    // never reach the processor.
    let amount =
        validate_amount(payload.amount).map_err(|msg| (StatusCode::BAD_REQUEST, msg))?;

    create_payment_intent(stripe_config, payload, amount)
        .await
        .map(Json)
        .map_err(map_stripe_error)
}

/// Handler to refund a captured payment intent or cancel an uncaptured one.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/payments/create-refund", // Path relative to /api
    request_body = CreateRefundRequest,
    responses(
        (status = 200, description = "Refund or cancellation created", body = RefundOutcome),
        (status = 400, description = "Missing payment intent id or non-refundable state"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
))]
pub async fn create_refund_handler(
    State(state): State<Arc<StripeState>>,
    Json(payload): Json<CreateRefundRequest>,
) -> Result<Json<RefundOutcome>, (StatusCode, String)> {
    let stripe_config = state.stripe_config()?;

    let payment_intent_id = payload
        .payment_intent_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or((
            StatusCode::BAD_REQUEST,
            "Missing paymentIntentId".to_string(),
        ))?;

    refund_or_cancel(stripe_config, payment_intent_id, payload.reason.as_deref())
        .await
        .map(Json)
        .map_err(map_stripe_error)
}

/// Handler to create (or look up) a mentor's Connect account and onboarding
/// link.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/payments/create-connect-account", // Path relative to /api
    request_body = CreateConnectAccountRequest,
    responses(
        (status = 201, description = "Connect account created", body = ConnectAccountSummary),
        (status = 200, description = "Mentor already linked to an account", body = ConnectAccountSummary),
        (status = 400, description = "Missing mentorId or email"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
))]
pub async fn create_connect_account_handler(
    State(state): State<Arc<StripeState>>,
    headers: HeaderMap,
    Json(payload): Json<CreateConnectAccountRequest>,
) -> Result<(StatusCode, Json<ConnectAccountSummary>), (StatusCode, String)> {
    let stripe_config = state.stripe_config()?;

    let mentor_id = payload
        .mentor_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or((StatusCode::BAD_REQUEST, "Missing mentorId".to_string()))?;
    let email = payload
        .email
        .as_deref()
        .filter(|email| !email.is_empty())
        .ok_or((StatusCode::BAD_REQUEST, "Missing email".to_string()))?;

    let mentors = state.mentor_store()?;

    // Idempotency: a mentor already linked to an account gets that id back,
    // no new account is created.
    let mentor_record = mentors.find(mentor_id).await.map_err(|e| {
        error!("Mentor lookup failed for {}: {}", mentor_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to look up mentor record.".to_string(),
        )
    })?;

    if let Some(account_id) = mentor_record
        .as_ref()
        .and_then(|record| record.stripe_account_id.clone())
    {
        return Ok((
            StatusCode::OK,
            Json(ConnectAccountSummary {
                account_id,
                status: "existing".to_string(),
                account_link: None,
            }),
        ));
    }

    let account =
        create_connect_account(stripe_config, mentor_id, email, payload.country.as_deref())
            .await
            .map_err(map_stripe_error)?;

    // Persist the linkage when the mentor record exists. A missing record is
    // tolerated: the account still exists at the processor, nothing is
    // persisted on our side.
    match mentor_record {
        Some(_) => {
            mentors
                .link_stripe_account(mentor_id, &account.id)
                .await
                .map_err(|e| {
                    error!(
                        "Failed to persist account {} for mentor {}: {}",
                        account.id, mentor_id, e
                    );
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Failed to persist mentor account link.".to_string(),
                    )
                })?;
        }
        None => {
            warn!(
                "Mentor record {} not found; created account {} without persisting the link",
                mentor_id, account.id
            );
        }
    }

    let origin = request_origin(&headers).ok_or((
        StatusCode::BAD_REQUEST,
        "Unable to determine request origin".to_string(),
    ))?;
    let account_link = create_account_link(stripe_config, &account.id, &origin)
        .await
        .map_err(map_stripe_error)?;

    let status = if account.details_submitted {
        "active"
    } else {
        "pending"
    };

    Ok((
        StatusCode::CREATED,
        Json(ConnectAccountSummary {
            account_id: account.id,
            status: status.to_string(),
            account_link: Some(account_link.url),
        }),
    ))
}

/// Handler to fetch a mentor's connected-account balance.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/payments/mentor-balance/{mentor_id}", // Path relative to /api
    params(("mentor_id" = String, Path, description = "The mentor's document id")),
    responses(
        (status = 200, description = "Connected account balance", body = MentorBalance),
        (status = 404, description = "Mentor not found, or mentor has no connected account"),
        (status = 500, description = "Internal Server Error or Stripe API error")
    ),
    tag = "Payments"
))]
pub async fn mentor_balance_handler(
    State(state): State<Arc<StripeState>>,
    Path(mentor_id): Path<String>,
) -> Result<Json<MentorBalance>, (StatusCode, String)> {
    let stripe_config = state.stripe_config()?;
    let mentors = state.mentor_store()?;

    let mentor_record = mentors.find(&mentor_id).await.map_err(|e| {
        error!("Mentor lookup failed for {}: {}", mentor_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to look up mentor record.".to_string(),
        )
    })?;

    let record = mentor_record.ok_or((StatusCode::NOT_FOUND, "Mentor not found".to_string()))?;
    let account_id = record.stripe_account_id.ok_or((
        StatusCode::NOT_FOUND,
        "Mentor has no connected payout account".to_string(),
    ))?;

    get_account_balance(stripe_config, &account_id)
        .await
        .map(Json)
        .map_err(map_stripe_error)
}

/// Handler for incoming Stripe webhooks.
///
/// With a signing secret configured and a signature header present, the raw
/// body is verified before parsing. When either is missing the body is parsed
/// unverified — a development fallback only, never a production setup.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/payments/stripe-webhook", // Path relative to /api
    request_body = StripeEvent,
    responses(
        (status = 200, description = "Webhook received and acknowledged", body = WebhookAck),
        (status = 400, description = "Signature verification or payload parse failure")
    ),
    tag = "Payment Webhooks"
))]
pub async fn stripe_webhook_handler(
    State(state): State<Arc<StripeState>>,
    headers: HeaderMap,
    body: String, // Raw body for signature verification
) -> Response {
    let webhook_secret = state
        .config
        .stripe
        .as_ref()
        .and_then(|stripe| stripe.webhook_secret.as_deref());
    let sig_header = headers
        .get("Stripe-Signature")
        .and_then(|h| h.to_str().ok());

    match (webhook_secret, sig_header) {
        (Some(secret), Some(_)) => {
            if let Err(e) = verify_stripe_signature(body.as_bytes(), sig_header, secret) {
                warn!("Stripe webhook signature verification failed: {}", e);
                return (StatusCode::BAD_REQUEST, format!("Invalid signature: {}", e))
                    .into_response();
            }
        }
        _ => {
            // No secret or no signature header: accept the payload as-is.
            // This path performs NO verification and must never be relied on
            // in production.
            warn!("Processing Stripe webhook WITHOUT signature verification (development fallback)");
        }
    }

    let event: StripeEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to deserialize Stripe webhook event: {}", e);
            return (StatusCode::BAD_REQUEST, format!("Invalid payload: {}", e)).into_response();
        }
    };

    process_webhook_event(&event);

    (StatusCode::OK, Json(WebhookAck { received: true })).into_response()
}
