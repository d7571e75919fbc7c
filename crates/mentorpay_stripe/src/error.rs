// --- File: crates/mentorpay_stripe/src/error.rs ---
use mentorpay_common::{external_service_error, HttpStatusCode, MentorPayError};
use thiserror::Error;

/// Stripe-specific error types.
#[derive(Error, Debug)]
pub enum StripeError {
    /// Error occurred during a Stripe API request
    #[error("Stripe API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Stripe API
    #[error("Stripe API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Stripe API response
    #[error("Failed to parse Stripe API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Stripe configuration
    #[error("Stripe configuration missing or incomplete")]
    ConfigError,

    /// Payment intent is in a state that allows neither refund nor cancel
    #[error("Payment intent in state '{0}' cannot be refunded or canceled")]
    NonRefundableState(String),

    /// Webhook signature verification failed
    #[error("Stripe webhook signature verification failed: {0}")]
    WebhookSignatureError(String),

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Convert StripeError to MentorPayError
impl From<StripeError> for MentorPayError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::RequestError(e) => {
                MentorPayError::HttpError(format!("Stripe request error: {}", e))
            }
            StripeError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Stripe API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            StripeError::ParseError(e) => {
                MentorPayError::ParseError(format!("Stripe response parse error: {}", e))
            }
            StripeError::ConfigError => {
                MentorPayError::ConfigError("Stripe configuration missing or incomplete".to_string())
            }
            StripeError::NonRefundableState(state) => MentorPayError::ValidationError(format!(
                "Payment intent in state '{}' cannot be refunded or canceled",
                state
            )),
            StripeError::WebhookSignatureError(msg) => {
                MentorPayError::AuthError(format!("Stripe webhook signature error: {}", msg))
            }
            StripeError::InternalError(msg) => {
                MentorPayError::InternalError(format!("Stripe internal error: {}", msg))
            }
        }
    }
}

/// HTTP mapping for StripeError. Processor-side failures are opaque 500s to
/// callers; only state/validation problems surface as 400s.
impl HttpStatusCode for StripeError {
    fn status_code(&self) -> u16 {
        match self {
            StripeError::RequestError(_) => 500,
            StripeError::ApiError { .. } => 500,
            StripeError::ParseError(_) => 500,
            StripeError::ConfigError => 500,
            StripeError::NonRefundableState(_) => 400,
            StripeError::WebhookSignatureError(_) => 400,
            StripeError::InternalError(_) => 500,
        }
    }
}
