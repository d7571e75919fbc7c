// --- File: crates/mentorpay_firestore/src/error.rs ---
use mentorpay_common::{external_service_error, HttpStatusCode, MentorPayError};
use thiserror::Error;

/// Firestore-specific error types.
#[derive(Error, Debug)]
pub enum FirestoreError {
    /// Error during authentication with Google
    #[error("Firestore authentication error: {0}")]
    AuthError(String),

    /// Error occurred during a Firestore API request
    #[error("Firestore API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Firestore API
    #[error("Firestore API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Firestore API response
    #[error("Failed to parse Firestore API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Firestore configuration
    #[error("Firestore configuration missing or incomplete")]
    ConfigError,
}

/// Convert FirestoreError to MentorPayError
impl From<FirestoreError> for MentorPayError {
    fn from(err: FirestoreError) -> Self {
        match err {
            FirestoreError::AuthError(msg) => {
                MentorPayError::AuthError(format!("Firestore auth error: {}", msg))
            }
            FirestoreError::RequestError(e) => {
                MentorPayError::HttpError(format!("Firestore request error: {}", e))
            }
            FirestoreError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Firestore",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            FirestoreError::ParseError(e) => {
                MentorPayError::ParseError(format!("Firestore response parse error: {}", e))
            }
            FirestoreError::ConfigError => MentorPayError::ConfigError(
                "Firestore configuration missing or incomplete".to_string(),
            ),
        }
    }
}

/// Document-store failures surface to callers as opaque server errors; the
/// original cause is logged, never echoed.
impl HttpStatusCode for FirestoreError {
    fn status_code(&self) -> u16 {
        match self {
            FirestoreError::AuthError(_) => 500,
            FirestoreError::RequestError(_) => 500,
            FirestoreError::ApiError { .. } => 500,
            FirestoreError::ParseError(_) => 500,
            FirestoreError::ConfigError => 500,
        }
    }
}
