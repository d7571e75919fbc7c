// --- File: crates/mentorpay_common/src/error.rs ---
use thiserror::Error;

/// The base error type for all MentorPay errors.
///
/// This enum provides a common set of error variants that can be used across all crates.
/// Each crate can extend this by implementing From<SpecificError> for MentorPayError.
#[derive(Error, Debug)]
pub enum MentorPayError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or signature verification
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
///
/// This trait can be implemented by error types to provide a consistent way
/// to convert errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for MentorPayError {
    fn status_code(&self) -> u16 {
        match self {
            MentorPayError::HttpError(_) => 500,
            MentorPayError::ParseError(_) => 400,
            MentorPayError::ConfigError(_) => 500,
            MentorPayError::AuthError(_) => 401,
            MentorPayError::ValidationError(_) => 400,
            MentorPayError::ExternalServiceError { .. } => 502,
            MentorPayError::NotFoundError(_) => 404,
            MentorPayError::InternalError(_) => 500,
        }
    }
}

/// Creates a new ConfigError with the given message.
pub fn config_error<S: Into<String>>(message: S) -> MentorPayError {
    MentorPayError::ConfigError(message.into())
}

/// Creates a new ValidationError with the given message.
pub fn validation_error<S: Into<String>>(message: S) -> MentorPayError {
    MentorPayError::ValidationError(message.into())
}

/// Creates a new NotFoundError with the given message.
pub fn not_found<S: Into<String>>(message: S) -> MentorPayError {
    MentorPayError::NotFoundError(message.into())
}

/// Creates a new ExternalServiceError with the given service name and message.
pub fn external_service_error<S1: Into<String>, S2: Into<String>>(
    service_name: S1,
    message: S2,
) -> MentorPayError {
    MentorPayError::ExternalServiceError {
        service_name: service_name.into(),
        message: message.into(),
    }
}

/// Creates a new InternalError with the given message.
pub fn internal_error<S: Into<String>>(message: S) -> MentorPayError {
    MentorPayError::InternalError(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_error_kinds() {
        assert_eq!(validation_error("bad amount").status_code(), 400);
        assert_eq!(not_found("no such mentor").status_code(), 404);
        assert_eq!(config_error("missing secret").status_code(), 500);
        assert_eq!(internal_error("boom").status_code(), 500);
        assert_eq!(external_service_error("Stripe", "down").status_code(), 502);
        assert_eq!(
            MentorPayError::AuthError("signature mismatch".into()).status_code(),
            401
        );
    }
}
