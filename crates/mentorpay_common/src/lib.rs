// --- File: crates/mentorpay_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Shared wire models
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, external_service_error, internal_error, not_found, validation_error,
    HttpStatusCode, MentorPayError,
};

// Re-export HTTP utilities for easier access
pub use http::client::{create_client, HTTP_CLIENT};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

// Re-export the service abstraction and its result models
pub use services::{BackendApi, BoxFuture};
