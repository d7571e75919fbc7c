// --- File: crates/mentorpay_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Stripe Config ---
// Secrets are injected from env vars at load time (STRIPE_SECRET_KEY,
// STRIPE_WEBHOOK_SECRET). There are no compiled-in fallback values.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StripeConfig {
    /// API secret key (sk_...). Env: STRIPE_SECRET_KEY
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Webhook signing secret (whsec_...). Env: STRIPE_WEBHOOK_SECRET.
    /// When absent, incoming webhooks are parsed WITHOUT verification —
    /// acceptable for local development only.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Currency used when a payment request does not name one.
    pub default_currency: Option<String>,
    /// Country used when a Connect account request does not name one.
    pub default_country: Option<String>,
    /// Path on the caller's origin that onboarding links return to.
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
}

fn default_dashboard_path() -> String {
    "/dashboard".to_string()
}

// --- Firestore Config ---
// The service-account key referenced by key_path carries the credential;
// nothing secret lives in this struct itself.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FirestoreConfig {
    pub project_id: String,
    /// Firestore database id, defaults to "(default)".
    pub database_id: Option<String>,
    /// Path to the service account JSON key file.
    /// Env: MENTORPAY_FIRESTORE__KEY_PATH
    pub key_path: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_stripe: bool,
    #[serde(default)]
    pub use_firestore: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub stripe: Option<StripeConfig>,
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_config_deserializes_with_defaults() {
        let config: AppConfig = serde_json::from_value(json!({
            "server": {"host": "127.0.0.1", "port": 8086}
        }))
        .unwrap();
        assert!(!config.use_stripe);
        assert!(!config.use_firestore);
        assert!(config.stripe.is_none());
        assert!(config.firestore.is_none());
    }

    #[test]
    fn stripe_section_defaults_dashboard_path() {
        let stripe: StripeConfig = serde_json::from_value(json!({
            "default_currency": "usd",
            "default_country": "US"
        }))
        .unwrap();
        assert_eq!(stripe.dashboard_path, "/dashboard");
        assert!(stripe.secret_key.is_none());
        assert!(stripe.webhook_secret.is_none());
    }
}
