// --- File: crates/mentorpay_config/src/lib.rs ---
//! Configuration loading for the MentorPay backend.
//!
//! Configuration is assembled once at process start from three layered
//! sources: a default file, an environment-specific file, and environment
//! variables with the `MENTORPAY` prefix (double underscore as separator,
//! e.g. `MENTORPAY_SERVER__PORT`). Credentials are overlaid from their
//! conventional env vars afterwards; there are no compiled-in fallback
//! secrets anywhere in this crate.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use tracing::warn;

pub mod models;
pub use models::*;

/// Loads the application configuration.
///
/// Layering, lowest precedence first: `config/default`, `config/{RUN_ENV}`,
/// `MENTORPAY`-prefixed environment variables. The config directory can be
/// moved with `MENTORPAY_CONFIG_DIR`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("MENTORPAY_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    let builder = Config::builder()
        .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
        .add_source(File::with_name(&format!("{}/{}", config_dir, run_env)).required(false))
        .add_source(Environment::with_prefix("MENTORPAY").separator("__"));

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    Ok(apply_env_secrets(raw_config))
}

/// Overlays credentials from their conventional environment variables onto an
/// already-deserialized config. Values present in the environment win over
/// anything the config files carried.
pub fn apply_env_secrets(mut config: AppConfig) -> AppConfig {
    if let Some(stripe) = config.stripe.as_mut() {
        if let Ok(secret_key) = env::var("STRIPE_SECRET_KEY") {
            stripe.secret_key = Some(secret_key);
        }
        if let Ok(webhook_secret) = env::var("STRIPE_WEBHOOK_SECRET") {
            stripe.webhook_secret = Some(webhook_secret);
        }
        if stripe.secret_key.is_none() {
            warn!("Stripe configured without a secret key; payment calls will fail");
        }
    }
    config
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures the dotenv file is loaded into the environment exactly once.
///
/// The file defaults to `.env` and can be overridden with `DOTENV_OVERRIDE`.
pub fn ensure_dotenv_loaded() {
    let dotenv_path =
        std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });
}
