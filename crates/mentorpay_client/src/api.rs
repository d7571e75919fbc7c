// --- File: crates/mentorpay_client/src/api.rs ---
//! HTTP implementation of the backend API.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use mentorpay_common::models::{
    ConnectAccountSummary, MentorBalance, PaymentIntentSummary, RefundOutcome, WebhookAck,
};
use mentorpay_common::{
    external_service_error, not_found, validation_error, BackendApi, BoxFuture, MentorPayError,
    HTTP_CLIENT,
};

/// Calls the real payment endpoints by joining relative paths onto a base
/// origin (e.g. `https://api.example.com`).
pub struct HttpBackend {
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

/// Maps a backend response onto the shared error type: 400s become
/// validation errors, 404s not-found, everything else a service failure.
async fn parse_backend_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, MentorPayError> {
    let status = response.status();
    let body_text = response
        .text()
        .await
        .map_err(|e| MentorPayError::HttpError(e.to_string()))?;

    if status.is_success() {
        serde_json::from_str(&body_text)
            .map_err(|e| MentorPayError::ParseError(format!("{}: {}", e, body_text)))
    } else if status.as_u16() == 400 {
        Err(validation_error(body_text))
    } else if status.as_u16() == 404 {
        Err(not_found(body_text))
    } else {
        Err(external_service_error(
            "MentorPay backend",
            format!("{}: {}", status, body_text),
        ))
    }
}

impl BackendApi for HttpBackend {
    fn create_payment_intent(
        &self,
        amount: i64,
        currency: Option<&str>,
        description: Option<&str>,
        mentor_account_id: Option<&str>,
    ) -> BoxFuture<'_, PaymentIntentSummary, MentorPayError> {
        let url = self.url("/payments/create-payment-intent");
        let body = json!({
            "amount": amount,
            "currency": currency,
            "description": description,
            "mentorAccountId": mentor_account_id,
        });

        Box::pin(async move {
            debug!("POST {}", url);
            let response = HTTP_CLIENT
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| MentorPayError::HttpError(e.to_string()))?;
            parse_backend_response(response).await
        })
    }

    fn create_refund(
        &self,
        payment_intent_id: &str,
        reason: Option<&str>,
    ) -> BoxFuture<'_, RefundOutcome, MentorPayError> {
        let url = self.url("/payments/create-refund");
        let body = json!({
            "paymentIntentId": payment_intent_id,
            "reason": reason,
        });

        Box::pin(async move {
            debug!("POST {}", url);
            let response = HTTP_CLIENT
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| MentorPayError::HttpError(e.to_string()))?;
            parse_backend_response(response).await
        })
    }

    fn create_connect_account(
        &self,
        mentor_id: &str,
        email: &str,
        country: Option<&str>,
    ) -> BoxFuture<'_, ConnectAccountSummary, MentorPayError> {
        let url = self.url("/payments/create-connect-account");
        let body = json!({
            "mentorId": mentor_id,
            "email": email,
            "country": country,
        });

        Box::pin(async move {
            debug!("POST {}", url);
            let response = HTTP_CLIENT
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| MentorPayError::HttpError(e.to_string()))?;
            parse_backend_response(response).await
        })
    }

    fn get_mentor_balance(
        &self,
        mentor_id: &str,
    ) -> BoxFuture<'_, MentorBalance, MentorPayError> {
        let url = self.url(&format!("/payments/mentor-balance/{}", mentor_id));

        Box::pin(async move {
            debug!("GET {}", url);
            let response = HTTP_CLIENT
                .get(&url)
                .send()
                .await
                .map_err(|e| MentorPayError::HttpError(e.to_string()))?;
            parse_backend_response(response).await
        })
    }

    fn post_webhook_event(&self, event: Value) -> BoxFuture<'_, WebhookAck, MentorPayError> {
        let url = self.url("/payments/stripe-webhook");

        Box::pin(async move {
            debug!("POST {}", url);
            let response = HTTP_CLIENT
                .post(&url)
                .json(&event)
                .send()
                .await
                .map_err(|e| MentorPayError::HttpError(e.to_string()))?;
            parse_backend_response(response).await
        })
    }
}
