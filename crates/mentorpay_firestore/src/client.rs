// --- File: crates/mentorpay_firestore/src/client.rs ---
//! Raw Firestore REST v1 client.
//!
//! Documents travel as JSON with typed value wrappers
//! (`{"stringValue": ...}`, `{"timestampValue": ...}`). The helpers at the
//! bottom of this module read and build those wrappers so callers never deal
//! with the envelope directly.

use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use mentorpay_config::FirestoreConfig;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::auth::get_firestore_auth_token;
use crate::error::FirestoreError;
use mentorpay_common::HTTP_CLIENT;

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// A Firestore document: resource name plus typed field map.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
    #[serde(rename = "updateTime")]
    pub update_time: Option<String>,
}

/// Client for the Firestore REST API.
///
/// Stateless apart from its configuration; a fresh access token is obtained
/// per call, so the client is safe to share across requests.
pub struct FirestoreClient {
    config: FirestoreConfig,
}

impl FirestoreClient {
    pub fn new(config: FirestoreConfig) -> Self {
        Self { config }
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        let database_id = self.config.database_id.as_deref().unwrap_or("(default)");
        format!(
            "{}/projects/{}/databases/{}/documents/{}/{}",
            FIRESTORE_API_BASE, self.config.project_id, database_id, collection, document_id
        )
    }

    /// Fetches a single document by collection and id.
    ///
    /// A missing document is not an error: Firestore's 404 maps to `Ok(None)`
    /// so callers can distinguish "absent" from "broken".
    pub async fn get_document(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<Document>, FirestoreError> {
        let url = self.document_url(collection, document_id);
        debug!("Fetching Firestore document: {}/{}", collection, document_id);

        let token = get_firestore_auth_token(&self.config)
            .await
            .map_err(|e| FirestoreError::AuthError(e.to_string()))?;

        let response = HTTP_CLIENT.get(&url).bearer_auth(token).send().await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }

        let body_text = response.text().await?;
        if status.is_success() {
            let document: Document = serde_json::from_str(&body_text)?;
            Ok(Some(document))
        } else {
            let message = extract_google_error(&body_text);
            error!(
                "Firestore get failed for {}/{}: {} - {}",
                collection, document_id, status, message
            );
            Err(FirestoreError::ApiError {
                status_code: status.as_u16(),
                message,
            })
        }
    }

    /// Patches the named fields of a document, leaving everything else alone.
    ///
    /// The update mask restricts the write to exactly the fields passed in;
    /// Firestore will create missing fields and never touch unnamed ones.
    pub async fn update_document(
        &self,
        collection: &str,
        document_id: &str,
        fields: HashMap<String, Value>,
        update_mask: &[&str],
    ) -> Result<(), FirestoreError> {
        let url = self.document_url(collection, document_id);
        debug!(
            "Patching Firestore document: {}/{} (fields: {:?})",
            collection, document_id, update_mask
        );

        let token = get_firestore_auth_token(&self.config)
            .await
            .map_err(|e| FirestoreError::AuthError(e.to_string()))?;

        let mask_params: Vec<(&str, &str)> = update_mask
            .iter()
            .map(|field| ("updateMask.fieldPaths", *field))
            .collect();

        let response = HTTP_CLIENT
            .patch(&url)
            .bearer_auth(token)
            .query(&mask_params)
            .json(&json!({ "fields": fields }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body_text = response.text().await?;
            let message = extract_google_error(&body_text);
            error!(
                "Firestore patch failed for {}/{}: {} - {}",
                collection, document_id, status, message
            );
            Err(FirestoreError::ApiError {
                status_code: status.as_u16(),
                message,
            })
        }
    }
}

/// Pulls the human-readable message out of Google's error envelope, falling
/// back to the raw body.
fn extract_google_error(body_text: &str) -> String {
    match serde_json::from_str::<Value>(body_text) {
        Ok(json_body) => json_body
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or(body_text)
            .to_string(),
        Err(_) => body_text.to_string(),
    }
}

/// Reads a string field out of a document's typed field map.
pub fn string_field<'a>(document: &'a Document, field: &str) -> Option<&'a str> {
    document
        .fields
        .get(field)
        .and_then(|v| v.get("stringValue"))
        .and_then(|v| v.as_str())
}

/// Builds a Firestore string value wrapper.
pub fn string_value(value: &str) -> Value {
    json!({ "stringValue": value })
}

/// Builds a Firestore timestamp value wrapper (RFC 3339, UTC).
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    json!({ "timestampValue": at.to_rfc3339_opts(SecondsFormat::Millis, true) })
}
