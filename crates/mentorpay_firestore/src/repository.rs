// --- File: crates/mentorpay_firestore/src/repository.rs ---
//! Mentor-record view over the raw Firestore client.
//!
//! Mentor records are owned by the rest of the platform; the payment layer
//! only ever reads and writes the processor account linkage on them. The
//! [`MentorStore`] trait decouples handlers from Firestore so tests can swap
//! in an in-memory store.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::client::{string_field, string_value, timestamp_value, FirestoreClient};
use crate::error::FirestoreError;
use mentorpay_common::BoxFuture;

/// The collection holding mentor records.
pub const MENTORS_COLLECTION: &str = "mentors";

/// The slice of a mentor record the payment layer cares about.
#[derive(Debug, Clone)]
pub struct MentorRecord {
    pub id: String,
    /// Connected account id (acct_...), if the mentor has been onboarded.
    pub stripe_account_id: Option<String>,
}

/// Storage abstraction for mentor records.
///
/// Invariant: a mentor is linked to at most one account, ever. Callers must
/// check [`find`](MentorStore::find) first and skip creation when a link
/// already exists. There is no transactional guarantee between that read and
/// the later write.
pub trait MentorStore: Send + Sync {
    /// Looks up a mentor record by id. `Ok(None)` means the record does not
    /// exist; an existing record without a linked account comes back with
    /// `stripe_account_id: None`.
    fn find(&self, mentor_id: &str) -> BoxFuture<'_, Option<MentorRecord>, FirestoreError>;

    /// Writes the connected account id onto a mentor record, stamping
    /// `updatedAt`. Only those two fields are touched.
    fn link_stripe_account(
        &self,
        mentor_id: &str,
        account_id: &str,
    ) -> BoxFuture<'_, (), FirestoreError>;
}

/// Firestore-backed repository for mentor records.
pub struct MentorRepository {
    client: FirestoreClient,
}

impl MentorRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }
}

impl MentorStore for MentorRepository {
    fn find(&self, mentor_id: &str) -> BoxFuture<'_, Option<MentorRecord>, FirestoreError> {
        let mentor_id = mentor_id.to_string();
        Box::pin(async move {
            let document = self
                .client
                .get_document(MENTORS_COLLECTION, &mentor_id)
                .await?;

            Ok(document.map(|doc| MentorRecord {
                id: mentor_id.clone(),
                stripe_account_id: string_field(&doc, "stripeAccountId").map(String::from),
            }))
        })
    }

    fn link_stripe_account(
        &self,
        mentor_id: &str,
        account_id: &str,
    ) -> BoxFuture<'_, (), FirestoreError> {
        let mentor_id = mentor_id.to_string();
        let account_id = account_id.to_string();
        Box::pin(async move {
            let mut fields: HashMap<String, Value> = HashMap::new();
            fields.insert("stripeAccountId".to_string(), string_value(&account_id));
            fields.insert("updatedAt".to_string(), timestamp_value(Utc::now()));

            self.client
                .update_document(
                    MENTORS_COLLECTION,
                    &mentor_id,
                    fields,
                    &["stripeAccountId", "updatedAt"],
                )
                .await?;

            info!("Linked mentor {} to account {}", mentor_id, account_id);
            Ok(())
        })
    }
}
