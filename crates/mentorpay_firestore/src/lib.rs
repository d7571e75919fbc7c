//! Firestore document store integration for MentorPay
//!
//! This crate wraps the Firestore REST v1 API for the narrow set of
//! operations the payment layer needs: fetching a document by collection and
//! id, and patching a fixed set of fields on it. Authentication uses a
//! service account key, the same way the rest of the Google integrations in
//! this workspace authenticate.
//!
//! The only collection this system touches is `mentors`; the
//! [`repository::MentorRepository`] adds the mentor-specific view on top of
//! the raw client.

pub mod auth;
pub mod client;
#[cfg(test)]
mod client_test;
pub mod error;
pub mod repository;

pub use client::{string_field, string_value, timestamp_value, Document, FirestoreClient};
pub use error::FirestoreError;
pub use repository::{MentorRecord, MentorRepository, MentorStore, MENTORS_COLLECTION};
