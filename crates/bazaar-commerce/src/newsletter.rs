//! Newsletter subscriptions.

use crate::ids::SubscriptionId;
use crate::validation::FieldErrors;
use crate::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A newsletter subscription, keyed by email.
///
/// Email uniqueness is kept by looking up before inserting; the store does
/// not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: SubscriptionId,
    pub email: String,
    pub active: bool,
    pub subscribed_at: DateTime<Utc>,
}

impl Subscription {
    /// Document type in the content store.
    pub const DOC_TYPE: &'static str = "newsletter";

    /// A fresh, active subscription.
    pub fn new(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: SubscriptionId::generate(),
            email: email.into(),
            active: true,
            subscribed_at: now,
        }
    }
}

/// Trim and validate an email submitted to the newsletter form.
pub fn normalize_email(email: &str) -> Result<String, CommerceError> {
    let mut errors = FieldErrors::new();
    errors.require_email("email", email);
    errors.into_result()?;
    Ok(email.trim().to_string())
}
