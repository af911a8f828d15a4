//! Newsletter subscribe and unsubscribe.
//!
//! Uniqueness by email is kept by looking up before writing. Two concurrent
//! first-time subscriptions for the same address can both miss the lookup
//! and create two documents.

use crate::error::ErrorKind;
use crate::{ActionError, ActionResult, Shop};
use bazaar_commerce::newsletter::{normalize_email, Subscription};
use bazaar_store::{DocumentStore, DocumentStoreExt, Patch, Query};
use chrono::Utc;
use tracing::{error, info, instrument};

pub const SUBSCRIBED: &str = "Successfully subscribed to the newsletter";
pub const ALREADY_SUBSCRIBED: &str = "This email is already subscribed";
pub const REACTIVATED: &str = "Welcome back! Your subscription has been reactivated";
pub const UNSUBSCRIBED: &str = "You have been unsubscribed from the newsletter";
pub const NOT_SUBSCRIBED: &str = "This email is not subscribed";

/// Result of a subscribe request that was accepted.
enum Subscribed {
    New(Subscription),
    Reactivated(Subscription),
}

impl Shop {
    async fn find_subscription(&self, email: &str) -> Result<Option<Subscription>, ActionError> {
        let query = Query::of_type(Subscription::DOC_TYPE).where_eq("email", email);
        Ok(self.store.query_optional(&query).await?)
    }

    async fn subscribe_inner(&self, email: &str) -> Result<Subscribed, ActionError> {
        let email = normalize_email(email)?;

        match self.find_subscription(&email).await? {
            Some(existing) if existing.active => {
                Err(ActionError::Conflict(ALREADY_SUBSCRIBED.to_string()))
            }
            Some(existing) => {
                let now = Utc::now();
                let patch = Patch::new(existing.id.as_str())
                    .set("active", true)
                    .set("subscribed_at", now.to_rfc3339());
                let doc = self.store.patch(patch).await?;
                Ok(Subscribed::Reactivated(doc.deserialize()?))
            }
            None => {
                let subscription = Subscription::new(email, Utc::now());
                self.store
                    .create_as(Subscription::DOC_TYPE, &subscription)
                    .await?;
                Ok(Subscribed::New(subscription))
            }
        }
    }

    /// Subscribe an email, reactivating a lapsed subscription.
    #[instrument(skip(self))]
    pub async fn subscribe(&self, email: &str) -> ActionResult<Subscription> {
        match self.subscribe_inner(email).await {
            Ok(Subscribed::New(sub)) => {
                info!(id = %sub.id, "New newsletter subscription");
                ActionResult::ok(SUBSCRIBED, sub)
            }
            Ok(Subscribed::Reactivated(sub)) => {
                info!(id = %sub.id, "Newsletter subscription reactivated");
                ActionResult::ok(REACTIVATED, sub)
            }
            Err(e) => {
                if e.kind() == ErrorKind::Persistence {
                    error!(error = %e, "Newsletter subscription failed");
                }
                e.into()
            }
        }
    }

    async fn unsubscribe_inner(&self, email: &str) -> Result<Subscription, ActionError> {
        let email = normalize_email(email)?;

        match self.find_subscription(&email).await? {
            Some(existing) if existing.active => {
                let doc = self
                    .store
                    .patch(Patch::new(existing.id.as_str()).set("active", false))
                    .await?;
                Ok(doc.deserialize()?)
            }
            _ => Err(ActionError::NotFound(NOT_SUBSCRIBED.to_string())),
        }
    }

    /// Deactivate an active subscription. The document is kept.
    #[instrument(skip(self))]
    pub async fn unsubscribe(&self, email: &str) -> ActionResult<Subscription> {
        let result = self.unsubscribe_inner(email).await;
        match &result {
            Ok(sub) => info!(id = %sub.id, "Newsletter subscription deactivated"),
            Err(e) if e.kind() == ErrorKind::Persistence => {
                error!(error = %e, "Newsletter unsubscribe failed")
            }
            Err(_) => {}
        }
        ActionResult::from_result(result, UNSUBSCRIBED)
    }

    /// Number of active subscriptions.
    pub(crate) async fn active_subscriber_count(&self) -> Result<usize, ActionError> {
        let query = Query::of_type(Subscription::DOC_TYPE).where_eq("active", true);
        Ok(self.store.count(&query).await?)
    }
}
