//! Admin login and the operations behind it.
//!
//! Every operation except [`Shop::admin_login`] takes the session token from
//! a previous login and fails with an unauthorized result without it.

use crate::error::ErrorKind;
use crate::shop::ADMIN_ORDERS_KEY;
use crate::{ActionError, ActionResult, Shop};
use bazaar_auth::AdminSession;
use bazaar_commerce::catalog::{Product, SaleProduct};
use bazaar_commerce::checkout::{Order, OrderStatus};
use bazaar_commerce::contact::{ContactMessage, MessageStatus};
use bazaar_commerce::dashboard::DashboardSummary;
use bazaar_commerce::FieldErrors;
use bazaar_store::{Document, DocumentStore, DocumentStoreExt, Patch, Query};
use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

fn report<T>(result: Result<T, ActionError>, what: &str) -> Result<T, ActionError> {
    match &result {
        Err(e) if e.kind() == ErrorKind::Persistence => error!(error = %e, "Failed to {}", what),
        Err(e) if e.kind() == ErrorKind::Unauthorized => warn!(error = %e, "Rejected admin request"),
        _ => {}
    }
    result
}

impl Shop {
    /// Fetch a document only if it has the expected `_type`.
    async fn get_of_type(
        &self,
        id: &str,
        doc_type: &str,
    ) -> Result<Option<Document>, ActionError> {
        Ok(self
            .store
            .get(id)
            .await?
            .filter(|doc| doc.doc_type() == Some(doc_type)))
    }

    /// Check the admin password and start a session.
    #[instrument(skip_all)]
    pub fn admin_login(&self, password: &str) -> ActionResult<AdminSession> {
        let result = self.auth.login(password).map_err(ActionError::from);
        ActionResult::from_result(report(result, "start admin session"), "Logged in")
    }

    /// End a session.
    #[instrument(skip_all)]
    pub fn admin_logout(&self, token: &str) -> ActionResult<bool> {
        let result = self.auth.logout(token).map_err(ActionError::from);
        let message = match &result {
            Ok(true) => "Logged out",
            _ => "No active session",
        };
        ActionResult::from_result(report(result, "end admin session"), message)
    }

    fn authorize(&self, token: Option<&str>) -> Result<AdminSession, ActionError> {
        Ok(self.auth.authorize(token)?)
    }

    async fn all_orders(&self) -> Result<Vec<Order>, ActionError> {
        let query = Query::of_type(Order::DOC_TYPE).order_desc("placed_at");
        Ok(self.store.query_as(&query).await?)
    }

    async fn orders_inner(&self, token: Option<&str>) -> Result<Vec<Order>, ActionError> {
        self.authorize(token)?;

        if let Some(orders) = self.cache.get::<Vec<Order>>(ADMIN_ORDERS_KEY)? {
            debug!(count = orders.len(), "Orders served from cache");
            return Ok(orders);
        }

        let orders = self.all_orders().await?;
        self.cache
            .set_with_ttl(ADMIN_ORDERS_KEY, &orders, self.settings.cache.orders_ttl())?;
        Ok(orders)
    }

    /// All orders, newest first.
    #[instrument(skip_all)]
    pub async fn list_orders(&self, token: Option<&str>) -> ActionResult<Vec<Order>> {
        let result = report(self.orders_inner(token).await, "list orders");
        let count = result.as_ref().map(Vec::len).unwrap_or_default();
        ActionResult::from_result(result, format!("{} orders", count))
    }

    async fn update_status_inner(
        &self,
        token: Option<&str>,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<Order, ActionError> {
        self.authorize(token)?;

        let order: Order = self
            .get_of_type(order_id, Order::DOC_TYPE)
            .await?
            .ok_or_else(|| ActionError::NotFound(format!("Order {} not found", order_id)))?
            .deserialize()?;

        if let Err(e) = order.status.check_transition(status) {
            let mut errors = FieldErrors::new();
            errors.add("status", e.to_string());
            return Err(errors.into());
        }

        let doc = self
            .store
            .patch(Patch::new(order_id).set("status", status.as_str()))
            .await?;
        self.invalidate_orders();

        info!(
            order_number = %order.order_number,
            from = order.status.as_str(),
            to = status.as_str(),
            "Order status changed"
        );
        Ok(doc.deserialize()?)
    }

    /// Move an order to a new status.
    #[instrument(skip(self, token), fields(status = status.as_str()))]
    pub async fn update_order_status(
        &self,
        token: Option<&str>,
        order_id: &str,
        status: OrderStatus,
    ) -> ActionResult<Order> {
        let result = report(
            self.update_status_inner(token, order_id, status).await,
            "update order status",
        );
        ActionResult::from_result(result, format!("Order marked {}", status.display_name()))
    }

    async fn messages_inner(&self, token: Option<&str>) -> Result<Vec<ContactMessage>, ActionError> {
        self.authorize(token)?;
        let query = Query::of_type(ContactMessage::DOC_TYPE).order_desc("sent_at");
        Ok(self.store.query_as(&query).await?)
    }

    /// Contact messages, newest first.
    #[instrument(skip_all)]
    pub async fn list_messages(&self, token: Option<&str>) -> ActionResult<Vec<ContactMessage>> {
        let result = report(self.messages_inner(token).await, "list messages");
        let count = result.as_ref().map(Vec::len).unwrap_or_default();
        ActionResult::from_result(result, format!("{} messages", count))
    }

    async fn mark_message_inner(
        &self,
        token: Option<&str>,
        message_id: &str,
        status: MessageStatus,
    ) -> Result<ContactMessage, ActionError> {
        self.authorize(token)?;

        if self
            .get_of_type(message_id, ContactMessage::DOC_TYPE)
            .await?
            .is_none()
        {
            return Err(ActionError::NotFound(format!(
                "Message {} not found",
                message_id
            )));
        }
        let doc = self
            .store
            .patch(Patch::new(message_id).set("status", status.as_str()))
            .await?;
        Ok(doc.deserialize()?)
    }

    /// Set a contact message's handling status.
    #[instrument(skip(self, token), fields(status = status.as_str()))]
    pub async fn mark_message(
        &self,
        token: Option<&str>,
        message_id: &str,
        status: MessageStatus,
    ) -> ActionResult<ContactMessage> {
        let result = report(
            self.mark_message_inner(token, message_id, status).await,
            "update message status",
        );
        ActionResult::from_result(result, format!("Message marked {}", status.as_str()))
    }

    async fn dashboard_inner(&self, token: Option<&str>) -> Result<DashboardSummary, ActionError> {
        self.authorize(token)?;

        let orders = self.all_orders().await?;
        let products = self.store.count(&Query::of_type(Product::DOC_TYPE)).await?
            + self.store.count(&Query::of_type(SaleProduct::DOC_TYPE)).await?;
        let subscribers = self.active_subscriber_count().await?;

        Ok(DashboardSummary::compute(&orders, products, subscribers, Utc::now()))
    }

    /// Headline figures and the monthly sales chart.
    #[instrument(skip_all)]
    pub async fn dashboard(&self, token: Option<&str>) -> ActionResult<DashboardSummary> {
        let result = report(self.dashboard_inner(token).await, "build dashboard");
        ActionResult::from_result(result, "Dashboard")
    }
}
