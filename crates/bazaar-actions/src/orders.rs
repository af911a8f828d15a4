//! Order placement.
//!
//! By default placement is two writes: the order document is created, then
//! every referenced item's inventory is decremented in one transaction. If
//! the second write fails the order stays recorded and the result says
//! inventory was not updated. With `orders.atomic_placement` both writes go
//! into a single transaction instead.

use crate::error::ErrorKind;
use crate::{ActionError, ActionResult, Shop};
use bazaar_commerce::checkout::{Cart, CheckoutForm, Order};
use bazaar_commerce::{Money, OrderId};
use bazaar_store::{Document, DocumentStore, DocumentStoreExt, Patch, Transaction};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

/// Inventory field on catalog documents.
const INVENTORY_FIELD: &str = "inventory";

/// What the shopper gets back after checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub order_number: String,
    pub total_amount: Money,
    /// False when the order was recorded but the stock decrement failed.
    pub inventory_updated: bool,
}

impl PlacedOrder {
    fn new(order: &Order, inventory_updated: bool) -> Self {
        Self {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            total_amount: order.total_amount,
            inventory_updated,
        }
    }
}

/// One `dec inventory` patch per distinct ordered item.
fn decrement_patches(order: &Order) -> Vec<Patch> {
    order
        .inventory_decrements()
        .into_iter()
        .map(|d| Patch::new(d.item_id.as_str()).dec(INVENTORY_FIELD, d.quantity))
        .collect()
}

/// Placement does not check stock, so counts can go below zero. Say so.
fn warn_on_negative_inventory(docs: &[Document]) {
    for doc in docs {
        if let Some(inventory) = doc.get_i64(INVENTORY_FIELD).filter(|n| *n < 0) {
            warn!(
                item = doc.id().unwrap_or_default(),
                inventory, "Inventory is below zero after order"
            );
        }
    }
}

impl Shop {
    /// Validate the checkout, record the order and decrement inventory.
    #[instrument(skip_all, fields(lines = cart.lines.len(), atomic = self.settings.orders.atomic_placement))]
    pub async fn place_order(&self, form: &CheckoutForm, cart: &Cart) -> ActionResult<PlacedOrder> {
        let shipping_fee = self.settings.orders.shipping_fee();
        let order = match Order::place(form, cart, shipping_fee, Utc::now()) {
            Ok(order) => order,
            Err(e) => {
                debug!(error = %e, "Checkout rejected");
                return ActionError::from(e).into();
            }
        };

        let doc = match Document::from_value(Order::DOC_TYPE, &order) {
            Ok(doc) => doc,
            Err(e) => return ActionError::from(e).into(),
        };

        if self.settings.orders.atomic_placement {
            self.place_atomically(&order, doc).await
        } else {
            self.place_in_two_steps(&order, doc).await
        }
    }

    async fn place_in_two_steps(&self, order: &Order, doc: Document) -> ActionResult<PlacedOrder> {
        if let Err(e) = self.store.create(doc).await {
            error!(order_number = %order.order_number, error = %e, "Failed to record order");
            return ActionResult::failure(
                ErrorKind::Persistence,
                format!("Failed to place order: {}", e),
            );
        }
        self.invalidate_orders();
        info!(
            order_number = %order.order_number,
            total = %order.total_amount,
            "Order recorded"
        );

        let tx = decrement_patches(order)
            .into_iter()
            .fold(Transaction::new(), Transaction::patch);

        match self.store.commit(tx).await {
            Ok(updated) => {
                warn_on_negative_inventory(&updated);
                ActionResult::ok(
                    format!("Order {} placed successfully", order.order_number),
                    PlacedOrder::new(order, true),
                )
            }
            Err(e) => {
                error!(
                    order_number = %order.order_number,
                    error = %e,
                    "Order recorded but inventory decrement failed"
                );
                ActionResult::failure(
                    ErrorKind::Persistence,
                    format!(
                        "Order {} was recorded but inventory was not updated: {}",
                        order.order_number, e
                    ),
                )
                .with_data(PlacedOrder::new(order, false))
            }
        }
    }

    async fn place_atomically(&self, order: &Order, doc: Document) -> ActionResult<PlacedOrder> {
        let tx = decrement_patches(order)
            .into_iter()
            .fold(Transaction::new().create(doc), Transaction::patch);

        match self.store.commit(tx).await {
            Ok(written) => {
                warn_on_negative_inventory(written.get(1..).unwrap_or_default());
                self.invalidate_orders();
                info!(
                    order_number = %order.order_number,
                    total = %order.total_amount,
                    "Order recorded with inventory"
                );
                ActionResult::ok(
                    format!("Order {} placed successfully", order.order_number),
                    PlacedOrder::new(order, true),
                )
            }
            Err(e) => {
                error!(order_number = %order.order_number, error = %e, "Failed to place order");
                ActionResult::failure(
                    ErrorKind::Persistence,
                    format!("Failed to place order: {}", e),
                )
            }
        }
    }
}
