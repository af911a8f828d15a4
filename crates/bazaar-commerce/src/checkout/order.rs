//! Order types.

use crate::catalog::ItemKind;
use crate::checkout::{Cart, CartLine, CheckoutForm, Customer, PaymentDetails, PaymentMethod};
use crate::ids::{OrderId, ProductId, Reference};
use crate::money::Money;
use crate::validation::FieldErrors;
use crate::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest quantity a single order line may carry.
pub const MAX_QUANTITY_PER_LINE: i64 = 9999;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed, awaiting processing.
    #[default]
    Pending,
    /// Order being prepared.
    Processing,
    /// Order handed to the courier.
    Shipped,
    /// Order delivered.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CommerceError> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            _ => Err(CommerceError::UnknownValue {
                kind: "order status",
                value: s.to_string(),
            }),
        }
    }

    /// Position along the fulfilment pipeline.
    fn stage(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Processing => Some(1),
            OrderStatus::Shipped => Some(2),
            OrderStatus::Delivered => Some(3),
            OrderStatus::Cancelled => None,
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Forward moves along the pipeline, or cancellation before delivery.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self.stage(), next.stage()) {
            (_, None) => true,
            (Some(from), Some(to)) => to > from,
            (None, Some(_)) => false,
        }
    }

    pub fn check_transition(&self, next: OrderStatus) -> Result<(), CommerceError> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(CommerceError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: next.as_str().to_string(),
            })
        }
    }
}

/// A line item in an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    /// Array key, unique within the order.
    #[serde(rename = "_key")]
    pub key: String,
    /// Referenced product or sale product.
    pub item: Reference,
    #[serde(default)]
    pub kind: ItemKind,
    /// Product name at time of order.
    pub name: String,
    pub quantity: i64,
    /// Listed unit price at time of order.
    pub price: Money,
    /// Discounted unit price at time of order, if on sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl OrderLineItem {
    fn from_cart_line(index: usize, line: &CartLine) -> Self {
        Self {
            key: format!("line-{}", index),
            item: Reference::to(line.item_id.as_str()),
            kind: line.kind,
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
            discounted_price: line.discounted_price,
            color: line.color.clone(),
        }
    }

    /// Unit price the customer was charged.
    pub fn charged_price(&self) -> Money {
        self.discounted_price.unwrap_or(self.price)
    }

    pub fn line_total(&self) -> Money {
        self.charged_price() * self.quantity
    }
}

/// Inventory to remove from one catalog item because of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryDecrement {
    pub item_id: ProductId,
    pub kind: ItemKind,
    pub quantity: i64,
}

/// A placed order.
///
/// Only `status` changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    #[serde(flatten)]
    pub customer: Customer,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub total_amount: Money,
    pub items: Vec<OrderLineItem>,
    #[serde(default)]
    pub status: OrderStatus,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Document type in the content store.
    pub const DOC_TYPE: &'static str = "order";

    /// Validate the checkout and price it into a pending order.
    ///
    /// Every line is charged its discounted price when it has one; the total
    /// is the subtotal plus `shipping_fee`. Stock levels are not consulted.
    pub fn place(
        form: &CheckoutForm,
        cart: &Cart,
        shipping_fee: Money,
        now: DateTime<Utc>,
    ) -> Result<Order, CommerceError> {
        let mut errors = form.validate();
        validate_cart(cart, &mut errors);
        if shipping_fee.is_negative() {
            errors.add("shipping_fee", "Shipping fee cannot be negative");
        }
        errors.into_result()?;

        let items: Vec<OrderLineItem> = cart
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| OrderLineItem::from_cart_line(i, line))
            .collect();
        let subtotal = checked_subtotal(&items)?;
        let Some(total_amount) = subtotal.checked_add(shipping_fee) else {
            let mut errors = FieldErrors::new();
            errors.add("items", "Order total is too large");
            return Err(errors.into());
        };

        Ok(Order {
            id: OrderId::generate(),
            order_number: Self::generate_order_number(now),
            customer: form.customer.normalized(),
            payment_method: form.payment_method,
            payment_details: form.payment_details.clone(),
            subtotal,
            shipping_fee,
            total_amount,
            items,
            status: OrderStatus::Pending,
            placed_at: now,
        })
    }

    /// Generate an order number from the placement time plus a random suffix.
    pub fn generate_order_number(now: DateTime<Utc>) -> String {
        use rand::Rng;
        let suffix: u16 = rand::thread_rng().gen();
        format!("ORD-{}-{:04X}", now.timestamp(), suffix)
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Ordered quantity per referenced catalog item, in first-seen order.
    pub fn inventory_decrements(&self) -> Vec<InventoryDecrement> {
        let mut order: Vec<(String, ItemKind)> = Vec::new();
        let mut totals: BTreeMap<(String, ItemKind), i64> = BTreeMap::new();
        for item in &self.items {
            let key = (item.item.id.clone(), item.kind);
            if !totals.contains_key(&key) {
                order.push(key.clone());
            }
            *totals.entry(key).or_insert(0) += item.quantity;
        }
        order
            .into_iter()
            .map(|key| {
                let quantity = totals[&key];
                InventoryDecrement {
                    item_id: ProductId::new(key.0),
                    kind: key.1,
                    quantity,
                }
            })
            .collect()
    }

    /// Revenue counted on the dashboard: cancelled orders count as zero.
    pub fn counted_revenue(&self) -> Money {
        if self.status == OrderStatus::Cancelled {
            Money::zero()
        } else {
            self.total_amount
        }
    }
}

/// Sum line totals, reporting the first line whose total does not fit.
fn checked_subtotal(items: &[OrderLineItem]) -> Result<Money, CommerceError> {
    let mut subtotal = Money::zero();
    for (i, item) in items.iter().enumerate() {
        let total = item
            .charged_price()
            .checked_mul(item.quantity)
            .and_then(|line| subtotal.checked_add(line));
        match total {
            Some(total) => subtotal = total,
            None => {
                let mut errors = FieldErrors::new();
                errors.add(
                    format!("items[{}].quantity", i),
                    format!("Order total is too large at quantity {}", item.quantity),
                );
                return Err(errors.into());
            }
        }
    }
    Ok(subtotal)
}

fn validate_cart(cart: &Cart, errors: &mut FieldErrors) {
    if cart.is_empty() {
        errors.add("items", "Your cart is empty");
        return;
    }
    for (i, line) in cart.lines.iter().enumerate() {
        if line.quantity < 1 || line.quantity > MAX_QUANTITY_PER_LINE {
            errors.add(
                format!("items[{}].quantity", i),
                format!("Invalid quantity: {}", line.quantity),
            );
        }
        if line.price.is_negative() || line.discounted_price.map_or(false, |p| p.is_negative()) {
            errors.add(format!("items[{}].price", i), "Price cannot be negative");
        }
        if line.item_id.as_str().trim().is_empty() {
            errors.add(format!("items[{}].item_id", i), "Item reference is required");
        }
    }
}
