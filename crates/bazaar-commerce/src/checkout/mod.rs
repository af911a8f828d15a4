//! Checkout: cart lines, the checkout form, and placed orders.

mod cart;
mod form;
mod order;

pub use cart::{Cart, CartLine};
pub use form::{CheckoutForm, Customer, PaymentDetails, PaymentMethod};
pub use order::{InventoryDecrement, Order, OrderLineItem, OrderStatus, MAX_QUANTITY_PER_LINE};
