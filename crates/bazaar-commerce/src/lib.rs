//! Storefront domain types and logic for Bazaar.
//!
//! This crate holds the documents the storefront reads and writes, and the
//! pure rules around them:
//!
//! - **Catalog**: products, on-sale products, discount arithmetic
//! - **Checkout**: cart lines, checkout form, order pricing and status
//! - **Contact / Newsletter**: form validation and stored documents
//! - **Promo / Dashboard**: countdown, carousel, sales chart figures
//!
//! Nothing here talks to the content store; see `bazaar-actions` for the
//! flows that persist these documents.
//!
//! # Example
//!
//! ```rust
//! use bazaar_commerce::prelude::*;
//! use chrono::Utc;
//!
//! let kurta = Product::new("Kurta", "men", "kurta", Money::rupees(500)).with_inventory(10);
//! let cap = Product::new("Cap", "men", "cap", Money::rupees(300)).with_inventory(10);
//! let cart: Cart = vec![CartLine::product(&kurta, 2), CartLine::product(&cap, 1)]
//!     .into_iter()
//!     .collect();
//!
//! let form = CheckoutForm {
//!     customer: Customer {
//!         full_name: "Ayesha Khan".into(),
//!         phone: "03001234567".into(),
//!         email: "ayesha@example.pk".into(),
//!         address: "12 Mall Road".into(),
//!         city: "Lahore".into(),
//!         province: "Punjab".into(),
//!         postal_code: "54000".into(),
//!     },
//!     payment_method: PaymentMethod::Cod,
//!     payment_details: None,
//! };
//!
//! let order = Order::place(&form, &cart, Money::rupees(200), Utc::now()).unwrap();
//! assert_eq!(order.total_amount, Money::rupees(1500));
//! ```

pub mod error;
pub mod ids;
pub mod money;
pub mod validation;

pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod dashboard;
pub mod newsletter;
pub mod promo;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;
pub use validation::FieldErrors;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;
    pub use crate::validation::{is_valid_email, FieldErrors};

    // Catalog
    pub use crate::catalog::{ItemKind, Product, ProductStatus, SaleListing, SaleProduct};

    // Checkout
    pub use crate::checkout::{
        Cart, CartLine, CheckoutForm, Customer, InventoryDecrement, Order, OrderLineItem,
        OrderStatus, PaymentDetails, PaymentMethod,
    };

    // Contact and newsletter
    pub use crate::contact::{ContactForm, ContactMessage, MessageStatus};
    pub use crate::newsletter::Subscription;

    // Promo and dashboard
    pub use crate::dashboard::{ChartBar, DashboardSummary, MonthlySales};
    pub use crate::promo::{Carousel, Countdown};
}
