//! Request-level actions for the Bazaar storefront.
//!
//! Each action is a method on [`Shop`] and returns an [`ActionResult`]:
//! validation problems come back as per-field messages before anything is
//! written, and store failures are logged and returned as a failure with the
//! underlying message attached. Nothing is retried.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_actions::{Settings, Shop};
//!
//! let shop = Shop::open(Settings::load("bazaar.toml")?).await?;
//!
//! let result = shop.subscribe("a@b.com").await;
//! assert!(result.success);
//!
//! let again = shop.subscribe("a@b.com").await;
//! assert_eq!(again.message, "This email is already subscribed");
//! ```

mod admin;
mod catalog;
mod contact;
mod error;
mod newsletter;
mod orders;
mod result;
mod settings;
mod shop;

pub use catalog::CatalogSeed;
pub use contact::MESSAGE_SENT;
pub use error::{ActionError, ErrorKind};
pub use newsletter::{ALREADY_SUBSCRIBED, NOT_SUBSCRIBED, REACTIVATED, SUBSCRIBED, UNSUBSCRIBED};
pub use orders::PlacedOrder;
pub use result::ActionResult;
pub use settings::{
    AdminSettings, CacheSettings, OrderSettings, Settings, StoreBackend, StoreSettings,
    STORE_TOKEN_ENV,
};
pub use shop::{Shop, ADMIN_ORDERS_KEY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{ActionError, ActionResult, CatalogSeed, ErrorKind, PlacedOrder, Settings, Shop};
}
