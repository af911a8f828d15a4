//! Catalog types: regular products and on-sale products.

mod product;
mod sale;

pub use product::{Product, ProductStatus};
pub use sale::{SaleListing, SaleProduct};

use serde::{Deserialize, Serialize};

/// Which catalog document a cart or order line refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Product,
    SaleProduct,
}

impl ItemKind {
    /// Document type of the referenced item.
    pub fn doc_type(&self) -> &'static str {
        match self {
            ItemKind::Product => Product::DOC_TYPE,
            ItemKind::SaleProduct => SaleProduct::DOC_TYPE,
        }
    }
}
