//! Product types.

use crate::ids::ProductId;
use crate::money::Money;
use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Product status in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// Visible and purchasable.
    #[default]
    Active,
    /// Hidden from listings, data preserved.
    Draft,
    /// Listed but flagged as unavailable.
    OutOfStock,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Active => "active",
            ProductStatus::Draft => "draft",
            ProductStatus::OutOfStock => "out_of_stock",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CommerceError> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ProductStatus::Active),
            "draft" => Ok(ProductStatus::Draft),
            "out_of_stock" => Ok(ProductStatus::OutOfStock),
            _ => Err(CommerceError::UnknownValue {
                kind: "product status",
                value: s.to_string(),
            }),
        }
    }
}

/// A regular catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Money,
    /// Units in stock. Order placement decrements this without a floor.
    pub inventory: i64,
    #[serde(default)]
    pub colors: BTreeSet<String>,
    #[serde(default)]
    pub status: ProductStatus,
    /// Primary image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Gallery images, rotated by the product carousel.
    #[serde(default)]
    pub images: Vec<String>,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// Document type in the content store.
    pub const DOC_TYPE: &'static str = "product";

    /// Create an active product with no stock.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id: ProductId::generate(),
            name: name.into(),
            category: category.into(),
            price,
            inventory: 0,
            colors: BTreeSet::new(),
            status: ProductStatus::Active,
            image: None,
            images: Vec::new(),
            slug: slug.into(),
            description: None,
        }
    }

    pub fn with_inventory(mut self, inventory: i64) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn with_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// Listed in the storefront.
    pub fn is_listed(&self) -> bool {
        self.status != ProductStatus::Draft
    }

    pub fn in_stock(&self) -> bool {
        self.status == ProductStatus::Active && self.inventory > 0
    }

    /// Image list for the gallery: the primary image first, then the rest.
    pub fn gallery(&self) -> Vec<String> {
        let mut gallery: Vec<String> = self.image.iter().cloned().collect();
        for image in &self.images {
            if !gallery.contains(image) {
                gallery.push(image.clone());
            }
        }
        gallery
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_document_shape() {
        let product = Product::new("Lawn Suit", "women", "lawn-suit", Money::rupees(2500))
            .with_inventory(4)
            .with_colors(["red", "blue", "red"]);
        let json = serde_json::to_value(&product).unwrap();

        assert!(json["_id"].as_str().unwrap().starts_with("product-"));
        assert_eq!(json["price"], 250_000);
        assert_eq!(json["status"], "active");
        assert_eq!(json["colors"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_product_from_sparse_document() {
        let json = serde_json::json!({
            "_id": "p1",
            "_type": "product",
            "name": "Kurta",
            "category": "men",
            "price": 150000,
            "inventory": 3,
            "slug": "kurta"
        });
        let product: Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.status, ProductStatus::Active);
        assert!(product.colors.is_empty());
        assert!(product.in_stock());
    }

    #[test]
    fn test_gallery_deduplicates_primary() {
        let mut product = Product::new("Shawl", "women", "shawl", Money::rupees(900));
        product.image = Some("a.jpg".into());
        product.images = vec!["a.jpg".into(), "b.jpg".into()];
        assert_eq!(product.gallery(), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ProductStatus::parse("Draft").unwrap(), ProductStatus::Draft);
        assert!(ProductStatus::parse("gone").is_err());
    }
}
