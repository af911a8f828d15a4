//! On-sale products and discount arithmetic.

use crate::catalog::ProductStatus;
use crate::ids::ProductId;
use crate::money::Money;
use crate::promo::Countdown;
use crate::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A product listed in the sale section with a percentage discount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    pub category: String,
    /// Price before the discount.
    pub price: Money,
    /// Discount in whole percent, 0..=100.
    pub discount_percent: u8,
    pub inventory: i64,
    #[serde(default)]
    pub colors: BTreeSet<String>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// When the sale ends; drives the storefront countdown.
    #[serde(default)]
    pub sale_ends_at: Option<DateTime<Utc>>,
}

impl SaleProduct {
    /// Document type in the content store.
    pub const DOC_TYPE: &'static str = "saleProduct";

    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        slug: impl Into<String>,
        price: Money,
        discount_percent: u8,
    ) -> Result<Self, CommerceError> {
        if discount_percent > 100 {
            return Err(CommerceError::InvalidDiscount(discount_percent));
        }
        Ok(Self {
            id: ProductId::generate(),
            name: name.into(),
            category: category.into(),
            price,
            discount_percent,
            inventory: 0,
            colors: BTreeSet::new(),
            status: ProductStatus::Active,
            image: None,
            images: Vec::new(),
            slug: slug.into(),
            description: None,
            sale_ends_at: None,
        })
    }

    pub fn with_inventory(mut self, inventory: i64) -> Self {
        self.inventory = inventory;
        self
    }

    pub fn ending_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.sale_ends_at = Some(ends_at);
        self
    }

    /// Price after the discount, rounded to the nearest paisa.
    pub fn current_price(&self) -> Money {
        self.price.percent_off(self.discount_percent)
    }

    /// Amount the customer saves per unit.
    pub fn savings(&self) -> Money {
        self.price - self.current_price()
    }

    pub fn is_listed(&self) -> bool {
        self.status != ProductStatus::Draft
    }

    /// The sale is over once its end time has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.sale_ends_at.map(|end| end <= now).unwrap_or(false)
    }

    /// Time left in the sale, for sales with an end time.
    pub fn countdown(&self, now: DateTime<Utc>) -> Option<Countdown> {
        self.sale_ends_at.map(|end| Countdown::until(end, now))
    }
}

/// A sale product together with its derived prices, as served to the storefront.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleListing {
    #[serde(flatten)]
    pub product: SaleProduct,
    pub current_price: Money,
    pub savings: Money,
}

impl From<SaleProduct> for SaleListing {
    fn from(product: SaleProduct) -> Self {
        Self {
            current_price: product.current_price(),
            savings: product.savings(),
            product,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_current_price() {
        let sale = SaleProduct::new("Lawn", "women", "lawn", Money::rupees(2000), 25).unwrap();
        assert_eq!(sale.current_price(), Money::rupees(1500));
        assert_eq!(sale.savings(), Money::rupees(500));
    }

    #[test]
    fn test_invalid_discount_rejected() {
        let result = SaleProduct::new("Lawn", "women", "lawn", Money::rupees(2000), 101);
        assert!(matches!(result, Err(CommerceError::InvalidDiscount(101))));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let sale = SaleProduct::new("Lawn", "women", "lawn", Money::rupees(2000), 10)
            .unwrap()
            .ending_at(now + Duration::hours(1));
        assert!(!sale.is_expired(now));
        assert!(sale.is_expired(now + Duration::hours(2)));
    }

    #[test]
    fn test_countdown_to_sale_end() {
        let now = Utc::now();
        let open = SaleProduct::new("Lawn", "women", "lawn", Money::rupees(2000), 10).unwrap();
        assert_eq!(open.countdown(now), None);

        let ending = open.ending_at(now + Duration::hours(26) + Duration::seconds(7));
        let left = ending.countdown(now).unwrap();
        assert_eq!(left.display(), "01:02:00:07");
        assert!(ending.countdown(now + Duration::days(2)).unwrap().is_finished());
    }

    #[test]
    fn test_listing_flattens_product() {
        let sale = SaleProduct::new("Lawn", "women", "lawn", Money::rupees(1000), 10).unwrap();
        let json = serde_json::to_value(SaleListing::from(sale)).unwrap();
        assert_eq!(json["name"], "Lawn");
        assert_eq!(json["current_price"], 90_000);
        assert_eq!(json["savings"], 10_000);
    }
}
