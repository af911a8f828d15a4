//! Cart lines submitted at checkout.

use crate::catalog::{ItemKind, Product, SaleProduct};
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One product-and-quantity entry in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Referenced product or sale product.
    pub item_id: ProductId,
    #[serde(default)]
    pub kind: ItemKind,
    pub name: String,
    pub quantity: i64,
    /// Listed unit price.
    pub price: Money,
    /// Unit price after a sale discount, when the item is on sale.
    #[serde(default)]
    pub discounted_price: Option<Money>,
    /// Chosen color, if the item offers several.
    #[serde(default)]
    pub color: Option<String>,
}

impl CartLine {
    /// Line for a regular product.
    pub fn product(product: &Product, quantity: i64) -> Self {
        Self {
            item_id: product.id.clone(),
            kind: ItemKind::Product,
            name: product.name.clone(),
            quantity,
            price: product.price,
            discounted_price: None,
            color: None,
        }
    }

    /// Line for a sale product, charged at its current price.
    pub fn sale(product: &SaleProduct, quantity: i64) -> Self {
        Self {
            item_id: product.id.clone(),
            kind: ItemKind::SaleProduct,
            name: product.name.clone(),
            quantity,
            price: product.price,
            discounted_price: Some(product.current_price()),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Unit price actually charged.
    pub fn unit_charge(&self) -> Money {
        self.discounted_price.unwrap_or(self.price)
    }

    /// Charged unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.unit_charge() * self.quantity
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, merging with an existing line for the same item and color.
    pub fn add(&mut self, line: CartLine) {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.item_id == line.item_id && l.kind == line.kind && l.color == line.color)
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        let mut cart = Cart::new();
        for line in iter {
            cart.add(line);
        }
        cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtotal_uses_discounted_price() {
        let product = Product::new("Kurta", "men", "kurta", Money::rupees(500));
        let sale = SaleProduct::new("Shawl", "women", "shawl", Money::rupees(400), 25).unwrap();

        let cart: Cart = vec![CartLine::product(&product, 2), CartLine::sale(&sale, 1)]
            .into_iter()
            .collect();

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Money::rupees(1000 + 300));
    }

    #[test]
    fn test_add_merges_same_item() {
        let product = Product::new("Kurta", "men", "kurta", Money::rupees(500));
        let mut cart = Cart::new();
        cart.add(CartLine::product(&product, 1));
        cart.add(CartLine::product(&product, 2));
        cart.add(CartLine::product(&product, 1).with_color("red"));

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.lines[0].quantity, 3);
    }
}
