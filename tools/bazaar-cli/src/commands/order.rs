//! Order placement.

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use bazaar_actions::Shop;
use bazaar_commerce::checkout::{Cart, CartLine, CheckoutForm};
use serde::Deserialize;

use super::{OrderArgs, OrderCommand};
use crate::context::Context;

/// An order file: the checkout form plus the items, referenced by slug.
///
/// ```json
/// {
///   "full_name": "Ayesha Khan", "phone": "03001234567",
///   "email": "ayesha@example.com", "address": "12 Mall Road",
///   "city": "Lahore", "province": "Punjab", "postal_code": "54000",
///   "payment_method": "cod",
///   "items": [{ "slug": "kurta", "quantity": 2, "color": "white" }]
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct OrderFile {
    #[serde(flatten)]
    pub checkout: CheckoutForm,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
pub struct OrderItem {
    pub slug: String,
    pub quantity: i64,
    #[serde(default)]
    pub color: Option<String>,
    /// The slug names a sale product.
    #[serde(default)]
    pub sale: bool,
}

/// Run the order command.
pub async fn run(args: OrderArgs, ctx: &Context) -> Result<()> {
    match args.command {
        OrderCommand::Place { file } => place(&file, ctx).await,
    }
}

pub fn read_order(path: &Path) -> Result<OrderFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read order file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse order file: {}", path.display()))
}

/// Look every item up in the catalog and build the cart.
async fn build_cart(shop: &Shop, items: &[OrderItem]) -> Result<Cart> {
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let line = if item.sale {
            match shop.sale_product_by_slug(&item.slug).await.into_data() {
                Some(listing) => CartLine::sale(&listing.product, item.quantity),
                None => bail!("No sale product with slug {}", item.slug),
            }
        } else {
            match shop.product_by_slug(&item.slug).await.into_data() {
                Some(product) => CartLine::product(&product, item.quantity),
                None => bail!("No product with slug {}", item.slug),
            }
        };
        lines.push(match &item.color {
            Some(color) => line.with_color(color.clone()),
            None => line,
        });
    }
    Ok(lines.into_iter().collect())
}

async fn place(file: &str, ctx: &Context) -> Result<()> {
    let order = read_order(&ctx.resolve_path(file))?;
    let shop = ctx.shop().await?;
    let cart = build_cart(&shop, &order.items).await?;
    ctx.output.debug(&format!(
        "{} line(s), subtotal {}",
        cart.lines.len(),
        cart.subtotal()
    ));

    let spinner = ctx.output.spinner("Placing order...");
    let result = shop.place_order(&order.checkout, &cart).await;
    spinner.finish_and_clear();

    if !result.success {
        if let Some(placed) = &result.data {
            ctx.output.warn(&format!(
                "Order {} exists in the store; fix inventory by hand",
                placed.order_number
            ));
        }
    }

    if let Some(placed) = ctx.output.action(result)? {
        ctx.output.kv("Order number", &placed.order_number);
        ctx.output.kv("Order id", placed.order_id.as_str());
        ctx.output.kv("Total", &placed.total_amount.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::checkout::PaymentMethod;

    #[test]
    fn test_parses_a_flat_order_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("order.json");
        std::fs::write(
            &path,
            r#"{
                "full_name": "Ayesha Khan",
                "phone": "03001234567",
                "email": "ayesha@example.com",
                "address": "12 Mall Road",
                "city": "Lahore",
                "province": "Punjab",
                "postal_code": "54000",
                "payment_method": "easypaisa",
                "payment_details": {"account_number": "0300", "transaction_id": "TX1"},
                "items": [
                    {"slug": "kurta", "quantity": 2, "color": "white"},
                    {"slug": "shawl", "quantity": 1, "sale": true}
                ]
            }"#,
        )
        .unwrap();

        let order = read_order(&path).unwrap();

        assert_eq!(order.checkout.customer.city, "Lahore");
        assert_eq!(order.checkout.payment_method, PaymentMethod::Easypaisa);
        assert!(order.checkout.payment_details.is_some());
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].color.as_deref(), Some("white"));
        assert!(order.items[1].sale);
    }
}
