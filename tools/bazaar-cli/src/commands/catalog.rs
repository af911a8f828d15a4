//! Catalog commands.

use std::path::Path;

use anyhow::{Context as _, Result};
use bazaar_actions::CatalogSeed;
use bazaar_commerce::catalog::{Product, SaleListing};
use chrono::{DateTime, Utc};

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CatalogCommand::Products { category } => list_products(category.as_deref(), ctx).await,
        CatalogCommand::Product { slug, sale: false } => show_product(&slug, ctx).await,
        CatalogCommand::Product { slug, sale: true } => show_sale_product(&slug, ctx).await,
        CatalogCommand::Sale => list_sale(ctx).await,
        CatalogCommand::Seed { file } => seed(&file, ctx).await,
    }
}

async fn list_products(category: Option<&str>, ctx: &Context) -> Result<()> {
    let shop = ctx.shop().await?;
    let result = shop.list_products(category).await;
    let products = ctx.output.action(result)?.unwrap_or_default();
    ctx.output.header(match category {
        Some(c) => format!("Products in {}", c),
        None => "Products".to_string(),
    }
    .as_str());

    let widths = [28, 20, 14, 8, 12];
    ctx.output
        .table_row(&["NAME", "SLUG", "PRICE", "STOCK", "STATUS"], &widths);
    for p in &products {
        ctx.output.table_row(
            &[
                &truncate(&p.name, 28),
                &truncate(&p.slug, 20),
                &p.price.to_string(),
                &p.inventory.to_string(),
                &status_badge(p.status.as_str()),
            ],
            &widths,
        );
    }
    Ok(())
}

fn print_product(product: &Product, ctx: &Context) {
    ctx.output.header(&product.name);
    ctx.output.kv("Slug", &product.slug);
    ctx.output.kv("Category", &product.category);
    ctx.output.kv("Price", &product.price.to_string());
    ctx.output.kv("Inventory", &product.inventory.to_string());
    ctx.output.kv("Status", &status_badge(product.status.as_str()));
    if !product.colors.is_empty() {
        let colors: Vec<&str> = product.colors.iter().map(String::as_str).collect();
        ctx.output.kv("Colors", &colors.join(", "));
    }
    if let Some(description) = &product.description {
        ctx.output.kv("Description", description);
    }
}

async fn show_product(slug: &str, ctx: &Context) -> Result<()> {
    let shop = ctx.shop().await?;
    let result = shop.product_by_slug(slug).await;
    if let Some(product) = ctx.output.action(result)? {
        print_product(&product, ctx);
    }
    Ok(())
}

/// Countdown cell for a listing: `DD:HH:MM:SS`, `ended`, or `-` without an end time.
fn ends_in(listing: &SaleListing, now: DateTime<Utc>) -> String {
    match listing.product.countdown(now) {
        Some(left) if left.is_finished() => "ended".to_string(),
        Some(left) => left.display(),
        None => "-".to_string(),
    }
}

fn print_listing(listing: &SaleListing, ctx: &Context) {
    let p = &listing.product;
    ctx.output.header(&p.name);
    ctx.output.kv("Slug", &p.slug);
    ctx.output.kv("Category", &p.category);
    ctx.output.kv("Price", &p.price.to_string());
    ctx.output.kv(
        "Sale price",
        &format!("{} ({}% off)", listing.current_price, p.discount_percent),
    );
    ctx.output.kv("You save", &listing.savings.to_string());
    ctx.output.kv("Inventory", &p.inventory.to_string());
    if let Some(ends) = p.sale_ends_at {
        ctx.output
            .kv("Sale ends", &ends.format("%Y-%m-%d %H:%M UTC").to_string());
        ctx.output.kv("Ends in", &ends_in(listing, Utc::now()));
    }
}

async fn show_sale_product(slug: &str, ctx: &Context) -> Result<()> {
    let shop = ctx.shop().await?;
    let result = shop.sale_product_by_slug(slug).await;
    if let Some(listing) = ctx.output.action(result)? {
        print_listing(&listing, ctx);
    }
    Ok(())
}

async fn list_sale(ctx: &Context) -> Result<()> {
    let shop = ctx.shop().await?;
    let result = shop.list_sale_products().await;
    let listings = ctx.output.action(result)?.unwrap_or_default();
    ctx.output.header("On sale");
    let widths = [28, 20, 14, 14, 6, 12];
    ctx.output
        .table_row(&["NAME", "SLUG", "WAS", "NOW", "OFF", "ENDS IN"], &widths);
    let now = Utc::now();
    for l in &listings {
        ctx.output.table_row(
            &[
                &truncate(&l.product.name, 28),
                &truncate(&l.product.slug, 20),
                &l.product.price.to_string(),
                &l.current_price.to_string(),
                &format!("{}%", l.product.discount_percent),
                &ends_in(l, now),
            ],
            &widths,
        );
    }
    Ok(())
}

/// Read a catalog seed from TOML or JSON.
pub fn read_seed(path: &Path) -> Result<CatalogSeed> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML seed: {}", path.display()))
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON seed: {}", path.display()))
    }
}

async fn seed(file: &str, ctx: &Context) -> Result<()> {
    let seed = read_seed(&ctx.resolve_path(file))?;
    ctx.output
        .debug(&format!("{} items in {}", seed.len(), file));

    let shop = ctx.shop().await?;
    let spinner = ctx.output.spinner("Seeding catalog...");
    let result = shop.seed_catalog(&seed).await;
    spinner.finish_and_clear();

    ctx.output.action(result)?;
    Ok(())
}
