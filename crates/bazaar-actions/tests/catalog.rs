mod common;

use bazaar_actions::{CatalogSeed, ErrorKind};
use bazaar_commerce::catalog::{Product, ProductStatus, SaleProduct};
use bazaar_commerce::Money;
use chrono::{Duration, Utc};
use common::{product, Fixture};

#[tokio::test]
async fn drafts_are_hidden_and_products_sorted_by_name() {
    let fx = Fixture::new();
    fx.add_product(product("Waistcoat", 3000, 2)).await;
    fx.add_product(product("Dupatta", 900, 0)).await;
    let mut draft = product("Achkan", 9000, 1);
    draft.status = ProductStatus::Draft;
    fx.add_product(draft).await;
    let mut sold_out = product("Kurta", 1500, 0);
    sold_out.status = ProductStatus::OutOfStock;
    fx.add_product(sold_out).await;

    let result = fx.shop.list_products(None).await;

    assert!(result.success);
    let names: Vec<String> = result.data.unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Dupatta", "Kurta", "Waistcoat"]);
}

#[tokio::test]
async fn products_filter_by_category() {
    let fx = Fixture::new();
    fx.add_product(product("Shirt", 500, 1)).await;
    fx.add_product(Product::new("Ring", "jewellery", "ring", Money::rupees(2500)))
        .await;

    let jewellery = fx.shop.list_products(Some("jewellery")).await.data.unwrap();
    assert_eq!(jewellery.len(), 1);
    assert_eq!(jewellery[0].name, "Ring");

    let none = fx.shop.list_products(Some("shoes")).await;
    assert!(none.success);
    assert!(none.data.unwrap().is_empty());
}

#[tokio::test]
async fn product_lookup_by_slug() {
    let fx = Fixture::new();
    fx.add_product(product("Silk Shirt", 500, 1)).await;
    let mut draft = product("Hidden", 100, 1);
    draft.status = ProductStatus::Draft;
    fx.add_product(draft).await;

    let found = fx.shop.product_by_slug("silk-shirt").await;
    assert!(found.success);
    assert_eq!(found.data.unwrap().name, "Silk Shirt");

    let missing = fx.shop.product_by_slug("nope").await;
    assert_eq!(missing.error, Some(ErrorKind::NotFound));

    let hidden = fx.shop.product_by_slug("hidden").await;
    assert_eq!(hidden.error, Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn sale_listing_carries_prices_and_skips_ended_sales() {
    let fx = Fixture::new();
    let now = Utc::now();
    fx.add_sale_product(
        SaleProduct::new("Shawl", "women", "shawl", Money::rupees(2000), 25)
            .unwrap()
            .ending_at(now + Duration::days(3)),
    )
    .await;
    fx.add_sale_product(
        SaleProduct::new("Clutch", "women", "clutch", Money::rupees(1000), 10).unwrap(),
    )
    .await;
    fx.add_sale_product(
        SaleProduct::new("Old Stock", "men", "old-stock", Money::rupees(800), 50)
            .unwrap()
            .ending_at(now - Duration::hours(1)),
    )
    .await;

    let listings = fx.shop.list_sale_products().await.data.unwrap();

    let names: Vec<&str> = listings.iter().map(|l| l.product.name.as_str()).collect();
    assert_eq!(names, vec!["Clutch", "Shawl"]);
    let shawl = &listings[1];
    assert_eq!(shawl.current_price, Money::rupees(1500));
    assert_eq!(shawl.savings, Money::rupees(500));

    let ended = fx.shop.sale_product_by_slug("old-stock").await;
    assert!(ended.success);
    assert_eq!(ended.data.unwrap().current_price, Money::rupees(400));

    let missing = fx.shop.sale_product_by_slug("nothing").await;
    assert_eq!(missing.error, Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn seed_creates_every_item() {
    let fx = Fixture::new();
    let seed = CatalogSeed {
        products: vec![product("Shirt", 500, 3), product("Cap", 300, 3)],
        sale_products: vec![
            SaleProduct::new("Scarf", "women", "scarf", Money::rupees(1000), 30).unwrap(),
        ],
    };

    let result = fx.shop.seed_catalog(&seed).await;

    assert!(result.success, "{}", result.message);
    assert_eq!(result.data, Some(3));
    assert_eq!(fx.count(Product::DOC_TYPE).await, 2);
    assert_eq!(fx.count(SaleProduct::DOC_TYPE).await, 1);
}

#[tokio::test]
async fn seeding_a_duplicate_id_writes_nothing() {
    let fx = Fixture::new();
    let existing = fx.add_product(product("Shirt", 500, 3)).await;
    let seed = CatalogSeed {
        products: vec![product("Cap", 300, 3), existing],
        sale_products: Vec::new(),
    };

    let result = fx.shop.seed_catalog(&seed).await;

    assert!(!result.success);
    assert_eq!(fx.count(Product::DOC_TYPE).await, 1);
}

#[tokio::test]
async fn empty_seed_is_a_no_op() {
    let fx = Fixture::new();

    let result = fx.shop.seed_catalog(&CatalogSeed::default()).await;

    assert!(result.success);
    assert_eq!(result.data, Some(0));
}
