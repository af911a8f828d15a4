//! Shared fixtures for the action tests.

#![allow(dead_code)]

use bazaar_actions::{Settings, Shop};
use bazaar_cache::Cache;
use bazaar_commerce::catalog::{Product, SaleProduct};
use bazaar_commerce::checkout::{CheckoutForm, Customer, PaymentMethod};
use bazaar_commerce::Money;
use bazaar_store::{Document, DocumentStore, DocumentStoreExt, MemoryStore, Query};
use std::sync::Arc;

pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct Fixture {
    pub shop: Shop,
    pub store: Arc<MemoryStore>,
    pub cache: Cache,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(settings())
    }

    pub fn with_settings(settings: Settings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let cache = Cache::in_memory();
        let shop = Shop::new(store.clone(), cache.clone(), settings);
        Self { shop, store, cache }
    }

    pub async fn add_product(&self, product: Product) -> Product {
        self.store
            .create_as(Product::DOC_TYPE, &product)
            .await
            .unwrap();
        product
    }

    pub async fn add_sale_product(&self, product: SaleProduct) -> SaleProduct {
        self.store
            .create_as(SaleProduct::DOC_TYPE, &product)
            .await
            .unwrap();
        product
    }

    pub async fn inventory(&self, id: &str) -> i64 {
        let doc: Document = self.store.get(id).await.unwrap().unwrap();
        doc.get_i64("inventory").unwrap()
    }

    pub async fn count(&self, doc_type: &str) -> usize {
        self.store.count(&Query::of_type(doc_type)).await.unwrap()
    }

    pub fn login(&self) -> String {
        let result = self.shop.admin_login(ADMIN_PASSWORD);
        assert!(result.success, "{}", result.message);
        result.data.unwrap().token.to_string()
    }
}

/// Default settings with a known admin password.
pub fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.admin.password = Some(ADMIN_PASSWORD.to_string());
    settings
}

pub fn checkout_form() -> CheckoutForm {
    CheckoutForm {
        customer: Customer {
            full_name: "Ayesha Khan".into(),
            phone: "03001234567".into(),
            email: "ayesha@example.com".into(),
            address: "12 Mall Road".into(),
            city: "Lahore".into(),
            province: "Punjab".into(),
            postal_code: "54000".into(),
        },
        payment_method: PaymentMethod::Cod,
        payment_details: None,
    }
}

pub fn product(name: &str, rupees: i64, inventory: i64) -> Product {
    let slug = name.to_lowercase().replace(' ', "-");
    Product::new(name, "clothing", slug, Money::rupees(rupees)).with_inventory(inventory)
}
