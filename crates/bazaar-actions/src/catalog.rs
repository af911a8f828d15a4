//! Catalog reads and seeding.

use crate::error::ErrorKind;
use crate::{ActionError, ActionResult, Shop};
use bazaar_commerce::catalog::{Product, SaleListing, SaleProduct};
use bazaar_store::{Document, DocumentStoreExt, Query, Transaction};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

/// Products and sale products to load into an empty store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub sale_products: Vec<SaleProduct>,
}

impl CatalogSeed {
    pub fn len(&self) -> usize {
        self.products.len() + self.sale_products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn log_failure<T>(result: Result<T, ActionError>, what: &str) -> Result<T, ActionError> {
    if let Err(e) = &result {
        if e.kind() == ErrorKind::Persistence {
            error!(error = %e, "Failed to {}", what);
        }
    }
    result
}

impl Shop {
    async fn products_inner(&self, category: Option<&str>) -> Result<Vec<Product>, ActionError> {
        let mut query = Query::of_type(Product::DOC_TYPE).order_asc("name");
        if let Some(category) = category {
            query = query.where_eq("category", category);
        }
        let products: Vec<Product> = self.store.query_as(&query).await?;
        Ok(products.into_iter().filter(Product::is_listed).collect())
    }

    /// Listed products, optionally in one category, by name.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<&str>) -> ActionResult<Vec<Product>> {
        let result = log_failure(self.products_inner(category).await, "list products");
        let count = result.as_ref().map(Vec::len).unwrap_or_default();
        ActionResult::from_result(result, format!("{} products", count))
    }

    async fn product_inner(&self, slug: &str) -> Result<Product, ActionError> {
        let query = Query::of_type(Product::DOC_TYPE).where_eq("slug", slug);
        self.store
            .query_optional::<Product>(&query)
            .await?
            .filter(Product::is_listed)
            .ok_or_else(|| ActionError::NotFound(format!("No product with slug {}", slug)))
    }

    /// One listed product by slug.
    #[instrument(skip(self))]
    pub async fn product_by_slug(&self, slug: &str) -> ActionResult<Product> {
        let result = log_failure(self.product_inner(slug).await, "load product");
        let message = match &result {
            Ok(product) => product.name.clone(),
            Err(_) => String::new(),
        };
        ActionResult::from_result(result, message)
    }

    async fn sale_products_inner(&self) -> Result<Vec<SaleListing>, ActionError> {
        let now = Utc::now();
        let query = Query::of_type(SaleProduct::DOC_TYPE).order_asc("name");
        let products: Vec<SaleProduct> = self.store.query_as(&query).await?;
        Ok(products
            .into_iter()
            .filter(|p| p.is_listed() && !p.is_expired(now))
            .map(SaleListing::from)
            .collect())
    }

    /// Sale products still on sale, with current prices and savings.
    #[instrument(skip(self))]
    pub async fn list_sale_products(&self) -> ActionResult<Vec<SaleListing>> {
        let result = log_failure(self.sale_products_inner().await, "list sale products");
        let count = result.as_ref().map(Vec::len).unwrap_or_default();
        ActionResult::from_result(result, format!("{} products on sale", count))
    }

    async fn sale_product_inner(&self, slug: &str) -> Result<SaleListing, ActionError> {
        let query = Query::of_type(SaleProduct::DOC_TYPE).where_eq("slug", slug);
        self.store
            .query_optional::<SaleProduct>(&query)
            .await?
            .filter(SaleProduct::is_listed)
            .map(SaleListing::from)
            .ok_or_else(|| ActionError::NotFound(format!("No sale product with slug {}", slug)))
    }

    /// One sale product by slug, including sales that have ended.
    #[instrument(skip(self))]
    pub async fn sale_product_by_slug(&self, slug: &str) -> ActionResult<SaleListing> {
        let result = log_failure(self.sale_product_inner(slug).await, "load sale product");
        let message = match &result {
            Ok(listing) => listing.product.name.clone(),
            Err(_) => String::new(),
        };
        ActionResult::from_result(result, message)
    }

    async fn seed_inner(&self, seed: &CatalogSeed) -> Result<usize, ActionError> {
        let mut tx = Transaction::new();
        for product in &seed.products {
            tx = tx.create(Document::from_value(Product::DOC_TYPE, product)?);
        }
        for product in &seed.sale_products {
            tx = tx.create(Document::from_value(SaleProduct::DOC_TYPE, product)?);
        }
        if tx.is_empty() {
            return Ok(0);
        }
        Ok(self.store.commit(tx).await?.len())
    }

    /// Create every product in `seed` in one transaction.
    #[instrument(skip_all, fields(items = seed.len()))]
    pub async fn seed_catalog(&self, seed: &CatalogSeed) -> ActionResult<usize> {
        let result = log_failure(self.seed_inner(seed).await, "seed catalog");
        if let Ok(created) = &result {
            info!(created, "Catalog seeded");
        }
        let count = result.as_ref().copied().unwrap_or_default();
        ActionResult::from_result(result, format!("Created {} catalog items", count))
    }
}
