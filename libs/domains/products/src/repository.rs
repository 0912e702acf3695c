use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;

/// Repository trait for Product persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product; an unassigned id (0) is filled in by the store
    async fn add(&self, product: Product) -> ProductResult<Product>;

    /// Overwrite every field of the product with `product.id`
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Delete a product by ID
    async fn remove(&self, id: i64) -> ProductResult<()>;

    /// All products, ascending by id
    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    /// Get a product by ID
    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<i64, Product>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self {
            products: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn add(&self, mut product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if product.is_unassigned() {
            // Skip ids a caller already claimed explicitly
            product.id = loop {
                let candidate = self
                    .next_id
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
                    .map_err(|_| ProductError::Internal("product id space exhausted".to_string()))?;
                if !products.contains_key(&candidate) {
                    break candidate;
                }
            };
        } else if products.contains_key(&product.id) {
            return Err(ProductError::Internal(format!(
                "duplicate key: product {} already exists",
                product.id
            )));
        } else {
            self.next_id
                .fetch_max(product.id.saturating_add(1), Ordering::SeqCst);
        }

        products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Added product");
        Ok(product)
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let stored = products
            .get_mut(&product.id)
            .ok_or(ProductError::NotFound(product.id))?;
        *stored = product.clone();

        tracing::info!(product_id = product.id, "Updated product");
        Ok(product)
    }

    async fn remove(&self, id: i64) -> ProductResult<()> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Removed product");
            Ok(())
        } else {
            Err(ProductError::NotFound(id))
        }
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }
}
