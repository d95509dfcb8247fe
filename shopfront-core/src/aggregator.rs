use std::sync::Arc;

use serde::Deserialize;
use shopfront_catalog::{InventoryStatus, NewProduct, Product, ProductDetails};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::repository::{InventoryLookup, PricingEngine, ProductStore};
use crate::{RepositoryError, RepositoryResult};

/// How price and stock are fetched once the stored record is known
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentMode {
    /// Pricing, then inventory
    #[default]
    Sequential,
    /// Pricing and inventory together; the first failure cancels the other call
    Concurrent,
}

/// Assembles the full product view from the store, the pricing engine and
/// the inventory system.
///
/// Nothing is cached: price and stock are recomputed on every call, and a
/// failure from any collaborator fails the whole operation.
#[derive(Clone)]
pub struct ProductAggregator {
    store: Arc<dyn ProductStore>,
    pricing: Arc<dyn PricingEngine>,
    inventory: Arc<dyn InventoryLookup>,
    mode: EnrichmentMode,
}

impl ProductAggregator {
    pub fn new(
        store: Arc<dyn ProductStore>,
        pricing: Arc<dyn PricingEngine>,
        inventory: Arc<dyn InventoryLookup>,
    ) -> Self {
        Self {
            store,
            pricing,
            inventory,
            mode: EnrichmentMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: EnrichmentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> EnrichmentMode {
        self.mode
    }

    /// Persist a new product and return it priced and with current stock
    pub async fn create(&self, data: NewProduct) -> RepositoryResult<ProductDetails> {
        let product = self.store.create(data).await.map_err(|e| {
            warn!("Product store rejected create: {}", e);
            e
        })?;
        info!(product_id = %product.id, product_code = %product.product_code, "Product created");

        self.enrich(product).await
    }

    /// Fetch a product by id, priced and with current stock
    pub async fn get_details(&self, id: Uuid) -> RepositoryResult<ProductDetails> {
        let product = self.store.find_by_id(id).await.map_err(|e| {
            match &e {
                RepositoryError::NotFound(_) => debug!(product_id = %id, "Product not found"),
                _ => warn!(product_id = %id, "Product store lookup failed: {}", e),
            }
            e
        })?;

        self.enrich(product).await
    }

    async fn enrich(&self, product: Product) -> RepositoryResult<ProductDetails> {
        let id = product.id;

        let (price_cents, inventory) = match self.mode {
            EnrichmentMode::Sequential => {
                let price = self.price(id).await?;
                let status = self.stock(id).await?;
                (price, status)
            }
            EnrichmentMode::Concurrent => tokio::try_join!(self.price(id), self.stock(id))?,
        };

        debug!(product_id = %id, price_cents, ?inventory, "Product enriched");
        Ok(ProductDetails::new(product, price_cents, inventory))
    }

    async fn price(&self, id: Uuid) -> RepositoryResult<i64> {
        self.pricing.price_for(id).await.map_err(|e| {
            warn!(product_id = %id, "Pricing failed: {}", e);
            e
        })
    }

    async fn stock(&self, id: Uuid) -> RepositoryResult<InventoryStatus> {
        self.inventory.status_for(id).await.map_err(|e| {
            warn!(product_id = %id, "Inventory lookup failed: {}", e);
            e
        })
    }
}
