use async_trait::async_trait;
use uuid::Uuid;
use shopfront_catalog::{InventoryStatus, NewProduct, Product, StockMovement};

use crate::RepositoryResult;

/// Persistence of product records
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Validate and persist a new product under a freshly assigned id
    async fn create(&self, data: NewProduct) -> RepositoryResult<Product>;

    /// Fails with `NotFound` when no product has this id
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Product>;
}

/// Stock status from the external inventory system
#[async_trait]
pub trait InventoryLookup: Send + Sync {
    async fn status_for(&self, product_id: Uuid) -> RepositoryResult<InventoryStatus>;
}

/// Current selling price from business rules, in cents
#[async_trait]
pub trait PricingEngine: Send + Sync {
    async fn price_for(&self, product_id: Uuid) -> RepositoryResult<i64>;
}

/// Write side of the inventory system: records warehouse movements
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Apply a movement and return the resulting status
    async fn apply(&self, product_id: Uuid, movement: StockMovement) -> RepositoryResult<InventoryStatus>;
}
