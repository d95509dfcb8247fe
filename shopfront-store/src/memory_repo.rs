use async_trait::async_trait;
use chrono::Utc;
use shopfront_catalog::{InventoryManager, InventoryStatus, NewProduct, Product, StockMovement};
use shopfront_core::{InventoryLookup, ProductStore, RepositoryError, RepositoryResult, StockLedger};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Product store kept in process memory; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, data: NewProduct) -> RepositoryResult<Product> {
        data.validate()?;

        let mut products = self.products.write().await;
        if products.values().any(|p| p.product_code == data.product_code) {
            return Err(RepositoryError::Validation("product_code already exists".to_string()));
        }

        let product = data.into_product(Uuid::new_v4(), Utc::now());
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Product> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }
}

/// Inventory lookup backed by an in-process stock ledger
pub struct InMemoryInventoryLookup {
    manager: RwLock<InventoryManager>,
    low_stock_threshold: i32,
}

impl InMemoryInventoryLookup {
    pub fn new(low_stock_threshold: i32) -> Self {
        Self {
            manager: RwLock::new(InventoryManager::new()),
            low_stock_threshold,
        }
    }
}

#[async_trait]
impl InventoryLookup for InMemoryInventoryLookup {
    async fn status_for(&self, product_id: Uuid) -> RepositoryResult<InventoryStatus> {
        let available = self.manager.read().await.available(&product_id);
        Ok(InventoryStatus::from_available(available, self.low_stock_threshold))
    }
}

#[async_trait]
impl StockLedger for InMemoryInventoryLookup {
    async fn apply(&self, product_id: Uuid, movement: StockMovement) -> RepositoryResult<InventoryStatus> {
        let mut manager = self.manager.write().await;
        manager.apply(product_id, movement)?;
        Ok(InventoryStatus::from_available(manager.available(&product_id), self.low_stock_threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_create_and_find() {
        let store = InMemoryProductStore::new();
        assert!(store.is_empty().await);

        let created = store
            .create(NewProduct::new("SKU-1", "Mug", 899).with_description("Stoneware, 350ml"))
            .await
            .unwrap();
        let found = store.find_by_id(created.id).await.unwrap();

        assert_eq!(found, created);
        assert_eq!(found.description.as_deref(), Some("Stoneware, 350ml"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_assigns_distinct_ids() {
        let store = InMemoryProductStore::new();
        let a = store.create(NewProduct::new("SKU-1", "Mug", 899)).await.unwrap();
        let b = store.create(NewProduct::new("SKU-2", "Plate", 1299)).await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_store_rejects_duplicates_and_invalid() {
        let store = InMemoryProductStore::new();
        store.create(NewProduct::new("SKU-1", "Mug", 899)).await.unwrap();

        let err = store.create(NewProduct::new("SKU-1", "Other Mug", 999)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));

        let err = store.create(NewProduct::new("SKU-3", "Bowl", -5)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_unknown_id() {
        let store = InMemoryProductStore::new();
        let id = Uuid::new_v4();

        let err = store.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_inventory_status_follows_ledger() {
        let lookup = InMemoryInventoryLookup::new(5);
        let product_id = Uuid::new_v4();

        assert_eq!(lookup.status_for(product_id).await.unwrap(), InventoryStatus::OutOfStock);

        let status = lookup.apply(product_id, StockMovement::Set { quantity: 20 }).await.unwrap();
        assert_eq!(status, InventoryStatus::InStock { available: 20 });
        assert_eq!(lookup.status_for(product_id).await.unwrap(), status);

        lookup.apply(product_id, StockMovement::Reserve { quantity: 16 }).await.unwrap();
        assert_eq!(
            lookup.status_for(product_id).await.unwrap(),
            InventoryStatus::LowStock { available: 4 }
        );

        lookup.apply(product_id, StockMovement::Reserve { quantity: 4 }).await.unwrap();
        assert_eq!(lookup.status_for(product_id).await.unwrap(), InventoryStatus::OutOfStock);

        lookup.apply(product_id, StockMovement::Release { quantity: 10 }).await.unwrap();
        let status = lookup.apply(product_id, StockMovement::Restock { quantity: 1 }).await.unwrap();
        assert_eq!(status, InventoryStatus::InStock { available: 11 });
    }

    #[tokio::test]
    async fn test_rejected_movements_leave_stock_unchanged() {
        let lookup = InMemoryInventoryLookup::new(5);
        let product_id = Uuid::new_v4();
        lookup.apply(product_id, StockMovement::Set { quantity: 3 }).await.unwrap();

        for movement in [
            StockMovement::Reserve { quantity: 4 },
            StockMovement::Release { quantity: 1 },
            StockMovement::Release { quantity: -5 },
            StockMovement::Restock { quantity: 0 },
        ] {
            let err = lookup.apply(product_id, movement).await.unwrap_err();
            assert!(matches!(err, RepositoryError::Validation(_)));
        }

        assert_eq!(
            lookup.status_for(product_id).await.unwrap(),
            InventoryStatus::LowStock { available: 3 }
        );
    }
}
