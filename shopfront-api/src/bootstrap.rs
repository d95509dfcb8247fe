use std::sync::Arc;

use anyhow::Context;
use shopfront_catalog::PricingRules;
use shopfront_core::{InventoryLookup, ProductAggregator, ProductStore, StockLedger};
use shopfront_store::app_config::{Config, InventoryBackend, StorageBackend};
use shopfront_store::{
    DbClient, InMemoryInventoryLookup, InMemoryProductStore, PgProductStore, RedisClient,
    RedisInventoryLookup, RulePricingEngine,
};
use tracing::{info, warn};

use crate::state::AppState;

/// Wire the configured collaborators into the application state
pub async fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let store: Arc<dyn ProductStore> = match config.storage.backend {
        StorageBackend::Postgres => {
            let db_config = config
                .database
                .as_ref()
                .context("storage.backend = \"postgres\" requires a [database] section")?;
            let db = DbClient::new(db_config)
                .await
                .context("Failed to connect to Postgres")?;
            if db_config.run_migrations {
                db.migrate().await.context("Failed to run migrations")?;
            }
            info!("Product store: postgres");
            Arc::new(PgProductStore::new(db.pool.clone()))
        }
        StorageBackend::Memory => {
            warn!("Product store: in-memory, contents are lost on restart");
            Arc::new(InMemoryProductStore::new())
        }
    };

    // One backend serves both stock reads and warehouse movements
    let (inventory, stock) = match config.inventory.backend {
        InventoryBackend::Redis => {
            let url = config
                .inventory
                .redis_url
                .as_deref()
                .context("inventory.backend = \"redis\" requires inventory.redis_url")?;
            let redis = RedisClient::new(url).context("Invalid Redis URL")?;
            // Lookups report unavailability per request; an unreachable Redis is not fatal here
            if let Err(e) = redis.ping().await {
                warn!("Redis not reachable at startup: {}", e);
            }
            info!("Inventory lookup: redis");
            let lookup = Arc::new(RedisInventoryLookup::new(redis, config.inventory.low_stock_threshold));
            (lookup.clone() as Arc<dyn InventoryLookup>, lookup as Arc<dyn StockLedger>)
        }
        InventoryBackend::Memory => {
            info!("Inventory lookup: in-memory");
            let lookup = Arc::new(InMemoryInventoryLookup::new(config.inventory.low_stock_threshold));
            (lookup.clone() as Arc<dyn InventoryLookup>, lookup as Arc<dyn StockLedger>)
        }
    };

    let pricing = Arc::new(RulePricingEngine::new(
        store.clone(),
        PricingRules::new(config.pricing.clone()),
    ));

    info!("Enrichment mode: {:?}", config.aggregator.enrichment);
    let aggregator = ProductAggregator::new(store, pricing, inventory).with_mode(config.aggregator.enrichment);
    Ok(AppState::new(aggregator, stock))
}
