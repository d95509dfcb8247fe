use async_trait::async_trait;
use chrono::Utc;
use shopfront_catalog::PricingRules;
use shopfront_core::{PricingEngine, ProductStore, RepositoryResult};
use std::sync::Arc;
use uuid::Uuid;

/// Prices a product by applying the configured business rules to its list price
pub struct RulePricingEngine {
    store: Arc<dyn ProductStore>,
    rules: PricingRules,
}

impl RulePricingEngine {
    pub fn new(store: Arc<dyn ProductStore>, rules: PricingRules) -> Self {
        Self { store, rules }
    }
}

#[async_trait]
impl PricingEngine for RulePricingEngine {
    async fn price_for(&self, product_id: Uuid) -> RepositoryResult<i64> {
        let product = self.store.find_by_id(product_id).await?;
        Ok(self.rules.price_at(product.base_price_cents, Utc::now()))
    }
}
