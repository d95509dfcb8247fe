use std::sync::Arc;
use shopfront_core::{ProductAggregator, StockLedger};

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductAggregator>,
    pub stock: Arc<dyn StockLedger>,
}

impl AppState {
    pub fn new(products: ProductAggregator, stock: Arc<dyn StockLedger>) -> Self {
        Self {
            products: Arc::new(products),
            stock,
        }
    }
}
