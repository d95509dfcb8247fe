pub mod repository;
pub mod aggregator;

use shopfront_catalog::{InventoryError, ProductError};
use uuid::Uuid;

pub use aggregator::{EnrichmentMode, ProductAggregator};
pub use repository::{InventoryLookup, PricingEngine, ProductStore, StockLedger};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Product not found: {0}")]
    NotFound(Uuid),
    #[error("{collaborator} unavailable: {reason}")]
    Unavailable {
        collaborator: &'static str,
        reason: String,
    },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

impl RepositoryError {
    pub fn unavailable(collaborator: &'static str, reason: impl ToString) -> Self {
        Self::Unavailable {
            collaborator,
            reason: reason.to_string(),
        }
    }
}

impl From<ProductError> for RepositoryError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::Invalid(msg) => Self::Validation(msg),
        }
    }
}

impl From<InventoryError> for RepositoryError {
    fn from(err: InventoryError) -> Self {
        Self::Validation(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
