use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::inventory::InventoryStatus;

const MAX_CODE_LEN: usize = 64;
const MAX_NAME_LEN: usize = 255;

/// Product record as persisted by a product store.
///
/// Carries no price or stock: those are computed on every read and only
/// exist on [`ProductDetails`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: Uuid,
    pub product_code: String,
    pub name: String,
    pub description: Option<String>,
    /// List price before pricing rules, in cents
    pub base_price_cents: i64,
    pub is_active: bool,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Creation request for a product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub product_code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub base_price_cents: i64,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl NewProduct {
    pub fn new(product_code: impl Into<String>, name: impl Into<String>, base_price_cents: i64) -> Self {
        Self {
            product_code: product_code.into(),
            name: name.into(),
            description: None,
            base_price_cents,
            metadata: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Reject malformed creation input before anything is written
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.product_code.is_empty() {
            return Err(ProductError::Invalid("product_code must not be empty".to_string()));
        }
        if self.product_code.len() > MAX_CODE_LEN {
            return Err(ProductError::Invalid(format!(
                "product_code exceeds {} characters",
                MAX_CODE_LEN
            )));
        }
        if self.product_code.chars().any(char::is_whitespace) {
            return Err(ProductError::Invalid("product_code must not contain whitespace".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(ProductError::Invalid("name must not be empty".to_string()));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(ProductError::Invalid(format!("name exceeds {} characters", MAX_NAME_LEN)));
        }
        if self.base_price_cents < 0 {
            return Err(ProductError::Invalid(format!(
                "base_price_cents must be non-negative, got {}",
                self.base_price_cents
            )));
        }
        if let Some(metadata) = &self.metadata {
            if !metadata.is_object() {
                return Err(ProductError::Invalid("metadata must be a JSON object".to_string()));
            }
        }
        Ok(())
    }

    /// Build the stored record under a freshly assigned identifier.
    pub fn into_product(self, id: Uuid, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            product_code: self.product_code,
            name: self.name.trim().to_string(),
            description: self.description,
            base_price_cents: self.base_price_cents,
            is_active: true,
            metadata: self.metadata.unwrap_or_else(|| serde_json::json!({})),
            created_at,
        }
    }
}

/// Fully populated product view returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDetails {
    #[serde(flatten)]
    pub product: Product,
    /// Current price after pricing rules, in cents
    pub price_cents: i64,
    pub inventory: InventoryStatus,
}

impl ProductDetails {
    pub fn new(product: Product, price_cents: i64, inventory: InventoryStatus) -> Self {
        Self {
            product,
            price_cents,
            inventory,
        }
    }

    pub fn id(&self) -> Uuid {
        self.product.id
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Invalid product: {0}")]
    Invalid(String),
}
