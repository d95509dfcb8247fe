use uuid::Uuid;
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Stock status reported for a product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    InStock { available: i32 },
    LowStock { available: i32 },
    OutOfStock,
}

impl InventoryStatus {
    /// Classify an available quantity against the low-stock threshold
    pub fn from_available(available: i32, low_stock_threshold: i32) -> Self {
        if available <= 0 {
            InventoryStatus::OutOfStock
        } else if available <= low_stock_threshold {
            InventoryStatus::LowStock { available }
        } else {
            InventoryStatus::InStock { available }
        }
    }

    pub fn available(&self) -> i32 {
        match self {
            InventoryStatus::InStock { available } | InventoryStatus::LowStock { available } => *available,
            InventoryStatus::OutOfStock => 0,
        }
    }
}

/// A change to a product's stock, as reported by the warehouse
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "movement", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockMovement {
    /// Replace the on-hand count, clearing any reservations
    Set { quantity: i32 },
    Restock { quantity: i32 },
    Reserve { quantity: i32 },
    Release { quantity: i32 },
}

impl StockMovement {
    pub fn quantity(&self) -> i32 {
        match self {
            StockMovement::Set { quantity }
            | StockMovement::Restock { quantity }
            | StockMovement::Reserve { quantity }
            | StockMovement::Release { quantity } => *quantity,
        }
    }

    /// `Set` accepts zero, every other movement needs a positive quantity
    pub fn validate(&self) -> Result<(), InventoryError> {
        let quantity = self.quantity();
        let valid = match self {
            StockMovement::Set { .. } => quantity >= 0,
            _ => quantity > 0,
        };
        if valid {
            Ok(())
        } else {
            Err(InventoryError::InvalidQuantity(quantity))
        }
    }
}

/// Stock tracking for a single product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product_id: Uuid,
    pub available_quantity: i32,
    pub reserved_quantity: i32,
}

/// In-memory stock ledger
#[derive(Debug)]
pub struct InventoryManager {
    inventory: HashMap<Uuid, InventoryItem>,
}

impl InventoryManager {
    pub fn new() -> Self {
        Self {
            inventory: HashMap::new(),
        }
    }

    /// Start tracking a product with the given on-hand quantity
    pub fn initialize(&mut self, product_id: Uuid, quantity: i32) {
        self.inventory.insert(product_id, InventoryItem {
            product_id,
            available_quantity: quantity.max(0),
            reserved_quantity: 0,
        });
    }

    pub fn get(&self, product_id: &Uuid) -> Option<&InventoryItem> {
        self.inventory.get(product_id)
    }

    /// Available quantity; untracked products have none
    pub fn available(&self, product_id: &Uuid) -> i32 {
        self.inventory
            .get(product_id)
            .map(|item| item.available_quantity)
            .unwrap_or(0)
    }

    /// Add received stock, tracking the product if it was not yet known
    pub fn restock(&mut self, product_id: Uuid, quantity: i32) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let item = self.inventory.entry(product_id).or_insert(InventoryItem {
            product_id,
            available_quantity: 0,
            reserved_quantity: 0,
        });
        item.available_quantity += quantity;

        Ok(())
    }

    /// Hold stock for a pending sale
    pub fn reserve(&mut self, product_id: &Uuid, quantity: i32) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let item = self.inventory.get_mut(product_id)
            .ok_or_else(|| InventoryError::NotFound(product_id.to_string()))?;

        if item.available_quantity < quantity {
            return Err(InventoryError::InsufficientInventory {
                requested: quantity,
                available: item.available_quantity,
            });
        }

        item.available_quantity -= quantity;
        item.reserved_quantity += quantity;

        Ok(())
    }

    /// Apply a warehouse movement to the ledger
    pub fn apply(&mut self, product_id: Uuid, movement: StockMovement) -> Result<(), InventoryError> {
        movement.validate()?;
        match movement {
            StockMovement::Set { quantity } => {
                self.initialize(product_id, quantity);
                Ok(())
            }
            StockMovement::Restock { quantity } => self.restock(product_id, quantity),
            StockMovement::Reserve { quantity } => self.reserve(&product_id, quantity),
            StockMovement::Release { quantity } => self.release(&product_id, quantity),
        }
    }

    /// Return held stock (sale abandoned)
    pub fn release(&mut self, product_id: &Uuid, quantity: i32) -> Result<(), InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let item = self.inventory.get_mut(product_id)
            .ok_or_else(|| InventoryError::NotFound(product_id.to_string()))?;

        if item.reserved_quantity < quantity {
            return Err(InventoryError::InsufficientReserved {
                requested: quantity,
                reserved: item.reserved_quantity,
            });
        }

        item.available_quantity += quantity;
        item.reserved_quantity -= quantity;

        Ok(())
    }
}

impl Default for InventoryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Inventory not found: {0}")]
    NotFound(String),

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("Insufficient inventory: requested {requested}, available {available}")]
    InsufficientInventory {
        requested: i32,
        available: i32,
    },

    #[error("Insufficient reserved inventory: requested {requested}, reserved {reserved}")]
    InsufficientReserved {
        requested: i32,
        reserved: i32,
    },
}
