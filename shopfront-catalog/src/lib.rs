pub mod product;
pub mod pricing;
pub mod inventory;

pub use product::{NewProduct, Product, ProductDetails, ProductError};
pub use pricing::{PricingConfig, PricingRules, SaleWindow};
pub use inventory::{InventoryError, InventoryManager, InventoryStatus, StockMovement};
