pub mod app_config;
pub mod database;
pub mod catalog_repo;
pub mod memory_repo;
pub mod redis_repo;
pub mod pricing_repo;

pub use database::DbClient;
pub use catalog_repo::PgProductStore;
pub use memory_repo::{InMemoryInventoryLookup, InMemoryProductStore};
pub use redis_repo::{RedisClient, RedisInventoryLookup};
pub use pricing_repo::RulePricingEngine;
