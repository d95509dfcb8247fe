use serde::Deserialize;
use shopfront_catalog::PricingConfig;
use shopfront_core::EnrichmentMode;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub inventory: InventoryConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InventoryBackend {
    Redis,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InventoryConfig {
    pub backend: InventoryBackend,
    pub redis_url: Option<String>,
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub enrichment: EnrichmentMode,
}

fn default_max_connections() -> u32 { 5 }
fn default_true() -> bool { true }
fn default_low_stock_threshold() -> i32 { 5 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SHOPFRONT_SERVER__PORT=8081`
            .add_source(config::Environment::with_prefix("SHOPFRONT").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Each selected backend must have its connection settings
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.storage.backend == StorageBackend::Postgres && self.database.is_none() {
            return Err(config::ConfigError::Message(
                "storage.backend = \"postgres\" requires a [database] section".to_string(),
            ));
        }
        if self.inventory.backend == InventoryBackend::Redis && self.inventory.redis_url.is_none() {
            return Err(config::ConfigError::Message(
                "inventory.backend = \"redis\" requires inventory.redis_url".to_string(),
            ));
        }
        if self.inventory.low_stock_threshold < 0 {
            return Err(config::ConfigError::Message(
                "inventory.low_stock_threshold must be non-negative".to_string(),
            ));
        }
        if self.pricing.min_multiplier > self.pricing.max_multiplier {
            return Err(config::ConfigError::Message(
                "pricing.min_multiplier exceeds pricing.max_multiplier".to_string(),
            ));
        }
        Ok(())
    }
}
