use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, RedisResult};
use shopfront_catalog::{InventoryError, InventoryStatus, StockMovement};
use shopfront_core::{InventoryLookup, RepositoryError, RepositoryResult, StockLedger};
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

fn availability_key(product_id: Uuid) -> String {
    format!("inventory:{}:available", product_id)
}

impl RedisClient {
    pub fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Available quantity as last written by the warehouse system
    pub async fn get_available(&self, product_id: Uuid) -> RedisResult<Option<i64>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let available: Option<i64> = conn.get(availability_key(product_id)).await?;
        Ok(available)
    }

    pub async fn set_available(&self, product_id: Uuid, quantity: i64) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(availability_key(product_id), quantity).await?;
        info!("Availability set: {} -> {}", product_id, quantity);
        Ok(())
    }

    pub async fn incr_available(&self, product_id: Uuid, quantity: i64) -> RedisResult<i64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.incr(availability_key(product_id), quantity).await
    }

    /// Decrement only when enough stock is left; `None` means insufficient
    pub async fn try_reserve(&self, product_id: Uuid, quantity: i64) -> RedisResult<Option<i64>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let script = redis::Script::new(r#"
            local available = tonumber(redis.call("GET", KEYS[1]) or "0")
            if available < tonumber(ARGV[1]) then
                return nil
            end
            return redis.call("DECRBY", KEYS[1], ARGV[1])
        "#);

        script
            .key(availability_key(product_id))
            .arg(quantity)
            .invoke_async(&mut conn)
            .await
    }

    pub async fn ping(&self) -> RedisResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }
}

/// Connection trouble means the inventory system is unreachable; anything
/// else (e.g. a counter holding a non-integer) is a fault on our side.
fn map_redis_error(err: RedisError) -> RepositoryError {
    if err.is_io_error() || err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
        RepositoryError::unavailable("inventory", err)
    } else {
        error!("Inventory counter read failed: {}", err);
        RepositoryError::Internal(err.to_string())
    }
}

fn to_quantity(available: i64) -> i32 {
    available.clamp(0, i32::MAX as i64) as i32
}

/// Inventory lookup reading availability counters from Redis.
///
/// Counters hold available stock only; reservations are not tracked, so a
/// release is not checked against earlier reserves.
pub struct RedisInventoryLookup {
    redis: RedisClient,
    low_stock_threshold: i32,
}

impl RedisInventoryLookup {
    pub fn new(redis: RedisClient, low_stock_threshold: i32) -> Self {
        Self {
            redis,
            low_stock_threshold,
        }
    }
}

#[async_trait]
impl InventoryLookup for RedisInventoryLookup {
    async fn status_for(&self, product_id: Uuid) -> RepositoryResult<InventoryStatus> {
        let available = self
            .redis
            .get_available(product_id)
            .await
            .map_err(map_redis_error)?
            .unwrap_or(0);

        debug!(%product_id, available, "Inventory counter read");
        Ok(InventoryStatus::from_available(to_quantity(available), self.low_stock_threshold))
    }
}

#[async_trait]
impl StockLedger for RedisInventoryLookup {
    async fn apply(&self, product_id: Uuid, movement: StockMovement) -> RepositoryResult<InventoryStatus> {
        movement.validate()?;

        let available = match movement {
            StockMovement::Set { quantity } => {
                self.redis
                    .set_available(product_id, quantity as i64)
                    .await
                    .map_err(map_redis_error)?;
                quantity as i64
            }
            StockMovement::Restock { quantity } | StockMovement::Release { quantity } => self
                .redis
                .incr_available(product_id, quantity as i64)
                .await
                .map_err(map_redis_error)?,
            StockMovement::Reserve { quantity } => {
                match self
                    .redis
                    .try_reserve(product_id, quantity as i64)
                    .await
                    .map_err(map_redis_error)?
                {
                    Some(left) => left,
                    None => {
                        let available = self
                            .redis
                            .get_available(product_id)
                            .await
                            .map_err(map_redis_error)?
                            .unwrap_or(0);
                        return Err(InventoryError::InsufficientInventory {
                            requested: quantity,
                            available: to_quantity(available),
                        }
                        .into());
                    }
                }
            }
        };

        Ok(InventoryStatus::from_available(to_quantity(available), self.low_stock_threshold))
    }
}
