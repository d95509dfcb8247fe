use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use shopfront_catalog::{NewProduct, Product};
use shopfront_core::{ProductStore, RepositoryError, RepositoryResult};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

const COLLABORATOR: &str = "product store";

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    product_code: String,
    name: String,
    description: Option<String>,
    base_price_cents: i64,
    is_active: bool,
    metadata: Value,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            product_code: row.product_code,
            name: row.name,
            description: row.description,
            base_price_cents: row.base_price_cents,
            is_active: row.is_active,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}

fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Validation("product_code already exists".to_string())
        }
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => RepositoryError::unavailable(COLLABORATOR, &err),
        _ => {
            error!("Product query failed: {:?}", err);
            RepositoryError::Internal(err.to_string())
        }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn create(&self, data: NewProduct) -> RepositoryResult<Product> {
        data.validate()?;
        let product = data.into_product(Uuid::new_v4(), Utc::now());

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (id, product_code, name, description, base_price_cents, is_active, metadata, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, product_code, name, description, base_price_cents, is_active, metadata, created_at
            "#,
        )
        .bind(product.id)
        .bind(&product.product_code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.base_price_cents)
        .bind(product.is_active)
        .bind(&product.metadata)
        .bind(product.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, product_code, name, description, base_price_cents, is_active, metadata, created_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(Product::from).ok_or(RepositoryError::NotFound(id))
    }
}
