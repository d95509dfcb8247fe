use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shopfront_catalog::{NewProduct, ProductDetails, StockMovement};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/products", post(create_product))
        .route("/v1/products/{id}", get(get_product))
        .route("/v1/products/{id}/stock", post(move_stock))
}

/// POST /v1/products
async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<NewProduct>,
) -> Result<(StatusCode, Json<ProductDetails>), AppError> {
    let details = state.products.create(req).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

/// GET /v1/products/{id}
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetails>, AppError> {
    let details = state.products.get_details(id).await?;
    Ok(Json(details))
}

/// POST /v1/products/{id}/stock
async fn move_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(movement): Json<StockMovement>,
) -> Result<Json<ProductDetails>, AppError> {
    // Movements for products the catalog does not know are refused
    state.products.get_details(id).await?;

    let status = state.stock.apply(id, movement).await?;
    tracing::info!(product_id = %id, ?movement, ?status, "Stock movement applied");

    let details = state.products.get_details(id).await?;
    Ok(Json(details))
}
