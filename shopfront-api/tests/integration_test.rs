use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shopfront_api::{app, bootstrap, AppState};
use shopfront_catalog::{InventoryStatus, PricingConfig, PricingRules, StockMovement};
use shopfront_core::{InventoryLookup, ProductAggregator, RepositoryError, RepositoryResult, StockLedger};
use shopfront_store::app_config::Config;
use shopfront_store::{InMemoryInventoryLookup, InMemoryProductStore, RulePricingEngine};
use tower::ServiceExt;
use uuid::Uuid;

struct DownInventory;

#[async_trait]
impl InventoryLookup for DownInventory {
    async fn status_for(&self, _product_id: Uuid) -> RepositoryResult<InventoryStatus> {
        Err(RepositoryError::unavailable("inventory", "warehouse API timed out"))
    }
}

fn memory_app(pricing: PricingConfig) -> (Router, Arc<InMemoryInventoryLookup>) {
    let store = Arc::new(InMemoryProductStore::new());
    let inventory = Arc::new(InMemoryInventoryLookup::new(5));
    let pricing = Arc::new(RulePricingEngine::new(store.clone(), PricingRules::new(pricing)));
    let aggregator = ProductAggregator::new(store, pricing, inventory.clone());

    (app(AppState::new(aggregator, inventory.clone())), inventory)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_product(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/products")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_product(id: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/v1/products/{}", id))
        .body(Body::empty())
        .unwrap()
}

fn post_stock(id: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/v1/products/{}/stock", id))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (app, _) = memory_app(PricingConfig::default());

    let (status, body) = send(&app, Request::builder().uri("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_product_is_priced_and_stocked() {
    let (app, _) = memory_app(PricingConfig {
        tax_rate: 0.1,
        ..Default::default()
    });

    let (status, body) = send(
        &app,
        post_product(json!({
            "product_code": "LAMP-01",
            "name": "Desk Lamp",
            "description": "LED, dimmable",
            "base_price_cents": 2000
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert_eq!(body["name"], "Desk Lamp");
    assert_eq!(body["base_price_cents"], 2000);
    assert_eq!(body["price_cents"], 2200);
    assert_eq!(body["inventory"]["status"], "OUT_OF_STOCK");
}

#[tokio::test]
async fn test_get_product_reflects_current_stock() {
    let (app, inventory) = memory_app(PricingConfig::default());

    let (_, created) = send(
        &app,
        post_product(json!({"product_code": "MUG-01", "name": "Mug", "base_price_cents": 899})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    inventory
        .apply(Uuid::parse_str(&id).unwrap(), StockMovement::Restock { quantity: 3 })
        .await
        .unwrap();

    let (status, body) = send(&app, get_product(&id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["price_cents"], 899);
    assert_eq!(body["inventory"], json!({"status": "LOW_STOCK", "available": 3}));

    inventory
        .apply(Uuid::parse_str(&id).unwrap(), StockMovement::Restock { quantity: 50 })
        .await
        .unwrap();

    let (_, body) = send(&app, get_product(&id)).await;
    assert_eq!(body["inventory"], json!({"status": "IN_STOCK", "available": 53}));
}

#[tokio::test]
async fn test_unknown_product_is_404() {
    let (app, _) = memory_app(PricingConfig::default());

    let (status, body) = send(&app, get_product(&Uuid::new_v4().to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let (app, _) = memory_app(PricingConfig::default());

    let (status, body) = send(
        &app,
        post_product(json!({"product_code": "BAD CODE", "name": "Chair", "base_price_cents": 100})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, post_product(json!({"name": "No code"}))).await;
    assert!(status.is_client_error());

    let (status, _) = send(&app, get_product("not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_product_code() {
    let (app, _) = memory_app(PricingConfig::default());
    let body = json!({"product_code": "MUG-01", "name": "Mug", "base_price_cents": 899});

    let (status, _) = send(&app, post_product(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(&app, post_product(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inventory_outage_is_503() {
    let store = Arc::new(InMemoryProductStore::new());
    let pricing = Arc::new(RulePricingEngine::new(store.clone(), PricingRules::default()));
    let aggregator = ProductAggregator::new(store, pricing, Arc::new(DownInventory));
    let app = app(AppState::new(aggregator, Arc::new(InMemoryInventoryLookup::new(5))));

    let (status, body) = send(
        &app,
        post_product(json!({"product_code": "MUG-01", "name": "Mug", "base_price_cents": 899})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body.get("id").is_none());
    assert!(body["error"].as_str().unwrap().contains("inventory"));
}

#[tokio::test]
async fn test_bootstrap_memory_backends() {
    let config = Config::from_toml(
        r#"
        [server]
        port = 0

        [storage]
        backend = "memory"

        [inventory]
        backend = "memory"

        [pricing]
        global_multiplier = 2.0

        [aggregator]
        enrichment = "concurrent"
        "#,
    )
    .unwrap();

    let app = app(bootstrap::build_state(&config).await.unwrap());

    let (status, created) = send(
        &app,
        post_product(json!({"product_code": "MUG-01", "name": "Mug", "base_price_cents": 500})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price_cents"], 1000);

    let id = created["id"].as_str().unwrap();
    let (status, body) = send(&app, get_product(id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price_cents"], 1000);
    assert_eq!(body["inventory"]["status"], "OUT_OF_STOCK");

    // Warehouse movements reach the configured inventory backend
    let (status, body) = send(&app, post_stock(id, json!({"movement": "SET", "quantity": 40}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inventory"], json!({"status": "IN_STOCK", "available": 40}));

    let (_, body) = send(&app, get_product(id)).await;
    assert_eq!(body["inventory"], json!({"status": "IN_STOCK", "available": 40}));
}

#[tokio::test]
async fn test_stock_movements_over_http() {
    let (app, _) = memory_app(PricingConfig::default());

    let (_, created) = send(
        &app,
        post_product(json!({"product_code": "MUG-01", "name": "Mug", "base_price_cents": 899})),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, post_stock(id, json!({"movement": "RESTOCK", "quantity": 12}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["price_cents"], 899);
    assert_eq!(body["inventory"], json!({"status": "IN_STOCK", "available": 12}));

    let (status, body) = send(&app, post_stock(id, json!({"movement": "RESERVE", "quantity": 8}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inventory"], json!({"status": "LOW_STOCK", "available": 4}));

    let (status, body) = send(&app, post_stock(id, json!({"movement": "RELEASE", "quantity": 2}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["inventory"], json!({"status": "LOW_STOCK", "available": 6}));
}

#[tokio::test]
async fn test_rejected_stock_movements() {
    let (app, inventory) = memory_app(PricingConfig::default());

    let (status, _) = send(
        &app,
        post_stock(&Uuid::new_v4().to_string(), json!({"movement": "RESTOCK", "quantity": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, created) = send(
        &app,
        post_product(json!({"product_code": "MUG-01", "name": "Mug", "base_price_cents": 899})),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let product_id = Uuid::parse_str(id).unwrap();
    inventory.apply(product_id, StockMovement::Set { quantity: 3 }).await.unwrap();

    for movement in [
        json!({"movement": "RELEASE", "quantity": -5}),
        json!({"movement": "RESTOCK", "quantity": 0}),
        json!({"movement": "RESERVE", "quantity": 10}),
    ] {
        let (status, body) = send(&app, post_stock(id, movement)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    let (status, _) = send(&app, post_stock(id, json!({"movement": "TELEPORT", "quantity": 1}))).await;
    assert!(status.is_client_error());

    assert_eq!(
        inventory.status_for(product_id).await.unwrap(),
        InventoryStatus::LowStock { available: 3 }
    );
}
