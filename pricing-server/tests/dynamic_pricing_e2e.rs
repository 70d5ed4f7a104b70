//! End-to-end: stub Directus CMS -> DirectusClient -> router over real TCP

use std::collections::HashMap;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use pricing_server::services::DirectusClient;
use pricing_server::utils::BusinessClock;
use pricing_server::{Config, PromoCatalog, ServerState, build_router};
use serde_json::{Value, json};
use shared::models::DynamicPrice;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_cms() -> String {
    let app = Router::new()
        .route(
            "/items/menu_items",
            get(|| async {
                Json(json!({
                    "data": [
                        {"id": 7, "name": "Margherita", "price": "14.00", "is_available": true},
                        {"id": 8, "name": "Tiramisu", "price": 6.5}
                    ]
                }))
            }),
        )
        .route(
            "/items/inventory",
            get(|| async {
                Json(json!({
                    "data": [
                        {"menu_item_id": 7, "current_stock": 2, "minimum_stock": 4}
                    ]
                }))
            }),
        );
    serve(app).await
}

fn config(directus_url: String) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DIRECTUS_URL", directus_url),
        ("REQUEST_TIMEOUT_MS", "2000".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[tokio::test]
async fn test_dynamic_pricing_through_cms() {
    let cms_url = spawn_cms().await;
    let config = config(cms_url);
    let directus = DirectusClient::new(&config).unwrap();
    let state = ServerState::new(
        config,
        PromoCatalog::empty(),
        Arc::new(directus),
        BusinessClock::fixed(22),
    )
    .unwrap();
    let base = serve(build_router(state)).await;

    let client = reqwest::Client::new();
    let prices: Vec<DynamicPrice> = client
        .post(format!("{}/pricing/dynamic", base))
        .json(&json!({"item_ids": [7, 8]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(prices.len(), 2);
    // critical stock wins over the late night discount
    assert_eq!(prices[0].dynamic_price, 17.5);
    assert_eq!(prices[0].surge_multiplier, Some(1.25));
    // 6.50 * 0.85 = 5.525 -> 5.52
    assert_eq!(prices[1].dynamic_price, 5.52);
    assert_eq!(prices[1].reason, "Late night discount");
}

#[tokio::test]
async fn test_cms_unreachable_maps_to_service_unavailable() {
    // port 9 (discard) is not listening
    let config = config("http://127.0.0.1:9".to_string());
    let directus = DirectusClient::new(&config).unwrap();
    let state = ServerState::new(
        config,
        PromoCatalog::empty(),
        Arc::new(directus),
        BusinessClock::fixed(10),
    )
    .unwrap();
    let base = serve(build_router(state)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/pricing/dynamic", base))
        .json(&json!({"item_ids": [1]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 503);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 9003);
}
