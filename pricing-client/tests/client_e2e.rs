//! PricingClient against a live pricing-server router

use std::sync::Arc;

use async_trait::async_trait;
use pricing_client::{
    CalculateRequest, CartStore, ClientConfig, ClientError, LineItem, Modification, OrderType,
    PricingClient,
};
use pricing_server::services::{FetchError, MenuSource};
use pricing_server::utils::BusinessClock;
use pricing_server::{Config, PromoCatalog, ServerState, build_router};
use shared::ErrorCode;
use shared::models::{InventoryLevel, MenuItem};

struct Menu;

#[async_trait]
impl MenuSource for Menu {
    async fn fetch_menu_items(&self, ids: &[i64]) -> Result<Vec<MenuItem>, FetchError> {
        Ok(ids
            .iter()
            .filter(|id| **id == 1)
            .map(|id| MenuItem {
                id: *id,
                name: "Burger".to_string(),
                price: 12.0,
                category_id: None,
                is_available: true,
            })
            .collect())
    }

    async fn fetch_inventory(&self, _ids: &[i64]) -> Result<Vec<InventoryLevel>, FetchError> {
        Ok(Vec::new())
    }
}

async fn spawn_server() -> PricingClient {
    let config = Config::from_lookup(|_| None);
    let promos = PromoCatalog::from_json(
        r#"[{"code": "SAVE5", "kind": "fixed", "value": 5.00, "min_order": 20.00}]"#,
    )
    .unwrap();
    let state = ServerState::new(config, promos, Arc::new(Menu), BusinessClock::fixed(18)).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });

    PricingClient::new(&ClientConfig::new(format!("http://{}", addr)).with_timeout(5)).unwrap()
}

#[tokio::test]
async fn test_health() {
    let client = spawn_server().await;
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
}

#[tokio::test]
async fn test_local_cart_matches_server_quote() {
    let client = spawn_server().await;

    let cart = CartStore::new(shared::PricingContext::new(0.0875, 3.99, 25.0)).unwrap();
    cart.add_item(1, "Burger", 12.99, 1, vec![Modification::new("Extra cheese", 1.5)])
        .unwrap();
    cart.add_item(2, "Fries", 3.5, 2, vec![]).unwrap();

    let request = CalculateRequest {
        items: cart.line_items(),
        order_type: OrderType::Delivery,
        promo_code: None,
    };
    let response = client.calculate(&request).await.unwrap();
    assert_eq!(response.breakdown, cart.breakdown());
}

#[tokio::test]
async fn test_promo_flow() {
    let client = spawn_server().await;

    let check = client.validate_promo("save5", 22.0).await.unwrap();
    assert!(check.valid);
    assert_eq!(check.discount.unwrap().amount, 5.0);

    let rejected = client.validate_promo("save5", 10.0).await.unwrap();
    assert!(!rejected.valid);

    let request = CalculateRequest {
        items: vec![LineItem::new(22.0, 1)],
        order_type: OrderType::Pickup,
        promo_code: Some("SAVE5".to_string()),
    };
    let response = client.calculate(&request).await.unwrap();
    // 22 + 1.925 -> 1.92, no delivery, minus 5
    assert_eq!(response.breakdown.total, 18.92);
}

#[tokio::test]
async fn test_server_error_envelope() {
    let client = spawn_server().await;
    let request = CalculateRequest {
        items: vec![LineItem::new(5.0, 0)],
        ..Default::default()
    };
    match client.calculate(&request).await {
        Err(ClientError::App(err)) => assert_eq!(err.code, ErrorCode::InvalidQuantity),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_dynamic_prices() {
    let client = spawn_server().await;
    let prices = client.dynamic_prices(&[1, 2]).await.unwrap();
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0].dynamic_price, 13.2);
    assert_eq!(prices[0].reason, "Peak hour surge pricing");
}
