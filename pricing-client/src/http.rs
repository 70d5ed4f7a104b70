//! HTTP client for the pricing API

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::models::DynamicPrice;
use shared::request::{CalculateRequest, DynamicPricingRequest};
use shared::response::{CalculateResponse, HealthResponse, PromoValidation};

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making requests to the pricing server
#[derive(Debug, Clone)]
pub struct PricingClient {
    client: Client,
    base_url: Url,
}

impl PricingClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ClientError::Config(format!("invalid base url {}: {}", config.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base url cannot have a path: {}",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Build an endpoint URL; segments are percent-encoded
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> ClientResult<T> {
        let response = self.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, url: Url, body: &B) -> ClientResult<T> {
        let response = self.client.post(url).json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    ///
    /// Error responses carry an `ApiResponse` envelope which is turned back
    /// into the server's `AppError`.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text)
                .ok()
                .and_then(ApiResponse::into_error);
            return match envelope {
                Some(err) => Err(ClientError::App(err)),
                None => Err(ClientError::InvalidResponse {
                    status: status.as_u16(),
                    body: text,
                }),
            };
        }

        serde_json::from_str(&text).map_err(Into::into)
    }

    // ========== Pricing API ==========

    /// POST /pricing/calculate
    pub async fn calculate(&self, request: &CalculateRequest) -> ClientResult<CalculateResponse> {
        self.post(self.url(&["pricing", "calculate"]), request).await
    }

    /// POST /pricing/dynamic
    pub async fn dynamic_prices(&self, item_ids: &[i64]) -> ClientResult<Vec<DynamicPrice>> {
        let request = DynamicPricingRequest {
            item_ids: item_ids.to_vec(),
        };
        self.post(self.url(&["pricing", "dynamic"]), &request).await
    }

    /// GET /pricing/promo/{code}?subtotal=
    pub async fn validate_promo(&self, code: &str, subtotal: f64) -> ClientResult<PromoValidation> {
        let mut url = self.url(&["pricing", "promo", code]);
        url.query_pairs_mut()
            .append_pair("subtotal", &subtotal.to_string());
        self.get(url).await
    }

    /// GET /health
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get(self.url(&["health"])).await
    }
}
