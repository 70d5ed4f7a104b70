//! Directus CMS 客户端
//!
//! 拉取菜单项和库存，结果按请求的 id 列表缓存在内存中
//! (菜单默认 5 分钟，库存默认 1 分钟)。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::models::{InventoryLevel, MenuItem};
use shared::{AppError, ErrorCode};
use thiserror::Error;

use super::cache::{TtlCache, ids_key};
use crate::core::Config;

const MENU_FIELDS: &str = "id,name,price,category_id,is_available";
const INVENTORY_FIELDS: &str = "menu_item_id,current_stock,minimum_stock";

/// CMS 请求失败
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid CMS payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        let code = match &err {
            FetchError::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            FetchError::Http(_) => ErrorCode::NetworkError,
            FetchError::Status { .. } | FetchError::Decode(_) => ErrorCode::UpstreamError,
        };
        AppError::with_message(code, err.to_string())
    }
}

/// 菜单和库存数据来源
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menu_items(&self, ids: &[i64]) -> Result<Vec<MenuItem>, FetchError>;

    async fn fetch_inventory(&self, ids: &[i64]) -> Result<Vec<InventoryLevel>, FetchError>;
}

/// 拉取菜单项，失败时记录日志并返回 `fallback`
pub async fn fetch_menu_items_or(
    source: &dyn MenuSource,
    ids: &[i64],
    fallback: Vec<MenuItem>,
) -> Vec<MenuItem> {
    match source.fetch_menu_items(ids).await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, ids = ?ids, "Failed to fetch menu items, using fallback");
            fallback
        }
    }
}

/// Directus `/items/{collection}` 响应外壳
#[derive(Debug, Deserialize)]
struct ItemsEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct DirectusClient {
    client: Client,
    base_url: String,
    menu_cache: TtlCache<Vec<MenuItem>>,
    inventory_cache: TtlCache<Vec<InventoryLevel>>,
}

impl DirectusClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.directus_url.trim_end_matches('/').to_string(),
            menu_cache: TtlCache::new(Duration::from_secs(config.menu_cache_ttl_secs)),
            inventory_cache: TtlCache::new(Duration::from_secs(config.inventory_cache_ttl_secs)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_items<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter_field: &str,
        fields: &str,
        ids: &[i64],
    ) -> Result<Vec<T>, FetchError> {
        let url = format!("{}/items/{}", self.base_url, collection);
        let filter_key = format!("filter[{}][_in]", filter_field);
        let id_list = ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(&url)
            .query(&[(filter_key.as_str(), id_list.as_str()), ("fields", fields)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ItemsEnvelope<T> = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl MenuSource for DirectusClient {
    async fn fetch_menu_items(&self, ids: &[i64]) -> Result<Vec<MenuItem>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let key = ids_key(ids);
        if let Some(items) = self.menu_cache.get(&key) {
            tracing::debug!(key = %key, "Menu cache hit");
            return Ok(items);
        }
        tracing::debug!(key = %key, "Menu cache miss");

        let items: Vec<MenuItem> = self
            .fetch_items("menu_items", "id", MENU_FIELDS, ids)
            .await?;
        self.menu_cache.insert(key, items.clone());
        Ok(items)
    }

    async fn fetch_inventory(&self, ids: &[i64]) -> Result<Vec<InventoryLevel>, FetchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let key = ids_key(ids);
        if let Some(levels) = self.inventory_cache.get(&key) {
            tracing::debug!(key = %key, "Inventory cache hit");
            return Ok(levels);
        }
        tracing::debug!(key = %key, "Inventory cache miss");

        let levels: Vec<InventoryLevel> = self
            .fetch_items("inventory", "menu_item_id", INVENTORY_FIELDS, ids)
            .await?;
        self.inventory_cache.insert(key, levels.clone());
        Ok(levels)
    }
}
