//! Menu Item Model

use serde::{Deserialize, Deserializer, Serialize};

/// Menu item as stored in the CMS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    /// Base price; the CMS may deliver decimals as strings ("12.99")
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}

/// Stock level for a menu item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub menu_item_id: i64,
    pub current_stock: i64,
    pub minimum_stock: i64,
}

/// Accept a price either as a JSON number or a numeric string
pub fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => Ok(n),
        RawPrice::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid price: {:?}", s))),
    }
}
