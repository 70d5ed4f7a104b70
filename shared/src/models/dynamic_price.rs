//! Dynamic Price Model

use serde::{Deserialize, Serialize};

/// Time- or stock-adjusted price for a menu item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicPrice {
    pub item_id: i64,
    pub original_price: f64,
    pub dynamic_price: f64,
    /// Set when a discount was applied (0.10 = 10% off)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    /// Set when a surge was applied (1.15 = +15%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surge_multiplier: Option<f64>,
    pub reason: String,
}
