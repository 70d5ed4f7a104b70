//! Request bodies for the pricing API

use serde::{Deserialize, Serialize};

use crate::order::{LineItem, OrderType};

/// `POST /pricing/calculate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub order_type: OrderType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
}

/// `POST /pricing/dynamic`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DynamicPricingRequest {
    pub item_ids: Vec<i64>,
}

/// Query string of `GET /pricing/promo/{code}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PromoQuery {
    #[serde(default)]
    pub subtotal: f64,
}
