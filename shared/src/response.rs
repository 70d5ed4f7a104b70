//! Response bodies for the pricing API

use serde::{Deserialize, Serialize};

use crate::order::{AppliedDiscount, PriceBreakdown};

/// `POST /pricing/calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub breakdown: PriceBreakdown,
    #[serde(default)]
    pub applied_discounts: Vec<AppliedDiscount>,
}

/// `GET /pricing/promo/{code}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoValidation {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<AppliedDiscount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PromoValidation {
    pub fn accepted(discount: AppliedDiscount) -> Self {
        Self {
            valid: true,
            discount: Some(discount),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            discount: None,
            message: Some(message.into()),
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
}
