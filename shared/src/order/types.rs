//! Order pricing data model

use serde::{Deserialize, Serialize};

/// Priced add-on or removal attached to a line item (e.g. "extra cheese")
///
/// `price` may be negative ("no onions" -0.50).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub label: String,
    pub price: f64,
}

impl Modification {
    pub fn new(label: impl Into<String>, price: f64) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}

/// A single cart line as seen by the pricing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Base price per unit (>= 0)
    pub unit_price: f64,
    /// Units ordered (>= 1)
    pub quantity: i32,
    /// Ordered list of modifications applied to every unit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifications: Vec<Modification>,
}

impl LineItem {
    pub fn new(unit_price: f64, quantity: i32) -> Self {
        Self {
            unit_price,
            quantity,
            modifications: Vec::new(),
        }
    }

    pub fn with_modification(mut self, label: impl Into<String>, price: f64) -> Self {
        self.modifications.push(Modification::new(label, price));
        self
    }
}

/// Caller-supplied pricing parameters
///
/// Loaded from configuration once and injected into every pricing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingContext {
    /// Tax rate in [0, 1), e.g. 0.0875
    pub tax_rate: f64,
    /// Flat delivery fee charged below the threshold
    pub delivery_fee_flat: f64,
    /// Subtotal at or above which delivery is free
    pub free_delivery_threshold: f64,
    /// Order-level discount subtracted from the total
    #[serde(default)]
    pub discount_amount: f64,
}

impl PricingContext {
    pub fn new(tax_rate: f64, delivery_fee_flat: f64, free_delivery_threshold: f64) -> Self {
        Self {
            tax_rate,
            delivery_fee_flat,
            free_delivery_threshold,
            discount_amount: 0.0,
        }
    }

    pub fn with_discount(mut self, discount_amount: f64) -> Self {
        self.discount_amount = discount_amount;
        self
    }

    /// Context for orders that never pay a delivery fee
    pub fn without_delivery(mut self) -> Self {
        self.delivery_fee_flat = 0.0;
        self
    }
}

/// Deterministic price breakdown, all values rounded to 2 decimal places
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub delivery_fee: f64,
    pub discount_amount: f64,
    pub total: f64,
}

/// How the order reaches the customer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Delivery,
    Pickup,
}

/// Kind of discount reported alongside a breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    PromoCode,
    FreeDelivery,
}

/// Discount line shown to the customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedDiscount {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub description: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_modifications_default_empty() {
        let item: LineItem = serde_json::from_str(r#"{"unit_price": 9.5, "quantity": 2}"#).unwrap();
        assert_eq!(item, LineItem::new(9.5, 2));
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("modifications").is_none());
    }

    #[test]
    fn test_context_builders() {
        let ctx = PricingContext::new(0.1, 3.99, 25.0)
            .with_discount(5.0)
            .without_delivery();
        assert_eq!(ctx.discount_amount, 5.0);
        assert_eq!(ctx.delivery_fee_flat, 0.0);
        assert_eq!(ctx.free_delivery_threshold, 25.0);
    }

    #[test]
    fn test_order_type_serde() {
        assert_eq!(serde_json::to_string(&OrderType::Pickup).unwrap(), "\"pickup\"");
        let t: OrderType = serde_json::from_str("\"delivery\"").unwrap();
        assert_eq!(t, OrderType::Delivery);
    }

    #[test]
    fn test_applied_discount_type_field() {
        let d = AppliedDiscount {
            kind: DiscountKind::FreeDelivery,
            code: None,
            description: "Free delivery".to_string(),
            amount: 3.99,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "free_delivery");
        assert!(json.get("code").is_none());
    }
}
