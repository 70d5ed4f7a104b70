//! Promo Code Catalog
//!
//! Promo rules are configuration, never hardcoded: the catalog is loaded
//! once from a JSON file at start-up and only resolves codes into a discount
//! amount. The amount is then handed to the pricing engine through
//! `PricingContext::discount_amount`.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::order_money::{MAX_PRICE, round_money, to_decimal, to_f64};
use shared::{AppError, AppResult, AppliedDiscount, DiscountKind, ErrorCode};

/// How a promo rule discounts the order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromoKind {
    /// `value` is a fraction of the subtotal (0.10 = 10% off)
    Percentage,
    /// `value` is a fixed amount off
    Fixed,
    /// Waives the delivery fee; `value` is ignored
    FreeDelivery,
}

/// A single promo code definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoRule {
    pub code: String,
    pub kind: PromoKind,
    #[serde(default)]
    pub value: f64,
    /// Minimum subtotal for the code to apply
    #[serde(default)]
    pub min_order: f64,
}

impl PromoRule {
    fn validate(&self) -> AppResult<()> {
        let invalid = |msg: String| {
            Err(AppError::with_message(ErrorCode::PromoRuleInvalid, msg)
                .with_detail("code", self.code.clone()))
        };

        if self.code.trim().is_empty() {
            return invalid("promo code must not be empty".to_string());
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return invalid(format!("promo value must be non-negative, got {}", self.value));
        }
        if self.value > MAX_PRICE {
            return invalid(format!(
                "promo value exceeds maximum allowed ({}), got {}",
                MAX_PRICE, self.value
            ));
        }
        if self.kind == PromoKind::Percentage && self.value > 1.0 {
            return invalid(format!(
                "percentage promo value must be a fraction in [0, 1], got {}",
                self.value
            ));
        }
        if !self.min_order.is_finite() || self.min_order < 0.0 || self.min_order > MAX_PRICE {
            return invalid(format!(
                "promo min_order must be in [0, {}], got {}",
                MAX_PRICE, self.min_order
            ));
        }
        Ok(())
    }

    fn description(&self) -> String {
        match self.kind {
            PromoKind::Percentage => {
                let percent = (to_decimal(self.value) * Decimal::ONE_HUNDRED).normalize();
                format!("{}% off your order", percent)
            }
            PromoKind::Fixed => format!("${:.2} off your order", self.value),
            PromoKind::FreeDelivery => "Free delivery".to_string(),
        }
    }
}

/// Case-insensitive lookup table of promo rules
#[derive(Debug, Clone, Default)]
pub struct PromoCatalog {
    rules: HashMap<String, PromoRule>,
}

impl PromoCatalog {
    /// Catalog without any codes: every code is rejected
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: Vec<PromoRule>) -> AppResult<Self> {
        let mut map = HashMap::with_capacity(rules.len());
        for rule in rules {
            rule.validate()?;
            let key = normalize_code(&rule.code);
            if map.contains_key(&key) {
                return Err(AppError::with_message(
                    ErrorCode::PromoRuleInvalid,
                    format!("duplicate promo code: {}", rule.code),
                ));
            }
            map.insert(key, rule);
        }
        Ok(Self { rules: map })
    }

    /// Parse a JSON array of [`PromoRule`]
    pub fn from_json(json: &str) -> AppResult<Self> {
        let rules: Vec<PromoRule> = serde_json::from_str(json).map_err(|e| {
            AppError::with_message(
                ErrorCode::PromoRuleInvalid,
                format!("invalid promo rules JSON: {}", e),
            )
        })?;
        Self::from_rules(rules)
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!(
                "failed to read promo rules {}: {}",
                path.display(),
                e
            ))
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(count = catalog.len(), path = %path.display(), "Promo rules loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a code against an order
    ///
    /// `delivery_fee` is the fee the order would pay without the promo.
    /// Returns `None` for unknown codes, orders below `min_order`, and
    /// free-delivery codes on orders that pay no fee anyway.
    pub fn resolve(&self, code: &str, subtotal: f64, delivery_fee: f64) -> Option<AppliedDiscount> {
        let rule = self.rules.get(&normalize_code(code))?;

        if to_decimal(subtotal) < to_decimal(rule.min_order) {
            return None;
        }

        let amount = match rule.kind {
            PromoKind::Percentage => round_money(to_decimal(subtotal) * to_decimal(rule.value)),
            PromoKind::Fixed => round_money(to_decimal(rule.value)),
            PromoKind::FreeDelivery => {
                let fee = round_money(to_decimal(delivery_fee));
                if fee <= Decimal::ZERO {
                    return None;
                }
                fee
            }
        };

        // The engine rejects discounts above MAX_PRICE
        let amount = amount.min(to_decimal(MAX_PRICE));

        Some(AppliedDiscount {
            kind: DiscountKind::PromoCode,
            code: Some(rule.code.clone()),
            description: rule.description(),
            amount: to_f64(amount),
        })
    }
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
