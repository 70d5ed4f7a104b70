//! Money calculation for order pricing
//!
//! All calculations are done using `Decimal` internally, then converted to
//! `f64` for serialization. Rounding is round-half-to-even to 2 decimal
//! places, applied once per published field and never to per-line
//! intermediates.

use crate::error::{AppError, ErrorCode};
use crate::order::{LineItem, PriceBreakdown, PricingContext};
use rust_decimal::prelude::*;
use thiserror::Error;

const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price or fee (1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Pricing failure
///
/// Validation is the only failure mode: the engine performs no I/O.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("{1}")]
    InvalidInput(ErrorCode, String),
}

impl PricingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PricingError::InvalidInput(code, _) => *code,
        }
    }
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidInput(code, message) => AppError::with_message(code, message),
        }
    }
}

#[inline]
fn invalid(code: ErrorCode, message: String) -> PricingError {
    PricingError::InvalidInput(code, message)
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, code: ErrorCode, field: &str) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(invalid(
            code,
            format!("{} must be a finite number, got {}", field, value),
        ));
    }
    Ok(())
}

/// Validate a non-negative monetary amount within [0, MAX_PRICE]
fn require_amount(value: f64, field: &str) -> Result<(), PricingError> {
    require_finite(value, ErrorCode::InvalidAmount, field)?;
    if value < 0.0 {
        return Err(invalid(
            ErrorCode::InvalidAmount,
            format!("{} must be non-negative, got {}", field, value),
        ));
    }
    if value > MAX_PRICE {
        return Err(invalid(
            ErrorCode::InvalidAmount,
            format!(
                "{} exceeds maximum allowed ({}), got {}",
                field, MAX_PRICE, value
            ),
        ));
    }
    Ok(())
}

/// Validate a line item before pricing
///
/// `index` is the position of the line in the request and only appears in
/// the error message.
pub fn validate_line_item(item: &LineItem, index: usize) -> Result<(), PricingError> {
    if item.quantity < 1 {
        return Err(invalid(
            ErrorCode::InvalidQuantity,
            format!(
                "items[{}]: quantity must be positive, got {}",
                index, item.quantity
            ),
        ));
    }
    if item.quantity > MAX_QUANTITY {
        return Err(invalid(
            ErrorCode::InvalidQuantity,
            format!(
                "items[{}]: quantity exceeds maximum allowed ({}), got {}",
                index, MAX_QUANTITY, item.quantity
            ),
        ));
    }

    require_amount(item.unit_price, &format!("items[{}].unit_price", index))?;

    for (m, modification) in item.modifications.iter().enumerate() {
        let field = format!("items[{}].modifications[{}].price", index, m);
        require_finite(modification.price, ErrorCode::InvalidAmount, &field)?;
        if modification.price.abs() > MAX_PRICE {
            return Err(invalid(
                ErrorCode::InvalidAmount,
                format!("{} exceeds maximum allowed, got {}", field, modification.price),
            ));
        }
    }

    Ok(())
}

/// Validate the pricing context
pub fn validate_context(context: &PricingContext) -> Result<(), PricingError> {
    require_finite(context.tax_rate, ErrorCode::InvalidTaxRate, "tax_rate")?;
    if !(0.0..1.0).contains(&context.tax_rate) {
        return Err(invalid(
            ErrorCode::InvalidTaxRate,
            format!("tax_rate must be in [0, 1), got {}", context.tax_rate),
        ));
    }
    require_amount(context.delivery_fee_flat, "delivery_fee_flat")?;
    require_amount(context.free_delivery_threshold, "free_delivery_threshold")?;
    require_amount(context.discount_amount, "discount_amount")?;
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated at the boundary. If NaN/Infinity
/// somehow reaches here, logs an error and returns ZERO.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Round a monetary value to 2 decimal places, half to even
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// Per-unit price including modifications, clamped to >= 0 (unrounded)
pub fn adjusted_unit_price(item: &LineItem) -> Decimal {
    let modifications: Decimal = item
        .modifications
        .iter()
        .map(|m| to_decimal(m.price))
        .sum();
    (to_decimal(item.unit_price) + modifications).max(Decimal::ZERO)
}

/// Line total: adjusted unit price × quantity (unrounded)
pub fn line_total(item: &LineItem) -> Decimal {
    adjusted_unit_price(item) * Decimal::from(item.quantity)
}

/// Compute the price breakdown for a set of line items
///
/// 1. `subtotal = round2(Σ max(0, unit_price + Σ modifications) × quantity)`
/// 2. `tax = round2(subtotal × tax_rate)`
/// 3. `delivery_fee = 0` when `subtotal >= free_delivery_threshold`,
///    otherwise the flat fee
/// 4. `total = round2(max(0, subtotal + tax + delivery_fee - discount))`
///
/// Line totals are summed unrounded and the sum is rounded once. Every later
/// step works from that published subtotal, so the threshold decision and the
/// total always agree with the fields a caller sees.
pub fn compute_breakdown(
    items: &[LineItem],
    context: &PricingContext,
) -> Result<PriceBreakdown, PricingError> {
    validate_context(context)?;
    for (index, item) in items.iter().enumerate() {
        validate_line_item(item, index)?;
    }

    let subtotal = round_money(items.iter().map(line_total).sum());

    let tax_amount = round_money(subtotal * to_decimal(context.tax_rate));

    let delivery_fee = if subtotal >= to_decimal(context.free_delivery_threshold) {
        Decimal::ZERO
    } else {
        round_money(to_decimal(context.delivery_fee_flat))
    };

    let discount_amount = round_money(to_decimal(context.discount_amount));

    let total = round_money(
        (subtotal + tax_amount + delivery_fee - discount_amount).max(Decimal::ZERO),
    );

    Ok(PriceBreakdown {
        subtotal: to_f64(subtotal),
        tax_amount: to_f64(tax_amount),
        delivery_fee: to_f64(delivery_fee),
        discount_amount: to_f64(discount_amount),
        total: to_f64(total),
    })
}
