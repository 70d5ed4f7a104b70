//! Dynamic Item Pricing
//!
//! Adjusts a menu item's base price by stock level first and time of day
//! second. Stock surges always win over time-of-day rules. The hour is
//! passed in by the caller so the rules stay deterministic.

use rust_decimal::prelude::*;
use shared::models::{DynamicPrice, InventoryLevel, MenuItem};
use shared::order_money::{to_decimal, to_f64};

/// +25% when stock is at or below the minimum
const CRITICAL_SURGE: Decimal = Decimal::from_parts(125, 0, 0, false, 2);
/// +15% when stock is at or below twice the minimum
const LOW_STOCK_SURGE: Decimal = Decimal::from_parts(115, 0, 0, false, 2);
/// +10% during dinner peak
const PEAK_SURGE: Decimal = Decimal::from_parts(110, 0, 0, false, 2);
/// 10% off in the afternoon
const HAPPY_HOUR_DISCOUNT: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// 15% off late at night
const LATE_NIGHT_DISCOUNT: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Which rule produced a dynamic price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Base,
    CriticalStock,
    LowStock,
    HappyHour,
    PeakHour,
    LateNight,
}

impl Adjustment {
    /// Pick the adjustment for a stock level and local hour (0-23)
    pub fn select(inventory: Option<&InventoryLevel>, hour: u32) -> Self {
        if let Some(inv) = inventory {
            if inv.current_stock <= inv.minimum_stock {
                return Self::CriticalStock;
            }
            if inv.current_stock <= inv.minimum_stock.saturating_mul(2) {
                return Self::LowStock;
            }
        }
        match hour {
            14..=17 => Self::HappyHour,
            18..=20 => Self::PeakHour,
            21.. => Self::LateNight,
            _ => Self::Base,
        }
    }

    fn surge(self) -> Option<Decimal> {
        match self {
            Self::CriticalStock => Some(CRITICAL_SURGE),
            Self::LowStock => Some(LOW_STOCK_SURGE),
            Self::PeakHour => Some(PEAK_SURGE),
            _ => None,
        }
    }

    fn discount(self) -> Option<Decimal> {
        match self {
            Self::HappyHour => Some(HAPPY_HOUR_DISCOUNT),
            Self::LateNight => Some(LATE_NIGHT_DISCOUNT),
            _ => None,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Base => "Base price",
            Self::CriticalStock => "Critical inventory surge pricing",
            Self::LowStock => "Low inventory surge pricing",
            Self::HappyHour => "Happy hour discount",
            Self::PeakHour => "Peak hour surge pricing",
            Self::LateNight => "Late night discount",
        }
    }
}

/// Dynamic price for a single item
pub fn dynamic_price(item: &MenuItem, inventory: Option<&InventoryLevel>, hour: u32) -> DynamicPrice {
    let adjustment = Adjustment::select(inventory, hour);
    let base = to_decimal(item.price);

    let price = match (adjustment.surge(), adjustment.discount()) {
        (Some(multiplier), _) => base * multiplier,
        (None, Some(discount)) => base * (Decimal::ONE - discount),
        (None, None) => base,
    };

    DynamicPrice {
        item_id: item.id,
        original_price: item.price,
        dynamic_price: to_f64(price),
        discount_percentage: adjustment.discount().and_then(|d| d.to_f64()),
        surge_multiplier: adjustment.surge().and_then(|m| m.to_f64()),
        reason: adjustment.reason().to_string(),
    }
}

/// Dynamic prices for the requested ids, in request order
///
/// Ids missing from `menu` are skipped.
pub fn dynamic_prices(
    item_ids: &[i64],
    menu: &[MenuItem],
    inventory: &[InventoryLevel],
    hour: u32,
) -> Vec<DynamicPrice> {
    item_ids
        .iter()
        .filter_map(|id| {
            let item = menu.iter().find(|m| m.id == *id)?;
            let stock = inventory.iter().find(|i| i.menu_item_id == *id);
            Some(dynamic_price(item, stock, hour))
        })
        .collect()
}
