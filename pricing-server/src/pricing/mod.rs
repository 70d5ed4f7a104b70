//! Pricing rules layered on top of the shared order pricing engine
//!
//! - [`promo`]: promo code catalog
//! - [`quote`]: request-level pricing (order type, promo, free delivery)
//! - [`dynamic`]: stock and time-of-day item pricing

pub mod dynamic;
pub mod promo;
pub mod quote;

pub use dynamic::{Adjustment, dynamic_price, dynamic_prices};
pub use promo::{PromoCatalog, PromoKind, PromoRule};
pub use quote::quote;
