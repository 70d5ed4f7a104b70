//! Order pricing types
//!
//! - [`LineItem`] / [`Modification`]: cart contents as priced by the engine
//! - [`PricingContext`]: tax, delivery and discount parameters
//! - [`PriceBreakdown`]: engine output

pub mod types;

pub use types::*;
