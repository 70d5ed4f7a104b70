//! Shared types for the restaurant pricing workspace
//!
//! Holds everything both the pricing service and its clients need: the
//! order pricing engine ([`order_money`]), the order and menu data model,
//! the wire types of the pricing API and the unified error system.

pub mod error;
pub mod models;
pub mod order;
pub mod order_money;
pub mod request;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{
    AppliedDiscount, DiscountKind, LineItem, Modification, OrderType, PriceBreakdown,
    PricingContext,
};
pub use order_money::{PricingError, compute_breakdown};
