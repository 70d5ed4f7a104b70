//! Pricing Client - HTTP client and local cart for the pricing service
//!
//! - [`PricingClient`]: network calls to the pricing API
//! - [`CartStore`]: client-side cart that re-prices on every change

pub mod cart;
pub mod config;
pub mod error;
pub mod http;

pub use cart::{CartLine, CartSnapshot, CartStore};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::PricingClient;

// Re-export shared types for convenience
pub use shared::request::CalculateRequest;
pub use shared::response::{CalculateResponse, HealthResponse, PromoValidation};
pub use shared::{LineItem, Modification, OrderType, PriceBreakdown, PricingContext};
