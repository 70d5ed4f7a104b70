//! Client error types

use shared::{AppError, PricingError};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error envelope returned by the server, or a local domain error
    #[error("{0}")]
    App(#[from] AppError),

    /// Local pricing rejected a cart change
    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Non-success response without a readable error envelope
    #[error("Invalid response ({status}): {body}")]
    InvalidResponse { status: u16, body: String },

    /// Bad client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cart persistence failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
