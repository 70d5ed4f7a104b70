//! Unified error codes for the pricing workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order / pricing errors
//! - 5xxx: Promotion errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values on the wire so that the storefront can match on
/// them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Quantity is zero, negative or above the allowed maximum
    InvalidQuantity = 4101,
    /// Monetary amount is negative, non-finite or above the allowed maximum
    InvalidAmount = 4102,
    /// Tax rate outside [0, 1)
    InvalidTaxRate = 4103,
    /// Cart line does not exist
    CartLineNotFound = 4201,

    // ==================== 5xxx: Promotion ====================
    /// Promo code unknown or not applicable
    PromoCodeInvalid = 5001,
    /// Promo rule definition is malformed
    PromoRuleInvalid = 5002,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    NetworkError = 9003,
    TimeoutError = 9004,
    ConfigError = 9005,
    /// CMS returned an unexpected response
    UpstreamError = 9006,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default human readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::InvalidQuantity => "Invalid quantity",
            ErrorCode::InvalidAmount => "Invalid amount",
            ErrorCode::InvalidTaxRate => "Tax rate must be in [0, 1)",
            ErrorCode::CartLineNotFound => "Cart line not found",

            // Promotion
            ErrorCode::PromoCodeInvalid => "Invalid or expired promo code",
            ErrorCode::PromoRuleInvalid => "Promo rule is invalid",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::UpstreamError => "Upstream service error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4101 => Ok(ErrorCode::InvalidQuantity),
            4102 => Ok(ErrorCode::InvalidAmount),
            4103 => Ok(ErrorCode::InvalidTaxRate),
            4201 => Ok(ErrorCode::CartLineNotFound),

            // Promotion
            5001 => Ok(ErrorCode::PromoCodeInvalid),
            5002 => Ok(ErrorCode::PromoRuleInvalid),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::UpstreamError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
