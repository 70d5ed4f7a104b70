//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric error codes
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: error type with code, message and details
//! - [`ApiResponse`]: unified API response envelope
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! let err = AppError::with_message(ErrorCode::InvalidQuantity, "quantity must be positive")
//!     .with_detail("field", "quantity");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(4101));
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
