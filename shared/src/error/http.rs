//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::CartLineNotFound => StatusCode::NOT_FOUND,

            // Transient, the caller may retry
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            Self::UpstreamError => StatusCode::BAD_GATEWAY,

            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // Validation and business errors
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
