//! 工具模块 - 日志和时间
//!
//! 错误类型统一来自 `shared::error`，此处只做重导出。

pub mod logger;
pub mod time;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use time::BusinessClock;
