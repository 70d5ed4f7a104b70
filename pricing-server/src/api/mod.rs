//! HTTP API 模块
//!
//! - [`health`] - 健康检查
//! - [`pricing`] - 订单定价、动态定价、优惠码

pub mod health;
pub mod pricing;
