//! Pricing API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /pricing/calculate | POST | 购物车价格明细 |
//! | /pricing/dynamic | POST | 按库存和时段的动态单价 |
//! | /pricing/promo/{code} | GET | 校验优惠码 |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/pricing", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/calculate", post(handler::calculate))
        .route("/dynamic", post(handler::dynamic))
        .route("/promo/{code}", get(handler::validate_promo))
}
