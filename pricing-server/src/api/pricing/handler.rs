//! Pricing API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::DynamicPrice;
use shared::order_money::{to_decimal, to_f64};
use shared::request::{CalculateRequest, DynamicPricingRequest, PromoQuery};
use shared::response::{CalculateResponse, PromoValidation};

use crate::core::ServerState;
use crate::pricing::{dynamic_prices, quote};
use crate::utils::{AppError, AppResult, ErrorCode};

/// POST /pricing/calculate - 计算订单价格明细
pub async fn calculate(
    State(state): State<ServerState>,
    Json(payload): Json<CalculateRequest>,
) -> AppResult<Json<CalculateResponse>> {
    let response = quote(&payload, &state.pricing_context, &state.promos)?;

    tracing::debug!(
        items = payload.items.len(),
        order_type = ?payload.order_type,
        total = response.breakdown.total,
        "Order priced"
    );
    Ok(Json(response))
}

/// POST /pricing/dynamic - 获取动态单价
///
/// 菜单拉取失败返回错误；库存拉取失败时按无库存数据计算。
pub async fn dynamic(
    State(state): State<ServerState>,
    Json(payload): Json<DynamicPricingRequest>,
) -> AppResult<Json<Vec<DynamicPrice>>> {
    if payload.item_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let menu = state.menu_source.fetch_menu_items(&payload.item_ids).await?;
    let inventory = match state.menu_source.fetch_inventory(&payload.item_ids).await {
        Ok(levels) => levels,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch inventory, pricing without stock levels");
            Vec::new()
        }
    };

    let hour = state.clock.hour();
    Ok(Json(dynamic_prices(&payload.item_ids, &menu, &inventory, hour)))
}

/// GET /pricing/promo/{code}?subtotal= - 校验优惠码
pub async fn validate_promo(
    State(state): State<ServerState>,
    Path(code): Path<String>,
    Query(query): Query<PromoQuery>,
) -> AppResult<Json<PromoValidation>> {
    if !query.subtotal.is_finite() || query.subtotal < 0.0 {
        return Err(AppError::validation(format!(
            "subtotal must be a non-negative number, got {}",
            query.subtotal
        ))
        .with_detail("field", "subtotal"));
    }

    let context = &state.pricing_context;
    let subtotal = to_f64(to_decimal(query.subtotal));
    let delivery_fee = if subtotal >= context.free_delivery_threshold {
        0.0
    } else {
        context.delivery_fee_flat
    };

    let result = match state.promos.resolve(&code, subtotal, delivery_fee) {
        Some(discount) => PromoValidation::accepted(discount),
        None => PromoValidation::rejected(ErrorCode::PromoCodeInvalid.message()),
    };
    Ok(Json(result))
}
