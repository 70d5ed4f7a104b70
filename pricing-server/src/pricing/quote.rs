//! Order Quote
//!
//! Turns a `/pricing/calculate` request into a breakdown plus the discount
//! lines shown to the customer. Promo amounts are resolved against a first
//! pass over the cart and then fed back into the engine as the context's
//! discount.

use rust_decimal::Decimal;
use shared::order_money::{round_money, to_decimal, to_f64};
use shared::request::CalculateRequest;
use shared::response::CalculateResponse;
use shared::{
    AppliedDiscount, DiscountKind, OrderType, PricingContext, PricingError, compute_breakdown,
};

use super::promo::PromoCatalog;

/// Price a cart for the given order type and optional promo code
///
/// Unknown or inapplicable promo codes are ignored; only invalid line items
/// or an invalid context fail the quote.
pub fn quote(
    req: &CalculateRequest,
    base: &PricingContext,
    promos: &PromoCatalog,
) -> Result<CalculateResponse, PricingError> {
    let context = match req.order_type {
        OrderType::Delivery => base.with_discount(0.0),
        OrderType::Pickup => base.without_delivery().with_discount(0.0),
    };

    let preliminary = compute_breakdown(&req.items, &context)?;
    let mut applied_discounts = Vec::new();

    let waived_fee = round_money(to_decimal(context.delivery_fee_flat));
    if req.order_type == OrderType::Delivery
        && preliminary.delivery_fee == 0.0
        && waived_fee > Decimal::ZERO
    {
        applied_discounts.push(AppliedDiscount {
            kind: DiscountKind::FreeDelivery,
            code: None,
            description: format!(
                "Free delivery on orders over ${:.2}",
                context.free_delivery_threshold
            ),
            amount: to_f64(waived_fee),
        });
    }

    let promo = req
        .promo_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .and_then(|code| {
            let resolved = promos.resolve(code, preliminary.subtotal, preliminary.delivery_fee);
            if resolved.is_none() {
                tracing::debug!(code, subtotal = preliminary.subtotal, "Promo code not applied");
            }
            resolved
        });

    let Some(promo) = promo else {
        return Ok(CalculateResponse {
            breakdown: preliminary,
            applied_discounts,
        });
    };

    let breakdown = compute_breakdown(&req.items, &context.with_discount(promo.amount))?;
    applied_discounts.push(promo);

    Ok(CalculateResponse {
        breakdown,
        applied_discounts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::LineItem;

    fn base() -> PricingContext {
        PricingContext::new(0.0875, 3.99, 25.0)
    }

    fn promos() -> PromoCatalog {
        PromoCatalog::from_json(
            r#"[
                {"code": "WELCOME10", "kind": "percentage", "value": 0.10, "min_order": 15.00},
                {"code": "SAVE5", "kind": "fixed", "value": 5.00, "min_order": 20.00},
                {"code": "FREESHIP", "kind": "free_delivery"}
            ]"#,
        )
        .unwrap()
    }

    fn request(items: Vec<LineItem>, order_type: OrderType, promo: Option<&str>) -> CalculateRequest {
        CalculateRequest {
            items,
            order_type,
            promo_code: promo.map(str::to_string),
        }
    }

    #[test]
    fn test_delivery_below_threshold() {
        let req = request(
            vec![LineItem::new(12.99, 1).with_modification("Extra cheese", 1.50)],
            OrderType::Delivery,
            None,
        );
        let resp = quote(&req, &base(), &promos()).unwrap();
        assert_eq!(resp.breakdown.subtotal, 14.49);
        assert_eq!(resp.breakdown.tax_amount, 1.27);
        assert_eq!(resp.breakdown.delivery_fee, 3.99);
        assert_eq!(resp.breakdown.total, 19.75);
        assert!(resp.applied_discounts.is_empty());
    }

    #[test]
    fn test_pickup_never_pays_delivery() {
        let req = request(vec![LineItem::new(10.0, 1)], OrderType::Pickup, None);
        let resp = quote(&req, &base(), &promos()).unwrap();
        assert_eq!(resp.breakdown.delivery_fee, 0.0);
        assert_eq!(resp.breakdown.total, 10.88); // 10 + 0.875 -> 0.88
        assert!(resp.applied_discounts.is_empty());
    }

    #[test]
    fn test_free_delivery_is_informational() {
        let req = request(vec![LineItem::new(25.0, 1)], OrderType::Delivery, None);
        let resp = quote(&req, &base(), &promos()).unwrap();
        assert_eq!(resp.breakdown.delivery_fee, 0.0);
        assert_eq!(resp.breakdown.discount_amount, 0.0);
        assert_eq!(resp.breakdown.total, 27.19); // 25 + 2.1875 -> 2.19
        assert_eq!(resp.applied_discounts.len(), 1);
        assert_eq!(resp.applied_discounts[0].kind, DiscountKind::FreeDelivery);
        assert_eq!(resp.applied_discounts[0].amount, 3.99);
    }

    #[test]
    fn test_percentage_promo_applied() {
        let req = request(vec![LineItem::new(20.0, 1)], OrderType::Delivery, Some("welcome10"));
        let resp = quote(&req, &base(), &promos()).unwrap();
        assert_eq!(resp.breakdown.discount_amount, 2.0);
        // 20 + 1.75 + 3.99 - 2.00
        assert_eq!(resp.breakdown.total, 23.74);
        assert_eq!(resp.applied_discounts.len(), 1);
        assert_eq!(resp.applied_discounts[0].code.as_deref(), Some("WELCOME10"));
    }

    #[test]
    fn test_free_delivery_promo_nets_out_fee() {
        let req = request(vec![LineItem::new(10.0, 1)], OrderType::Delivery, Some("FREESHIP"));
        let resp = quote(&req, &base(), &promos()).unwrap();
        assert_eq!(resp.breakdown.delivery_fee, 3.99);
        assert_eq!(resp.breakdown.discount_amount, 3.99);
        assert_eq!(resp.breakdown.total, 10.88);
    }

    #[test]
    fn test_free_delivery_promo_on_pickup_is_ignored() {
        let req = request(vec![LineItem::new(10.0, 1)], OrderType::Pickup, Some("FREESHIP"));
        let resp = quote(&req, &base(), &promos()).unwrap();
        assert_eq!(resp.breakdown.discount_amount, 0.0);
        assert!(resp.applied_discounts.is_empty());
    }

    #[test]
    fn test_unknown_or_blank_promo_ignored() {
        for code in ["NOPE", "   ", "SAVE5"] {
            let req = request(vec![LineItem::new(10.0, 1)], OrderType::Delivery, Some(code));
            let resp = quote(&req, &base(), &promos()).unwrap();
            assert_eq!(resp.breakdown.discount_amount, 0.0, "code {:?}", code);
        }
    }

    #[test]
    fn test_discount_ignores_caller_context_discount() {
        let req = request(vec![LineItem::new(10.0, 1)], OrderType::Delivery, None);
        let resp = quote(&req, &base().with_discount(50.0), &promos()).unwrap();
        assert_eq!(resp.breakdown.discount_amount, 0.0);
    }

    #[test]
    fn test_invalid_item_fails() {
        let req = request(vec![LineItem::new(10.0, 0)], OrderType::Delivery, None);
        let err = quote(&req, &base(), &promos()).unwrap_err();
        assert_eq!(err.code(), shared::ErrorCode::InvalidQuantity);
    }
}
