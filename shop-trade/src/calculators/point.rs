use super::{PriceScope, format_price};
use crate::allocation::{divide_price, recount_pay_price, selected_pay_price};
use shop_core::{
    TradeError,
    models::{PointConfig, PriceContext, PromotionItem, PromotionKind, PromotionRecord},
    ports::PricingRepository,
};

pub(super) async fn calculate<R: PricingRepository>(
    scope: &PriceScope<'_, R>,
    mut ctx: PriceContext,
) -> Result<PriceContext, TradeError> {
    if !scope.request.point_status || !scope.config.point.trade_deduct_enable {
        return Ok(ctx);
    }

    let user = scope
        .repository
        .get_user(scope.request.user_id)
        .await
        .map_err(TradeError::backend)?
        .ok_or_else(|| TradeError::NotFound(format!("member {}", scope.request.user_id)))?;
    ctx.total_point = user.point;
    if user.point <= 0 {
        return Ok(ctx);
    }

    apply_point(ctx, user.point, &scope.config.point)
}

/// Deduct points from the selected items.
///
/// Uses `min(balance, max points)` points. The deduction must leave a
/// strictly positive pay price; otherwise the checkout is rejected rather
/// than turned into a free order.
pub fn apply_point(
    mut ctx: PriceContext,
    balance: i64,
    config: &PointConfig,
) -> Result<PriceContext, TradeError> {
    let points = balance.min(config.trade_deduct_max_price);
    if points <= 0 || config.trade_deduct_unit_price <= 0 {
        return Ok(ctx);
    }
    let amount = points * config.trade_deduct_unit_price;

    let total_price = selected_pay_price(&ctx);
    if amount >= total_price {
        return Err(TradeError::PriceIllegal(format!(
            "point deduction of {} would leave nothing to pay",
            format_price(amount)
        )));
    }

    let amount_shares = divide_price(&ctx.items, amount);
    let point_shares = divide_price(&ctx.items, points);

    let mut items = Vec::new();
    for (idx, item) in ctx.items.iter_mut().enumerate() {
        if !item.selected {
            continue;
        }
        items.push(PromotionItem {
            sku_id: item.sku_id,
            total_price: item.pay_price,
            discount_price: amount_shares[idx],
        });
        item.point_price += amount_shares[idx];
        item.use_point += point_shares[idx];
        recount_pay_price(item);
    }

    ctx.promotions.push(PromotionRecord {
        id: 0,
        name: "points".to_owned(),
        kind: PromotionKind::Point,
        total_price,
        discount_price: amount,
        matched: true,
        description: format!("{points} points for {}", format_price(amount)),
        items,
    });
    Ok(ctx)
}
