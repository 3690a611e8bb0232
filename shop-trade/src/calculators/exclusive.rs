use super::{PriceScope, format_price};
use crate::allocation::recount_pay_price;
use shop_core::{
    TradeError,
    models::{ExclusiveKind, ExclusiveQuery, ExclusiveQuote, PriceContext, PromotionItem, PromotionRecord},
    ports::PricingRepository,
};

pub(super) async fn calculate<R: PricingRepository>(
    scope: &PriceScope<'_, R>,
    ctx: PriceContext,
) -> Result<PriceContext, TradeError> {
    let Some((kind, activity_id)) = scope.request.exclusive() else {
        return Ok(ctx);
    };
    let [item] = ctx.items.as_slice() else {
        return Err(TradeError::Ineligible(
            "exclusive activities allow exactly one item".to_owned(),
        ));
    };

    let query = ExclusiveQuery {
        kind,
        activity_id,
        sku_id: item.sku_id,
        count: item.count,
        user_id: scope.request.user_id,
    };
    let quote = scope
        .repository
        .price_exclusive(&query, scope.as_of)
        .await
        .map_err(TradeError::backend)??;

    apply_exclusive(ctx, kind, &quote)
}

/// Replace the single line's price with the activity's negotiated price.
pub fn apply_exclusive(
    mut ctx: PriceContext,
    kind: ExclusiveKind,
    quote: &ExclusiveQuote,
) -> Result<PriceContext, TradeError> {
    let [item] = ctx.items.as_mut_slice() else {
        return Err(TradeError::Ineligible(
            "exclusive activities allow exactly one item".to_owned(),
        ));
    };

    // a negative discount would raise the price above what the catalog lists
    if !(0..=item.price).contains(&quote.unit_price) {
        return Err(TradeError::PriceIllegal(format!(
            "activity price {} is outside 0..={}",
            format_price(quote.unit_price),
            format_price(item.price)
        )));
    }

    let count = item.count as i64;
    let total_price = item.total();
    item.discount_price = (item.price - quote.unit_price) * count;
    if kind == ExclusiveKind::Point {
        item.use_point = quote.unit_point * count;
    }
    recount_pay_price(item);

    let description = match kind {
        ExclusiveKind::Point if quote.unit_point > 0 => format!(
            "{} points + {} each",
            quote.unit_point,
            format_price(quote.unit_price)
        ),
        _ => format!("{} each", format_price(quote.unit_price)),
    };
    let record = PromotionRecord {
        id: quote.activity_id.0,
        name: quote.name.clone(),
        kind: kind.promotion_kind(),
        total_price,
        discount_price: item.discount_price,
        matched: true,
        description,
        items: vec![PromotionItem {
            sku_id: item.sku_id,
            total_price,
            discount_price: item.discount_price,
        }],
    };

    ctx.activity_id = Some(quote.activity_id);
    ctx.promotions.push(record);
    Ok(ctx)
}
