use super::{PriceScope, format_price};
use crate::{
    Set,
    allocation::{divide_price, recount_pay_price, selected_pay_price},
};
use shop_core::{
    TradeError,
    models::{CouponQuote, PriceContext, PromotionItem, PromotionKind, PromotionRecord},
    ports::PricingRepository,
};

pub(super) async fn calculate<R: PricingRepository>(
    scope: &PriceScope<'_, R>,
    ctx: PriceContext,
) -> Result<PriceContext, TradeError> {
    let Some(coupon_id) = scope.request.coupon_id else {
        return Ok(ctx);
    };

    let spu_ids: Vec<_> = ctx
        .selected()
        .map(|item| item.spu_id)
        .collect::<Set<_>>()
        .into_iter()
        .collect();
    let category_ids: Vec<_> = ctx
        .selected()
        .map(|item| item.category_id)
        .collect::<Set<_>>()
        .into_iter()
        .collect();

    let quote = scope
        .repository
        .calculate_coupon(
            scope.request.user_id,
            coupon_id,
            selected_pay_price(&ctx),
            &spu_ids,
            &category_ids,
            scope.as_of,
        )
        .await
        .map_err(TradeError::backend)??;

    Ok(apply_coupon(ctx, &quote))
}

/// Divide the coupon's discount, capped at the current pay price, over the selected items.
pub fn apply_coupon(mut ctx: PriceContext, quote: &CouponQuote) -> PriceContext {
    let total_price = selected_pay_price(&ctx);
    let amount = quote.discount_price.clamp(0, total_price);
    let shares = divide_price(&ctx.items, amount);

    let mut items = Vec::new();
    for (item, share) in ctx.items.iter_mut().zip(&shares) {
        if !item.selected {
            continue;
        }
        items.push(PromotionItem {
            sku_id: item.sku_id,
            total_price: item.pay_price,
            discount_price: *share,
        });
        item.coupon_price += share;
        recount_pay_price(item);
    }

    ctx.coupon_id = Some(quote.coupon_id);
    ctx.promotions.push(PromotionRecord {
        id: quote.coupon_id.0,
        name: quote.name.clone(),
        kind: PromotionKind::Coupon,
        total_price,
        discount_price: amount,
        matched: true,
        description: format!("coupon saves {}", format_price(amount)),
        items,
    });
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::recount_totals;
    use shop_core::models::{CouponId, PricedItem};

    fn context() -> PriceContext {
        let items = [(1000, true), (2000, true), (500, false)]
            .into_iter()
            .map(|(price, selected)| {
                let mut item = PricedItem {
                    price,
                    count: 1,
                    selected,
                    ..Default::default()
                };
                recount_pay_price(&mut item);
                item
            })
            .collect();
        PriceContext {
            items,
            ..Default::default()
        }
    }

    fn quote(discount_price: i64) -> CouponQuote {
        CouponQuote {
            coupon_id: CouponId(4),
            name: "welcome".into(),
            discount_price,
        }
    }

    #[test]
    fn test_coupon_is_divided() {
        let mut ctx = apply_coupon(context(), &quote(150));
        recount_totals(&mut ctx);

        assert_eq!(ctx.items[0].coupon_price, 50);
        assert_eq!(ctx.items[1].coupon_price, 100);
        assert_eq!(ctx.items[2].coupon_price, 0);
        assert_eq!(ctx.price.coupon_price, 150);
        assert_eq!(ctx.price.pay_price, 2850);
        assert_eq!(ctx.coupon_id, Some(CouponId(4)));
    }

    #[test]
    fn test_coupon_is_capped_at_pay_price() {
        let mut ctx = apply_coupon(context(), &quote(10_000));
        recount_totals(&mut ctx);

        assert_eq!(ctx.price.coupon_price, 3000);
        assert_eq!(ctx.price.pay_price, 0);
        assert_eq!(ctx.promotions[0].discount_price, 3000);
    }
}
