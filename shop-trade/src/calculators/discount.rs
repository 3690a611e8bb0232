use super::{PriceScope, format_price};
use crate::{Map, allocation::recount_pay_price};
use shop_core::{
    TradeError,
    models::{
        ActivityId, DiscountProduct, DiscountType, MemberLevel, PriceContext, PromotionItem,
        PromotionKind, PromotionRecord,
    },
    ports::PricingRepository,
};

pub(super) async fn calculate<R: PricingRepository>(
    scope: &PriceScope<'_, R>,
    ctx: PriceContext,
) -> Result<PriceContext, TradeError> {
    let sku_ids: Vec<_> = ctx.selected().map(|item| item.sku_id).collect();
    if sku_ids.is_empty() {
        return Ok(ctx);
    }

    let products = scope
        .repository
        .match_discount_products(&sku_ids, scope.as_of)
        .await
        .map_err(TradeError::backend)?;

    let level = match scope
        .repository
        .get_user(scope.request.user_id)
        .await
        .map_err(TradeError::backend)?
        .and_then(|user| user.level_id)
    {
        Some(level_id) => scope
            .repository
            .get_level(level_id)
            .await
            .map_err(TradeError::backend)?,
        None => None,
    };

    Ok(apply_discount(ctx, &products, level.as_ref()))
}

/// Per item, apply the larger of the time-limited discount and the
/// membership tier saving. Ties go to the discount activity.
pub fn apply_discount(
    mut ctx: PriceContext,
    products: &[DiscountProduct],
    level: Option<&MemberLevel>,
) -> PriceContext {
    let products: Map<_, _> = products
        .iter()
        .map(|product| (product.sku_id, product))
        .collect();

    let mut discount_records: Map<ActivityId, PromotionRecord> = Map::default();
    let mut vip_record: Option<PromotionRecord> = None;

    for item in ctx.items.iter_mut().filter(|item| item.selected) {
        let product = products.get(&item.sku_id).copied();
        let discount_saving = product.map_or(0, |p| p.saving(item.pay_price, item.count));
        let vip_saving = level.map_or(0, |level| level.saving(item.pay_price));
        let total_price = item.pay_price;

        match product {
            Some(product) if discount_saving > 0 && discount_saving >= vip_saving => {
                item.discount_price += discount_saving;
                let record = discount_records
                    .entry(product.activity_id)
                    .or_insert_with(|| PromotionRecord {
                        id: product.activity_id.0,
                        name: product.activity_name.clone(),
                        kind: PromotionKind::Discount,
                        total_price: 0,
                        discount_price: 0,
                        matched: true,
                        description: describe(product),
                        items: Vec::new(),
                    });
                record.total_price += total_price;
                record.discount_price += discount_saving;
                record.items.push(PromotionItem {
                    sku_id: item.sku_id,
                    total_price,
                    discount_price: discount_saving,
                });
            }
            _ if vip_saving > 0 => {
                // vip_saving > 0 implies a level
                let Some(level) = level else { continue };
                item.vip_price += vip_saving;
                let record = vip_record.get_or_insert_with(|| PromotionRecord {
                    id: level.id.0,
                    name: level.name.clone(),
                    kind: PromotionKind::MemberLevel,
                    total_price: 0,
                    discount_price: 0,
                    matched: true,
                    description: format!("{}% of the price for {}", level.discount_percent, level.name),
                    items: Vec::new(),
                });
                record.total_price += total_price;
                record.discount_price += vip_saving;
                record.items.push(PromotionItem {
                    sku_id: item.sku_id,
                    total_price,
                    discount_price: vip_saving,
                });
            }
            _ => continue,
        }

        recount_pay_price(item);
    }

    ctx.promotions.extend(discount_records.into_values());
    ctx.promotions.extend(vip_record);
    ctx
}

fn describe(product: &DiscountProduct) -> String {
    match product.discount_type {
        DiscountType::Price => format!("{} off each", format_price(product.discount_price)),
        DiscountType::Percent => format!("{}% of the price", product.discount_percent),
    }
}
