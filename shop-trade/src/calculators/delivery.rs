use super::PriceScope;
use crate::{
    Map,
    allocation::{recount_totals, selected_pay_price},
};
use shop_core::{
    TradeError,
    models::{AreaId, ChargeMode, DeliveryTemplate, DeliveryType, PriceContext, PricedItem},
    ports::PricingRepository,
};

pub(super) async fn calculate<R: PricingRepository>(
    scope: &PriceScope<'_, R>,
    ctx: PriceContext,
) -> Result<PriceContext, TradeError> {
    let delivery_type = scope.request.delivery_type;
    if let Some(item) = ctx
        .selected()
        .find(|item| !item.delivery_types.contains(&delivery_type))
    {
        return Err(TradeError::Ineligible(format!(
            "{} does not support {delivery_type:?} delivery",
            item.spu_name
        )));
    }

    match delivery_type {
        DeliveryType::PickUp => {
            if let Some(store_id) = scope.request.pick_up_store_id {
                let enabled = scope
                    .repository
                    .pick_up_store_enabled(store_id)
                    .await
                    .map_err(TradeError::backend)?;
                if !enabled {
                    return Err(TradeError::NotFound(format!("pick-up store {store_id}")));
                }
            }
            Ok(apply_delivery_fee(ctx, 0))
        }
        DeliveryType::Express => {
            // previews without an address are priced without shipping
            let Some(address_id) = scope.request.address_id else {
                return Ok(ctx);
            };

            let config = scope.config;
            if config.delivery_express_free_enabled
                && selected_pay_price(&ctx) >= config.delivery_express_free_price
            {
                return Ok(apply_delivery_fee(ctx, 0));
            }

            let address = scope
                .repository
                .get_address(scope.request.user_id, address_id)
                .await
                .map_err(TradeError::backend)?
                .ok_or_else(|| TradeError::NotFound(format!("address {address_id}")))?;

            let mut template_ids = Vec::new();
            for item in chargeable(&ctx) {
                let template_id = item.delivery_template_id.ok_or_else(|| {
                    TradeError::NotFound(format!("delivery template of {}", item.spu_name))
                })?;
                if !template_ids.contains(&template_id) {
                    template_ids.push(template_id);
                }
            }
            if template_ids.is_empty() {
                return Ok(apply_delivery_fee(ctx, 0));
            }

            let templates = scope
                .repository
                .get_delivery_templates(&template_ids)
                .await
                .map_err(TradeError::backend)?;

            let fee = shipping_fee(&ctx, &templates, address.area_id)?;
            Ok(apply_delivery_fee(ctx, fee))
        }
    }
}

/// Selected items whose shipping has not been waived.
fn chargeable(ctx: &PriceContext) -> impl Iterator<Item = &PricedItem> {
    ctx.selected().filter(|item| !item.free_delivery)
}

/// The express fee of an order: items are grouped by freight template, each
/// template charges once for its whole group, and the fees are summed.
pub fn shipping_fee(
    ctx: &PriceContext,
    templates: &[DeliveryTemplate],
    area_id: AreaId,
) -> Result<i64, TradeError> {
    let mut groups: Map<_, Vec<&PricedItem>> = Map::default();
    for item in chargeable(ctx) {
        let template_id = item.delivery_template_id.ok_or_else(|| {
            TradeError::NotFound(format!("delivery template of {}", item.spu_name))
        })?;
        groups.entry(template_id).or_default().push(item);
    }

    let mut fee = 0;
    for (template_id, items) in groups {
        let template = templates
            .iter()
            .find(|template| template.id == template_id)
            .ok_or_else(|| TradeError::NotFound(format!("delivery template {template_id}")))?;

        let quantity: i64 = items
            .iter()
            .map(|item| {
                let count = item.count as i64;
                match template.charge_mode {
                    ChargeMode::Count => count,
                    ChargeMode::Weight => item.weight * count,
                    ChargeMode::Volume => item.volume * count,
                }
            })
            .sum();
        let subtotal: i64 = items.iter().map(|item| item.pay_price).sum();

        fee += template
            .compute_fee(area_id, quantity, subtotal)
            .ok_or_else(|| {
                TradeError::Ineligible(format!(
                    "{} does not deliver to area {area_id}",
                    template.name
                ))
            })?;
    }

    Ok(fee)
}

/// Set the order-level shipping fee. The fee is not divided into the items.
pub fn apply_delivery_fee(mut ctx: PriceContext, fee: i64) -> PriceContext {
    ctx.price.delivery_price = fee;
    recount_totals(&mut ctx);
    ctx
}
