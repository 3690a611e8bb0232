use crate::{
    Map, Set,
    allocation::{recount_pay_price, recount_totals},
    calculators::PriceScope,
    pipeline::Pipeline,
};
use shop_core::{
    TradeError,
    models::{
        DeliveryType, OrderType, PriceContext, PriceRequest, PricedItem, RequestItem, SkuId,
        SkuPrice, SpuStatus, UserId,
    },
    ports::{Application, PricingRepository},
};
use std::sync::LazyLock;

static CHECKOUT: LazyLock<Pipeline> = LazyLock::new(Pipeline::default);
static PREVIEW: LazyLock<Pipeline> = LazyLock::new(Pipeline::preview);

/// Price a checkout request.
///
/// Stock is checked against the current inventory; use
/// [`calculate_sku_prices`] for listings that must not depend on it.
pub async fn calculate_price<T: Application>(
    app: &T,
    request: &PriceRequest,
) -> Result<PriceContext, TradeError> {
    validate_request(request)?;
    let scope = PriceScope {
        request,
        repository: app.database(),
        config: app.config(),
        as_of: app.now(),
    };
    price(&CHECKOUT, &scope, true).await
}

/// The best promotional unit price of each SKU for `user_id`.
///
/// Every SKU is priced on its own as a single unit, with reward, discount
/// and membership savings only and no stock check.
pub async fn calculate_sku_prices<T: Application>(
    app: &T,
    user_id: UserId,
    sku_ids: &[SkuId],
) -> Result<Vec<SkuPrice>, TradeError> {
    let as_of = app.now();
    let mut prices = Vec::with_capacity(sku_ids.len());
    for sku_id in sku_ids.iter().copied().collect::<Set<_>>() {
        let request = PriceRequest {
            user_id,
            coupon_id: None,
            point_status: false,
            delivery_type: DeliveryType::Express,
            address_id: None,
            pick_up_store_id: None,
            seckill_activity_id: None,
            combination_activity_id: None,
            combination_head_id: None,
            bargain_record_id: None,
            point_activity_id: None,
            items: vec![RequestItem {
                sku_id,
                count: 1,
                cart_id: None,
                selected: true,
            }],
        };
        let scope = PriceScope {
            request: &request,
            repository: app.database(),
            config: app.config(),
            as_of,
        };
        let ctx = price(&PREVIEW, &scope, false).await?;
        prices.push(SkuPrice {
            sku_id,
            price: ctx.price.total_price,
            pay_price: ctx.price.pay_price,
        });
    }
    Ok(prices)
}

/// Reject malformed requests before any lookup or pricing happens.
pub fn validate_request(request: &PriceRequest) -> Result<(), TradeError> {
    if request.items.is_empty() {
        return Err(TradeError::Validation("no items".to_owned()));
    }
    if let Some(item) = request.items.iter().find(|item| item.count <= 0) {
        return Err(TradeError::Validation(format!(
            "count of sku {} must be positive",
            item.sku_id
        )));
    }
    if !request.items.iter().any(|item| item.selected) {
        return Err(TradeError::Validation("no item is selected".to_owned()));
    }

    let selectors = request.exclusive_selectors();
    if selectors.len() > 1 {
        return Err(TradeError::Validation(
            "at most one exclusive activity may be used".to_owned(),
        ));
    }
    if !selectors.is_empty() && request.items.len() != 1 {
        return Err(TradeError::Ineligible(
            "exclusive activities allow exactly one item".to_owned(),
        ));
    }
    if request.combination_head_id.is_some() && request.combination_activity_id.is_none() {
        return Err(TradeError::Validation(
            "joining a group requires its activity".to_owned(),
        ));
    }
    if request.delivery_type == DeliveryType::PickUp && request.pick_up_store_id.is_none() {
        return Err(TradeError::Validation(
            "pick-up requires a store".to_owned(),
        ));
    }
    Ok(())
}

async fn price<R: PricingRepository>(
    pipeline: &Pipeline,
    scope: &PriceScope<'_, R>,
    check_stock: bool,
) -> Result<PriceContext, TradeError> {
    let request = scope.request;
    let ctx = build_context(scope, check_stock).await?;
    let ctx = pipeline.run(scope, ctx).await?;

    if ctx.items.len() != request.items.len() {
        return Err(TradeError::Conflict(
            "priced items do not match the request".to_owned(),
        ));
    }
    if ctx.order_type != OrderType::Point && ctx.price.pay_price <= 0 {
        return Err(TradeError::PriceIllegal(format!(
            "pay price {} must be positive",
            ctx.price.pay_price
        )));
    }

    Ok(ctx)
}

/// Look up the catalog and snapshot each requested line.
async fn build_context<R: PricingRepository>(
    scope: &PriceScope<'_, R>,
    check_stock: bool,
) -> Result<PriceContext, TradeError> {
    let request = scope.request;
    let repository = scope.repository;

    let sku_ids: Vec<_> = request
        .items
        .iter()
        .map(|item| item.sku_id)
        .collect::<Set<_>>()
        .into_iter()
        .collect();
    let skus: Map<_, _> = repository
        .get_skus(&sku_ids)
        .await
        .map_err(TradeError::backend)?
        .into_iter()
        .map(|sku| (sku.id, sku))
        .collect();

    let spu_ids: Vec<_> = skus
        .values()
        .map(|sku| sku.spu_id)
        .collect::<Set<_>>()
        .into_iter()
        .collect();
    let spus: Map<_, _> = repository
        .get_spus(&spu_ids)
        .await
        .map_err(TradeError::backend)?
        .into_iter()
        .map(|spu| (spu.id, spu))
        .collect();

    let mut items = Vec::with_capacity(request.items.len());
    for line in &request.items {
        let sku = skus
            .get(&line.sku_id)
            .ok_or_else(|| TradeError::NotFound(format!("sku {}", line.sku_id)))?;
        let spu = spus
            .get(&sku.spu_id)
            .ok_or_else(|| TradeError::NotFound(format!("spu {}", sku.spu_id)))?;
        if spu.status != SpuStatus::Enable {
            return Err(TradeError::Conflict(format!("{} is not on sale", spu.name)));
        }
        if check_stock && line.count > sku.stock {
            return Err(TradeError::StockInsufficient { sku_id: sku.id });
        }

        let mut item = PricedItem {
            sku_id: sku.id,
            spu_id: spu.id,
            spu_name: spu.name.clone(),
            pic_url: sku.pic_url.clone().or_else(|| spu.pic_url.clone()),
            properties: sku.properties.clone(),
            count: line.count,
            cart_id: line.cart_id,
            selected: line.selected,
            price: sku.price,
            give_point: spu.give_point as i64 * line.count as i64,
            category_id: spu.category_id,
            delivery_template_id: spu.delivery_template_id,
            delivery_types: spu.delivery_types.clone(),
            weight: sku.weight,
            volume: sku.volume,
            ..Default::default()
        };
        recount_pay_price(&mut item);
        items.push(item);
    }

    let mut ctx = PriceContext {
        order_type: request.order_type(),
        items,
        ..Default::default()
    };
    recount_totals(&mut ctx);
    Ok(ctx)
}
