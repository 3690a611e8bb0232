use crate::pricing::calculate_price;
use rand::Rng;
use shop_core::{
    TradeError,
    models::{
        ActivityReservation, CancelType, DeliveryType, ExclusiveKind, LogisticsId, Operator, Order,
        OrderDraft, OrderId, OrderItemDraft, OrderLog, OrderRecord, PayOrderId, PriceContext,
        PriceRequest, Receiver, UserId, UserType,
    },
    ports::{Application, MemberRepository, OrderFailure, OrderRepository},
};

/// Prefix of order numbers
pub const ORDER_NO_PREFIX: &str = "o";

/// Unpaid orders closed by one run of [`cancel_expired_orders`]
pub const EXPIRE_BATCH: u32 = 500;

/// Fresh pick-up codes tried before a checkout gives up
const VERIFY_CODE_ATTEMPTS: usize = 5;

/// Check out a request.
///
/// The request is priced again with a stock check, turned into a draft and
/// committed as a single unit of work. A refusal inside that unit of work
/// (stock taken by a concurrent order, coupon consumed, ...) rolls back
/// everything and is reported as the matching domain error.
pub async fn create_order<T: Application>(
    app: &T,
    request: &PriceRequest,
    remark: Option<String>,
) -> Result<OrderRecord, TradeError> {
    let ctx = calculate_price(app, request).await?;
    let repository = app.database();

    let receiver = match request.delivery_type {
        DeliveryType::Express => {
            let address_id = request.address_id.ok_or_else(|| {
                TradeError::Validation("express delivery requires an address".to_owned())
            })?;
            let address = repository
                .get_address(request.user_id, address_id)
                .await
                .map_err(TradeError::backend)?
                .ok_or_else(|| TradeError::NotFound(format!("address {address_id}")))?;
            Some(Receiver {
                name: address.name,
                mobile: address.mobile,
                area_id: address.area_id,
                detail_address: address.detail_address,
            })
        }
        DeliveryType::PickUp => None,
    };

    let now = app.now();
    let no = repository
        .next_order_no(ORDER_NO_PREFIX, now)
        .await
        .map_err(TradeError::backend)?;
    let pick_up_verify_code =
        (request.delivery_type == DeliveryType::PickUp).then(generate_verify_code);

    let config = app.config();
    let mut draft = OrderDraft {
        no,
        order_type: ctx.order_type,
        user_id: request.user_id,
        remark,
        delivery_type: request.delivery_type,
        receiver,
        pick_up_store_id: request.pick_up_store_id,
        pick_up_verify_code,
        price: ctx.price,
        coupon_id: ctx.coupon_id,
        use_point: ctx.use_point,
        give_point: ctx.give_point,
        activity: reservation(request, &ctx),
        subject: subject(&ctx),
        items: draft_items(&ctx),
        pay_app_id: config.pay_app_id,
        pay_expire_at: now.plus(config.pay_expire),
        created_at: now,
    };

    let mut attempts = 1;
    let record = loop {
        match repository
            .create_order(draft.clone())
            .await
            .map_err(TradeError::aborted)?
        {
            Err(OrderFailure::VerifyCodeTaken) if attempts < VERIFY_CODE_ATTEMPTS => {
                tracing::debug!(no = draft.no, attempts, "verify code taken, drawing another");
                attempts += 1;
                draft.pick_up_verify_code = Some(generate_verify_code());
            }
            outcome => break outcome?,
        }
    };

    tracing::info!(
        order_id = %record.order.id,
        no = record.order.no,
        pay_price = record.order.price.pay_price,
        "created order"
    );
    Ok(record)
}

/// The exclusive activity side effects of a checkout, if any.
fn reservation(request: &PriceRequest, ctx: &PriceContext) -> Option<ActivityReservation> {
    let (kind, selector) = request.exclusive()?;
    let item = ctx.selected().next()?;
    Some(ActivityReservation {
        kind,
        activity_id: ctx.activity_id.unwrap_or(selector),
        record_id: (kind == ExclusiveKind::Bargain).then_some(selector),
        combination_head_id: request.combination_head_id,
        sku_id: item.sku_id,
        count: item.count,
    })
}

fn draft_items(ctx: &PriceContext) -> Vec<OrderItemDraft> {
    ctx.selected()
        .map(|item| OrderItemDraft {
            cart_id: item.cart_id,
            sku_id: item.sku_id,
            spu_id: item.spu_id,
            spu_name: item.spu_name.clone(),
            pic_url: item.pic_url.clone(),
            properties: item.properties.clone(),
            count: item.count,
            price: item.price,
            discount_price: item.discount_price,
            delivery_price: item.delivery_price,
            coupon_price: item.coupon_price,
            point_price: item.point_price,
            use_point: item.use_point,
            vip_price: item.vip_price,
            pay_price: item.pay_price,
            give_point: item.give_point,
        })
        .collect()
}

/// The payment subject: the first product name, and how many others follow.
fn subject(ctx: &PriceContext) -> String {
    let mut names = ctx.selected().map(|item| item.spu_name.as_str());
    let first = names.next().unwrap_or_default();
    match names.count() {
        0 => first.to_owned(),
        more => format!("{first} and {more} more"),
    }
}

/// An 8-digit code shown to the buyer and verified at the store.
fn generate_verify_code() -> String {
    format!("{:08}", rand::rng().random_range(0..100_000_000u32))
}

/// Get an order with its items
pub async fn get_order<T: Application>(
    app: &T,
    order_id: OrderId,
) -> Result<OrderRecord, TradeError> {
    app.database()
        .get_order(order_id)
        .await
        .map_err(TradeError::backend)?
        .ok_or_else(|| TradeError::NotFound(format!("order {order_id}")))
}

/// Get the audit log of an order, oldest first
pub async fn get_order_logs<T: Application>(
    app: &T,
    order_id: OrderId,
) -> Result<Vec<OrderLog>, TradeError> {
    app.database()
        .get_order_logs(order_id)
        .await
        .map_err(TradeError::backend)
}

/// Handle the payment callback for an order.
pub async fn pay_order<T: Application>(
    app: &T,
    order_id: OrderId,
    pay_order_id: PayOrderId,
) -> Result<Order, TradeError> {
    let order = app
        .database()
        .pay_order(order_id, pay_order_id, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(order_id = %order.id, %pay_order_id, "order paid");
    Ok(order)
}

/// Cancel an unpaid order.
///
/// The cancel type follows from the operator: buyers cancel as
/// `UserCancel`, staff as `AdminCancel` and the system as `PayTimeout`.
pub async fn cancel_order<T: Application>(
    app: &T,
    order_id: OrderId,
    operator: Operator,
) -> Result<Order, TradeError> {
    let cancel_type = match operator.user_type {
        UserType::Member => CancelType::UserCancel,
        UserType::Admin => CancelType::AdminCancel,
        UserType::System => CancelType::PayTimeout,
    };
    let order = app
        .database()
        .cancel_order(order_id, operator, cancel_type, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(order_id = %order.id, ?cancel_type, "order canceled");
    Ok(order)
}

/// Cancel a paid order that has not shipped yet, refunding it in full.
pub async fn cancel_paid_order<T: Application>(
    app: &T,
    order_id: OrderId,
    operator: Operator,
    cancel_type: CancelType,
) -> Result<Order, TradeError> {
    let order = app
        .database()
        .cancel_paid_order(order_id, operator, cancel_type, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(
        order_id = %order.id,
        ?cancel_type,
        refund_price = order.refund_price,
        "paid order canceled"
    );
    Ok(order)
}

/// Close the unpaid orders whose payment window has passed.
///
/// Each order is canceled in its own transaction. An order that changed
/// status in the meantime (typically paid at the last moment) is skipped.
/// Returns how many orders were canceled.
pub async fn cancel_expired_orders<T: Application>(app: &T) -> Result<usize, TradeError> {
    let repository = app.database();
    let now = app.now();
    let created_before = now.minus(app.config().pay_expire);

    let expired = repository
        .list_expired_orders(created_before, EXPIRE_BATCH)
        .await
        .map_err(TradeError::backend)?;

    let mut canceled = 0;
    for order_id in expired {
        let outcome = repository
            .cancel_order(order_id, Operator::system(), CancelType::PayTimeout, now)
            .await
            .map_err(TradeError::backend)?;
        match outcome {
            Ok(_) => canceled += 1,
            Err(failure) => {
                tracing::warn!(%order_id, ?failure, "skipped expired order");
            }
        }
    }

    if canceled > 0 {
        tracing::info!(canceled, "canceled expired orders");
    }
    Ok(canceled)
}

/// Ship an express order
pub async fn deliver_order<T: Application>(
    app: &T,
    order_id: OrderId,
    logistics_id: LogisticsId,
    logistics_no: String,
) -> Result<Order, TradeError> {
    if logistics_no.trim().is_empty() {
        return Err(TradeError::Validation("tracking number is empty".to_owned()));
    }
    let order = app
        .database()
        .deliver_order(order_id, logistics_id, logistics_no, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(order_id = %order.id, "order delivered");
    Ok(order)
}

/// The buyer confirms receipt
pub async fn receive_order<T: Application>(
    app: &T,
    user_id: UserId,
    order_id: OrderId,
) -> Result<Order, TradeError> {
    let order = app
        .database()
        .receive_order(user_id, order_id, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(order_id = %order.id, "order received");
    Ok(order)
}

/// Hand over a pick-up order at the store
pub async fn pick_up_order<T: Application>(
    app: &T,
    verify_code: &str,
    operator: Operator,
) -> Result<Order, TradeError> {
    if verify_code.is_empty() {
        return Err(TradeError::Validation("verify code is empty".to_owned()));
    }
    let order = app
        .database()
        .pick_up_order(verify_code, operator, app.now())
        .await
        .map_err(TradeError::backend)??;
    tracing::info!(order_id = %order.id, "order picked up");
    Ok(order)
}
