use shop_core::{TradeError, models::*};
use shop_trade::order::{
    cancel_expired_orders, cancel_order, create_order, deliver_order, get_order_logs, pay_order,
    pick_up_order, receive_order,
};

mod common;
use common::*;

#[test_log::test(tokio::test)]
async fn test_express_checkout() -> anyhow::Result<()> {
    let app = seed();
    let mut req = request(vec![line(TEA, 2), line(POT, 1)]);
    req.items[0].cart_id = Some(CartId(7));

    let record = create_order(&app, &req, Some("ring twice".to_owned())).await?;
    let order = &record.order;

    assert_eq!(order.status, OrderStatus::Unpaid);
    assert!(order.no.starts_with("o20250601100000"));
    assert_eq!(order.price.pay_price, 7900);
    assert!(order.pay_order_id.is_some());
    assert_eq!(order.pick_up_verify_code, None);
    assert_eq!(
        order.receiver.as_ref().map(|receiver| receiver.area_id),
        Some(AreaId(110100))
    );
    assert_eq!(record.items.len(), 2);
    assert_eq!(record.items[0].cart_id, Some(CartId(7)));

    assert_eq!(app.db.stock(TEA), 8);
    assert_eq!(app.db.stock(POT), 4);

    let logs = get_order_logs(&app, order.id).await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].operate_type, OrderOperateType::Create);
    assert_eq!(logs[0].before_status, None);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_unselected_lines_are_not_ordered() -> anyhow::Result<()> {
    let app = seed();
    let mut req = request(vec![line(TEA, 1), line(POT, 1)]);
    req.items[1].selected = false;

    let record = create_order(&app, &req, None).await?;
    assert_eq!(record.items.len(), 1);
    assert_eq!(app.db.stock(POT), 5);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_express_requires_address() -> anyhow::Result<()> {
    let app = seed();
    let mut req = request(vec![line(TEA, 1)]);
    req.address_id = None;

    let err = create_order(&app, &req, None).await.unwrap_err();
    assert!(matches!(err, TradeError::Validation(_)));
    assert_eq!(app.db.stock(TEA), 10);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_pick_up_lifecycle() -> anyhow::Result<()> {
    let app = seed();
    let mut req = request(vec![line(TEA, 1)]);
    req.delivery_type = DeliveryType::PickUp;
    req.address_id = None;
    req.pick_up_store_id = Some(StoreId(1));

    let record = create_order(&app, &req, None).await?;
    assert_eq!(record.order.price.delivery_price, 0);
    assert_eq!(record.order.receiver, None);
    let code = record.order.pick_up_verify_code.clone().unwrap();
    assert_eq!(code.len(), 8);

    let pay_order_id = record.order.pay_order_id.unwrap();
    pay_order(&app, record.order.id, pay_order_id).await?;

    // express-only operations are refused
    let err = deliver_order(&app, record.order.id, LogisticsId(1), "SF1".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::Conflict(_)));

    let order = pick_up_order(&app, &code, Operator::admin(UserId(50))).await?;
    assert_eq!(order.status, OrderStatus::Completed);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_express_lifecycle() -> anyhow::Result<()> {
    let app = seed();
    let record = create_order(&app, &request(vec![line(TEA, 1)]), None).await?;
    let order_id = record.order.id;

    let err = pay_order(&app, order_id, PayOrderId(1)).await.unwrap_err();
    assert!(matches!(err, TradeError::Conflict(_)));

    let pay_order_id = record.order.pay_order_id.unwrap();
    let order = pay_order(&app, order_id, pay_order_id).await?;
    assert_eq!(order.status, OrderStatus::Undelivered);
    assert!(order.pay_status);

    // a second callback is refused
    assert!(pay_order(&app, order_id, pay_order_id).await.is_err());

    let order = deliver_order(&app, order_id, LogisticsId(1), "SF1".to_owned()).await?;
    assert_eq!(order.status, OrderStatus::Delivered);

    let err = receive_order(&app, UserId(2), order_id).await.unwrap_err();
    assert!(matches!(err, TradeError::NotFound(_)));

    let order = receive_order(&app, BUYER, order_id).await?;
    assert_eq!(order.status, OrderStatus::Completed);

    let operations: Vec<_> = get_order_logs(&app, order_id)
        .await?
        .into_iter()
        .map(|log| log.operate_type)
        .collect();
    assert_eq!(
        operations,
        vec![
            OrderOperateType::Create,
            OrderOperateType::Pay,
            OrderOperateType::Deliver,
            OrderOperateType::Receive,
        ]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_cancel_restores_everything() -> anyhow::Result<()> {
    let app = seed();
    {
        let mut state = app.db.state();
        state.users[0].point = 200;
        state.coupons.push(CouponGrant {
            user_id: BUYER,
            min_price: 0,
            quote: CouponQuote {
                coupon_id: CouponId(4),
                name: "welcome".to_owned(),
                discount_price: 100,
            },
            used: false,
        });
    }

    let mut req = request(vec![line(TEA, 3)]);
    req.coupon_id = Some(CouponId(4));
    req.point_status = true;
    let record = create_order(&app, &req, None).await?;
    assert_eq!(record.order.use_point, 200);
    assert_eq!(app.db.point(BUYER), 0);
    assert_eq!(app.db.stock(TEA), 7);

    // someone else's order
    let err = cancel_order(&app, record.order.id, Operator::member(UserId(2)))
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::NotFound(_)));

    let order = cancel_order(&app, record.order.id, Operator::member(BUYER)).await?;
    assert_eq!(order.status, OrderStatus::Canceled);
    assert_eq!(order.cancel_type, Some(CancelType::UserCancel));
    assert_eq!(app.db.point(BUYER), 200);
    assert_eq!(app.db.stock(TEA), 10);
    assert!(!app.db.state().coupons[0].used);

    let err = cancel_order(&app, record.order.id, Operator::member(BUYER))
        .await
        .unwrap_err();
    assert!(matches!(err, TradeError::Conflict(_)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_last_unit_goes_once() -> anyhow::Result<()> {
    let app = seed();
    let req = request(vec![line(CUP, 1)]);

    create_order(&app, &req, None).await?;
    assert_eq!(app.db.stock(CUP), 0);

    let err = create_order(&app, &req, None).await.unwrap_err();
    assert!(matches!(err, TradeError::StockInsufficient { sku_id } if sku_id == CUP));
    assert_eq!(app.db.state().orders.len(), 1);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_expired_orders_are_canceled() -> anyhow::Result<()> {
    let mut app = seed();
    let stale = create_order(&app, &request(vec![line(TEA, 1)]), None).await?;
    let paid = create_order(&app, &request(vec![line(POT, 1)]), None).await?;
    pay_order(&app, paid.order.id, paid.order.pay_order_id.unwrap()).await?;

    app.now = app.now.plus(std::time::Duration::from_secs(10 * 60));
    let fresh = create_order(&app, &request(vec![line(TEA, 1)]), None).await?;

    // 31 minutes after the first checkout
    app.now = app.now.plus(std::time::Duration::from_secs(21 * 60));
    assert_eq!(cancel_expired_orders(&app).await?, 1);

    let state = app.db.state();
    let status = |id: OrderId| {
        state
            .orders
            .iter()
            .find(|record| record.order.id == id)
            .map(|record| (record.order.status, record.order.cancel_type))
    };
    assert_eq!(
        status(stale.order.id),
        Some((OrderStatus::Canceled, Some(CancelType::PayTimeout)))
    );
    assert_eq!(
        status(paid.order.id),
        Some((OrderStatus::Undelivered, None))
    );
    assert_eq!(status(fresh.order.id), Some((OrderStatus::Unpaid, None)));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_bargain_reservation() -> anyhow::Result<()> {
    let app = seed();
    app.db.state().offers.push(Offer {
        kind: ExclusiveKind::Bargain,
        selector: ActivityId(77),
        sku_id: TEA,
        limit: 1,
        quote: ExclusiveQuote {
            activity_id: ActivityId(12),
            name: "bargain".to_owned(),
            unit_price: 300,
            unit_point: 0,
        },
    });

    let mut req = request(vec![line(TEA, 1)]);
    req.bargain_record_id = Some(ActivityId(77));
    let record = create_order(&app, &req, None).await?;

    assert_eq!(record.order.order_type, OrderType::Bargain);
    assert_eq!(record.order.activity_id, Some(ActivityId(12)));
    assert_eq!(record.order.bargain_record_id, Some(ActivityId(77)));
    assert_eq!(record.order.price.pay_price, 800);
    Ok(())
}
