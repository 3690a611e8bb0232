use super::{fetch_items, fetch_order, fetch_record, finish, insert_log};
use crate::{
    Db,
    types::{BARGAIN_SUCCEEDED, COUPON_UNUSED, COUPON_USED, OrderLogRow, OrderRow},
};
use shop_core::{
    models::{
        CancelType, CartId, DateTime, DeliveryType, ExclusiveKind, ItemAfterSaleStatus,
        LogisticsId, Operator, Order, OrderDraft, OrderId, OrderLog, OrderOperateType,
        OrderRecord, OrderStatus, OrderType, PayOrderId, PayOrderStatus, RefundStatus, UserId,
        UserType,
    },
    ports::{OrderFailure, OrderRepository},
};
use sqlx::{SqliteConnection, types::Json};
use std::time::Duration;

/// How long a number bucket outlives its second
const SEQUENCE_TTL: Duration = Duration::from_secs(60);

type Outcome<T> = Result<Result<T, OrderFailure>, sqlx::Error>;

impl OrderRepository for Db {
    async fn next_order_no(&self, prefix: &str, as_of: DateTime) -> Result<String, Self::Error> {
        let bucket = format!("{prefix}{}", as_of.compact());
        let mut tx = self.writer.begin().await?;

        sqlx::query("delete from order_no_sequence where expires_at < $1")
            .bind(as_of)
            .execute(&mut *tx)
            .await?;

        let value: i64 = sqlx::query_scalar(
            r#"
            insert into
                order_no_sequence (bucket, value, expires_at)
            values
                ($1, 1, $2)
            on conflict (bucket) do update set
                value = value + 1
            returning
                value
            "#,
        )
        .bind(&bucket)
        .bind(as_of.plus(SEQUENCE_TTL))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(format!("{bucket}{value:06}"))
    }

    async fn create_order(&self, draft: OrderDraft) -> Outcome<OrderRecord> {
        let mut tx = self.writer.begin().await?;
        let outcome = match insert_draft(&mut tx, draft).await? {
            Ok(order_id) => fetch_record(&mut tx, order_id)
                .await?
                .ok_or(OrderFailure::NotFound),
            Err(failure) => Err(failure),
        };
        if let Err(failure) = &outcome {
            tracing::debug!(?failure, "order rolled back");
        }
        finish(tx, outcome).await
    }

    async fn get_order(&self, order_id: OrderId) -> Result<Option<OrderRecord>, Self::Error> {
        let mut conn = self.reader.acquire().await?;
        fetch_record(&mut conn, order_id).await
    }

    async fn get_order_logs(&self, order_id: OrderId) -> Result<Vec<OrderLog>, Self::Error> {
        let rows: Vec<OrderLogRow> = sqlx::query_as(
            r#"
            select
                order_id, user_id, user_type, before_status, after_status, operate_type,
                content, created_at
            from
                trade_order_log
            where
                order_id = $1
            order by
                id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.reader)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn pay_order(
        &self,
        order_id: OrderId,
        pay_order_id: PayOrderId,
        as_of: DateTime,
    ) -> Outcome<Order> {
        let mut tx = self.writer.begin().await?;
        let outcome = pay(&mut tx, order_id, pay_order_id, as_of).await?;
        finish(tx, outcome).await
    }

    async fn cancel_order(
        &self,
        order_id: OrderId,
        operator: Operator,
        cancel_type: CancelType,
        as_of: DateTime,
    ) -> Outcome<Order> {
        let mut tx = self.writer.begin().await?;
        let outcome = cancel(
            &mut tx,
            order_id,
            operator,
            cancel_type,
            OrderStatus::Unpaid,
            as_of,
        )
        .await?;
        finish(tx, outcome).await
    }

    async fn cancel_paid_order(
        &self,
        order_id: OrderId,
        operator: Operator,
        cancel_type: CancelType,
        as_of: DateTime,
    ) -> Outcome<Order> {
        let mut tx = self.writer.begin().await?;
        let outcome = cancel(
            &mut tx,
            order_id,
            operator,
            cancel_type,
            OrderStatus::Undelivered,
            as_of,
        )
        .await?;
        finish(tx, outcome).await
    }

    async fn list_expired_orders(
        &self,
        created_before: DateTime,
        limit: u32,
    ) -> Result<Vec<OrderId>, Self::Error> {
        sqlx::query_scalar(
            r#"
            select
                id
            from
                trade_order
            where
                status = $1
            and
                created_at < $2
            order by
                created_at, id
            limit $3
            "#,
        )
        .bind(OrderStatus::Unpaid)
        .bind(created_before)
        .bind(limit)
        .fetch_all(&self.reader)
        .await
    }

    async fn deliver_order(
        &self,
        order_id: OrderId,
        logistics_id: LogisticsId,
        logistics_no: String,
        as_of: DateTime,
    ) -> Outcome<Order> {
        let mut tx = self.writer.begin().await?;
        let outcome = deliver(&mut tx, order_id, logistics_id, logistics_no, as_of).await?;
        finish(tx, outcome).await
    }

    async fn receive_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
        as_of: DateTime,
    ) -> Outcome<Order> {
        let mut tx = self.writer.begin().await?;
        let outcome = match fetch_order(&mut tx, order_id).await? {
            Some(order) if order.user_id == user_id => {
                complete(
                    &mut tx,
                    order,
                    Operator::member(user_id),
                    OrderStatus::Delivered,
                    OrderOperateType::Receive,
                    as_of,
                )
                .await?
            }
            _ => Err(OrderFailure::NotFound),
        };
        finish(tx, outcome).await
    }

    async fn pick_up_order(
        &self,
        verify_code: &str,
        operator: Operator,
        as_of: DateTime,
    ) -> Outcome<Order> {
        let mut tx = self.writer.begin().await?;
        let order_id: Option<OrderId> =
            sqlx::query_scalar("select id from trade_order where pick_up_verify_code = $1")
                .bind(verify_code)
                .fetch_optional(&mut *tx)
                .await?;
        let order = match order_id {
            Some(order_id) => fetch_order(&mut tx, order_id).await?,
            None => None,
        };
        let outcome = match order {
            None => Err(OrderFailure::NotFound),
            Some(order) if order.delivery_type != DeliveryType::PickUp => {
                Err(OrderFailure::DeliveryTypeMismatch)
            }
            Some(order) => {
                complete(
                    &mut tx,
                    order,
                    operator,
                    OrderStatus::Undelivered,
                    OrderOperateType::PickUp,
                    as_of,
                )
                .await?
            }
        };
        finish(tx, outcome).await
    }
}

/// Persist a checkout and apply its side effects, returning the new order's id.
async fn insert_draft(conn: &mut SqliteConnection, draft: OrderDraft) -> Outcome<OrderId> {
    if let Some(code) = &draft.pick_up_verify_code {
        let taken: bool = sqlx::query_scalar(
            "select exists(select 1 from trade_order where pick_up_verify_code = $1)",
        )
        .bind(code)
        .fetch_one(&mut *conn)
        .await?;
        if taken {
            return Ok(Err(OrderFailure::VerifyCodeTaken));
        }
    }
    let activity = draft.activity.as_ref();
    let receiver = draft.receiver.as_ref();
    let order_id: OrderId = sqlx::query_scalar(
        r#"
        insert into
            trade_order (
                no, order_type, user_id, status, remark, delivery_type,
                receiver_name, receiver_mobile, receiver_area_id, receiver_detail_address,
                pick_up_store_id, pick_up_verify_code,
                total_price, discount_price, delivery_price, coupon_price, point_price,
                vip_price, pay_price, coupon_id, use_point, give_point,
                activity_id, bargain_record_id, combination_head_id, created_at, updated_at
            )
        values
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
             $18, $19, $20, $21, $22, $23, $24, $25, $26, $26)
        returning
            id
        "#,
    )
    .bind(&draft.no)
    .bind(draft.order_type)
    .bind(draft.user_id)
    .bind(OrderStatus::Unpaid)
    .bind(&draft.remark)
    .bind(draft.delivery_type)
    .bind(receiver.map(|r| r.name.as_str()))
    .bind(receiver.map(|r| r.mobile.as_str()))
    .bind(receiver.map(|r| r.area_id))
    .bind(receiver.map(|r| r.detail_address.as_str()))
    .bind(draft.pick_up_store_id)
    .bind(&draft.pick_up_verify_code)
    .bind(draft.price.total_price)
    .bind(draft.price.discount_price)
    .bind(draft.price.delivery_price)
    .bind(draft.price.coupon_price)
    .bind(draft.price.point_price)
    .bind(draft.price.vip_price)
    .bind(draft.price.pay_price)
    .bind(draft.coupon_id)
    .bind(draft.use_point)
    .bind(draft.give_point)
    .bind(activity.map(|a| a.activity_id))
    .bind(activity.and_then(|a| a.record_id))
    .bind(activity.and_then(|a| a.combination_head_id))
    .bind(draft.created_at)
    .fetch_one(&mut *conn)
    .await?;

    for item in &draft.items {
        sqlx::query(
            r#"
            insert into
                trade_order_item (
                    order_id, user_id, cart_id, sku_id, spu_id, spu_name, pic_url, properties,
                    count, price, discount_price, delivery_price, coupon_price, point_price,
                    use_point, vip_price, pay_price, give_point
                )
            values
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(order_id)
        .bind(draft.user_id)
        .bind(item.cart_id)
        .bind(item.sku_id)
        .bind(item.spu_id)
        .bind(&item.spu_name)
        .bind(&item.pic_url)
        .bind(Json(&item.properties))
        .bind(item.count)
        .bind(item.price)
        .bind(item.discount_price)
        .bind(item.delivery_price)
        .bind(item.coupon_price)
        .bind(item.point_price)
        .bind(item.use_point)
        .bind(item.vip_price)
        .bind(item.pay_price)
        .bind(item.give_point)
        .execute(&mut *conn)
        .await?;
    }

    let cart_ids: Vec<CartId> = draft.items.iter().filter_map(|item| item.cart_id).collect();
    if !cart_ids.is_empty() {
        sqlx::query(
            r#"
            delete from
                cart
            where
                user_id = $1
            and
                id in (select atom from json_each($2))
            "#,
        )
        .bind(draft.user_id)
        .bind(Json(&cart_ids))
        .execute(&mut *conn)
        .await?;
    }

    for item in &draft.items {
        let result = sqlx::query("update sku set stock = stock - $2 where id = $1 and stock >= $2")
            .bind(item.sku_id)
            .bind(item.count)
            .execute(&mut *conn)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(Err(OrderFailure::StockInsufficient(item.sku_id)));
        }
    }

    if let Some(activity) = activity {
        let reserved = match activity.kind {
            ExclusiveKind::Seckill => {
                sqlx::query(
                    r#"
                    update seckill_product set stock = stock - $3
                    where activity_id = $1 and sku_id = $2 and stock >= $3
                    "#,
                )
                .bind(activity.activity_id)
                .bind(activity.sku_id)
                .bind(activity.count)
                .execute(&mut *conn)
                .await?
                .rows_affected()
                    == 1
            }
            ExclusiveKind::Point => {
                sqlx::query(
                    r#"
                    update point_product set stock = stock - $3
                    where activity_id = $1 and sku_id = $2 and stock >= $3
                    "#,
                )
                .bind(activity.activity_id)
                .bind(activity.sku_id)
                .bind(activity.count)
                .execute(&mut *conn)
                .await?
                .rows_affected()
                    == 1
            }
            ExclusiveKind::Bargain => {
                let claimed = sqlx::query(
                    r#"
                    update bargain_record set order_id = $2
                    where id = $1 and order_id is null and status = $3
                    "#,
                )
                .bind(activity.record_id)
                .bind(order_id)
                .bind(BARGAIN_SUCCEEDED)
                .execute(&mut *conn)
                .await?
                .rows_affected();
                if claimed == 0 {
                    return Ok(Err(OrderFailure::ActivityRecordUsed));
                }
                sqlx::query(
                    "update bargain_activity set stock = stock - $2 where id = $1 and stock >= $2",
                )
                .bind(activity.activity_id)
                .bind(activity.count)
                .execute(&mut *conn)
                .await?
                .rows_affected()
                    == 1
            }
            // the group joined is recorded on the order itself
            ExclusiveKind::Combination => true,
        };
        if !reserved {
            return Ok(Err(OrderFailure::ActivityStockInsufficient(activity.sku_id)));
        }
    }

    if let Some(coupon_id) = draft.coupon_id {
        let result = sqlx::query(
            r#"
            update
                coupon
            set
                status = $4, use_order_id = $2, use_time = $3
            where
                id = $1
            and
                user_id = $5
            and
                status = $6
            and
                valid_start_time <= $3 and $3 < valid_end_time
            "#,
        )
        .bind(coupon_id)
        .bind(order_id)
        .bind(draft.created_at)
        .bind(COUPON_USED)
        .bind(draft.user_id)
        .bind(COUPON_UNUSED)
        .execute(&mut *conn)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(Err(OrderFailure::CouponUnavailable));
        }
    }

    if draft.use_point > 0 {
        let result =
            sqlx::query("update member_user set point = point - $2 where id = $1 and point >= $2")
                .bind(draft.user_id)
                .bind(draft.use_point)
                .execute(&mut *conn)
                .await?;
        if result.rows_affected() == 0 {
            return Ok(Err(OrderFailure::PointInsufficient));
        }
    }

    let status = if draft.price.pay_price > 0 {
        let pay_order_id: PayOrderId = sqlx::query_scalar(
            r#"
            insert into
                pay_order (app_id, merchant_order_id, subject, price, status, expire_time, created_at)
            values
                ($1, $2, $3, $4, $5, $6, $7)
            returning
                id
            "#,
        )
        .bind(draft.pay_app_id)
        .bind(order_id)
        .bind(&draft.subject)
        .bind(draft.price.pay_price)
        .bind(PayOrderStatus::Waiting)
        .bind(draft.pay_expire_at)
        .bind(draft.created_at)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query("update trade_order set pay_order_id = $2 where id = $1")
            .bind(order_id)
            .bind(pay_order_id)
            .execute(&mut *conn)
            .await?;
        OrderStatus::Unpaid
    } else {
        // nothing to collect, so the order is paid on creation
        sqlx::query(
            "update trade_order set status = $2, pay_status = 1, pay_time = $3 where id = $1",
        )
        .bind(order_id)
        .bind(OrderStatus::Undelivered)
        .bind(draft.created_at)
        .execute(&mut *conn)
        .await?;
        OrderStatus::Undelivered
    };

    insert_log(
        conn,
        order_id,
        Operator::member(draft.user_id),
        None,
        status,
        OrderOperateType::Create,
        format!("order {} placed", draft.no),
        draft.created_at,
    )
    .await?;

    Ok(Ok(order_id))
}

/// Reload an order after a transition and append the log entry for it.
async fn logged(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    operator: Operator,
    before: OrderStatus,
    operate_type: OrderOperateType,
    content: String,
    as_of: DateTime,
) -> Result<Order, sqlx::Error> {
    let order: Order = fetch_order(&mut *conn, order_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?
        .into();
    insert_log(
        conn,
        order_id,
        operator,
        Some(before),
        order.status,
        operate_type,
        content,
        as_of,
    )
    .await?;
    Ok(order)
}

async fn pay(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    pay_order_id: PayOrderId,
    as_of: DateTime,
) -> Outcome<Order> {
    let Some(order) = fetch_order(&mut *conn, order_id).await? else {
        return Ok(Err(OrderFailure::NotFound));
    };
    if !order.status.can_transition(OrderStatus::Undelivered) {
        return Ok(Err(OrderFailure::InvalidStatus(order.status)));
    }
    if order.pay_order_id != Some(pay_order_id) {
        return Ok(Err(OrderFailure::PayOrderMismatch));
    }

    let settled = sqlx::query(
        r#"
        update
            pay_order
        set
            status = $3, success_time = $4
        where
            id = $1
        and
            merchant_order_id = $2
        and
            status = $5
        "#,
    )
    .bind(pay_order_id)
    .bind(order_id)
    .bind(PayOrderStatus::Success)
    .bind(as_of)
    .bind(PayOrderStatus::Waiting)
    .execute(&mut *conn)
    .await?;
    if settled.rows_affected() == 0 {
        return Ok(Err(OrderFailure::PayOrderMismatch));
    }

    sqlx::query(
        r#"
        update
            trade_order
        set
            status = $2, pay_status = 1, pay_time = $3, updated_at = $3
        where
            id = $1
        "#,
    )
    .bind(order_id)
    .bind(OrderStatus::Undelivered)
    .bind(as_of)
    .execute(&mut *conn)
    .await?;

    let order = logged(
        conn,
        order_id,
        Operator::system(),
        order.status,
        OrderOperateType::Pay,
        format!("paid through payment order {pay_order_id}"),
        as_of,
    )
    .await?;
    Ok(Ok(order))
}

/// Give back everything an order took: stock, activity stock, the coupon and points.
async fn restore(conn: &mut SqliteConnection, order: &OrderRow) -> Result<(), sqlx::Error> {
    let items = fetch_items(&mut *conn, order.id).await?;
    for item in &items {
        // refunded items already had their stock returned
        if item.after_sale_status == ItemAfterSaleStatus::Success {
            continue;
        }
        sqlx::query("update sku set stock = stock + $2 where id = $1")
            .bind(item.sku_id)
            .bind(item.count)
            .execute(&mut *conn)
            .await?;
    }

    if let Some(activity_id) = order.activity_id {
        match order.order_type {
            OrderType::Seckill | OrderType::Point => {
                let table = if order.order_type == OrderType::Seckill {
                    "seckill_product"
                } else {
                    "point_product"
                };
                for item in &items {
                    sqlx::query(&format!(
                        "update {table} set stock = stock + $3 where activity_id = $1 and sku_id = $2"
                    ))
                    .bind(activity_id)
                    .bind(item.sku_id)
                    .bind(item.count)
                    .execute(&mut *conn)
                    .await?;
                }
            }
            OrderType::Bargain => {
                sqlx::query("update bargain_record set order_id = null where id = $1 and order_id = $2")
                    .bind(order.bargain_record_id)
                    .bind(order.id)
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("update bargain_activity set stock = stock + 1 where id = $1")
                    .bind(activity_id)
                    .execute(&mut *conn)
                    .await?;
            }
            OrderType::Combination | OrderType::Normal => {}
        }
    }

    if let Some(coupon_id) = order.coupon_id {
        sqlx::query(
            r#"
            update
                coupon
            set
                status = $3, use_order_id = null, use_time = null
            where
                id = $1
            and
                use_order_id = $2
            "#,
        )
        .bind(coupon_id)
        .bind(order.id)
        .bind(COUPON_UNUSED)
        .execute(&mut *conn)
        .await?;
    }

    if order.use_point > 0 {
        sqlx::query("update member_user set point = point + $2 where id = $1")
            .bind(order.user_id)
            .bind(order.use_point)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn cancel(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    operator: Operator,
    cancel_type: CancelType,
    from: OrderStatus,
    as_of: DateTime,
) -> Outcome<Order> {
    let order = fetch_order(&mut *conn, order_id).await?.filter(|order| {
        operator.user_type != UserType::Member || operator.user_id == Some(order.user_id)
    });
    let Some(order) = order else {
        return Ok(Err(OrderFailure::NotFound));
    };
    if order.status != from {
        return Ok(Err(OrderFailure::InvalidStatus(order.status)));
    }
    // an open request would settle again on an order already given back
    let items = fetch_items(&mut *conn, order_id).await?;
    if items
        .iter()
        .any(|item| item.after_sale_status == ItemAfterSaleStatus::Applying)
    {
        return Ok(Err(OrderFailure::AfterSaleInProgress));
    }

    restore(&mut *conn, &order).await?;

    let paid = from == OrderStatus::Undelivered;
    sqlx::query(
        r#"
        update
            trade_order
        set
            status = $2,
            cancel_type = $3,
            cancel_time = $4,
            updated_at = $4,
            refund_status = case when $5 then $6 else refund_status end,
            refund_price = case when $5 then pay_price else refund_price end
        where
            id = $1
        "#,
    )
    .bind(order_id)
    .bind(OrderStatus::Canceled)
    .bind(cancel_type)
    .bind(as_of)
    .bind(paid)
    .bind(RefundStatus::All)
    .execute(&mut *conn)
    .await?;

    if let Some(pay_order_id) = order.pay_order_id {
        let query = if paid {
            sqlx::query("update pay_order set status = $2, refund_price = price where id = $1")
                .bind(pay_order_id)
                .bind(PayOrderStatus::Refund)
        } else {
            sqlx::query("update pay_order set status = $2 where id = $1")
                .bind(pay_order_id)
                .bind(PayOrderStatus::Closed)
        };
        query.execute(&mut *conn).await?;
    }

    let operate_type = match (paid, cancel_type) {
        (true, _) => OrderOperateType::CancelPaid,
        (false, CancelType::PayTimeout) => OrderOperateType::Timeout,
        (false, _) => OrderOperateType::Cancel,
    };
    let order = logged(
        conn,
        order_id,
        operator,
        order.status,
        operate_type,
        format!("canceled ({cancel_type:?})"),
        as_of,
    )
    .await?;
    Ok(Ok(order))
}

async fn deliver(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    logistics_id: LogisticsId,
    logistics_no: String,
    as_of: DateTime,
) -> Outcome<Order> {
    let Some(order) = fetch_order(&mut *conn, order_id).await? else {
        return Ok(Err(OrderFailure::NotFound));
    };
    if order.delivery_type != DeliveryType::Express {
        return Ok(Err(OrderFailure::DeliveryTypeMismatch));
    }
    if !order.status.can_transition(OrderStatus::Delivered) {
        return Ok(Err(OrderFailure::InvalidStatus(order.status)));
    }

    sqlx::query(
        r#"
        update
            trade_order
        set
            status = $2, logistics_id = $3, logistics_no = $4, delivery_time = $5, updated_at = $5
        where
            id = $1
        "#,
    )
    .bind(order_id)
    .bind(OrderStatus::Delivered)
    .bind(logistics_id)
    .bind(&logistics_no)
    .bind(as_of)
    .execute(&mut *conn)
    .await?;

    let order = logged(
        conn,
        order_id,
        Operator::system(),
        order.status,
        OrderOperateType::Deliver,
        format!("shipped with tracking number {logistics_no}"),
        as_of,
    )
    .await?;
    Ok(Ok(order))
}

/// Complete an order that is in `from`, granting its points to the buyer.
async fn complete(
    conn: &mut SqliteConnection,
    order: OrderRow,
    operator: Operator,
    from: OrderStatus,
    operate_type: OrderOperateType,
    as_of: DateTime,
) -> Outcome<Order> {
    if order.status != from {
        return Ok(Err(OrderFailure::InvalidStatus(order.status)));
    }

    sqlx::query(
        r#"
        update
            trade_order
        set
            status = $2, receive_time = $3, finish_time = $3, updated_at = $3
        where
            id = $1
        "#,
    )
    .bind(order.id)
    .bind(OrderStatus::Completed)
    .bind(as_of)
    .execute(&mut *conn)
    .await?;

    if order.give_point > 0 {
        sqlx::query("update member_user set point = point + $2 where id = $1")
            .bind(order.user_id)
            .bind(order.give_point)
            .execute(&mut *conn)
            .await?;
    }

    let order = logged(
        conn,
        order.id,
        operator,
        order.status,
        operate_type,
        "completed".to_owned(),
        as_of,
    )
    .await?;
    Ok(Ok(order))
}
