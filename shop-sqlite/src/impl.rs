//! Repository trait implementations for the SQLite database.
//!
//! Mutations of the order and after-sale units of work follow one shape: open
//! a transaction on the writer, check the guard against the rows as they are
//! inside that transaction, apply every change, then commit on success or roll
//! back on a domain refusal (see [`finish`]).

use crate::{
    Db,
    types::{OrderItemRow, OrderRow},
};
use shop_core::{
    models::{DateTime, Operator, OrderId, OrderOperateType, OrderRecord, OrderStatus},
    ports::Repository,
};
use sqlx::{Sqlite, SqliteConnection, Transaction};

mod activity;
mod after_sale;
mod catalog;
mod coupon;
mod delivery;
mod member;
mod order;

impl Repository for Db {
    type Error = sqlx::Error;
}

/// Commit the transaction if the unit of work succeeded, otherwise roll it back.
async fn finish<T, F>(
    tx: Transaction<'_, Sqlite>,
    outcome: Result<T, F>,
) -> Result<Result<T, F>, sqlx::Error> {
    match &outcome {
        Ok(_) => tx.commit().await?,
        Err(_) => tx.rollback().await?,
    }
    Ok(outcome)
}

const ORDER_COLUMNS: &str = r#"
    id, no, order_type, user_id, status, cancel_type, remark, pay_status, pay_time,
    pay_order_id, delivery_type, logistics_id, logistics_no, delivery_time, receive_time,
    finish_time, cancel_time, receiver_name, receiver_mobile, receiver_area_id,
    receiver_detail_address, pick_up_store_id, pick_up_verify_code, total_price,
    discount_price, delivery_price, coupon_price, point_price, vip_price, pay_price,
    coupon_id, use_point, give_point, refund_status, refund_price, activity_id,
    bargain_record_id, combination_head_id, created_at, updated_at
"#;

const ORDER_ITEM_COLUMNS: &str = r#"
    id, order_id, user_id, cart_id, sku_id, spu_id, spu_name, pic_url, properties, count,
    price, discount_price, delivery_price, coupon_price, point_price, use_point, vip_price,
    pay_price, give_point, after_sale_id, after_sale_status
"#;

async fn fetch_order(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "select {ORDER_COLUMNS} from trade_order where id = $1"
    ))
    .bind(order_id)
    .fetch_optional(conn)
    .await
}

async fn fetch_items(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Vec<OrderItemRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "select {ORDER_ITEM_COLUMNS} from trade_order_item where order_id = $1 order by id"
    ))
    .bind(order_id)
    .fetch_all(conn)
    .await
}

async fn fetch_record(
    conn: &mut SqliteConnection,
    order_id: OrderId,
) -> Result<Option<OrderRecord>, sqlx::Error> {
    let Some(order) = fetch_order(&mut *conn, order_id).await? else {
        return Ok(None);
    };
    let items = fetch_items(conn, order_id).await?;
    Ok(Some(OrderRecord {
        order: order.into(),
        items: items.into_iter().map(Into::into).collect(),
    }))
}

/// Append an entry to the order's audit log.
#[allow(clippy::too_many_arguments)]
async fn insert_log(
    conn: &mut SqliteConnection,
    order_id: OrderId,
    operator: Operator,
    before_status: Option<OrderStatus>,
    after_status: OrderStatus,
    operate_type: OrderOperateType,
    content: String,
    as_of: DateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        insert into
            trade_order_log (order_id, user_id, user_type, before_status, after_status, operate_type, content, created_at)
        values
            ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(order_id)
    .bind(operator.user_id)
    .bind(operator.user_type)
    .bind(before_status)
    .bind(after_status)
    .bind(operate_type)
    .bind(content)
    .bind(as_of)
    .execute(conn)
    .await?;
    Ok(())
}
