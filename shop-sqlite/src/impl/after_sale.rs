use super::{fetch_items, fetch_order, finish, insert_log};
use crate::{
    Db,
    types::{AfterSaleRow, OrderItemRow},
};
use shop_core::{
    models::{
        AfterSale, AfterSaleApply, AfterSaleId, AfterSaleStatus, CancelType, DateTime,
        ItemAfterSaleStatus, LogisticsId, Operator, OrderItemId, OrderOperateType, OrderStatus,
        RefundStatus, UserId,
    },
    ports::{AfterSaleFailure, AfterSaleRepository},
};
use sqlx::SqliteConnection;

type Outcome = Result<Result<AfterSale, AfterSaleFailure>, sqlx::Error>;

const AFTER_SALE_COLUMNS: &str = r#"
    id, no, order_id, order_item_id, user_id, sku_id, count, way, status, reason, description,
    refund_price, audit_reason, logistics_id, logistics_no, audit_time, receive_time,
    refund_time, created_at
"#;

async fn fetch_after_sale(
    conn: &mut SqliteConnection,
    after_sale_id: AfterSaleId,
) -> Result<Option<AfterSaleRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "select {AFTER_SALE_COLUMNS} from after_sale where id = $1"
    ))
    .bind(after_sale_id)
    .fetch_optional(conn)
    .await
}

async fn fetch_item(
    conn: &mut SqliteConnection,
    order_item_id: OrderItemId,
) -> Result<Option<OrderItemRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "select {} from trade_order_item where id = $1",
        super::ORDER_ITEM_COLUMNS
    ))
    .bind(order_item_id)
    .fetch_optional(conn)
    .await
}

async fn set_item_status(
    conn: &mut SqliteConnection,
    order_item_id: OrderItemId,
    status: ItemAfterSaleStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("update trade_order_item set after_sale_status = $2 where id = $1")
        .bind(order_item_id)
        .bind(status)
        .execute(conn)
        .await?;
    Ok(())
}

/// The columns a transition stamps besides the status.
enum Stamp {
    /// The seller reviewed the request, with a reason when declining
    Audit(Option<String>),
    /// The buyer shipped the goods back
    Return(LogisticsId, String),
    /// The seller received the goods, with a reason when refusing them
    Receive(Option<String>),
    /// The money went back
    Refund,
    /// Nothing else changes
    Nothing,
}

/// A status change of a request.
struct Move {
    after_sale_id: AfterSaleId,
    /// Only this buyer may act, when set
    owner: Option<UserId>,
    allowed: fn(AfterSaleStatus) -> bool,
    /// Picks the next status from the request's current row
    next: fn(&AfterSaleRow) -> AfterSaleStatus,
    stamp: Stamp,
}

/// Guard, apply and reload a request transition. Closing a request releases
/// its item, or marks it refunded.
async fn advance(
    conn: &mut SqliteConnection,
    step: Move,
    as_of: DateTime,
) -> Result<Result<AfterSaleRow, AfterSaleFailure>, sqlx::Error> {
    let row = fetch_after_sale(&mut *conn, step.after_sale_id)
        .await?
        .filter(|row| step.owner.is_none_or(|owner| owner == row.user_id));
    let Some(row) = row else {
        return Ok(Err(AfterSaleFailure::NotFound));
    };
    let Some(order) = fetch_order(&mut *conn, row.order_id).await? else {
        return Ok(Err(AfterSaleFailure::NotFound));
    };
    if order.status == OrderStatus::Canceled {
        return Ok(Err(AfterSaleFailure::OrderStatus(order.status)));
    }
    if !(step.allowed)(row.status) {
        return Ok(Err(AfterSaleFailure::InvalidStatus(row.status)));
    }
    let next = (step.next)(&row);

    let update = match step.stamp {
        Stamp::Audit(reason) => sqlx::query(
            "update after_sale set status = $2, audit_time = $3, audit_reason = $4 where id = $1",
        )
        .bind(row.id)
        .bind(next)
        .bind(as_of)
        .bind(reason),
        Stamp::Return(logistics_id, logistics_no) => sqlx::query(
            "update after_sale set status = $2, logistics_id = $3, logistics_no = $4 where id = $1",
        )
        .bind(row.id)
        .bind(next)
        .bind(logistics_id)
        .bind(logistics_no),
        Stamp::Receive(reason) => sqlx::query(
            r#"
            update
                after_sale
            set
                status = $2, receive_time = $3, audit_reason = coalesce($4, audit_reason)
            where
                id = $1
            "#,
        )
        .bind(row.id)
        .bind(next)
        .bind(as_of)
        .bind(reason),
        Stamp::Refund => {
            sqlx::query("update after_sale set status = $2, refund_time = $3 where id = $1")
                .bind(row.id)
                .bind(next)
                .bind(as_of)
        }
        Stamp::Nothing => sqlx::query("update after_sale set status = $2 where id = $1")
            .bind(row.id)
            .bind(next),
    };
    update.execute(&mut *conn).await?;

    if !next.is_open() {
        let status = if next == AfterSaleStatus::Refunded {
            ItemAfterSaleStatus::Success
        } else {
            ItemAfterSaleStatus::None
        };
        set_item_status(&mut *conn, row.order_item_id, status).await?;
    }

    Ok(fetch_after_sale(conn, row.id)
        .await?
        .ok_or(AfterSaleFailure::NotFound))
}

impl AfterSaleRepository for Db {
    async fn create_after_sale(
        &self,
        apply: AfterSaleApply,
        no: String,
        as_of: DateTime,
    ) -> Outcome {
        let mut tx = self.writer.begin().await?;
        let outcome = apply_after_sale(&mut tx, apply, no, as_of).await?;
        finish(tx, outcome.map(Into::into)).await
    }

    async fn agree_after_sale(&self, after_sale_id: AfterSaleId, as_of: DateTime) -> Outcome {
        let step = Move {
            after_sale_id,
            owner: None,
            allowed: |status| status == AfterSaleStatus::Apply,
            next: |row| AfterSaleStatus::approved(row.way),
            stamp: Stamp::Audit(None),
        };
        self.run(step, as_of).await
    }

    async fn disagree_after_sale(
        &self,
        after_sale_id: AfterSaleId,
        reason: String,
        as_of: DateTime,
    ) -> Outcome {
        let step = Move {
            after_sale_id,
            owner: None,
            allowed: |status| status == AfterSaleStatus::Apply,
            next: |_| AfterSaleStatus::Rejected,
            stamp: Stamp::Audit(Some(reason)),
        };
        self.run(step, as_of).await
    }

    async fn deliver_after_sale(
        &self,
        user_id: UserId,
        after_sale_id: AfterSaleId,
        logistics_id: LogisticsId,
        logistics_no: String,
        as_of: DateTime,
    ) -> Outcome {
        let step = Move {
            after_sale_id,
            owner: Some(user_id),
            allowed: |status| status == AfterSaleStatus::Approved,
            next: |_| AfterSaleStatus::AwaitingReturn,
            stamp: Stamp::Return(logistics_id, logistics_no),
        };
        self.run(step, as_of).await
    }

    async fn receive_after_sale(&self, after_sale_id: AfterSaleId, as_of: DateTime) -> Outcome {
        let step = Move {
            after_sale_id,
            owner: None,
            allowed: |status| status == AfterSaleStatus::AwaitingReturn,
            next: |_| AfterSaleStatus::RefundPending,
            stamp: Stamp::Receive(None),
        };
        self.run(step, as_of).await
    }

    async fn refuse_after_sale(
        &self,
        after_sale_id: AfterSaleId,
        reason: String,
        as_of: DateTime,
    ) -> Outcome {
        let step = Move {
            after_sale_id,
            owner: None,
            allowed: |status| status == AfterSaleStatus::AwaitingReturn,
            next: |_| AfterSaleStatus::ReturnRefused,
            stamp: Stamp::Receive(Some(reason)),
        };
        self.run(step, as_of).await
    }

    async fn refund_after_sale(&self, after_sale_id: AfterSaleId, as_of: DateTime) -> Outcome {
        let mut tx = self.writer.begin().await?;
        let step = Move {
            after_sale_id,
            owner: None,
            allowed: |status| status == AfterSaleStatus::RefundPending,
            next: |_| AfterSaleStatus::Refunded,
            stamp: Stamp::Refund,
        };
        let outcome = match advance(&mut tx, step, as_of).await? {
            Ok(row) => {
                settle_refund(&mut tx, &row, as_of).await?;
                Ok(row.into())
            }
            Err(failure) => Err(failure),
        };
        finish(tx, outcome).await
    }

    async fn cancel_after_sale(
        &self,
        user_id: UserId,
        after_sale_id: AfterSaleId,
        as_of: DateTime,
    ) -> Outcome {
        let step = Move {
            after_sale_id,
            owner: Some(user_id),
            allowed: AfterSaleStatus::buyer_cancelable,
            next: |_| AfterSaleStatus::BuyerCanceled,
            stamp: Stamp::Nothing,
        };
        self.run(step, as_of).await
    }

    async fn get_after_sale(
        &self,
        after_sale_id: AfterSaleId,
    ) -> Result<Option<AfterSale>, Self::Error> {
        let mut conn = self.reader.acquire().await?;
        Ok(fetch_after_sale(&mut conn, after_sale_id)
            .await?
            .map(Into::into))
    }
}

impl Db {
    async fn run(&self, step: Move, as_of: DateTime) -> Outcome {
        let mut tx = self.writer.begin().await?;
        let outcome = advance(&mut tx, step, as_of).await?;
        finish(tx, outcome.map(Into::into)).await
    }
}

async fn apply_after_sale(
    conn: &mut SqliteConnection,
    apply: AfterSaleApply,
    no: String,
    as_of: DateTime,
) -> Result<Result<AfterSaleRow, AfterSaleFailure>, sqlx::Error> {
    let item = fetch_item(&mut *conn, apply.order_item_id)
        .await?
        .filter(|item| item.user_id == apply.user_id);
    let Some(item) = item else {
        return Ok(Err(AfterSaleFailure::ItemNotFound));
    };
    let Some(order) = fetch_order(&mut *conn, item.order_id).await? else {
        return Ok(Err(AfterSaleFailure::ItemNotFound));
    };
    if !order.status.allows_after_sale() {
        return Ok(Err(AfterSaleFailure::OrderStatus(order.status)));
    }
    if item.after_sale_status != ItemAfterSaleStatus::None {
        return Ok(Err(AfterSaleFailure::AlreadyApplied));
    }
    if apply.refund_price < 1 || apply.refund_price > item.pay_price {
        return Ok(Err(AfterSaleFailure::RefundPrice {
            max: item.pay_price,
        }));
    }

    let after_sale_id: AfterSaleId = sqlx::query_scalar(
        r#"
        insert into
            after_sale (
                no, order_id, order_item_id, user_id, sku_id, count, way, status, reason,
                description, refund_price, created_at
            )
        values
            ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        returning
            id
        "#,
    )
    .bind(&no)
    .bind(item.order_id)
    .bind(item.id)
    .bind(item.user_id)
    .bind(item.sku_id)
    .bind(item.count)
    .bind(apply.way)
    .bind(AfterSaleStatus::Apply)
    .bind(&apply.reason)
    .bind(&apply.description)
    .bind(apply.refund_price)
    .bind(as_of)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query(
        "update trade_order_item set after_sale_id = $2, after_sale_status = $3 where id = $1",
    )
    .bind(item.id)
    .bind(after_sale_id)
    .bind(ItemAfterSaleStatus::Applying)
    .execute(&mut *conn)
    .await?;

    Ok(fetch_after_sale(conn, after_sale_id)
        .await?
        .ok_or(AfterSaleFailure::NotFound))
}

/// Return the item's stock, record the refund on the order and its payment
/// order, and close the order once every item has been refunded.
async fn settle_refund(
    conn: &mut SqliteConnection,
    after_sale: &AfterSaleRow,
    as_of: DateTime,
) -> Result<(), sqlx::Error> {
    sqlx::query("update sku set stock = stock + $2 where id = $1")
        .bind(after_sale.sku_id)
        .bind(after_sale.count)
        .execute(&mut *conn)
        .await?;

    let order = fetch_order(&mut *conn, after_sale.order_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let items = fetch_items(&mut *conn, order.id).await?;
    let all_refunded = items
        .iter()
        .all(|item| item.after_sale_status == ItemAfterSaleStatus::Success);

    // closing the order also returns its shipping fee, so "all" is the whole payment
    let (status, cancel_type, refund_status, refund) = if all_refunded {
        (
            OrderStatus::Canceled,
            Some(CancelType::AfterSaleClose),
            RefundStatus::All,
            after_sale.refund_price + order.price.delivery_price,
        )
    } else {
        (
            order.status,
            order.cancel_type,
            RefundStatus::Part,
            after_sale.refund_price,
        )
    };

    sqlx::query(
        r#"
        update
            trade_order
        set
            status = $2,
            cancel_type = $3,
            cancel_time = case when $2 = $7 then $6 else cancel_time end,
            refund_status = $4,
            refund_price = refund_price + $5,
            updated_at = $6
        where
            id = $1
        "#,
    )
    .bind(order.id)
    .bind(status)
    .bind(cancel_type)
    .bind(refund_status)
    .bind(refund)
    .bind(as_of)
    .bind(OrderStatus::Canceled)
    .execute(&mut *conn)
    .await?;

    if let Some(pay_order_id) = order.pay_order_id {
        sqlx::query("update pay_order set refund_price = refund_price + $2 where id = $1")
            .bind(pay_order_id)
            .bind(refund)
            .execute(&mut *conn)
            .await?;
    }

    insert_log(
        conn,
        order.id,
        Operator::system(),
        Some(order.status),
        status,
        OrderOperateType::AfterSaleRefund,
        format!("after-sale {} refunded {}", after_sale.no, refund),
        as_of,
    )
    .await
}
