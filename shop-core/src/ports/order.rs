use crate::{
    TradeError,
    models::{
        CancelType, DateTime, LogisticsId, Operator, Order, OrderDraft, OrderId, OrderLog,
        OrderRecord, OrderStatus, PayOrderId, SkuId, UserId,
    },
};

/// Why the order unit of work refused an operation.
///
/// Every refusal leaves storage exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderFailure {
    /// No such order, or it belongs to someone else
    NotFound,
    /// The order's status does not permit the operation
    InvalidStatus(OrderStatus),
    /// A conditional stock decrement affected no row
    StockInsufficient(SkuId),
    /// The activity's own stock ran out
    ActivityStockInsufficient(SkuId),
    /// The bargain record was used by a concurrent order
    ActivityRecordUsed,
    /// The coupon was consumed concurrently or is no longer valid
    CouponUnavailable,
    /// The buyer's point balance dropped below what the order uses
    PointInsufficient,
    /// The payment order does not belong to the order or is not paid
    PayOrderMismatch,
    /// The operation does not apply to the order's delivery type
    DeliveryTypeMismatch,
    /// An item still has an open after-sale request
    AfterSaleInProgress,
    /// Another order already holds the pick-up verify code
    VerifyCodeTaken,
}

impl From<OrderFailure> for TradeError {
    fn from(value: OrderFailure) -> Self {
        match value {
            OrderFailure::NotFound => TradeError::NotFound("order".to_owned()),
            OrderFailure::InvalidStatus(status) => {
                TradeError::Conflict(format!("order status {status:?} does not allow this"))
            }
            OrderFailure::StockInsufficient(sku_id)
            | OrderFailure::ActivityStockInsufficient(sku_id) => {
                TradeError::StockInsufficient { sku_id }
            }
            OrderFailure::ActivityRecordUsed => {
                TradeError::Ineligible("bargain record was already used".to_owned())
            }
            OrderFailure::CouponUnavailable => {
                TradeError::Ineligible("coupon is no longer available".to_owned())
            }
            OrderFailure::PointInsufficient => {
                TradeError::Ineligible("point balance is insufficient".to_owned())
            }
            OrderFailure::PayOrderMismatch => {
                TradeError::Conflict("payment order does not match the order".to_owned())
            }
            OrderFailure::DeliveryTypeMismatch => {
                TradeError::Conflict("operation does not match the delivery type".to_owned())
            }
            OrderFailure::AfterSaleInProgress => {
                TradeError::Conflict("an item has an open after-sale request".to_owned())
            }
            OrderFailure::VerifyCodeTaken => {
                TradeError::Conflict("pick-up verify code is already in use".to_owned())
            }
        }
    }
}

/// The order unit of work.
///
/// Each mutating method is one transaction: the status guard, the status
/// change, every side effect and the audit log entry commit together or not
/// at all.
pub trait OrderRepository: super::Repository {
    /// Allocate a unique number: `prefix`, the compact timestamp of `as_of`,
    /// and a 6-digit counter scoped to that second.
    fn next_order_no(
        &self,
        prefix: &str,
        as_of: DateTime,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Commit a checkout.
    ///
    /// Inserts the order and its items, deletes the checked-out cart rows,
    /// decrements stock conditionally, applies exclusive activity side
    /// effects, consumes the coupon, deducts points, creates the dependent
    /// payment order (or marks a free order paid) and logs the creation.
    fn create_order(
        &self,
        draft: OrderDraft,
    ) -> impl Future<Output = Result<Result<OrderRecord, OrderFailure>, Self::Error>> + Send;

    /// Get an order with its items
    fn get_order(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<Option<OrderRecord>, Self::Error>> + Send;

    /// Get the audit log of an order, oldest first
    fn get_order_logs(
        &self,
        order_id: OrderId,
    ) -> impl Future<Output = Result<Vec<OrderLog>, Self::Error>> + Send;

    /// Record a successful payment: `Unpaid` to `Undelivered`.
    fn pay_order(
        &self,
        order_id: OrderId,
        pay_order_id: PayOrderId,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<Order, OrderFailure>, Self::Error>> + Send;

    /// Cancel an unpaid order, restoring stock, activity stock, coupon and
    /// points, and closing its payment order.
    ///
    /// Member operators may only cancel their own orders.
    fn cancel_order(
        &self,
        order_id: OrderId,
        operator: Operator,
        cancel_type: CancelType,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<Order, OrderFailure>, Self::Error>> + Send;

    /// Cancel a paid, undelivered order, restoring everything `cancel_order`
    /// restores and refunding the full pay price.
    fn cancel_paid_order(
        &self,
        order_id: OrderId,
        operator: Operator,
        cancel_type: CancelType,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<Order, OrderFailure>, Self::Error>> + Send;

    /// Unpaid orders created before `created_before`, oldest first.
    fn list_expired_orders(
        &self,
        created_before: DateTime,
        limit: u32,
    ) -> impl Future<Output = Result<Vec<OrderId>, Self::Error>> + Send;

    /// Ship an express order: `Undelivered` to `Delivered`.
    fn deliver_order(
        &self,
        order_id: OrderId,
        logistics_id: LogisticsId,
        logistics_no: String,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<Order, OrderFailure>, Self::Error>> + Send;

    /// The buyer confirms receipt: `Delivered` to `Completed`.
    fn receive_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<Order, OrderFailure>, Self::Error>> + Send;

    /// Verify a pick-up code at the store: `Undelivered` to `Completed`.
    fn pick_up_order(
        &self,
        verify_code: &str,
        operator: Operator,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<Order, OrderFailure>, Self::Error>> + Send;
}
