use crate::{
    TradeError,
    models::{
        AfterSale, AfterSaleApply, AfterSaleId, AfterSaleStatus, DateTime, LogisticsId,
        OrderStatus, UserId,
    },
};

/// Why an after-sale operation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AfterSaleFailure {
    /// No such after-sale request, or it belongs to someone else
    NotFound,
    /// No such order item, or it belongs to someone else
    ItemNotFound,
    /// The order's status does not allow after-sale requests
    OrderStatus(OrderStatus),
    /// The item already has an open or successful request
    AlreadyApplied,
    /// The requested refund is outside `1..=max`
    RefundPrice {
        /// The item's pay price
        max: i64,
    },
    /// The request's status does not permit the operation
    InvalidStatus(AfterSaleStatus),
}

impl From<AfterSaleFailure> for TradeError {
    fn from(value: AfterSaleFailure) -> Self {
        match value {
            AfterSaleFailure::NotFound => TradeError::NotFound("after-sale".to_owned()),
            AfterSaleFailure::ItemNotFound => TradeError::NotFound("order item".to_owned()),
            AfterSaleFailure::OrderStatus(status) => TradeError::Conflict(format!(
                "order status {status:?} does not allow after-sale"
            )),
            AfterSaleFailure::AlreadyApplied => {
                TradeError::Conflict("item already has an after-sale request".to_owned())
            }
            AfterSaleFailure::RefundPrice { max } => {
                TradeError::Validation(format!("refund price must be between 1 and {max}"))
            }
            AfterSaleFailure::InvalidStatus(status) => TradeError::Conflict(format!(
                "after-sale status {status:?} does not allow this"
            )),
        }
    }
}

/// The after-sale unit of work. Each method is one guarded, logged transaction.
pub trait AfterSaleRepository: super::Repository {
    /// Open a request for an order item
    fn create_after_sale(
        &self,
        apply: AfterSaleApply,
        no: String,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// The seller approves a request in `Apply`
    fn agree_after_sale(
        &self,
        after_sale_id: AfterSaleId,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// The seller declines a request in `Apply`
    fn disagree_after_sale(
        &self,
        after_sale_id: AfterSaleId,
        reason: String,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// The buyer ships the goods back
    fn deliver_after_sale(
        &self,
        user_id: UserId,
        after_sale_id: AfterSaleId,
        logistics_id: LogisticsId,
        logistics_no: String,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// The seller receives the returned goods
    fn receive_after_sale(
        &self,
        after_sale_id: AfterSaleId,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// The seller refuses the returned goods
    fn refuse_after_sale(
        &self,
        after_sale_id: AfterSaleId,
        reason: String,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// Refund a request in `RefundPending`.
    ///
    /// Restores the item's stock, records the refund on the order and closes
    /// the order once every item has been refunded.
    fn refund_after_sale(
        &self,
        after_sale_id: AfterSaleId,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// The buyer withdraws a request
    fn cancel_after_sale(
        &self,
        user_id: UserId,
        after_sale_id: AfterSaleId,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<AfterSale, AfterSaleFailure>, Self::Error>> + Send;

    /// Get a request
    fn get_after_sale(
        &self,
        after_sale_id: AfterSaleId,
    ) -> impl Future<Output = Result<Option<AfterSale>, Self::Error>> + Send;
}
