use crate::models::{
    AfterSaleId, DateTime, LogisticsId, OrderId, OrderItemId, SkuId, UserId,
};

/// What the buyer asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum AfterSaleWay {
    /// Money back, the goods stay with the buyer
    Refund = 10,
    /// The goods are shipped back before the refund
    ReturnAndRefund = 20,
}

/// Progress of an after-sale request.
///
/// ```text
/// Apply -> Approved -> AwaitingReturn -> RefundPending -> Refunded
///   |         |              |
///   |         |              +--> ReturnRefused
///   +---------+--> BuyerCanceled
///   +--> Rejected
/// ```
///
/// Refund-only requests skip straight from `Apply` to `RefundPending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum AfterSaleStatus {
    /// Waiting for the seller's review
    Apply = 10,
    /// Approved, waiting for the buyer to ship the goods back
    Approved = 20,
    /// Goods shipped back, waiting for the seller to receive them
    AwaitingReturn = 30,
    /// Waiting for the seller to refund
    RefundPending = 40,
    /// Refunded
    Refunded = 50,
    /// Withdrawn by the buyer
    BuyerCanceled = 61,
    /// Declined by the seller
    Rejected = 62,
    /// The seller refused the returned goods
    ReturnRefused = 63,
}

impl AfterSaleStatus {
    /// Whether the request is still open
    pub fn is_open(self) -> bool {
        matches!(
            self,
            Self::Apply | Self::Approved | Self::AwaitingReturn | Self::RefundPending
        )
    }

    /// The status a request moves to when the seller approves it.
    pub fn approved(way: AfterSaleWay) -> Self {
        match way {
            AfterSaleWay::Refund => Self::RefundPending,
            AfterSaleWay::ReturnAndRefund => Self::Approved,
        }
    }

    /// Whether the buyer may still withdraw the request
    pub fn buyer_cancelable(self) -> bool {
        matches!(self, Self::Apply | Self::Approved)
    }
}

/// A buyer's after-sale request for one order item.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AfterSaleApply {
    /// The buyer raising the request
    pub user_id: UserId,
    /// The item concerned
    pub order_item_id: OrderItemId,
    /// Refund only, or return and refund
    pub way: AfterSaleWay,
    /// Amount requested, at most the item's pay price
    pub refund_price: i64,
    /// Why
    pub reason: String,
    /// Free-form details
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
}

/// A persisted after-sale request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AfterSale {
    /// Id
    pub id: AfterSaleId,
    /// Human-facing number
    pub no: String,
    /// Owning order
    pub order_id: OrderId,
    /// Item concerned
    pub order_item_id: OrderItemId,
    /// Buyer
    pub user_id: UserId,
    /// SKU of the item
    pub sku_id: SkuId,
    /// Units of the item
    pub count: i32,
    /// Refund only, or return and refund
    pub way: AfterSaleWay,
    /// Progress
    pub status: AfterSaleStatus,
    /// Why the buyer asked
    pub reason: String,
    /// Buyer's details
    pub description: Option<String>,
    /// Amount to refund
    pub refund_price: i64,
    /// Seller's reason for declining or refusing
    pub audit_reason: Option<String>,
    /// Carrier of the returned goods
    pub logistics_id: Option<LogisticsId>,
    /// Tracking number of the returned goods
    pub logistics_no: Option<String>,
    /// When the seller reviewed the request
    pub audit_time: Option<DateTime>,
    /// When the seller received the returned goods
    pub receive_time: Option<DateTime>,
    /// When the refund was made
    pub refund_time: Option<DateTime>,
    /// When the request was raised
    pub created_at: DateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refund_only_skips_return() {
        assert_eq!(
            AfterSaleStatus::approved(AfterSaleWay::Refund),
            AfterSaleStatus::RefundPending
        );
        assert_eq!(
            AfterSaleStatus::approved(AfterSaleWay::ReturnAndRefund),
            AfterSaleStatus::Approved
        );
    }

    #[test]
    fn test_open_statuses() {
        assert!(AfterSaleStatus::RefundPending.is_open());
        assert!(!AfterSaleStatus::Refunded.is_open());
        assert!(!AfterSaleStatus::ReturnRefused.is_open());
        assert!(!AfterSaleStatus::AwaitingReturn.buyer_cancelable());
    }
}
