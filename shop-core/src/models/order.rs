use crate::models::{
    ActivityId, AfterSaleId, AreaId, CartId, CouponId, DateTime, DeliveryType, ExclusiveKind,
    LogisticsId, OrderId, OrderItemId, OrderType, PayOrderId, PriceTotals, SkuId, SkuProperty,
    SpuId, StoreId, UserId,
};

/// Where an order is in its lifecycle.
///
/// ```text
/// Unpaid -> Undelivered -> Delivered -> Completed
///   |            |
///   +------------+--> Canceled
/// ```
///
/// Pick-up orders go straight from `Undelivered` to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum OrderStatus {
    /// Waiting for payment
    Unpaid = 0,
    /// Paid, waiting for shipment or pick-up
    Undelivered = 10,
    /// Shipped
    Delivered = 20,
    /// Received or picked up
    Completed = 30,
    /// Canceled (see [`CancelType`])
    Canceled = 40,
}

impl OrderStatus {
    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Unpaid, Undelivered)
                | (Unpaid, Canceled)
                | (Undelivered, Delivered)
                | (Undelivered, Completed)
                | (Undelivered, Canceled)
                | (Delivered, Completed)
        )
    }

    /// Whether after-sale requests may be raised in this status
    pub fn allows_after_sale(self) -> bool {
        matches!(self, Self::Undelivered | Self::Delivered | Self::Completed)
    }
}

/// Who or what canceled an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum CancelType {
    /// The buyer canceled an unpaid order
    UserCancel = 10,
    /// The system closed an order that was not paid in time
    PayTimeout = 20,
    /// Every item was refunded through after-sale
    AfterSaleClose = 30,
    /// An administrator canceled the order
    AdminCancel = 40,
    /// The group buy the order joined failed
    CombinationClose = 50,
}

/// The kind of principal behind an order log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum UserType {
    /// Background jobs and callbacks
    System = 0,
    /// A buyer
    Member = 1,
    /// Back-office staff
    Admin = 2,
}

/// What happened to an order, as recorded in its log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum OrderOperateType {
    /// Order placed
    Create = 1,
    /// Payment confirmed
    Pay = 10,
    /// Shipped
    Deliver = 20,
    /// Buyer confirmed receipt
    Receive = 30,
    /// Collected at the store
    PickUp = 31,
    /// Unpaid order canceled
    Cancel = 40,
    /// Unpaid order expired
    Timeout = 41,
    /// Paid order canceled and refunded
    CancelPaid = 42,
    /// An item was refunded through after-sale
    AfterSaleRefund = 50,
}

/// Order-level refund progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum RefundStatus {
    /// Nothing refunded
    #[default]
    None = 0,
    /// Some items refunded
    Part = 10,
    /// Fully refunded
    All = 20,
}

/// Status of the payment order an order depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum PayOrderStatus {
    /// Created, waiting for the buyer
    Waiting = 0,
    /// Paid
    Success = 10,
    /// Paid then refunded
    Refund = 20,
    /// Closed without payment
    Closed = 30,
}

/// After-sale progress of a single order item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum ItemAfterSaleStatus {
    /// No after-sale request, or the last one was closed without refund
    #[default]
    None = 0,
    /// An after-sale request is in progress
    Applying = 10,
    /// Refunded
    Success = 20,
}

/// The principal performing an order operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operator {
    /// The acting user, absent for the system
    pub user_id: Option<UserId>,
    /// Operator kind
    pub user_type: UserType,
}

impl Operator {
    /// A buyer acting on their own order
    pub fn member(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            user_type: UserType::Member,
        }
    }

    /// Back-office staff
    pub fn admin(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            user_type: UserType::Admin,
        }
    }

    /// Background jobs and callbacks
    pub fn system() -> Self {
        Self {
            user_id: None,
            user_type: UserType::System,
        }
    }
}

/// Snapshot of the delivery address at checkout time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receiver {
    /// Receiver name
    pub name: String,
    /// Receiver phone
    pub mobile: String,
    /// Destination area
    pub area_id: AreaId,
    /// Street address
    pub detail_address: String,
}

/// An exclusive activity bound to an order, whose own inventory or records
/// must change in the same transaction as the order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivityReservation {
    /// Activity family
    pub kind: ExclusiveKind,
    /// Owning activity
    pub activity_id: ActivityId,
    /// Bargain record consumed by the order
    pub record_id: Option<ActivityId>,
    /// Group joined by the order
    pub combination_head_id: Option<i64>,
    /// SKU reserved
    pub sku_id: SkuId,
    /// Units reserved
    pub count: i32,
}

/// A priced order line ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemDraft {
    /// Originating cart row, deleted when the order commits
    pub cart_id: Option<CartId>,
    /// SKU
    pub sku_id: SkuId,
    /// Product
    pub spu_id: SpuId,
    /// Product name
    pub spu_name: String,
    /// Picture
    pub pic_url: Option<String>,
    /// SKU properties
    pub properties: Vec<SkuProperty>,
    /// Quantity
    pub count: i32,
    /// Unit price
    pub price: i64,
    /// Activity savings
    pub discount_price: i64,
    /// Shipping share
    pub delivery_price: i64,
    /// Coupon share
    pub coupon_price: i64,
    /// Point deduction share
    pub point_price: i64,
    /// Points spent
    pub use_point: i64,
    /// Tier saving
    pub vip_price: i64,
    /// Amount paid
    pub pay_price: i64,
    /// Points granted
    pub give_point: i64,
}

/// Everything the order unit of work needs to commit a checkout.
///
/// The draft carries the final numbers of a price computation; persistence
/// never recomputes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// Human-facing order number
    pub no: String,
    /// Order type
    pub order_type: OrderType,
    /// Buyer
    pub user_id: UserId,
    /// Buyer remark
    pub remark: Option<String>,
    /// Express or pick-up
    pub delivery_type: DeliveryType,
    /// Address snapshot for express delivery
    pub receiver: Option<Receiver>,
    /// Store for pick-up
    pub pick_up_store_id: Option<StoreId>,
    /// Code shown at the store for pick-up orders
    pub pick_up_verify_code: Option<String>,
    /// Order totals
    pub price: PriceTotals,
    /// Coupon to consume
    pub coupon_id: Option<CouponId>,
    /// Points to deduct from the buyer
    pub use_point: i64,
    /// Points granted on completion
    pub give_point: i64,
    /// Exclusive activity side effects
    pub activity: Option<ActivityReservation>,
    /// Lines
    pub items: Vec<OrderItemDraft>,
    /// Subject of the dependent payment order
    pub subject: String,
    /// Payment application the payment order belongs to
    pub pay_app_id: i64,
    /// When the payment order (and the unpaid order) expires
    pub pay_expire_at: DateTime,
    /// Checkout time
    pub created_at: DateTime,
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    /// Order id
    pub id: OrderId,
    /// Human-facing order number
    pub no: String,
    /// Order type
    pub order_type: OrderType,
    /// Buyer
    pub user_id: UserId,
    /// Lifecycle status
    pub status: OrderStatus,
    /// Set once canceled
    pub cancel_type: Option<CancelType>,
    /// Buyer remark
    pub remark: Option<String>,
    /// Whether payment was received
    pub pay_status: bool,
    /// When payment was received
    pub pay_time: Option<DateTime>,
    /// Dependent payment order, absent for free orders
    pub pay_order_id: Option<PayOrderId>,
    /// Express or pick-up
    pub delivery_type: DeliveryType,
    /// Carrier
    pub logistics_id: Option<LogisticsId>,
    /// Tracking number
    pub logistics_no: Option<String>,
    /// Shipment time
    pub delivery_time: Option<DateTime>,
    /// Receipt time
    pub receive_time: Option<DateTime>,
    /// Completion time
    pub finish_time: Option<DateTime>,
    /// Cancellation time
    pub cancel_time: Option<DateTime>,
    /// Address snapshot
    pub receiver: Option<Receiver>,
    /// Pick-up store
    pub pick_up_store_id: Option<StoreId>,
    /// Pick-up verification code
    pub pick_up_verify_code: Option<String>,
    /// Price snapshot
    pub price: PriceTotals,
    /// Consumed coupon
    pub coupon_id: Option<CouponId>,
    /// Points spent
    pub use_point: i64,
    /// Points granted
    pub give_point: i64,
    /// Refund progress
    pub refund_status: RefundStatus,
    /// Amount refunded so far
    pub refund_price: i64,
    /// Exclusive activity
    pub activity_id: Option<ActivityId>,
    /// Bargain record
    pub bargain_record_id: Option<ActivityId>,
    /// Joined group
    pub combination_head_id: Option<i64>,
    /// Checkout time
    pub created_at: DateTime,
    /// Last change
    pub updated_at: DateTime,
}

/// A persisted order line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderItem {
    /// Item id
    pub id: OrderItemId,
    /// Owning order
    pub order_id: OrderId,
    /// Buyer
    pub user_id: UserId,
    /// Originating cart row
    pub cart_id: Option<CartId>,
    /// SKU
    pub sku_id: SkuId,
    /// Product
    pub spu_id: SpuId,
    /// Product name
    pub spu_name: String,
    /// Picture
    pub pic_url: Option<String>,
    /// SKU properties
    pub properties: Vec<SkuProperty>,
    /// Quantity
    pub count: i32,
    /// Unit price
    pub price: i64,
    /// Activity savings
    pub discount_price: i64,
    /// Shipping share
    pub delivery_price: i64,
    /// Coupon share
    pub coupon_price: i64,
    /// Point deduction share
    pub point_price: i64,
    /// Points spent
    pub use_point: i64,
    /// Tier saving
    pub vip_price: i64,
    /// Amount paid
    pub pay_price: i64,
    /// Points granted
    pub give_point: i64,
    /// Latest after-sale request
    pub after_sale_id: Option<AfterSaleId>,
    /// After-sale progress
    pub after_sale_status: ItemAfterSaleStatus,
}

/// An order with its items.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderRecord {
    /// The order
    pub order: Order,
    /// Its lines
    pub items: Vec<OrderItem>,
}

/// An immutable audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderLog {
    /// The order
    pub order_id: OrderId,
    /// Operator, absent for the system
    pub user_id: Option<UserId>,
    /// Operator kind
    pub user_type: UserType,
    /// Status before the operation (absent on creation)
    pub before_status: Option<OrderStatus>,
    /// Status after the operation
    pub after_status: OrderStatus,
    /// Operation
    pub operate_type: OrderOperateType,
    /// Free-form description
    pub content: String,
    /// When it happened
    pub created_at: DateTime,
}
