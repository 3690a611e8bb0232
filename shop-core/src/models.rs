mod after_sale;
mod catalog;
mod config;
mod datetime;
mod delivery;
mod member;
mod order;
mod price;
mod promotion;

pub use after_sale::{AfterSale, AfterSaleApply, AfterSaleStatus, AfterSaleWay};
pub use catalog::{DeliveryType, SkuProperty, Sku, Spu, SpuStatus};
pub use config::{PointConfig, TradeConfig};
pub use datetime::DateTime;
pub use delivery::{ChargeMode, DeliveryTemplate, TemplateCharge, TemplateFree};
pub use member::{MemberAddress, MemberLevel, MemberUser};
pub use order::{
    ActivityReservation, CancelType, ItemAfterSaleStatus, Order, OrderDraft, OrderItem,
    Operator, OrderItemDraft, OrderLog, OrderOperateType, OrderRecord, OrderStatus,
    PayOrderStatus, Receiver, RefundStatus, UserType,
};
pub use price::{
    OrderType, PriceContext, PriceRequest, PriceTotals, PricedItem, RequestItem, SkuPrice,
};
pub use promotion::{
    ConditionType, CouponQuote, DiscountProduct, DiscountType, ExclusiveKind, ExclusiveQuery,
    ExclusiveQuote, ProductScope, PromotionItem, PromotionKind, PromotionRecord, RewardActivity,
    RewardRule,
};

macro_rules! new_id {
    ($struct:ident) => {
        new_id!($struct, "A newtype wrapper around an integral id");
    };
    ($struct:ident, $doc:literal) => {
        #[doc = $doc]
        #[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type), sqlx(transparent))]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $struct(pub i64);

        impl From<i64> for $struct {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$struct> for i64 {
            fn from(value: $struct) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $struct {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

new_id!(UserId, "Unique identifier for a member (buyer)");
new_id!(SkuId, "Unique identifier for a stock-keeping unit");
new_id!(SpuId, "Unique identifier for a standard product unit (parent of SKUs)");
new_id!(CategoryId, "Unique identifier for a product category");
new_id!(CouponId, "Unique identifier for a coupon issued to a member");
new_id!(CartId, "Unique identifier for a shopping cart row");
new_id!(AddressId, "Unique identifier for a member's delivery address");
new_id!(AreaId, "Unique identifier for an administrative area");
new_id!(StoreId, "Unique identifier for a pick-up store");
new_id!(ActivityId, "Unique identifier for a promotion activity");
new_id!(TemplateId, "Unique identifier for a delivery (freight) template");
new_id!(LevelId, "Unique identifier for a membership level");
new_id!(OrderId, "Unique identifier for an order");
new_id!(OrderItemId, "Unique identifier for an order line item");
new_id!(AfterSaleId, "Unique identifier for an after-sale request");
new_id!(PayOrderId, "Unique identifier for a dependent payment order");
new_id!(LogisticsId, "Unique identifier for an express logistics company");
