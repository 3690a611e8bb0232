use crate::models::{
    ActivityId, AddressId, CartId, CategoryId, CouponId, DeliveryType, ExclusiveKind,
    PromotionRecord, SkuId, SkuProperty, SpuId, StoreId, TemplateId, UserId,
};

/// Classifies an order by the exclusive activity (if any) that prices it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum OrderType {
    /// Regular checkout; every promotion mechanism may apply
    #[default]
    Normal = 0,
    /// Flash sale
    Seckill = 1,
    /// Bargain
    Bargain = 2,
    /// Group buy
    Combination = 3,
    /// Point redemption
    Point = 4,
}

impl OrderType {
    /// Whether an exclusive activity prices this order
    pub fn is_exclusive(self) -> bool {
        self != Self::Normal
    }
}

impl From<ExclusiveKind> for OrderType {
    fn from(kind: ExclusiveKind) -> Self {
        match kind {
            ExclusiveKind::Seckill => Self::Seckill,
            ExclusiveKind::Bargain => Self::Bargain,
            ExclusiveKind::Combination => Self::Combination,
            ExclusiveKind::Point => Self::Point,
        }
    }
}

/// A single line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RequestItem {
    /// The SKU being bought
    pub sku_id: SkuId,
    /// Quantity, must be positive
    pub count: i32,
    /// The cart row this line was checked out from
    #[cfg_attr(feature = "serde", serde(default))]
    pub cart_id: Option<CartId>,
    /// Unselected lines are carried through but never priced
    #[cfg_attr(feature = "serde", serde(default = "default_selected"))]
    pub selected: bool,
}

#[cfg(feature = "serde")]
fn default_selected() -> bool {
    true
}

/// A checkout (or price preview) request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceRequest {
    /// The buyer
    pub user_id: UserId,
    /// Coupon to apply
    #[cfg_attr(feature = "serde", serde(default))]
    pub coupon_id: Option<CouponId>,
    /// Whether to pay part of the order with loyalty points
    #[cfg_attr(feature = "serde", serde(default))]
    pub point_status: bool,
    /// Express or pick-up
    pub delivery_type: DeliveryType,
    /// Destination for express delivery
    #[cfg_attr(feature = "serde", serde(default))]
    pub address_id: Option<AddressId>,
    /// Store for pick-up delivery
    #[cfg_attr(feature = "serde", serde(default))]
    pub pick_up_store_id: Option<StoreId>,
    /// Flash sale activity
    #[cfg_attr(feature = "serde", serde(default))]
    pub seckill_activity_id: Option<ActivityId>,
    /// Group buy activity
    #[cfg_attr(feature = "serde", serde(default))]
    pub combination_activity_id: Option<ActivityId>,
    /// The group being joined, absent when starting a new group
    #[cfg_attr(feature = "serde", serde(default))]
    pub combination_head_id: Option<i64>,
    /// The buyer's successful bargain record
    #[cfg_attr(feature = "serde", serde(default))]
    pub bargain_record_id: Option<ActivityId>,
    /// Point redemption activity
    #[cfg_attr(feature = "serde", serde(default))]
    pub point_activity_id: Option<ActivityId>,
    /// Lines in display order
    pub items: Vec<RequestItem>,
}

impl PriceRequest {
    /// Every exclusive activity selector that is set.
    pub fn exclusive_selectors(&self) -> Vec<(ExclusiveKind, ActivityId)> {
        [
            (ExclusiveKind::Seckill, self.seckill_activity_id),
            (ExclusiveKind::Combination, self.combination_activity_id),
            (ExclusiveKind::Bargain, self.bargain_record_id),
            (ExclusiveKind::Point, self.point_activity_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
        .collect()
    }

    /// The exclusive activity pricing this request, if exactly one selector is set.
    pub fn exclusive(&self) -> Option<(ExclusiveKind, ActivityId)> {
        match self.exclusive_selectors().as_slice() {
            [single] => Some(*single),
            _ => None,
        }
    }

    /// The order type implied by the selectors.
    pub fn order_type(&self) -> OrderType {
        self.exclusive()
            .map(|(kind, _)| kind.into())
            .unwrap_or(OrderType::Normal)
    }
}

/// One line of a price computation.
///
/// `pay_price` is always derived from the other price fields; see
/// `shop_trade::allocation::recount_pay_price`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricedItem {
    /// SKU
    pub sku_id: SkuId,
    /// Parent product
    pub spu_id: SpuId,
    /// Product name
    pub spu_name: String,
    /// Picture (SKU picture, falling back to the product's)
    pub pic_url: Option<String>,
    /// SKU properties
    pub properties: Vec<SkuProperty>,
    /// Quantity
    pub count: i32,
    /// Originating cart row
    pub cart_id: Option<CartId>,
    /// Whether the line takes part in pricing
    pub selected: bool,
    /// Unit price, in cents
    pub price: i64,
    /// Activity savings (exclusive override, reward, time-limited discount)
    pub discount_price: i64,
    /// Shipping allotted to this line (order-level shipping is not divided)
    pub delivery_price: i64,
    /// Coupon share
    pub coupon_price: i64,
    /// Point deduction share, in cents
    pub point_price: i64,
    /// Points spent on this line
    pub use_point: i64,
    /// Membership tier saving
    pub vip_price: i64,
    /// What the buyer pays for this line
    pub pay_price: i64,
    /// Points granted for this line
    pub give_point: i64,
    /// Product category
    pub category_id: CategoryId,
    /// Freight template for express delivery
    pub delivery_template_id: Option<TemplateId>,
    /// Delivery types the product supports
    pub delivery_types: Vec<DeliveryType>,
    /// Unit weight in grams
    pub weight: i64,
    /// Unit volume in cubic centimetres
    pub volume: i64,
    /// Whether a reward promotion waived shipping for this line
    pub free_delivery: bool,
}

impl PricedItem {
    /// `price * count`
    pub fn total(&self) -> i64 {
        self.price * self.count as i64
    }
}

/// Order-level sums of the per-line price fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PriceTotals {
    /// Sum of `price * count`
    pub total_price: i64,
    /// Sum of activity savings
    pub discount_price: i64,
    /// Shipping fee
    pub delivery_price: i64,
    /// Coupon saving
    pub coupon_price: i64,
    /// Point deduction, in cents
    pub point_price: i64,
    /// Membership tier saving
    pub vip_price: i64,
    /// What the buyer pays
    pub pay_price: i64,
}

/// The result of pricing a request. Created fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceContext {
    /// Derived from the request's exclusive selectors
    pub order_type: OrderType,
    /// Order totals
    pub price: PriceTotals,
    /// One entry per request line, in request order
    pub items: Vec<PricedItem>,
    /// Applied (and near-miss) promotions
    pub promotions: Vec<PromotionRecord>,
    /// Coupon that was applied
    pub coupon_id: Option<CouponId>,
    /// Points spent
    pub use_point: i64,
    /// Points granted on completion
    pub give_point: i64,
    /// The buyer's point balance at pricing time
    pub total_point: i64,
    /// The activity owning the exclusive price, once resolved
    pub activity_id: Option<ActivityId>,
    /// Whether a reward promotion waived shipping for the whole order
    pub free_delivery: bool,
}

impl PriceContext {
    /// The selected lines
    pub fn selected(&self) -> impl Iterator<Item = &PricedItem> {
        self.items.iter().filter(|item| item.selected)
    }
}

/// The best promotional price of a single unit of a SKU, for product listings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkuPrice {
    /// SKU
    pub sku_id: SkuId,
    /// List price
    pub price: i64,
    /// Price after reward, discount and membership savings
    pub pay_price: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PriceRequest {
        PriceRequest {
            user_id: UserId(1),
            coupon_id: None,
            point_status: false,
            delivery_type: DeliveryType::Express,
            address_id: Some(AddressId(1)),
            pick_up_store_id: None,
            seckill_activity_id: None,
            combination_activity_id: None,
            combination_head_id: None,
            bargain_record_id: None,
            point_activity_id: None,
            items: vec![RequestItem {
                sku_id: SkuId(1),
                count: 1,
                cart_id: None,
                selected: true,
            }],
        }
    }

    #[test]
    fn test_order_type_follows_selector() {
        let mut req = request();
        assert_eq!(req.order_type(), OrderType::Normal);

        req.bargain_record_id = Some(ActivityId(7));
        assert_eq!(req.order_type(), OrderType::Bargain);
        assert_eq!(req.exclusive(), Some((ExclusiveKind::Bargain, ActivityId(7))));
    }

    #[test]
    fn test_conflicting_selectors_have_no_exclusive() {
        let mut req = request();
        req.seckill_activity_id = Some(ActivityId(1));
        req.combination_activity_id = Some(ActivityId(2));
        assert_eq!(req.exclusive_selectors().len(), 2);
        assert_eq!(req.exclusive(), None);
    }

    #[test]
    fn test_selected_defaults_to_true() {
        let item: RequestItem = serde_json::from_str(r#"{"sku_id":3,"count":2}"#).unwrap();
        assert!(item.selected);
        assert_eq!(item.cart_id, None);
    }
}
