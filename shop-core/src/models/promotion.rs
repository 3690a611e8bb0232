use crate::models::{ActivityId, CategoryId, CouponId, SkuId, SpuId, UserId};

/// The mechanism behind a promotion record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[repr(i32)]
pub enum PromotionKind {
    /// Flash sale price override
    Seckill = 1,
    /// Bargain price override
    Bargain = 2,
    /// Group-buy price override
    Combination = 3,
    /// Time-limited per-SKU discount
    Discount = 4,
    /// Threshold ("full reduction") promotion
    Reward = 5,
    /// Membership tier discount
    MemberLevel = 6,
    /// Coupon
    Coupon = 7,
    /// Loyalty point deduction
    Point = 8,
    /// Point-redemption activity price override
    PointActivity = 9,
}

/// How much a promotion took off a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PromotionItem {
    /// The line's SKU
    pub sku_id: SkuId,
    /// The line's pay price before this promotion
    pub total_price: i64,
    /// What this promotion took off the line
    pub discount_price: i64,
}

/// A receipt/audit entry describing one applied (or near-miss) promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PromotionRecord {
    /// Id of the activity, coupon or level behind the promotion
    pub id: i64,
    /// Display name
    pub name: String,
    /// Mechanism
    pub kind: PromotionKind,
    /// Sum of the matched lines' pay prices before the promotion
    pub total_price: i64,
    /// Total taken off
    pub discount_price: i64,
    /// Whether the promotion's condition was met
    pub matched: bool,
    /// Human-readable explanation, e.g. "spend 20.00 more to save 10.00"
    pub description: String,
    /// The matched lines
    pub items: Vec<PromotionItem>,
}

/// The exclusive (price-override) activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum ExclusiveKind {
    /// Flash sale
    Seckill = 1,
    /// Bargain (the buyer negotiated a price down with friends' help)
    Bargain = 2,
    /// Group buy
    Combination = 3,
    /// Redemption with points (plus an optional cash price)
    Point = 4,
}

impl ExclusiveKind {
    /// The promotion kind recorded when this activity prices a line
    pub fn promotion_kind(self) -> PromotionKind {
        match self {
            Self::Seckill => PromotionKind::Seckill,
            Self::Bargain => PromotionKind::Bargain,
            Self::Combination => PromotionKind::Combination,
            Self::Point => PromotionKind::PointActivity,
        }
    }
}

/// What the activity port is asked to validate and price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveQuery {
    /// Which activity family
    pub kind: ExclusiveKind,
    /// The activity; for bargains this is the buyer's bargain record
    pub activity_id: ActivityId,
    /// The SKU being bought
    pub sku_id: SkuId,
    /// Quantity
    pub count: i32,
    /// Buyer
    pub user_id: UserId,
}

/// The negotiated price for an exclusive activity line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveQuote {
    /// Owning activity (for bargains, the activity behind the record)
    pub activity_id: ActivityId,
    /// Activity name
    pub name: String,
    /// Fixed unit price, in cents
    pub unit_price: i64,
    /// Points charged per unit (point activities only)
    pub unit_point: i64,
}

/// Which products a promotion or coupon covers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "scope", content = "ids", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ProductScope {
    /// Every product
    All,
    /// Only these SPUs
    Spu(Vec<SpuId>),
    /// Only products in these categories
    Category(Vec<CategoryId>),
}

impl ProductScope {
    /// Whether a line with the given spu and category is covered
    pub fn matches(&self, spu_id: SpuId, category_id: CategoryId) -> bool {
        match self {
            Self::All => true,
            Self::Spu(ids) => ids.contains(&spu_id),
            Self::Category(ids) => ids.contains(&category_id),
        }
    }
}

/// What a reward rule's `limit` is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum ConditionType {
    /// The matched lines' pay price, in cents
    Price = 10,
    /// The matched lines' unit count
    Count = 20,
}

/// One tier of a reward activity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardRule {
    /// Threshold, in the activity's condition type
    pub limit: i64,
    /// Amount taken off the matched lines
    pub discount_price: i64,
    /// Whether the matched lines ship for free
    #[cfg_attr(feature = "serde", serde(default))]
    pub free_delivery: bool,
    /// Extra loyalty points granted
    #[cfg_attr(feature = "serde", serde(default))]
    pub give_point: i64,
}

/// A live threshold promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardActivity {
    /// Activity id
    pub id: ActivityId,
    /// Display name
    pub name: String,
    /// What rule limits measure
    pub condition_type: ConditionType,
    /// Which products participate
    pub product_scope: ProductScope,
    /// Tiers; the highest satisfied limit wins
    pub rules: Vec<RewardRule>,
}

/// How a time-limited discount reduces a unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[repr(i32)]
pub enum DiscountType {
    /// A fixed amount off each unit
    Price = 1,
    /// Pay a percentage of each unit, e.g. 85 means 15% off
    Percent = 2,
}

/// A SKU participating in a live time-limited discount activity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscountProduct {
    /// Owning activity
    pub activity_id: ActivityId,
    /// Activity name
    pub activity_name: String,
    /// Discounted SKU
    pub sku_id: SkuId,
    /// Fixed or percentage
    pub discount_type: DiscountType,
    /// Percentage paid (for `Percent`)
    pub discount_percent: i32,
    /// Amount off per unit (for `Price`)
    pub discount_price: i64,
}

impl DiscountProduct {
    /// The saving on a line of `count` units currently paying `pay_price`,
    /// never more than `pay_price`.
    pub fn saving(&self, pay_price: i64, count: i32) -> i64 {
        let saving = match self.discount_type {
            DiscountType::Price => self.discount_price * count as i64,
            DiscountType::Percent => {
                if self.discount_percent <= 0 || self.discount_percent >= 100 {
                    0
                } else {
                    pay_price - pay_price * self.discount_percent as i64 / 100
                }
            }
        };
        saving.clamp(0, pay_price.max(0))
    }
}

/// The coupon port's answer for a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CouponQuote {
    /// Coupon id
    pub coupon_id: CouponId,
    /// Coupon name
    pub name: String,
    /// Amount the coupon takes off, in cents
    pub discount_price: i64,
}
