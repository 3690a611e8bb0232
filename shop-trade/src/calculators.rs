mod coupon;
mod delivery;
mod discount;
mod exclusive;
mod point;
mod reward;

pub use coupon::apply_coupon;
pub use delivery::{apply_delivery_fee, shipping_fee};
pub use discount::apply_discount;
pub use exclusive::apply_exclusive;
pub use point::apply_point;
pub use reward::apply_reward;

use shop_core::{
    TradeError,
    models::{DateTime, OrderType, PriceContext, PriceRequest, TradeConfig},
    ports::PricingRepository,
};

/// Everything a calculator may consult besides the context it transforms.
pub struct PriceScope<'a, R> {
    /// The request being priced
    pub request: &'a PriceRequest,
    /// Storage
    pub repository: &'a R,
    /// Merchant settings
    pub config: &'a TradeConfig,
    /// The pricing time, used to select live activities
    pub as_of: DateTime,
}

/// The closed set of pricing mechanisms.
///
/// Each variant transforms a [`PriceContext`] into the next one. The order in
/// which they run is part of the pricing contract, see [`Calculator::priority`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calculator {
    /// Seckill, bargain, group-buy and point-activity price overrides
    Exclusive,
    /// Threshold ("full reduction") promotions
    Reward,
    /// Time-limited discount vs membership tier, best of per item
    Discount,
    /// Coupon
    Coupon,
    /// Loyalty point deduction
    Point,
    /// Shipping fee
    Delivery,
}

impl Calculator {
    /// Every calculator
    pub const ALL: [Calculator; 6] = [
        Self::Exclusive,
        Self::Reward,
        Self::Discount,
        Self::Coupon,
        Self::Point,
        Self::Delivery,
    ];

    /// Lower runs first
    pub fn priority(self) -> i32 {
        match self {
            Self::Exclusive => 10,
            Self::Reward => 20,
            Self::Discount => 30,
            Self::Coupon => 40,
            Self::Point => 50,
            Self::Delivery => 60,
        }
    }

    /// A short name for logs
    pub fn name(self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Reward => "reward",
            Self::Discount => "discount",
            Self::Coupon => "coupon",
            Self::Point => "point",
            Self::Delivery => "delivery",
        }
    }

    /// Whether the calculator takes part in pricing orders of this type
    pub fn is_applicable(self, order_type: OrderType) -> bool {
        match self {
            Self::Exclusive => order_type.is_exclusive(),
            Self::Reward | Self::Discount | Self::Coupon | Self::Point => {
                order_type == OrderType::Normal
            }
            Self::Delivery => true,
        }
    }

    /// Fetch what the mechanism needs and fold it into the context.
    pub async fn calculate<R: PricingRepository>(
        self,
        scope: &PriceScope<'_, R>,
        ctx: PriceContext,
    ) -> Result<PriceContext, TradeError> {
        match self {
            Self::Exclusive => exclusive::calculate(scope, ctx).await,
            Self::Reward => reward::calculate(scope, ctx).await,
            Self::Discount => discount::calculate(scope, ctx).await,
            Self::Coupon => coupon::calculate(scope, ctx).await,
            Self::Point => point::calculate(scope, ctx).await,
            Self::Delivery => delivery::calculate(scope, ctx).await,
        }
    }
}

/// Render cents as a decimal amount, e.g. `1234` as `12.34`.
pub(crate) fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}
