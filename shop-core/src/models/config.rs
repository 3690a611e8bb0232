use std::time::Duration;

/// Checkout takes place within a context. This config describes this context.
///
/// The values here are merchant-level settings that the pricing pipeline and
/// order assembly consult; they are loaded once at startup.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeConfig {
    /// Whether orders above `delivery_express_free_price` ship for free
    #[cfg_attr(feature = "serde", serde(default))]
    pub delivery_express_free_enabled: bool,

    /// The selected pay price (cents) at which express delivery becomes free
    #[cfg_attr(feature = "serde", serde(default))]
    pub delivery_express_free_price: i64,

    /// How long an unpaid order (and its payment order) stays open
    #[cfg_attr(
        feature = "serde",
        serde(default = "default_pay_expire", with = "humantime_serde")
    )]
    #[cfg_attr(feature = "schemars", schemars(with = "String"))]
    pub pay_expire: Duration,

    /// The application id payment orders are created under
    #[cfg_attr(feature = "serde", serde(default = "default_pay_app_id"))]
    pub pay_app_id: i64,

    /// Point deduction settings
    #[cfg_attr(feature = "serde", serde(default))]
    pub point: PointConfig,
}

/// Loyalty point deduction settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointConfig {
    /// Whether points can be used to pay for orders
    pub trade_deduct_enable: bool,

    /// Value of a single point, in cents
    pub trade_deduct_unit_price: i64,

    /// Maximum number of points usable by one order
    pub trade_deduct_max_price: i64,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            trade_deduct_enable: true,
            trade_deduct_unit_price: 1,
            trade_deduct_max_price: 10_000,
        }
    }
}

#[cfg(feature = "serde")]
fn default_pay_expire() -> Duration {
    Duration::from_secs(30 * 60)
}

#[cfg(feature = "serde")]
fn default_pay_app_id() -> i64 {
    1
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            delivery_express_free_enabled: false,
            delivery_express_free_price: 0,
            pay_expire: Duration::from_secs(30 * 60),
            pay_app_id: 1,
            point: PointConfig::default(),
        }
    }
}
