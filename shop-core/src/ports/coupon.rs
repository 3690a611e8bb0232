use crate::{
    TradeError,
    models::{CategoryId, CouponId, CouponQuote, DateTime, SpuId, UserId},
};

/// Why a coupon cannot be applied to a checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponFailure {
    /// No such coupon
    NotFound,
    /// The coupon belongs to someone else
    NotOwned,
    /// Already used, or outside its validity window
    Unusable,
    /// The selected pay price is below the coupon's minimum
    ThresholdNotMet {
        /// Minimum pay price, in cents
        min_price: i64,
    },
    /// None of the selected products are covered by the coupon
    ScopeMismatch,
}

impl From<CouponFailure> for TradeError {
    fn from(value: CouponFailure) -> Self {
        match value {
            CouponFailure::NotFound | CouponFailure::NotOwned => {
                TradeError::NotFound("coupon".to_owned())
            }
            CouponFailure::Unusable => TradeError::Ineligible("coupon is not usable".to_owned()),
            CouponFailure::ThresholdNotMet { min_price } => TradeError::Ineligible(format!(
                "coupon requires a pay price of at least {min_price}"
            )),
            CouponFailure::ScopeMismatch => {
                TradeError::Ineligible("coupon does not cover the selected products".to_owned())
            }
        }
    }
}

/// Coupon evaluation.
///
/// Consumption and release of coupons happen inside the order unit of work
/// (see [`super::OrderRepository`]).
pub trait CouponRepository: super::Repository {
    /// Compute what the coupon takes off a checkout whose selected lines
    /// currently cost `pay_price` and cover the given products.
    fn calculate_coupon(
        &self,
        user_id: UserId,
        coupon_id: CouponId,
        pay_price: i64,
        spu_ids: &[SpuId],
        category_ids: &[CategoryId],
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<CouponQuote, CouponFailure>, Self::Error>> + Send;
}
