use crate::{
    TradeError,
    models::{
        CategoryId, DateTime, DiscountProduct, ExclusiveQuery, ExclusiveQuote, RewardActivity,
        SkuId, SpuId,
    },
};

/// Why an exclusive activity refuses to price a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityFailure {
    /// No such activity (or bargain record)
    NotFound,
    /// The activity is disabled or outside its time window
    NotLive,
    /// The SKU does not take part in the activity
    SkuNotInActivity,
    /// The requested count is above the activity's per-order limit
    CountExceeded {
        /// The per-order limit
        limit: i32,
    },
    /// The bargain record is not the buyer's, not successful, or already used
    RecordNotUsable,
    /// The activity's own stock is exhausted
    StockExhausted,
}

impl From<ActivityFailure> for TradeError {
    fn from(value: ActivityFailure) -> Self {
        match value {
            ActivityFailure::NotFound => TradeError::NotFound("activity".to_owned()),
            ActivityFailure::NotLive => TradeError::Ineligible("activity is not live".to_owned()),
            ActivityFailure::SkuNotInActivity => {
                TradeError::Ineligible("sku does not take part in the activity".to_owned())
            }
            ActivityFailure::CountExceeded { limit } => {
                TradeError::Ineligible(format!("at most {limit} units per order"))
            }
            ActivityFailure::RecordNotUsable => {
                TradeError::Ineligible("bargain record cannot be used".to_owned())
            }
            ActivityFailure::StockExhausted => {
                TradeError::Ineligible("activity stock is exhausted".to_owned())
            }
        }
    }
}

/// Promotion activities as seen by the pricing pipeline.
pub trait ActivityRepository: super::Repository {
    /// Validate an exclusive activity line and return its negotiated price.
    fn price_exclusive(
        &self,
        query: &ExclusiveQuery,
        as_of: DateTime,
    ) -> impl Future<Output = Result<Result<ExclusiveQuote, ActivityFailure>, Self::Error>> + Send;

    /// The reward activities live at `as_of` whose scope could cover any of
    /// the given products.
    fn match_reward_activities(
        &self,
        spu_ids: &[SpuId],
        category_ids: &[CategoryId],
        as_of: DateTime,
    ) -> impl Future<Output = Result<Vec<RewardActivity>, Self::Error>> + Send;

    /// The discount activity entries live at `as_of` for the given SKUs.
    ///
    /// At most one entry is returned per SKU.
    fn match_discount_products(
        &self,
        sku_ids: &[SkuId],
        as_of: DateTime,
    ) -> impl Future<Output = Result<Vec<DiscountProduct>, Self::Error>> + Send;
}
