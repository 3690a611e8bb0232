use crate::models::SkuId;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error taxonomy of pricing and order assembly.
///
/// Every failure in the core is either a rejected request or a fully
/// rolled-back transaction. Callers match on the variant to decide how to
/// report it; nothing here is retried internally.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// The request is malformed or empty
    #[error("invalid request: {0}")]
    Validation(String),

    /// A referenced entity does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// The entity exists but is not in a state that allows the operation
    #[error("conflict: {0}")]
    Conflict(String),

    /// Promotion or activity rules are not met
    #[error("ineligible: {0}")]
    Ineligible(String),

    /// Not enough stock to fulfil the request
    #[error("insufficient stock for sku {sku_id}")]
    StockInsufficient {
        /// The SKU that ran out
        sku_id: SkuId,
    },

    /// The final pay price is not acceptable
    #[error("pay amount not valid: {0}")]
    PriceIllegal(String),

    /// An infrastructure failure while the order transaction was open
    #[error("transaction aborted: {0}")]
    TransactionAborted(#[source] BoxError),

    /// An infrastructure failure outside a transaction
    #[error(transparent)]
    Backend(BoxError),
}

impl TradeError {
    /// Wrap a repository error
    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }

    /// Wrap a repository error raised while committing an order
    pub fn aborted(err: impl Into<BoxError>) -> Self {
        Self::TransactionAborted(err.into())
    }

    /// Whether the error reflects a problem with the request rather than the system
    pub fn is_domain(&self) -> bool {
        !matches!(self, Self::Backend(_) | Self::TransactionAborted(_))
    }
}
