mod activity;
mod after_sale;
mod catalog;
mod coupon;
mod delivery;
mod member;
mod order;

pub use activity::{ActivityFailure, ActivityRepository};
pub use after_sale::{AfterSaleFailure, AfterSaleRepository};
pub use catalog::CatalogRepository;
pub use coupon::{CouponFailure, CouponRepository};
pub use delivery::DeliveryRepository;
pub use member::MemberRepository;
pub use order::{OrderFailure, OrderRepository};

use crate::models::{DateTime, TradeConfig};

/// Base trait for every repository port.
///
/// A repository is a cheap handle (typically a pool) that is cloned into
/// every request. `Error` is reserved for infrastructure failures; refusals
/// that follow from domain rules are reported through an inner `Result`.
pub trait Repository: Clone + Send + Sync + 'static {
    /// The infrastructure error of the adapter
    type Error: std::error::Error + Send + Sync + 'static;
}

/// Everything the pricing pipeline reads.
pub trait PricingRepository:
    CatalogRepository
    + CouponRepository
    + MemberRepository
    + DeliveryRepository
    + ActivityRepository
{
}

impl<T> PricingRepository for T where
    T: CatalogRepository
        + CouponRepository
        + MemberRepository
        + DeliveryRepository
        + ActivityRepository
{
}

/// Everything checkout and the order lifecycle need.
pub trait TradeRepository: PricingRepository + OrderRepository + AfterSaleRepository {}

impl<T> TradeRepository for T where T: PricingRepository + OrderRepository + AfterSaleRepository {}

/// An application ties a repository to the merchant configuration and a clock.
///
/// The HTTP layer and the scheduler are generic over this trait.
pub trait Application: Clone + Send + Sync + 'static {
    /// The storage adapter
    type Repository: TradeRepository;

    /// Get a handle to the repository
    fn database(&self) -> &Self::Repository;

    /// The current time
    fn now(&self) -> DateTime {
        DateTime::now()
    }

    /// Merchant-level trade settings
    fn config(&self) -> &TradeConfig;
}
