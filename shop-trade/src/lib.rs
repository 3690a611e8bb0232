#![warn(missing_docs)]
//! Order pricing and order assembly.
//!
//! A checkout request is priced by folding a fresh [`shop_core::models::PriceContext`]
//! through a fixed sequence of calculators ([`pipeline::Pipeline`]); the
//! result is then committed by the order unit of work behind
//! [`shop_core::ports::OrderRepository`]. Everything here is generic over
//! [`shop_core::ports::Application`].

/// After-sale (refund and return) requests.
pub mod after_sale;

/// Division of pooled discounts across order lines.
pub mod allocation;

/// The pricing mechanisms, each a transformation of a price context.
pub mod calculators;

/// Checkout assembly and the order lifecycle.
pub mod order;

/// The ordered table of calculators.
pub mod pipeline;

mod pricing;
pub use pricing::{calculate_price, calculate_sku_prices, validate_request};

// We use non-std collections here for their ordering semantics and performance
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
pub(crate) type Set<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;
