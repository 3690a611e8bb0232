#![warn(missing_docs)]
//! Core domain models and ports for the order pricing and settlement pipeline.
//!
//! This crate contains no I/O. Pricing algorithms live in `shop-trade`, and
//! storage lives behind the traits in [`ports`], which `shop-sqlite` implements.

/// Core domain models for the trade system.
///
/// This module contains the data structures that flow through pricing
/// (requests, the per-request price context, promotion records) and the
/// durable entities produced by order assembly (orders, order items, logs,
/// after-sales, payment orders).
///
/// The models are primarily data structures with minimal business logic. The
/// exceptions are small, self-contained rules that belong to the entity itself,
/// such as a delivery template's fee function or the status transition guards.
pub mod models;

/// Interface traits for the trade system.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
///
/// These traits define the contract between the pricing and order logic and
/// the external collaborators (catalog, member, coupon, activities, delivery
/// templates, order storage) without specifying implementation details.
pub mod ports;

mod error;
pub use error::TradeError;
