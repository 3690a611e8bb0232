#![warn(missing_docs)]
//! The shop trade server.
//!
//! Wires the SQLite storage adapter and the merchant configuration into an
//! [`App`], serves the REST API and periodically closes unpaid orders whose
//! payment window has passed.

mod app;
pub use app::App;

mod schedule;
pub use schedule::Scheduler;

mod cli;
pub use cli::Cli;

mod config;
pub use config::AppConfig;
