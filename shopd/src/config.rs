//! Application configuration management.
//!
//! Configuration is layered from default values, an optional TOML file and
//! environment variables, in increasing order of precedence.

use crate::{Cli, schedule::Scheduler};
use serde::{Deserialize, Serialize};
use shop_core::models::TradeConfig;

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Web server configuration
    #[serde(default)]
    pub server: shop_axum::config::AxumConfig,

    /// Database configuration
    #[serde(default)]
    pub database: shop_sqlite::config::SqliteConfig,

    /// Merchant trade settings: free shipping, payment window, points
    #[serde(default)]
    pub trade: TradeConfig,

    /// Expired-order sweep scheduling
    #[serde(default)]
    pub schedule: Scheduler,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. `--database` on the command line (highest priority)
    /// 2. Environment variables
    /// 3. Config file given by the CLI
    /// 4. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `APP_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Store orders in a file
    /// export APP_DATABASE__DATABASE_PATH="/data/shop.db"
    ///
    /// # Set server bind address
    /// export APP_SERVER__BIND_ADDRESS="0.0.0.0:3000"
    ///
    /// # Give buyers a quarter of an hour to pay
    /// export APP_TRADE__PAY_EXPIRE="15m"
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // This maps APP_SERVER__BIND_ADDRESS to server.bind_address
        config = config.add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        config = config.set_override_option(
            "database.database_path",
            cli.database
                .as_ref()
                .map(|path| path.to_string_lossy().into_owned()),
        )?;

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
