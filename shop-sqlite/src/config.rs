//! Where the trade database lives and how many readers may query it at once.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage settings for [`crate::Db`].
///
/// Without a path the database is private to the process and disappears
/// with it, which suits tests and demos.
///
/// ```
/// use shop_sqlite::config::SqliteConfig;
/// use std::path::PathBuf;
///
/// let config = SqliteConfig {
///     database_path: Some(PathBuf::from("shop.db")),
///     ..Default::default()
/// };
/// assert!(config.create_if_missing);
/// assert_eq!(config.max_readers, 8);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct SqliteConfig {
    /// The database file; in memory when absent
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Create the file on first open
    #[serde(default = "default_create")]
    pub create_if_missing: bool,

    /// Size of the read pool. Writes always share a single connection.
    #[serde(default = "default_max_readers")]
    pub max_readers: u32,
}

fn default_create() -> bool {
    true
}

fn default_max_readers() -> u32 {
    8
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            create_if_missing: default_create(),
            max_readers: default_max_readers(),
        }
    }
}
