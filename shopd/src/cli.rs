//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Serve checkout pricing and order settlement over HTTP.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML file layered between the defaults and `APP_*` variables
    #[arg(short, long, env = "APP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overriding `database.database_path` from every other source
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Write the OpenAPI document to this path and exit
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

impl Cli {
    /// Parse the process arguments, reporting usage errors instead of exiting.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}
