use shop_axum::{openapi, start_server};
use shop_sqlite::Db;
use shopd::{App, AppConfig, Cli};
use std::fs::File;
use tokio::select;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Every crate reports through `tracing`; RUST_LOG selects what is shown.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::import()?;

    let AppConfig {
        server,
        database,
        trade,
        schedule,
    } = AppConfig::load(&cli)?;

    let db = Db::open(&database).await?;
    let app = App::new(db, trade);

    // If requested, dump the schema and exit.
    if let Some(path) = cli.schema {
        let schema = openapi(app, server);
        serde_json::to_writer_pretty(File::create(path)?, &*schema)?;
        return Ok(());
    }

    let sweeper = app.clone();
    let server_task = tokio::spawn(async move { start_server(server, app).await });

    if schedule.every.is_some_and(|every| !every.is_zero()) {
        let sweep_task = tokio::spawn(sweeper.sweep_expired_orders(schedule));

        select! {
            r = server_task => r??,
            r = sweep_task => r??,
        }
    } else {
        server_task.await??;
    }

    Ok(())
}
