use crate::Scheduler;
use shop_core::{models::TradeConfig, ports::Application};
use shop_sqlite::Db;
use shop_trade::order::cancel_expired_orders;
use std::sync::Arc;

/// The production application: the SQLite database, the merchant
/// configuration and the wall clock.
#[derive(Clone)]
pub struct App {
    db: Db,
    config: Arc<TradeConfig>,
}

impl App {
    /// Combine an open database with the trade settings
    pub fn new(db: Db, config: TradeConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Close expired unpaid orders on every tick of `schedule`.
    ///
    /// A failed sweep is logged and retried at the next tick, so this only
    /// returns when the schedule is disabled.
    pub async fn sweep_expired_orders(self, schedule: Scheduler) -> anyhow::Result<()> {
        schedule
            .schedule(move |_| {
                let app = self.clone();
                async move {
                    if let Err(err) = cancel_expired_orders(&app).await {
                        tracing::error!(%err, "failed to cancel expired orders");
                    }
                    Ok::<(), anyhow::Error>(())
                }
            })
            .await
    }
}

impl Application for App {
    type Repository = Db;

    fn database(&self) -> &Self::Repository {
        &self.db
    }

    fn config(&self) -> &TradeConfig {
        &self.config
    }
}
