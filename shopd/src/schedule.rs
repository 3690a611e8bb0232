//! Scheduler for periodic background work.
//!
//! The server uses it to close unpaid orders once their payment window has
//! passed. Runs are aligned to a fixed anchor so that restarts keep the same
//! cadence.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{Instrument as _, Level, event, span};

/// Configuration for scheduling a periodic task.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scheduler {
    /// An RFC3339 timestamp to align runs to (if omitted, defaults to now)
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub from: Option<time::OffsetDateTime>,
    /// How often to run; disabled when absent
    #[serde(default, with = "humantime_serde::option")]
    pub every: Option<Duration>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            from: None,
            every: Some(Duration::from_secs(60)),
        }
    }
}

impl Scheduler {
    /// Schedule and execute a function at regular intervals.
    ///
    /// Waits for the first anchor at or after now, then calls `f` once per
    /// interval with the anchor time. Returns immediately when no interval
    /// is configured, and stops at the first error `f` returns.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::time::Duration;
    /// use shopd::Scheduler;
    ///
    /// # fn main() -> Result<(), String> {
    /// let scheduler = Scheduler {
    ///     from: None,
    ///     every: Some(Duration::from_secs(60)),
    /// };
    ///
    /// # tokio_test::block_on(async {
    /// scheduler.schedule(|timestamp| async move {
    ///     println!("Sweeping at {}", timestamp);
    ///     Ok::<(), String>(())
    /// }).await?;
    /// # Ok(())
    /// # })
    /// # }
    /// ```
    pub async fn schedule<T, E>(
        &self,
        f: impl AsyncFn(OffsetDateTime) -> Result<T, E>,
    ) -> Result<(), E> {
        let Some(delta) = self.every.filter(|delta| !delta.is_zero()) else {
            return Ok(());
        };

        let now = OffsetDateTime::now_utc();

        // adjust the anchor time to be >= now
        let mut anchor = match self.from {
            Some(mut from) if from < now => {
                let x = ((now - from) / delta).ceil() as u32;
                from += delta * x;
                from
            }
            Some(from) => from,
            None => now,
        };

        let sleepy: Duration = (anchor - now).try_into().unwrap_or_default();
        tokio::time::sleep(sleepy).await;

        let mut interval = tokio::time::interval(delta);

        loop {
            interval.tick().await;

            let span = span!(Level::INFO, "scheduled run");
            async {
                event!(Level::DEBUG, at = %anchor);
                f(anchor).await
            }
            .instrument(span)
            .await?;

            anchor += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_returns_immediately() {
        let scheduler = Scheduler {
            from: None,
            every: None,
        };
        let outcome = scheduler
            .schedule(async |_| Err::<(), _>("should not run"))
            .await;
        assert_eq!(outcome, Ok(()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_at_first_error() {
        let scheduler = Scheduler {
            from: None,
            every: Some(Duration::from_secs(60)),
        };
        let runs = std::sync::atomic::AtomicUsize::new(0);
        let outcome = scheduler
            .schedule(async |_| {
                let run = runs.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
                if run == 3 { Err(run) } else { Ok(()) }
            })
            .await;
        assert_eq!(outcome, Err(3));
    }
}
