//! Cron-based scheduler for the daily snapshot refresh

use crate::core::cache::SnapshotCache;
use crate::error::EngineError;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Fires once a day at local midnight. Exact alignment is not a correctness
/// requirement, only the daily cadence.
const DAILY_MIDNIGHT: &str = "0 0 0 * * *";

/// Scheduler that periodically triggers a cache refresh.
pub struct RefreshScheduler {
    cache: Arc<SnapshotCache>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl RefreshScheduler {
    pub fn new(cache: Arc<SnapshotCache>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let schedule = Schedule::from_str(DAILY_MIDNIGHT).map_err(|e| {
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid cron expression '{}': {}", DAILY_MIDNIGHT, e),
            )) as Box<dyn std::error::Error + Send + Sync>
        })?;

        Ok(Self {
            cache,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Start the scheduler loop.
    pub async fn start(&self) {
        let cache = self.cache.clone();
        let schedule = self.schedule.clone();
        let handle_arc = self.handle.clone();

        let handle = tokio::spawn(async move {
            info!("RefreshScheduler: started, waiting for next midnight tick");

            loop {
                let mut upcoming = schedule.upcoming(chrono::Local);
                if let Some(next_tick) = upcoming.next() {
                    let now = chrono::Local::now();
                    if next_tick > now {
                        let duration = (next_tick - now).to_std().unwrap_or_default();
                        debug!(
                            seconds = duration.as_secs(),
                            "RefreshScheduler: sleeping {}s until next tick",
                            duration.as_secs()
                        );
                        tokio::time::sleep(duration).await;
                    }
                } else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                }

                match cache.trigger_refresh().await {
                    Ok(snapshot) => {
                        info!(
                            symbols = snapshot.results.len(),
                            "RefreshScheduler: scheduled refresh complete, {} symbols",
                            snapshot.results.len()
                        );
                    }
                    Err(EngineError::RefreshInProgress) => {
                        debug!("RefreshScheduler: refresh already in flight, tick collapsed");
                    }
                    Err(e) => {
                        debug!(error = %e, "RefreshScheduler: trigger failed");
                    }
                }
            }
        });

        {
            let mut h = handle_arc.write().await;
            *h = Some(handle);
        }

        info!("RefreshScheduler: started successfully");
    }

    /// Stop the scheduler.
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("RefreshScheduler: stopped");
        }
    }

    /// Check if the scheduler is running.
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
