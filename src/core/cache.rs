//! Snapshot cache with a single-flight refresh discipline.
//!
//! The slot holds at most one `Arc<EvaluationSnapshot>`; replacement is an
//! atomic swap under the write lock, so a reader either sees the previous
//! complete snapshot or the new one, never a partial mix of runs.

use crate::core::evaluator::UniverseEvaluator;
use crate::error::EngineError;
use crate::metrics::Metrics;
use crate::models::EvaluationSnapshot;
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, info};

/// Snapshot age at which a read triggers a recompute.
pub const SNAPSHOT_MAX_AGE_HOURS: i64 = 24;

/// Observable cache states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No snapshot produced yet.
    Empty,
    /// Snapshot present and younger than the staleness threshold.
    Fresh,
    /// Snapshot present but at or past the threshold.
    Stale,
}

struct Slot {
    snapshot: Option<Arc<EvaluationSnapshot>>,
    /// Bumped on every commit; lets a waiter detect that the refresh it
    /// queued behind already produced a result.
    generation: u64,
}

pub struct SnapshotCache {
    evaluator: UniverseEvaluator,
    slot: RwLock<Slot>,
    refresh: Mutex<()>,
    max_age: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl SnapshotCache {
    pub fn new(evaluator: UniverseEvaluator, metrics: Option<Arc<Metrics>>) -> Self {
        Self::with_max_age(evaluator, Duration::hours(SNAPSHOT_MAX_AGE_HOURS), metrics)
    }

    /// Constructor with an explicit staleness threshold.
    pub fn with_max_age(
        evaluator: UniverseEvaluator,
        max_age: Duration,
        metrics: Option<Arc<Metrics>>,
    ) -> Self {
        Self {
            evaluator,
            slot: RwLock::new(Slot {
                snapshot: None,
                generation: 0,
            }),
            refresh: Mutex::new(()),
            max_age,
            metrics,
        }
    }

    /// Current state of the slot. Staleness is detected lazily from the
    /// snapshot timestamp; there is no background expiry.
    pub async fn state(&self) -> CacheState {
        match self.slot.read().await.snapshot.as_deref() {
            None => CacheState::Empty,
            Some(snapshot) if self.is_fresh(snapshot) => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    /// Serve the latest snapshot, refreshing first if the slot is empty or
    /// stale.
    ///
    /// Concurrent callers on a missing/stale slot collapse into one
    /// evaluator run: the first acquires the refresh lock, the rest queue
    /// behind it and pick up the committed snapshot from the freshness
    /// re-check.
    pub async fn latest(&self) -> Arc<EvaluationSnapshot> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            return snapshot;
        }

        let guard = self.refresh.lock().await;
        if let Some(snapshot) = self.fresh_snapshot().await {
            return snapshot;
        }
        self.run_refresh(guard).await
    }

    /// Refresh regardless of age (the manual operational trigger).
    ///
    /// A refresh that committed while this caller waited on the lock counts
    /// as this caller's refresh.
    pub async fn force_refresh(&self) -> Arc<EvaluationSnapshot> {
        let seen = self.slot.read().await.generation;

        let guard = self.refresh.lock().await;
        {
            let slot = self.slot.read().await;
            if slot.generation != seen {
                if let Some(ref snapshot) = slot.snapshot {
                    debug!("refresh collapsed into a run committed while waiting");
                    return snapshot.clone();
                }
            }
        }
        self.run_refresh(guard).await
    }

    /// Non-blocking trigger used by the scheduler.
    ///
    /// Returns `RefreshInProgress` when a refresh is already in flight; the
    /// caller's trigger collapses into that run instead of queuing another.
    pub async fn trigger_refresh(&self) -> Result<Arc<EvaluationSnapshot>, EngineError> {
        let guard = self
            .refresh
            .try_lock()
            .map_err(|_| EngineError::RefreshInProgress)?;
        Ok(self.run_refresh(guard).await)
    }

    async fn fresh_snapshot(&self) -> Option<Arc<EvaluationSnapshot>> {
        let slot = self.slot.read().await;
        slot.snapshot
            .as_ref()
            .filter(|s| self.is_fresh(s))
            .cloned()
    }

    fn is_fresh(&self, snapshot: &EvaluationSnapshot) -> bool {
        Utc::now() - snapshot.generated_at < self.max_age
    }

    /// Run the evaluator and commit the result. Holding the guard proves the
    /// caller owns the refresh lock.
    async fn run_refresh(&self, _guard: MutexGuard<'_, ()>) -> Arc<EvaluationSnapshot> {
        let started = Instant::now();
        let snapshot = Arc::new(self.evaluator.evaluate().await);

        {
            let mut slot = self.slot.write().await;
            slot.snapshot = Some(snapshot.clone());
            slot.generation += 1;
        }

        if let Some(ref metrics) = self.metrics {
            metrics.snapshot_refreshes_total.inc();
            metrics
                .refresh_duration_seconds
                .observe(started.elapsed().as_secs_f64());
        }

        info!(
            symbols = snapshot.results.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "snapshot refreshed with {} symbols",
            snapshot.results.len()
        );
        snapshot
    }
}
