//! Unit tests for the snapshot cache state machine and single-flight refresh

use async_trait::async_trait;
use chrono::{Days, Duration, NaiveDate};
use ibexwatch::core::cache::{CacheState, SnapshotCache};
use ibexwatch::core::evaluator::UniverseEvaluator;
use ibexwatch::error::EngineError;
use ibexwatch::models::DailyBar;
use ibexwatch::services::DailyBarProvider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct StubProvider {
    fetches: AtomicUsize,
    bars: Vec<DailyBar>,
    delay_ms: u64,
    fail: bool,
}

impl StubProvider {
    fn new(bars: Vec<DailyBar>) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            bars,
            delay_ms: 0,
            fail: false,
        }
    }

    fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DailyBarProvider for StubProvider {
    async fn daily_bars(
        &self,
        symbol: &str,
        _lookback_days: u32,
    ) -> Result<Vec<DailyBar>, EngineError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }
        if self.fail {
            return Err(EngineError::DataUnavailable(symbol.to_string()));
        }
        Ok(self.bars.clone())
    }
}

fn bar_date(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .checked_add_days(Days::new(i as u64))
        .unwrap()
}

fn create_uptrend_bars(count: usize) -> Vec<DailyBar> {
    (0..count)
        .map(|i| {
            let price = 100.0 + (i as f64 * 0.5);
            DailyBar::new(bar_date(i), price, price + 0.3, price - 0.2, price + 0.1, 1000.0)
        })
        .collect()
}

fn cache_with(provider: Arc<StubProvider>, max_age: Duration) -> SnapshotCache {
    let evaluator = UniverseEvaluator::new(
        provider,
        vec!["TEF.MC".to_string()],
        183,
        None,
    );
    SnapshotCache::with_max_age(evaluator, max_age, None)
}

#[tokio::test]
async fn test_empty_cache_fills_on_first_read() {
    let provider = Arc::new(StubProvider::new(create_uptrend_bars(80)));
    let cache = cache_with(provider.clone(), Duration::hours(24));

    assert_eq!(cache.state().await, CacheState::Empty);
    let snapshot = cache.latest().await;
    assert_eq!(snapshot.results.len(), 1);
    assert_eq!(cache.state().await, CacheState::Fresh);
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn test_fresh_reads_serve_the_same_snapshot_without_recompute() {
    let provider = Arc::new(StubProvider::new(create_uptrend_bars(80)));
    let cache = cache_with(provider.clone(), Duration::hours(24));

    let first = cache.latest().await;
    let second = cache.latest().await;
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn test_concurrent_first_readers_collapse_into_one_run() {
    let provider = Arc::new(StubProvider::new(create_uptrend_bars(80)).with_delay(100));
    let cache = Arc::new(cache_with(provider.clone(), Duration::hours(24)));

    let (a, b, c, d) = tokio::join!(
        cache.latest(),
        cache.latest(),
        cache.latest(),
        cache.latest()
    );
    assert_eq!(provider.fetch_count(), 1);
    assert_eq!(a.generated_at, b.generated_at);
    assert_eq!(b.generated_at, c.generated_at);
    assert_eq!(c.generated_at, d.generated_at);
}

#[tokio::test]
async fn test_stale_read_triggers_exactly_one_new_run() {
    let provider = Arc::new(StubProvider::new(create_uptrend_bars(80)));
    let cache = cache_with(provider.clone(), Duration::milliseconds(200));

    let first = cache.latest().await;
    assert_eq!(cache.state().await, CacheState::Fresh);

    tokio::time::sleep(tokio::time::Duration::from_millis(250)).await;
    assert_eq!(cache.state().await, CacheState::Stale);

    let second = cache.latest().await;
    assert_eq!(provider.fetch_count(), 2);
    assert!(second.generated_at > first.generated_at);
}

#[tokio::test]
async fn test_force_refresh_ignores_age() {
    let provider = Arc::new(StubProvider::new(create_uptrend_bars(80)));
    let cache = cache_with(provider.clone(), Duration::hours(24));

    let first = cache.latest().await;
    let second = cache.force_refresh().await;
    assert_eq!(provider.fetch_count(), 2);
    assert!(second.generated_at > first.generated_at);
}

#[tokio::test]
async fn test_trigger_collapses_into_in_flight_refresh() {
    let provider = Arc::new(StubProvider::new(create_uptrend_bars(80)).with_delay(200));
    let cache = Arc::new(cache_with(provider.clone(), Duration::hours(24)));

    let reader = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.latest().await })
    };
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

    match cache.trigger_refresh().await {
        Err(EngineError::RefreshInProgress) => {}
        other => panic!("expected RefreshInProgress, got {other:?}"),
    }

    reader.await.unwrap();
    assert_eq!(provider.fetch_count(), 1);
}

#[tokio::test]
async fn test_failed_universe_still_yields_an_empty_snapshot() {
    let provider = Arc::new(StubProvider::new(Vec::new()).failing());
    let cache = cache_with(provider.clone(), Duration::hours(24));

    let snapshot = cache.latest().await;
    assert!(snapshot.results.is_empty());
    assert_eq!(cache.state().await, CacheState::Fresh);
}
