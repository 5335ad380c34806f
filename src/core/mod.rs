//! Core application primitives (engines, orchestrators)

pub mod cache;
pub mod evaluator;
pub mod http;
pub mod scheduler;

pub use cache::{CacheState, SnapshotCache, SNAPSHOT_MAX_AGE_HOURS};
pub use evaluator::UniverseEvaluator;
pub use http::{create_router, start_server, AppState, HealthStatus};
pub use scheduler::RefreshScheduler;
