//! Fetch, validate, cache and fall back.
//!
//! The engine keeps the dashboard data consistent across unreliable networks:
//! 1. Fetch the remote document with bounded retries
//! 2. Validate each body before it may touch the cache
//! 3. Commit validated bodies to the single-slot cache
//! 4. Load whatever the cache holds (fresh, stale, or nothing)
//! 5. Report what happened as a status log

mod clock;
mod engine;
mod error;

pub use clock::{Clock, SystemClock};
pub use engine::{RefreshOutcome, RetryPolicy, SyncEngine};
pub use error::SyncError;
