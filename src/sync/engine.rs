//! The refresh cycle: bounded fetch retries, validation, commit, cache load.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::{Clock, SyncError};
use crate::cache::{CommitOutcome, SnapshotStore};
use crate::feed::{DocumentSource, RemoteDocument, StatusLog};

/// How often and how patiently to retry the remote fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  /// Total fetch attempts per cycle (at least one is always made)
  pub max_retries: u32,
  /// Wait between consecutive attempts
  pub delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_retries: 3,
      delay: Duration::from_secs(5),
    }
  }
}

/// Everything one refresh cycle produced.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
  /// Data to render. Always carries `issues` and `events`.
  pub document: RemoteDocument,
  /// Messages for the status bar, never empty
  pub status: StatusLog,
  /// Fetch attempts made this cycle
  pub attempts: u32,
  /// Whether a validated document reached the cache this cycle
  pub fetched: bool,
}

/// Keeps the local cache as fresh as the network allows.
///
/// A previously valid cache is never discarded because of a failed fetch:
/// only bodies that parse are committed, and the cycle always ends by
/// loading whatever the cache holds.
pub struct SyncEngine<S, C> {
  source: S,
  store: SnapshotStore,
  clock: C,
  policy: RetryPolicy,
}

impl<S: DocumentSource, C: Clock> SyncEngine<S, C> {
  pub fn new(source: S, store: SnapshotStore, clock: C, policy: RetryPolicy) -> Self {
    Self {
      source,
      store,
      clock,
      policy,
    }
  }

  /// Run one refresh cycle. Failures are reported in the status log, never
  /// returned.
  pub async fn refresh(&self) -> RefreshOutcome {
    let mut status = StatusLog::new();

    let (attempts, fetched) = self.fetch_and_commit(&mut status).await;
    let document = self.load_cached(&mut status);

    status.push(format!(
      "Last refreshed: {}",
      self.clock.now().format("%Y-%m-%d %H:%M")
    ));

    debug_assert!(!status.is_empty());

    RefreshOutcome {
      document,
      status,
      attempts,
      fetched,
    }
  }

  async fn fetch_and_commit(&self, status: &mut StatusLog) -> (u32, bool) {
    let max = self.policy.max_retries.max(1);

    for attempt in 1..=max {
      info!("Fetching dashboard (attempt {}/{})", attempt, max);

      match self.attempt().await {
        Ok(CommitOutcome::Written { fingerprint }) => {
          info!(%fingerprint, "Local cache updated");
          return (attempt, true);
        }
        Ok(CommitOutcome::Unchanged { fingerprint }) => {
          debug!(%fingerprint, "Remote document unchanged, cache kept");
          return (attempt, true);
        }
        Err(e) => {
          warn!(kind = ?e.kind(), "Attempt {} failed: {}", attempt, e);

          if attempt < max {
            info!("Retrying in {} seconds", self.policy.delay.as_secs());
            self.clock.sleep(self.policy.delay).await;
          } else {
            let message = format!("Failed to fetch data after {} attempts: {}", max, e);
            error!("{}", message);
            status.push(message);
          }
        }
      }
    }

    (max, false)
  }

  /// One fetch; the body is committed only if it parses.
  async fn attempt(&self) -> Result<CommitOutcome, SyncError> {
    let body = self.source.fetch().await?;
    RemoteDocument::parse(&body).map_err(SyncError::Validation)?;
    self.store.commit(&body)
  }

  fn load_cached(&self, status: &mut StatusLog) -> RemoteDocument {
    let message = match self.store.load() {
      Ok(Some(content)) => match RemoteDocument::parse(&content) {
        Ok(document) => return document,
        Err(e) => format!("Failed to parse cached JSON: {}", e),
      },
      Ok(None) => "No cached data found".to_string(),
      Err(e) => format!("Failed to read cache file: {}", e),
    };

    warn!("{}", message);
    status.push(message);
    RemoteDocument::empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{DateTime, Local, TimeZone};
  use std::collections::VecDeque;
  use std::fs;
  use std::sync::Mutex;
  use tempfile::{tempdir, TempDir};

  const VALID: &str = r#"{"data":{"issues":{"Todo":[{"title":"A","status":"Todo"}]},"events":[]}}"#;
  const OTHER: &str = r#"{"data":{"issues":{},"events":[{"start":"10:00","title":"Sync"}]}}"#;

  /// Replays a fixed list of fetch results, then fails.
  struct ScriptedSource {
    responses: Mutex<VecDeque<Result<String, SyncError>>>,
    calls: Mutex<u32>,
  }

  impl ScriptedSource {
    fn new(responses: Vec<Result<String, SyncError>>) -> Self {
      Self {
        responses: Mutex::new(responses.into()),
        calls: Mutex::new(0),
      }
    }

    fn always(body: &str, times: usize) -> Self {
      Self::new((0..times).map(|_| Ok(body.to_string())).collect())
    }

    fn calls(&self) -> u32 {
      *self.calls.lock().unwrap()
    }
  }

  impl DocumentSource for &ScriptedSource {
    async fn fetch(&self) -> Result<String, SyncError> {
      *self.calls.lock().unwrap() += 1;
      self
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(SyncError::Transport("script exhausted".to_string())))
    }
  }

  /// Fixed time; records sleeps instead of waiting.
  struct FakeClock {
    now: DateTime<Local>,
    slept: Mutex<Vec<Duration>>,
  }

  impl FakeClock {
    fn new() -> Self {
      Self {
        now: Local.with_ymd_and_hms(2026, 10, 19, 7, 5, 0).unwrap(),
        slept: Mutex::new(Vec::new()),
      }
    }

    fn sleeps(&self) -> Vec<Duration> {
      self.slept.lock().unwrap().clone()
    }
  }

  impl Clock for &FakeClock {
    fn now(&self) -> DateTime<Local> {
      self.now
    }

    async fn sleep(&self, duration: Duration) {
      self.slept.lock().unwrap().push(duration);
    }
  }

  fn store_in(dir: &TempDir) -> SnapshotStore {
    SnapshotStore::new(dir.path().join("work.json"))
  }

  fn engine<'a>(
    source: &'a ScriptedSource,
    clock: &'a FakeClock,
    store: SnapshotStore,
  ) -> SyncEngine<&'a ScriptedSource, &'a FakeClock> {
    SyncEngine::new(source, store, clock, RetryPolicy::default())
  }

  fn transport() -> Result<String, SyncError> {
    Err(SyncError::Transport("connection refused".to_string()))
  }

  const STAMP: &str = "Last refreshed: 2026-10-19 07:05";

  #[tokio::test]
  async fn test_first_attempt_success_commits_and_stops() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::always(VALID, 3);
    let clock = FakeClock::new();

    let outcome = engine(&source, &clock, store_in(&dir)).refresh().await;

    assert_eq!(source.calls(), 1);
    assert_eq!(outcome.attempts, 1);
    assert!(outcome.fetched);
    assert_eq!(outcome.document, RemoteDocument::parse(VALID).unwrap());
    assert_eq!(outcome.status.entries(), [STAMP]);
    assert_eq!(fs::read_to_string(dir.path().join("work.json")).unwrap(), VALID);
    assert!(clock.sleeps().is_empty());
  }

  #[tokio::test]
  async fn test_success_on_later_attempt_after_waits() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::new(vec![
      transport(),
      Err(SyncError::HttpStatus(503)),
      Ok(VALID.to_string()),
    ]);
    let clock = FakeClock::new();

    let outcome = engine(&source, &clock, store_in(&dir)).refresh().await;

    assert_eq!(source.calls(), 3);
    assert_eq!(outcome.attempts, 3);
    assert!(outcome.fetched);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5); 2]);
    assert_eq!(outcome.status.entries(), [STAMP]);
    assert_eq!(fs::read_to_string(dir.path().join("work.json")).unwrap(), VALID);
  }

  #[tokio::test]
  async fn test_exhausted_retries_keep_previous_cache() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.commit(OTHER).unwrap();

    let source = ScriptedSource::new(vec![transport(), transport(), transport()]);
    let clock = FakeClock::new();
    let outcome = engine(&source, &clock, store).refresh().await;

    assert_eq!(source.calls(), 3);
    assert!(!outcome.fetched);
    assert_eq!(clock.sleeps().len(), 2);
    assert_eq!(outcome.document, RemoteDocument::parse(OTHER).unwrap());
    assert_eq!(
      outcome.status.entries(),
      [
        "Failed to fetch data after 3 attempts: connection refused",
        STAMP
      ]
    );
    assert_eq!(fs::read_to_string(dir.path().join("work.json")).unwrap(), OTHER);
  }

  #[tokio::test]
  async fn test_invalid_body_is_never_committed() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.commit(OTHER).unwrap();

    let source = ScriptedSource::always("<html>login</html>", 3);
    let clock = FakeClock::new();
    let outcome = engine(&source, &clock, store).refresh().await;

    assert_eq!(source.calls(), 3);
    assert!(!outcome.fetched);
    assert_eq!(fs::read_to_string(dir.path().join("work.json")).unwrap(), OTHER);
    assert!(outcome.status.entries()[0]
      .starts_with("Failed to fetch data after 3 attempts: Invalid JSON in response: "));
  }

  #[tokio::test]
  async fn test_no_cache_and_no_network_yields_empty_document() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::new(vec![]);
    let clock = FakeClock::new();

    let outcome = engine(&source, &clock, store_in(&dir)).refresh().await;

    assert_eq!(outcome.document, RemoteDocument::empty());
    assert!(outcome.document.data.issues.is_empty());
    assert!(outcome.document.data.events.is_empty());
    assert_eq!(
      outcome.status.entries(),
      [
        "Failed to fetch data after 3 attempts: script exhausted",
        "No cached data found",
        STAMP
      ]
    );
  }

  #[tokio::test]
  async fn test_corrupt_cache_falls_back_to_empty() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("work.json"), "{\"data\": [").unwrap();

    let source = ScriptedSource::new(vec![]);
    let clock = FakeClock::new();
    let outcome = engine(&source, &clock, store_in(&dir)).refresh().await;

    assert_eq!(outcome.document, RemoteDocument::empty());
    assert_eq!(outcome.status.entries().len(), 3);
    assert!(outcome.status.entries()[1].starts_with("Failed to parse cached JSON: "));
  }

  #[tokio::test]
  async fn test_unreadable_cache_falls_back_to_empty() {
    let dir = tempdir().unwrap();
    // The cache path is a directory: reading it fails.
    let store = SnapshotStore::new(dir.path());

    let source = ScriptedSource::new(vec![]);
    let clock = FakeClock::new();
    let outcome = engine(&source, &clock, store).refresh().await;

    assert_eq!(outcome.document, RemoteDocument::empty());
    assert!(outcome
      .status
      .entries()
      .iter()
      .any(|m| m.starts_with("Failed to read cache file: ")));
    assert_eq!(outcome.status.entries().last().unwrap(), STAMP);
  }

  #[tokio::test]
  async fn test_refresh_twice_is_idempotent() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::always(VALID, 2);
    let clock = FakeClock::new();
    let engine = engine(&source, &clock, store_in(&dir));

    let first = engine.refresh().await;
    let after_first = fs::read_to_string(dir.path().join("work.json")).unwrap();
    let second = engine.refresh().await;
    let after_second = fs::read_to_string(dir.path().join("work.json")).unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(first.document, second.document);
    assert!(second.fetched);
    assert_eq!(source.calls(), 2);
  }

  #[tokio::test]
  async fn test_zero_retries_still_attempts_once() {
    let dir = tempdir().unwrap();
    let source = ScriptedSource::always(VALID, 1);
    let clock = FakeClock::new();
    let policy = RetryPolicy {
      max_retries: 0,
      delay: Duration::from_secs(1),
    };

    let outcome = SyncEngine::new(&source, store_in(&dir), &clock, policy)
      .refresh()
      .await;

    assert_eq!(source.calls(), 1);
    assert!(outcome.fetched);
  }

  #[tokio::test]
  async fn test_commit_failure_counts_as_failed_attempt() {
    let dir = tempdir().unwrap();
    let store = store_in(&dir);
    store.commit(OTHER).unwrap();
    fs::create_dir(dir.path().join("work.json.tmp")).unwrap();

    let source = ScriptedSource::always(VALID, 3);
    let clock = FakeClock::new();
    let outcome = engine(&source, &clock, store).refresh().await;

    assert_eq!(source.calls(), 3);
    assert!(!outcome.fetched);
    assert_eq!(outcome.document, RemoteDocument::parse(OTHER).unwrap());
    assert!(outcome.status.entries()[0]
      .starts_with("Failed to fetch data after 3 attempts: Failed to write cache file: "));
  }
}
