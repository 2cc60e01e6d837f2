use chrono::{DateTime, Local};
use std::time::Duration;

/// Time as seen by the sync engine: the refresh timestamp and retry waits.
pub trait Clock {
  fn now(&self) -> DateTime<Local>;

  async fn sleep(&self, duration: Duration);
}

/// Wall clock and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Local> {
    Local::now()
  }

  async fn sleep(&self, duration: Duration) {
    tokio::time::sleep(duration).await;
  }
}
