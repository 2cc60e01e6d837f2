use crate::cache::SnapshotStore;
use crate::config::Config;
use crate::display::Canvas;
use crate::event::{is_quit, Event, EventHandler};
use crate::feed::FeedClient;
use crate::sync::{RefreshOutcome, SyncEngine, SystemClock};
use crate::ui::layout::Size;
use crate::ui::LayoutRenderer;
use color_eyre::{eyre::eyre, Result};
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

/// Why a wait between cycles ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wake {
  Elapsed,
  Redraw,
  Quit,
}

/// Owns one display and runs refresh + render cycles on it, one at a time.
pub struct App<C: Canvas> {
  engine: SyncEngine<FeedClient, SystemClock>,
  renderer: LayoutRenderer,
  canvas: C,
  size: Size,
  /// Terminal input, when previewing in a terminal
  events: Option<EventHandler>,
  /// Last cycle's result, kept for redraws
  last: Option<RefreshOutcome>,
}

impl<C: Canvas> App<C> {
  pub fn new(config: &Config, canvas: C, events: Option<EventHandler>) -> Result<Self> {
    let client = FeedClient::new(&config.source, Config::get_source_credential())?;
    let store = SnapshotStore::new(config.source.cache_path()?);
    info!(url = %client.url(), cache = %store.path().display(), "Dashboard source");

    let engine = SyncEngine::new(client, store, SystemClock, config.source.retry_policy());
    let renderer = LayoutRenderer::new(&config.title, config.display.max_issues);

    Ok(Self {
      engine,
      renderer,
      canvas,
      size: config.display.size(),
      events,
      last: None,
    })
  }

  /// One refresh followed by one render.
  pub async fn run_cycle(&mut self) -> Result<()> {
    let outcome = self.engine.refresh().await;
    info!(
      attempts = outcome.attempts,
      fetched = outcome.fetched,
      status = %outcome.status.joined(),
      "Refresh cycle complete"
    );

    self.last = Some(outcome);
    self.redraw()
  }

  fn redraw(&mut self) -> Result<()> {
    if let Some(outcome) = &self.last {
      self
        .renderer
        .render(&mut self.canvas, &outcome.document, &outcome.status, self.size)?;
    }
    Ok(())
  }

  /// Run a single cycle. A terminal preview stays up until a key is pressed.
  pub async fn show(&mut self) -> Result<()> {
    self.run_cycle().await?;

    loop {
      match wait(self.events.as_mut(), None, true).await {
        Wake::Redraw => self.redraw()?,
        Wake::Elapsed | Wake::Quit => return Ok(()),
      }
    }
  }

  /// Run cycles every `interval` until asked to quit.
  pub async fn watch(&mut self, interval: Duration) -> Result<()> {
    loop {
      self.run_cycle().await?;

      let deadline = Instant::now()
        .checked_add(interval)
        .ok_or_else(|| eyre!("Refresh interval is too large"))?;
      info!("Next refresh in {} minutes", interval.as_secs() / 60);

      loop {
        match wait(self.events.as_mut(), Some(deadline), false).await {
          Wake::Elapsed => break,
          Wake::Redraw => self.redraw()?,
          Wake::Quit => return Ok(()),
        }
      }
    }
  }
}

/// Wait for the deadline, terminal input, or Ctrl-C.
async fn wait(
  events: Option<&mut EventHandler>,
  deadline: Option<Instant>,
  any_key: bool,
) -> Wake {
  let sleep = async move {
    match deadline {
      Some(deadline) => tokio::time::sleep_until(deadline).await,
      None => std::future::pending().await,
    }
  };

  let input = async move {
    let Some(events) = events else {
      if deadline.is_none() {
        return Wake::Quit;
      }
      return std::future::pending().await;
    };

    match events.next().await {
      Some(Event::Key(key)) if any_key || is_quit(&key) => Wake::Quit,
      Some(Event::Key(_)) => Wake::Redraw,
      Some(Event::Resize) => Wake::Redraw,
      None => Wake::Quit,
    }
  };

  tokio::select! {
    _ = sleep => Wake::Elapsed,
    wake = input => wake,
    _ = tokio::signal::ctrl_c() => Wake::Quit,
  }
}
