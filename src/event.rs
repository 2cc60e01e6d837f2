use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

/// Input events from the preview terminal
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal was resized; the frame should be redrawn
  Resize,
}

/// Reads terminal input on a background task
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler polling input every `poll_rate`
  pub fn new(poll_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
      if tx.is_closed() {
        break;
      }
      if !event::poll(poll_rate).unwrap_or(false) {
        continue;
      }
      let forwarded = match event::read() {
        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => tx.send(Event::Key(key)),
        Ok(CrosstermEvent::Resize(_, _)) => tx.send(Event::Resize),
        _ => Ok(()),
      };
      if forwarded.is_err() {
        break;
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}

/// Keys that end the preview
pub fn is_quit(key: &KeyEvent) -> bool {
  match key.code {
    KeyCode::Char('q') | KeyCode::Esc => true,
    KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
    _ => false,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_quit() {
    assert!(is_quit(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
    assert!(is_quit(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
    assert!(is_quit(&KeyEvent::new(
      KeyCode::Char('c'),
      KeyModifiers::CONTROL
    )));
    assert!(!is_quit(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
    assert!(!is_quit(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
  }
}
