use thiserror::Error;

/// Failures inside one refresh cycle. None of these escape the cycle; they
/// end up as status messages.
#[derive(Debug, Error)]
pub enum SyncError {
  #[error("{0}")]
  Transport(String),

  #[error("HTTP error {0}")]
  HttpStatus(u16),

  #[error("Invalid JSON in response: {0}")]
  Validation(#[source] serde_json::Error),

  #[error("Failed to write cache file: {0}")]
  Persistence(#[source] std::io::Error),
}

/// Coarse category of a [`SyncError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Transport,
  Validation,
  Persistence,
}

impl SyncError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Transport(_) | Self::HttpStatus(_) => ErrorKind::Transport,
      Self::Validation(_) => ErrorKind::Validation,
      Self::Persistence(_) => ErrorKind::Persistence,
    }
  }
}
