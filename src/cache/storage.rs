//! File-backed snapshot storage.

use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::sync::SyncError;

/// What a commit did to the cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
  /// The file was replaced with new content
  Written { fingerprint: String },
  /// The file already held identical content
  Unchanged { fingerprint: String },
}

impl CommitOutcome {
  pub fn fingerprint(&self) -> &str {
    match self {
      Self::Written { fingerprint } | Self::Unchanged { fingerprint } => fingerprint,
    }
  }
}

/// A single well-known path holding the last committed document.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
  path: PathBuf,
}

impl SnapshotStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Read the whole snapshot. `Ok(None)` when nothing was ever committed.
  pub fn load(&self) -> std::io::Result<Option<String>> {
    match fs::read_to_string(&self.path) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e),
    }
  }

  /// Replace the snapshot with `body`, all or nothing.
  pub fn commit(&self, body: &str) -> Result<CommitOutcome, SyncError> {
    let fingerprint = fingerprint(body);

    if let Ok(existing) = fs::read(&self.path) {
      if fingerprint_bytes(&existing) == fingerprint {
        return Ok(CommitOutcome::Unchanged { fingerprint });
      }
    }

    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent).map_err(SyncError::Persistence)?;
    }

    let temp_path = self.temp_path();
    if let Err(e) = write_synced(&temp_path, body).and_then(|_| fs::rename(&temp_path, &self.path))
    {
      let _ = fs::remove_file(&temp_path);
      return Err(SyncError::Persistence(e));
    }

    Ok(CommitOutcome::Written { fingerprint })
  }

  /// Sibling temp file, so the final rename stays on one filesystem.
  fn temp_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(|n| n.to_os_string())
      .unwrap_or_default();
    name.push(".tmp");
    self.path.with_file_name(name)
  }
}

fn write_synced(path: &Path, body: &str) -> std::io::Result<()> {
  let mut file = File::create(path)?;
  file.write_all(body.as_bytes())?;
  file.sync_all()
}

/// SHA-256 hex digest of a document body.
pub fn fingerprint(body: &str) -> String {
  fingerprint_bytes(body.as_bytes())
}

fn fingerprint_bytes(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}
