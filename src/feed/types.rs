//! Serde types for the dashboard document.
//!
//! The same shape is produced by the `publish` job and consumed by the sync
//! engine, so both sides share these definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status bucket whose issues get the highlighted color bar.
pub const IN_PROGRESS: &str = "In Progress";

/// Status bucket shown after the in-progress issues.
pub const TODO: &str = "Todo";

/// The full document as published and cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
  /// Generation info from the producer. Never interpreted here.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub metadata: Option<serde_json::Value>,
  pub data: DashboardData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
  /// Issues grouped by status name
  #[serde(default)]
  pub issues: BTreeMap<String, Vec<Issue>>,
  /// Today's events, in the order received
  #[serde(default)]
  pub events: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
  pub title: String,
  #[serde(default)]
  pub repository: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub sprint: Option<String>,
  #[serde(default)]
  pub status: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hours: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub project: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub activity: Option<String>,
}

impl Issue {
  /// Secondary line under the title: repository, else sprint.
  pub fn label(&self) -> &str {
    if !self.repository.is_empty() {
      &self.repository
    } else {
      self.sprint.as_deref().unwrap_or("")
    }
  }

  pub fn is_in_progress(&self) -> bool {
    self.status == IN_PROGRESS
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
  /// Preformatted time label, e.g. "09:30"
  pub start: String,
  pub title: String,
}

impl RemoteDocument {
  /// The empty document used when neither network nor cache yield data.
  pub fn empty() -> Self {
    Self::default()
  }

  /// Parse and validate a document body.
  pub fn parse(body: &str) -> serde_json::Result<Self> {
    serde_json::from_str(body)
  }

}

impl DashboardData {
  /// Issues in a status bucket, empty when the bucket is absent.
  pub fn bucket(&self, status: &str) -> &[Issue] {
    self
      .issues
      .get(status)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }
}

/// Human-readable messages accumulated during one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLog(Vec<String>);

impl StatusLog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, message: impl Into<String>) {
    self.0.push(message.into());
  }

  pub fn entries(&self) -> &[String] {
    &self.0
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// All entries joined with a single space, in append order.
  pub fn joined(&self) -> String {
    self.0.join(" ")
  }
}
