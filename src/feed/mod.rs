//! Dashboard document model and the remote source it is fetched from.

pub mod client;
pub mod types;

pub use client::{DocumentSource, FeedClient};
pub use types::{
  CalendarEvent, DashboardData, Issue, RemoteDocument, StatusLog, IN_PROGRESS, TODO,
};
