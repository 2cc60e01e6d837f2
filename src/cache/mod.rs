//! Single-slot durable cache for the last validated dashboard document.
//!
//! This module provides:
//! - Whole-file replacement via temp file + rename, so readers never see a
//!   partially written document
//! - Content fingerprints to skip rewriting identical documents
//! - Distinguishing a missing cache from an unreadable one

mod storage;

pub use storage::{CommitOutcome, SnapshotStore};
