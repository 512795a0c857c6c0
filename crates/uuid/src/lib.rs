//! Identifier utilities for handover records.
//!
//! Two kinds of identifier are used across the workspace:
//!
//! - [`CaseUuid`]: the stable, immutable key of a case within a shift report. It is generated
//!   once when the case is created and never changes, even if cases are reordered.
//! - [`TimestampId`]: a time-prefixed unique key used for local backup snapshots. Keys produced
//!   by one [`TimestampIdGenerator`] are strictly increasing, so a snapshot can never overwrite
//!   an earlier one.
//!
//! ## Canonical UUID form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//! Non-canonical values (uppercase, hyphenated, wrong length, non-hex) are rejected when parsed
//! from external input.

mod service;

pub use service::{CaseUuid, TimestampId, TimestampIdGenerator, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
