//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. The intent is to avoid reading process-wide environment variables
//! during request handling, which can lead to inconsistent behaviour in multi-threaded runtimes
//! and test harnesses.

use crate::constants::{DEFAULT_EXPORT_DIR, DEFAULT_PAGE_HEIGHT, DEFAULT_SNAPSHOT_DIR};
use crate::{HandoverError, HandoverResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    snapshot_dir: PathBuf,
    export_dir: PathBuf,
    page_height: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(snapshot_dir: PathBuf, export_dir: PathBuf, page_height: usize) -> HandoverResult<Self> {
        if page_height == 0 {
            return Err(HandoverError::InvalidInput(
                "page height must be greater than zero".into(),
            ));
        }

        Ok(Self {
            snapshot_dir,
            export_dir,
            page_height,
        })
    }

    /// Build a config from raw environment values. Missing or blank values use the defaults.
    pub fn from_env_values(
        snapshot_dir: Option<String>,
        export_dir: Option<String>,
        page_height: Option<String>,
    ) -> HandoverResult<Self> {
        Self::new(
            dir_from_env_value(snapshot_dir, DEFAULT_SNAPSHOT_DIR),
            dir_from_env_value(export_dir, DEFAULT_EXPORT_DIR),
            page_height_from_env_value(page_height)?,
        )
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn page_height(&self) -> usize {
        self.page_height
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn dir_from_env_value(value: Option<String>, default: &str) -> PathBuf {
    PathBuf::from(non_blank(value).unwrap_or_else(|| default.to_string()))
}

/// Parse the export page height from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default page height.
pub fn page_height_from_env_value(value: Option<String>) -> HandoverResult<usize> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_PAGE_HEIGHT);
    };
    match value.parse::<usize>() {
        Ok(0) | Err(_) => Err(HandoverError::InvalidInput(format!(
            "page height must be a positive integer, got '{}'",
            value
        ))),
        Ok(height) => Ok(height),
    }
}
