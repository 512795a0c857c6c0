//! Constants used throughout the handover core crate.

/// Default directory for local disaster-recovery snapshots.
pub const DEFAULT_SNAPSHOT_DIR: &str = "handover_snapshots";

/// Default directory for exported reports.
pub const DEFAULT_EXPORT_DIR: &str = "handover_exports";

/// Default number of rows per exported page.
pub const DEFAULT_PAGE_HEIGHT: usize = 60;

/// Hosted-database table holding persisted reports.
pub const REPORTS_TABLE: &str = "icu_shift_reports";
