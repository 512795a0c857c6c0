//! # API Shared
//!
//! Shared utilities and definitions for the handover APIs.
//!
//! Contains:
//! - Request/response bodies (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and `handover-run` for common functionality.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
