//! Components of a shift handover report.
//!
//! These are the plain data structures that make up a report, independent of how they are
//! edited, rendered or persisted.

pub mod case;
pub mod report;
pub mod rows;
