//! # Handover Core
//!
//! Core business logic for the ICU shift-handover report.
//!
//! This crate contains the report schema and every operation on it:
//! - The nested report record ([`ReportData`], [`Case`]) and its repeating sections
//! - The form store with the list mutation protocol ([`FormStore`])
//! - Narrative auto-bullet normalisation and the MRN filter
//! - The persistence gateway contract ([`ReportGateway`]) and local snapshots
//! - The printable report and its paginated export
//!
//! **No API concerns**: HTTP servers, the hosted-database client and command-line handling
//! belong in `api-rest`, `handover-supabase` and `handover-cli`.

pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod fields;
pub mod filter;
pub mod gateway;
pub mod narrative;
pub mod printable;
pub mod sections;
pub mod session;
pub mod snapshot;
pub mod store;

pub use components::case::{
    Anticoagulant, AnticoagulantType, Case, Consciousness, Gender, Mobility, Ventilation,
    VitalSigns,
};
pub use components::report::{
    Census, Manpower, ReportData, ReportHeader, Shift, UnitHandover, UnitHandoverItem,
};
pub use config::CoreConfig;
pub use error::{HandoverError, HandoverResult};
pub use export::{ExportError, ExportService, Rasterizer, TextRasterizer};
pub use fields::{
    CaseUpdate, CensusField, FieldValue, HeaderField, HeaderUpdate, ManpowerField,
    NarrativeField, RowField, SectionKind, TextField, UnitItem,
};
pub use filter::{filter_by_mrn, MrnFilter};
pub use gateway::{
    GatewayError, GatewayResult, InMemoryGateway, ReportGateway, StoredReport,
};
pub use handover_types::Mrn;
pub use handover_uuid::{CaseUuid, TimestampId};
pub use narrative::normalise_narrative;
pub use printable::{render_report, PrintRegion, PrintSection};
pub use session::ReportService;
pub use snapshot::SnapshotStore;
pub use store::{FormStore, PendingSave, SaveStatus};
