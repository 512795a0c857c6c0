//! Request and response bodies shared by the API surfaces.
//!
//! Field and section names travel as their camelCase wire names (for example `"mrn"`,
//! `"infusions"`, `"doseDilution"`) and are parsed into typed identifiers by the handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Scalar update of one case field. `value` is a string, or a boolean for
/// `ventilationConnected`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCaseFieldReq {
    pub field: String,
    #[schema(value_type = Object)]
    pub value: serde_json::Value,
}

/// Update of one field of a report singleton (header, manpower or census).
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSingletonFieldReq {
    pub field: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUnitItemReq {
    pub item: String,
    pub checked: bool,
    #[serde(default)]
    pub note: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRowFieldReq {
    pub field: String,
    pub value: String,
}

/// Whether a mutation changed state. `false` means it was ignored as a no-op.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MutationRes {
    pub applied: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CreateCaseRes {
    pub id: String,
    pub case_number: u32,
}

/// Result of an MRN search over the current cases.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FilterCasesRes {
    /// `unfiltered`, `matches` or `no_results`.
    pub state: String,
    #[schema(value_type = Vec<Object>)]
    pub cases: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SaveReportReq {
    /// MRN to save under; defaults to the MRN of the first case.
    #[serde(default)]
    pub mrn: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SaveReportRes {
    pub record_id: String,
    pub mrn: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ExportReportReq {
    /// Export date as `YYYY-MM-DD`; defaults to today.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExportReportRes {
    pub file_name: String,
    pub path: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecordSummary {
    pub id: String,
    pub mrn: String,
    pub created_at: String,
    pub updated_at: String,
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListRecordsRes {
    pub records: Vec<RecordSummary>,
}
