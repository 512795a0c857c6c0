//! HTTP handlers.
//!
//! Each handler holds the form store lock for one synchronous operation only. Persistence
//! calls run with the lock released.

use crate::{error_status, AppState};
use api_shared::{
    CreateCaseRes, ExportReportReq, ExportReportRes, FilterCasesRes, HealthRes, HealthService,
    ListRecordsRes, MutationRes, RecordSummary, SaveReportReq, SaveReportRes,
    UpdateCaseFieldReq, UpdateRowFieldReq, UpdateSingletonFieldReq, UpdateUnitItemReq,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use handover_core::{
    render_report, CaseUpdate, CaseUuid, CensusField, FieldValue, HeaderUpdate, ManpowerField,
    MrnFilter, RowField, SectionKind, StoredReport, UnitItem,
};
use serde::Deserialize;
use utoipa::IntoParams;

type ApiResult<T> = Result<Json<T>, (StatusCode, &'static str)>;

#[derive(Debug, Deserialize, IntoParams)]
pub struct MrnQuery {
    /// MRN to search for. Empty or missing means no filter.
    pub mrn: Option<String>,
}

fn parse_case_id(id: &str) -> Result<CaseUuid, (StatusCode, &'static str)> {
    CaseUuid::parse(id).map_err(|e| {
        tracing::error!("Invalid case id: {:?}", e);
        (StatusCode::BAD_REQUEST, "Invalid case id")
    })
}

fn parse_section(section: &str) -> Result<SectionKind, (StatusCode, &'static str)> {
    section.parse::<SectionKind>().map_err(|e| {
        tracing::error!("Invalid section: {:?}", e);
        (StatusCode::BAD_REQUEST, "Unknown section")
    })
}

fn field_value(value: serde_json::Value) -> Result<FieldValue, (StatusCode, &'static str)> {
    match value {
        serde_json::Value::String(s) => Ok(FieldValue::Text(s)),
        serde_json::Value::Bool(b) => Ok(FieldValue::Flag(b)),
        _ => Err((StatusCode::BAD_REQUEST, "Field value must be a string or boolean")),
    }
}

fn summary(record: &StoredReport) -> RecordSummary {
    RecordSummary {
        id: record.id.clone(),
        mrn: record.mrn.clone(),
        created_at: record.created_at.to_rfc3339(),
        updated_at: record.updated_at.to_rfc3339(),
        created_by: record.created_by.clone(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/report",
    responses(
        (status = 200, description = "Current report with save status", body = Object)
    )
)]
/// Current report, save status and the persisted record it is linked to
#[axum::debug_handler]
pub async fn get_report(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    let store = state.store();
    let body = serde_json::json!({
        "report": store.report(),
        "saveStatus": store.save_status(),
        "recordId": store.record_id(),
    });
    Ok(Json(body))
}

#[utoipa::path(
    post,
    path = "/report/reset",
    responses(
        (status = 200, description = "Report reset to one empty case", body = MutationRes)
    )
)]
/// Start a new report
#[axum::debug_handler]
pub async fn reset_report(State(state): State<AppState>) -> Json<MutationRes> {
    state.store().reset_all();
    Json(MutationRes { applied: true })
}

#[utoipa::path(
    put,
    path = "/report/header",
    request_body = UpdateSingletonFieldReq,
    responses(
        (status = 200, description = "Header updated", body = MutationRes),
        (status = 400, description = "Unknown field or value")
    )
)]
/// Update one header field (`date`, `shift`, `endorsedFromCN`, `shiftCN`, `nextCN`)
#[axum::debug_handler]
pub async fn update_header(
    State(state): State<AppState>,
    Json(req): Json<UpdateSingletonFieldReq>,
) -> ApiResult<MutationRes> {
    let update = HeaderUpdate::from_wire(&req.field, req.value)
        .map_err(|e| error_status("Update header", e))?;
    state.store().update_header(update);
    Ok(Json(MutationRes { applied: true }))
}

#[utoipa::path(
    put,
    path = "/report/manpower",
    request_body = UpdateSingletonFieldReq,
    responses(
        (status = 200, description = "Manpower updated", body = MutationRes),
        (status = 400, description = "Unknown field")
    )
)]
/// Update one manpower counter
#[axum::debug_handler]
pub async fn update_manpower(
    State(state): State<AppState>,
    Json(req): Json<UpdateSingletonFieldReq>,
) -> ApiResult<MutationRes> {
    let field = req
        .field
        .parse::<ManpowerField>()
        .map_err(|e| error_status("Update manpower", e))?;
    state.store().update_manpower(field, req.value);
    Ok(Json(MutationRes { applied: true }))
}

#[utoipa::path(
    put,
    path = "/report/census",
    request_body = UpdateSingletonFieldReq,
    responses(
        (status = 200, description = "Census updated", body = MutationRes),
        (status = 400, description = "Unknown field")
    )
)]
/// Update one census counter
#[axum::debug_handler]
pub async fn update_census(
    State(state): State<AppState>,
    Json(req): Json<UpdateSingletonFieldReq>,
) -> ApiResult<MutationRes> {
    let field = req
        .field
        .parse::<CensusField>()
        .map_err(|e| error_status("Update census", e))?;
    state.store().update_census(field, req.value);
    Ok(Json(MutationRes { applied: true }))
}

#[utoipa::path(
    put,
    path = "/report/unit",
    request_body = UpdateUnitItemReq,
    responses(
        (status = 200, description = "Checklist item updated", body = MutationRes),
        (status = 400, description = "Unknown item")
    )
)]
/// Tick or annotate one ICU unit handover checklist item
#[axum::debug_handler]
pub async fn update_unit_item(
    State(state): State<AppState>,
    Json(req): Json<UpdateUnitItemReq>,
) -> ApiResult<MutationRes> {
    let item = req
        .item
        .parse::<UnitItem>()
        .map_err(|e| error_status("Update unit item", e))?;
    state.store().update_unit_item(item, req.checked, req.note);
    Ok(Json(MutationRes { applied: true }))
}

#[utoipa::path(
    post,
    path = "/cases",
    responses(
        (status = 200, description = "Case appended", body = CreateCaseRes)
    )
)]
/// Append a new empty case
#[axum::debug_handler]
pub async fn add_case(State(state): State<AppState>) -> ApiResult<CreateCaseRes> {
    let mut store = state.store();
    let id = store.add_case();
    let case_number = store.case(id).map(|c| c.case_number).unwrap_or_default();
    Ok(Json(CreateCaseRes {
        id: id.to_string(),
        case_number,
    }))
}

#[utoipa::path(
    get,
    path = "/cases",
    params(MrnQuery),
    responses(
        (status = 200, description = "Cases matching the MRN filter", body = FilterCasesRes),
        (status = 500, description = "Internal server error")
    )
)]
/// Cases filtered by MRN (case-insensitive substring)
#[axum::debug_handler]
pub async fn filter_cases(
    State(state): State<AppState>,
    Query(query): Query<MrnQuery>,
) -> ApiResult<FilterCasesRes> {
    let store = state.store();
    let filter = store.filter_by_mrn(query.mrn.as_deref().unwrap_or(""));
    let label = match &filter {
        MrnFilter::Unfiltered(_) => "unfiltered",
        MrnFilter::Matches(_) => "matches",
        MrnFilter::NoResults => "no_results",
    };
    let cases = filter
        .cases()
        .into_iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            tracing::error!("Serialise cases error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        })?;
    Ok(Json(FilterCasesRes {
        state: label.to_string(),
        cases,
    }))
}

#[utoipa::path(
    put,
    path = "/cases/{id}",
    request_body = UpdateCaseFieldReq,
    params(("id" = String, Path, description = "Case id")),
    responses(
        (status = 200, description = "Field updated, or ignored for an unknown case", body = MutationRes),
        (status = 400, description = "Invalid id, field or value")
    )
)]
/// Update one scalar field of a case
#[axum::debug_handler]
pub async fn update_case_field(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCaseFieldReq>,
) -> ApiResult<MutationRes> {
    let case_id = parse_case_id(&id)?;
    let update = CaseUpdate::from_wire(&req.field, field_value(req.value)?)
        .map_err(|e| error_status("Update case field", e))?;
    let applied = state.store().update_case_field(case_id, update);
    Ok(Json(MutationRes { applied }))
}

#[utoipa::path(
    post,
    path = "/cases/{id}/{section}",
    params(
        ("id" = String, Path, description = "Case id"),
        ("section" = String, Path, description = "Section wire name, e.g. infusions")
    ),
    responses(
        (status = 200, description = "Row appended, or ignored for an unknown case", body = MutationRes),
        (status = 400, description = "Invalid id or section")
    )
)]
/// Append an empty row to a repeating section
#[axum::debug_handler]
pub async fn add_row(
    State(state): State<AppState>,
    Path((id, section)): Path<(String, String)>,
) -> ApiResult<MutationRes> {
    let case_id = parse_case_id(&id)?;
    let section = parse_section(&section)?;
    let applied = state.store().add_row(case_id, section);
    Ok(Json(MutationRes { applied }))
}

#[utoipa::path(
    put,
    path = "/cases/{id}/{section}/{index}",
    request_body = UpdateRowFieldReq,
    params(
        ("id" = String, Path, description = "Case id"),
        ("section" = String, Path, description = "Section wire name"),
        ("index" = usize, Path, description = "Row index")
    ),
    responses(
        (status = 200, description = "Row field updated, or ignored for an unknown case", body = MutationRes),
        (status = 400, description = "Invalid id, section, field or index")
    )
)]
/// Update one field of one row
#[axum::debug_handler]
pub async fn update_row(
    State(state): State<AppState>,
    Path((id, section, index)): Path<(String, String, usize)>,
    Json(req): Json<UpdateRowFieldReq>,
) -> ApiResult<MutationRes> {
    let case_id = parse_case_id(&id)?;
    let section = parse_section(&section)?;
    let field =
        RowField::from_wire(section, &req.field).map_err(|e| error_status("Update row", e))?;

    let mut store = state.store();
    let Some(len) = store.case(case_id).map(|c| section.len_in(c)) else {
        return Ok(Json(MutationRes { applied: false }));
    };
    if index >= len {
        return Err((StatusCode::BAD_REQUEST, "Row index out of range"));
    }
    let applied = store.update_row(case_id, index, field, req.value);
    Ok(Json(MutationRes { applied }))
}

#[utoipa::path(
    delete,
    path = "/cases/{id}/{section}/{index}",
    params(
        ("id" = String, Path, description = "Case id"),
        ("section" = String, Path, description = "Section wire name"),
        ("index" = usize, Path, description = "Row index")
    ),
    responses(
        (status = 200, description = "Row removed, or ignored for the last row or an unknown case", body = MutationRes),
        (status = 400, description = "Invalid id, section or index")
    )
)]
/// Remove one row while more than one remains
#[axum::debug_handler]
pub async fn remove_row(
    State(state): State<AppState>,
    Path((id, section, index)): Path<(String, String, usize)>,
) -> ApiResult<MutationRes> {
    let case_id = parse_case_id(&id)?;
    let section = parse_section(&section)?;

    let mut store = state.store();
    let Some(len) = store.case(case_id).map(|c| section.len_in(c)) else {
        return Ok(Json(MutationRes { applied: false }));
    };
    if len > 1 && index >= len {
        return Err((StatusCode::BAD_REQUEST, "Row index out of range"));
    }
    let applied = store.remove_row(case_id, section, index);
    Ok(Json(MutationRes { applied }))
}

#[utoipa::path(
    post,
    path = "/report/save",
    request_body = SaveReportReq,
    responses(
        (status = 200, description = "Report saved", body = SaveReportRes),
        (status = 400, description = "MRN missing"),
        (status = 404, description = "Linked record no longer exists"),
        (status = 502, description = "Persistence backend error")
    )
)]
/// Save the report to the hosted database
///
/// Creates a record the first time and updates the same record afterwards. A local snapshot
/// is written on every attempt.
#[axum::debug_handler]
pub async fn save_report(
    State(state): State<AppState>,
    Json(req): Json<SaveReportReq>,
) -> ApiResult<SaveReportRes> {
    let pending = {
        let mut store = state.store();
        let mrn = req.mrn.unwrap_or_else(|| store.primary_mrn().to_string());
        store.begin_save(&mrn)
    }
    .map_err(|e| error_status("Save report", e))?;

    let outcome = state
        .reports
        .submit(&pending)
        .await
        .map_err(|e| error_status("Save report", e))?;

    let record = state
        .store()
        .finish_save(&pending, outcome)
        .map_err(|e| error_status("Save report", e))?;

    Ok(Json(SaveReportRes {
        record_id: record.id,
        mrn: record.mrn,
        updated_at: record.updated_at.to_rfc3339(),
    }))
}

#[utoipa::path(
    post,
    path = "/report/export",
    request_body = ExportReportReq,
    responses(
        (status = 200, description = "Report exported", body = ExportReportRes),
        (status = 400, description = "Invalid date"),
        (status = 500, description = "Export failed")
    )
)]
/// Export the printable report as a paginated document
#[axum::debug_handler]
pub async fn export_report(
    State(state): State<AppState>,
    Json(req): Json<ExportReportReq>,
) -> ApiResult<ExportReportRes> {
    let date = match req.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|e| {
            tracing::error!("Invalid export date: {:?}", e);
            (StatusCode::BAD_REQUEST, "Invalid date")
        })?,
        None => chrono::Utc::now().date_naive(),
    };

    let region = render_report(state.store().report());
    let path = state.exporter.export(&region, date).map_err(|e| {
        tracing::error!("Export error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Export failed")
    })?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    Ok(Json(ExportReportRes {
        file_name,
        path: path.display().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/records",
    params(MrnQuery),
    responses(
        (status = 200, description = "Persisted records, newest first", body = ListRecordsRes),
        (status = 502, description = "Persistence backend error")
    )
)]
/// List persisted records, optionally only those for one MRN (exact match)
#[axum::debug_handler]
pub async fn list_records(
    State(state): State<AppState>,
    Query(query): Query<MrnQuery>,
) -> ApiResult<ListRecordsRes> {
    let mrn = query.mrn.as_deref().map(str::trim).filter(|m| !m.is_empty());
    let records = match mrn {
        Some(mrn) => state.reports.find_by_mrn(mrn).await,
        None => state.reports.list_all().await,
    }
    .map_err(|e| error_status("List records", e))?;

    Ok(Json(ListRecordsRes {
        records: records.iter().map(summary).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/records/{id}/load",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record loaded into the form", body = MutationRes),
        (status = 404, description = "Record not found"),
        (status = 502, description = "Persistence backend error")
    )
)]
/// Replace the current report with a persisted record
#[axum::debug_handler]
pub async fn load_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MutationRes> {
    let record = state
        .reports
        .fetch(&id)
        .await
        .map_err(|e| error_status("Load record", e))?;
    state
        .store()
        .load_record(&record)
        .map_err(|e| error_status("Load record", e))?;
    Ok(Json(MutationRes { applied: true }))
}

#[utoipa::path(
    delete,
    path = "/records/{id}",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 200, description = "Record deleted", body = MutationRes),
        (status = 404, description = "Record not found"),
        (status = 502, description = "Persistence backend error")
    )
)]
/// Delete a persisted record
#[axum::debug_handler]
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MutationRes> {
    state
        .reports
        .remove(&id)
        .await
        .map_err(|e| error_status("Delete record", e))?;
    state.store().forget_record(&id);
    Ok(Json(MutationRes { applied: true }))
}
