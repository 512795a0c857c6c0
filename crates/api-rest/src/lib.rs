//! # API REST
//!
//! REST API implementation for the handover report.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

pub mod handlers;

use api_shared::{
    CreateCaseRes, ExportReportReq, ExportReportRes, FilterCasesRes, HealthRes, ListRecordsRes,
    MutationRes, RecordSummary, SaveReportReq, SaveReportRes, UpdateCaseFieldReq,
    UpdateRowFieldReq, UpdateSingletonFieldReq, UpdateUnitItemReq,
};
use axum::{
    http::StatusCode,
    routing::{delete, get, post, put},
    Router,
};
use handover_core::{
    CoreConfig, ExportService, FormStore, GatewayError, GatewayResult, HandoverError,
    InMemoryGateway, Mrn, ReportGateway, ReportService, SnapshotStore, StoredReport,
    TextRasterizer,
};
use handover_supabase::{SupabaseConfig, SupabaseGateway};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Persistence backend selected at startup.
pub enum Gateway {
    Supabase(SupabaseGateway),
    InMemory(InMemoryGateway),
}

impl Gateway {
    /// Pick the backend from raw environment values.
    ///
    /// `kind` is `supabase` (the default) or `memory`. The Supabase backend requires
    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env_values(
        kind: Option<String>,
        url: Option<String>,
        anon_key: Option<String>,
        access_token: Option<String>,
    ) -> anyhow::Result<Self> {
        let kind = kind.map(|k| k.trim().to_ascii_lowercase()).unwrap_or_default();
        match kind.as_str() {
            "" | "supabase" => {
                let config = SupabaseConfig::from_env_values(url, anon_key, access_token)?;
                Ok(Gateway::Supabase(SupabaseGateway::new(config)))
            }
            "memory" => {
                tracing::warn!("using in-memory persistence; saved reports are lost on exit");
                Ok(Gateway::InMemory(InMemoryGateway::new()))
            }
            other => anyhow::bail!("unknown HANDOVER_GATEWAY '{}'", other),
        }
    }
}

impl ReportGateway for Gateway {
    async fn save(&self, mrn: &Mrn, report_data: &serde_json::Value) -> GatewayResult<StoredReport> {
        match self {
            Gateway::Supabase(g) => g.save(mrn, report_data).await,
            Gateway::InMemory(g) => g.save(mrn, report_data).await,
        }
    }

    async fn update(
        &self,
        id: &str,
        mrn: &Mrn,
        report_data: &serde_json::Value,
    ) -> GatewayResult<StoredReport> {
        match self {
            Gateway::Supabase(g) => g.update(id, mrn, report_data).await,
            Gateway::InMemory(g) => g.update(id, mrn, report_data).await,
        }
    }

    async fn find_by_mrn(&self, mrn: &Mrn) -> GatewayResult<Vec<StoredReport>> {
        match self {
            Gateway::Supabase(g) => g.find_by_mrn(mrn).await,
            Gateway::InMemory(g) => g.find_by_mrn(mrn).await,
        }
    }

    async fn list_all(&self) -> GatewayResult<Vec<StoredReport>> {
        match self {
            Gateway::Supabase(g) => g.list_all().await,
            Gateway::InMemory(g) => g.list_all().await,
        }
    }

    async fn remove(&self, id: &str) -> GatewayResult<()> {
        match self {
            Gateway::Supabase(g) => g.remove(id).await,
            Gateway::InMemory(g) => g.remove(id).await,
        }
    }
}

/// Application state for the REST API server
///
/// One form store per server process, shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<FormStore>>,
    reports: Arc<ReportService<Gateway>>,
    exporter: Arc<ExportService<TextRasterizer>>,
}

impl AppState {
    pub fn new(cfg: &CoreConfig, gateway: Gateway) -> Result<Self, HandoverError> {
        let snapshots = SnapshotStore::open(cfg.snapshot_dir())?;
        Ok(Self {
            store: Arc::new(Mutex::new(FormStore::new())),
            reports: Arc::new(ReportService::new(gateway, snapshots)),
            exporter: Arc::new(ExportService::new(
                TextRasterizer,
                cfg.export_dir().to_path_buf(),
                cfg.page_height(),
            )),
        })
    }

    fn store(&self) -> MutexGuard<'_, FormStore> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Map a core error to a REST status, logging the detail.
pub(crate) fn error_status(context: &str, err: HandoverError) -> (StatusCode, &'static str) {
    tracing::error!("{} error: {:?}", context, err);
    match err {
        HandoverError::MissingMrn(_) => (StatusCode::BAD_REQUEST, "MRN is required"),
        HandoverError::UnknownField(_) => (StatusCode::BAD_REQUEST, "Unknown field"),
        HandoverError::UnknownSection(_) => (StatusCode::BAD_REQUEST, "Unknown section"),
        HandoverError::InvalidId(_) => (StatusCode::BAD_REQUEST, "Invalid id"),
        HandoverError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        HandoverError::Gateway(GatewayError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, "Record not found")
        }
        HandoverError::Gateway(_) => (StatusCode::BAD_GATEWAY, "Persistence backend error"),
        HandoverError::Export(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Export failed"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_report,
        handlers::reset_report,
        handlers::update_header,
        handlers::update_manpower,
        handlers::update_census,
        handlers::update_unit_item,
        handlers::add_case,
        handlers::filter_cases,
        handlers::update_case_field,
        handlers::add_row,
        handlers::update_row,
        handlers::remove_row,
        handlers::save_report,
        handlers::export_report,
        handlers::list_records,
        handlers::load_record,
        handlers::delete_record,
    ),
    components(schemas(
        HealthRes,
        MutationRes,
        CreateCaseRes,
        FilterCasesRes,
        UpdateCaseFieldReq,
        UpdateSingletonFieldReq,
        UpdateUnitItemReq,
        UpdateRowFieldReq,
        SaveReportReq,
        SaveReportRes,
        ExportReportReq,
        ExportReportRes,
        RecordSummary,
        ListRecordsRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/report", get(handlers::get_report))
        .route("/report/reset", post(handlers::reset_report))
        .route("/report/header", put(handlers::update_header))
        .route("/report/manpower", put(handlers::update_manpower))
        .route("/report/census", put(handlers::update_census))
        .route("/report/unit", put(handlers::update_unit_item))
        .route("/report/save", post(handlers::save_report))
        .route("/report/export", post(handlers::export_report))
        .route("/cases", post(handlers::add_case).get(handlers::filter_cases))
        .route("/cases/:id", put(handlers::update_case_field))
        .route("/cases/:id/:section", post(handlers::add_row))
        .route(
            "/cases/:id/:section/:index",
            put(handlers::update_row).delete(handlers::remove_row),
        )
        .route("/records", get(handlers::list_records))
        .route("/records/:id/load", post(handlers::load_record))
        .route("/records/:id", delete(handlers::delete_record))
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app(dir: &TempDir) -> Router {
        let cfg = CoreConfig::new(dir.path().join("snapshots"), dir.path().join("exports"), 20)
            .unwrap();
        let state = AppState::new(&cfg, Gateway::InMemory(InMemoryGateway::new())).unwrap();
        router(state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn first_case_id(app: &Router) -> String {
        let (_, body) = call(app, Method::GET, "/report", None).await;
        body["report"]["cases"][0]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let (status, body) = call(&app(&dir), Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_row_protocol_over_http() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = first_case_id(&app).await;
        let rows = format!("/cases/{}/infusions", id);

        call(&app, Method::POST, &rows, None).await;
        call(&app, Method::POST, &rows, None).await;
        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("{}/2", rows),
            Some(json!({ "field": "medication", "value": "Noradrenaline" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], true);

        let (_, body) = call(&app, Method::DELETE, &format!("{}/0", rows), None).await;
        assert_eq!(body["applied"], true);
        call(&app, Method::DELETE, &format!("{}/0", rows), None).await;
        let (status, body) = call(&app, Method::DELETE, &format!("{}/0", rows), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);

        let (_, report) = call(&app, Method::GET, "/report", None).await;
        let infusions = report["report"]["cases"][0]["infusions"].as_array().unwrap();
        assert_eq!(infusions.len(), 1);
        assert_eq!(infusions[0]["medication"], "Noradrenaline");
    }

    #[tokio::test]
    async fn test_row_index_out_of_range_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = first_case_id(&app).await;

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/cases/{}/cultures/5", id),
            Some(json!({ "field": "results", "value": "MRSA" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_case_is_ignored() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let ghost = handover_core::CaseUuid::new();

        let (status, body) = call(
            &app,
            Method::PUT,
            &format!("/cases/{}", ghost),
            Some(json!({ "field": "mrn", "value": "X" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], false);
    }

    #[tokio::test]
    async fn test_narrative_is_bulleted_and_filter_finds_case() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = first_case_id(&app).await;
        let uri = format!("/cases/{}", id);

        call(&app, Method::PUT, &uri, Some(json!({ "field": "mrn", "value": "ABC123" }))).await;
        call(&app, Method::PUT, &uri, Some(json!({ "field": "plans", "value": "a\n\nb" }))).await;
        call(&app, Method::PUT, &uri, Some(json!({ "field": "ventilationConnected", "value": true }))).await;

        let (_, body) = call(&app, Method::GET, "/cases?mrn=abc", None).await;
        assert_eq!(body["state"], "matches");
        assert_eq!(body["cases"][0]["plans"], "• a\n\n• b");
        assert_eq!(body["cases"][0]["ventilation"]["connected"], true);

        let (_, body) = call(&app, Method::GET, "/cases?mrn=zzz", None).await;
        assert_eq!(body["state"], "no_results");

        let (_, body) = call(&app, Method::GET, "/cases", None).await;
        assert_eq!(body["state"], "unfiltered");
    }

    #[tokio::test]
    async fn test_unknown_field_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = first_case_id(&app).await;

        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("/cases/{}", id),
            Some(json!({ "field": "shoeSize", "value": "9" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_save_without_mrn_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, _) = call(&app, Method::POST, "/report/save", Some(json!({}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, body) = call(&app, Method::GET, "/records", None).await;
        assert!(body["records"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_list_load_delete_records() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);
        let id = first_case_id(&app).await;
        call(
            &app,
            Method::PUT,
            &format!("/cases/{}", id),
            Some(json!({ "field": "mrn", "value": "A1" })),
        )
        .await;

        let (status, saved) = call(&app, Method::POST, "/report/save", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let record_id = saved["record_id"].as_str().unwrap().to_string();

        let (_, again) = call(&app, Method::POST, "/report/save", Some(json!({}))).await;
        assert_eq!(again["record_id"], record_id.as_str());

        let (_, listed) = call(&app, Method::GET, "/records?mrn=A1", None).await;
        assert_eq!(listed["records"].as_array().unwrap().len(), 1);

        call(&app, Method::POST, "/report/reset", None).await;
        let (status, _) = call(&app, Method::POST, &format!("/records/{}/load", record_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, report) = call(&app, Method::GET, "/report", None).await;
        assert_eq!(report["report"]["cases"][0]["mrn"], "A1");
        assert_eq!(report["recordId"], record_id.as_str());

        let (status, _) = call(&app, Method::DELETE, &format!("/records/{}", record_id), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&app, Method::DELETE, &format!("/records/{}", record_id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_writes_dated_file() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        let (status, body) = call(
            &app,
            Method::POST,
            "/report/export",
            Some(json!({ "date": "2024-02-29" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file_name"], "ICU_Shift_Report_2024-02-29.txt");
        assert!(dir.path().join("exports/ICU_Shift_Report_2024-02-29.txt").is_file());
    }

    #[tokio::test]
    async fn test_singleton_updates_and_reset() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir);

        call(&app, Method::PUT, "/report/census", Some(json!({ "field": "death", "value": "1" }))).await;
        call(&app, Method::PUT, "/report/header", Some(json!({ "field": "shift", "value": "Night" }))).await;
        call(&app, Method::PUT, "/report/unit", Some(json!({ "item": "stock", "checked": true }))).await;
        call(&app, Method::POST, "/cases", None).await;

        let (_, report) = call(&app, Method::GET, "/report", None).await;
        assert_eq!(report["report"]["census"]["death"], "1");
        assert_eq!(report["report"]["header"]["shift"], "Night");
        assert_eq!(report["report"]["unitHandover"]["stock"]["checked"], true);
        assert_eq!(report["report"]["cases"].as_array().unwrap().len(), 2);

        call(&app, Method::POST, "/report/reset", None).await;
        let (_, report) = call(&app, Method::GET, "/report", None).await;
        assert_eq!(report["report"]["census"]["death"], "");
        assert_eq!(report["report"]["cases"].as_array().unwrap().len(), 1);
        assert_eq!(report["report"]["cases"][0]["caseNumber"], 1);
    }
}
