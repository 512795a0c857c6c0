//! Persistence gateway for shift reports.
//!
//! The hosted database is an external collaborator. Core code only relies on the
//! [`ReportGateway`] contract: create, replace, query by MRN, list and delete records whose
//! `report_data` is the serialised [`crate::ReportData`].
//!
//! All calls may fail with [`GatewayError`]. Callers must leave in-memory state untouched when a
//! call fails.

use chrono::{DateTime, Utc};
use handover_types::Mrn;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Mutex;

/// A persisted report record as stored by the hosted database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: String,
    pub mrn: String,
    /// Opaque JSON snapshot of the full report.
    pub report_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend rejected request ({status}): {message}")]
    Backend { status: u16, message: String },
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Remote storage for shift reports.
pub trait ReportGateway: Send + Sync {
    /// Creates a new record for `mrn`.
    fn save(
        &self,
        mrn: &Mrn,
        report_data: &serde_json::Value,
    ) -> impl Future<Output = GatewayResult<StoredReport>> + Send;

    /// Replaces the payload of the record with `id`.
    fn update(
        &self,
        id: &str,
        mrn: &Mrn,
        report_data: &serde_json::Value,
    ) -> impl Future<Output = GatewayResult<StoredReport>> + Send;

    /// All records for `mrn`, newest first.
    fn find_by_mrn(&self, mrn: &Mrn)
        -> impl Future<Output = GatewayResult<Vec<StoredReport>>> + Send;

    /// All records, newest first.
    fn list_all(&self) -> impl Future<Output = GatewayResult<Vec<StoredReport>>> + Send;

    fn remove(&self, id: &str) -> impl Future<Output = GatewayResult<()>> + Send;
}

/// Process-local gateway, used for development without a hosted database and in tests.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    records: Mutex<Vec<StoredReport>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Vec<StoredReport>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Newest-first copy of the records matching `keep`. Records are appended on creation, so
    /// reverse insertion order is creation order descending.
    fn newest_first(&self, keep: impl Fn(&StoredReport) -> bool) -> Vec<StoredReport> {
        self.records()
            .iter()
            .rev()
            .filter(|r| keep(r))
            .cloned()
            .collect()
    }
}

impl ReportGateway for InMemoryGateway {
    async fn save(&self, mrn: &Mrn, report_data: &serde_json::Value) -> GatewayResult<StoredReport> {
        let now = Utc::now();
        let record = StoredReport {
            id: handover_uuid::Uuid::new_v4().to_string(),
            mrn: mrn.as_str().to_string(),
            report_data: report_data.clone(),
            created_at: now,
            updated_at: now,
            created_by: None,
        };
        self.records().push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: &str,
        mrn: &Mrn,
        report_data: &serde_json::Value,
    ) -> GatewayResult<StoredReport> {
        let mut records = self.records();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        record.mrn = mrn.as_str().to_string();
        record.report_data = report_data.clone();
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn find_by_mrn(&self, mrn: &Mrn) -> GatewayResult<Vec<StoredReport>> {
        Ok(self.newest_first(|r| r.mrn == mrn.as_str()))
    }

    async fn list_all(&self) -> GatewayResult<Vec<StoredReport>> {
        Ok(self.newest_first(|_| true))
    }

    async fn remove(&self, id: &str) -> GatewayResult<()> {
        let mut records = self.records();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
