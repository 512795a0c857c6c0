//! Orchestration of persistence around a [`FormStore`].
//!
//! [`ReportService`] owns the gateway and the local snapshot store. It never holds a lock on
//! the form store across a network call: callers run [`FormStore::begin_save`], hand the
//! [`PendingSave`] to [`ReportService::submit`] with the store unlocked, and then apply the
//! outcome with [`FormStore::finish_save`].

use crate::error::{HandoverError, HandoverResult};
use crate::gateway::{GatewayResult, ReportGateway, StoredReport};
use crate::snapshot::SnapshotStore;
use crate::store::{FormStore, PendingSave};
use handover_types::Mrn;

pub struct ReportService<G> {
    gateway: G,
    snapshots: SnapshotStore,
}

impl<G: ReportGateway> ReportService<G> {
    pub fn new(gateway: G, snapshots: SnapshotStore) -> Self {
        Self { gateway, snapshots }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// Sends a captured report to the gateway.
    ///
    /// A local snapshot of the cases is written first. A failed snapshot is logged and does
    /// not stop the cloud attempt. Updates the remembered record if there is one, otherwise
    /// creates a new record.
    pub async fn submit(&self, pending: &PendingSave) -> HandoverResult<GatewayResult<StoredReport>> {
        if let Err(e) = self.snapshots.write(&pending.report.cases) {
            tracing::warn!("local snapshot failed, continuing with cloud save: {}", e);
        }

        let payload = pending.payload()?;
        let outcome = match pending.record_id.as_deref() {
            Some(id) => {
                tracing::info!("updating record {} for MRN {}", id, pending.mrn);
                self.gateway.update(id, &pending.mrn, &payload).await
            }
            None => {
                tracing::info!("saving new record for MRN {}", pending.mrn);
                self.gateway.save(&pending.mrn, &payload).await
            }
        };
        match &outcome {
            Ok(record) => tracing::info!("saved record {}", record.id),
            Err(e) => tracing::error!("save failed: {}", e),
        }
        Ok(outcome)
    }

    /// Full save of a store that is not shared with other tasks.
    pub async fn save_store(&self, store: &mut FormStore, mrn: &str) -> HandoverResult<StoredReport> {
        let pending = store.begin_save(mrn)?;
        let outcome = self.submit(&pending).await?;
        store.finish_save(&pending, outcome)
    }

    pub async fn find_by_mrn(&self, mrn: &str) -> HandoverResult<Vec<StoredReport>> {
        let mrn = Mrn::parse(mrn).map_err(HandoverError::MissingMrn)?;
        Ok(self.gateway.find_by_mrn(&mrn).await?)
    }

    pub async fn list_all(&self) -> HandoverResult<Vec<StoredReport>> {
        Ok(self.gateway.list_all().await?)
    }

    pub async fn remove(&self, id: &str) -> HandoverResult<()> {
        self.gateway.remove(id).await?;
        tracing::info!("deleted record {}", id);
        Ok(())
    }

    /// Looks up a record by id among all records.
    pub async fn fetch(&self, id: &str) -> HandoverResult<StoredReport> {
        self.list_all()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| crate::gateway::GatewayError::NotFound(id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{CaseUpdate, TextField};
    use crate::gateway::{GatewayError, InMemoryGateway};
    use crate::store::SaveStatus;
    use tempfile::TempDir;

    /// Gateway that rejects every call.
    struct OfflineGateway;

    impl ReportGateway for OfflineGateway {
        async fn save(&self, _: &Mrn, _: &serde_json::Value) -> GatewayResult<StoredReport> {
            Err(GatewayError::Network("offline".into()))
        }

        async fn update(
            &self,
            _: &str,
            _: &Mrn,
            _: &serde_json::Value,
        ) -> GatewayResult<StoredReport> {
            Err(GatewayError::Network("offline".into()))
        }

        async fn find_by_mrn(&self, _: &Mrn) -> GatewayResult<Vec<StoredReport>> {
            Err(GatewayError::Network("offline".into()))
        }

        async fn list_all(&self) -> GatewayResult<Vec<StoredReport>> {
            Err(GatewayError::Network("offline".into()))
        }

        async fn remove(&self, _: &str) -> GatewayResult<()> {
            Err(GatewayError::Network("offline".into()))
        }
    }

    fn service<G: ReportGateway>(gateway: G, dir: &TempDir) -> ReportService<G> {
        ReportService::new(gateway, SnapshotStore::open(dir.path()).unwrap())
    }

    fn store_with_mrn(mrn: &str) -> FormStore {
        let mut store = FormStore::new();
        let id = store.cases()[0].id;
        store.update_case_field(id, CaseUpdate::Text(TextField::Mrn, mrn.into()));
        store
    }

    #[tokio::test]
    async fn test_save_then_find_by_mrn_round_trips_report() {
        let dir = TempDir::new().unwrap();
        let service = service(InMemoryGateway::new(), &dir);
        let mut store = store_with_mrn("ABC123");
        store.add_case();

        service.save_store(&mut store, "ABC123").await.unwrap();
        let found = service.find_by_mrn("ABC123").await.unwrap();

        assert_eq!(found.len(), 1);
        let mut loaded = FormStore::new();
        loaded.load_record(&found[0]).unwrap();
        assert_eq!(loaded.report(), store.report());
    }

    #[tokio::test]
    async fn test_second_save_updates_same_record() {
        let dir = TempDir::new().unwrap();
        let service = service(InMemoryGateway::new(), &dir);
        let mut store = store_with_mrn("A1");

        let first = service.save_store(&mut store, "A1").await.unwrap();
        store.add_case();
        let second = service.save_store(&mut store, "A1").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(service.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_save_after_reset_creates_new_record() {
        let dir = TempDir::new().unwrap();
        let service = service(InMemoryGateway::new(), &dir);
        let mut store = store_with_mrn("A1");

        service.save_store(&mut store, "A1").await.unwrap();
        store.reset_all();
        service.save_store(&mut store, "A1").await.unwrap();

        assert_eq!(service.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_mrn_makes_no_gateway_call_and_no_snapshot() {
        let dir = TempDir::new().unwrap();
        let service = service(InMemoryGateway::new(), &dir);
        let mut store = FormStore::new();

        let err = service.save_store(&mut store, "").await.unwrap_err();

        assert!(err.is_validation());
        assert!(service.list_all().await.unwrap().is_empty());
        assert!(service.snapshots().list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_and_still_snapshots() {
        let dir = TempDir::new().unwrap();
        let service = service(OfflineGateway, &dir);
        let mut store = store_with_mrn("A1");
        let before = store.report().clone();

        let err = service.save_store(&mut store, "A1").await.unwrap_err();

        assert!(matches!(err, HandoverError::Gateway(GatewayError::Network(_))));
        assert_eq!(store.report(), &before);
        assert!(matches!(store.save_status(), SaveStatus::Failed { .. }));
        let keys = service.snapshots().list().unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(service.snapshots().read(&keys[0]).unwrap(), before.cases);
    }

    #[tokio::test]
    async fn test_remove_then_fetch_is_not_found() {
        let dir = TempDir::new().unwrap();
        let service = service(InMemoryGateway::new(), &dir);
        let mut store = store_with_mrn("A1");
        let saved = service.save_store(&mut store, "A1").await.unwrap();

        assert_eq!(service.fetch(&saved.id).await.unwrap().id, saved.id);
        service.remove(&saved.id).await.unwrap();

        assert!(matches!(
            service.fetch(&saved.id).await,
            Err(HandoverError::Gateway(GatewayError::NotFound(_)))
        ));
    }
}
