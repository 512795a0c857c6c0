//! In-memory form state for one shift report.
//!
//! [`FormStore`] is the single owner of the report being edited. All edits go through its
//! named operations; there are no public field writes. It is a plain value with no interior
//! locking: callers that share it (for example the REST API) wrap it in a mutex and hold the
//! lock only for the duration of one operation.
//!
//! ## Error policy
//!
//! - Mutations addressing an unknown case id are ignored and return `false`.
//! - Removing the last row of a section is ignored and returns `false`.
//! - Out-of-range row indices panic (see [`crate::sections`]).
//! - Saving without an MRN is rejected before any network call.

use crate::components::case::Case;
use crate::components::report::{ReportData, UnitHandoverItem};
use crate::error::{HandoverError, HandoverResult};
use crate::fields::{
    CaseUpdate, CensusField, HeaderUpdate, ManpowerField, RowField, SectionKind, UnitItem,
};
use crate::filter::{filter_by_mrn, MrnFilter};
use crate::gateway::{GatewayError, StoredReport};
use crate::narrative::normalise_narrative;
use chrono::{DateTime, Utc};
use handover_types::Mrn;
use handover_uuid::CaseUuid;
use serde::Serialize;

/// Save indicator shown next to the report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    Saving,
    Saved {
        record_id: String,
        at: DateTime<Utc>,
    },
    Failed {
        message: String,
    },
}

/// A save that has been validated and captured, waiting for the gateway.
///
/// Holds a copy of the report as it was when the save started, so edits made while the
/// request is in flight are not part of it.
#[derive(Clone, Debug)]
pub struct PendingSave {
    pub mrn: Mrn,
    pub report: ReportData,
    /// Record to update; `None` creates a new record.
    pub record_id: Option<String>,
    generation: u64,
}

impl PendingSave {
    pub fn payload(&self) -> HandoverResult<serde_json::Value> {
        serde_json::to_value(&self.report).map_err(HandoverError::Serialization)
    }
}

#[derive(Clone, Debug)]
pub struct FormStore {
    report: ReportData,
    save_status: SaveStatus,
    record_id: Option<String>,
    /// Bumped whenever the report is replaced wholesale, so a save that completes after a
    /// reset or load cannot attach its record id to the wrong report.
    generation: u64,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore {
    /// A store holding one auto-created empty case.
    pub fn new() -> Self {
        Self {
            report: ReportData::new(),
            save_status: SaveStatus::Idle,
            record_id: None,
            generation: 0,
        }
    }

    pub fn report(&self) -> &ReportData {
        &self.report
    }

    pub fn cases(&self) -> &[Case] {
        &self.report.cases
    }

    pub fn case(&self, case_id: CaseUuid) -> Option<&Case> {
        self.report.cases.iter().find(|c| c.id == case_id)
    }

    pub fn save_status(&self) -> &SaveStatus {
        &self.save_status
    }

    /// Id of the persisted record this report was last saved to or loaded from.
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    /// MRN of the first case, used as the default persistence key.
    pub fn primary_mrn(&self) -> &str {
        self.report
            .cases
            .first()
            .map(|c| c.mrn.as_str())
            .unwrap_or("")
    }

    fn case_mut(&mut self, case_id: CaseUuid, operation: &str) -> Option<&mut Case> {
        let found = self.report.cases.iter_mut().find(|c| c.id == case_id);
        if found.is_none() {
            tracing::debug!("{} ignored: no case with id {}", operation, case_id);
        }
        found
    }

    /// Builds a new empty case numbered after the current case count. Does not add it.
    pub fn create_case(&self) -> Case {
        let next = u32::try_from(self.report.cases.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        Case::new(next)
    }

    /// Appends a new empty case and returns its id.
    pub fn add_case(&mut self) -> CaseUuid {
        let case = self.create_case();
        let id = case.id;
        tracing::info!("added case {} ({})", case.case_number, id);
        self.report.cases.push(case);
        id
    }

    /// Applies one scalar field update to the case with `case_id`.
    ///
    /// Narrative fields are bullet-normalised on every write. Returns `false` if no case has
    /// that id.
    pub fn update_case_field(&mut self, case_id: CaseUuid, update: CaseUpdate) -> bool {
        let Some(case) = self.case_mut(case_id, "update_case_field") else {
            return false;
        };
        match update {
            CaseUpdate::Text(field, value) => *field.slot(case) = value,
            CaseUpdate::Narrative(field, value) => {
                *field.slot(case) = normalise_narrative(&value)
            }
            CaseUpdate::Gender(value) => case.gender = value,
            CaseUpdate::Consciousness(value) => case.consciousness = value,
            CaseUpdate::Mobility(value) => case.mobility = value,
            CaseUpdate::AnticoagulantType(value) => case.anticoagulant.kind = value,
            CaseUpdate::VentilationConnected(value) => case.ventilation.connected = value,
        }
        true
    }

    /// Replaces one field of one row. Returns `false` if no case has `case_id`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range for the section.
    pub fn update_row(
        &mut self,
        case_id: CaseUuid,
        index: usize,
        field: RowField,
        value: String,
    ) -> bool {
        let Some(case) = self.case_mut(case_id, "update_row") else {
            return false;
        };
        match field {
            RowField::Line(f) => case.lines.set_field(index, f, value),
            RowField::Infusion(f) => case.infusions.set_field(index, f, value),
            RowField::Antibiotic(f) => case.antibiotics.set_field(index, f, value),
            RowField::HighAlert(f) => case.high_alert_medications.set_field(index, f, value),
            RowField::Culture(f) => case.cultures.set_field(index, f, value),
        }
        true
    }

    /// Appends one empty row to `section`. Returns `false` if no case has `case_id`.
    pub fn add_row(&mut self, case_id: CaseUuid, section: SectionKind) -> bool {
        let Some(case) = self.case_mut(case_id, "add_row") else {
            return false;
        };
        match section {
            SectionKind::Lines => case.lines.push_empty(),
            SectionKind::Infusions => case.infusions.push_empty(),
            SectionKind::Antibiotics => case.antibiotics.push_empty(),
            SectionKind::HighAlertMedications => case.high_alert_medications.push_empty(),
            SectionKind::Cultures => case.cultures.push_empty(),
        }
        tracing::debug!(
            "added {} row to case {}",
            section.wire_name(),
            case.case_number
        );
        true
    }

    /// Removes the row at `index` from `section` while more than one row remains.
    ///
    /// Returns `false` if no case has `case_id` or the section is down to its last row.
    ///
    /// # Panics
    ///
    /// Panics if the section has more than one row and `index` is out of range.
    pub fn remove_row(&mut self, case_id: CaseUuid, section: SectionKind, index: usize) -> bool {
        let Some(case) = self.case_mut(case_id, "remove_row") else {
            return false;
        };
        let removed = match section {
            SectionKind::Lines => case.lines.remove(index),
            SectionKind::Infusions => case.infusions.remove(index),
            SectionKind::Antibiotics => case.antibiotics.remove(index),
            SectionKind::HighAlertMedications => case.high_alert_medications.remove(index),
            SectionKind::Cultures => case.cultures.remove(index),
        };
        if !removed {
            tracing::debug!(
                "remove_row ignored: {} of case {} has a single row",
                section.wire_name(),
                case.case_number
            );
        }
        removed
    }

    pub fn update_header(&mut self, update: HeaderUpdate) {
        match update {
            HeaderUpdate::Text(field, value) => *field.slot(&mut self.report.header) = value,
            HeaderUpdate::Shift(shift) => self.report.header.shift = shift,
        }
    }

    pub fn update_manpower(&mut self, field: ManpowerField, value: String) {
        *field.slot(&mut self.report.manpower) = value;
    }

    pub fn update_census(&mut self, field: CensusField, value: String) {
        *field.slot(&mut self.report.census) = value;
    }

    pub fn update_unit_item(&mut self, item: UnitItem, checked: bool, note: String) {
        *item.slot(&mut self.report.unit_handover) = UnitHandoverItem { checked, note };
    }

    /// Filters the current cases by MRN. Read-only.
    pub fn filter_by_mrn(&self, query: &str) -> MrnFilter<'_> {
        filter_by_mrn(&self.report.cases, query)
    }

    /// Starts a new report: one empty case numbered 1, cleared singletons, cleared save status.
    pub fn reset_all(&mut self) {
        self.report = ReportData::new();
        self.save_status = SaveStatus::Idle;
        self.record_id = None;
        self.generation += 1;
        tracing::info!("report reset");
    }

    /// Replaces the report with the payload of a persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`HandoverError::Deserialization`] if the payload is not a report; the current
    /// report is left unchanged.
    pub fn load_record(&mut self, record: &StoredReport) -> HandoverResult<()> {
        let mut report: ReportData = serde_json::from_value(record.report_data.clone())
            .map_err(HandoverError::Deserialization)?;
        if report.cases.is_empty() {
            report.cases.push(Case::new(1));
        }
        self.report = report;
        self.record_id = Some(record.id.clone());
        self.save_status = SaveStatus::Idle;
        self.generation += 1;
        tracing::info!("loaded record {} for MRN {}", record.id, record.mrn);
        Ok(())
    }

    /// Drops the link to a persisted record that has been deleted remotely.
    pub fn forget_record(&mut self, record_id: &str) {
        if self.record_id.as_deref() == Some(record_id) {
            self.record_id = None;
            self.save_status = SaveStatus::Idle;
        }
    }

    /// Validates `mrn` and captures the report for saving.
    ///
    /// # Errors
    ///
    /// Returns [`HandoverError::MissingMrn`] if `mrn` is blank; nothing is changed.
    pub fn begin_save(&mut self, mrn: &str) -> HandoverResult<PendingSave> {
        let mrn = Mrn::parse(mrn).map_err(HandoverError::MissingMrn)?;
        self.save_status = SaveStatus::Saving;
        Ok(PendingSave {
            mrn,
            report: self.report.clone(),
            record_id: self.record_id.clone(),
            generation: self.generation,
        })
    }

    /// Applies the outcome of a save started with [`FormStore::begin_save`].
    ///
    /// On success the record id is remembered so the next save updates it. On failure the
    /// report is left as is and the status carries the error message. An outcome for a report
    /// that has since been reset or replaced is returned but not applied.
    pub fn finish_save(
        &mut self,
        pending: &PendingSave,
        outcome: Result<StoredReport, GatewayError>,
    ) -> HandoverResult<StoredReport> {
        let current = pending.generation == self.generation;
        if !current {
            tracing::warn!("save for MRN {} finished after the report was replaced", pending.mrn);
        }
        match outcome {
            Ok(record) => {
                if current {
                    self.record_id = Some(record.id.clone());
                    self.save_status = SaveStatus::Saved {
                        record_id: record.id.clone(),
                        at: record.updated_at,
                    };
                }
                Ok(record)
            }
            Err(e) => {
                if current {
                    self.save_status = SaveStatus::Failed {
                        message: e.to_string(),
                    };
                }
                Err(HandoverError::Gateway(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::case::Gender;
    use crate::components::report::Shift;
    use crate::components::rows::InfusionField;
    use crate::fields::{HeaderField, NarrativeField, TextField};

    fn first_id(store: &FormStore) -> CaseUuid {
        store.cases()[0].id
    }

    fn stored(id: &str, report: &ReportData) -> StoredReport {
        StoredReport {
            id: id.into(),
            mrn: "A1".into(),
            report_data: serde_json::to_value(report).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
        }
    }

    #[test]
    fn test_new_store_has_one_auto_created_case() {
        let store = FormStore::new();

        assert_eq!(store.cases().len(), 1);
        assert_eq!(store.cases()[0].case_number, 1);
        assert_eq!(store.save_status(), &SaveStatus::Idle);
    }

    #[test]
    fn test_create_case_numbers_after_existing_cases() {
        let mut store = FormStore::new();
        store.add_case();
        assert_eq!(store.cases().len(), 2);

        let created = store.create_case();

        assert_eq!(created.case_number, 3);
        assert_eq!(store.cases().len(), 2, "create_case must not add the case");
        assert!(created.is_blank());
    }

    #[test]
    fn test_add_case_keeps_existing_numbers_and_ids() {
        let mut store = FormStore::new();
        let first = first_id(&store);

        let second = store.add_case();

        assert_ne!(first, second);
        assert_eq!(store.cases()[0].id, first);
        assert_eq!(store.cases()[0].case_number, 1);
        assert_eq!(store.cases()[1].case_number, 2);
    }

    #[test]
    fn test_update_case_field_touches_only_named_field() {
        let mut store = FormStore::new();
        let id = first_id(&store);
        store.add_row(id, SectionKind::Infusions);
        let before = store.cases()[0].clone();

        assert!(store.update_case_field(id, CaseUpdate::Text(TextField::Mrn, "ABC123".into())));

        let after = &store.cases()[0];
        assert_eq!(after.mrn, "ABC123");
        let mut expected = before;
        expected.mrn = "ABC123".into();
        assert_eq!(*after, expected);
    }

    #[test]
    fn test_update_case_field_unknown_id_is_noop() {
        let mut store = FormStore::new();
        store.add_case();
        let before = store.cases().to_vec();

        let applied =
            store.update_case_field(CaseUuid::new(), CaseUpdate::Gender(Gender::Female));

        assert!(!applied);
        assert_eq!(store.cases(), before.as_slice());
    }

    #[test]
    fn test_narrative_updates_are_bulleted() {
        let mut store = FormStore::new();
        let id = first_id(&store);

        store.update_case_field(
            id,
            CaseUpdate::Narrative(NarrativeField::LastUpdates, "a\n\nb".into()),
        );

        assert_eq!(store.cases()[0].last_updates, "• a\n\n• b");
    }

    #[test]
    fn test_other_text_fields_are_not_bulleted() {
        let mut store = FormStore::new();
        let id = first_id(&store);

        store.update_case_field(
            id,
            CaseUpdate::Text(TextField::ScheduledTasks, "bloods 0600".into()),
        );

        assert_eq!(store.cases()[0].scheduled_tasks, "bloods 0600");
    }

    #[test]
    fn test_infusion_rows_end_to_end() {
        let mut store = FormStore::new();
        let id = first_id(&store);

        assert!(store.add_row(id, SectionKind::Infusions));
        assert!(store.add_row(id, SectionKind::Infusions));
        assert_eq!(store.cases()[0].infusions.len(), 3);

        assert!(store.remove_row(id, SectionKind::Infusions, 0));
        assert!(store.remove_row(id, SectionKind::Infusions, 0));
        assert_eq!(store.cases()[0].infusions.len(), 1);

        let before = store.cases().to_vec();
        assert!(!store.remove_row(id, SectionKind::Infusions, 0));
        assert_eq!(store.cases(), before.as_slice());
    }

    #[test]
    fn test_update_row_targets_one_row() {
        let mut store = FormStore::new();
        let id = first_id(&store);
        store.add_row(id, SectionKind::Infusions);

        store.update_row(
            id,
            1,
            RowField::Infusion(InfusionField::Medication),
            "Propofol".into(),
        );

        let infusions = store.cases()[0].infusions.as_slice();
        assert_eq!(infusions[0].medication, "");
        assert_eq!(infusions[1].medication, "Propofol");
    }

    #[test]
    fn test_row_operations_unknown_case_are_noops() {
        let mut store = FormStore::new();
        let before = store.cases().to_vec();
        let ghost = CaseUuid::new();

        assert!(!store.add_row(ghost, SectionKind::Cultures));
        assert!(!store.remove_row(ghost, SectionKind::Cultures, 0));
        assert!(!store.update_row(
            ghost,
            0,
            RowField::Infusion(InfusionField::Rate),
            "10".into()
        ));
        assert_eq!(store.cases(), before.as_slice());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_update_row_out_of_range_panics() {
        let mut store = FormStore::new();
        let id = first_id(&store);
        store.update_row(id, 3, RowField::Infusion(InfusionField::Rate), "10".into());
    }

    #[test]
    fn test_sections_are_independent() {
        let mut store = FormStore::new();
        let id = first_id(&store);

        store.add_row(id, SectionKind::Cultures);
        store.add_row(id, SectionKind::Cultures);

        let case = &store.cases()[0];
        for kind in SectionKind::ALL {
            let expected = if kind == SectionKind::Cultures { 3 } else { 1 };
            assert_eq!(kind.len_in(case), expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_reset_all_after_edits() {
        let mut store = FormStore::new();
        let id = first_id(&store);
        store.update_case_field(id, CaseUpdate::Text(TextField::PatientName, "J. Doe".into()));
        store.add_row(id, SectionKind::Lines);
        store.add_case();
        store.add_case();
        store.update_manpower(ManpowerField::NoStaff, "14".into());
        store.update_census(CensusField::Death, "1".into());
        store.update_header(HeaderUpdate::Shift(Shift::Night));
        store.update_unit_item(UnitItem::Stock, true, "low saline".into());
        let pending = store.begin_save("A1").unwrap();
        let _ = store.finish_save(&pending, Err(GatewayError::Network("offline".into())));

        store.reset_all();

        assert_eq!(store.cases().len(), 1);
        assert_eq!(store.cases()[0].case_number, 1);
        assert!(store.cases()[0].is_blank());
        assert_ne!(store.cases()[0].id, id);
        assert_eq!(store.report(), &ReportData {
            cases: store.cases().to_vec(),
            ..ReportData::new()
        });
        assert_eq!(store.save_status(), &SaveStatus::Idle);
        assert_eq!(store.record_id(), None);
    }

    #[test]
    fn test_singleton_updates() {
        let mut store = FormStore::new();

        store.update_header(HeaderUpdate::Text(HeaderField::ShiftCn, "M. Cruz".into()));
        store.update_manpower(ManpowerField::FloatToIcuStaff, "2".into());
        store.update_census(CensusField::TransferOut, "1".into());
        store.update_unit_item(UnitItem::Narcotic, true, "2 empties".into());

        let report = store.report();
        assert_eq!(report.header.shift_cn, "M. Cruz");
        assert_eq!(report.manpower.float_to_icu_staff, "2");
        assert_eq!(report.census.transfer_out, "1");
        assert!(report.unit_handover.narcotic.checked);
        assert_eq!(report.unit_handover.narcotic.note, "2 empties");
    }

    #[test]
    fn test_begin_save_requires_mrn() {
        let mut store = FormStore::new();

        let err = store.begin_save("   ").unwrap_err();

        assert!(matches!(err, HandoverError::MissingMrn(_)));
        assert!(err.is_validation());
        assert_eq!(store.save_status(), &SaveStatus::Idle);
    }

    #[test]
    fn test_save_captures_report_at_start() {
        let mut store = FormStore::new();
        let id = first_id(&store);
        let pending = store.begin_save("A1").unwrap();

        store.update_case_field(id, CaseUpdate::Text(TextField::Diet, "NPO".into()));

        assert_eq!(pending.report.cases[0].diet, "");
        assert_eq!(store.save_status(), &SaveStatus::Saving);
    }

    #[test]
    fn test_finish_save_success_remembers_record() {
        let mut store = FormStore::new();
        let pending = store.begin_save("A1").unwrap();
        assert!(pending.record_id.is_none());

        let record = stored("rec-1", store.report());
        store.finish_save(&pending, Ok(record)).unwrap();

        assert_eq!(store.record_id(), Some("rec-1"));
        assert!(matches!(store.save_status(), SaveStatus::Saved { record_id, .. } if record_id == "rec-1"));
        assert_eq!(store.begin_save("A1").unwrap().record_id.as_deref(), Some("rec-1"));
    }

    #[test]
    fn test_finish_save_failure_keeps_report() {
        let mut store = FormStore::new();
        let id = first_id(&store);
        store.update_case_field(id, CaseUpdate::Text(TextField::Mrn, "A1".into()));
        let before = store.report().clone();
        let mrn = store.primary_mrn().to_string();
        let pending = store.begin_save(&mrn).unwrap();

        let result = store.finish_save(&pending, Err(GatewayError::Network("timeout".into())));

        assert!(matches!(result, Err(HandoverError::Gateway(_))));
        assert_eq!(store.report(), &before);
        assert_eq!(store.record_id(), None);
        assert!(matches!(store.save_status(), SaveStatus::Failed { message } if message.contains("timeout")));
    }

    #[test]
    fn test_finish_save_after_reset_is_not_applied() {
        let mut store = FormStore::new();
        let pending = store.begin_save("A1").unwrap();
        store.reset_all();

        let record = stored("rec-1", &pending.report);
        assert!(store.finish_save(&pending, Ok(record)).is_ok());

        assert_eq!(store.record_id(), None);
        assert_eq!(store.save_status(), &SaveStatus::Idle);
    }

    #[test]
    fn test_load_record_replaces_report() {
        let mut source = FormStore::new();
        let id = first_id(&source);
        source.update_case_field(id, CaseUpdate::Text(TextField::Mrn, "ZZ9".into()));
        source.add_case();

        let mut store = FormStore::new();
        store.load_record(&stored("rec-9", source.report())).unwrap();

        assert_eq!(store.report(), source.report());
        assert_eq!(store.record_id(), Some("rec-9"));
    }

    #[test]
    fn test_load_record_with_bad_payload_leaves_state() {
        let mut store = FormStore::new();
        let before = store.report().clone();
        let mut record = stored("rec-1", &before);
        record.report_data = serde_json::json!({ "cases": "not a list" });

        assert!(store.load_record(&record).is_err());
        assert_eq!(store.report(), &before);
        assert_eq!(store.record_id(), None);
    }

    #[test]
    fn test_forget_record_only_matches_current() {
        let mut store = FormStore::new();
        store.load_record(&stored("rec-1", &ReportData::new())).unwrap();

        store.forget_record("rec-2");
        assert_eq!(store.record_id(), Some("rec-1"));

        store.forget_record("rec-1");
        assert_eq!(store.record_id(), None);
    }
}
