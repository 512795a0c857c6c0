//! Typed field identifiers.
//!
//! Each editable field of a report has an enum variant here, mapped to the slot it writes by
//! an exhaustive `match`. Adding a field to a record without wiring it here is therefore a
//! compile error rather than a silent no-op.
//!
//! The wire names (camelCase, matching the persisted payload keys) are only used at the API
//! and CLI edges, where [`FromStr`] turns them into typed identifiers.

use crate::components::case::{AnticoagulantType, Case, Consciousness, Gender, Mobility};
use crate::components::report::{Census, Manpower, ReportHeader, Shift, UnitHandover, UnitHandoverItem};
use crate::components::rows::{
    AntibioticField, CultureField, HighAlertField, InfusionField, LineField,
};
use crate::error::{HandoverError, HandoverResult};
use std::str::FromStr;

/// Free-text scalar fields of a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    PatientName,
    Mrn,
    IcuRoom,
    Age,
    Nationality,
    AdmissionDate,
    TimeOfAdmission,
    FinancialCategory,
    Consultant,
    ChiefComplaint,
    Diagnosis,
    Allergies,
    OutgoingNurse,
    IncomingNurse,
    ShiftDate,
    ShiftTime,
    Temperature,
    BloodPressure,
    HeartRate,
    RespiratoryRate,
    OxygenSaturation,
    PainScore,
    SkinCondition,
    ScheduledTasks,
    Diet,
    AnticoagulantMedication,
    AnticoagulantDose,
    AnticoagulantFrequency,
    AnticoagulantDevice,
    VentilationMode,
    VentilationFio2,
    VentilationPeep,
    VentilationTidalVolume,
    VentilationRate,
    VentilationPressureSupport,
}

impl TextField {
    pub const ALL: [TextField; 35] = [
        TextField::PatientName,
        TextField::Mrn,
        TextField::IcuRoom,
        TextField::Age,
        TextField::Nationality,
        TextField::AdmissionDate,
        TextField::TimeOfAdmission,
        TextField::FinancialCategory,
        TextField::Consultant,
        TextField::ChiefComplaint,
        TextField::Diagnosis,
        TextField::Allergies,
        TextField::OutgoingNurse,
        TextField::IncomingNurse,
        TextField::ShiftDate,
        TextField::ShiftTime,
        TextField::Temperature,
        TextField::BloodPressure,
        TextField::HeartRate,
        TextField::RespiratoryRate,
        TextField::OxygenSaturation,
        TextField::PainScore,
        TextField::SkinCondition,
        TextField::ScheduledTasks,
        TextField::Diet,
        TextField::AnticoagulantMedication,
        TextField::AnticoagulantDose,
        TextField::AnticoagulantFrequency,
        TextField::AnticoagulantDevice,
        TextField::VentilationMode,
        TextField::VentilationFio2,
        TextField::VentilationPeep,
        TextField::VentilationTidalVolume,
        TextField::VentilationRate,
        TextField::VentilationPressureSupport,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            TextField::PatientName => "patientName",
            TextField::Mrn => "mrn",
            TextField::IcuRoom => "icuRoom",
            TextField::Age => "age",
            TextField::Nationality => "nationality",
            TextField::AdmissionDate => "admissionDate",
            TextField::TimeOfAdmission => "timeOfAdmission",
            TextField::FinancialCategory => "financialCategory",
            TextField::Consultant => "consultant",
            TextField::ChiefComplaint => "chiefComplaint",
            TextField::Diagnosis => "diagnosis",
            TextField::Allergies => "allergies",
            TextField::OutgoingNurse => "outgoingNurse",
            TextField::IncomingNurse => "incomingNurse",
            TextField::ShiftDate => "shiftDate",
            TextField::ShiftTime => "shiftTime",
            TextField::Temperature => "temperature",
            TextField::BloodPressure => "bloodPressure",
            TextField::HeartRate => "heartRate",
            TextField::RespiratoryRate => "respiratoryRate",
            TextField::OxygenSaturation => "oxygenSaturation",
            TextField::PainScore => "painScore",
            TextField::SkinCondition => "skinCondition",
            TextField::ScheduledTasks => "scheduledTasks",
            TextField::Diet => "diet",
            TextField::AnticoagulantMedication => "anticoagulantMedication",
            TextField::AnticoagulantDose => "anticoagulantDose",
            TextField::AnticoagulantFrequency => "anticoagulantFrequency",
            TextField::AnticoagulantDevice => "anticoagulantDevice",
            TextField::VentilationMode => "ventilationMode",
            TextField::VentilationFio2 => "ventilationFio2",
            TextField::VentilationPeep => "ventilationPeep",
            TextField::VentilationTidalVolume => "ventilationTidalVolume",
            TextField::VentilationRate => "ventilationRate",
            TextField::VentilationPressureSupport => "ventilationPressureSupport",
        }
    }

    /// Mutable access to the text slot this field names.
    pub fn slot(self, case: &mut Case) -> &mut String {
        match self {
            TextField::PatientName => &mut case.patient_name,
            TextField::Mrn => &mut case.mrn,
            TextField::IcuRoom => &mut case.icu_room,
            TextField::Age => &mut case.age,
            TextField::Nationality => &mut case.nationality,
            TextField::AdmissionDate => &mut case.admission_date,
            TextField::TimeOfAdmission => &mut case.time_of_admission,
            TextField::FinancialCategory => &mut case.financial_category,
            TextField::Consultant => &mut case.consultant,
            TextField::ChiefComplaint => &mut case.chief_complaint,
            TextField::Diagnosis => &mut case.diagnosis,
            TextField::Allergies => &mut case.allergies,
            TextField::OutgoingNurse => &mut case.outgoing_nurse,
            TextField::IncomingNurse => &mut case.incoming_nurse,
            TextField::ShiftDate => &mut case.shift_date,
            TextField::ShiftTime => &mut case.shift_time,
            TextField::Temperature => &mut case.vitals.temperature,
            TextField::BloodPressure => &mut case.vitals.blood_pressure,
            TextField::HeartRate => &mut case.vitals.heart_rate,
            TextField::RespiratoryRate => &mut case.vitals.respiratory_rate,
            TextField::OxygenSaturation => &mut case.vitals.oxygen_saturation,
            TextField::PainScore => &mut case.vitals.pain_score,
            TextField::SkinCondition => &mut case.skin_condition,
            TextField::ScheduledTasks => &mut case.scheduled_tasks,
            TextField::Diet => &mut case.diet,
            TextField::AnticoagulantMedication => &mut case.anticoagulant.medication,
            TextField::AnticoagulantDose => &mut case.anticoagulant.dose,
            TextField::AnticoagulantFrequency => &mut case.anticoagulant.frequency,
            TextField::AnticoagulantDevice => &mut case.anticoagulant.device,
            TextField::VentilationMode => &mut case.ventilation.mode,
            TextField::VentilationFio2 => &mut case.ventilation.fio2,
            TextField::VentilationPeep => &mut case.ventilation.peep,
            TextField::VentilationTidalVolume => &mut case.ventilation.tidal_volume,
            TextField::VentilationRate => &mut case.ventilation.rate,
            TextField::VentilationPressureSupport => &mut case.ventilation.pressure_support,
        }
    }
}

impl FromStr for TextField {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextField::ALL
            .into_iter()
            .find(|f| f.wire_name() == s)
            .ok_or_else(|| HandoverError::UnknownField(s.to_string()))
    }
}

/// The two free-text narratives that are auto-bulleted on every edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NarrativeField {
    LastUpdates,
    Plans,
}

impl NarrativeField {
    pub fn wire_name(self) -> &'static str {
        match self {
            NarrativeField::LastUpdates => "lastUpdates",
            NarrativeField::Plans => "plans",
        }
    }

    pub fn slot(self, case: &mut Case) -> &mut String {
        match self {
            NarrativeField::LastUpdates => &mut case.last_updates,
            NarrativeField::Plans => &mut case.plans,
        }
    }
}

/// A value as received from an untyped edge (JSON body, CLI argument).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

/// A single typed scalar update of a case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseUpdate {
    Text(TextField, String),
    Narrative(NarrativeField, String),
    Gender(Gender),
    Consciousness(Consciousness),
    Mobility(Mobility),
    AnticoagulantType(AnticoagulantType),
    VentilationConnected(bool),
}

impl CaseUpdate {
    /// Builds a typed update from a wire field name and an untyped value.
    ///
    /// # Errors
    ///
    /// - [`HandoverError::UnknownField`] if `field` names no scalar case field.
    /// - [`HandoverError::InvalidInput`] if the value has the wrong type or is not a valid
    ///   option for an enumerated field.
    pub fn from_wire(field: &str, value: FieldValue) -> HandoverResult<Self> {
        let text = |value: FieldValue| match value {
            FieldValue::Text(s) => Ok(s),
            FieldValue::Flag(_) => Err(HandoverError::InvalidInput(format!(
                "field '{}' expects text",
                field
            ))),
        };

        match field {
            "gender" => Ok(CaseUpdate::Gender(text(value)?.parse()?)),
            "consciousness" => Ok(CaseUpdate::Consciousness(text(value)?.parse()?)),
            "mobility" => Ok(CaseUpdate::Mobility(text(value)?.parse()?)),
            "anticoagulantType" => Ok(CaseUpdate::AnticoagulantType(text(value)?.parse()?)),
            "ventilationConnected" => match value {
                FieldValue::Flag(b) => Ok(CaseUpdate::VentilationConnected(b)),
                FieldValue::Text(_) => Err(HandoverError::InvalidInput(
                    "field 'ventilationConnected' expects a boolean".into(),
                )),
            },
            "lastUpdates" => Ok(CaseUpdate::Narrative(
                NarrativeField::LastUpdates,
                text(value)?,
            )),
            "plans" => Ok(CaseUpdate::Narrative(NarrativeField::Plans, text(value)?)),
            other => {
                let field: TextField = other.parse()?;
                Ok(CaseUpdate::Text(field, text(value)?))
            }
        }
    }
}

/// Report header fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HeaderField {
    Date,
    EndorsedFromCn,
    ShiftCn,
    NextCn,
}

/// A single typed update of the report header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderUpdate {
    Text(HeaderField, String),
    Shift(Shift),
}

impl HeaderField {
    pub fn slot(self, header: &mut ReportHeader) -> &mut String {
        match self {
            HeaderField::Date => &mut header.date,
            HeaderField::EndorsedFromCn => &mut header.endorsed_from_cn,
            HeaderField::ShiftCn => &mut header.shift_cn,
            HeaderField::NextCn => &mut header.next_cn,
        }
    }
}

impl HeaderUpdate {
    pub fn from_wire(field: &str, value: String) -> HandoverResult<Self> {
        match field {
            "date" => Ok(HeaderUpdate::Text(HeaderField::Date, value)),
            "shift" => Ok(HeaderUpdate::Shift(value.parse()?)),
            "endorsedFromCN" => Ok(HeaderUpdate::Text(HeaderField::EndorsedFromCn, value)),
            "shiftCN" => Ok(HeaderUpdate::Text(HeaderField::ShiftCn, value)),
            "nextCN" => Ok(HeaderUpdate::Text(HeaderField::NextCn, value)),
            other => Err(HandoverError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ManpowerField {
    NoStaff,
    Orientee,
    PullOutStaff,
    RcIcuStaff,
    FloatToIcuStaff,
    OnCall,
}

impl ManpowerField {
    pub fn slot(self, manpower: &mut Manpower) -> &mut String {
        match self {
            ManpowerField::NoStaff => &mut manpower.no_staff,
            ManpowerField::Orientee => &mut manpower.orientee,
            ManpowerField::PullOutStaff => &mut manpower.pull_out_staff,
            ManpowerField::RcIcuStaff => &mut manpower.rc_icu_staff,
            ManpowerField::FloatToIcuStaff => &mut manpower.float_to_icu_staff,
            ManpowerField::OnCall => &mut manpower.on_call,
        }
    }
}

impl FromStr for ManpowerField {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "noStaff" => Ok(ManpowerField::NoStaff),
            "orientee" => Ok(ManpowerField::Orientee),
            "pullOutStaff" => Ok(ManpowerField::PullOutStaff),
            "rcIcuStaff" => Ok(ManpowerField::RcIcuStaff),
            "floatToIcuStaff" => Ok(ManpowerField::FloatToIcuStaff),
            "onCall" => Ok(ManpowerField::OnCall),
            other => Err(HandoverError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CensusField {
    ActiveCases,
    Admission,
    Discharge,
    TransferOut,
    Dama,
    Death,
}

impl CensusField {
    pub fn slot(self, census: &mut Census) -> &mut String {
        match self {
            CensusField::ActiveCases => &mut census.active_cases,
            CensusField::Admission => &mut census.admission,
            CensusField::Discharge => &mut census.discharge,
            CensusField::TransferOut => &mut census.transfer_out,
            CensusField::Dama => &mut census.dama,
            CensusField::Death => &mut census.death,
        }
    }
}

impl FromStr for CensusField {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "activeCases" => Ok(CensusField::ActiveCases),
            "admission" => Ok(CensusField::Admission),
            "discharge" => Ok(CensusField::Discharge),
            "transferOut" => Ok(CensusField::TransferOut),
            "dama" => Ok(CensusField::Dama),
            "death" => Ok(CensusField::Death),
            other => Err(HandoverError::UnknownField(other.to_string())),
        }
    }
}

/// Items of the unit handover checklist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitItem {
    Narcotic,
    BiomedicalMaintenance,
    GeneralMaintenance,
    Stock,
    It,
    Others,
}

impl UnitItem {
    pub const ALL: [UnitItem; 6] = [
        UnitItem::Narcotic,
        UnitItem::BiomedicalMaintenance,
        UnitItem::GeneralMaintenance,
        UnitItem::Stock,
        UnitItem::It,
        UnitItem::Others,
    ];

    /// Printed label of the checklist item.
    pub fn label(self) -> &'static str {
        match self {
            UnitItem::Narcotic => "Narcotic (No. empty only)",
            UnitItem::BiomedicalMaintenance => "Biomedical maintenance issue",
            UnitItem::GeneralMaintenance => "General maintenance issue",
            UnitItem::Stock => "Stock issue",
            UnitItem::It => "IT issue",
            UnitItem::Others => "Others",
        }
    }

    pub fn slot(self, unit: &mut UnitHandover) -> &mut UnitHandoverItem {
        match self {
            UnitItem::Narcotic => &mut unit.narcotic,
            UnitItem::BiomedicalMaintenance => &mut unit.biomedical_maintenance,
            UnitItem::GeneralMaintenance => &mut unit.general_maintenance,
            UnitItem::Stock => &mut unit.stock,
            UnitItem::It => &mut unit.it,
            UnitItem::Others => &mut unit.others,
        }
    }

    pub fn get(self, unit: &UnitHandover) -> &UnitHandoverItem {
        match self {
            UnitItem::Narcotic => &unit.narcotic,
            UnitItem::BiomedicalMaintenance => &unit.biomedical_maintenance,
            UnitItem::GeneralMaintenance => &unit.general_maintenance,
            UnitItem::Stock => &unit.stock,
            UnitItem::It => &unit.it,
            UnitItem::Others => &unit.others,
        }
    }
}

impl FromStr for UnitItem {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "narcotic" => Ok(UnitItem::Narcotic),
            "biomedicalMaintenance" => Ok(UnitItem::BiomedicalMaintenance),
            "generalMaintenance" => Ok(UnitItem::GeneralMaintenance),
            "stock" => Ok(UnitItem::Stock),
            "it" => Ok(UnitItem::It),
            "others" => Ok(UnitItem::Others),
            other => Err(HandoverError::UnknownField(other.to_string())),
        }
    }
}

/// The repeating sections of a case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Lines,
    Infusions,
    Antibiotics,
    HighAlertMedications,
    Cultures,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Lines,
        SectionKind::Infusions,
        SectionKind::Antibiotics,
        SectionKind::HighAlertMedications,
        SectionKind::Cultures,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            SectionKind::Lines => "lines",
            SectionKind::Infusions => "infusions",
            SectionKind::Antibiotics => "antibiotics",
            SectionKind::HighAlertMedications => "highAlertMedications",
            SectionKind::Cultures => "cultures",
        }
    }

    /// Number of rows currently in this section of `case`.
    pub fn len_in(self, case: &Case) -> usize {
        match self {
            SectionKind::Lines => case.lines.len(),
            SectionKind::Infusions => case.infusions.len(),
            SectionKind::Antibiotics => case.antibiotics.len(),
            SectionKind::HighAlertMedications => case.high_alert_medications.len(),
            SectionKind::Cultures => case.cultures.len(),
        }
    }
}

impl FromStr for SectionKind {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionKind::ALL
            .into_iter()
            .find(|k| k.wire_name() == s)
            .ok_or_else(|| HandoverError::UnknownSection(s.to_string()))
    }
}

/// A row field, tagged with the section it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowField {
    Line(LineField),
    Infusion(InfusionField),
    Antibiotic(AntibioticField),
    HighAlert(HighAlertField),
    Culture(CultureField),
}

impl RowField {
    pub fn section(self) -> SectionKind {
        match self {
            RowField::Line(_) => SectionKind::Lines,
            RowField::Infusion(_) => SectionKind::Infusions,
            RowField::Antibiotic(_) => SectionKind::Antibiotics,
            RowField::HighAlert(_) => SectionKind::HighAlertMedications,
            RowField::Culture(_) => SectionKind::Cultures,
        }
    }

    /// Resolves a row field from the section it is addressed under and its wire name.
    ///
    /// # Errors
    ///
    /// Returns [`HandoverError::UnknownField`] if `field` is not a column of `section`.
    pub fn from_wire(section: SectionKind, field: &str) -> HandoverResult<Self> {
        let unknown = || HandoverError::UnknownField(format!("{}.{}", section.wire_name(), field));
        let parsed = match section {
            SectionKind::Lines => RowField::Line(match field {
                "lineType" => LineField::LineType,
                "insertionDate" => LineField::InsertionDate,
                "insertionSite" => LineField::InsertionSite,
                "size" => LineField::Size,
                "removalDate" => LineField::RemovalDate,
                "insertedBy" => LineField::InsertedBy,
                _ => return Err(unknown()),
            }),
            SectionKind::Infusions => RowField::Infusion(match field {
                "medication" => InfusionField::Medication,
                "doseDilution" => InfusionField::DoseDilution,
                "rate" => InfusionField::Rate,
                _ => return Err(unknown()),
            }),
            SectionKind::Antibiotics => RowField::Antibiotic(match field {
                "name" => AntibioticField::Name,
                "dose" => AntibioticField::Dose,
                "frequency" => AntibioticField::Frequency,
                "startDate" => AntibioticField::StartDate,
                "endDate" => AntibioticField::EndDate,
                _ => return Err(unknown()),
            }),
            SectionKind::HighAlertMedications => RowField::HighAlert(match field {
                "name" => HighAlertField::Name,
                "dose" => HighAlertField::Dose,
                "frequency" => HighAlertField::Frequency,
                "route" => HighAlertField::Route,
                "startDate" => HighAlertField::StartDate,
                "startTime" => HighAlertField::StartTime,
                _ => return Err(unknown()),
            }),
            SectionKind::Cultures => RowField::Culture(match field {
                "dateCollected" => CultureField::DateCollected,
                "type" => CultureField::CultureType,
                "isolationPrecaution" => CultureField::IsolationPrecaution,
                "dateResultReceived" => CultureField::DateResultReceived,
                "results" => CultureField::Results,
                "actionTaken" => CultureField::ActionTaken,
                _ => return Err(unknown()),
            }),
        };
        Ok(parsed)
    }
}
