//! The per-patient handover record.

use crate::components::rows::{AttachedLine, Antibiotic, Culture, HighAlertMedication, Infusion};
use crate::error::HandoverError;
use crate::sections::Rows;
use handover_uuid::CaseUuid;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unset,
    Male,
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Unset => "",
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Gender::Unset),
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(HandoverError::InvalidInput(format!(
                "unknown gender: '{}'",
                other
            ))),
        }
    }
}

/// Level of consciousness (AVPU scale plus sedation).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Consciousness {
    #[default]
    #[serde(rename = "")]
    Unset,
    Alert,
    Verbal,
    Pain,
    Unresponsive,
    Sedated,
}

impl Consciousness {
    pub fn label(self) -> &'static str {
        match self {
            Consciousness::Unset => "",
            Consciousness::Alert => "Alert",
            Consciousness::Verbal => "Verbal",
            Consciousness::Pain => "Pain",
            Consciousness::Unresponsive => "Unresponsive",
            Consciousness::Sedated => "Sedated",
        }
    }
}

impl FromStr for Consciousness {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Consciousness::Unset),
            "Alert" => Ok(Consciousness::Alert),
            "Verbal" => Ok(Consciousness::Verbal),
            "Pain" => Ok(Consciousness::Pain),
            "Unresponsive" => Ok(Consciousness::Unresponsive),
            "Sedated" => Ok(Consciousness::Sedated),
            other => Err(HandoverError::InvalidInput(format!(
                "unknown consciousness level: '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mobility {
    #[default]
    #[serde(rename = "")]
    Unset,
    Independent,
    Assisted,
    Bedbound,
}

impl Mobility {
    pub fn label(self) -> &'static str {
        match self {
            Mobility::Unset => "",
            Mobility::Independent => "Independent",
            Mobility::Assisted => "Assisted",
            Mobility::Bedbound => "Bedbound",
        }
    }
}

impl FromStr for Mobility {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Mobility::Unset),
            "Independent" => Ok(Mobility::Independent),
            "Assisted" => Ok(Mobility::Assisted),
            "Bedbound" => Ok(Mobility::Bedbound),
            other => Err(HandoverError::InvalidInput(format!(
                "unknown mobility: '{}'",
                other
            ))),
        }
    }
}

/// Which anticoagulation sub-form applies to the case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnticoagulantType {
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "pharmacological")]
    Pharmacological,
    #[serde(rename = "non-pharmacological")]
    NonPharmacological,
}

impl AnticoagulantType {
    pub fn label(self) -> &'static str {
        match self {
            AnticoagulantType::Unset => "",
            AnticoagulantType::Pharmacological => "pharmacological",
            AnticoagulantType::NonPharmacological => "non-pharmacological",
        }
    }
}

impl FromStr for AnticoagulantType {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(AnticoagulantType::Unset),
            "pharmacological" => Ok(AnticoagulantType::Pharmacological),
            "non-pharmacological" => Ok(AnticoagulantType::NonPharmacological),
            other => Err(HandoverError::InvalidInput(format!(
                "unknown anticoagulant type: '{}'",
                other
            ))),
        }
    }
}

/// Vital signs, stored as text to allow partial or annotated entries ("38.2 (axillary)").
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VitalSigns {
    pub temperature: String,
    pub blood_pressure: String,
    pub heart_rate: String,
    pub respiratory_rate: String,
    pub oxygen_saturation: String,
    pub pain_score: String,
}

/// Anticoagulation regimen. `kind` selects which of the sub-fields are meaningful:
/// medication/dose/frequency for pharmacological, device for non-pharmacological.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Anticoagulant {
    #[serde(rename = "type")]
    pub kind: AnticoagulantType,
    pub medication: String,
    pub dose: String,
    pub frequency: String,
    /// Compression stockings, sequential compression device, ...
    pub device: String,
}

/// Mechanical ventilation. The settings are only meaningful while `connected` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ventilation {
    pub connected: bool,
    pub mode: String,
    pub fio2: String,
    pub peep: String,
    pub tidal_volume: String,
    pub rate: String,
    pub pressure_support: String,
}

/// One patient's handover record within a shift report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Case {
    /// Stable key; generated once at creation and never changed.
    pub id: CaseUuid,
    /// Display ordinal stamped at creation. Never renumbered.
    pub case_number: u32,

    // Identification
    pub patient_name: String,
    pub mrn: String,
    pub icu_room: String,
    pub age: String,
    pub gender: Gender,
    pub nationality: String,
    pub admission_date: String,
    pub time_of_admission: String,
    pub financial_category: String,
    pub consultant: String,
    pub chief_complaint: String,
    pub diagnosis: String,
    pub allergies: String,

    // Staff handover
    pub outgoing_nurse: String,
    pub incoming_nurse: String,
    pub shift_date: String,
    pub shift_time: String,

    pub vitals: VitalSigns,

    // Assessment
    pub consciousness: Consciousness,
    pub mobility: Mobility,
    pub skin_condition: String,

    pub lines: Rows<AttachedLine>,
    pub infusions: Rows<Infusion>,
    pub antibiotics: Rows<Antibiotic>,
    pub high_alert_medications: Rows<HighAlertMedication>,
    pub cultures: Rows<Culture>,

    pub scheduled_tasks: String,
    pub diet: String,
    pub anticoagulant: Anticoagulant,
    pub ventilation: Ventilation,

    /// Bulleted narrative, see [`crate::narrative::normalise_narrative`].
    pub last_updates: String,
    /// Bulleted narrative, see [`crate::narrative::normalise_narrative`].
    pub plans: String,
}

impl Case {
    /// Creates an empty case with a fresh id.
    ///
    /// Every scalar is at its zero-value and every repeating section holds exactly one empty
    /// row.
    pub fn new(case_number: u32) -> Self {
        Self {
            id: CaseUuid::new(),
            case_number,
            patient_name: String::new(),
            mrn: String::new(),
            icu_room: String::new(),
            age: String::new(),
            gender: Gender::Unset,
            nationality: String::new(),
            admission_date: String::new(),
            time_of_admission: String::new(),
            financial_category: String::new(),
            consultant: String::new(),
            chief_complaint: String::new(),
            diagnosis: String::new(),
            allergies: String::new(),
            outgoing_nurse: String::new(),
            incoming_nurse: String::new(),
            shift_date: String::new(),
            shift_time: String::new(),
            vitals: VitalSigns::default(),
            consciousness: Consciousness::Unset,
            mobility: Mobility::Unset,
            skin_condition: String::new(),
            lines: Rows::default(),
            infusions: Rows::default(),
            antibiotics: Rows::default(),
            high_alert_medications: Rows::default(),
            cultures: Rows::default(),
            scheduled_tasks: String::new(),
            diet: String::new(),
            anticoagulant: Anticoagulant::default(),
            ventilation: Ventilation::default(),
            last_updates: String::new(),
            plans: String::new(),
        }
    }

    /// Returns true if every field other than `id` and `case_number` is at its zero-value.
    pub fn is_blank(&self) -> bool {
        let fresh = Case {
            id: self.id,
            case_number: self.case_number,
            ..Case::new(self.case_number)
        };
        *self == fresh
    }
}

/// A case with a fresh id and case number 1. Missing fields in stored payloads fall back to
/// these values.
impl Default for Case {
    fn default() -> Self {
        Self::new(1)
    }
}
