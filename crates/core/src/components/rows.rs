//! Row shapes of the repeating case sections.
//!
//! All row fields are free text so dates, sizes and doses can be entered exactly as charted.

use crate::sections::SectionRow;
use serde::{Deserialize, Serialize};

/// An attached line (central line, arterial line, catheter, drain, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachedLine {
    pub line_type: String,
    pub insertion_date: String,
    pub insertion_site: String,
    pub size: String,
    pub removal_date: String,
    pub inserted_by: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineField {
    LineType,
    InsertionDate,
    InsertionSite,
    Size,
    RemovalDate,
    InsertedBy,
}

impl SectionRow for AttachedLine {
    type Field = LineField;

    fn field_mut(&mut self, field: LineField) -> &mut String {
        match field {
            LineField::LineType => &mut self.line_type,
            LineField::InsertionDate => &mut self.insertion_date,
            LineField::InsertionSite => &mut self.insertion_site,
            LineField::Size => &mut self.size,
            LineField::RemovalDate => &mut self.removal_date,
            LineField::InsertedBy => &mut self.inserted_by,
        }
    }

    fn field(&self, field: LineField) -> &str {
        match field {
            LineField::LineType => &self.line_type,
            LineField::InsertionDate => &self.insertion_date,
            LineField::InsertionSite => &self.insertion_site,
            LineField::Size => &self.size,
            LineField::RemovalDate => &self.removal_date,
            LineField::InsertedBy => &self.inserted_by,
        }
    }
}

/// A running infusion.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Infusion {
    /// Medication or solution name.
    pub medication: String,
    /// Dose plus dilution, e.g. "4mg in 50ml NS".
    pub dose_dilution: String,
    pub rate: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfusionField {
    Medication,
    DoseDilution,
    Rate,
}

impl SectionRow for Infusion {
    type Field = InfusionField;

    fn field_mut(&mut self, field: InfusionField) -> &mut String {
        match field {
            InfusionField::Medication => &mut self.medication,
            InfusionField::DoseDilution => &mut self.dose_dilution,
            InfusionField::Rate => &mut self.rate,
        }
    }

    fn field(&self, field: InfusionField) -> &str {
        match field {
            InfusionField::Medication => &self.medication,
            InfusionField::DoseDilution => &self.dose_dilution,
            InfusionField::Rate => &self.rate,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Antibiotic {
    pub name: String,
    pub dose: String,
    pub frequency: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AntibioticField {
    Name,
    Dose,
    Frequency,
    StartDate,
    EndDate,
}

impl SectionRow for Antibiotic {
    type Field = AntibioticField;

    fn field_mut(&mut self, field: AntibioticField) -> &mut String {
        match field {
            AntibioticField::Name => &mut self.name,
            AntibioticField::Dose => &mut self.dose,
            AntibioticField::Frequency => &mut self.frequency,
            AntibioticField::StartDate => &mut self.start_date,
            AntibioticField::EndDate => &mut self.end_date,
        }
    }

    fn field(&self, field: AntibioticField) -> &str {
        match field {
            AntibioticField::Name => &self.name,
            AntibioticField::Dose => &self.dose,
            AntibioticField::Frequency => &self.frequency,
            AntibioticField::StartDate => &self.start_date,
            AntibioticField::EndDate => &self.end_date,
        }
    }
}

/// A high-alert medication (insulin, anticoagulants, concentrated electrolytes, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighAlertMedication {
    pub name: String,
    pub dose: String,
    pub frequency: String,
    pub route: String,
    pub start_date: String,
    pub start_time: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighAlertField {
    Name,
    Dose,
    Frequency,
    Route,
    StartDate,
    StartTime,
}

impl SectionRow for HighAlertMedication {
    type Field = HighAlertField;

    fn field_mut(&mut self, field: HighAlertField) -> &mut String {
        match field {
            HighAlertField::Name => &mut self.name,
            HighAlertField::Dose => &mut self.dose,
            HighAlertField::Frequency => &mut self.frequency,
            HighAlertField::Route => &mut self.route,
            HighAlertField::StartDate => &mut self.start_date,
            HighAlertField::StartTime => &mut self.start_time,
        }
    }

    fn field(&self, field: HighAlertField) -> &str {
        match field {
            HighAlertField::Name => &self.name,
            HighAlertField::Dose => &self.dose,
            HighAlertField::Frequency => &self.frequency,
            HighAlertField::Route => &self.route,
            HighAlertField::StartDate => &self.start_date,
            HighAlertField::StartTime => &self.start_time,
        }
    }
}

/// A microbiology culture and its follow-up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Culture {
    pub date_collected: String,
    #[serde(rename = "type")]
    pub culture_type: String,
    pub isolation_precaution: String,
    pub date_result_received: String,
    pub results: String,
    pub action_taken: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CultureField {
    DateCollected,
    CultureType,
    IsolationPrecaution,
    DateResultReceived,
    Results,
    ActionTaken,
}

impl SectionRow for Culture {
    type Field = CultureField;

    fn field_mut(&mut self, field: CultureField) -> &mut String {
        match field {
            CultureField::DateCollected => &mut self.date_collected,
            CultureField::CultureType => &mut self.culture_type,
            CultureField::IsolationPrecaution => &mut self.isolation_precaution,
            CultureField::DateResultReceived => &mut self.date_result_received,
            CultureField::Results => &mut self.results,
            CultureField::ActionTaken => &mut self.action_taken,
        }
    }

    fn field(&self, field: CultureField) -> &str {
        match field {
            CultureField::DateCollected => &self.date_collected,
            CultureField::CultureType => &self.culture_type,
            CultureField::IsolationPrecaution => &self.isolation_precaution,
            CultureField::DateResultReceived => &self.date_result_received,
            CultureField::Results => &self.results,
            CultureField::ActionTaken => &self.action_taken,
        }
    }
}
