//! Printable view of a report.
//!
//! [`render_report`] derives a [`PrintRegion`] from the report: the region that export hands to
//! a rasteriser. It is recomputed from state on demand and never stored.

use crate::components::case::{AnticoagulantType, Case};
use crate::components::report::ReportData;
use crate::fields::UnitItem;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrintField {
    pub label: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PrintTable {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A titled block of label/value pairs, tables and free-text notes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrintSection {
    pub title: String,
    pub fields: Vec<PrintField>,
    pub tables: Vec<PrintTable>,
    pub notes: Vec<PrintField>,
}

impl PrintSection {
    fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    fn field(mut self, label: &str, value: &str) -> Self {
        self.fields.push(PrintField {
            label: label.to_string(),
            value: value.to_string(),
        });
        self
    }

    fn table(mut self, title: &str, columns: &[&str], rows: Vec<Vec<String>>) -> Self {
        self.tables.push(PrintTable {
            title: title.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        });
        self
    }

    fn note(mut self, label: &str, text: &str) -> Self {
        self.notes.push(PrintField {
            label: label.to_string(),
            value: text.to_string(),
        });
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrintRegion {
    pub title: String,
    pub sections: Vec<PrintSection>,
}

impl PrintRegion {
    pub fn section(&self, title: &str) -> Option<&PrintSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Lays the region out as plain text rows.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![self.title.clone(), String::new()];
        for section in &self.sections {
            out.push(section.title.to_uppercase());
            for field in &section.fields {
                out.push(format!("  {}: {}", field.label, field.value));
            }
            for table in &section.tables {
                out.push(format!("  {}", table.title));
                out.push(format!("    {}", table.columns.join(" | ")));
                for row in &table.rows {
                    out.push(format!("    {}", row.join(" | ")));
                }
            }
            for note in &section.notes {
                out.push(format!("  {}:", note.label));
                out.extend(note.value.lines().map(|l| format!("    {}", l)));
            }
            out.push(String::new());
        }
        out
    }
}

pub fn render_report(report: &ReportData) -> PrintRegion {
    let header = &report.header;
    let manpower = &report.manpower;
    let census = &report.census;

    let mut sections = vec![
        PrintSection::titled("Shift")
            .field("Date", &header.date)
            .field("Shift", header.shift.label())
            .field("Endorsed from CN", &header.endorsed_from_cn)
            .field("Shift CN", &header.shift_cn)
            .field("Next CN", &header.next_cn),
        PrintSection::titled("Manpower")
            .field("No. of staff", &manpower.no_staff)
            .field("Orientee", &manpower.orientee)
            .field("Pull-out staff", &manpower.pull_out_staff)
            .field("RC ICU staff", &manpower.rc_icu_staff)
            .field("Float to ICU staff", &manpower.float_to_icu_staff)
            .field("On call", &manpower.on_call),
        PrintSection::titled("Census")
            .field("Active cases", &census.active_cases)
            .field("Admission", &census.admission)
            .field("Discharge", &census.discharge)
            .field("Transfer out", &census.transfer_out)
            .field("DAMA", &census.dama)
            .field("Death", &census.death),
    ];

    let unit_rows = UnitItem::ALL
        .iter()
        .map(|item| {
            let entry = item.get(&report.unit_handover);
            vec![
                item.label().to_string(),
                if entry.checked { "[x]" } else { "[ ]" }.to_string(),
                entry.note.clone(),
            ]
        })
        .collect();
    sections.push(PrintSection::titled("ICU Unit Handover").table(
        "Checklist",
        &["Item", "Done", "Note"],
        unit_rows,
    ));

    sections.extend(report.cases.iter().map(render_case));

    PrintRegion {
        title: "ICU SHIFT REPORT".to_string(),
        sections,
    }
}

fn render_case(case: &Case) -> PrintSection {
    let vitals = &case.vitals;
    let mut section = PrintSection::titled(format!("Case {}", case.case_number))
        .field("Patient", &case.patient_name)
        .field("MRN", &case.mrn)
        .field("ICU room", &case.icu_room)
        .field("Age", &case.age)
        .field("Gender", case.gender.label())
        .field("Nationality", &case.nationality)
        .field("Admission date", &case.admission_date)
        .field("Time of admission", &case.time_of_admission)
        .field("Financial category", &case.financial_category)
        .field("Consultant", &case.consultant)
        .field("Chief complaint", &case.chief_complaint)
        .field("Diagnosis", &case.diagnosis)
        .field("Allergies", &case.allergies)
        .field("Outgoing nurse", &case.outgoing_nurse)
        .field("Incoming nurse", &case.incoming_nurse)
        .field("Shift date", &case.shift_date)
        .field("Shift time", &case.shift_time)
        .field("Temperature", &vitals.temperature)
        .field("Blood pressure", &vitals.blood_pressure)
        .field("Heart rate", &vitals.heart_rate)
        .field("Respiratory rate", &vitals.respiratory_rate)
        .field("SpO2", &vitals.oxygen_saturation)
        .field("Pain score", &vitals.pain_score)
        .field("Consciousness", case.consciousness.label())
        .field("Mobility", case.mobility.label())
        .field("Skin condition", &case.skin_condition)
        .field("Diet", &case.diet)
        .field("Scheduled tasks", &case.scheduled_tasks);

    let anticoagulant = &case.anticoagulant;
    section = section.field("Anticoagulant", anticoagulant.kind.label());
    section = match anticoagulant.kind {
        AnticoagulantType::Pharmacological => section
            .field("Anticoagulant medication", &anticoagulant.medication)
            .field("Anticoagulant dose", &anticoagulant.dose)
            .field("Anticoagulant frequency", &anticoagulant.frequency),
        AnticoagulantType::NonPharmacological => {
            section.field("Anticoagulant device", &anticoagulant.device)
        }
        AnticoagulantType::Unset => section,
    };

    let ventilation = &case.ventilation;
    section = section.field(
        "Mechanical ventilation",
        if ventilation.connected { "Yes" } else { "No" },
    );
    if ventilation.connected {
        section = section
            .field("Mode", &ventilation.mode)
            .field("FiO2", &ventilation.fio2)
            .field("PEEP", &ventilation.peep)
            .field("Tidal volume", &ventilation.tidal_volume)
            .field("Rate", &ventilation.rate)
            .field("Pressure support", &ventilation.pressure_support);
    }

    section
        .table(
            "Lines / Attachments",
            &["Type", "Inserted", "Site", "Size", "Removal", "By"],
            case.lines
                .iter()
                .map(|r| {
                    vec![
                        r.line_type.clone(),
                        r.insertion_date.clone(),
                        r.insertion_site.clone(),
                        r.size.clone(),
                        r.removal_date.clone(),
                        r.inserted_by.clone(),
                    ]
                })
                .collect(),
        )
        .table(
            "Infusions",
            &["Medication", "Dose / Dilution", "Rate"],
            case.infusions
                .iter()
                .map(|r| vec![r.medication.clone(), r.dose_dilution.clone(), r.rate.clone()])
                .collect(),
        )
        .table(
            "Antibiotics",
            &["Name", "Dose", "Frequency", "Start", "End"],
            case.antibiotics
                .iter()
                .map(|r| {
                    vec![
                        r.name.clone(),
                        r.dose.clone(),
                        r.frequency.clone(),
                        r.start_date.clone(),
                        r.end_date.clone(),
                    ]
                })
                .collect(),
        )
        .table(
            "High-Alert Medications",
            &["Name", "Dose", "Frequency", "Route", "Start date", "Start time"],
            case.high_alert_medications
                .iter()
                .map(|r| {
                    vec![
                        r.name.clone(),
                        r.dose.clone(),
                        r.frequency.clone(),
                        r.route.clone(),
                        r.start_date.clone(),
                        r.start_time.clone(),
                    ]
                })
                .collect(),
        )
        .table(
            "Cultures",
            &["Collected", "Type", "Isolation", "Result date", "Results", "Action"],
            case.cultures
                .iter()
                .map(|r| {
                    vec![
                        r.date_collected.clone(),
                        r.culture_type.clone(),
                        r.isolation_precaution.clone(),
                        r.date_result_received.clone(),
                        r.results.clone(),
                        r.action_taken.clone(),
                    ]
                })
                .collect(),
        )
        .note("Last updates", &case.last_updates)
        .note("Plans", &case.plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(section: &PrintSection) -> Vec<&str> {
        section.fields.iter().map(|f| f.label.as_str()).collect()
    }

    #[test]
    fn test_region_has_singletons_then_one_section_per_case() {
        let mut report = ReportData::new();
        report.cases.push(Case::new(2));

        let region = render_report(&report);

        let titles: Vec<_> = region.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Shift", "Manpower", "Census", "ICU Unit Handover", "Case 1", "Case 2"]
        );
    }

    #[test]
    fn test_case_tables_follow_row_counts() {
        let mut report = ReportData::new();
        report.cases[0].infusions.push_empty();

        let region = render_report(&report);
        let case = region.section("Case 1").unwrap();

        let infusions = case.tables.iter().find(|t| t.title == "Infusions").unwrap();
        assert_eq!(infusions.rows.len(), 2);
        assert_eq!(case.tables.len(), 5);
    }

    #[test]
    fn test_anticoagulant_fields_follow_selected_type() {
        let mut report = ReportData::new();
        report.cases[0].anticoagulant.kind = AnticoagulantType::NonPharmacological;

        let region = render_report(&report);
        let fields = labels(region.section("Case 1").unwrap());

        assert!(fields.contains(&"Anticoagulant device"));
        assert!(!fields.contains(&"Anticoagulant medication"));
    }

    #[test]
    fn test_ventilation_settings_only_when_connected() {
        let mut report = ReportData::new();
        let region = render_report(&report);
        assert!(!labels(region.section("Case 1").unwrap()).contains(&"PEEP"));

        report.cases[0].ventilation.connected = true;
        report.cases[0].ventilation.peep = "5".into();
        let region = render_report(&report);
        let case = region.section("Case 1").unwrap();
        let peep = case.fields.iter().find(|f| f.label == "PEEP").unwrap();
        assert_eq!(peep.value, "5");
    }

    #[test]
    fn test_lines_indent_narrative_rows() {
        let mut report = ReportData::new();
        report.cases[0].plans = "• wean FiO2\n• repeat ABG".into();

        let lines = render_report(&report).lines();

        assert_eq!(lines[0], "ICU SHIFT REPORT");
        assert!(lines.contains(&"    • wean FiO2".to_string()));
        assert!(lines.contains(&"    • repeat ABG".to_string()));
    }
}
