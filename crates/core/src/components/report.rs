//! Report-level singleton records and the full report payload.
//!
//! `ReportData` is exactly what gets persisted as the opaque `report_data` blob, so its wire
//! shape (camelCase keys, empty string for unset enums) must stay stable.

use crate::components::case::Case;
use crate::error::HandoverError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[default]
    #[serde(rename = "")]
    Unset,
    Day,
    Night,
}

impl Shift {
    pub fn label(self) -> &'static str {
        match self {
            Shift::Unset => "",
            Shift::Day => "Day",
            Shift::Night => "Night",
        }
    }
}

impl FromStr for Shift {
    type Err = HandoverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Shift::Unset),
            "Day" => Ok(Shift::Day),
            "Night" => Ok(Shift::Night),
            other => Err(HandoverError::InvalidInput(format!(
                "unknown shift: '{}'",
                other
            ))),
        }
    }
}

/// Report date, shift and the charge nurses handing over.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportHeader {
    pub date: String,
    pub shift: Shift,
    #[serde(rename = "endorsedFromCN")]
    pub endorsed_from_cn: String,
    #[serde(rename = "shiftCN")]
    pub shift_cn: String,
    #[serde(rename = "nextCN")]
    pub next_cn: String,
}

/// Nursing manpower counters for the shift.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Manpower {
    pub no_staff: String,
    pub orientee: String,
    pub pull_out_staff: String,
    pub rc_icu_staff: String,
    pub float_to_icu_staff: String,
    pub on_call: String,
}

/// Unit census counters for the shift.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Census {
    pub active_cases: String,
    pub admission: String,
    pub discharge: String,
    pub transfer_out: String,
    pub dama: String,
    pub death: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitHandoverItem {
    pub checked: bool,
    pub note: String,
}

/// Unit-level handover checklist.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitHandover {
    /// Narcotics (number of empties only).
    pub narcotic: UnitHandoverItem,
    pub biomedical_maintenance: UnitHandoverItem,
    pub general_maintenance: UnitHandoverItem,
    pub stock: UnitHandoverItem,
    pub it: UnitHandoverItem,
    pub others: UnitHandoverItem,
}

/// The complete shift report: singletons plus the ordered case list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportData {
    pub header: ReportHeader,
    pub manpower: Manpower,
    pub census: Census,
    pub unit_handover: UnitHandover,
    pub cases: Vec<Case>,
}

impl ReportData {
    /// A fresh report holding one empty case numbered 1.
    pub fn new() -> Self {
        Self {
            header: ReportHeader::default(),
            manpower: Manpower::default(),
            census: Census::default(),
            unit_handover: UnitHandover::default(),
            cases: vec![Case::new(1)],
        }
    }
}

impl Default for ReportData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report_has_single_blank_case() {
        let report = ReportData::new();

        assert_eq!(report.cases.len(), 1);
        assert_eq!(report.cases[0].case_number, 1);
        assert!(report.cases[0].is_blank());
        assert_eq!(report.manpower, Manpower::default());
        assert_eq!(report.census, Census::default());
    }

    #[test]
    fn test_header_uses_charge_nurse_wire_names() {
        let header = ReportHeader {
            shift: Shift::Night,
            shift_cn: "R. Santos".into(),
            ..ReportHeader::default()
        };

        let json = serde_json::to_value(&header).unwrap();

        assert_eq!(json["shift"], "Night");
        assert_eq!(json["shiftCN"], "R. Santos");
        assert!(json.get("endorsedFromCN").is_some());
    }

    #[test]
    fn test_report_payload_parses_from_json() {
        let json = serde_json::json!({
            "manpower": { "noStaff": "12", "onCall": "1" },
            "census": { "activeCases": "9", "dama": "0" },
            "cases": [{ "id": "00112233445566778899aabbccddeeff", "caseNumber": 1 }]
        });

        let report: ReportData = serde_json::from_value(json).unwrap();

        assert_eq!(report.manpower.no_staff, "12");
        assert_eq!(report.manpower.on_call, "1");
        assert_eq!(report.census.active_cases, "9");
        assert_eq!(report.cases.len(), 1);
        assert_eq!(report.header.shift, Shift::Unset);
    }
}
