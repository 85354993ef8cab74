use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::CareCategory;

/// Summary of one past visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub diagnosis: String,
    #[serde(default)]
    pub notes: String,
}

/// A recorded preventive-care event (vaccination, dental cleaning, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareEvent {
    pub kind: CareCategory,
    pub date: NaiveDate,
}

/// Patient attributes consumed by the risk scorer and the care planner.
///
/// `as_of` is the date the snapshot was taken. Age and history recency are
/// measured against it so that every computation stays a pure function of
/// its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSnapshot {
    pub species: String,
    #[serde(default)]
    pub breed: String,
    pub date_of_birth: NaiveDate,
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub chronic_conditions: BTreeSet<String>,
    #[serde(default)]
    pub medical_history: Vec<HistoryEntry>,
    #[serde(default)]
    pub care_events: Vec<CareEvent>,
    pub created_on: NaiveDate,
    pub as_of: NaiveDate,
}

impl PatientSnapshot {
    /// Age in years at `as_of`. Negative when the birth date lies after it.
    pub fn age_years(&self) -> f64 {
        (self.as_of - self.date_of_birth).num_days() as f64 / 365.25
    }

    /// Most recent recorded event of the given kind.
    pub fn last_event(&self, kind: CareCategory) -> Option<NaiveDate> {
        self.care_events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.date)
            .max()
    }
}

/// One point of a patient's record sequence, as used by trend prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSnapshot {
    pub recorded_on: NaiveDate,
    pub weight_kg: Option<f64>,
    /// Chronic condition name -> free-text severity note for this visit.
    #[serde(default)]
    pub condition_notes: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> PatientSnapshot {
        PatientSnapshot {
            species: "dog".into(),
            breed: "beagle".into(),
            date_of_birth: date(2014, 3, 1),
            weight_kg: Some(12.0),
            chronic_conditions: BTreeSet::new(),
            medical_history: vec![],
            care_events: vec![
                CareEvent { kind: CareCategory::Vaccination, date: date(2025, 1, 10) },
                CareEvent { kind: CareCategory::Vaccination, date: date(2025, 11, 2) },
                CareEvent { kind: CareCategory::Dental, date: date(2024, 6, 1) },
            ],
            created_on: date(2014, 5, 1),
            as_of: date(2026, 3, 1),
        }
    }

    #[test]
    fn age_in_years() {
        let age = snapshot().age_years();
        assert!((age - 12.0).abs() < 0.01, "age was {age}");
    }

    #[test]
    fn last_event_picks_latest_of_kind() {
        let s = snapshot();
        assert_eq!(s.last_event(CareCategory::Vaccination), Some(date(2025, 11, 2)));
        assert_eq!(s.last_event(CareCategory::Dental), Some(date(2024, 6, 1)));
        assert_eq!(s.last_event(CareCategory::WellnessExam), None);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{
            "species": "cat",
            "date_of_birth": "2020-01-01",
            "weight_kg": null,
            "created_on": "2020-02-01",
            "as_of": "2026-01-01"
        }"#;
        let s: PatientSnapshot = serde_json::from_str(json).unwrap();
        assert!(s.breed.is_empty());
        assert!(s.chronic_conditions.is_empty());
        assert!(s.medical_history.is_empty());
    }
}
