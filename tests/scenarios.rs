//! End-to-end scenarios through the public engine API.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;

use vetcare_lib::intelligence::{EngineNote, TriageResult};
use vetcare_lib::models::{
    CareCategory, CareEvent, HistoricalSnapshot, OverallVitalStatus, PatientSnapshot, RiskLevel,
    Trend, Urgency,
};
use vetcare_lib::{DecisionSupportEngine, DefaultDecisionEngine, EngineError, KnowledgeBase};

fn engine() -> DefaultDecisionEngine {
    vetcare_lib::init_tracing();
    DefaultDecisionEngine::builtin()
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn labrador() -> PatientSnapshot {
    PatientSnapshot {
        species: "Dog".into(),
        breed: "Labrador Retriever".into(),
        date_of_birth: date(2014, 3, 1),
        weight_kg: Some(50.4),
        chronic_conditions: BTreeSet::from(["diabetes".to_string()]),
        medical_history: vec![],
        care_events: vec![CareEvent {
            kind: CareCategory::Vaccination,
            date: date(2025, 6, 1),
        }],
        created_on: date(2014, 5, 1),
        as_of: date(2026, 3, 1),
    }
}

#[test]
fn dog_gastrointestinal_case_is_urgent() {
    let result = engine()
        .analyze("dog", &lines(&["vomiting", "lethargy", "not eating"]))
        .unwrap();
    assert_eq!(result.urgency, Urgency::Urgent);
    assert!(result.candidates[0].confidence > 0.0);
    assert!(!result.recommended_tests.is_empty());
}

#[test]
fn cat_respiratory_collapse_is_emergency() {
    let result = engine()
        .analyze("cat", &lines(&["difficulty breathing", "collapse"]))
        .unwrap();
    assert_eq!(result.urgency, Urgency::Emergency);
}

#[test]
fn every_emergency_keyword_forces_emergency() {
    let engine = engine();
    for keyword in &engine.knowledge_base().emergency_keywords {
        for species in ["dog", "cat", "bird", "rabbit", "iguana"] {
            let symptom = format!("owner reports {keyword} today");
            let result = engine.analyze(species, &[symptom]).unwrap();
            assert_eq!(result.urgency, Urgency::Emergency, "{species}: {keyword}");
        }
    }
}

#[test]
fn candidate_lists_are_bounded_and_ordered() {
    let engine = engine();
    let symptom_sets: [&[&str]; 4] = [
        &["vomiting", "diarrhea", "not eating", "lethargy", "fever"],
        &["sneezing", "nasal discharge", "coughing", "wheezing"],
        &["limping", "stiffness", "difficulty rising", "pain"],
        &["excessive thirst", "frequent urination", "weight loss", "bad breath"],
    ];
    for species in ["dog", "cat", "bird", "rabbit", "other"] {
        for symptoms in symptom_sets {
            let result = engine.analyze(species, &lines(symptoms)).unwrap();
            assert!(result.candidates.len() <= 5);
            for pair in result.candidates.windows(2) {
                assert!(
                    pair[0].confidence > pair[1].confidence
                        || (pair[0].confidence == pair[1].confidence
                            && pair[0].condition_name < pair[1].condition_name)
                );
            }
        }
    }
}

#[test]
fn senior_overweight_diabetic_is_high_risk() {
    let risk = engine().assess_risk(&labrador()).unwrap();
    assert_eq!(risk.level, RiskLevel::High);
    let names: Vec<_> = risk.factors.iter().map(|f| f.name.as_str()).collect();
    for expected in ["Senior age", "Overweight", "Chronic conditions"] {
        assert!(names.contains(&expected), "missing {expected}");
    }
    assert!(risk.factors.iter().all(|f| f.contribution > 0.0));
}

#[test]
fn risk_score_stays_in_bounds() {
    let engine = engine();
    let mut patient = labrador();
    for weight in [0.0, 2.0, 36.0, 80.0, 500.0] {
        patient.weight_kg = Some(weight);
        let risk = engine.assess_risk(&patient).unwrap();
        assert!(risk.score <= 100);
        assert_eq!(risk.level, RiskLevel::from_score(risk.score));
    }
}

#[test]
fn care_plan_is_idempotent_and_sorted() {
    let engine = engine();
    let patient = labrador();
    let first = engine.plan_care(&patient).unwrap();
    let second = engine.plan_care(&patient).unwrap();
    assert_eq!(first, second);
    assert!(first
        .items
        .windows(2)
        .all(|pair| pair[0].due_date <= pair[1].due_date));
    assert!(first
        .items
        .iter()
        .any(|item| item.action == "Semi-annual senior wellness exam"));
}

#[test]
fn short_history_yields_insufficient_data() {
    let engine = engine();
    let history: Vec<HistoricalSnapshot> = (1..=2)
        .map(|m| HistoricalSnapshot {
            recorded_on: date(2025, m, 1),
            weight_kg: Some(10.0 + m as f64),
            condition_notes: BTreeMap::new(),
        })
        .collect();
    for n in 0..=history.len() {
        let summary = engine.predict_trends(&history[..n]);
        assert_eq!(summary.weight_trend, Trend::InsufficientData);
        assert_eq!(summary.visit_frequency_trend, Trend::InsufficientData);
    }
}

#[test]
fn out_of_range_vital_sees_patient_immediately() {
    let vitals = BTreeMap::from([("heart_rate".to_string(), 220.0)]);
    let result: TriageResult = engine()
        .triage("dog", &lines(&["mild itching"]), &vitals)
        .unwrap();
    assert_eq!(result.urgency, Urgency::Routine);
    assert_eq!(result.recommended_action, "See immediately");
    assert_eq!(result.priority_score, 25.0);
}

#[test]
fn unrecognized_species_is_noted_not_rejected() {
    let result = engine().analyze("axolotl", &lines(&["vomiting"])).unwrap();
    assert_eq!(
        result.notes,
        vec![EngineNote::UnrecognizedSpecies {
            provided: "axolotl".into()
        }]
    );
}

#[test]
fn empty_symptoms_are_invalid_input() {
    let err = engine().analyze("dog", &lines(&["", "   "])).unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[test]
fn knowledge_base_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowledge_base.json");
    std::fs::write(
        &path,
        serde_json::to_string_pretty(&KnowledgeBase::builtin()).unwrap(),
    )
    .unwrap();

    let kb = KnowledgeBase::load(&path).unwrap();
    let engine = DefaultDecisionEngine::new(Arc::new(kb));
    let result = engine
        .analyze("dog", &lines(&["vomiting", "lethargy", "not eating"]))
        .unwrap();
    assert_eq!(result.urgency, Urgency::Urgent);
}

#[test]
fn results_serialize_for_callers() {
    let result = engine()
        .analyze("cat", &lines(&["difficulty breathing"]))
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["urgency"], "Emergency");
    assert!(json["emergency_keywords"]
        .as_array()
        .unwrap()
        .iter()
        .any(|k| k == "difficulty breathing"));
}

#[test]
fn lab_tests_ranked_by_margin_for_query() {
    let selected = engine().select_lab_tests("kidney urinary", 5);
    assert!(!selected.is_empty() && selected.len() <= 5);
    assert!(selected
        .windows(2)
        .all(|pair| pair[0].profit_margin >= pair[1].profit_margin));
    assert!(selected.iter().any(|t| t.name == "SDMA"));
    assert!(engine().select_lab_tests("  ", 5).is_empty());
}

#[test]
fn two_abnormal_vitals_are_critical() {
    let vitals = BTreeMap::from([
        ("hr".to_string(), 220.0),
        ("temp".to_string(), 99.0),
    ]);
    let result = engine()
        .triage("dog", &lines(&["mild itching"]), &vitals)
        .unwrap();
    assert_eq!(result.abnormal_count, 2);
    assert_eq!(result.vital_status, OverallVitalStatus::Critical);
}
