use std::collections::BTreeMap;

use crate::knowledge::{Aggravator, ChronicConditionRule, KnowledgeBase};
use crate::models::{PatientSnapshot, RiskLevel, Species};

use super::helpers::{normalize_name, resolve_species};
use super::types::{EngineError, RiskAssessment, RiskFactor};

const AGE_CAP: f64 = 25.0;
const AGE_POINTS_PER_YEAR: f64 = 5.0;

const WEIGHT_CAP: f64 = 20.0;
const WEIGHT_POINTS_PER_DEVIATION: f64 = 50.0;

const CHRONIC_CAP: f64 = 35.0;

const AGGRAVATOR_CAP: f64 = 15.0;
const AGGRAVATOR_POINTS: f64 = 5.0;

const HISTORY_CAP: f64 = 20.0;
const HISTORY_POINTS_PER_REPEAT: f64 = 5.0;
/// Look-back window for recurring diagnoses, in days before `as_of`.
pub const HISTORY_WINDOW_DAYS: i64 = 365;

/// Whether the patient has reached the senior threshold for its species/breed.
pub fn is_senior(kb: &KnowledgeBase, species: Species, breed: &str, age_years: f64) -> bool {
    kb.senior_threshold(species, breed)
        .map_or(false, |threshold| age_years >= threshold)
}

/// Score a patient's overall health risk.
///
/// The score is the sum of independently capped factors (age, weight,
/// chronic conditions, condition aggravators, recurring diagnoses), rounded
/// and clamped to [0, 100].
pub fn assess_risk(
    kb: &KnowledgeBase,
    patient: &PatientSnapshot,
) -> Result<RiskAssessment, EngineError> {
    validate_patient(patient)?;
    if let Some(weight) = patient.weight_kg {
        if !weight.is_finite() || weight < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "weight must be a non-negative number, got {weight}"
            )));
        }
    }

    let (species, notes) = resolve_species(&patient.species);
    let age = patient.age_years();
    let senior = is_senior(kb, species, &patient.breed, age);

    let mut factors = Vec::new();

    // Age
    if let Some(threshold) = kb.senior_threshold(species, &patient.breed) {
        if age > threshold {
            let contribution = (AGE_POINTS_PER_YEAR * (age - threshold)).min(AGE_CAP);
            factors.push(factor("Senior age", contribution, AGE_CAP));
        }
    }

    // Weight
    let mut overweight = false;
    if let (Some(weight), Some(band)) = (patient.weight_kg, kb.weight_band(species, &patient.breed))
    {
        if weight > band.max_kg {
            overweight = true;
            let deviation = (weight - band.max_kg) / band.max_kg;
            let contribution = (WEIGHT_POINTS_PER_DEVIATION * deviation).min(WEIGHT_CAP);
            factors.push(factor("Overweight", contribution, WEIGHT_CAP));
        } else if weight < band.min_kg {
            let deviation = (band.min_kg - weight) / band.min_kg;
            let contribution = (WEIGHT_POINTS_PER_DEVIATION * deviation).min(WEIGHT_CAP);
            factors.push(factor("Underweight", contribution, WEIGHT_CAP));
        }
    }

    // Chronic conditions and their aggravators
    let conditions = recognized_conditions(kb, patient);
    let chronic = chronic_contribution(&conditions);
    factors.push(factor("Chronic conditions", chronic, CHRONIC_CAP));

    let breed = normalize_name(&patient.breed);
    let aggravator_count = conditions
        .iter()
        .flat_map(|rule| rule.aggravators.iter().map(move |a| (rule, *a)))
        .filter(|(rule, aggravator)| match aggravator {
            Aggravator::Obesity => overweight,
            Aggravator::SeniorAge => senior,
            Aggravator::BreedPredisposition => {
                !breed.is_empty() && rule.predisposed_breeds.contains(&breed)
            }
        })
        .count();
    let aggravation = (AGGRAVATOR_POINTS * aggravator_count as f64).min(AGGRAVATOR_CAP);
    factors.push(factor("Condition aggravators", aggravation, AGGRAVATOR_CAP));

    // Recurring diagnoses
    let repeats = recent_repeat_count(patient);
    let recurrence = (HISTORY_POINTS_PER_REPEAT * repeats as f64).min(HISTORY_CAP);
    factors.push(factor("Recurring diagnoses", recurrence, HISTORY_CAP));

    factors.retain(|f| f.contribution > 0.0);
    factors.sort_by(|a, b| {
        b.contribution
            .total_cmp(&a.contribution)
            .then_with(|| a.name.cmp(&b.name))
    });

    let total: f64 = factors.iter().map(|f| f.contribution).sum();
    let score = total.round().clamp(0.0, 100.0) as u8;
    let level = RiskLevel::from_score(score);

    tracing::debug!(
        species = %species,
        factors = factors.len(),
        total,
        score,
        "Risk assessment computed"
    );

    Ok(RiskAssessment {
        score,
        level,
        factors,
        notes,
    })
}

/// Reject snapshots whose birth date lies after the reference date.
pub(crate) fn validate_patient(patient: &PatientSnapshot) -> Result<(), EngineError> {
    if patient.date_of_birth > patient.as_of {
        return Err(EngineError::InvalidInput(format!(
            "date of birth {} is after the reference date {}",
            patient.date_of_birth, patient.as_of
        )));
    }
    Ok(())
}

fn factor(name: &str, contribution: f64, cap: f64) -> RiskFactor {
    RiskFactor {
        name: name.into(),
        severity: RiskLevel::from_share(contribution, cap),
        contribution,
    }
}

/// Chronic-condition rules matching the patient's conditions, one per rule,
/// heaviest first.
fn recognized_conditions<'a>(
    kb: &'a KnowledgeBase,
    patient: &PatientSnapshot,
) -> Vec<&'a ChronicConditionRule> {
    let unique: BTreeMap<&str, &ChronicConditionRule> = patient
        .chronic_conditions
        .iter()
        .filter_map(|name| kb.chronic_condition(name))
        .map(|rule| (rule.name.as_str(), rule))
        .collect();
    let mut rules: Vec<_> = unique.into_values().collect();
    rules.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.name.cmp(&b.name)));
    rules
}

/// Fixed weights applied heaviest first; the last one is truncated at the cap.
fn chronic_contribution(rules: &[&ChronicConditionRule]) -> f64 {
    rules.iter().fold(0.0, |total: f64, rule| {
        total + rule.weight.min(CHRONIC_CAP - total).max(0.0)
    })
}

/// Extra occurrences of diagnoses recorded more than once in the window.
fn recent_repeat_count(patient: &PatientSnapshot) -> usize {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in &patient.medical_history {
        let age_days = (patient.as_of - entry.date).num_days();
        if !(0..=HISTORY_WINDOW_DAYS).contains(&age_days) {
            continue;
        }
        let key = normalize_name(&entry.diagnosis);
        if key.is_empty() {
            continue;
        }
        *counts.entry(key).or_default() += 1;
    }
    counts.values().filter(|&&n| n >= 2).map(|n| n - 1).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::types::EngineNote;
    use crate::models::HistoryEntry;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn patient(species: &str, breed: &str, dob: NaiveDate, weight: Option<f64>) -> PatientSnapshot {
        PatientSnapshot {
            species: species.into(),
            breed: breed.into(),
            date_of_birth: dob,
            weight_kg: weight,
            chronic_conditions: Default::default(),
            medical_history: vec![],
            care_events: vec![],
            created_on: date(2020, 1, 1),
            as_of: date(2026, 3, 1),
        }
    }

    fn visit(d: NaiveDate, diagnosis: &str) -> HistoryEntry {
        HistoryEntry {
            date: d,
            diagnosis: diagnosis.into(),
            notes: String::new(),
        }
    }

    fn contribution(assessment: &RiskAssessment, name: &str) -> f64 {
        assessment
            .factors
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.contribution)
            .unwrap_or(0.0)
    }

    #[test]
    fn senior_overweight_diabetic_labrador_is_high() {
        let mut p = patient("dog", "Labrador Retriever", date(2014, 3, 1), Some(50.4));
        p.chronic_conditions.insert("Diabetes".into());
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();

        assert!((contribution(&r, "Senior age") - 25.0).abs() < 1e-9);
        assert!((contribution(&r, "Overweight") - 20.0).abs() < 1e-6);
        assert_eq!(contribution(&r, "Chronic conditions"), 15.0);
        // Obesity and senior age aggravate diabetes; labradors are not predisposed.
        assert_eq!(contribution(&r, "Condition aggravators"), 10.0);
        assert_eq!(r.score, 70);
        assert_eq!(r.level, RiskLevel::High);
    }

    #[test]
    fn young_healthy_dog_has_no_factors() {
        let p = patient("dog", "beagle", date(2023, 3, 1), Some(11.0));
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        assert_eq!(r.score, 0);
        assert_eq!(r.level, RiskLevel::Low);
        assert!(r.factors.is_empty());
    }

    #[test]
    fn weight_on_band_bounds_is_healthy() {
        // Labrador band 25-36 kg, both ends inclusive.
        let kb = KnowledgeBase::builtin();
        for weight in [25.0, 36.0] {
            let p = patient("dog", "Labrador Retriever", date(2023, 3, 1), Some(weight));
            let r = assess_risk(&kb, &p).unwrap();
            assert!(
                r.factors
                    .iter()
                    .all(|f| f.name != "Overweight" && f.name != "Underweight"),
                "{weight} kg"
            );
            assert_eq!(r.score, 0);
        }
    }

    #[test]
    fn underweight_relative_to_lower_bound() {
        // Beagle band 9-14 kg; 7.2 kg is 20% under.
        let p = patient("dog", "beagle", date(2023, 3, 1), Some(7.2));
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        let under = r.factors.iter().find(|f| f.name == "Underweight").unwrap();
        assert!((under.contribution - 10.0).abs() < 1e-6);
        assert_eq!(under.severity, RiskLevel::Medium);
        assert_eq!(r.score, 10);
    }

    #[test]
    fn chronic_conditions_capped_at_35() {
        let mut p = patient("dog", "mixed", date(2022, 3, 1), Some(20.0));
        for c in ["diabetes", "kidney disease", "heart disease"] {
            p.chronic_conditions.insert(c.into());
        }
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        let chronic = r.factors.iter().find(|f| f.name == "Chronic conditions").unwrap();
        assert_eq!(chronic.contribution, 35.0);
        assert_eq!(chronic.severity, RiskLevel::High);
        assert_eq!(r.score, 35);
        assert_eq!(r.level, RiskLevel::Medium);
    }

    #[test]
    fn aliases_count_once_and_unknown_conditions_ignored() {
        let mut p = patient("cat", "", date(2022, 3, 1), Some(4.0));
        p.chronic_conditions.insert("Diabetes Mellitus".into());
        p.chronic_conditions.insert("diabetes".into());
        p.chronic_conditions.insert("broken nail".into());
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        assert_eq!(contribution(&r, "Chronic conditions"), 15.0);
    }

    #[test]
    fn breed_predisposition_aggravates() {
        let mut p = patient("dog", "German Shepherd", date(2022, 3, 1), Some(30.0));
        p.chronic_conditions.insert("hip_dysplasia".into());
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        assert_eq!(contribution(&r, "Condition aggravators"), 5.0);
    }

    #[test]
    fn recurring_diagnoses_within_window() {
        let mut p = patient("dog", "mixed", date(2022, 3, 1), Some(20.0));
        p.medical_history = vec![
            visit(date(2025, 5, 1), "Otitis"),
            visit(date(2025, 9, 1), "otitis"),
            visit(date(2026, 2, 1), "Otitis "),
            // Outside the window or after the reference date.
            visit(date(2024, 12, 1), "Otitis"),
            visit(date(2026, 4, 1), "Otitis"),
            visit(date(2025, 6, 1), "Dermatitis"),
        ];
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        assert_eq!(contribution(&r, "Recurring diagnoses"), 10.0);
    }

    #[test]
    fn score_clamped_to_100() {
        let mut p = patient("dog", "great dane", date(2011, 3, 1), Some(120.0));
        for c in ["diabetes", "kidney disease", "heart disease", "hip dysplasia"] {
            p.chronic_conditions.insert(c.into());
        }
        p.medical_history = (1..=5)
            .map(|m| visit(date(2025, m * 2, 1), "lameness"))
            .collect();
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        assert_eq!(r.score, 100);
        assert_eq!(r.level, RiskLevel::High);
        let total: f64 = r.factors.iter().map(|f| f.contribution).sum();
        assert!(total > 100.0);
    }

    #[test]
    fn factors_sorted_by_contribution() {
        let mut p = patient("dog", "Labrador Retriever", date(2014, 3, 1), Some(40.0));
        p.chronic_conditions.insert("arthritis".into());
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        for pair in r.factors.windows(2) {
            assert!(pair[0].contribution >= pair[1].contribution);
        }
    }

    #[test]
    fn unrecognized_species_uses_generic_rules() {
        let p = patient("hamster", "", date(2015, 3, 1), Some(0.1));
        let r = assess_risk(&KnowledgeBase::builtin(), &p).unwrap();
        assert_eq!(
            r.notes,
            vec![EngineNote::UnrecognizedSpecies {
                provided: "hamster".into()
            }]
        );
        // No weight band for generic species; age threshold 8.
        assert_eq!(contribution(&r, "Overweight"), 0.0);
        assert_eq!(contribution(&r, "Underweight"), 0.0);
        assert!(contribution(&r, "Senior age") > 0.0);
    }

    #[test]
    fn birth_after_reference_date_rejected() {
        let p = patient("dog", "", date(2027, 1, 1), None);
        let err = assess_risk(&KnowledgeBase::builtin(), &p).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn invalid_weight_rejected() {
        let kb = KnowledgeBase::builtin();
        for w in [-1.0, f64::NAN, f64::INFINITY] {
            let p = patient("dog", "", date(2020, 1, 1), Some(w));
            assert!(matches!(
                assess_risk(&kb, &p),
                Err(EngineError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn senior_threshold_is_inclusive() {
        let kb = KnowledgeBase::builtin();
        assert!(is_senior(&kb, Species::Dog, "great dane", 5.0));
        assert!(!is_senior(&kb, Species::Dog, "mixed", 6.9));
    }
}
