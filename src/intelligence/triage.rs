use std::collections::{BTreeMap, BTreeSet};

use crate::knowledge::KnowledgeBase;
use crate::models::{OverallVitalStatus, Species, Urgency, VitalMetric, VitalStatus};

use super::matcher::analyze;
use super::types::{EngineError, TriageResult, VitalAssessment};

/// Priority points added per out-of-range vital sign.
const VITAL_FLAG_POINTS: f64 = 5.0;
const MAX_PRIORITY: f64 = 100.0;

const ACTION_SEE_IMMEDIATELY: &str = "See immediately";

/// Default instruction for each urgency tier when no vital sign is flagged.
pub fn recommended_action(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Emergency => "Immediate emergency care required",
        Urgency::Urgent => "Urgent care needed - schedule within 24 hours",
        Urgency::Routine => "Routine care - schedule at next convenient time",
    }
}

/// Compare each reading with the species range.
///
/// Metric names that are not recognized, or have no range for the species,
/// are skipped. A non-finite reading for a recognized metric is rejected, as
/// are two names for the same metric (`hr` and `heart_rate`).
pub fn assess_vitals(
    kb: &KnowledgeBase,
    species: Species,
    vitals: &BTreeMap<String, f64>,
) -> Result<Vec<VitalAssessment>, EngineError> {
    let mut assessments = Vec::new();
    let mut seen = BTreeSet::new();
    for (name, &value) in vitals {
        let Some(metric) = VitalMetric::from_name(name) else {
            tracing::debug!(metric = %name, "Ignoring unknown vital sign");
            continue;
        };
        if !seen.insert(metric) {
            return Err(EngineError::InvalidInput(format!(
                "vital sign {} given more than once (as {name})",
                metric.as_str()
            )));
        }
        if !value.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "vital sign {name} has a non-finite value"
            )));
        }
        let Some(range) = kb.vital_range(species, metric) else {
            continue;
        };
        let status = if range.contains(value) {
            VitalStatus::Normal
        } else if value < range.min {
            VitalStatus::Low
        } else {
            VitalStatus::High
        };
        assessments.push(VitalAssessment {
            metric,
            value,
            status,
            min: range.min,
            max: range.max,
        });
    }
    assessments.sort_by_key(|a| a.metric);
    Ok(assessments)
}

/// Combine symptom urgency with vital-sign deviation into one priority.
pub fn triage<S: AsRef<str>>(
    kb: &KnowledgeBase,
    species: &str,
    symptom_lines: &[S],
    vitals: &BTreeMap<String, f64>,
) -> Result<TriageResult, EngineError> {
    let analysis = analyze(kb, species, symptom_lines)?;
    // The fallback note was already recorded by the analysis.
    let resolved = Species::resolve(species).species;
    let vital_assessments = assess_vitals(kb, resolved, vitals)?;

    let vital_flags: BTreeSet<String> = vital_assessments
        .iter()
        .filter(|a| a.status != VitalStatus::Normal)
        .map(|a| a.metric.as_str().to_string())
        .collect();

    let abnormal_count = vital_flags.len();
    let vital_status = OverallVitalStatus::from_abnormal_count(abnormal_count);

    let urgency = analysis.urgency;
    let priority_score = (urgency.priority_weight() + VITAL_FLAG_POINTS * vital_flags.len() as f64)
        .min(MAX_PRIORITY);
    let action = if vital_flags.is_empty() {
        recommended_action(urgency)
    } else {
        ACTION_SEE_IMMEDIATELY
    };

    tracing::debug!(
        species = %resolved,
        urgency = %urgency,
        flags = vital_flags.len(),
        priority_score,
        "Triage scored"
    );

    Ok(TriageResult {
        priority_score,
        urgency,
        vital_flags,
        abnormal_count,
        vital_status,
        recommended_action: action.to_string(),
        vital_assessments,
        analysis,
    })
}
