use std::collections::BTreeSet;

use crate::knowledge::KnowledgeBase;
use crate::models::Urgency;

use super::helpers::any_contains_phrase;
use super::types::ConditionMatch;

/// Top candidate confidence at or above which a case is at least Urgent.
pub const URGENT_CONFIDENCE: f64 = 0.6;

/// KB emergency keywords present in the normalized symptoms.
pub fn emergency_keyword_hits(kb: &KnowledgeBase, symptoms: &BTreeSet<String>) -> BTreeSet<String> {
    kb.emergency_keywords
        .iter()
        .filter(|kw| any_contains_phrase(symptoms, kw))
        .cloned()
        .collect()
}

/// Classify the triage tier.
///
/// Emergency wins outright when an emergency pattern contributed to the
/// match or when any emergency keyword was found. Otherwise the confidence
/// of the best candidate decides between Urgent and Routine.
pub fn classify_urgency(
    candidates: &[ConditionMatch],
    emergency_pattern_matched: bool,
    emergency_hits: &BTreeSet<String>,
) -> Urgency {
    if emergency_pattern_matched || !emergency_hits.is_empty() {
        return Urgency::Emergency;
    }
    let top = candidates
        .iter()
        .map(|c| c.confidence)
        .fold(0.0_f64, f64::max);
    if top >= URGENT_CONFIDENCE {
        Urgency::Urgent
    } else {
        Urgency::Routine
    }
}
