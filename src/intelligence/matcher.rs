use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::knowledge::KnowledgeBase;

use super::helpers::{any_contains_phrase, normalize_symptoms, resolve_species};
use super::types::{AnalysisResult, ConditionMatch, EngineError};
use super::urgency::{classify_urgency, emergency_keyword_hits};

/// Maximum number of candidates returned.
pub const MAX_CANDIDATES: usize = 5;

/// Candidates below this confidence do not contribute diagnostic tests.
pub const TEST_CONFIDENCE_FLOOR: f64 = 0.3;

/// Rank candidate conditions for free-text symptoms.
///
/// Each symptom line is normalized, then every pattern applicable to the
/// resolved species is scored as `base_confidence * overlap / keyword count`
/// where `overlap` counts the pattern keywords found in the symptoms.
/// Patterns sharing a condition name are merged (highest confidence, union of
/// matched keywords). Candidates are sorted by confidence descending then
/// name ascending and truncated to [`MAX_CANDIDATES`].
pub fn analyze<S: AsRef<str>>(
    kb: &KnowledgeBase,
    species: &str,
    symptom_lines: &[S],
) -> Result<AnalysisResult, EngineError> {
    let symptoms = normalize_symptoms(symptom_lines);
    if symptoms.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one non-empty symptom is required".into(),
        ));
    }

    let (species, notes) = resolve_species(species);

    let mut by_condition: BTreeMap<String, ConditionMatch> = BTreeMap::new();
    let mut emergency_pattern_matched = false;

    for pattern in kb.patterns_for(species) {
        let matched: BTreeSet<String> = pattern
            .keywords
            .iter()
            .filter(|kw| any_contains_phrase(&symptoms, kw))
            .cloned()
            .collect();
        if matched.is_empty() {
            continue;
        }

        let overlap = matched.len() as f64;
        let confidence =
            (pattern.base_confidence * overlap / pattern.keywords.len() as f64).clamp(0.0, 1.0);
        emergency_pattern_matched |= pattern.emergency;

        match by_condition.entry(pattern.condition_name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(ConditionMatch {
                    condition_name: pattern.condition_name.clone(),
                    confidence,
                    matched_keywords: matched,
                });
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.confidence = existing.confidence.max(confidence);
                existing.matched_keywords.extend(matched);
            }
        }
    }

    let mut candidates: Vec<ConditionMatch> = by_condition.into_values().collect();
    candidates.sort_by(compare_candidates);
    candidates.truncate(MAX_CANDIDATES);

    let emergency_keywords = emergency_keyword_hits(kb, &symptoms);
    let urgency = classify_urgency(&candidates, emergency_pattern_matched, &emergency_keywords);

    let recommended_tests: BTreeSet<String> = candidates
        .iter()
        .filter(|c| c.confidence >= TEST_CONFIDENCE_FLOOR)
        .flat_map(|c| kb.tests_for(&c.condition_name).iter().cloned())
        .collect();

    tracing::debug!(
        species = %species,
        symptoms = symptoms.len(),
        candidates = candidates.len(),
        emergency_hits = emergency_keywords.len(),
        urgency = %urgency,
        "Symptom analysis complete"
    );

    Ok(AnalysisResult {
        urgency,
        candidates,
        recommended_tests,
        emergency_keywords,
        notes,
    })
}

/// Confidence descending, then condition name ascending.
fn compare_candidates(a: &ConditionMatch, b: &ConditionMatch) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| a.condition_name.cmp(&b.condition_name))
}
