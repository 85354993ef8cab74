use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::Species;

use super::types::EngineNote;

/// Runs of whitespace collapse to a single space during normalization.
static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Lower-case, trim and collapse internal whitespace.
pub fn normalize_phrase(text: &str) -> String {
    RE_WHITESPACE
        .replace_all(text.trim(), " ")
        .to_lowercase()
}

/// Normalize free-text symptom lines into a set, dropping empty lines.
pub fn normalize_symptoms<S: AsRef<str>>(lines: &[S]) -> BTreeSet<String> {
    lines
        .iter()
        .map(|line| normalize_phrase(line.as_ref()))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Canonical key for condition and breed names ("Hip_Dysplasia" -> "hip dysplasia").
pub fn normalize_name(name: &str) -> String {
    normalize_phrase(&name.replace(['_', '-'], " "))
}

/// Whether `needle` occurs in `haystack` as a whole phrase.
///
/// Both inputs are expected to be normalized already. A match must not be
/// glued to a neighbouring alphanumeric character, so "eating" does not
/// match inside "overeating".
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, matched)| {
        let end = start + matched.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// Whether any of the normalized symptoms contains the keyword.
pub fn any_contains_phrase(symptoms: &BTreeSet<String>, keyword: &str) -> bool {
    symptoms.iter().any(|s| contains_phrase(s, keyword))
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Resolve a free-text species, noting (and logging) the generic fallback.
pub fn resolve_species(species: &str) -> (Species, Vec<EngineNote>) {
    let resolution = Species::resolve(species);
    if resolution.recognized {
        return (resolution.species, Vec::new());
    }
    tracing::warn!(
        provided = %resolution.provided,
        "Unrecognized species, falling back to generic rules"
    );
    let note = EngineNote::UnrecognizedSpecies {
        provided: resolution.provided,
    };
    (resolution.species, vec![note])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_phrase("  Difficulty   BREATHING\t"), "difficulty breathing");
    }

    #[test]
    fn normalize_symptoms_drops_empty_and_duplicates() {
        let set = normalize_symptoms(&["Vomiting", "  ", "vomiting ", "", "Lethargy"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("vomiting"));
        assert!(set.contains("lethargy"));
    }

    #[test]
    fn normalize_name_handles_separators() {
        assert_eq!(normalize_name("Hip_Dysplasia"), "hip dysplasia");
        assert_eq!(normalize_name("Labrador-Retriever"), "labrador retriever");
    }

    #[test]
    fn phrase_match_requires_word_boundaries() {
        assert!(contains_phrase("vomiting", "vomiting"));
        assert!(contains_phrase("vomiting since tuesday", "vomiting"));
        assert!(contains_phrase("sudden collapse, weak", "collapse"));
        assert!(!contains_phrase("overeating", "eating"));
        assert!(!contains_phrase("collapsed", "collapse"));
        assert!(!contains_phrase("anything", ""));
    }

    #[test]
    fn phrase_match_finds_later_occurrence() {
        // First occurrence is glued to a word, second one is not.
        assert!(contains_phrase("painless pain", "pain"));
    }

    #[test]
    fn resolve_known_species_has_no_note() {
        let (species, notes) = resolve_species(" Feline ");
        assert_eq!(species, Species::Cat);
        assert!(notes.is_empty());
    }

    #[test]
    fn resolve_unknown_species_falls_back() {
        let (species, notes) = resolve_species("Hamster");
        assert_eq!(species, Species::Other);
        assert_eq!(
            notes,
            vec![EngineNote::UnrecognizedSpecies {
                provided: "Hamster".into()
            }]
        );
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }
}
