//! Static, species-aware reference data for the decision-support engine.
//!
//! The knowledge base is built once (compiled-in tables or a JSON file) and
//! then shared by immutable reference. Nothing in the engine mutates it.

mod builtin;

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::intelligence::helpers::{contains_phrase, normalize_name, normalize_phrase};
use crate::intelligence::EngineError;
use crate::models::{CareCategory, CarePriority, Species, VitalMetric, VitalRange};

// ---------------------------------------------------------------------------
// Table row types
// ---------------------------------------------------------------------------

/// Which species a rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeciesScope {
    Any,
    Only(BTreeSet<Species>),
}

impl SpeciesScope {
    pub fn only(species: &[Species]) -> Self {
        Self::Only(species.iter().copied().collect())
    }

    pub fn applies_to(&self, species: Species) -> bool {
        match self {
            Self::Any => true,
            Self::Only(set) => set.contains(&species),
        }
    }
}

/// Rule linking symptom keywords to a named condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomPattern {
    pub condition_name: String,
    pub species: SpeciesScope,
    pub keywords: Vec<String>,
    pub base_confidence: f64,
    #[serde(default)]
    pub emergency: bool,
}

/// Diagnostic tests recommended when a condition is a likely candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTests {
    pub condition_name: String,
    pub tests: Vec<String>,
}

/// Age (years) at which a patient counts as senior. `breed: None` is the species default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeniorThreshold {
    pub species: Species,
    #[serde(default)]
    pub breed: Option<String>,
    pub years: f64,
}

/// Ideal weight band in kilograms. `breed: None` is the species default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBand {
    pub species: Species,
    #[serde(default)]
    pub breed: Option<String>,
    pub min_kg: f64,
    pub max_kg: f64,
}

/// Patient attribute that worsens the outlook of a chronic condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggravator {
    Obesity,
    SeniorAge,
    BreedPredisposition,
}

/// A recognized chronic condition and its fixed risk weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronicConditionRule {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub weight: f64,
    #[serde(default)]
    pub aggravators: Vec<Aggravator>,
    #[serde(default)]
    pub predisposed_breeds: Vec<String>,
}

/// Severity wording found in free-text notes, with its escalation rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationKeyword {
    pub keyword: String,
    pub rank: u8,
}

/// Life stage a schedule rule is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    #[default]
    Any,
    Senior,
    NonSenior,
}

/// Preventive-care rule. The age bracket is `[min_age_years, max_age_years)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareScheduleRule {
    /// `{species}` is replaced with the patient's species name.
    pub action: String,
    pub category: CareCategory,
    pub species: SpeciesScope,
    #[serde(default)]
    pub min_age_years: f64,
    #[serde(default)]
    pub max_age_years: Option<f64>,
    #[serde(default)]
    pub life_stage: LifeStage,
    pub interval_days: i64,
    /// Offset from the patient's creation date when no event is on record.
    pub first_due_days: i64,
    pub priority: CarePriority,
    pub rationale: String,
}

impl CareScheduleRule {
    pub fn matches_age(&self, age_years: f64, is_senior: bool) -> bool {
        let in_bracket = age_years >= self.min_age_years
            && self.max_age_years.map_or(true, |max| age_years < max);
        let stage_ok = match self.life_stage {
            LifeStage::Any => true,
            LifeStage::Senior => is_senior,
            LifeStage::NonSenior => !is_senior,
        };
        in_bracket && stage_ok
    }
}

/// Orderable diagnostic test from the lab price list.
///
/// Prices are kept as listed (`"$1,025.00"`); rows whose prices do not parse
/// are skipped at selection time rather than rejected at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTest {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub retail_price: String,
    pub discount_price: String,
}

/// Parse a listed price, ignoring `$` signs, thousands separators and
/// surrounding whitespace.
pub fn parse_price(listed: &str) -> Option<f64> {
    let cleaned: String = listed
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite())
}

// ---------------------------------------------------------------------------
// KnowledgeBase
// ---------------------------------------------------------------------------

/// All reference tables used by the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub symptom_patterns: Vec<SymptomPattern>,
    pub emergency_keywords: Vec<String>,
    pub condition_tests: Vec<ConditionTests>,
    pub vital_ranges: Vec<VitalRange>,
    pub senior_thresholds: Vec<SeniorThreshold>,
    pub weight_bands: Vec<WeightBand>,
    pub chronic_conditions: Vec<ChronicConditionRule>,
    pub escalation_keywords: Vec<EscalationKeyword>,
    pub care_schedule: Vec<CareScheduleRule>,
    #[serde(default)]
    pub lab_tests: Vec<LabTest>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// The compiled-in reference tables.
    pub fn builtin() -> Self {
        builtin::tables().normalized()
    }

    /// Load and validate a knowledge base from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            EngineError::KnowledgeBaseLoad(path.display().to_string(), e.to_string())
        })?;
        Self::from_json(&json)
    }

    /// Parse and validate a knowledge base from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let kb: KnowledgeBase = serde_json::from_str(json).map_err(|e| {
            EngineError::KnowledgeBaseParse("knowledge_base.json".into(), e.to_string())
        })?;
        let kb = kb.normalized();
        kb.validate()?;
        Ok(kb)
    }

    /// Load the configured knowledge base file, or the built-in tables when
    /// no file exists at the configured path.
    pub fn from_config() -> Result<Self, EngineError> {
        Self::from_path_or_builtin(crate::config::knowledge_base_path().as_deref())
    }

    /// Load and validate `path` when it names an existing file, otherwise
    /// return the built-in tables. A file that exists but fails to load or
    /// validate is an error, never a silent fallback.
    pub fn from_path_or_builtin(path: Option<&Path>) -> Result<Self, EngineError> {
        match path {
            Some(path) if path.exists() => {
                tracing::info!(path = %path.display(), "Loading knowledge base from file");
                Self::load(path).inspect_err(|e| {
                    tracing::warn!(path = %path.display(), error = %e, "Knowledge base rejected");
                })
            }
            _ => {
                tracing::debug!("No knowledge base file configured, using built-in tables");
                Ok(Self::builtin())
            }
        }
    }

    /// Lower-case keywords and canonicalize names so lookups can compare directly.
    fn normalized(mut self) -> Self {
        for pattern in &mut self.symptom_patterns {
            for kw in &mut pattern.keywords {
                *kw = normalize_phrase(kw);
            }
        }
        for kw in &mut self.emergency_keywords {
            *kw = normalize_phrase(kw);
        }
        for t in &mut self.senior_thresholds {
            t.breed = t.breed.as_deref().map(normalize_name);
        }
        for b in &mut self.weight_bands {
            b.breed = b.breed.as_deref().map(normalize_name);
        }
        for c in &mut self.chronic_conditions {
            c.name = normalize_name(&c.name);
            for alias in &mut c.aliases {
                *alias = normalize_name(alias);
            }
            for breed in &mut c.predisposed_breeds {
                *breed = normalize_name(breed);
            }
        }
        for e in &mut self.escalation_keywords {
            e.keyword = normalize_phrase(&e.keyword);
        }
        self
    }

    /// Reject tables the engines cannot compute sensibly with.
    pub fn validate(&self) -> Result<(), EngineError> {
        for p in &self.symptom_patterns {
            if p.keywords.is_empty() || p.keywords.iter().any(|k| k.is_empty()) {
                return Err(EngineError::InvalidKnowledgeBase(format!(
                    "pattern '{}' has an empty keyword",
                    p.condition_name
                )));
            }
            let distinct: BTreeSet<&str> = p.keywords.iter().map(String::as_str).collect();
            if distinct.len() != p.keywords.len() {
                return Err(EngineError::InvalidKnowledgeBase(format!(
                    "pattern '{}' lists a keyword twice",
                    p.condition_name
                )));
            }
            if !(0.0..=1.0).contains(&p.base_confidence) {
                return Err(EngineError::InvalidKnowledgeBase(format!(
                    "pattern '{}' base confidence {} outside [0, 1]",
                    p.condition_name, p.base_confidence
                )));
            }
        }
        for r in &self.vital_ranges {
            if !(r.min <= r.max) {
                return Err(EngineError::InvalidKnowledgeBase(format!(
                    "vital range {}/{} has min > max",
                    r.species,
                    r.metric.as_str()
                )));
            }
        }
        for b in &self.weight_bands {
            if !(b.min_kg > 0.0 && b.min_kg <= b.max_kg) {
                return Err(EngineError::InvalidKnowledgeBase(format!(
                    "weight band for {} ({}) is invalid",
                    b.species,
                    b.breed.as_deref().unwrap_or("default")
                )));
            }
        }
        if self.lab_tests.iter().any(|t| t.name.trim().is_empty()) {
            return Err(EngineError::InvalidKnowledgeBase(
                "lab test with an empty name".into(),
            ));
        }
        if let Some(t) = self.senior_thresholds.iter().find(|t| !(t.years > 0.0)) {
            return Err(EngineError::InvalidKnowledgeBase(format!(
                "senior threshold for {} must be positive",
                t.species
            )));
        }
        if let Some(c) = self.chronic_conditions.iter().find(|c| c.weight < 0.0) {
            return Err(EngineError::InvalidKnowledgeBase(format!(
                "chronic condition '{}' has a negative weight",
                c.name
            )));
        }
        if let Some(rule) = self
            .care_schedule
            .iter()
            .find(|r| r.interval_days < 1 || r.first_due_days < 0)
        {
            return Err(EngineError::InvalidKnowledgeBase(format!(
                "care rule '{}' has an invalid interval",
                rule.action
            )));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// Symptom patterns applicable to a species.
    pub fn patterns_for(&self, species: Species) -> impl Iterator<Item = &SymptomPattern> {
        self.symptom_patterns
            .iter()
            .filter(move |p| p.species.applies_to(species))
    }

    /// Tests listed for a condition (empty when none are listed).
    pub fn tests_for(&self, condition_name: &str) -> &[String] {
        self.condition_tests
            .iter()
            .find(|t| t.condition_name.eq_ignore_ascii_case(condition_name))
            .map(|t| t.tests.as_slice())
            .unwrap_or(&[])
    }

    pub fn vital_range(&self, species: Species, metric: VitalMetric) -> Option<&VitalRange> {
        self.vital_ranges
            .iter()
            .find(|r| r.species == species && r.metric == metric)
    }

    /// Breed-specific threshold if listed, else the species default.
    pub fn senior_threshold(&self, species: Species, breed: &str) -> Option<f64> {
        let breed = normalize_name(breed);
        let by_breed = self
            .senior_thresholds
            .iter()
            .find(|t| t.species == species && t.breed.as_deref() == Some(breed.as_str()));
        by_breed
            .or_else(|| {
                self.senior_thresholds
                    .iter()
                    .find(|t| t.species == species && t.breed.is_none())
            })
            .map(|t| t.years)
    }

    /// Breed-specific band if listed, else the species default.
    pub fn weight_band(&self, species: Species, breed: &str) -> Option<&WeightBand> {
        let breed = normalize_name(breed);
        self.weight_bands
            .iter()
            .find(|b| b.species == species && b.breed.as_deref() == Some(breed.as_str()))
            .or_else(|| {
                self.weight_bands
                    .iter()
                    .find(|b| b.species == species && b.breed.is_none())
            })
    }

    /// Find a chronic condition by name or alias.
    pub fn chronic_condition(&self, name: &str) -> Option<&ChronicConditionRule> {
        let key = normalize_name(name);
        self.chronic_conditions
            .iter()
            .find(|c| c.name == key || c.aliases.iter().any(|a| *a == key))
    }

    /// Highest escalation rank mentioned in a normalized note, if any.
    pub fn escalation_rank(&self, note: &str) -> Option<u8> {
        let note = normalize_phrase(note);
        self.escalation_keywords
            .iter()
            .filter(|e| contains_phrase(&note, &e.keyword))
            .map(|e| e.rank)
            .max()
    }
}
