use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    CareCategory, CarePriority, HistoricalSnapshot, OverallVitalStatus, PatientSnapshot, RiskLevel,
    Trend, Urgency, VitalMetric, VitalStatus,
};

// ---------------------------------------------------------------------------
// EngineNote
// ---------------------------------------------------------------------------

/// Non-fatal observation attached to a result for caller-side display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineNote {
    /// The species was not in the knowledge base; generic rules were used.
    UnrecognizedSpecies { provided: String },
}

impl EngineNote {
    pub fn message(&self) -> String {
        match self {
            Self::UnrecognizedSpecies { provided } => format!(
                "Species '{provided}' is not in the knowledge base; generic rules were applied"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Symptom analysis
// ---------------------------------------------------------------------------

/// A candidate condition produced by the symptom matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionMatch {
    pub condition_name: String,
    /// Heuristic score in [0, 1], not a probability.
    pub confidence: f64,
    pub matched_keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub urgency: Urgency,
    /// At most five, confidence descending, condition_name ascending on ties.
    pub candidates: Vec<ConditionMatch>,
    pub recommended_tests: BTreeSet<String>,
    /// Emergency keywords found in the symptom text.
    pub emergency_keywords: BTreeSet<String>,
    pub notes: Vec<EngineNote>,
}

// ---------------------------------------------------------------------------
// Risk assessment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub severity: RiskLevel,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub level: RiskLevel,
    /// Only factors with a positive contribution, largest first.
    pub factors: Vec<RiskFactor>,
    pub notes: Vec<EngineNote>,
}

// ---------------------------------------------------------------------------
// Preventive care
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlanItem {
    pub action: String,
    pub category: CareCategory,
    pub due_date: NaiveDate,
    pub rationale: String,
    pub priority: CarePriority,
    /// Due date already passed at the snapshot's `as_of` date.
    pub overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarePlan {
    /// Sorted by due date, then action.
    pub items: Vec<CarePlanItem>,
    pub notes: Vec<EngineNote>,
}

// ---------------------------------------------------------------------------
// Trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedNeed {
    pub prediction: String,
    pub confidence: f64,
    pub timeframe: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub weight_trend: Trend,
    pub visit_frequency_trend: Trend,
    pub progressing_conditions: Vec<String>,
    pub predicted_needs: Vec<PredictedNeed>,
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalAssessment {
    pub metric: VitalMetric,
    pub value: f64,
    pub status: VitalStatus,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub priority_score: f64,
    pub urgency: Urgency,
    /// Names of out-of-range metrics.
    pub vital_flags: BTreeSet<String>,
    pub abnormal_count: usize,
    pub vital_status: OverallVitalStatus,
    pub recommended_action: String,
    pub vital_assessments: Vec<VitalAssessment>,
    /// The symptom analysis the urgency was taken from.
    pub analysis: AnalysisResult,
}

// ---------------------------------------------------------------------------
// Lab tests
// ---------------------------------------------------------------------------

/// A catalog test matched by a free-text query, with its clinic margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabTestRecommendation {
    pub name: String,
    pub category: String,
    pub description: String,
    pub retail_price: f64,
    pub discount_price: f64,
    /// Retail minus discount price.
    pub profit: f64,
    /// Profit as a fraction of the retail price.
    pub profit_margin: f64,
}

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Knowledge base load failed ({0}): {1}")]
    KnowledgeBaseLoad(String, String),

    #[error("Knowledge base parse failed ({0}): {1}")]
    KnowledgeBaseParse(String, String),

    #[error("Invalid knowledge base: {0}")]
    InvalidKnowledgeBase(String),
}

// ---------------------------------------------------------------------------
// DecisionSupportEngine trait
// ---------------------------------------------------------------------------

/// The clinical decision-support engine.
///
/// Every operation is a pure computation over its inputs and the shared,
/// read-only knowledge base. Implementations must be safe to call from any
/// number of threads at once.
pub trait DecisionSupportEngine: Send + Sync {
    /// Rank candidate conditions for a set of symptoms.
    fn analyze(&self, species: &str, symptom_lines: &[String])
        -> Result<AnalysisResult, EngineError>;

    /// Score a patient's overall health risk.
    fn assess_risk(&self, patient: &PatientSnapshot) -> Result<RiskAssessment, EngineError>;

    /// Build the preventive-care schedule for a patient.
    fn plan_care(&self, patient: &PatientSnapshot) -> Result<CarePlan, EngineError>;

    /// Derive directional signals from a chronological record sequence.
    fn predict_trends(&self, history: &[HistoricalSnapshot]) -> TrendSummary;

    /// Catalog tests matching a free-text query, best margin first.
    fn select_lab_tests(&self, query: &str, max_results: usize) -> Vec<LabTestRecommendation>;

    /// Combine symptom urgency with vital-sign deviation.
    fn triage(
        &self,
        species: &str,
        symptom_lines: &[String],
        vitals: &BTreeMap<String, f64>,
    ) -> Result<TriageResult, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_species_note_message() {
        let note = EngineNote::UnrecognizedSpecies {
            provided: "hamster".into(),
        };
        assert!(note.message().contains("hamster"));
        assert!(note.message().contains("generic rules"));
    }

    #[test]
    fn analysis_result_serializes_field_names() {
        let result = AnalysisResult {
            urgency: Urgency::Urgent,
            candidates: vec![ConditionMatch {
                condition_name: "Gastroenteritis".into(),
                confidence: 0.64,
                matched_keywords: ["vomiting".to_string()].into_iter().collect(),
            }],
            recommended_tests: BTreeSet::new(),
            emergency_keywords: BTreeSet::new(),
            notes: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["urgency"], "Urgent");
        assert_eq!(json["candidates"][0]["condition_name"], "Gastroenteritis");
        assert_eq!(json["candidates"][0]["matched_keywords"][0], "vomiting");
        assert!(json["recommended_tests"].is_array());
    }

    #[test]
    fn error_display() {
        let err = EngineError::InvalidInput("no symptoms".into());
        assert_eq!(err.to_string(), "Invalid input: no symptoms");
    }
}
