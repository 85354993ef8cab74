use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::knowledge::KnowledgeBase;
use crate::models::{HistoricalSnapshot, PatientSnapshot};

use super::care_plan::plan_care;
use super::lab_tests::select_lab_tests;
use super::matcher::analyze;
use super::risk::assess_risk;
use super::trends::predict_trends;
use super::triage::triage;
use super::types::{
    AnalysisResult, CarePlan, DecisionSupportEngine, EngineError, LabTestRecommendation,
    RiskAssessment, TrendSummary, TriageResult,
};

/// Default implementation of the decision-support engine.
/// Owns the shared knowledge base and delegates to the pure engine functions.
#[derive(Debug, Clone)]
pub struct DefaultDecisionEngine {
    kb: Arc<KnowledgeBase>,
}

impl DefaultDecisionEngine {
    pub fn new(kb: Arc<KnowledgeBase>) -> Self {
        Self { kb }
    }

    /// Engine over the compiled-in tables.
    pub fn builtin() -> Self {
        Self::new(Arc::new(KnowledgeBase::builtin()))
    }

    /// Engine over the configured knowledge base file, if any.
    pub fn from_config() -> Result<Self, EngineError> {
        Ok(Self::new(Arc::new(KnowledgeBase::from_config()?)))
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }
}

impl Default for DefaultDecisionEngine {
    fn default() -> Self {
        Self::builtin()
    }
}

impl DecisionSupportEngine for DefaultDecisionEngine {
    fn analyze(
        &self,
        species: &str,
        symptom_lines: &[String],
    ) -> Result<AnalysisResult, EngineError> {
        let start = Instant::now();
        let result = analyze(&self.kb, species, symptom_lines)?;

        tracing::info!(
            species,
            urgency = %result.urgency,
            candidates = result.candidates.len(),
            tests = result.recommended_tests.len(),
            processing_us = start.elapsed().as_micros() as u64,
            "Symptom analysis complete"
        );
        Ok(result)
    }

    fn assess_risk(&self, patient: &PatientSnapshot) -> Result<RiskAssessment, EngineError> {
        let start = Instant::now();
        let result = assess_risk(&self.kb, patient)?;

        tracing::info!(
            species = %patient.species,
            score = result.score,
            level = %result.level,
            factors = result.factors.len(),
            processing_us = start.elapsed().as_micros() as u64,
            "Risk assessment complete"
        );
        Ok(result)
    }

    fn plan_care(&self, patient: &PatientSnapshot) -> Result<CarePlan, EngineError> {
        let start = Instant::now();
        let plan = plan_care(&self.kb, patient)?;

        tracing::info!(
            species = %patient.species,
            items = plan.items.len(),
            processing_us = start.elapsed().as_micros() as u64,
            "Care plan complete"
        );
        Ok(plan)
    }

    fn predict_trends(&self, history: &[HistoricalSnapshot]) -> TrendSummary {
        let summary = predict_trends(&self.kb, history);

        tracing::info!(
            records = history.len(),
            weight = %summary.weight_trend,
            visits = %summary.visit_frequency_trend,
            needs = summary.predicted_needs.len(),
            "Trend prediction complete"
        );
        summary
    }

    fn select_lab_tests(&self, query: &str, max_results: usize) -> Vec<LabTestRecommendation> {
        let selected = select_lab_tests(&self.kb, query, max_results);

        tracing::info!(
            query,
            max_results,
            selected = selected.len(),
            "Lab test selection complete"
        );
        selected
    }

    fn triage(
        &self,
        species: &str,
        symptom_lines: &[String],
        vitals: &BTreeMap<String, f64>,
    ) -> Result<TriageResult, EngineError> {
        let start = Instant::now();
        let result = triage(&self.kb, species, symptom_lines, vitals)?;

        tracing::info!(
            species,
            urgency = %result.urgency,
            priority = result.priority_score,
            flags = result.vital_flags.len(),
            vital_status = %result.vital_status,
            processing_us = start.elapsed().as_micros() as u64,
            "Triage complete"
        );
        Ok(result)
    }
}
