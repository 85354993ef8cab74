use std::collections::{BTreeMap, BTreeSet};

use crate::knowledge::KnowledgeBase;
use crate::models::{HistoricalSnapshot, Trend};

use super::helpers::{mean, normalize_name};
use super::types::{PredictedNeed, TrendSummary};

/// Minimum number of records before weight and visit trends are reported.
pub const MIN_TREND_RECORDS: usize = 3;

/// Relative change of mean weight treated as no change.
const WEIGHT_STABLE_TOLERANCE: f64 = 0.02;

/// Last visit interval below this share of the mean interval: visits are speeding up.
const VISIT_SPEEDUP_RATIO: f64 = 0.8;
/// Last visit interval above this share of the mean interval: visits are slowing down.
const VISIT_SLOWDOWN_RATIO: f64 = 1.2;

/// Derive directional signals from a patient's record sequence.
///
/// Records are re-sorted by date first, so callers may pass them in any
/// order. Never fails: short or sparse histories yield
/// [`Trend::InsufficientData`].
pub fn predict_trends(kb: &KnowledgeBase, history: &[HistoricalSnapshot]) -> TrendSummary {
    let mut records: Vec<&HistoricalSnapshot> = history.iter().collect();
    records.sort_by_key(|r| r.recorded_on);

    let (weight_trend, visit_frequency_trend) = if records.len() < MIN_TREND_RECORDS {
        (Trend::InsufficientData, Trend::InsufficientData)
    } else {
        (weight_trend(&records), visit_frequency_trend(&records))
    };
    let progressing_conditions = progressing_conditions(kb, &records);
    let predicted_needs =
        predicted_needs(weight_trend, visit_frequency_trend, &progressing_conditions);

    tracing::debug!(
        records = records.len(),
        weight = %weight_trend,
        visits = %visit_frequency_trend,
        progressing = progressing_conditions.len(),
        "Trend prediction complete"
    );

    TrendSummary {
        weight_trend,
        visit_frequency_trend,
        progressing_conditions,
        predicted_needs,
    }
}

/// Mean of the latest third of recorded weights against the earliest third.
fn weight_trend(records: &[&HistoricalSnapshot]) -> Trend {
    let weights: Vec<f64> = records
        .iter()
        .filter_map(|r| r.weight_kg)
        .filter(|w| w.is_finite() && *w > 0.0)
        .collect();
    if weights.len() < MIN_TREND_RECORDS {
        return Trend::InsufficientData;
    }

    let k = weights.len() / 3;
    let (Some(early), Some(late)) = (mean(&weights[..k]), mean(&weights[weights.len() - k..]))
    else {
        return Trend::InsufficientData;
    };

    let change = (late - early) / early;
    if change.abs() <= WEIGHT_STABLE_TOLERANCE {
        Trend::Stable
    } else if change > 0.0 {
        Trend::Increasing
    } else {
        Trend::Decreasing
    }
}

/// Last interval between visits against the mean interval.
fn visit_frequency_trend(records: &[&HistoricalSnapshot]) -> Trend {
    let intervals: Vec<f64> = records
        .windows(2)
        .map(|pair| (pair[1].recorded_on - pair[0].recorded_on).num_days() as f64)
        .collect();
    let (Some(mean_interval), Some(&last)) = (mean(&intervals), intervals.last()) else {
        return Trend::InsufficientData;
    };
    if mean_interval <= 0.0 {
        return Trend::Stable;
    }

    if last < VISIT_SPEEDUP_RATIO * mean_interval {
        Trend::Increasing
    } else if last > VISIT_SLOWDOWN_RATIO * mean_interval {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Conditions noted in both of the two latest records whose severity wording
/// escalated between them. Unranked notes never count as progression.
fn progressing_conditions(kb: &KnowledgeBase, records: &[&HistoricalSnapshot]) -> Vec<String> {
    let [.., previous, latest] = records else {
        return Vec::new();
    };

    let earlier: BTreeMap<String, &str> = previous
        .condition_notes
        .iter()
        .map(|(name, note)| (normalize_name(name), note.as_str()))
        .collect();

    let progressing: BTreeSet<String> = latest
        .condition_notes
        .iter()
        .filter_map(|(name, note)| {
            let key = normalize_name(name);
            let before = kb.escalation_rank(earlier.get(&key)?)?;
            let now = kb.escalation_rank(note)?;
            (now > before).then_some(key)
        })
        .collect();

    progressing.into_iter().collect()
}

fn predicted_needs(weight: Trend, visits: Trend, progressing: &[String]) -> Vec<PredictedNeed> {
    let mut needs = Vec::new();
    if visits == Trend::Increasing {
        needs.push(need("May require increased monitoring", 0.65, "next_3_months"));
    }
    if weight == Trend::Increasing {
        needs.push(need("Weight management program recommended", 0.70, "immediate"));
    }
    for condition in progressing {
        needs.push(need(
            &format!("Reassess treatment plan for {condition}"),
            0.60,
            "next_visit",
        ));
    }
    needs
}

fn need(prediction: &str, confidence: f64, timeframe: &str) -> PredictedNeed {
    PredictedNeed {
        prediction: prediction.into(),
        confidence,
        timeframe: timeframe.into(),
    }
}
