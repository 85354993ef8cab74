use serde::{Deserialize, Serialize};

use super::species::Species;

/// Physiological measurement checked during triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalMetric {
    HeartRate,
    RespiratoryRate,
    Temperature,
}

impl VitalMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            VitalMetric::HeartRate => "heart_rate",
            VitalMetric::RespiratoryRate => "respiratory_rate",
            VitalMetric::Temperature => "temperature",
        }
    }

    /// Parse a metric name. Accepts the short `resp_rate` form too.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "heart_rate" | "hr" => Some(VitalMetric::HeartRate),
            "respiratory_rate" | "resp_rate" | "rr" => Some(VitalMetric::RespiratoryRate),
            "temperature" | "temp" => Some(VitalMetric::Temperature),
            _ => None,
        }
    }
}

/// Species-specific acceptable band for one metric. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalRange {
    pub species: Species,
    pub metric: VitalMetric,
    pub min: f64,
    pub max: f64,
}

impl VitalRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}
