use serde::{Deserialize, Serialize};

use crate::intelligence::EngineError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(EngineError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Coarse triage tier. Ordered from least to most pressing.
    Urgency {
        Routine => "routine",
        Urgent => "urgent",
        Emergency => "emergency",
    }
);

str_enum!(
    /// Used both as the overall risk band and as a single factor's severity.
    RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

str_enum!(Trend {
    Increasing => "increasing",
    Decreasing => "decreasing",
    Stable => "stable",
    InsufficientData => "insufficient_data",
});

str_enum!(
    /// Kind of preventive-care event. Schedule rules and recorded events share it.
    CareCategory {
        Vaccination => "vaccination",
        WellnessExam => "wellness_exam",
        Dental => "dental",
        ParasitePrevention => "parasite_prevention",
    }
);

str_enum!(CarePriority {
    Low => "low",
    Medium => "medium",
    High => "high",
});

str_enum!(VitalStatus {
    Low => "low",
    Normal => "normal",
    High => "high",
});

str_enum!(OverallVitalStatus {
    Normal => "normal",
    Abnormal => "abnormal",
    Critical => "critical",
});

impl OverallVitalStatus {
    /// One out-of-range vital is abnormal; two or more is critical.
    pub fn from_abnormal_count(count: usize) -> Self {
        match count {
            0 => Self::Normal,
            1 => Self::Abnormal,
            _ => Self::Critical,
        }
    }
}

impl Urgency {
    /// Base priority weight used by the triage scorer.
    pub fn priority_weight(self) -> f64 {
        match self {
            Self::Emergency => 100.0,
            Self::Urgent => 60.0,
            Self::Routine => 20.0,
        }
    }
}

impl RiskLevel {
    /// Band an overall risk score. 30 and 65 both fall in Medium.
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=29 => Self::Low,
            30..=65 => Self::Medium,
            _ => Self::High,
        }
    }

    /// Severity of a single factor relative to the cap of its category.
    pub fn from_share(contribution: f64, cap: f64) -> Self {
        if cap <= 0.0 {
            return Self::Low;
        }
        let share = contribution / cap;
        if share >= 2.0 / 3.0 {
            Self::High
        } else if share >= 1.0 / 3.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}
