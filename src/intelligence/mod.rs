//! Clinical decision-support engines.
//!
//! Every engine is a pure function over its inputs and a shared
//! [`KnowledgeBase`](crate::knowledge::KnowledgeBase). [`DefaultDecisionEngine`]
//! bundles them behind the [`DecisionSupportEngine`] trait.

pub mod care_plan;
pub mod engine;
pub mod helpers;
pub mod matcher;
pub mod risk;
pub mod trends;
pub mod triage;
pub mod types;
pub mod urgency;

pub use care_plan::plan_care;
pub use engine::DefaultDecisionEngine;
pub use lab_tests::select_lab_tests;
pub use matcher::analyze;
pub use risk::assess_risk;
pub use trends::predict_trends;
pub use triage::{assess_vitals, triage};
pub use types::*;
pub use urgency::classify_urgency;
