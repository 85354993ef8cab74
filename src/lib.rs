pub mod config;
pub mod intelligence; // Symptom analysis, risk, care planning, trends, triage
pub mod knowledge; // Reference tables
pub mod models;

pub use intelligence::{DecisionSupportEngine, DefaultDecisionEngine, EngineError};
pub use knowledge::KnowledgeBase;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honours `RUST_LOG`, falling back to [`config::default_log_filter`]. Safe to
/// call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} decision support v{}", config::APP_NAME, config::APP_VERSION);
    }
}
