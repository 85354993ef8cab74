use std::ffi::OsString;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "VetCare";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the knowledge base file location.
pub const KB_PATH_ENV: &str = "VETCARE_KB_PATH";

/// File name of the knowledge base inside the application data directory.
pub const KB_FILE_NAME: &str = "knowledge_base.json";

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "vetcare_lib=info"
}

/// Get the application data directory (`<platform data dir>/VetCare`).
/// `None` when the platform has no data directory (e.g. no home).
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME))
}

/// Location of the knowledge base file: `VETCARE_KB_PATH` when set and
/// non-empty, otherwise `knowledge_base.json` under the app data directory.
pub fn knowledge_base_path() -> Option<PathBuf> {
    knowledge_base_path_from(std::env::var_os(KB_PATH_ENV))
}

/// Resolve the knowledge base location from an explicit override value.
pub fn knowledge_base_path_from(override_path: Option<OsString>) -> Option<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => app_data_dir().map(|dir| dir.join(KB_FILE_NAME)),
    }
}
