use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Dosetrack";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default Ollama endpoint (local instance only).
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default model used for both vision OCR and structuring.
pub const DEFAULT_MODEL: &str = "medgemma:4b";

/// Request timeout for model calls, in seconds. Vision extraction on CPU
/// can take minutes for a large label photo.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 300;

/// Get the application data directory
/// ~/Dosetrack/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Default SQLite database path.
pub fn default_db_path() -> PathBuf {
    app_data_dir().join("dosetrack.db")
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "dosetrack=info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Dosetrack"));
    }

    #[test]
    fn db_path_under_app_data() {
        let db = default_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("dosetrack.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
