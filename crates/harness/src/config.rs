//! Suite configuration
//!
//! The application under test is external to this repository; the suite only
//! needs to know where it lives and where the shared session artifacts are.

use std::path::PathBuf;
use std::time::Duration;

/// Environment-driven configuration for a suite run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the back-office application.
    pub base_url: String,

    /// Persisted authenticated-session snapshot (Playwright storage state).
    /// `None` runs every flow from a fresh, unauthenticated context.
    pub snapshot_path: Option<PathBuf>,

    /// Directory holding fixed sample files (stand-in signature image,
    /// scanned documents) referenced by `upload` steps.
    pub samples_dir: PathBuf,

    /// How long to wait for the application to answer the readiness probe.
    pub ready_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            snapshot_path: None,
            samples_dir: PathBuf::from("samples"),
            ready_timeout: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    /// Build a configuration from `VENTANILLA_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("VENTANILLA_BASE_URL") {
            config.base_url = url;
        }
        if let Some(path) = std::env::var_os("VENTANILLA_STATE") {
            config.snapshot_path = Some(PathBuf::from(path));
        }
        if let Some(dir) = std::env::var_os("VENTANILLA_SAMPLES") {
            config.samples_dir = PathBuf::from(dir);
        }
        config
    }
}
