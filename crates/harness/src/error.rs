//! Error types for the harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("back-office unreachable at {url} after {attempts} probe(s)")]
    AppUnreachable { url: String, attempts: usize },

    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("script execution failed: {0}")]
    Script(String),

    #[error("flow spec parse error: {0}")]
    SpecParse(String),

    #[error("flow spec validation error: {0}")]
    SpecValidation(String),

    #[error("flow {flow} is missing session fixture(s): {keys:?}")]
    MissingFixture { flow: String, keys: Vec<String> },

    #[error("invalid URL pattern in rule {rule}: {source}")]
    UrlPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("patch sidecar failed to start: {0}")]
    Sidecar(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
