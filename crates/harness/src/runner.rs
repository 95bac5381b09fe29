//! Suite runner: scenario iteration, session fixtures, and result reporting
//!
//! Flows run strictly serially, and so do the entries of each scenario
//! table: one browser context, one sidecar, one script run per entry. A
//! failed scenario aborts only its own group; the next entry still runs.
//! There are no retries and no backend rollback.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::patcher::CompiledRule;
use crate::playwright::{
    check_playwright_installed, DriverConfig, PlaywrightDriver, RunOutput, ScriptInput,
};
use crate::scenario::ScenarioRecord;
use crate::session::{origin_of, SessionSnapshot};
use crate::sidecar::PatchSidecar;
use crate::spec::{FlowSpec, FlowStep};

/// Result of one scenario group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps_started: u32,
    pub last_step: Option<String>,
    pub error: Option<String>,
}

/// Result of one flow (all its scenario groups).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub scenarios: Vec<ScenarioResult>,
    /// Set when the flow never reached its scenarios (validation, missing
    /// fixtures).
    pub error: Option<String>,
}

impl FlowResult {
    fn aborted(name: &str, error: String) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            duration_ms: 0,
            scenarios: vec![],
            error: Some(error),
        }
    }
}

/// Result of a whole suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub started_at: DateTime<Utc>,
    pub results: Vec<FlowResult>,
}

/// Configuration for the suite runner.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub app: AppConfig,
    pub driver: DriverConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            driver: DriverConfig::default(),
            specs_dir: PathBuf::from("crates/flows/specs"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// Drives flows against the back-office application.
pub struct SuiteRunner {
    config: RunnerConfig,
}

impl SuiteRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Run all flows in the specs directory.
    pub async fn run_all(&self) -> HarnessResult<SuiteResult> {
        let specs = FlowSpec::load_all(&self.config.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run flows matching a tag.
    pub async fn run_tagged(&self, tag: &str) -> HarnessResult<SuiteResult> {
        let specs = FlowSpec::load_all(&self.config.specs_dir)?;
        let filtered: Vec<FlowSpec> = specs
            .into_iter()
            .filter(|s| s.tags.contains(&tag.to_string()))
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run a single flow by name.
    pub async fn run_flow_by_name(&self, name: &str) -> HarnessResult<SuiteResult> {
        let specs = FlowSpec::load_all(&self.config.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| HarnessError::SpecParse(format!("flow not found: {name}")))?;
        self.run_specs(std::slice::from_ref(&spec)).await
    }

    /// Run a list of flows, serially, collecting per-flow results.
    pub async fn run_specs(&self, specs: &[FlowSpec]) -> HarnessResult<SuiteResult> {
        let started_at = Utc::now();
        let start = Instant::now();

        check_playwright_installed()?;
        self.wait_for_app().await?;

        let mut results = Vec::new();
        let mut passed = 0;
        let mut failed = 0;

        info!("running {} flow(s)...", specs.len());

        for spec in specs {
            match self.run_flow(spec).await {
                Ok(result) => {
                    if result.success {
                        passed += 1;
                        info!("✓ {} ({} ms)", result.name, result.duration_ms);
                    } else {
                        failed += 1;
                        error!("✗ {}", result.name);
                    }
                    results.push(result);
                }
                Err(e) => {
                    failed += 1;
                    error!("✗ {} - {}", spec.name, e);
                    results.push(FlowResult::aborted(&spec.name, e.to_string()));
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        info!("");
        info!(
            "flow results: {} passed, {} failed ({} ms)",
            passed, failed, duration_ms
        );

        Ok(SuiteResult {
            total: specs.len(),
            passed,
            failed,
            duration_ms,
            started_at,
            results,
        })
    }

    /// Run one flow: every scenario group in table order.
    pub async fn run_flow(&self, spec: &FlowSpec) -> HarnessResult<FlowResult> {
        let start = Instant::now();
        debug!("running flow: {}", spec.name);

        spec.validate()?;
        let mut snapshot = self.load_snapshot()?;

        if !spec.requires.is_empty() {
            let missing = match &snapshot {
                Some(snapshot) => snapshot.missing_keys(&spec.requires),
                None => spec.requires.clone(),
            };
            if !missing.is_empty() {
                return Err(HarnessError::MissingFixture {
                    flow: spec.name.clone(),
                    keys: missing,
                });
            }
        }

        let rules = spec.compile_rules()?;
        let mut scenario_results = Vec::new();

        for scenario in &spec.scenario_table() {
            let label = scenario.label();
            let scenario_start = Instant::now();
            match self.run_scenario(spec, &rules, scenario, &mut snapshot).await {
                Ok(output) => {
                    if output.success {
                        info!("  ✓ {} [{}]", spec.name, label);
                    } else {
                        error!(
                            "  ✗ {} [{}] - {}",
                            spec.name,
                            label,
                            output.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                    scenario_results.push(ScenarioResult {
                        label,
                        success: output.success,
                        duration_ms: scenario_start.elapsed().as_millis() as u64,
                        steps_started: output.steps_started,
                        last_step: output.last_step,
                        error: output.error,
                    });
                }
                Err(e) => {
                    error!("  ✗ {} [{}] - {}", spec.name, label, e);
                    scenario_results.push(ScenarioResult {
                        label,
                        success: false,
                        duration_ms: scenario_start.elapsed().as_millis() as u64,
                        steps_started: 0,
                        last_step: None,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let success = scenario_results.iter().all(|s| s.success);
        Ok(FlowResult {
            name: spec.name.clone(),
            success,
            duration_ms: start.elapsed().as_millis() as u64,
            scenarios: scenario_results,
            error: None,
        })
    }

    /// One isolated scenario group: fresh sidecar, fresh context, one script.
    async fn run_scenario(
        &self,
        spec: &FlowSpec,
        rules: &[CompiledRule],
        scenario: &ScenarioRecord,
        snapshot: &mut Option<SessionSnapshot>,
    ) -> HarnessResult<RunOutput> {
        let sidecar = if rules.is_empty() {
            None
        } else {
            Some(PatchSidecar::spawn(rules.to_vec(), scenario.clone()).await?)
        };
        let endpoint = sidecar.as_ref().map(|s| s.endpoint());

        let steps = spec.resolve_steps(scenario)?;
        let steps = bind_session(&spec.name, steps, snapshot.as_ref())?;

        let mut driver_config = self.config.driver.clone();
        driver_config.base_url = self.config.app.base_url.clone();
        driver_config.samples_dir = self.config.app.samples_dir.clone();
        driver_config.viewport_width = spec.viewport.width;
        driver_config.viewport_height = spec.viewport.height;
        driver_config.storage_state = self
            .config
            .app
            .snapshot_path
            .as_ref()
            .filter(|path| path.exists())
            .cloned();

        let driver = PlaywrightDriver::new(driver_config)?;
        let script = driver.build_script(&ScriptInput {
            steps: &steps,
            rules,
            sidecar_endpoint: endpoint.as_deref(),
        })?;
        let output = driver.run_script(&script).await?;

        if let Some(sidecar) = &sidecar {
            let stats = sidecar.stats();
            if stats.is_idle() {
                warn!(
                    "  {} [{}]: no intercepted request reached the patch rules",
                    spec.name,
                    scenario.label()
                );
            } else {
                debug!(
                    "  {} [{}] interception stats: {:?}",
                    spec.name,
                    scenario.label(),
                    stats
                );
            }
            sidecar.shutdown();
        }

        if !output.captures.is_empty() {
            match &self.config.app.snapshot_path {
                Some(path) => {
                    let snapshot = snapshot.get_or_insert_with(SessionSnapshot::default);
                    let origin = origin_of(&self.config.app.base_url);
                    for capture in &output.captures {
                        snapshot.set_local_value(&origin, &capture.key, capture.value.clone());
                    }
                    snapshot.save(path)?;
                    info!(
                        "  persisted {} session value(s) to {}",
                        output.captures.len(),
                        path.display()
                    );
                }
                None => warn!(
                    "  {} captured session value(s) but no snapshot path is configured",
                    output.captures.len()
                ),
            }
        }

        Ok(output)
    }

    fn load_snapshot(&self) -> HarnessResult<Option<SessionSnapshot>> {
        match &self.config.app.snapshot_path {
            Some(path) if path.exists() => Ok(Some(SessionSnapshot::load(path)?)),
            _ => Ok(None),
        }
    }

    /// Wait for the application to answer at its base URL.
    async fn wait_for_app(&self) -> HarnessResult<()> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        while start.elapsed() < self.config.app.ready_timeout {
            attempts += 1;

            match client.get(&self.config.app.base_url).send().await {
                Ok(resp) if resp.status().is_success() || resp.status().is_redirection() => {
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("readiness probe returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("waiting for back-office at {}...", self.config.app.base_url);
                    }
                    // Connection refused is expected while the app is coming up
                    if !e.is_connect() {
                        warn!("readiness probe error: {}", e);
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        Err(HarnessError::AppUnreachable {
            url: self.config.app.base_url.clone(),
            attempts,
        })
    }

    /// Write suite results to a JSON file in the output directory.
    pub fn write_results(&self, results: &SuiteResult) -> HarnessResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;

        let path = self.config.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("results written to: {}", path.display());
        Ok(path)
    }
}

/// Substitute `{{session.KEY}}` placeholders in step values with fixture
/// values from the snapshot. Unresolvable placeholders abort the flow with
/// the missing keys named.
fn bind_session(
    flow: &str,
    steps: Vec<FlowStep>,
    snapshot: Option<&SessionSnapshot>,
) -> HarnessResult<Vec<FlowStep>> {
    let pattern = Regex::new(r"\{\{session\.([A-Za-z0-9_.-]+)\}\}")
        .map_err(|e| HarnessError::Script(e.to_string()))?;

    let mut missing = Vec::new();
    let steps = steps
        .into_iter()
        .map(|step| bind_step(step, &pattern, snapshot, &mut missing))
        .collect();

    if missing.is_empty() {
        Ok(steps)
    } else {
        missing.sort();
        missing.dedup();
        Err(HarnessError::MissingFixture { flow: flow.to_string(), keys: missing })
    }
}

fn bind_step(
    step: FlowStep,
    pattern: &Regex,
    snapshot: Option<&SessionSnapshot>,
    missing: &mut Vec<String>,
) -> FlowStep {
    let mut substitute = |text: String| -> String {
        if !text.contains("{{session.") {
            return text;
        }
        pattern
            .replace_all(&text, |caps: &regex::Captures<'_>| {
                let key = &caps[1];
                match snapshot.and_then(|s| s.local_value(key)) {
                    Some(value) => value.to_string(),
                    None => {
                        missing.push(key.to_string());
                        String::new()
                    }
                }
            })
            .into_owned()
    };

    match step {
        FlowStep::Fill { selector, value, clear_first } => FlowStep::Fill {
            selector,
            value: substitute(value),
            clear_first,
        },
        FlowStep::Select { selector, value } => FlowStep::Select {
            selector,
            value: substitute(value),
        },
        FlowStep::Navigate { url, wait_for_selector } => FlowStep::Navigate {
            url: substitute(url),
            wait_for_selector,
        },
        FlowStep::Assert { selector, visible, text, text_contains, attribute, count } => {
            FlowStep::Assert {
                selector,
                visible,
                text: text.map(&mut substitute),
                text_contains: text_contains.map(&mut substitute),
                attribute,
                count,
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fill(value: &str) -> FlowStep {
        FlowStep::Fill {
            selector: "#socio".to_string(),
            value: value.to_string(),
            clear_first: false,
        }
    }

    fn snapshot_with(key: &str, value: &str) -> SessionSnapshot {
        let mut snapshot = SessionSnapshot::default();
        snapshot.set_local_value("http://app.local", key, value.to_string());
        snapshot
    }

    #[test]
    fn test_bind_session_substitutes_fixture_values() {
        let snapshot = snapshot_with("socio.numero", "18523");
        let steps = bind_session(
            "ahorros-apertura",
            vec![fill("{{session.socio.numero}}")],
            Some(&snapshot),
        )
        .unwrap();
        assert!(matches!(&steps[0], FlowStep::Fill { value, .. } if value == "18523"));
    }

    #[test]
    fn test_bind_session_leaves_plain_values_alone() {
        let steps = bind_session("socios-registro", vec![fill("500.00")], None).unwrap();
        assert!(matches!(&steps[0], FlowStep::Fill { value, .. } if value == "500.00"));
    }

    #[test]
    fn test_bind_session_names_missing_keys() {
        let err = bind_session(
            "ahorros-apertura",
            vec![fill("{{session.socio.numero}}")],
            None,
        )
        .unwrap_err();
        match err {
            HarnessError::MissingFixture { flow, keys } => {
                assert_eq!(flow, "ahorros-apertura");
                assert_eq!(keys, vec!["socio.numero".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_aborted_flow_carries_the_reason() {
        let result = FlowResult::aborted(
            "ahorros-apertura",
            "flow ahorros-apertura is missing session fixture(s): [\"socio.numero\"]".to_string(),
        );
        assert!(!result.success);
        assert!(result.scenarios.is_empty());
        assert!(result.error.unwrap().contains("socio.numero"));
    }

    #[test]
    fn test_suite_result_serializes() {
        let result = SuiteResult {
            total: 1,
            passed: 1,
            failed: 0,
            duration_ms: 1200,
            started_at: Utc::now(),
            results: vec![FlowResult {
                name: "caja-operaciones".to_string(),
                success: true,
                duration_ms: 1200,
                scenarios: vec![],
                error: None,
            }],
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["passed"], json!(1));
        assert_eq!(value["results"][0]["name"], json!("caja-operaciones"));
    }
}
