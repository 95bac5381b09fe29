//! Playwright browser automation
//!
//! One self-contained Node script is generated per scenario run and executed
//! with `node`. The script opens a context (optionally from a session
//! snapshot), installs one `page.route` per interception rule that round-trips
//! matched response bodies through the patch sidecar, then drives the resolved
//! linear steps. Progress comes back over a JSON-line protocol on
//! stdout/stderr.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Deserialize;
use tokio::process::Command as TokioCommand;
use tracing::{debug, warn};

use crate::error::{HarnessError, HarnessResult};
use crate::patcher::CompiledRule;
use crate::spec::{FlowStep, WaitState};

/// Default timeout for individual element operations, in milliseconds.
const DEFAULT_STEP_TIMEOUT_MS: u64 = 10_000;

/// Report/PDF tabs can take a while to spawn.
const POPUP_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, Copy, Default)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Configuration for the browser driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Base URL of the application under test.
    pub base_url: String,

    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Where screenshots land.
    pub artifacts_dir: PathBuf,

    /// Where relative `upload` paths resolve.
    pub samples_dir: PathBuf,

    /// Session snapshot to start the context from.
    pub storage_state: Option<PathBuf>,

    /// Directory containing the `playwright` package, exported as NODE_PATH.
    /// `None` relies on a global install.
    pub node_modules_dir: Option<PathBuf>,

    /// Wall-clock budget for one scenario's script run.
    pub run_timeout: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            artifacts_dir: PathBuf::from("test-results/screenshots"),
            samples_dir: PathBuf::from("samples"),
            storage_state: None,
            node_modules_dir: None,
            run_timeout: Duration::from_secs(180),
        }
    }
}

/// Inputs for one generated script.
pub struct ScriptInput<'a> {
    /// Resolved, branch-free steps.
    pub steps: &'a [FlowStep],

    /// Compiled interception rules to install as routes.
    pub rules: &'a [CompiledRule],

    /// Patch sidecar base endpoint; required when rules are present.
    pub sidecar_endpoint: Option<&'a str>,
}

/// A value captured from the page for session write-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub key: String,
    pub value: String,
}

/// Parsed result of one script run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub success: bool,

    /// Highest step number the script reached (1-based; the failing step on
    /// error).
    pub steps_started: u32,

    pub last_step: Option<String>,
    pub error: Option<String>,
    pub captures: Vec<Capture>,
}

/// Check that Playwright is installed and reachable through npx.
pub fn check_playwright_installed() -> HarnessResult<()> {
    let output = std::process::Command::new("npx")
        .args(["playwright", "--version"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match output {
        Ok(status) if status.success() => Ok(()),
        _ => Err(HarnessError::PlaywrightNotFound),
    }
}

/// Generates and executes Playwright scripts.
pub struct PlaywrightDriver {
    config: DriverConfig,
}

impl PlaywrightDriver {
    pub fn new(config: DriverConfig) -> HarnessResult<Self> {
        std::fs::create_dir_all(&config.artifacts_dir)?;
        Ok(Self { config })
    }

    /// Build the Node script for one scenario run.
    pub fn build_script(&self, input: &ScriptInput<'_>) -> HarnessResult<String> {
        if !input.rules.is_empty() && input.sidecar_endpoint.is_none() {
            return Err(HarnessError::Script(
                "interception rules require a sidecar endpoint".to_string(),
            ));
        }

        let mut script = String::new();
        script.push_str("const { chromium, firefox, webkit } = require('playwright');\n\n");
        script.push_str("(async () => {\n");
        script.push_str(&format!(
            "  const browser = await {}.launch({{ headless: {} }});\n",
            self.config.browser.as_str(),
            self.config.headless
        ));

        let mut context_options = format!(
            "viewport: {{ width: {}, height: {} }}",
            self.config.viewport_width, self.config.viewport_height
        );
        if let Some(state) = &self.config.storage_state {
            context_options.push_str(&format!(
                ", storageState: {}",
                js_str(&state.to_string_lossy())
            ));
        }
        script.push_str(&format!(
            "  const context = await browser.newContext({{ {} }});\n",
            context_options
        ));
        script.push_str("  const page = await context.newPage();\n");
        script.push_str(&format!("  const baseUrl = {};\n", js_str(&self.config.base_url)));
        if let Some(endpoint) = input.sidecar_endpoint {
            script.push_str(&format!("  const sidecar = {};\n", js_str(endpoint)));
        }
        script.push_str("  let lastPopup = null;\n");
        script.push_str("  let step = 0;\n");
        script.push_str(
            "  const mark = (name) => { step += 1; console.log(JSON.stringify({ step, name })); };\n",
        );
        script.push_str("\n  try {\n");

        for rule in input.rules {
            script.push_str(&self.route_to_js(rule));
        }

        for step in input.steps {
            script.push_str(&format!("\n    mark({});\n", js_str(&step_name(step))));
            script.push_str(&self.step_to_js(step)?);
        }

        script.push_str("\n    console.log(JSON.stringify({ success: true, steps: step }));\n");
        script.push_str("  } catch (error) {\n");
        script.push_str(
            "    console.error(JSON.stringify({ success: false, step, error: error.message }));\n",
        );
        script.push_str("    process.exitCode = 1;\n");
        script.push_str("  } finally {\n");
        script.push_str("    await context.close();\n");
        script.push_str("    await browser.close();\n");
        script.push_str("  }\n");
        script.push_str("})();\n");

        Ok(script)
    }

    /// One `page.route` per rule: forward upstream, post the JSON body to the
    /// sidecar, fulfill with the patched body under the original status and
    /// headers. Non-JSON bodies and an unreachable sidecar degrade to
    /// pass-through; upstream failures propagate to the page.
    fn route_to_js(&self, rule: &CompiledRule) -> String {
        let mut js = String::new();
        js.push_str(&format!(
            "    await page.route(new RegExp({}), async (route) => {{\n",
            js_str(rule.pattern())
        ));
        js.push_str("      const upstream = await route.fetch();\n");
        js.push_str("      let body;\n");
        js.push_str("      try { body = await upstream.json(); } catch (err) { return route.fulfill({ response: upstream }); }\n");
        js.push_str("      try {\n");
        js.push_str(&format!(
            "        const patched = await fetch(sidecar + {}, {{\n",
            js_str(&format!("/patch/{}", rule.name()))
        ));
        js.push_str("          method: 'POST',\n");
        js.push_str("          headers: { 'content-type': 'application/json' },\n");
        js.push_str("          body: JSON.stringify(body),\n");
        js.push_str("        });\n");
        js.push_str("        if (!patched.ok) { return route.fulfill({ response: upstream }); }\n");
        js.push_str(
            "        return route.fulfill({ response: upstream, json: await patched.json() });\n",
        );
        js.push_str("      } catch (err) {\n");
        js.push_str(&format!(
            "        console.log(JSON.stringify({{ sidecar_error: String(err), rule: {} }}));\n",
            js_str(rule.name())
        ));
        js.push_str("        return route.fulfill({ response: upstream });\n");
        js.push_str("      }\n");
        js.push_str("    });\n");
        js
    }

    /// Convert a resolved step to JavaScript.
    fn step_to_js(&self, step: &FlowStep) -> HarnessResult<String> {
        let js = match step {
            FlowStep::Navigate { url, wait_for_selector } => {
                let mut js = format!("    await page.goto(baseUrl + {});\n", js_str(url));
                if let Some(selector) = wait_for_selector {
                    js.push_str(&format!(
                        "    await page.waitForSelector({}, {{ timeout: {} }});\n",
                        js_str(selector),
                        DEFAULT_STEP_TIMEOUT_MS
                    ));
                }
                js
            }
            FlowStep::Click { selector, timeout_ms, opens_popup } => {
                let timeout = timeout_ms.unwrap_or(DEFAULT_STEP_TIMEOUT_MS);
                if *opens_popup {
                    format!(
                        "    [lastPopup] = await Promise.all([\n      page.waitForEvent('popup', {{ timeout: {} }}),\n      page.click({}, {{ timeout: {} }}),\n    ]);\n",
                        POPUP_TIMEOUT_MS,
                        js_str(selector),
                        timeout
                    )
                } else {
                    format!(
                        "    await page.click({}, {{ timeout: {} }});\n",
                        js_str(selector),
                        timeout
                    )
                }
            }
            FlowStep::Fill { selector, value, clear_first } => {
                if *clear_first {
                    format!(
                        "    await page.fill({sel}, '');\n    await page.fill({sel}, {val});\n",
                        sel = js_str(selector),
                        val = js_str(value)
                    )
                } else {
                    format!(
                        "    await page.fill({}, {});\n",
                        js_str(selector),
                        js_str(value)
                    )
                }
            }
            FlowStep::Press { selector, key } => match selector {
                Some(selector) => format!(
                    "    await page.locator({}).press({});\n",
                    js_str(selector),
                    js_str(key)
                ),
                None => format!("    await page.keyboard.press({});\n", js_str(key)),
            },
            FlowStep::Select { selector, value } => format!(
                "    await page.selectOption({}, {});\n",
                js_str(selector),
                js_str(value)
            ),
            FlowStep::Check { selector } => {
                format!("    await page.check({});\n", js_str(selector))
            }
            FlowStep::Wait { selector, timeout_ms, state } => {
                let state = match state {
                    WaitState::Visible => "visible",
                    WaitState::Hidden => "hidden",
                    WaitState::Attached => "attached",
                    WaitState::Detached => "detached",
                };
                format!(
                    "    await page.waitForSelector({}, {{ state: '{}', timeout: {} }});\n",
                    js_str(selector),
                    state,
                    timeout_ms
                )
            }
            FlowStep::Sleep { ms } => format!("    await page.waitForTimeout({});\n", ms),
            FlowStep::Assert { selector, visible, text, text_contains, attribute, count } => {
                self.assert_to_js(selector, *visible, text.as_deref(), text_contains.as_deref(), attribute.as_ref(), *count)
            }
            FlowStep::Screenshot { name, full_page } => {
                let path = self.config.artifacts_dir.join(format!("{name}.png"));
                format!(
                    "    await page.screenshot({{ path: {}, fullPage: {} }});\n",
                    js_str(&path.to_string_lossy()),
                    full_page
                )
            }
            FlowStep::Upload { selector, file } => {
                let path = if Path::new(file).is_absolute() {
                    PathBuf::from(file)
                } else {
                    self.config.samples_dir.join(file)
                };
                format!(
                    "    await page.setInputFiles({}, {});\n",
                    js_str(selector),
                    js_str(&path.to_string_lossy())
                )
            }
            FlowStep::ClosePopup { url_contains } => {
                let mut js = String::from(
                    "    if (!lastPopup) { throw new Error('no popup window captured'); }\n",
                );
                js.push_str("    await lastPopup.waitForLoadState('load');\n");
                if let Some(fragment) = url_contains {
                    js.push_str(&format!(
                        "    if (!lastPopup.url().includes({})) {{ throw new Error('unexpected popup url: ' + lastPopup.url()); }}\n",
                        js_str(fragment)
                    ));
                }
                js.push_str("    await lastPopup.close();\n");
                js.push_str("    lastPopup = null;\n");
                js
            }
            FlowStep::StoreSession { key, selector } => format!(
                "    {{\n      const value = (await page.locator({}).innerText()).trim();\n      console.log(JSON.stringify({{ capture: {{ key: {}, value }} }}));\n    }}\n",
                js_str(selector),
                js_str(key)
            ),
            FlowStep::Branch { .. } => {
                return Err(HarnessError::Script(
                    "branch steps must be resolved before script generation".to_string(),
                ));
            }
            FlowStep::Log { message } => {
                format!("    console.log(JSON.stringify({{ note: {} }}));\n", js_str(message))
            }
        };
        Ok(js)
    }

    fn assert_to_js(
        &self,
        selector: &str,
        visible: Option<bool>,
        text: Option<&str>,
        text_contains: Option<&str>,
        attribute: Option<&crate::spec::AttributeAssertion>,
        count: Option<usize>,
    ) -> String {
        let sel = js_str(selector);
        let mut js = String::new();

        let bare = text.is_none() && text_contains.is_none() && attribute.is_none() && count.is_none();
        match visible {
            Some(false) => js.push_str(&format!(
                "    await page.locator({sel}).waitFor({{ state: 'hidden', timeout: {DEFAULT_STEP_TIMEOUT_MS} }});\n"
            )),
            Some(true) => js.push_str(&format!(
                "    await page.locator({sel}).waitFor({{ state: 'visible', timeout: {DEFAULT_STEP_TIMEOUT_MS} }});\n"
            )),
            // An assert with no conditions at all still checks presence.
            None if bare => js.push_str(&format!(
                "    await page.locator({sel}).waitFor({{ state: 'visible', timeout: {DEFAULT_STEP_TIMEOUT_MS} }});\n"
            )),
            None => {}
        }

        if let Some(expected) = text {
            js.push_str(&format!(
                "    {{\n      const actual = (await page.locator({sel}).innerText()).trim();\n      if (actual !== {}) {{ throw new Error('text mismatch at ' + {sel} + ': ' + actual); }}\n    }}\n",
                js_str(expected)
            ));
        }
        if let Some(expected) = text_contains {
            js.push_str(&format!(
                "    {{\n      const actual = (await page.locator({sel}).innerText()).trim();\n      if (!actual.includes({})) {{ throw new Error('text mismatch at ' + {sel} + ': ' + actual); }}\n    }}\n",
                js_str(expected)
            ));
        }
        if let Some(attribute) = attribute {
            let name = js_str(&attribute.name);
            js.push_str(&format!(
                "    {{\n      const value = await page.locator({sel}).getAttribute({name});\n"
            ));
            if let Some(expected) = &attribute.value {
                js.push_str(&format!(
                    "      if (value !== {}) {{ throw new Error('attribute mismatch at ' + {sel} + ': ' + value); }}\n",
                    js_str(expected)
                ));
            } else if let Some(fragment) = &attribute.contains {
                js.push_str(&format!(
                    "      if (value === null || !value.includes({})) {{ throw new Error('attribute mismatch at ' + {sel} + ': ' + value); }}\n",
                    js_str(fragment)
                ));
            } else {
                js.push_str(&format!(
                    "      if (value === null) {{ throw new Error('attribute missing at ' + {sel}); }}\n"
                ));
            }
            js.push_str("    }\n");
        }
        if let Some(expected) = count {
            js.push_str(&format!(
                "    {{\n      const n = await page.locator({sel}).count();\n      if (n !== {expected}) {{ throw new Error('count mismatch at ' + {sel} + ': ' + n); }}\n    }}\n"
            ));
        }
        js
    }

    /// Execute the script via node.
    pub async fn run_script(&self, script: &str) -> HarnessResult<RunOutput> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("flow.js");
        std::fs::write(&script_path, script)?;

        debug!("running Playwright script: {}", script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(node_modules) = &self.config.node_modules_dir {
            cmd.env("NODE_PATH", node_modules);
        }

        let child = cmd
            .spawn()
            .map_err(|e| HarnessError::Script(format!("failed to spawn node: {e}")))?;

        let output = tokio::time::timeout(self.config.run_timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                HarnessError::Timeout(format!(
                    "script run exceeded {:?}",
                    self.config.run_timeout
                ))
            })??;

        Ok(parse_lines(
            &String::from_utf8_lossy(&output.stdout),
            &String::from_utf8_lossy(&output.stderr),
            output.status.success(),
        ))
    }
}

/// A human-readable name for a step, used in progress marks and reports.
pub fn step_name(step: &FlowStep) -> String {
    match step {
        FlowStep::Navigate { url, .. } => format!("navigate:{url}"),
        FlowStep::Click { selector, .. } => format!("click:{selector}"),
        FlowStep::Fill { selector, .. } => format!("fill:{selector}"),
        FlowStep::Press { key, .. } => format!("press:{key}"),
        FlowStep::Select { selector, .. } => format!("select:{selector}"),
        FlowStep::Check { selector } => format!("check:{selector}"),
        FlowStep::Wait { selector, .. } => format!("wait:{selector}"),
        FlowStep::Sleep { ms } => format!("sleep:{ms}ms"),
        FlowStep::Assert { selector, .. } => format!("assert:{selector}"),
        FlowStep::Screenshot { name, .. } => format!("screenshot:{name}"),
        FlowStep::Upload { selector, .. } => format!("upload:{selector}"),
        FlowStep::ClosePopup { .. } => "close_popup".to_string(),
        FlowStep::StoreSession { key, .. } => format!("store:{key}"),
        FlowStep::Branch { field, .. } => format!("branch:{field}"),
        FlowStep::Log { message } => {
            format!("log:{}", message.chars().take(30).collect::<String>())
        }
    }
}

/// Escape a Rust string into a double-quoted JavaScript string literal.
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[derive(Debug, Deserialize)]
struct ScriptLine {
    step: Option<u32>,
    name: Option<String>,
    success: Option<bool>,
    error: Option<String>,
    capture: Option<CaptureLine>,
    sidecar_error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptureLine {
    key: String,
    value: String,
}

/// Fold the JSON-line protocol into a run result. Lines that are not
/// protocol JSON (Playwright warnings, stray logs) are skipped.
fn parse_lines(stdout: &str, stderr: &str, exited_ok: bool) -> RunOutput {
    let mut run = RunOutput {
        success: false,
        steps_started: 0,
        last_step: None,
        error: None,
        captures: Vec::new(),
    };

    for line in stdout.lines().chain(stderr.lines()) {
        let Ok(parsed) = serde_json::from_str::<ScriptLine>(line.trim()) else {
            continue;
        };
        if let Some(step) = parsed.step {
            run.steps_started = run.steps_started.max(step);
        }
        if let Some(name) = parsed.name {
            run.last_step = Some(name);
        }
        if let Some(capture) = parsed.capture {
            run.captures.push(Capture { key: capture.key, value: capture.value });
        }
        if let Some(err) = parsed.sidecar_error {
            warn!("sidecar unreachable during run: {}", err);
        }
        if let Some(success) = parsed.success {
            run.success = success;
        }
        if let Some(error) = parsed.error {
            run.error = Some(error);
        }
    }

    if !exited_ok {
        run.success = false;
        if run.error.is_none() {
            run.error = Some(format!("node exited with failure: {}", stderr.trim()));
        }
    }
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher::{InterceptRule, PatchTarget};

    fn driver() -> PlaywrightDriver {
        let dir = tempfile::tempdir().unwrap();
        PlaywrightDriver::new(DriverConfig {
            base_url: "http://app.local".to_string(),
            artifacts_dir: dir.path().join("shots"),
            storage_state: Some(dir.path().join("state.json")),
            ..Default::default()
        })
        .unwrap()
    }

    fn rule() -> CompiledRule {
        InterceptRule {
            name: "actividad".to_string(),
            url: "/actividad_parametro".to_string(),
            target: PatchTarget::DataIndex(10),
        }
        .compile()
        .unwrap()
    }

    #[test]
    fn test_script_carries_storage_state_and_routes() {
        let rules = vec![rule()];
        let steps = vec![FlowStep::Navigate { url: "/caja".to_string(), wait_for_selector: None }];
        let script = driver()
            .build_script(&ScriptInput {
                steps: &steps,
                rules: &rules,
                sidecar_endpoint: Some("http://127.0.0.1:4000"),
            })
            .unwrap();

        assert!(script.contains("storageState:"));
        assert!(script.contains("page.route(new RegExp(\"/actividad_parametro\")"));
        assert!(script.contains("\"/patch/actividad\""));
        assert!(script.contains("page.goto(baseUrl + \"/caja\")"));
        assert!(script.contains("route.fulfill({ response: upstream, json: await patched.json() })"));
    }

    #[test]
    fn test_rules_without_sidecar_are_rejected() {
        let rules = vec![rule()];
        let err = driver()
            .build_script(&ScriptInput { steps: &[], rules: &rules, sidecar_endpoint: None })
            .unwrap_err();
        assert!(err.to_string().contains("sidecar"));
    }

    #[test]
    fn test_unresolved_branch_is_rejected() {
        let steps = vec![FlowStep::Branch {
            field: "ID_OPERACION".to_string(),
            arms: vec![],
            otherwise: vec![],
        }];
        let err = driver()
            .build_script(&ScriptInput { steps: &steps, rules: &[], sidecar_endpoint: None })
            .unwrap_err();
        assert!(err.to_string().contains("resolved"));
    }

    #[test]
    fn test_selectors_are_escaped() {
        let steps = vec![FlowStep::Click {
            selector: "button[title=\"Guardar 'todo'\"]".to_string(),
            timeout_ms: None,
            opens_popup: false,
        }];
        let script = driver()
            .build_script(&ScriptInput { steps: &steps, rules: &[], sidecar_endpoint: None })
            .unwrap();
        assert!(script.contains(r#"await page.click("button[title=\"Guardar 'todo'\"]""#));
    }

    #[test]
    fn test_popup_click_and_close_pair() {
        let steps = vec![
            FlowStep::Click {
                selector: "#imprimir".to_string(),
                timeout_ms: None,
                opens_popup: true,
            },
            FlowStep::ClosePopup { url_contains: Some("/reporte".to_string()) },
        ];
        let script = driver()
            .build_script(&ScriptInput { steps: &steps, rules: &[], sidecar_endpoint: None })
            .unwrap();
        assert!(script.contains("page.waitForEvent('popup'"));
        assert!(script.contains("lastPopup.close()"));
        assert!(script.contains("lastPopup.url().includes(\"/reporte\")"));
    }

    #[test]
    fn test_parse_lines_collects_progress_and_captures() {
        let stdout = concat!(
            "{\"step\":1,\"name\":\"navigate:/socios\"}\n",
            "Some stray playwright warning\n",
            "{\"step\":2,\"name\":\"fill:#cedula\"}\n",
            "{\"capture\":{\"key\":\"socio.numero\",\"value\":\"18523\"}}\n",
            "{\"success\":true,\"steps\":2}\n",
        );
        let run = parse_lines(stdout, "", true);
        assert!(run.success);
        assert_eq!(run.steps_started, 2);
        assert_eq!(run.last_step.as_deref(), Some("fill:#cedula"));
        assert_eq!(
            run.captures,
            vec![Capture { key: "socio.numero".to_string(), value: "18523".to_string() }]
        );
    }

    #[test]
    fn test_parse_lines_reports_failing_step() {
        let stdout = "{\"step\":3,\"name\":\"assert:#estado\"}\n";
        let stderr = "{\"success\":false,\"step\":3,\"error\":\"text mismatch at #estado: PENDIENTE\"}\n";
        let run = parse_lines(stdout, stderr, false);
        assert!(!run.success);
        assert_eq!(run.steps_started, 3);
        assert_eq!(run.error.as_deref(), Some("text mismatch at #estado: PENDIENTE"));
    }

    #[test]
    fn test_parse_lines_synthesizes_error_on_silent_crash() {
        let run = parse_lines("", "node: not found", false);
        assert!(!run.success);
        assert!(run.error.unwrap().contains("node: not found"));
    }

    #[test]
    fn test_step_names() {
        assert_eq!(
            step_name(&FlowStep::Sleep { ms: 200 }),
            "sleep:200ms"
        );
        assert_eq!(
            step_name(&FlowStep::StoreSession {
                key: "socio.numero".to_string(),
                selector: "#n".to_string()
            }),
            "store:socio.numero"
        );
    }
}
