//! Declarative YAML flow specifications
//!
//! A flow spec describes one back-office browser flow: the steps to drive,
//! the interception rules to install, and the scenario table to iterate.
//! Branch steps select, per scenario, exactly one of a small set of mutually
//! exclusive step sequences (permission-denied dialog vs. the full
//! operation). Coverage is checked at load time: a scenario no arm covers is
//! a validation error, not a silent runtime fallthrough.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::error::{HarnessError, HarnessResult};
use crate::patcher::{CompiledRule, InterceptRule};
use crate::scenario::ScenarioRecord;

/// A complete browser flow parsed from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowSpec {
    /// Unique name for this flow.
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,

    /// Tags for filtering flows.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Viewport size for the browser.
    #[serde(default = "default_viewport")]
    pub viewport: Viewport,

    /// Session-snapshot fixture keys that must exist before this flow runs.
    #[serde(default)]
    pub requires: Vec<String>,

    /// Interception rules for permission/config endpoints.
    #[serde(default)]
    pub intercept: Vec<InterceptRule>,

    /// Scenario table. Empty means a single unparameterized run.
    #[serde(default)]
    pub scenarios: Vec<ScenarioRecord>,

    /// Steps to execute in order.
    pub steps: Vec<FlowStep>,
}

fn default_viewport() -> Viewport {
    Viewport { width: 1280, height: 720 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// A single step in a flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FlowStep {
    /// Navigate to a URL (relative to base).
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Click an element. `opens_popup` captures the report/PDF window the
    /// click spawns so a later `close_popup` step can assert on and close it.
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
        #[serde(default)]
        opens_popup: bool,
    },

    /// Fill an input field.
    Fill {
        selector: String,
        value: String,
        #[serde(default)]
        clear_first: bool,
    },

    /// Press a key, either on an element or on the page.
    Press {
        #[serde(default)]
        selector: Option<String>,
        key: String,
    },

    /// Select an option from a dropdown.
    Select {
        selector: String,
        value: String,
    },

    /// Check a checkbox.
    Check {
        selector: String,
    },

    /// Wait for an element to reach a state.
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Fixed pause. Prefer `wait`; kept for the rare animation the
    /// application gives no completion signal for.
    Sleep {
        ms: u64,
    },

    /// Assert something about an element.
    Assert {
        selector: String,
        #[serde(default)]
        visible: Option<bool>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        text_contains: Option<String>,
        #[serde(default)]
        attribute: Option<AttributeAssertion>,
        #[serde(default)]
        count: Option<usize>,
    },

    /// Take a screenshot into the artifacts directory.
    Screenshot {
        name: String,
        #[serde(default)]
        full_page: bool,
    },

    /// Set a file input, e.g. the stand-in signature image. Relative paths
    /// resolve against the configured samples directory.
    Upload {
        selector: String,
        file: String,
    },

    /// Wait for the popup captured by the last `opens_popup` click and close
    /// it, optionally checking its URL first.
    ClosePopup {
        #[serde(default)]
        url_contains: Option<String>,
    },

    /// Capture an element's text into the session snapshot under `key`.
    StoreSession {
        key: String,
        selector: String,
    },

    /// Scenario-conditioned branch: the arm whose `equals` matches the
    /// scenario's `field` value runs; `otherwise` catches the rest.
    Branch {
        field: String,
        arms: Vec<BranchArm>,
        #[serde(default)]
        otherwise: Vec<FlowStep>,
    },

    /// Log a message (for debugging).
    Log {
        message: String,
    },
}

fn default_wait_timeout() -> u64 {
    10_000
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeAssertion {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub contains: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchArm {
    pub equals: Value,
    pub steps: Vec<FlowStep>,
}

impl FlowSpec {
    /// Parse a flow spec from a YAML string.
    pub fn from_yaml(yaml: &str) -> HarnessResult<Self> {
        serde_yaml::from_str(yaml).map_err(HarnessError::from)
    }

    /// Parse a flow spec from a YAML file.
    pub fn from_file(path: &Path) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load all flow specs from a directory, in file-name order.
    pub fn load_all(dir: &Path) -> HarnessResult<Vec<Self>> {
        let mut specs = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            let spec = Self::from_file(entry.path())?;
            specs.push(spec);
        }

        Ok(specs)
    }

    /// Filter specs by tag.
    pub fn filter_by_tag<'a>(specs: &'a [Self], tag: &str) -> Vec<&'a Self> {
        specs.iter().filter(|s| s.tags.contains(&tag.to_string())).collect()
    }

    /// Compile every interception rule.
    pub fn compile_rules(&self) -> HarnessResult<Vec<CompiledRule>> {
        self.intercept.iter().map(InterceptRule::compile).collect()
    }

    /// The scenario table to iterate: the declared table, or a single empty
    /// record for unparameterized flows.
    pub fn scenario_table(&self) -> Vec<ScenarioRecord> {
        if self.scenarios.is_empty() {
            vec![ScenarioRecord::default()]
        } else {
            self.scenarios.clone()
        }
    }

    /// Flatten all branches for one scenario into a linear step list.
    pub fn resolve_steps(&self, scenario: &ScenarioRecord) -> HarnessResult<Vec<FlowStep>> {
        let mut out = Vec::new();
        resolve_into(&self.name, &self.steps, scenario, &mut out)?;
        Ok(out)
    }

    /// Load-time checks: rules compile, branches have a scenario table to
    /// discriminate on, and every scenario is covered by every branch.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.steps.is_empty() {
            return Err(HarnessError::SpecValidation(format!(
                "flow {}: no steps",
                self.name
            )));
        }
        self.compile_rules()?;

        if contains_branch(&self.steps) && self.scenarios.is_empty() {
            return Err(HarnessError::SpecValidation(format!(
                "flow {}: branch steps require a scenario table",
                self.name
            )));
        }
        for scenario in &self.scenario_table() {
            self.resolve_steps(scenario)?;
        }
        Ok(())
    }
}

fn resolve_into(
    flow: &str,
    steps: &[FlowStep],
    scenario: &ScenarioRecord,
    out: &mut Vec<FlowStep>,
) -> HarnessResult<()> {
    for step in steps {
        match step {
            FlowStep::Branch { field, arms, otherwise } => {
                let selected = arms
                    .iter()
                    .find(|arm| scenario.get(field) == Some(&arm.equals))
                    .map(|arm| &arm.steps);
                match selected {
                    Some(arm_steps) => resolve_into(flow, arm_steps, scenario, out)?,
                    None if !otherwise.is_empty() => {
                        resolve_into(flow, otherwise, scenario, out)?;
                    }
                    None => {
                        return Err(HarnessError::SpecValidation(format!(
                            "flow {flow}: branch on {field} has no arm for scenario [{}]",
                            scenario.label()
                        )));
                    }
                }
            }
            other => out.push(other.clone()),
        }
    }
    Ok(())
}

fn contains_branch(steps: &[FlowStep]) -> bool {
    steps.iter().any(|step| matches!(step, FlowStep::Branch { .. }))
}
