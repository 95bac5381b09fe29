//! Response patching for intercepted permission endpoints
//!
//! A rule matches outgoing requests by URL pattern, forwards them to the real
//! backend unchanged, and merges the current scenario's fields into one
//! location of the parsed JSON body. The merge only happens when the target
//! location is an object with more than one own key; anything else passes
//! through byte-for-byte.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HarnessError, HarnessResult};
use crate::scenario::ScenarioRecord;

/// Where inside the intercepted JSON body the scenario fields land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchTarget {
    /// Fixed position in the `data` array. Positionally coupled to backend
    /// response ordering; prefer `data_match` for new rules.
    DataIndex(usize),

    /// The `data` object itself.
    DataRoot,

    /// First element of the `data` array whose `key` field equals `value`.
    DataMatch { key: String, value: Value },
}

/// One interception rule as declared in a flow spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterceptRule {
    /// Rule name, used as the sidecar route and in stats.
    pub name: String,

    /// Regular expression matched against the full request URL,
    /// e.g. `/relation` or `/actividad_parametro`.
    pub url: String,

    pub target: PatchTarget,
}

impl InterceptRule {
    pub fn compile(&self) -> HarnessResult<CompiledRule> {
        let pattern = Regex::new(&self.url).map_err(|source| HarnessError::UrlPattern {
            rule: self.name.clone(),
            source,
        })?;
        Ok(CompiledRule {
            name: self.name.clone(),
            pattern,
            target: self.target.clone(),
        })
    }
}

/// A rule with its URL pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    name: String,
    pattern: Regex,
    target: PatchTarget,
}

impl CompiledRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &PatchTarget {
        &self.target
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches_url(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

/// Why a body was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    /// No `data` member, or the declared index/match does not exist.
    TargetMissing,

    /// The target location is not a JSON object.
    NotAnObject,

    /// The target object has one own key or fewer.
    TooFewKeys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Patched,
    PassThrough(PassReason),
}

/// Merge the scenario's fields into the target location of `body`.
///
/// On `PassThrough` the body is guaranteed unmodified. The envelope around
/// the target (status, sibling members, array ordering) is never touched.
pub fn apply(target: &PatchTarget, scenario: &ScenarioRecord, body: &mut Value) -> PatchOutcome {
    let Some(data) = body.get_mut("data") else {
        return PatchOutcome::PassThrough(PassReason::TargetMissing);
    };

    let slot = match target {
        PatchTarget::DataIndex(index) => match data.as_array_mut() {
            Some(items) => items.get_mut(*index),
            None => None,
        },
        PatchTarget::DataRoot => Some(data),
        PatchTarget::DataMatch { key, value } => match data.as_array_mut() {
            Some(items) => items.iter_mut().find(|item| item.get(key) == Some(value)),
            None => None,
        },
    };

    let Some(slot) = slot else {
        return PatchOutcome::PassThrough(PassReason::TargetMissing);
    };
    let Some(object) = slot.as_object_mut() else {
        return PatchOutcome::PassThrough(PassReason::NotAnObject);
    };
    if object.len() <= 1 {
        return PatchOutcome::PassThrough(PassReason::TooFewKeys);
    }

    for (field, value) in scenario.fields() {
        object.insert(field.clone(), value.clone());
    }
    PatchOutcome::Patched
}
