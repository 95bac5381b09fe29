//! Scenario records and tables
//!
//! A scenario record is one permission/configuration combination to validate:
//! a flat mapping from backend field names (`ID_OPERACION`, `ES_BOVEDA`, ...)
//! to small literal values. An empty string stands for "absent". Records are
//! defined in a flow spec's scenario table and iterated read-only; each entry
//! gets its own browser context and sidecar.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One permission/configuration combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioRecord(Map<String, Value>);

impl ScenarioRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Human-readable group label derived from the record's values,
    /// e.g. `ES_BOVEDA=1 ID_OPERACION=30`. The empty record labels as
    /// `default`.
    pub fn label(&self) -> String {
        if self.0.is_empty() {
            return "default".to_string();
        }
        self.0
            .iter()
            .map(|(field, value)| format!("{}={}", field, render(value)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Map<String, Value>> for ScenarioRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) if s.is_empty() => "''".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ScenarioRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_label_renders_fields() {
        let scenario = record(json!({ "ES_BOVEDA": 1, "ID_OPERACION": 30 }));
        assert_eq!(scenario.label(), "ES_BOVEDA=1 ID_OPERACION=30");
    }

    #[test]
    fn test_label_marks_absent_values() {
        let scenario = record(json!({ "ID_OPERACION": "" }));
        assert_eq!(scenario.label(), "ID_OPERACION=''");
    }

    #[test]
    fn test_empty_record_labels_as_default() {
        assert_eq!(ScenarioRecord::default().label(), "default");
    }

    #[test]
    fn test_transparent_serde_round_trip() {
        let scenario = record(json!({ "ID_OPERACION": 10 }));
        let yaml = serde_yaml::to_string(&scenario).unwrap();
        let back: ScenarioRecord = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, scenario);
        assert_eq!(back.get("ID_OPERACION"), Some(&json!(10)));
    }
}
