//! Session-state snapshots
//!
//! The authenticated-session artifact (Playwright storage state: cookies plus
//! per-origin localStorage) is produced by an external login bootstrap and
//! consumed here to start flows already signed in. The harness treats it as
//! opaque: cookies stay raw JSON and unknown members survive a load/save
//! round trip. The only structured access is localStorage, where flows
//! persist small fixture values (e.g. a created member number) for later
//! flows to read.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HarnessResult;

/// Persisted authenticated-browser state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default)]
    pub cookies: Vec<Value>,

    #[serde(default)]
    pub origins: Vec<OriginState>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginState {
    pub origin: String,

    #[serde(default, rename = "localStorage")]
    pub local_storage: Vec<StorageItem>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageItem {
    pub name: String,
    pub value: String,
}

impl SessionSnapshot {
    pub fn load(path: &Path) -> HarnessResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, path: &Path) -> HarnessResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Look a fixture value up by key across every origin.
    pub fn local_value(&self, key: &str) -> Option<&str> {
        self.origins
            .iter()
            .flat_map(|origin| origin.local_storage.iter())
            .find(|item| item.name == key)
            .map(|item| item.value.as_str())
    }

    /// Set (or overwrite) a fixture value under the given origin.
    pub fn set_local_value(&mut self, origin: &str, key: &str, value: String) {
        if let Some(state) = self.origins.iter_mut().find(|o| o.origin == origin) {
            if let Some(item) = state.local_storage.iter_mut().find(|i| i.name == key) {
                item.value = value;
            } else {
                state.local_storage.push(StorageItem { name: key.to_string(), value });
            }
            return;
        }
        self.origins.push(OriginState {
            origin: origin.to_string(),
            local_storage: vec![StorageItem { name: key.to_string(), value }],
            extra: Map::new(),
        });
    }

    /// Which of the given fixture keys are not present in this snapshot.
    pub fn missing_keys(&self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|key| self.local_value(key).is_none())
            .cloned()
            .collect()
    }
}

/// The origin (`scheme://host[:port]`) of a base URL, as Playwright records
/// it in storage state.
pub fn origin_of(base_url: &str) -> String {
    match base_url.find("://") {
        Some(scheme_end) => {
            let rest = &base_url[scheme_end + 3..];
            match rest.find('/') {
                Some(path_start) => base_url[..scheme_end + 3 + path_start].to_string(),
                None => base_url.to_string(),
            }
        }
        None => base_url.trim_end_matches('/').to_string(),
    }
}
