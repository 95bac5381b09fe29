//! Patch sidecar
//!
//! A tiny in-process HTTP service, one per scenario run. The generated
//! Playwright route handler posts each intercepted JSON body here; the
//! sidecar applies the rule's patch under the current scenario and returns
//! the (possibly unmodified) body. Keeping the merge on the Rust side means
//! the guard semantics are the same code the unit tests exercise.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};
use crate::patcher::{apply, CompiledRule, PatchOutcome};
use crate::scenario::ScenarioRecord;

/// Per-rule patched/pass-through counters for one scenario run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SidecarStats {
    pub patched: HashMap<String, u64>,
    pub passed: HashMap<String, u64>,
}

impl SidecarStats {
    /// True if no rule ever fired.
    pub fn is_idle(&self) -> bool {
        self.patched.is_empty() && self.passed.is_empty()
    }
}

#[derive(Clone)]
struct SidecarState {
    rules: Arc<HashMap<String, CompiledRule>>,
    scenario: Arc<ScenarioRecord>,
    stats: Arc<Mutex<SidecarStats>>,
}

/// Handle to a running sidecar. Dropping it stops the service.
pub struct PatchSidecar {
    addr: SocketAddr,
    stats: Arc<Mutex<SidecarStats>>,
    task: JoinHandle<()>,
}

impl PatchSidecar {
    /// Bind on an ephemeral localhost port and start serving.
    pub async fn spawn(rules: Vec<CompiledRule>, scenario: ScenarioRecord) -> HarnessResult<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| HarnessError::Sidecar(e.to_string()))?;
        let addr = listener
            .local_addr()
            .map_err(|e| HarnessError::Sidecar(e.to_string()))?;

        let stats = Arc::new(Mutex::new(SidecarStats::default()));
        let state = SidecarState {
            rules: Arc::new(
                rules
                    .into_iter()
                    .map(|rule| (rule.name().to_string(), rule))
                    .collect(),
            ),
            scenario: Arc::new(scenario),
            stats: Arc::clone(&stats),
        };

        let app = Router::new()
            .route("/patch/:rule", post(patch_body))
            .route("/stats", get(stats_snapshot))
            .with_state(state);

        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!("patch sidecar exited: {}", e);
            }
        });

        debug!("patch sidecar listening on {}", addr);
        Ok(Self { addr, stats, task })
    }

    /// Base endpoint the generated script posts to.
    pub fn endpoint(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stats(&self) -> SidecarStats {
        self.stats.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn shutdown(&self) {
        self.task.abort();
    }
}

impl Drop for PatchSidecar {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn patch_body(
    State(state): State<SidecarState>,
    Path(rule_name): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let Some(rule) = state.rules.get(&rule_name) else {
        return (StatusCode::NOT_FOUND, format!("unknown rule: {rule_name}")).into_response();
    };

    let outcome = apply(rule.target(), &state.scenario, &mut body);
    {
        let mut stats = state.stats.lock().unwrap_or_else(|e| e.into_inner());
        let counter = match outcome {
            PatchOutcome::Patched => stats.patched.entry(rule_name).or_default(),
            PatchOutcome::PassThrough(_) => stats.passed.entry(rule_name).or_default(),
        };
        *counter += 1;
    }

    Json(body).into_response()
}

async fn stats_snapshot(State(state): State<SidecarState>) -> Json<SidecarStats> {
    Json(state.stats.lock().unwrap_or_else(|e| e.into_inner()).clone())
}
