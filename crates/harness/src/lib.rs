//! Ventanilla E2E harness
//!
//! This crate drives the cooperative back-office web application through a
//! real browser and replays permission/configuration scenarios against it by
//! rewriting selected backend responses in flight:
//! - Parses declarative YAML flow specs (navigation, forms, assertions)
//! - Iterates scenario tables, one isolated browser context per entry
//! - Patches intercepted JSON bodies through a local sidecar so the merge
//!   and guard logic stays in Rust
//! - Reuses and writes back persisted session-state snapshots
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     SuiteRunner (Rust)                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  for each FlowSpec                                           │
//! │    for each ScenarioRecord (serial)                          │
//! │      ├── PatchSidecar::spawn(rules, scenario)                │
//! │      ├── resolve_steps(scenario)   -- branch selection       │
//! │      ├── build_script(...)         -- Playwright JS          │
//! │      ├── run_script(...)           -- node subprocess        │
//! │      └── snapshot write-back of captured values              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  browser ──route──▶ backend                                  │
//! │     │                  │ matching responses                  │
//! │     └──── POST body ──▶ PatchSidecar ──▶ patched body        │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod patcher;
pub mod playwright;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod sidecar;
pub mod spec;

pub use config::AppConfig;
pub use error::{HarnessError, HarnessResult};
pub use runner::SuiteRunner;
pub use scenario::ScenarioRecord;
pub use spec::{FlowSpec, FlowStep};
