//! Back-office flow registry
//!
//! Each YAML file under `specs/` is one browser flow. File names carry a
//! numeric prefix so `load_all` (which reads in file-name order) runs
//! fixture-producing flows before the flows that `require` their session
//! values; the embedded registry below mirrors that order.

use ventanilla_harness::error::HarnessResult;
use ventanilla_harness::spec::FlowSpec;

/// Embedded YAML sources, in suite execution order.
pub const SOURCES: &[(&str, &str)] = &[
    ("socios-registro", include_str!("../specs/10-socios-registro.yaml")),
    ("ahorros-apertura", include_str!("../specs/20-ahorros-apertura.yaml")),
    ("aportaciones-deposito", include_str!("../specs/21-aportaciones-deposito.yaml")),
    ("certificados-apertura", include_str!("../specs/22-certificados-apertura.yaml")),
    ("caja-operaciones", include_str!("../specs/30-caja-operaciones.yaml")),
    ("caja-boveda", include_str!("../specs/31-caja-boveda.yaml")),
    ("creditos-desembolso", include_str!("../specs/40-creditos-desembolso.yaml")),
    ("pignoracion-constitucion", include_str!("../specs/41-pignoracion-constitucion.yaml")),
    ("anulaciones-transaccion", include_str!("../specs/50-anulaciones-transaccion.yaml")),
    ("reimpresion-comprobante", include_str!("../specs/51-reimpresion-comprobante.yaml")),
];

/// Parse every embedded flow spec, in execution order.
pub fn all() -> HarnessResult<Vec<FlowSpec>> {
    SOURCES.iter().map(|(_, yaml)| FlowSpec::from_yaml(yaml)).collect()
}

/// Parse one embedded flow by name.
pub fn by_name(name: &str) -> Option<HarnessResult<FlowSpec>> {
    SOURCES
        .iter()
        .find(|(flow, _)| *flow == name)
        .map(|(_, yaml)| FlowSpec::from_yaml(yaml))
}
