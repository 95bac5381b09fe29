//! Registry-wide validation of the embedded flow specs

use std::collections::HashSet;

use test_case::test_case;
use ventanilla_harness::spec::{FlowSpec, FlowStep};

fn flow(name: &str) -> FlowSpec {
    ventanilla_flows::by_name(name)
        .unwrap_or_else(|| panic!("flow {name} not in registry"))
        .unwrap()
}

#[test]
fn every_flow_parses_and_validates() {
    let specs = ventanilla_flows::all().unwrap();
    assert_eq!(specs.len(), ventanilla_flows::SOURCES.len());
    for spec in &specs {
        spec.validate()
            .unwrap_or_else(|e| panic!("{} failed validation: {e}", spec.name));
    }
}

#[test]
fn registry_names_match_spec_names_and_are_unique() {
    let mut seen = HashSet::new();
    for (name, yaml) in ventanilla_flows::SOURCES {
        let spec = FlowSpec::from_yaml(yaml).unwrap();
        assert_eq!(&spec.name, name, "registry name differs from spec name");
        assert!(seen.insert(spec.name.clone()), "duplicate flow name: {}", spec.name);
    }
}

#[test]
fn fixture_producers_run_before_consumers() {
    let specs = ventanilla_flows::all().unwrap();
    let mut produced: HashSet<String> = HashSet::new();
    for spec in &specs {
        for key in &spec.requires {
            assert!(
                produced.contains(key),
                "{} requires {key} before any earlier flow stores it",
                spec.name
            );
        }
        collect_stored_keys(&spec.steps, &mut produced);
    }
}

fn collect_stored_keys(steps: &[FlowStep], out: &mut HashSet<String>) {
    for step in steps {
        match step {
            FlowStep::StoreSession { key, .. } => {
                out.insert(key.clone());
            }
            FlowStep::Branch { arms, otherwise, .. } => {
                for arm in arms {
                    collect_stored_keys(&arm.steps, out);
                }
                collect_stored_keys(otherwise, out);
            }
            _ => {}
        }
    }
}

#[test]
fn session_placeholders_are_declared_as_requirements() {
    for (name, yaml) in ventanilla_flows::SOURCES {
        let spec = FlowSpec::from_yaml(yaml).unwrap();
        for key in placeholder_keys(yaml) {
            assert!(
                spec.requires.contains(&key),
                "{name} uses {{{{session.{key}}}}} but does not declare it in requires"
            );
        }
    }
}

fn placeholder_keys(yaml: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let mut rest = yaml;
    while let Some(start) = rest.find("{{session.") {
        rest = &rest[start + "{{session.".len()..];
        if let Some(end) = rest.find("}}") {
            keys.push(rest[..end].to_string());
            rest = &rest[end..];
        } else {
            break;
        }
    }
    keys
}

// The permission matrix: '' and 10 must surface the denial modal, only 30
// runs the full teller flow.
#[test_case(0, true ; "absent permission is denied")]
#[test_case(1, true ; "wrong permission is denied")]
#[test_case(2, false ; "granted permission runs the operation")]
fn caja_scenarios_select_the_expected_arm(index: usize, denial: bool) {
    let spec = flow("caja-operaciones");
    let scenario = &spec.scenarios[index];
    let steps = spec.resolve_steps(scenario).unwrap();

    let has_denial = steps.iter().any(|step| matches!(
        step,
        FlowStep::Assert { selector, .. } if selector.contains("permiso-denegado")
    ));
    let has_teller_form = steps.iter().any(|step| matches!(
        step,
        FlowStep::Fill { selector, .. } if selector.contains("caja-monto-inicial")
    ));

    assert_eq!(has_denial, denial);
    assert_eq!(has_teller_form, !denial);
}

#[test]
fn caja_rules_compile_and_match_only_their_endpoints() {
    let spec = flow("caja-operaciones");
    let rules = spec.compile_rules().unwrap();
    assert_eq!(rules.len(), 1);
    assert!(rules[0].matches_url("http://app.local/api/actividad_parametro?caja=1"));
    assert!(!rules[0].matches_url("http://app.local/api/socios"));

    let spec = flow("caja-boveda");
    let rules = spec.compile_rules().unwrap();
    assert!(rules[0].matches_url("http://app.local/api/relation"));
    assert!(!rules[0].matches_url("http://app.local/api/relaciones-x"));
}

#[test]
fn boveda_scenarios_gate_the_transfer() {
    let spec = flow("caja-boveda");
    let transfers: Vec<bool> = spec
        .scenarios
        .iter()
        .map(|scenario| {
            spec.resolve_steps(scenario)
                .unwrap()
                .iter()
                .any(|step| matches!(
                    step,
                    FlowStep::Fill { selector, .. } if selector.contains("boveda-monto")
                ))
        })
        .collect();
    assert_eq!(transfers, vec![false, true]);
}

#[test]
fn report_flows_close_their_popups() {
    for name in ["creditos-desembolso", "reimpresion-comprobante"] {
        let spec = flow(name);
        let opens = spec.steps.iter().any(|step| {
            matches!(step, FlowStep::Click { opens_popup: true, .. })
        });
        let closes = spec.steps.iter().any(|step| matches!(step, FlowStep::ClosePopup { .. }));
        assert!(opens && closes, "{name} must capture and close its report window");
    }
}

#[test]
fn flows_prefer_condition_waits_over_sleeps() {
    for (name, yaml) in ventanilla_flows::SOURCES {
        let spec = FlowSpec::from_yaml(yaml).unwrap();
        assert!(
            !spec.steps.iter().any(|step| matches!(step, FlowStep::Sleep { .. })),
            "{name} uses a fixed sleep; synchronize on an element instead"
        );
    }
}
