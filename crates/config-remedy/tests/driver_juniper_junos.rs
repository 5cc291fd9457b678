//! Juniper JunOS remediation scenarios

use config_remedy::{Config, Platform, WorkflowRemediation, get_driver};
use std::collections::BTreeSet;

fn driver() -> config_remedy::Driver {
    get_driver(Platform::JuniperJunos).unwrap()
}

#[test]
fn basic_set_remediation() {
    let running = Config::parse_from_lines_fast(driver(), ["set vlans A vlan-id 2"]);
    let generated = Config::parse_from_lines_fast(driver(), ["set vlans B vlan-id 3"]);

    let mut workflow = WorkflowRemediation::new(running, generated).unwrap();
    let text = workflow
        .remediation_config_filtered_text(&BTreeSet::new(), &BTreeSet::new())
        .unwrap();

    let lines: BTreeSet<&str> = text.lines().collect();
    assert_eq!(
        lines,
        BTreeSet::from(["delete vlans A vlan-id 2", "set vlans B vlan-id 3"])
    );
}

#[test]
fn brace_input_matches_set_input() {
    let brace = Config::parse(
        driver(),
        "vlans {\n    A {\n        vlan-id 2;\n    }\n}\n",
    )
    .unwrap();
    let flat = Config::parse(driver(), "set vlans A vlan-id 2\n").unwrap();
    assert_eq!(brace, flat);
}

#[test]
fn brace_remediation() {
    let running = Config::parse(
        driver(),
        "vlans {\n    A {\n        vlan-id 2;\n    }\n}\n",
    )
    .unwrap();
    let generated = Config::parse(
        driver(),
        "vlans {\n    B {\n        vlan-id 3;\n    }\n}\n",
    )
    .unwrap();

    let mut workflow = WorkflowRemediation::new(running, generated).unwrap();
    let text = workflow
        .remediation_config_filtered_text(&BTreeSet::new(), &BTreeSet::new())
        .unwrap();

    let lines: BTreeSet<&str> = text.lines().collect();
    assert_eq!(
        lines,
        BTreeSet::from(["delete vlans A vlan-id 2", "set vlans B vlan-id 3"])
    );
}

#[test]
fn swap_negation_toggles_set_and_delete() {
    let d = driver();
    assert_eq!(
        d.swap_negation("set vlans A vlan-id 2").unwrap(),
        "delete vlans A vlan-id 2"
    );
    assert_eq!(
        d.swap_negation("delete vlans A vlan-id 2").unwrap(),
        "set vlans A vlan-id 2"
    );
}

#[test]
fn swap_negation_rejects_bare_text() {
    let d = driver();
    let error = d.swap_negation("vlans A vlan-id 2").unwrap_err();
    assert!(error.to_string().contains("did not start with"));
}
