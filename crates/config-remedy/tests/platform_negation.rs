//! Negation behavior across the set-based and undo-based platforms

use config_remedy::{Config, Platform, WorkflowRemediation, get_driver};
use std::collections::BTreeSet;

fn remediation_text(platform: Platform, running: &str, generated: &str) -> String {
    let driver = get_driver(platform).unwrap();
    let running = Config::parse(driver.clone(), running).unwrap();
    let generated = Config::parse(driver, generated).unwrap();
    let mut workflow = WorkflowRemediation::new(running, generated).unwrap();
    workflow
        .remediation_config_filtered_text(&BTreeSet::new(), &BTreeSet::new())
        .unwrap()
}

#[test]
fn comware_negates_with_undo() {
    let text = remediation_text(
        Platform::HpComware5,
        "test_for_undo\nundo test_for_redo\n",
        "undo test_for_undo\ntest_for_redo\n",
    );
    let lines: BTreeSet<&str> = text.lines().collect();
    assert_eq!(lines, BTreeSet::from(["undo test_for_undo", "test_for_redo"]));
}

#[test]
fn vyos_toggles_set_and_delete() {
    let text = remediation_text(
        Platform::Vyos,
        "set interfaces ethernet eth0 address 10.0.0.1/24\n",
        "set interfaces ethernet eth0 address 10.0.0.2/24\n",
    );
    let lines: BTreeSet<&str> = text.lines().collect();
    assert_eq!(
        lines,
        BTreeSet::from([
            "delete interfaces ethernet eth0 address 10.0.0.1/24",
            "set interfaces ethernet eth0 address 10.0.0.2/24",
        ])
    );
}

#[test]
fn fortigate_unsets_by_keyword() {
    let driver = get_driver(Platform::FortigateFortios).unwrap();
    let running = Config::parse(
        driver.clone(),
        "config system global\n set hostname old-name\n set timezone 26\nend\n",
    )
    .unwrap();
    let generated = Config::parse(
        driver,
        "config system global\n set hostname new-name\nend\n",
    )
    .unwrap();

    let mut workflow = WorkflowRemediation::new(running, generated).unwrap();
    let text = workflow
        .remediation_config_filtered_text(&BTreeSet::new(), &BTreeSet::new())
        .unwrap();

    let lines: BTreeSet<&str> = text.lines().collect();
    assert_eq!(
        lines,
        BTreeSet::from([
            "config system global",
            "  unset timezone",
            "  set hostname new-name",
        ])
    );
}

#[test]
fn fortinet_idempotent_set_keyword() {
    let driver = get_driver(Platform::FortinetFortios).unwrap();
    let running = Config::parse(
        driver.clone(),
        "config system global\n set hostname old-name\nend\n",
    )
    .unwrap();
    let generated = Config::parse(
        driver,
        "config system global\n set hostname new-name\nend\n",
    )
    .unwrap();

    let delta = running.config_to_get_to(&generated).unwrap();
    // the keyword match replaces the value without an unset
    assert_eq!(
        delta.lines(false),
        vec!["config system global", "  set hostname new-name"]
    );
}
