//! Cisco IOS remediation scenarios

use config_remedy::{Config, Platform, ROOT, WorkflowRemediation, get_driver};
use std::collections::BTreeSet;

fn parse(text: &str) -> Config {
    Config::parse(get_driver(Platform::CiscoIos).unwrap(), text).unwrap()
}

#[test]
fn interface_address_is_replaced_not_negated() {
    let running = parse("interface Vlan2\n ip address 10.0.0.1 255.255.255.0\n");
    let generated = parse("interface Vlan2\n ip address 10.0.0.2 255.255.255.0\n");

    let mut workflow = WorkflowRemediation::new(running, generated).unwrap();
    let text = workflow
        .remediation_config_filtered_text(&BTreeSet::new(), &BTreeSet::new())
        .unwrap();

    assert_eq!(
        text,
        "interface Vlan2\n  ip address 10.0.0.2 255.255.255.0"
    );
}

#[test]
fn logging_console_rolls_back_via_negate_with() {
    let running = parse("");
    let generated = parse("logging console emergencies\n");

    let mut workflow = WorkflowRemediation::new(running.clone(), generated.clone()).unwrap();
    let remediation = workflow.remediation_config().unwrap();
    assert_eq!(remediation.lines(false), vec!["logging console emergencies"]);

    // the applied remediation yields the generated state
    let future = running.future(remediation);
    assert_eq!(future.lines(false), generated.lines(false));

    // reverting from that state uses the platform's negate-with rule
    let rollback = workflow.rollback_config().unwrap();
    assert_eq!(rollback.lines(false), vec!["logging console debugging"]);
}

#[test]
fn section_removal_counts_removed_lines() {
    let running = parse("vlan 3\n name switch_mgmt\n");
    let generated = parse("");

    let delta = running.config_to_get_to(&generated).unwrap();
    let removal = delta.child_by_text(ROOT, "no vlan 3").unwrap();
    assert!(delta.comments(removal).contains("removes 2 lines"));
}

#[test]
fn ordering_rules_defer_no_shutdown() {
    let running = parse("interface Vlan2\n shutdown\n");
    let generated = parse("interface Vlan2\n switchport mode access\n no shutdown\n");

    let mut workflow = WorkflowRemediation::new(running, generated).unwrap();
    let text = workflow
        .remediation_config_filtered_text(&BTreeSet::new(), &BTreeSet::new())
        .unwrap();

    // switchport mode first (weight -10), `no shutdown` last (weight 200)
    assert_eq!(
        text,
        "interface Vlan2\n  switchport mode access\n  no shutdown"
    );
}

#[test]
fn bgp_remediation_emits_sectional_exits() {
    let running = parse("router bgp 65000\n");
    let generated = parse(
        "router bgp 65000\n address-family ipv4\n  network 10.0.0.0 mask 255.255.255.0\n exit-address-family\n",
    );

    let delta = running
        .config_to_get_to(&generated)
        .unwrap();
    assert_eq!(
        delta.lines(true),
        vec![
            "router bgp 65000",
            "  address-family ipv4",
            "    network 10.0.0.0 mask 255.255.255.0",
            "    exit-address-family",
        ]
    );
}

#[test]
fn acl_remediation_uses_injected_sequence_numbers() {
    let running = parse("ip access-list extended EDGE\n permit tcp any any eq 80\n");
    let generated = parse("ip access-list extended EDGE\n permit tcp any any eq 443\n");

    let delta = running.config_to_get_to(&generated).unwrap();
    let acl = delta.child_by_text(ROOT, "ip access-list extended EDGE").unwrap();
    let texts: Vec<&str> = delta.children(acl).iter().map(|&c| delta.text(c)).collect();
    assert_eq!(
        texts,
        vec!["no 10 permit tcp any any eq 80", "10 permit tcp any any eq 443"]
    );
}

#[test]
fn banner_differences_are_detected() {
    let running = parse("banner motd ^C\nold banner\n^C\nhostname test\n");
    let generated = parse("banner motd ^C\nnew banner\n^C\nhostname test\n");

    let delta = running.config_to_get_to(&generated).unwrap();
    let texts: Vec<&str> = delta
        .children(ROOT)
        .iter()
        .map(|&c| delta.text(c))
        .collect();
    assert!(texts.iter().any(|t| t.starts_with("no banner motd")));
    assert!(texts.iter().any(|t| t.contains("new banner")));
}
