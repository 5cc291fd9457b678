//! Cisco NX-OS remediation scenarios

use config_remedy::{Config, Platform, ROOT, get_driver};

fn parse(text: &str) -> Config {
    Config::parse(get_driver(Platform::CiscoNxos).unwrap(), text).unwrap()
}

#[test]
fn interface_mtu_is_replaced_not_negated() {
    let running = parse("interface Ethernet1/1\n mtu 1500\n");
    let generated = parse("interface Ethernet1/1\n mtu 9216\n");

    let delta = running.config_to_get_to(&generated).unwrap();
    let interface = delta.child_by_text(ROOT, "interface Ethernet1/1").unwrap();
    let texts: Vec<&str> = delta
        .children(interface)
        .iter()
        .map(|&c| delta.text(c))
        .collect();
    assert_eq!(texts, vec!["mtu 9216"]);
}

#[test]
fn switchport_access_vlan_is_idempotent() {
    let running = parse("interface Ethernet1/2\n switchport access vlan 10\n");
    let generated = parse("interface Ethernet1/2\n switchport access vlan 20\n");

    let delta = running.config_to_get_to(&generated).unwrap();
    let interface = delta.child_by_text(ROOT, "interface Ethernet1/2").unwrap();
    let texts: Vec<&str> = delta
        .children(interface)
        .iter()
        .map(|&c| delta.text(c))
        .collect();
    assert_eq!(texts, vec!["switchport access vlan 20"]);
}

#[test]
fn line_vty_transport_input_is_idempotent() {
    let running = parse("line vty\n transport input telnet\n");
    let generated = parse("line vty\n transport input ssh\n");

    let delta = running.config_to_get_to(&generated).unwrap();
    let line = delta.child_by_text(ROOT, "line vty").unwrap();
    let texts: Vec<&str> = delta.children(line).iter().map(|&c| delta.text(c)).collect();
    assert_eq!(texts, vec!["transport input ssh"]);
}

#[test]
fn secondary_addresses_avoid_idempotent_treatment() {
    let running = parse("interface Ethernet1/3\n ip address 10.0.0.1/24 secondary\n");
    let generated = parse("interface Ethernet1/3\n ip address 10.0.1.1/24 secondary\n");

    let delta = running.config_to_get_to(&generated).unwrap();
    let interface = delta.child_by_text(ROOT, "interface Ethernet1/3").unwrap();
    let texts: Vec<&str> = delta
        .children(interface)
        .iter()
        .map(|&c| delta.text(c))
        .collect();
    // the avoid rule forces an explicit negation alongside the addition
    assert_eq!(
        texts,
        vec![
            "no ip address 10.0.0.1/24 secondary",
            "ip address 10.0.1.1/24 secondary",
        ]
    );
}

#[test]
fn session_limit_rolls_back_via_negate_with() {
    let running = parse("line vty\n");
    let generated = parse("line vty\n session-limit 16\n");

    let delta = generated.config_to_get_to(&running).unwrap();
    let line = delta.child_by_text(ROOT, "line vty").unwrap();
    let texts: Vec<&str> = delta.children(line).iter().map(|&c| delta.text(c)).collect();
    assert_eq!(texts, vec!["session-limit 32"]);
}
