//! Universal properties of the tree, differ and workflow

use config_remedy::{Config, Platform, ROOT, WorkflowRemediation, get_driver};
use std::collections::BTreeSet;

const RUNNING: &str = "hostname device01\ninterface Vlan2\n ip address 10.0.0.1 255.255.255.0\n shutdown\nvlan 2\n name old\nntp server 10.0.0.5\n";
const GENERATED: &str = "hostname device01\ninterface Vlan2\n ip address 10.0.0.2 255.255.255.0\n no shutdown\nvlan 3\n name new\nlogging buffered 64000\n";

fn parse(text: &str) -> Config {
    Config::parse(get_driver(Platform::CiscoIos).unwrap(), text).unwrap()
}

#[test]
fn dump_round_trips() {
    let config = parse(RUNNING);
    let restored =
        Config::from_dump(get_driver(Platform::CiscoIos).unwrap(), &config.dump()).unwrap();
    assert_eq!(config, restored);
}

#[test]
fn remediation_dump_round_trips_with_metadata() {
    let running = parse(RUNNING);
    let generated = parse(GENERATED);
    let delta = running.config_to_get_to(&generated).unwrap();

    let restored =
        Config::from_dump(get_driver(Platform::CiscoIos).unwrap(), &delta.dump()).unwrap();
    assert_eq!(delta, restored);

    // new_in_config and comments survive the round trip
    let vlan = restored.child_by_text(ROOT, "vlan 3").unwrap();
    assert!(restored.new_in_config(vlan));
    assert!(restored.comments(vlan).contains("new section"));
}

#[test]
fn diff_against_self_is_empty() {
    let config = parse(RUNNING);
    let delta = config.config_to_get_to(&config).unwrap();
    assert!(delta.children(ROOT).is_empty());
}

#[test]
fn future_of_remediation_covers_generated() {
    let running = parse(RUNNING);
    let generated = parse(GENERATED);
    let delta = running.config_to_get_to(&generated).unwrap();

    let projection = running.future(&delta);
    let projected_lines: BTreeSet<String> = projection.lines(false).into_iter().collect();
    for line in generated.lines(false) {
        // transitional negations in the generated config are not state
        if line.trim_start().starts_with("no ") {
            continue;
        }
        assert!(projected_lines.contains(&line), "future is missing `{line}`");
    }
}

#[test]
fn rollback_equals_reverse_diff() {
    let running = parse(RUNNING);
    let generated = parse(GENERATED);

    let mut workflow = WorkflowRemediation::new(running.clone(), generated.clone()).unwrap();
    let mut expected = generated.config_to_get_to(&running).unwrap();
    expected.set_order_weight();

    assert_eq!(workflow.rollback_config().unwrap(), &expected);

    // line-for-line, not just structurally
    assert_eq!(
        workflow.rollback_config().unwrap().lines(false),
        expected.lines(false)
    );
}

#[test]
fn branch_tag_writes_propagate_and_reads_union() {
    let mut config = parse(RUNNING);
    let interface = config.child_by_text(ROOT, "interface Vlan2").unwrap();

    let tags: BTreeSet<String> = ["aaa".to_string()].into();
    config.set_tags(interface, &tags);
    for &leaf in config.children(interface) {
        assert_eq!(config.stored_tags(leaf), &tags);
    }

    // push a second tag onto one leaf; the branch read is the union
    let first_leaf = config.children(interface)[0];
    config.add_tags(first_leaf, &["bbb".to_string()].into());
    let derived: BTreeSet<String> = config.tags(interface).into_iter().flatten().collect();
    assert_eq!(derived, ["aaa".to_string(), "bbb".to_string()].into());
}

#[test]
fn emission_order_is_weight_then_insertion() {
    let driver = get_driver(Platform::Generic).unwrap();
    let mut config = Config::new(driver);
    let a = config.add_child(ROOT, "alpha");
    let b = config.add_child(ROOT, "bravo");
    let c = config.add_child(ROOT, "charlie");
    let d = config.add_child(ROOT, "delta");
    config.set_order_weight_of(b, 400);
    config.set_order_weight_of(d, 400);

    // equal weights keep insertion order; lower weights go first
    assert_eq!(config.sorted_children(ROOT), vec![b, d, a, c]);
}

#[test]
fn merged_trees_report_instance_counts() {
    let device_a = parse("snmp-server community public ro\n");
    let device_b = parse("snmp-server community public ro\n");

    let mut aggregate = Config::new(get_driver(Platform::CiscoIos).unwrap());
    aggregate.merge([&device_a, &device_b]);

    let node = aggregate
        .child_by_text(ROOT, "snmp-server community public ro")
        .unwrap();
    assert_eq!(aggregate.instances(node).len(), 2);
    assert_eq!(
        aggregate
            .node(node)
            .cisco_style_text(config_remedy::TextStyle::Merged(None)),
        "snmp-server community public ro !2 instances"
    );
}
