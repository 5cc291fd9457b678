//! Unused-object analysis against the builtin Cisco IOS rules

use config_remedy::{Config, Platform, UnusedObjectAnalyzer, get_driver};

fn parse(text: &str) -> Config {
    Config::parse(get_driver(Platform::CiscoIos).unwrap(), text).unwrap()
}

#[test]
fn unused_acl_is_reported_with_removal_command() {
    let config = parse(
        "ip access-list extended UNUSED_ACL\n permit ip any any\nip access-list extended USED_ACL\n deny ip any any\ninterface GigabitEthernet0/1\n ip access-group USED_ACL in\n",
    );

    let analysis = UnusedObjectAnalyzer::new(&config).analyze();

    let unused: Vec<&str> = analysis.unused_objects["acl"]
        .iter()
        .map(|object| object.name.as_str())
        .collect();
    assert_eq!(unused, vec!["UNUSED_ACL"]);
    assert!(
        analysis
            .removal_commands
            .contains(&"no ip access-list extended UNUSED_ACL".to_string())
    );
}

#[test]
fn acl_metadata_distinguishes_standard_and_extended() {
    let config = parse(
        "ip access-list standard MGMT_ONLY\n permit 10.0.0.0 0.0.0.255\nip access-list extended EDGE_IN\n permit ip any any\n",
    );

    let analysis = UnusedObjectAnalyzer::new(&config).analyze();
    assert!(
        analysis
            .removal_commands
            .contains(&"no ip access-list standard MGMT_ONLY".to_string())
    );
    assert!(
        analysis
            .removal_commands
            .contains(&"no ip access-list extended EDGE_IN".to_string())
    );
}

#[test]
fn route_map_references_count_as_usage() {
    let config = parse(
        "route-map RM_OUT permit 10\n set local-preference 200\nroute-map RM_UNUSED permit 10\n set local-preference 100\nrouter bgp 65000\n neighbor 10.0.0.1 route-map RM_OUT out\n",
    );

    let analysis = UnusedObjectAnalyzer::new(&config).analyze();
    let unused: Vec<&str> = analysis.unused_objects["route-map"]
        .iter()
        .map(|object| object.name.as_str())
        .collect();
    assert_eq!(unused, vec!["RM_UNUSED"]);
    assert!(
        analysis
            .removal_commands
            .contains(&"no route-map RM_UNUSED".to_string())
    );
}

#[test]
fn object_type_filter_limits_the_analysis() {
    let config = parse(
        "ip access-list extended UNUSED_ACL\n permit ip any any\nroute-map RM_UNUSED permit 10\n set local-preference 100\n",
    );

    let analysis = UnusedObjectAnalyzer::new(&config)
        .filtered(&["route-map".to_string()])
        .analyze();

    assert!(!analysis.unused_objects.contains_key("acl"));
    assert_eq!(analysis.unused_objects["route-map"].len(), 1);
}
