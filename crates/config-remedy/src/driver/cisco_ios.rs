//! Cisco IOS / IOS-XE driver

use std::sync::Arc;

use crate::error::Result;
use crate::matcher::MatchRule;
use crate::rules::{
    DriverRules, IdempotentCommandsRule, NegateWithRule, OrderingRule, PerLineSubRule,
    ReferencePattern, SectionalExitingRule, UnusedObjectRule,
};
use crate::tree::{Config, ROOT};

use super::{Driver, Platform, PlatformHooks};

#[derive(Debug)]
struct CiscoIos;

impl PlatformHooks for CiscoIos {
    fn platform(&self) -> Platform {
        Platform::CiscoIos
    }
}

/// If there are sequence numbers in an IPv6 ACL, remove them.
fn rm_ipv6_acl_sequence_numbers(config: &mut Config) {
    let rule = MatchRule::startswith("ipv6 access-list ");
    let acls: Vec<_> = config.get_children(ROOT, &rule).collect();
    for acl in acls {
        for entry in config.children(acl).to_vec() {
            if config.text(entry).starts_with("sequence") {
                let rest = config
                    .text(entry)
                    .split_whitespace()
                    .skip(2)
                    .collect::<Vec<_>>()
                    .join(" ");
                config.set_text(entry, &rest);
            }
        }
    }
}

fn remove_ipv4_acl_remarks(config: &mut Config) {
    let rule = MatchRule::startswith("ip access-list ");
    let acls: Vec<_> = config.get_children(ROOT, &rule).collect();
    for acl in acls {
        for entry in config.children(acl).to_vec() {
            if config.text(entry).starts_with("remark") {
                config.delete(entry);
            }
        }
    }
}

/// Add IPv4 ACL sequence numbers.
fn add_acl_sequence_numbers(config: &mut Config) {
    for acl in config.children(ROOT).to_vec() {
        if !config.text(acl).starts_with("ip access-list") {
            continue;
        }
        let mut sequence_number = 10;
        for entry in config.children(acl).to_vec() {
            let text = config.text(entry);
            if text.starts_with("permit") || text.starts_with("deny") {
                let numbered = format!("{sequence_number} {text}");
                config.set_text(entry, &numbered);
                sequence_number += 10;
            }
        }
    }
}

fn unused_object_rules() -> Result<Vec<UnusedObjectRule>> {
    Ok(vec![
        UnusedObjectRule::new(
            "acl",
            vec![MatchRule::startswith_any([
                "ip access-list extended ",
                "ip access-list standard ",
            ])],
            vec![
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("interface "),
                        MatchRule::startswith("ip access-group "),
                    ],
                    r"ip access-group\s+(\S+)",
                    "interface-applied",
                )?,
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("line "),
                        MatchRule::startswith("access-class "),
                    ],
                    r"access-class\s+(\S+)",
                    "line-applied",
                )?,
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("route-map "),
                        MatchRule::startswith("match ip address "),
                    ],
                    r"match ip address\s+(\S+)",
                    "route-map-match",
                )?,
            ],
            "no ip access-list {acl_type} {name}",
        )
        .with_weight(150),
        UnusedObjectRule::new(
            "route-map",
            vec![MatchRule::startswith("route-map ")],
            vec![
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("router "),
                        MatchRule::contains("route-map "),
                    ],
                    r"route-map\s+(\S+)",
                    "router-applied",
                )?,
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("interface "),
                        MatchRule::startswith("ip policy route-map "),
                    ],
                    r"ip policy route-map\s+(\S+)",
                    "pbr",
                )?,
            ],
            "no route-map {name}",
        )
        .with_weight(130),
        UnusedObjectRule::new(
            "prefix-list",
            vec![MatchRule::startswith("ip prefix-list ")],
            vec![
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("router "),
                        MatchRule::contains("prefix-list "),
                    ],
                    r"prefix-list\s+(\S+)",
                    "router-applied",
                )?,
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("route-map "),
                        MatchRule::startswith("match ip address prefix-list "),
                    ],
                    r"match ip address prefix-list\s+(\S+)",
                    "route-map-match",
                )?,
            ],
            "no ip prefix-list {name}",
        )
        .with_weight(140),
    ])
}

pub(super) fn driver() -> Result<Driver> {
    let rules = DriverRules {
        negate_with: vec![NegateWithRule {
            match_rules: vec![MatchRule::startswith("logging console ")],
            use_text: "logging console debugging".to_string(),
        }],
        sectional_exiting: vec![
            SectionalExitingRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("template peer-policy"),
                ],
                exit_text: "exit-peer-policy".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("template peer-session"),
                ],
                exit_text: "exit-peer-session".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("address-family"),
                ],
                exit_text: "exit-address-family".to_string(),
            },
        ],
        ordering: vec![
            OrderingRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("switchport mode "),
                ],
                weight: -10,
            },
            OrderingRule {
                match_rules: vec![MatchRule::startswith("no vlan filter")],
                weight: 200,
            },
            OrderingRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("no shutdown"),
                ],
                weight: 200,
            },
            OrderingRule {
                match_rules: vec![
                    MatchRule::startswith("aaa group server tacacs+ "),
                    MatchRule::startswith("no server "),
                ],
                weight: 10,
            },
            OrderingRule {
                match_rules: vec![MatchRule::startswith("no tacacs-server ")],
                weight: 10,
            },
        ],
        per_line_sub: vec![
            PerLineSubRule::new("^Building configuration.*", "")?,
            PerLineSubRule::new("^Current configuration.*", "")?,
            PerLineSubRule::new("^! Last configuration change.*", "")?,
            PerLineSubRule::new("^! NVRAM config last updated.*", "")?,
            PerLineSubRule::new("^ntp clock-period .*", "")?,
            PerLineSubRule::new("^version.*", "")?,
            PerLineSubRule::new("^ logging event link-status$", "")?,
            PerLineSubRule::new("^ logging event subif-link-status$", "")?,
            PerLineSubRule::new("^\\s*ipv6 unreachables disable$", "")?,
            PerLineSubRule::new("^end$", "")?,
            PerLineSubRule::new("^\\s*[#!].*", "")?,
            PerLineSubRule::new("^ no ip address", "")?,
            PerLineSubRule::new("^ exit-peer-policy", "")?,
            PerLineSubRule::new("^ exit-peer-session", "")?,
            PerLineSubRule::new("^ exit-address-family", "")?,
            PerLineSubRule::new("^crypto key generate rsa general-keys.*$", "")?,
        ],
        idempotent_commands: vec![
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("vlan"), MatchRule::startswith("name")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("description "),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("ip address "),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("switchport mode "),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("authentication host-mode "),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("authentication event server dead action authorize vlan "),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("errdisable recovery interval ")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::re_search(r"^(no )?logging console.*")?],
            },
        ],
        post_load_callbacks: vec![
            rm_ipv6_acl_sequence_numbers,
            remove_ipv4_acl_remarks,
            add_acl_sequence_numbers,
        ],
        unused_object_rules: unused_object_rules()?,
        ..DriverRules::default()
    };
    Ok(Driver::new(rules, Arc::new(CiscoIos)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::get_driver;

    #[test]
    fn test_acl_sequence_numbering() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let mut config = Config::new(driver);
        let acl = config.add_child(ROOT, "ip access-list extended TEST");
        config.add_child(acl, "permit tcp any any eq 80");
        config.add_child(acl, "deny ip any any");

        add_acl_sequence_numbers(&mut config);

        let texts: Vec<_> = config
            .children(acl)
            .iter()
            .map(|&c| config.text(c).to_string())
            .collect();
        assert_eq!(texts, vec!["10 permit tcp any any eq 80", "20 deny ip any any"]);
    }

    #[test]
    fn test_ipv6_acl_sequence_stripping() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let mut config = Config::new(driver);
        let acl = config.add_child(ROOT, "ipv6 access-list TEST6");
        let entry = config.add_child(acl, "sequence 10 permit ipv6 any any");

        rm_ipv6_acl_sequence_numbers(&mut config);
        assert_eq!(config.text(entry), "permit ipv6 any any");
    }

    #[test]
    fn test_remark_removal() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let mut config = Config::new(driver);
        let acl = config.add_child(ROOT, "ip access-list extended TEST");
        config.add_child(acl, "remark a note");
        config.add_child(acl, "permit ip any any");

        remove_ipv4_acl_remarks(&mut config);
        assert_eq!(config.children(acl).len(), 1);
    }
}
