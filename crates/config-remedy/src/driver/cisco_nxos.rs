//! Cisco NX-OS driver

use std::sync::Arc;

use crate::error::Result;
use crate::matcher::MatchRule;
use crate::rules::{
    DriverRules, IdempotentCommandsAvoidRule, IdempotentCommandsRule, NegateWithRule,
    NegationDefaultWhenRule, PerLineSubRule,
};

use super::{Driver, Platform, PlatformHooks};

#[derive(Debug)]
struct CiscoNxos;

impl PlatformHooks for CiscoNxos {
    fn platform(&self) -> Platform {
        Platform::CiscoNxos
    }
}

pub(super) fn driver() -> Result<Driver> {
    let rules = DriverRules {
        per_line_sub: vec![
            PerLineSubRule::new("^Building configuration.*", "")?,
            PerLineSubRule::new("^Current configuration.*", "")?,
            PerLineSubRule::new("^ntp clock-period .*", "")?,
            PerLineSubRule::new("^snmp-server location  ", "snmp-server location ")?,
            PerLineSubRule::new("^version.*", "")?,
            PerLineSubRule::new("^boot (system|kickstart) .*", "")?,
            PerLineSubRule::new("!.*", "")?,
        ],
        idempotent_commands_avoid: vec![IdempotentCommandsAvoidRule {
            match_rules: vec![
                MatchRule::startswith("interface"),
                MatchRule::re_search("ip address.*secondary")?,
            ],
        }],
        idempotent_commands: vec![
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("power redundancy-mode")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("cli alias name wr ")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("aaa authentication login console")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("port-channel load-balance")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hostname ")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("ip tftp source-interface")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("ip telnet source-interface")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("ip tacacs source-interface")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("logging source-interface")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hardware access-list tcam region ifacl")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hardware access-list tcam region vacl")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hardware access-list tcam region qos")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hardware access-list tcam region racl")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hardware access-list tcam region ipv6-racl")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hardware access-list tcam region e-ipv6-racl")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hardware access-list tcam region l3qos")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("maximum-paths"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("log-adjacency-changes"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("maximum-paths"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("log-adjacency-changes"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("maximum-paths"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("maximum-paths"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("template"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("send-community"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::re_search("^hsrp \\d+")?,
                    MatchRule::startswith("ip"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::re_search("^hsrp \\d+")?,
                    MatchRule::startswith("priority"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::re_search("^hsrp \\d+")?,
                    MatchRule::startswith("authentication md5 key-string"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("ip address"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("duplex"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("speed"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("switchport mode"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("switchport access vlan"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("switchport trunk native vlan"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("switchport trunk allowed vlan"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("udld port"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("ip ospf cost"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("ipv6 link-local"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("ospfv3 cost"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("mtu"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("line console"),
                    MatchRule::startswith("exec-timeout"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("line vty"),
                    MatchRule::startswith("transport input"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("line vty"),
                    MatchRule::startswith("ipv6 access-class"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("line vty"),
                    MatchRule::startswith("access-class"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("bgp router-id"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::re_search("neighbor \\S+ description")?,
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("router-id"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("ipv6 router ospf"),
                    MatchRule::startswith("router-id"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("ipv6 router ospf"),
                    MatchRule::startswith("log-adjacency-changes"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("mac address-table aging-time")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("snmp-server community")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("snmp-server location")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("vpc domain"),
                    MatchRule::startswith("role priority"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("banner")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("username admin password 5")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("policy-map type control-plane copp-system-policy"),
                    MatchRule::startswith("class"),
                    MatchRule::startswith("police"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("neighbor"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("soft-reconfiguration inbound"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("neighbor"),
                    MatchRule::startswith("password"),
                ],
            },
        ],
        negation_default_when: vec![
            NegationDefaultWhenRule {
                match_rules: vec![MatchRule::startswith("interface"), {
                    let mut rule = MatchRule::startswith("ip ospf bfd");
                    rule.re_search = Some(regex::Regex::new(
                        "standby \\d+ authentication md5 key-string",
                    )?);
                    rule
                }],
            },
            NegationDefaultWhenRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("neighbor"),
                    MatchRule::startswith("address-family"),
                    MatchRule::equals("send-community"),
                ],
            },
            NegationDefaultWhenRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::contains("ip ospf passive-interface"),
                ],
            },
            NegationDefaultWhenRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::contains("ospfv3 passive-interface"),
                ],
            },
        ],
        negate_with: vec![
            NegateWithRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("maximum-paths ibgp"),
                ],
                use_text: "default maximum-paths ibgp".to_string(),
            },
            NegateWithRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("maximum-paths ibgp"),
                ],
                use_text: "default maximum-paths ibgp".to_string(),
            },
            NegateWithRule {
                match_rules: vec![
                    MatchRule::equals("line vty"),
                    MatchRule::startswith("session-limit"),
                ],
                use_text: "session-limit 32".to_string(),
            },
        ],
        ..DriverRules::default()
    };
    Ok(Driver::new(rules, Arc::new(CiscoNxos)))
}
