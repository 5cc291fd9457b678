//! Arista EOS driver

use std::sync::Arc;

use crate::error::Result;
use crate::matcher::MatchRule;
use crate::rules::{
    DriverRules, IdempotentCommandsRule, NegationDefaultWhenRule, PerLineSubRule,
    SectionalExitingRule,
};

use super::{Driver, Platform, PlatformHooks};

#[derive(Debug)]
struct AristaEos;

impl PlatformHooks for AristaEos {
    fn platform(&self) -> Platform {
        Platform::AristaEos
    }
}

pub(super) fn driver() -> Result<Driver> {
    let rules = DriverRules {
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
        ],
        idempotent_commands: vec![
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hostname")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("logging source-interface")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("ip address"),
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
                    MatchRule::startswith("access-class"),
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
                    MatchRule::startswith("interface"),
                    MatchRule::re_search("standby \\d+ (priority|authentication md5)")?,
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
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("router-id"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("max-lsa"),
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
                    MatchRule::startswith("ipv6 router ospf"),
                    MatchRule::startswith("router-id"),
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
                    MatchRule::startswith("ipv6 router ospf"),
                    MatchRule::startswith("log-adjacency-changes"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::re_search("neighbor \\S+ description")?,
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("snmp-server community")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("snmp-server location")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("line con 0"),
                    MatchRule::startswith("exec-timeout"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("ip ospf message-digest-key"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("logging buffered")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("tacacs-server key")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("logging facility")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("vlan internal allocation policy")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("username admin")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("snmp-server user")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("banner")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("ntp source")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("management"),
                    MatchRule::startswith("idle-timeout"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith(
                    "aaa authentication enable default group tacacs+",
                )],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("control-plane"),
                    MatchRule::equals("ip access-group CPP in"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("mtu"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("snmp-server source-interface")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("ip tftp client source-interface")],
            },
        ],
        negation_default_when: vec![NegationDefaultWhenRule {
            match_rules: vec![
                MatchRule::startswith("interface"),
                MatchRule::equals("logging event link-status"),
            ],
        }],
        ..DriverRules::default()
    };
    Ok(Driver::new(rules, Arc::new(AristaEos)))
}
