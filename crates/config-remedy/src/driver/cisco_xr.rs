//! Cisco IOS-XR driver

use std::sync::Arc;

use crate::error::Result;
use crate::matcher::MatchRule;
use crate::rules::{
    DriverRules, IdempotentCommandsRule, IndentAdjustRule, OrderingRule,
    ParentAllowsDuplicateChildRule, PerLineSubRule, SectionalExitingRule,
    SectionalOverwriteNoNegateRule, SectionalOverwriteRule,
};
use crate::tree::{Config, NodeId, ROOT};

use super::{Driver, Platform, PlatformHooks, rules_idempotent_for};

#[derive(Debug)]
struct CiscoXr;

impl PlatformHooks for CiscoXr {
    fn platform(&self) -> Platform {
        Platform::CiscoXr
    }

    /// ACL entries under `ipv4/ipv6 access-list` sections are idempotent
    /// when they share a leading sequence number.
    fn idempotent_for(
        &self,
        config: &Config,
        node: NodeId,
        target: &Config,
        target_parent: NodeId,
    ) -> Option<NodeId> {
        let parent = config.parent(node);
        if parent != ROOT {
            let parent_text = config.text(parent);
            if parent_text.starts_with("ipv4 access-list ")
                || parent_text.starts_with("ipv6 access-list ")
            {
                let sequence = config.text(node).split(' ').next().unwrap_or_default();
                for &other in target.children(target_parent) {
                    let other_sequence = target.text(other).split(' ').next().unwrap_or_default();
                    if sequence == other_sequence {
                        return Some(other);
                    }
                }
            }
        }
        rules_idempotent_for(config, node, target, target_parent)
    }
}

fn bgp_vrf_neighbor_af(leaf: &str) -> Vec<MatchRule> {
    vec![
        MatchRule::startswith("router bgp"),
        MatchRule::startswith("vrf"),
        MatchRule::startswith("neighbor"),
        MatchRule::startswith("address-family"),
        MatchRule::startswith(leaf),
    ]
}

pub(super) fn driver() -> Result<Driver> {
    let rules = DriverRules {
        sectional_exiting: vec![
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("route-policy")],
                exit_text: "end-policy".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("prefix-set")],
                exit_text: "end-set".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("policy-map")],
                exit_text: "end-policy-map".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("class-map")],
                exit_text: "end-class-map".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("community-set")],
                exit_text: "end-set".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("extcommunity-set")],
                exit_text: "end-set".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("template")],
                exit_text: "end-template".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("interface")],
                exit_text: "root".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("router bgp")],
                exit_text: "root".to_string(),
            },
        ],
        sectional_overwrite: vec![SectionalOverwriteRule {
            match_rules: vec![MatchRule::startswith("template")],
        }],
        sectional_overwrite_no_negate: vec![
            SectionalOverwriteNoNegateRule {
                match_rules: vec![MatchRule::startswith("as-path-set")],
            },
            SectionalOverwriteNoNegateRule {
                match_rules: vec![MatchRule::startswith("prefix-set")],
            },
            SectionalOverwriteNoNegateRule {
                match_rules: vec![MatchRule::startswith("route-policy")],
            },
            SectionalOverwriteNoNegateRule {
                match_rules: vec![MatchRule::startswith("extcommunity-set")],
            },
            SectionalOverwriteNoNegateRule {
                match_rules: vec![MatchRule::startswith("community-set")],
            },
        ],
        ordering: vec![
            OrderingRule {
                match_rules: vec![MatchRule::startswith("vrf ")],
                weight: -200,
            },
            OrderingRule {
                match_rules: vec![MatchRule::startswith("no vrf ")],
                weight: 200,
            },
        ],
        indent_adjust: vec![IndentAdjustRule::new("^\\s*template", "^\\s*end-template")?],
        parent_allows_duplicate_child: vec![ParentAllowsDuplicateChildRule {
            match_rules: vec![MatchRule::startswith("route-policy")],
        }],
        per_line_sub: vec![
            PerLineSubRule::new("^Building configuration.*", "")?,
            PerLineSubRule::new("^Current configuration.*", "")?,
            PerLineSubRule::new("^ntp clock-period .*", "")?,
            PerLineSubRule::new(".*speed.*", "")?,
            PerLineSubRule::new(".*duplex.*", "")?,
            PerLineSubRule::new(".*negotiation auto.*", "")?,
            PerLineSubRule::new(".*parity none.*", "")?,
            PerLineSubRule::new("^end-policy$", " end-policy")?,
            PerLineSubRule::new("^end-set$", " end-set")?,
            PerLineSubRule::new("^end$", "")?,
            PerLineSubRule::new("^\\s*[#!].*", "")?,
        ],
        idempotent_commands: vec![
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("additional-paths selection route-policy"),
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
                    MatchRule::startswith("neighbor-group"),
                    MatchRule::startswith("address-family"),
                    MatchRule::startswith("soft-reconfiguration inbound"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: bgp_vrf_neighbor_af("soft-reconfiguration inbound"),
            },
            IdempotentCommandsRule {
                match_rules: bgp_vrf_neighbor_af("maximum-prefix"),
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("neighbor"),
                    MatchRule::startswith("password"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("vrf"),
                    MatchRule::startswith("neighbor"),
                    MatchRule::startswith("description"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("neighbor"),
                    MatchRule::startswith("description"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router bgp"),
                    MatchRule::startswith("neighbor"),
                    MatchRule::startswith("password"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("area"),
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("cost"),
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
                    MatchRule::startswith("area"),
                    MatchRule::startswith("message-digest-key"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("router ospf"),
                    MatchRule::startswith("max-metric router-lsa"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::equals("l2vpn"), MatchRule::startswith("router-id")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::re_search("logging \\d+.\\d+.\\d+.\\d+ vrf MGMT")?],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("line default"),
                    MatchRule::startswith("access-class ingress"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("line default"),
                    MatchRule::startswith("transport input"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("hostname")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("logging source-interface")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("ipv4 address"),
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
                    MatchRule::equals("line console"),
                    MatchRule::startswith("exec-timeout"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("mpls ldp"),
                    MatchRule::startswith("session protection duration"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::equals("mpls ldp"),
                    MatchRule::startswith("igp sync delay"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface"),
                    MatchRule::startswith("mtu"),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("banner")],
            },
        ],
        ..DriverRules::default()
    };
    Ok(Driver::new(rules, Arc::new(CiscoXr)))
}
