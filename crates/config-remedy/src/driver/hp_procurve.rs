//! HP ProCurve / ArubaOS-Switch driver
//!
//! ProCurve running configs model vlan membership and port-access ranges in
//! a condensed form; post-load fixups expand those onto individual
//! interfaces so remediation can work line by line.

use regex::Regex;
use std::sync::Arc;
use tracing::warn;

use crate::error::{ConfigRemedyError, Result};
use crate::matcher::MatchRule;
use crate::rules::{
    DriverRules, IdempotentCommandsRule, NegateWithRule, OrderingRule, PerLineSubRule,
};
use crate::tree::{Config, NodeId, ROOT};

use super::{Driver, Platform, PlatformHooks, rules_idempotent_for, rules_negate_with};

#[derive(Debug)]
struct HpProcurve {
    /// `(expression, word count)` pairs identifying commands that replace
    /// one another when their leading words agree.
    idempotent_patterns: Vec<(Regex, usize)>,
    /// `(expression, word count, prepend, append)` rewrites for negations
    /// that reset a value instead of using the `no ` form.
    negate_patterns: Vec<(Regex, usize, &'static str, &'static str)>,
}

impl PlatformHooks for HpProcurve {
    fn platform(&self) -> Platform {
        Platform::HpProcurve
    }

    fn idempotent_for(
        &self,
        config: &Config,
        node: NodeId,
        target: &Config,
        target_parent: NodeId,
    ) -> Option<NodeId> {
        if let Some(found) = rules_idempotent_for(config, node, target, target_parent) {
            return Some(found);
        }
        if config.parent(node) != ROOT {
            return None;
        }
        let text = config.text(node);
        for (expression, end_index) in &self.idempotent_patterns {
            if expression.is_match(text) {
                let prefix = text
                    .split_whitespace()
                    .take(*end_index)
                    .collect::<Vec<_>>()
                    .join(" ");
                for &other in target.children(target_parent) {
                    if target.text(other).starts_with(&prefix) {
                        return Some(other);
                    }
                }
            }
        }
        None
    }

    fn negate_with(&self, config: &Config, node: NodeId) -> Option<String> {
        if let Some(result) = rules_negate_with(config, node) {
            return Some(result);
        }
        if config.parent(node) != ROOT {
            return None;
        }
        let text = config.text(node);
        for (expression, end_index, prepend, append) in &self.negate_patterns {
            if expression.is_match(text) {
                let words: Vec<&str> = text.split_whitespace().take(*end_index).collect();
                let mut parts: Vec<&str> = Vec::new();
                if !prepend.is_empty() {
                    parts.push(prepend);
                }
                parts.extend(words);
                if !append.is_empty() {
                    parts.push(append);
                }
                return Some(parts.join(" "));
            }
        }
        None
    }
}

/// Expand interface ranges like `1/2-1/5,2/22-2/45,Trk1-Trk3`.
///
/// # Errors
/// Returns an error when a range expands to duplicate interface names or a
/// lettered port range is inconsistent.
pub fn expand_interface_range(range: &str) -> Result<Vec<String>> {
    let mut interfaces: Vec<String> = Vec::new();
    for segment in range.split(',') {
        expand_range_segment(segment, &mut interfaces)?;
    }
    let unique: std::collections::BTreeSet<&String> = interfaces.iter().collect();
    if unique.len() != interfaces.len() {
        return Err(ConfigRemedyError::Parse(format!(
            "interface range `{range}` expands to duplicate names"
        )));
    }
    Ok(interfaces)
}

fn expand_range_segment(segment: &str, interfaces: &mut Vec<String>) -> Result<()> {
    let Some((start, stop)) = segment.split_once('-') else {
        interfaces.push(segment.to_string());
        return Ok(());
    };

    let mut port_prefix = String::new();
    let (member, start_port, end_port) = if let Some(start_number) = start.strip_prefix("Trk") {
        (
            "Trk".to_string(),
            start_number.to_string(),
            stop.strip_prefix("Trk").unwrap_or(stop).to_string(),
        )
    } else if let Some((member, start_number)) = start.split_once('/') {
        let mut start_number = start_number.to_string();
        let mut end_number = stop.rsplit('/').next().unwrap_or(stop).to_string();
        // account for lettered ports such as `5/A1`
        for letter in ["A", "B", "C", "D"] {
            if let Some(rest) = start_number.strip_prefix(letter) {
                port_prefix = letter.to_string();
                start_number = rest.to_string();
                end_number = end_number
                    .strip_prefix(letter)
                    .ok_or_else(|| {
                        ConfigRemedyError::Parse(format!(
                            "range `{segment}` mixes lettered and unlettered ports"
                        ))
                    })?
                    .to_string();
                break;
            }
        }
        (format!("{member}/"), start_number, end_number)
    } else {
        (String::new(), start.to_string(), stop.to_string())
    };

    let start: u32 = start_port
        .parse()
        .map_err(|_| ConfigRemedyError::Parse(format!("bad interface range `{segment}`")))?;
    let end: u32 = end_port
        .parse()
        .map_err(|_| ConfigRemedyError::Parse(format!("bad interface range `{segment}`")))?;
    for port in start..=end {
        interfaces.push(format!("{member}{port_prefix}{port}"));
    }
    Ok(())
}

/// Expand the interface ranges present in `aaa port-access` commands onto
/// one command per interface.
fn fixup_aaa_port_access(config: &mut Config) {
    let rule = match MatchRule::re_search(r"^aaa port-access (authenticator|mac-based) [0-9,/\-Ttrk]+$") {
        Ok(rule) => rule,
        Err(_) => return,
    };
    let matches: Vec<NodeId> = config.get_children(ROOT, &rule).collect();
    for node in matches {
        let words: Vec<String> = config
            .text(node)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if !words[3].contains('-') && !words[3].contains(',') {
            continue;
        }
        match expand_interface_range(&words[3]) {
            Ok(names) => {
                for name in names {
                    config.add_child(ROOT, &format!("aaa port-access {} {name}", words[2]));
                }
                config.delete(node);
            }
            Err(error) => warn!(%error, "skipping unexpandable port-access range"),
        }
    }
}

/// Move vlan `tagged`/`untagged` membership onto the interface sections.
fn fixup_vlan_membership(config: &mut Config) {
    let vlan_rule = MatchRule::startswith("vlan ");
    let vlans: Vec<NodeId> = config.get_children(ROOT, &vlan_rule).collect();
    for vlan in vlans {
        let vlan_id = config
            .text(vlan)
            .split_whitespace()
            .nth(1)
            .unwrap_or_default()
            .to_string();

        for (member_kind, line) in [("untagged ", "untagged vlan"), ("tagged ", "tagged vlan")] {
            let rule = MatchRule::startswith(member_kind);
            let Some(membership) = config.get_child(vlan, &rule) else {
                continue;
            };
            let range = config
                .text(membership)
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            match expand_interface_range(&range) {
                Ok(mut names) => {
                    names.sort();
                    for name in names {
                        config.add_children_deep(
                            ROOT,
                            [format!("interface {name}"), format!("{line} {vlan_id}")],
                        );
                    }
                    config.delete(membership);
                }
                Err(error) => warn!(%error, "skipping unexpandable vlan membership range"),
            }
        }

        let no_untagged = MatchRule::startswith("no untagged ");
        if let Some(membership) = config.get_child(vlan, &no_untagged) {
            config.delete(membership);
        }
    }
}

pub(super) fn driver() -> Result<Driver> {
    let hooks = HpProcurve {
        idempotent_patterns: vec![
            (
                Regex::new(r"^aaa port-access authenticator \S+ (tx-period|supplicant-timeout) \d+$")?,
                5,
            ),
            (Regex::new(r"^aaa port-access \S+ auth-(priority|order) ")?, 4),
            (Regex::new(r"^aaa port-access authenticator \S+ client-limit \d+$")?, 5),
            (
                Regex::new(r"^aaa port-access mac-based \S+ (addr-limit|logoff-period) \d+$")?,
                5,
            ),
            (Regex::new(r"^aaa port-access \S+ critical-auth user-role ")?, 5),
            (Regex::new(r"^radius-server host \S+ encrypted-key \S+$")?, 4),
        ],
        negate_patterns: vec![
            (
                Regex::new(r"^aaa port-access authenticator \S+ (tx-period|supplicant-timeout) \d+$")?,
                5,
                "",
                "30",
            ),
            (Regex::new(r"^aaa port-access authenticator \S+ client-limit \d+$")?, 5, "no", ""),
            (Regex::new(r"^aaa port-access mac-based \S+ addr-limit \d+$")?, 5, "", "1"),
            (Regex::new(r"^aaa port-access mac-based \S+ logoff-period \d+$")?, 5, "", "300"),
            (Regex::new(r"^aaa port-access \S+ critical-auth user-role ")?, 5, "no", ""),
            (Regex::new(r"^tacacs-server host \S+ ")?, 3, "no", ""),
            (Regex::new(r"^radius-server host \S+ time-window \d+$")?, 4, "", "300"),
            (
                Regex::new(r"^radius-server host \S+ time-window plus-or-minus-time-window$")?,
                4,
                "",
                "positive-time-window",
            ),
            (Regex::new(r"^radius-server host \S+ encrypted-key \S+$")?, 3, "no", ""),
        ],
    };

    let rules = DriverRules {
        negate_with: vec![
            NegateWithRule {
                match_rules: vec![MatchRule::startswith("interface "), MatchRule::equals("disable")],
                use_text: "enable".to_string(),
            },
            NegateWithRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("name "),
                ],
                use_text: "no name".to_string(),
            },
        ],
        per_line_sub: vec![
            PerLineSubRule::new(r"^\s*[#!].*", "")?,
            PerLineSubRule::new("^; .*", "")?,
            PerLineSubRule::new("^Running configuration:*", "")?,
        ],
        idempotent_commands: vec![
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("aaa authentication port-access eap-radius")],
            },
            IdempotentCommandsRule {
                match_rules: vec![MatchRule::startswith("aaa accounting update periodic ")],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("untagged vlan "),
                ],
            },
            IdempotentCommandsRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith("name "),
                ],
            },
        ],
        ordering: vec![
            // auth-priority removal needs to happen before auth-order
            OrderingRule {
                match_rules: vec![MatchRule::re_search(r"^no aaa port-access \S+ auth-priority")?],
                weight: -10,
            },
            // `no aaa port-access authenticator 5/43` needs to come before
            // its narrower variants such as `... client-limit`
            OrderingRule {
                match_rules: vec![MatchRule::re_search(r"^no aaa port-access authenticator \S+$")?],
                weight: -10,
            },
            OrderingRule {
                match_rules: vec![MatchRule::re_search(r"^aaa server-group radius \S+ host ")?],
                weight: 10,
            },
            // add vlans before removing to avoid falling back to untagged vlan 1
            OrderingRule {
                match_rules: vec![
                    MatchRule::startswith("interface "),
                    MatchRule::startswith_any(["no tagged vlan ", "no untagged vlan "]),
                ],
                weight: 10,
            },
            OrderingRule {
                match_rules: vec![MatchRule::startswith("no tacacs-server ")],
                weight: 10,
            },
            OrderingRule {
                match_rules: vec![MatchRule::re_search(r"^no radius-server host \S+ dyn-authorization$")?],
                weight: 15,
            },
            OrderingRule {
                match_rules: vec![MatchRule::re_search(r"^no aaa server-group radius \S+ host ")?],
                weight: 20,
            },
            // a server group cannot be left empty, so host removal goes last
            OrderingRule {
                match_rules: vec![MatchRule::re_search(r"^no radius-server host \S+$")?],
                weight: 30,
            },
        ],
        post_load_callbacks: vec![fixup_aaa_port_access, fixup_vlan_membership],
        ..DriverRules::default()
    };
    Ok(Driver::new(rules, Arc::new(hooks)))
}
