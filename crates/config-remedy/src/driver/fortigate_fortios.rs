//! FortiGate FortiOS driver
//!
//! Same command family as Fortinet FortiOS, but negation is expressed
//! through the `negate_with` hook so that `set description ...` negates to a
//! clean `unset description` while other lines fall back to the rule tables.

use std::sync::Arc;

use crate::error::Result;
use crate::matcher::MatchRule;
use crate::rules::{DriverRules, SectionalExitingRule};
use crate::tree::{Config, NodeId};

use super::fortinet_fortios::set_keyword;
use super::{Driver, Platform, PlatformHooks, rules_idempotent_for, rules_negate_with};

#[derive(Debug)]
struct FortigateFortios;

impl PlatformHooks for FortigateFortios {
    fn platform(&self) -> Platform {
        Platform::FortigateFortios
    }

    fn negation_prefix(&self) -> &'static str {
        "unset "
    }

    fn declaration_prefix(&self) -> &'static str {
        "set "
    }

    /// Negate `set <keyword> ...` as `unset <keyword>`.
    fn negate_with(&self, config: &Config, node: NodeId) -> Option<String> {
        if let Some(keyword) = set_keyword(config.text(node), self.declaration_prefix()) {
            return Some(format!("{}{keyword}", self.negation_prefix()));
        }
        rules_negate_with(config, node)
    }

    /// Two `set` statements are idempotent when they set the same keyword.
    fn idempotent_for(
        &self,
        config: &Config,
        node: NodeId,
        target: &Config,
        target_parent: NodeId,
    ) -> Option<NodeId> {
        let keyword = set_keyword(config.text(node), self.declaration_prefix());
        if let Some(keyword) = keyword {
            for &other in target.children(target_parent) {
                if set_keyword(target.text(other), self.declaration_prefix()) == Some(keyword) {
                    return Some(other);
                }
            }
        }
        rules_idempotent_for(config, node, target, target_parent)
    }
}

pub(super) fn driver() -> Result<Driver> {
    let rules = DriverRules {
        sectional_exiting: vec![
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("config")],
                exit_text: "end".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![
                    MatchRule::startswith("config"),
                    MatchRule::startswith("edit"),
                ],
                exit_text: "next".to_string(),
            },
        ],
        ..DriverRules::default()
    };
    Ok(Driver::new(rules, Arc::new(FortigateFortios)))
}
