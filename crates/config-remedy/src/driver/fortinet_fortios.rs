//! Fortinet FortiOS driver

use std::sync::Arc;

use crate::error::Result;
use crate::matcher::MatchRule;
use crate::rules::{DriverRules, ParentAllowsDuplicateChildRule, SectionalExitingRule};
use crate::tree::{Config, NodeId};

use super::{Driver, Platform, PlatformHooks, rules_idempotent_for};

#[derive(Debug)]
struct FortinetFortios;

impl PlatformHooks for FortinetFortios {
    fn platform(&self) -> Platform {
        Platform::FortinetFortios
    }

    fn negation_prefix(&self) -> &'static str {
        "unset "
    }

    fn declaration_prefix(&self) -> &'static str {
        "set "
    }

    /// `unset X ...` becomes `set X ...`; `set X ...` becomes `unset X` with only
    /// the keyword retained.
    fn swap_negation(&self, text: &str) -> Result<String> {
        if let Some(stripped) = text.strip_prefix(self.negation_prefix()) {
            return Ok(format!("{}{stripped}", self.declaration_prefix()));
        }
        if let Some(stripped) = text.strip_prefix(self.declaration_prefix()) {
            let keyword = stripped.split_whitespace().next().unwrap_or_default();
            return Ok(format!("{}{keyword}", self.negation_prefix()));
        }
        Ok(text.to_string())
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

/// The keyword of a `set <keyword> ...` statement.
pub(super) fn set_keyword<'a>(text: &'a str, declaration_prefix: &str) -> Option<&'a str> {
    text.strip_prefix(declaration_prefix)
        .and_then(|rest| rest.split_whitespace().next())
}

fn rules() -> DriverRules {
    DriverRules {
        sectional_exiting: vec![
            SectionalExitingRule {
                match_rules: vec![MatchRule::startswith("config ")],
                exit_text: "end".to_string(),
            },
            SectionalExitingRule {
                match_rules: vec![
                    MatchRule::startswith("config "),
                    MatchRule::startswith("edit "),
                ],
                exit_text: "next".to_string(),
            },
        ],
        parent_allows_duplicate_child: vec![ParentAllowsDuplicateChildRule {
            match_rules: vec![MatchRule::startswith("end")],
        }],
        ..DriverRules::default()
    }
}

pub(super) fn driver() -> Result<Driver> {
    Ok(Driver::new(rules(), Arc::new(FortinetFortios)))
}
