//! Platform drivers
//!
//! A [`Driver`] binds a platform to its declarative rule set and a small set
//! of overridable behaviors: negation swapping, verbatim negation text,
//! idempotent-command pairing and raw-text preprocessing. Platform
//! customization happens by supplying different rule tables or by overriding
//! one of the [`PlatformHooks`] methods; everything else is shared.

mod arista_eos;
mod cisco_ios;
mod cisco_nxos;
mod cisco_xr;
mod fortigate_fortios;
mod fortinet_fortios;
mod generic;
mod hp_comware5;
mod hp_procurve;
mod juniper_junos;
mod vyos;

pub use hp_procurve::expand_interface_range;

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{ConfigRemedyError, Result};
use crate::rules::DriverRules;
use crate::tree::{Config, NodeId};

/// Network operating systems with a registered driver.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Arista EOS
    AristaEos,
    /// Cisco IOS / IOS-XE
    CiscoIos,
    /// Cisco NX-OS
    CiscoNxos,
    /// Cisco IOS-XR
    CiscoXr,
    /// Platform-agnostic parsing with no rules
    Generic,
    /// HP Comware 5
    HpComware5,
    /// HP ProCurve / ArubaOS-Switch
    HpProcurve,
    /// Juniper JunOS
    JuniperJunos,
    /// VyOS
    Vyos,
    /// Fortinet FortiOS
    FortinetFortios,
    /// FortiGate FortiOS
    FortigateFortios,
}

/// Overridable per-platform behaviors. Default methods implement the rule
/// driven behavior shared by most platforms.
pub trait PlatformHooks: fmt::Debug + Send + Sync {
    /// The platform this hook set belongs to.
    fn platform(&self) -> Platform;

    /// Prefix that negates a command.
    fn negation_prefix(&self) -> &'static str {
        "no "
    }

    /// Prefix that declares a command on set-based platforms.
    fn declaration_prefix(&self) -> &'static str {
        ""
    }

    /// Toggle negation of a command line.
    ///
    /// # Errors
    /// Platforms with strict prefixes may reject text carrying neither the
    /// declaration nor the negation prefix.
    fn swap_negation(&self, text: &str) -> Result<String> {
        let negation = self.negation_prefix();
        Ok(match text.strip_prefix(negation) {
            Some(stripped) => stripped.to_string(),
            None => format!("{negation}{text}"),
        })
    }

    /// Rewrite the raw configuration before parsing.
    fn config_preprocessor<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }

    /// Verbatim replacement text for negating `node`, if any rule applies.
    fn negate_with(&self, config: &Config, node: NodeId) -> Option<String> {
        rules_negate_with(config, node)
    }

    /// The single child of `target_parent` that is semantically the same
    /// command as `node` (e.g. two `ip address` statements under one
    /// interface), if any.
    fn idempotent_for(
        &self,
        config: &Config,
        node: NodeId,
        target: &Config,
        target_parent: NodeId,
    ) -> Option<NodeId> {
        rules_idempotent_for(config, node, target, target_parent)
    }
}

/// Rule-table implementation of [`PlatformHooks::negate_with`], available to
/// overriding platforms as their fallback.
#[must_use]
pub fn rules_negate_with(config: &Config, node: NodeId) -> Option<String> {
    config
        .driver()
        .rules()
        .negate_with
        .iter()
        .find(|rule| config.is_lineage_match(node, &rule.match_rules))
        .map(|rule| rule.use_text.clone())
}

/// Rule-table implementation of [`PlatformHooks::idempotent_for`], available
/// to overriding platforms as their fallback.
#[must_use]
pub fn rules_idempotent_for(
    config: &Config,
    node: NodeId,
    target: &Config,
    target_parent: NodeId,
) -> Option<NodeId> {
    let rules = config.driver().rules();
    for avoid in &rules.idempotent_commands_avoid {
        if config.is_lineage_match_stripped(node, &avoid.match_rules) {
            return None;
        }
    }
    for rule in &rules.idempotent_commands {
        if config.is_lineage_match_stripped(node, &rule.match_rules) {
            for &other in target.children(target_parent) {
                if target.is_lineage_match_stripped(other, &rule.match_rules) {
                    return Some(other);
                }
            }
        }
    }
    None
}

/// A platform's rule set plus its hook implementations. Cheap to clone;
/// every tree parsed for the platform shares the same rules.
#[derive(Debug, Clone)]
pub struct Driver {
    rules: Arc<DriverRules>,
    hooks: Arc<dyn PlatformHooks>,
}

impl Driver {
    /// Bind a rule set to a hook implementation.
    #[must_use]
    pub fn new(rules: DriverRules, hooks: Arc<dyn PlatformHooks>) -> Self {
        Self {
            rules: Arc::new(rules),
            hooks,
        }
    }

    /// The driver's platform.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.hooks.platform()
    }

    /// The declarative rule set.
    #[must_use]
    pub fn rules(&self) -> &DriverRules {
        &self.rules
    }

    /// Prefix that negates a command.
    #[must_use]
    pub fn negation_prefix(&self) -> &'static str {
        self.hooks.negation_prefix()
    }

    /// Prefix that declares a command on set-based platforms.
    #[must_use]
    pub fn declaration_prefix(&self) -> &'static str {
        self.hooks.declaration_prefix()
    }

    /// Toggle negation of a command line.
    ///
    /// # Errors
    /// Propagates platform rejections of untoggleable text.
    pub fn swap_negation(&self, text: &str) -> Result<String> {
        self.hooks.swap_negation(text)
    }

    /// Rewrite the raw configuration before parsing.
    #[must_use]
    pub fn config_preprocessor<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.hooks.config_preprocessor(text)
    }

    /// Verbatim negation text for `node`, if a rule or hook supplies one.
    #[must_use]
    pub fn negate_with(&self, config: &Config, node: NodeId) -> Option<String> {
        self.hooks.negate_with(config, node)
    }

    /// Idempotent counterpart of `node` among the children of
    /// `target_parent`, if any.
    #[must_use]
    pub fn idempotent_for(
        &self,
        config: &Config,
        node: NodeId,
        target: &Config,
        target_parent: NodeId,
    ) -> Option<NodeId> {
        self.hooks.idempotent_for(config, node, target, target_parent)
    }
}

/// Build the driver for `platform`.
///
/// # Errors
/// Returns an error if one of the platform's rule patterns fails to compile.
pub fn get_driver(platform: Platform) -> Result<Driver> {
    match platform {
        Platform::AristaEos => arista_eos::driver(),
        Platform::CiscoIos => cisco_ios::driver(),
        Platform::CiscoNxos => cisco_nxos::driver(),
        Platform::CiscoXr => cisco_xr::driver(),
        Platform::Generic => generic::driver(),
        Platform::HpComware5 => hp_comware5::driver(),
        Platform::HpProcurve => hp_procurve::driver(),
        Platform::JuniperJunos => juniper_junos::driver(),
        Platform::Vyos => vyos::driver(),
        Platform::FortinetFortios => fortinet_fortios::driver(),
        Platform::FortigateFortios => fortigate_fortios::driver(),
    }
}

/// Parse a platform name (e.g. `cisco_ios`) into a [`Platform`].
///
/// # Errors
/// Returns an error naming the unknown platform.
pub fn parse_platform(name: &str) -> Result<Platform> {
    Platform::from_str(name)
        .map_err(|_| ConfigRemedyError::UnsupportedPlatform(name.to_string()))
}

impl Config {
    /// Negate the text of `node`: consult `negate_with` rules and hooks,
    /// then `negation_default_when` rules, then fall back to swapping the
    /// negation prefix.
    ///
    /// # Errors
    /// Propagates platform rejections of untoggleable text.
    pub fn negate_node(&mut self, node: NodeId) -> Result<()> {
        let driver = self.driver().clone();
        if let Some(use_text) = driver.negate_with(self, node) {
            self.set_text(node, &use_text);
            return Ok(());
        }
        let default_when = driver
            .rules()
            .negation_default_when
            .iter()
            .any(|rule| self.is_lineage_match(node, &rule.match_rules));
        if default_when {
            let negation = driver.negation_prefix();
            let text = self.text(node);
            let bare = text.strip_prefix(negation).unwrap_or(text);
            let defaulted = format!("default {bare}");
            self.set_text(node, &defaulted);
            return Ok(());
        }
        let swapped = driver.swap_negation(self.text(node))?;
        self.set_text(node, &swapped);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ROOT;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_platform_has_a_driver() {
        for platform in Platform::iter() {
            let driver = get_driver(platform).unwrap();
            assert_eq!(driver.platform(), platform);
        }
    }

    #[test]
    fn test_parse_platform_names() {
        assert_eq!(parse_platform("cisco_ios").unwrap(), Platform::CiscoIos);
        assert_eq!(parse_platform("juniper_junos").unwrap(), Platform::JuniperJunos);
        assert!(parse_platform("net_os_9000").is_err());
    }

    #[test]
    fn test_default_swap_negation() {
        let driver = get_driver(Platform::Generic).unwrap();
        assert_eq!(driver.swap_negation("ip routing").unwrap(), "no ip routing");
        assert_eq!(driver.swap_negation("no ip routing").unwrap(), "ip routing");
    }

    #[test]
    fn test_negate_node_default_when() {
        // Arista marks `logging event link-status` under interfaces as a
        // default-form negation.
        let driver = get_driver(Platform::AristaEos).unwrap();
        let mut config = Config::new(driver);
        let leaf =
            config.add_children_deep(ROOT, ["interface Ethernet1", "logging event link-status"]);
        config.negate_node(leaf).unwrap();
        assert_eq!(config.text(leaf), "default logging event link-status");
    }
}
