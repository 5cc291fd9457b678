//! Remediation workflow façade
//!
//! Coordinates the parser, differ and emitter for the common flow: given a
//! running and a generated configuration, build the remediation that aligns
//! the device with the generated state and the rollback that reverses it.

use std::collections::BTreeSet;

use crate::analysis::UnusedObjectAnalyzer;
use crate::error::{ConfigRemedyError, Result};
use crate::rules::TagRule;
use crate::tree::{Config, TextStyle};

/// Manages configuration workflows for one device by comparing its running
/// and generated configurations.
#[derive(Debug)]
pub struct WorkflowRemediation {
    /// The configuration currently active on the device
    pub running_config: Config,
    /// The target configuration for the device
    pub generated_config: Config,
    remediation_config: Option<Config>,
    rollback_config: Option<Config>,
}

impl WorkflowRemediation {
    /// Pair a running and a generated configuration.
    ///
    /// # Errors
    /// Returns an error when the two configurations use different drivers.
    pub fn new(running_config: Config, generated_config: Config) -> Result<Self> {
        if running_config.platform() != generated_config.platform() {
            return Err(ConfigRemedyError::MismatchedDrivers {
                left: running_config.platform(),
                right: generated_config.platform(),
            });
        }
        Ok(Self {
            running_config,
            generated_config,
            remediation_config: None,
            rollback_config: None,
        })
    }

    fn build_remediation(&mut self) -> Result<&mut Config> {
        let remediation = match self.remediation_config.take() {
            Some(remediation) => remediation,
            None => {
                let mut remediation = self
                    .running_config
                    .config_to_get_to(&self.generated_config)?;
                remediation.set_order_weight();
                remediation
            }
        };
        Ok(self.remediation_config.insert(remediation))
    }

    /// The commands that bring the device in line with the generated
    /// configuration. Built once and cached.
    ///
    /// # Errors
    /// Propagates negation failures from the platform driver.
    pub fn remediation_config(&mut self) -> Result<&Config> {
        self.build_remediation().map(|config| &*config)
    }

    /// The commands that revert the device from the generated configuration
    /// back to the running one. Built once and cached.
    ///
    /// # Errors
    /// Propagates negation failures from the platform driver.
    pub fn rollback_config(&mut self) -> Result<&Config> {
        let rollback = match self.rollback_config.take() {
            Some(rollback) => rollback,
            None => {
                let mut rollback = self
                    .generated_config
                    .config_to_get_to(&self.running_config)?;
                rollback.set_order_weight();
                rollback
            }
        };
        Ok(self.rollback_config.insert(rollback))
    }

    /// Tag parts of the remediation matching each rule's lineage, for
    /// selective application later.
    ///
    /// # Errors
    /// Propagates remediation-building failures.
    pub fn apply_remediation_tag_rules(&mut self, tag_rules: &[TagRule]) -> Result<()> {
        let remediation = self.build_remediation()?;
        for tag_rule in tag_rules {
            for node in remediation.get_children_deep(&tag_rule.match_rules) {
                remediation.add_tags(node, &tag_rule.apply_tags);
            }
        }
        Ok(())
    }

    /// The remediation rendered as text, filtered by include/exclude tags;
    /// unfiltered when both sets are empty.
    ///
    /// # Errors
    /// Propagates remediation-building failures.
    pub fn remediation_config_filtered_text(
        &mut self,
        include: &BTreeSet<String>,
        exclude: &BTreeSet<String>,
    ) -> Result<String> {
        let remediation = self.remediation_config()?;
        let nodes = if include.is_empty() && exclude.is_empty() {
            remediation.all_children_sorted()
        } else {
            remediation.all_children_sorted_by_tags(include, exclude)
        };
        Ok(nodes
            .iter()
            .map(|&node| {
                remediation
                    .node(node)
                    .cisco_style_text(TextStyle::WithoutComments)
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Removal commands for objects defined but never referenced in the
    /// running configuration, using the driver's builtin rules. Pass
    /// `object_types` to restrict the analysis; `None` runs every rule.
    #[must_use]
    pub fn unused_object_remediation(&self, object_types: Option<&[String]>) -> Config {
        let analyzer = UnusedObjectAnalyzer::new(&self.running_config);
        let analyzer = match object_types {
            Some(types) => analyzer.filtered(types),
            None => analyzer,
        };
        analyzer.removal_config()
    }
}
