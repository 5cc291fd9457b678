//! Two-sided recursive configuration diff
//!
//! `config_to_get_to` walks both trees section by section. The left pass
//! negates lines present on the device but absent from the target, skipping
//! lines an idempotent counterpart will replace; the right pass adds target
//! lines the device is missing and recurses into shared sections, applying
//! sectional-overwrite rules where an interior delta is not safe to apply.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::tree::{Config, NodeId, ROOT};

impl Config {
    /// Commands needed to transition from `self` (the running config) to
    /// `target` (the generated config).
    ///
    /// # Errors
    /// Propagates negation failures from the platform driver.
    pub fn config_to_get_to(&self, target: &Config) -> Result<Config> {
        let mut delta = Config::new(self.driver().clone());
        self.config_to_get_to_into(target, &mut delta)?;
        Ok(delta)
    }

    /// As [`Config::config_to_get_to`], accumulating into a caller-provided
    /// delta tree.
    ///
    /// # Errors
    /// Propagates negation failures from the platform driver.
    pub fn config_to_get_to_into(&self, target: &Config, delta: &mut Config) -> Result<()> {
        self.diff_section(target, ROOT, ROOT, delta, ROOT)
    }

    fn diff_section(
        &self,
        target: &Config,
        self_node: NodeId,
        target_node: NodeId,
        delta: &mut Config,
        delta_node: NodeId,
    ) -> Result<()> {
        self.diff_left(target, self_node, target_node, delta, delta_node)?;
        self.diff_right(target, self_node, target_node, delta, delta_node)
    }

    /// Negate lines in `self` with no counterpart in `target`.
    fn diff_left(
        &self,
        target: &Config,
        self_node: NodeId,
        target_node: NodeId,
        delta: &mut Config,
        delta_node: NodeId,
    ) -> Result<()> {
        for &self_child in self.children(self_node) {
            let text = self.text(self_child);
            if target.child_by_text(target_node, text).is_some() {
                continue;
            }
            // an idempotent counterpart in the target will replace this line
            if self
                .driver()
                .idempotent_for(self, self_child, target, target_node)
                .is_some()
            {
                continue;
            }
            let deleted = delta.add_child(delta_node, text);
            delta.negate_node(deleted)?;
            if !self.children(self_child).is_empty() {
                let removed = self.data(self_child).index.len() + 1;
                delta.add_comment(deleted, format!("removes {removed} lines"));
            }
        }
        Ok(())
    }

    /// Add lines from `target` that `self` is missing; recurse into shared
    /// sections.
    fn diff_right(
        &self,
        target: &Config,
        self_node: NodeId,
        target_node: NodeId,
        delta: &mut Config,
        delta_node: NodeId,
    ) -> Result<()> {
        for &target_child in target.children(target_node) {
            let text = target.text(target_child).to_string();
            if let Some(self_child) = self.child_by_text(self_node, &text) {
                let subtree = delta.add_child(delta_node, &text);
                self.diff_section(target, self_child, target_child, delta, subtree)?;
                if delta.children(subtree).is_empty() {
                    delta.delete(subtree);
                } else if self.is_sectional_overwrite(self_child) {
                    overwrite_with(delta, delta_node, target, target_child, true)?;
                } else if self.is_sectional_overwrite_no_negate(self_child) {
                    overwrite_with(delta, delta_node, target, target_child, false)?;
                }
            } else {
                let new_item = delta.add_deep_copy_of(delta_node, target, target_child);
                delta.set_new_in_config(new_item, true);
                for descendant in delta.descendants(new_item) {
                    delta.set_new_in_config(descendant, true);
                }
                if !delta.children(new_item).is_empty() {
                    delta.add_comment(new_item, "new section");
                }
            }
        }
        Ok(())
    }

    fn is_sectional_overwrite(&self, node: NodeId) -> bool {
        self.driver()
            .rules()
            .sectional_overwrite
            .iter()
            .any(|rule| self.is_lineage_match(node, &rule.match_rules))
    }

    fn is_sectional_overwrite_no_negate(&self, node: NodeId) -> bool {
        self.driver()
            .rules()
            .sectional_overwrite_no_negate
            .iter()
            .any(|rule| self.is_lineage_match(node, &rule.match_rules))
    }

    /// Assign order weights from the first matching ordering rule.
    pub fn set_order_weight(&mut self) {
        let driver = self.driver().clone();
        for node in self.all_children() {
            for rule in &driver.rules().ordering {
                if self.is_lineage_match(node, &rule.match_rules) {
                    self.set_order_weight_of(node, rule.weight);
                    break;
                }
            }
        }
    }

    /// A new tree holding the configuration in `self` that is absent from
    /// `target`. Negated and defaulted lines are not considered.
    #[must_use]
    pub fn difference(&self, target: &Config) -> Config {
        let mut delta = Config::new(self.driver().clone());
        self.difference_inner(target, ROOT, ROOT, &mut delta, ROOT);
        delta
    }

    fn difference_inner(
        &self,
        target: &Config,
        self_node: NodeId,
        target_node: NodeId,
        delta: &mut Config,
        delta_node: NodeId,
    ) {
        let negation = self.driver().negation_prefix();
        for &self_child in self.children(self_node) {
            let text = self.text(self_child);
            if text.starts_with(negation) || text.starts_with("default ") {
                continue;
            }
            match target.child_by_text(target_node, text) {
                None => {
                    delta.add_deep_copy_of(delta_node, self, self_child);
                }
                Some(target_child) => {
                    let subtree = delta.add_child(delta_node, text);
                    self.difference_inner(target, self_child, target_child, delta, subtree);
                    if delta.children(subtree).is_empty() {
                        delta.delete(subtree);
                    }
                }
            }
        }
    }

    /// Best-effort projection of the tree that results from applying
    /// `change` to `self`. The quality of the prediction depends on how well
    /// the platform's idempotence and overwrite rules are tuned.
    #[must_use]
    pub fn future(&self, change: &Config) -> Config {
        let mut projection = Config::new(self.driver().clone());
        self.future_inner(change, ROOT, ROOT, &mut projection, ROOT);
        projection
    }

    fn future_inner(
        &self,
        change: &Config,
        self_node: NodeId,
        change_node: NodeId,
        projection: &mut Config,
        projection_node: NodeId,
    ) {
        let driver = self.driver().clone();
        let negation = driver.negation_prefix();

        // First classify the change: which existing lines get removed, and
        // which get replaced by an idempotent counterpart.
        let mut removed: HashSet<String> = HashSet::new();
        let mut replaced: HashMap<String, NodeId> = HashMap::new();
        for &change_child in change.children(change_node) {
            let text = change.text(change_child);
            let bare = text
                .strip_prefix(negation)
                .or_else(|| text.strip_prefix("default "));
            if let Some(bare) = bare {
                removed.insert(bare.to_string());
                continue;
            }
            if self.child_by_text(self_node, text).is_some() {
                continue;
            }
            if let Some(existing) = driver.idempotent_for(change, change_child, self, self_node) {
                replaced.insert(self.text(existing).to_string(), change_child);
            }
        }

        // Carry the existing configuration forward.
        for &self_child in self.children(self_node) {
            let text = self.text(self_child);
            if removed.contains(text) {
                continue;
            }
            if let Some(&replacement) = replaced.get(text) {
                projection.add_deep_copy_of(projection_node, change, replacement);
                continue;
            }
            if let Some(change_child) = change.child_by_text(change_node, text) {
                if change.is_sectional_overwrite(change_child)
                    || change.is_sectional_overwrite_no_negate(change_child)
                {
                    projection.add_deep_copy_of(projection_node, change, change_child);
                    continue;
                }
                let projected = projection.add_shallow_copy_of(projection_node, self, self_child);
                self.future_inner(change, self_child, change_child, projection, projected);
            } else {
                projection.add_deep_copy_of(projection_node, self, self_child);
            }
        }

        // Additions introduced by the change.
        for &change_child in change.children(change_node) {
            let text = change.text(change_child);
            if text.starts_with(negation) || text.starts_with("default ") {
                continue;
            }
            if self.child_by_text(self_node, text).is_some() {
                continue;
            }
            if replaced.values().any(|&used| used == change_child) {
                continue;
            }
            projection.add_deep_copy_of(projection_node, change, change_child);
        }
    }
}

/// Replace the interior delta of a changed section with a wholesale
/// rewrite: optionally a negation of the section, then a deep copy of the
/// desired section.
fn overwrite_with(
    delta: &mut Config,
    delta_parent: NodeId,
    target: &Config,
    target_child: NodeId,
    negate: bool,
) -> Result<()> {
    let text = target.text(target_child).to_string();
    if negate {
        delta.delete_child_by_text(delta_parent, &text);
        let deleted = delta.add_child(delta_parent, &text);
        delta.negate_node(deleted)?;
        delta.add_comment(deleted, "dropping section");
    }
    if !target.children(target_child).is_empty() {
        delta.delete_child_by_text(delta_parent, &text);
        let new_item = delta.add_deep_copy_of(delta_parent, target, target_child);
        delta.add_comment(new_item, "re-create section");
    }
    Ok(())
}
