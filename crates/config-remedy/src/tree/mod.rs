//! Hierarchical configuration tree
//!
//! An ordered tree of command lines with per-node metadata. Nodes live in an
//! arena owned by the root [`Config`] value and are addressed by [`NodeId`];
//! the parent back-reference is a non-owning id, which keeps the shape
//! acyclic while still allowing lineage walks from any node.
//!
//! Each parent keeps a text-keyed first-occurrence index over its children
//! for O(1) lookup. Duplicate-text children are forbidden unless a
//! `parent_allows_duplicate_child` rule matches the parent's lineage or the
//! caller forces the duplicate; duplicates bypass the index, which always
//! retains the first occurrence.

mod dump;
mod node;

pub use dump::{Dump, DumpLine};
pub use node::{Node, TextStyle};

use std::collections::{BTreeSet, HashMap};
use tracing::warn;

use crate::driver::{Driver, Platform};
use crate::matcher::MatchRule;

/// Index of a node inside a [`Config`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// The root node id of every tree.
pub const ROOT: NodeId = NodeId(0);

/// Distinguished marker reported for untagged leaves: a tag read yields
/// `None` alongside any real tags.
pub type TagSet = BTreeSet<Option<String>>;

/// Per-device provenance attached to a node when trees are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Identifier of the source tree within the merge
    pub device_id: u32,
    /// Tags carried by the source node
    pub tags: BTreeSet<String>,
    /// Comments carried by the source node
    pub comments: BTreeSet<String>,
}

/// Arena slot for a single configuration line.
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) parent: NodeId,
    pub(crate) text: String,
    pub(crate) children: Vec<NodeId>,
    /// First child per text; rebuilt after deletions and reorders.
    pub(crate) index: HashMap<String, NodeId>,
    /// Stored on leaves only; branch reads derive the union over leaves.
    pub(crate) tags: BTreeSet<String>,
    pub(crate) comments: BTreeSet<String>,
    pub(crate) order_weight: i32,
    pub(crate) new_in_config: bool,
    pub(crate) instances: Vec<Instance>,
    /// Column at which the line was read; the root uses -1.
    pub(crate) real_indent_level: i32,
}

impl NodeData {
    fn new(parent: NodeId, text: String) -> Self {
        Self {
            parent,
            text,
            children: Vec::new(),
            index: HashMap::new(),
            tags: BTreeSet::new(),
            comments: BTreeSet::new(),
            order_weight: 500,
            new_in_config: false,
            instances: Vec::new(),
            real_indent_level: 0,
        }
    }
}

/// A hierarchical configuration: the tree root plus the platform driver that
/// governs parsing, diffing and negation behavior.
#[derive(Debug, Clone)]
pub struct Config {
    driver: Driver,
    nodes: Vec<NodeData>,
    merged_count: u32,
}

impl Config {
    /// Create an empty tree bound to `driver`.
    #[must_use]
    pub fn new(driver: Driver) -> Self {
        let mut root = NodeData::new(ROOT, String::new());
        root.real_indent_level = -1;
        Self {
            driver,
            nodes: vec![root],
            merged_count: 0,
        }
    }

    /// The driver this tree was built with.
    #[must_use]
    pub fn driver(&self) -> &Driver {
        &self.driver
    }

    /// The platform of this tree's driver.
    #[must_use]
    pub fn platform(&self) -> Platform {
        self.driver.platform()
    }

    pub(crate) fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub(crate) fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0]
    }

    /// Command text of a node; empty for the root.
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        &self.data(id).text
    }

    /// Parent of a node; the root is its own parent.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.data(id).parent
    }

    /// Direct children in insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// Direct children ordered by `(order_weight, insertion_order)`.
    #[must_use]
    pub fn sorted_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self.data(id).children.clone();
        children.sort_by_key(|c| self.data(*c).order_weight);
        children
    }

    /// True when the node has no children and is not the root.
    #[must_use]
    pub fn is_leaf(&self, id: NodeId) -> bool {
        id != ROOT && self.data(id).children.is_empty()
    }

    /// True when the node has children or is the root.
    #[must_use]
    pub fn is_branch(&self, id: NodeId) -> bool {
        id == ROOT || !self.data(id).children.is_empty()
    }

    /// Distance from the root; `depth(ROOT) == 0`.
    #[must_use]
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while current != ROOT {
            current = self.data(current).parent;
            depth += 1;
        }
        depth
    }

    /// Ancestor chain from just below the root down to the node itself.
    #[must_use]
    pub fn lineage(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = id;
        while current != ROOT {
            chain.push(current);
            current = self.data(current).parent;
        }
        chain.reverse();
        chain
    }

    /// Texts of the ancestor chain, root excluded.
    #[must_use]
    pub fn path(&self, id: NodeId) -> Vec<String> {
        self.lineage(id)
            .into_iter()
            .map(|n| self.data(n).text.clone())
            .collect()
    }

    /// Comments attached to a node.
    #[must_use]
    pub fn comments(&self, id: NodeId) -> &BTreeSet<String> {
        &self.data(id).comments
    }

    /// Attach a comment to a node.
    pub fn add_comment(&mut self, id: NodeId, comment: impl Into<String>) {
        self.data_mut(id).comments.insert(comment.into());
    }

    /// Emission order weight.
    #[must_use]
    pub fn order_weight(&self, id: NodeId) -> i32 {
        self.data(id).order_weight
    }

    /// Set the emission order weight.
    pub fn set_order_weight_of(&mut self, id: NodeId, weight: i32) {
        self.data_mut(id).order_weight = weight;
    }

    /// Whether the diff introduced this node as an addition.
    #[must_use]
    pub fn new_in_config(&self, id: NodeId) -> bool {
        self.data(id).new_in_config
    }

    /// Mark whether the diff introduced this node as an addition.
    pub fn set_new_in_config(&mut self, id: NodeId, value: bool) {
        self.data_mut(id).new_in_config = value;
    }

    /// Per-device provenance records.
    #[must_use]
    pub fn instances(&self, id: NodeId) -> &[Instance] {
        &self.data(id).instances
    }

    /// Column at which the line was read.
    #[must_use]
    pub fn real_indent_level(&self, id: NodeId) -> i32 {
        self.data(id).real_indent_level
    }

    pub(crate) fn set_real_indent_level(&mut self, id: NodeId, level: i32) {
        self.data_mut(id).real_indent_level = level;
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Add a child line under `parent`, or return the existing child with
    /// the same text. Returning an existing child logs a duplicate warning
    /// unless the text is an ACL remark.
    pub fn add_child(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.add_child_inner(parent, text, false, false)
    }

    /// Add a child line under `parent`, returning the existing child with
    /// the same text silently when present.
    pub fn ensure_child(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.add_child_inner(parent, text, true, false)
    }

    /// Add a child line under `parent` even when a child with the same text
    /// already exists. The index keeps pointing at the first occurrence.
    pub fn add_duplicate_child(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.add_child_inner(parent, text, false, true)
    }

    fn add_child_inner(
        &mut self,
        parent: NodeId,
        text: &str,
        return_if_present: bool,
        force_duplicate: bool,
    ) -> NodeId {
        let text = normalize_text(text);
        let present = self.data(parent).index.get(&text).copied();
        if let Some(existing) = present {
            if force_duplicate || self.is_duplicate_child_allowed(parent) {
                let id = self.push_node(parent, text);
                self.data_mut(parent).children.push(id);
                return id;
            }
            if !return_if_present && !text.starts_with("remark ") {
                let mut path = self.path(parent);
                path.push(text);
                warn!(path = ?path, "found a duplicate section");
            }
            return existing;
        }
        let id = self.push_node(parent, text.clone());
        self.data_mut(parent).children.push(id);
        self.data_mut(parent).index.insert(text, id);
        id
    }

    fn push_node(&mut self, parent: NodeId, text: String) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(parent, text));
        id
    }

    /// Descend through `texts`, creating children as needed, and return the
    /// deepest node.
    pub fn add_children_deep<I, S>(&mut self, parent: NodeId, texts: I) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut base = parent;
        for text in texts {
            base = self.ensure_child(base, text.as_ref());
        }
        base
    }

    /// Remove a node from its parent. The root cannot be deleted.
    pub fn delete(&mut self, id: NodeId) {
        if id == ROOT {
            return;
        }
        let parent = self.data(id).parent;
        self.data_mut(parent).children.retain(|c| *c != id);
        self.rebuild_index(parent);
    }

    /// Remove every child of `parent` whose text equals `text`.
    pub fn delete_child_by_text(&mut self, parent: NodeId, text: &str) {
        if self.data(parent).index.contains_key(text) {
            let keep: Vec<NodeId> = self
                .data(parent)
                .children
                .iter()
                .copied()
                .filter(|c| self.data(*c).text != text)
                .collect();
            self.data_mut(parent).children = keep;
            self.rebuild_index(parent);
        }
    }

    /// Rewrite a node's text, keeping the parent index consistent.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let text = normalize_text(text);
        self.data_mut(id).text = text;
        let parent = self.data(id).parent;
        self.rebuild_index(parent);
    }

    fn rebuild_index(&mut self, parent: NodeId) {
        let mut index = HashMap::new();
        for &child in &self.data(parent).children {
            let text = self.data(child).text.clone();
            index.entry(text).or_insert(child);
        }
        self.data_mut(parent).index = index;
    }

    fn is_duplicate_child_allowed(&self, parent: NodeId) -> bool {
        if parent == ROOT {
            return false;
        }
        self.driver
            .rules()
            .parent_allows_duplicate_child
            .iter()
            .any(|rule| self.is_lineage_match(parent, &rule.match_rules))
    }

    // ------------------------------------------------------------------
    // Lookup and traversal
    // ------------------------------------------------------------------

    /// First child of `parent` with exactly this text.
    #[must_use]
    pub fn child_by_text(&self, parent: NodeId, text: &str) -> Option<NodeId> {
        self.data(parent).index.get(text).copied()
    }

    /// First child of `parent` satisfying `rule`.
    #[must_use]
    pub fn get_child(&self, parent: NodeId, rule: &MatchRule) -> Option<NodeId> {
        self.get_children(parent, rule).next()
    }

    /// All children of `parent` satisfying `rule`, lazily.
    pub fn get_children<'a>(
        &'a self,
        parent: NodeId,
        rule: &'a MatchRule,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.data(parent)
            .children
            .iter()
            .copied()
            .filter(move |c| rule.matches(&self.data(*c).text))
    }

    /// Descendants whose root-to-node path matches `rules`, walking one rule
    /// per level.
    #[must_use]
    pub fn get_children_deep(&self, rules: &[MatchRule]) -> Vec<NodeId> {
        let mut found = Vec::new();
        if !rules.is_empty() {
            self.collect_children_deep(ROOT, rules, &mut found);
        }
        found
    }

    fn collect_children_deep(&self, parent: NodeId, rules: &[MatchRule], found: &mut Vec<NodeId>) {
        let (rule, rest) = match rules.split_first() {
            Some(split) => split,
            None => return,
        };
        for &child in &self.data(parent).children {
            if rule.matches(&self.data(child).text) {
                if rest.is_empty() {
                    found.push(child);
                } else {
                    self.collect_children_deep(child, rest, found);
                }
            }
        }
    }

    /// Depth-first pre-order walk of every descendant of the root.
    #[must_use]
    pub fn all_children(&self) -> Vec<NodeId> {
        self.descendants(ROOT)
    }

    /// Depth-first pre-order walk with siblings sorted at every level.
    #[must_use]
    pub fn all_children_sorted(&self) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.collect_sorted(ROOT, &mut found);
        found
    }

    /// Depth-first pre-order walk of every descendant of `from`, excluding
    /// `from` itself.
    #[must_use]
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.data(from).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            found.push(id);
            stack.extend(self.data(id).children.iter().rev());
        }
        found
    }

    fn collect_sorted(&self, from: NodeId, found: &mut Vec<NodeId>) {
        for child in self.sorted_children(from) {
            found.push(child);
            self.collect_sorted(child, found);
        }
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// Tags of a node. Leaves report their stored tags, or the untagged
    /// marker `None` when empty; branches report the union over leaves.
    #[must_use]
    pub fn tags(&self, id: NodeId) -> TagSet {
        if self.is_branch(id) {
            let mut found = TagSet::new();
            for &child in &self.data(id).children {
                found.extend(self.tags(child));
            }
            found
        } else {
            let stored = &self.data(id).tags;
            if stored.is_empty() {
                let mut found = TagSet::new();
                found.insert(None);
                found
            } else {
                stored.iter().cloned().map(Some).collect()
            }
        }
    }

    /// Stored tags of a leaf; empty for branches.
    #[must_use]
    pub fn stored_tags(&self, id: NodeId) -> &BTreeSet<String> {
        &self.data(id).tags
    }

    /// Replace the tag set of every leaf under `id` (or of `id` itself when
    /// it is a leaf).
    pub fn set_tags(&mut self, id: NodeId, tags: &BTreeSet<String>) {
        if self.is_branch(id) {
            for child in self.data(id).children.clone() {
                self.set_tags(child, tags);
            }
        } else {
            self.data_mut(id).tags = tags.clone();
        }
    }

    /// Add tags to every leaf under `id`.
    pub fn add_tags(&mut self, id: NodeId, tags: &BTreeSet<String>) {
        if self.is_branch(id) {
            for child in self.data(id).children.clone() {
                self.add_tags(child, tags);
            }
        } else {
            self.data_mut(id).tags.extend(tags.iter().cloned());
        }
    }

    /// Remove tags from every leaf under `id`.
    pub fn remove_tags(&mut self, id: NodeId, tags: &BTreeSet<String>) {
        if self.is_branch(id) {
            for child in self.data(id).children.clone() {
                self.remove_tags(child, tags);
            }
        } else {
            for tag in tags {
                self.data_mut(id).tags.remove(tag);
            }
        }
    }

    // ------------------------------------------------------------------
    // Lineage matching
    // ------------------------------------------------------------------

    /// Apply a lineage of match rules to this node: the rule count must
    /// equal the node's depth and each rule must match its ancestor.
    #[must_use]
    pub fn is_lineage_match(&self, id: NodeId, rules: &[MatchRule]) -> bool {
        self.lineage_match_inner(id, rules, false)
    }

    /// Lineage match ignoring a leading negation (`no `/`default `/platform
    /// prefix) on each ancestor's text. Used for idempotent-command pairing.
    #[must_use]
    pub fn is_lineage_match_stripped(&self, id: NodeId, rules: &[MatchRule]) -> bool {
        self.lineage_match_inner(id, rules, true)
    }

    fn lineage_match_inner(&self, id: NodeId, rules: &[MatchRule], strip_negation: bool) -> bool {
        let lineage = self.lineage(id);
        if lineage.len() != rules.len() {
            return false;
        }
        for (rule, node) in rules.iter().zip(lineage) {
            let text = self.data(node).text.as_str();
            let text = if strip_negation {
                self.strip_negation(text)
            } else {
                text
            };
            if !rule.matches(text) {
                return false;
            }
        }
        true
    }

    fn strip_negation<'a>(&self, text: &'a str) -> &'a str {
        let negation = self.driver.negation_prefix();
        if let Some(stripped) = text.strip_prefix(negation) {
            return stripped;
        }
        if let Some(stripped) = text.strip_prefix("default ") {
            return stripped;
        }
        text
    }

    // ------------------------------------------------------------------
    // Copies and merging
    // ------------------------------------------------------------------

    /// Create a child of `parent` mirroring `other_id` from `other`: same
    /// text, tags, comments and order weight, children excluded.
    pub fn add_shallow_copy_of(
        &mut self,
        parent: NodeId,
        other: &Config,
        other_id: NodeId,
    ) -> NodeId {
        self.shallow_copy_inner(parent, other, other_id, None)
    }

    fn shallow_copy_inner(
        &mut self,
        parent: NodeId,
        other: &Config,
        other_id: NodeId,
        instance_id: Option<u32>,
    ) -> NodeId {
        let text = other.data(other_id).text.clone();
        let new_child = self.add_child(parent, &text);
        if let Some(device_id) = instance_id {
            let tags = other
                .tags(other_id)
                .into_iter()
                .flatten()
                .collect::<BTreeSet<String>>();
            let instance = Instance {
                device_id,
                tags,
                comments: other.data(other_id).comments.clone(),
            };
            self.data_mut(new_child).instances.push(instance);
        }
        let source = other.data(other_id);
        let comments = source.comments.clone();
        let tags = source.tags.clone();
        let weight = source.order_weight;
        let data = self.data_mut(new_child);
        data.comments.extend(comments);
        data.tags.extend(tags);
        data.order_weight = weight;
        new_child
    }

    /// Recursively copy `other_id` and its subtree under `parent`.
    pub fn add_deep_copy_of(&mut self, parent: NodeId, other: &Config, other_id: NodeId) -> NodeId {
        self.deep_copy_inner(parent, other, other_id, None)
    }

    fn deep_copy_inner(
        &mut self,
        parent: NodeId,
        other: &Config,
        other_id: NodeId,
        instance_id: Option<u32>,
    ) -> NodeId {
        let new_child = self.shallow_copy_inner(parent, other, other_id, instance_id);
        for &grandchild in &other.data(other_id).children {
            self.deep_copy_inner(new_child, other, grandchild, instance_id);
        }
        new_child
    }

    /// Copy the ancestry of `other_id` into this tree and return the node
    /// equivalent to it.
    pub fn add_ancestor_copy_of(&mut self, other: &Config, other_id: NodeId) -> NodeId {
        let mut base = ROOT;
        for ancestor in other.lineage(other_id) {
            base = self.add_shallow_copy_of(base, other, ancestor);
        }
        base
    }

    /// Merge the top-level children of each other tree into this one,
    /// recording a per-device instance on every copied node.
    pub fn merge<'a, I>(&mut self, others: I)
    where
        I: IntoIterator<Item = &'a Config>,
    {
        for other in others {
            self.merged_count += 1;
            let device_id = self.merged_count;
            for &child in &other.data(ROOT).children {
                self.deep_copy_inner(ROOT, other, child, Some(device_id));
            }
        }
    }

    /// A standalone copy of this tree.
    #[must_use]
    pub fn deep_copy(&self) -> Config {
        let mut copy = Config::new(self.driver.clone());
        for &child in &self.data(ROOT).children {
            copy.add_deep_copy_of(ROOT, self, child);
        }
        copy
    }

    /// A new tree containing only subtrees whose leaves carry one of `tags`.
    #[must_use]
    pub fn with_tags(&self, tags: &BTreeSet<String>) -> Config {
        let mut projected = Config::new(self.driver.clone());
        self.project_tags(ROOT, ROOT, tags, &mut projected);
        projected
    }

    fn project_tags(
        &self,
        from: NodeId,
        into: NodeId,
        tags: &BTreeSet<String>,
        projected: &mut Config,
    ) {
        for &child in &self.data(from).children {
            let child_tags: BTreeSet<String> = self.tags(child).into_iter().flatten().collect();
            if child_tags.intersection(tags).next().is_some() {
                let new_child = projected.add_shallow_copy_of(into, self, child);
                self.project_tags(child, new_child, tags, projected);
            }
        }
    }

    fn subtree_eq(&self, id: NodeId, other: &Config, other_id: NodeId) -> bool {
        let a = self.data(id);
        let b = other.data(other_id);
        if a.text != b.text
            || a.tags != b.tags
            || a.comments != b.comments
            || a.new_in_config != b.new_in_config
            || a.children.len() != b.children.len()
        {
            return false;
        }
        self.sorted_children(id)
            .into_iter()
            .zip(other.sorted_children(other_id))
            .all(|(c, o)| self.subtree_eq(c, other, o))
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(ROOT, other, ROOT)
    }
}

/// Trim a line and collapse internal whitespace runs. Multi-line texts
/// (aggregated banners) are only trimmed, so their body survives verbatim.
fn normalize_text(text: &str) -> String {
    if text.contains('\n') {
        text.trim().to_string()
    } else {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
