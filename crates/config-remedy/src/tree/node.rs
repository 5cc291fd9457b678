//! Read-only node handle and text rendering

use std::collections::BTreeSet;

use super::{Config, Instance, NodeId, TagSet};

/// Rendering style for [`Node::cisco_style_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextStyle<'a> {
    /// Just the indented command line
    #[default]
    WithoutComments,
    /// Append ` !` and the node's sorted comments
    WithComments,
    /// Append ` !` with an instance count and the comments of instances
    /// carrying `tag` (all instances when `None`)
    Merged(Option<&'a str>),
}

/// A borrowed view of one node inside a [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    config: &'a Config,
    id: NodeId,
}

impl Config {
    /// Borrow a read-only handle for `id`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Node<'_> {
        Node { config: self, id }
    }
}

impl<'a> Node<'a> {
    /// The node's id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Command text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.config.text(self.id)
    }

    /// Distance from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.config.depth(self.id)
    }

    /// Tags, with the untagged marker for bare leaves.
    #[must_use]
    pub fn tags(&self) -> TagSet {
        self.config.tags(self.id)
    }

    /// Comments attached to the node.
    #[must_use]
    pub fn comments(&self) -> &'a BTreeSet<String> {
        self.config.comments(self.id)
    }

    /// Per-device provenance records.
    #[must_use]
    pub fn instances(&self) -> &'a [Instance] {
        self.config.instances(self.id)
    }

    /// Child handles in insertion order.
    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + 'a {
        let config = self.config;
        config
            .children(self.id)
            .iter()
            .map(move |&id| Node { config, id })
    }

    /// Render as `"  " * (depth - 1) + text`, optionally followed by ` !`
    /// and comma-separated sorted comments.
    #[must_use]
    pub fn cisco_style_text(&self, style: TextStyle<'_>) -> String {
        let mut comments: Vec<String> = Vec::new();
        match style {
            TextStyle::WithoutComments => {}
            TextStyle::WithComments => {
                comments.extend(self.comments().iter().cloned());
            }
            TextStyle::Merged(tag) => {
                let mut instance_count = 0;
                let mut instance_comments: BTreeSet<String> = BTreeSet::new();
                for instance in self.instances() {
                    let tag_matches = match tag {
                        None => true,
                        Some(tag) => instance.tags.contains(tag),
                    };
                    if tag_matches {
                        instance_count += 1;
                        instance_comments.extend(instance.comments.iter().cloned());
                    }
                }
                let word = if instance_count == 1 {
                    "instance"
                } else {
                    "instances"
                };
                comments.push(format!("{instance_count} {word}"));
                comments.extend(instance_comments);
            }
        }
        comments.sort();

        let indent = "  ".repeat(self.depth().saturating_sub(1));
        if comments.is_empty() {
            format!("{indent}{}", self.text())
        } else {
            format!("{indent}{} !{}", self.text(), comments.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Platform, get_driver};
    use crate::tree::ROOT;

    #[test]
    fn test_cisco_style_text_indentation() {
        let mut config = Config::new(get_driver(Platform::Generic).unwrap());
        let leaf = config.add_children_deep(ROOT, ["interface Vlan2", "description test"]);

        assert_eq!(
            config.node(leaf).cisco_style_text(TextStyle::WithoutComments),
            "  description test"
        );
    }

    #[test]
    fn test_cisco_style_text_with_comments() {
        let mut config = Config::new(get_driver(Platform::Generic).unwrap());
        let child = config.add_child(ROOT, "no vlan 3");
        config.add_comment(child, "removes 2 lines");

        assert_eq!(
            config.node(child).cisco_style_text(TextStyle::WithComments),
            "no vlan 3 !removes 2 lines"
        );
    }

    #[test]
    fn test_merged_style_counts_instances() {
        let mut aggregate = Config::new(get_driver(Platform::Generic).unwrap());
        let mut device = Config::new(get_driver(Platform::Generic).unwrap());
        device.add_child(ROOT, "hostname a");
        aggregate.merge([&device]);

        let child = aggregate.child_by_text(ROOT, "hostname a").unwrap();
        assert_eq!(
            aggregate.node(child).cisco_style_text(TextStyle::Merged(None)),
            "hostname a !1 instance"
        );
    }
}
