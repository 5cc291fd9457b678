//! Sorted emission with tag filtering and sectional exits
//!
//! Sectional exit lines are not part of the tree; they are synthesized at
//! render time from the driver's rules so parse and dump stay symmetric.

use std::collections::BTreeSet;

use crate::tree::{Config, NodeId, ROOT, TextStyle};

impl Config {
    /// The exit text for `node`'s section, when a sectional-exiting rule
    /// matches its lineage.
    #[must_use]
    pub fn sectional_exit(&self, node: NodeId) -> Option<&str> {
        self.driver()
            .rules()
            .sectional_exiting
            .iter()
            .find(|rule| self.is_lineage_match(node, &rule.match_rules))
            .map(|rule| rule.exit_text.as_str())
    }

    /// Strip stored sectional-exit lines (the trailing child of each
    /// matching section); they are re-synthesized on output.
    pub(crate) fn delete_sectional_exits(&mut self) {
        for node in self.all_children() {
            let Some(exit_text) = self.sectional_exit(node).map(str::to_string) else {
                continue;
            };
            let Some(&last_child) = self.children(node).last() else {
                continue;
            };
            if self.text(last_child) == exit_text {
                self.delete(last_child);
            }
        }
    }

    /// Render the tree as indented lines in sorted order, optionally
    /// appending sectional exit lines.
    #[must_use]
    pub fn lines(&self, sectional_exiting: bool) -> Vec<String> {
        let mut out = Vec::new();
        self.emit_lines(ROOT, sectional_exiting, &mut out);
        out
    }

    /// The rendered configuration as one string.
    #[must_use]
    pub fn to_text(&self, sectional_exiting: bool) -> String {
        self.lines(sectional_exiting).join("\n")
    }

    fn emit_lines(&self, node: NodeId, sectional_exiting: bool, out: &mut Vec<String>) {
        for child in self.sorted_children(node) {
            out.push(self.node(child).cisco_style_text(TextStyle::WithoutComments));
            self.emit_lines(child, sectional_exiting, out);
            if sectional_exiting {
                if let Some(exit_text) = self.sectional_exit(child) {
                    out.push(format!("{}{exit_text}", "  ".repeat(self.depth(child))));
                }
            }
        }
    }

    /// Whether a line passes the include/exclude tag filter: it must share a
    /// tag with `include` (when non-empty) and share none with `exclude`
    /// (when non-empty).
    #[must_use]
    pub fn line_inclusion_test(
        &self,
        node: NodeId,
        include: &BTreeSet<String>,
        exclude: &BTreeSet<String>,
    ) -> bool {
        let tags: BTreeSet<String> = self.tags(node).into_iter().flatten().collect();

        let mut include_line = false;
        if !include.is_empty() {
            include_line = tags.intersection(include).next().is_some();
        }
        if !exclude.is_empty() && (include_line || include.is_empty()) {
            include_line = tags.intersection(exclude).next().is_none();
        }
        include_line
    }

    /// Sorted traversal filtered by the include/exclude tag test.
    #[must_use]
    pub fn all_children_sorted_by_tags(
        &self,
        include: &BTreeSet<String>,
        exclude: &BTreeSet<String>,
    ) -> Vec<NodeId> {
        self.all_children_sorted()
            .into_iter()
            .filter(|&node| self.line_inclusion_test(node, include, exclude))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Platform, get_driver};

    fn tag_set<const N: usize>(tags: [&str; N]) -> BTreeSet<String> {
        tags.into_iter().map(str::to_string).collect()
    }

    #[test]
    fn test_lines_are_indented_and_sorted() {
        let driver = get_driver(Platform::Generic).unwrap();
        let mut config = Config::new(driver);
        let interface = config.add_child(ROOT, "interface Vlan2");
        let late = config.add_child(interface, "no shutdown");
        config.add_child(interface, "description test");
        config.set_order_weight_of(late, 600);

        assert_eq!(
            config.lines(false),
            vec!["interface Vlan2", "  description test", "  no shutdown"]
        );
    }

    #[test]
    fn test_sectional_exit_emission() {
        let driver = get_driver(Platform::CiscoIos).unwrap();
        let mut config = Config::new(driver);
        let leaf = config.add_children_deep(
            ROOT,
            [
                "router bgp 65000",
                "address-family ipv4",
                "network 10.0.0.0 mask 255.255.255.0",
            ],
        );
        let _ = leaf;

        let lines = config.lines(true);
        assert_eq!(
            lines,
            vec![
                "router bgp 65000",
                "  address-family ipv4",
                "    network 10.0.0.0 mask 255.255.255.0",
                "    exit-address-family",
            ]
        );
    }

    #[test]
    fn test_tag_filtering() {
        let driver = get_driver(Platform::Generic).unwrap();
        let mut config = Config::new(driver);
        let safe = config.add_child(ROOT, "ntp server 10.0.0.1");
        let risky = config.add_child(ROOT, "no router bgp 65000");
        config.set_tags(safe, &tag_set(["safe"]));
        config.set_tags(risky, &tag_set(["risky"]));

        let included = config.all_children_sorted_by_tags(&tag_set(["safe"]), &BTreeSet::new());
        assert_eq!(included, vec![safe]);

        // exclude-only filtering keeps everything else
        let included = config.all_children_sorted_by_tags(&BTreeSet::new(), &tag_set(["risky"]));
        assert_eq!(included, vec![safe]);

        // include and exclude together: excluded tags win
        let included = config.all_children_sorted_by_tags(
            &tag_set(["safe", "risky"]),
            &tag_set(["risky"]),
        );
        assert_eq!(included, vec![safe]);
    }

    #[test]
    fn test_branch_passes_filter_via_leaf_tags() {
        let driver = get_driver(Platform::Generic).unwrap();
        let mut config = Config::new(driver);
        let interface = config.add_child(ROOT, "interface Vlan2");
        let leaf = config.add_child(interface, "description test");
        config.set_tags(leaf, &tag_set(["safe"]));

        let included = config.all_children_sorted_by_tags(&tag_set(["safe"]), &BTreeSet::new());
        assert_eq!(included, vec![interface, leaf]);
    }
}
