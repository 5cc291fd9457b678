//! Unused-object analyzer
//!
//! Scans a configuration for object definitions (ACLs, route-maps, prefix
//! lists, ...) and the references to them, then reports definitions nothing
//! references along with the commands that would remove them. What counts
//! as a definition or a reference is driven entirely by the driver's
//! `unused_object_rules`.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::rules::{ReferencePattern, UnusedObjectRule};
use crate::tree::{Config, ROOT};

/// A definition of a configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectDefinition {
    /// Rule label for the object kind
    pub object_type: String,
    /// Extracted object name
    pub name: String,
    /// Root-to-definition path
    pub definition_location: Vec<String>,
    /// Extra facts captured from the definition line (e.g. `acl_type`)
    pub metadata: BTreeMap<String, String>,
}

/// A reference to a configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectReference {
    /// Rule label for the object kind
    pub object_type: String,
    /// Referenced object name
    pub name: String,
    /// Root-to-reference path
    pub reference_location: Vec<String>,
    /// Which reference pattern produced this record
    pub reference_type: String,
}

/// The complete result of an unused-object analysis.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UnusedObjectAnalysis {
    /// Definitions per object type
    pub defined_objects: BTreeMap<String, Vec<ObjectDefinition>>,
    /// References per object type
    pub referenced_objects: BTreeMap<String, Vec<ObjectReference>>,
    /// Unreferenced definitions per object type
    pub unused_objects: BTreeMap<String, Vec<ObjectDefinition>>,
    /// Total number of definitions found
    pub total_defined: usize,
    /// Total number of unreferenced definitions
    pub total_unused: usize,
    /// Formatted removal commands for every unused object
    pub removal_commands: Vec<String>,
}

/// Identifies unused configuration objects in one tree.
pub struct UnusedObjectAnalyzer<'a> {
    config: &'a Config,
    rules: Vec<UnusedObjectRule>,
}

impl<'a> UnusedObjectAnalyzer<'a> {
    /// Analyze with the driver's builtin rules.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            rules: config.driver().rules().unused_object_rules.clone(),
        }
    }

    /// Analyze with a caller-provided rule set.
    #[must_use]
    pub fn with_rules(config: &'a Config, rules: Vec<UnusedObjectRule>) -> Self {
        Self { config, rules }
    }

    /// Restrict the analysis to the named object types.
    #[must_use]
    pub fn filtered(mut self, object_types: &[String]) -> Self {
        self.rules
            .retain(|rule| object_types.contains(&rule.object_type));
        self
    }

    /// The rules this analyzer will apply.
    #[must_use]
    pub fn rules(&self) -> &[UnusedObjectRule] {
        &self.rules
    }

    /// Run the full analysis.
    #[must_use]
    pub fn analyze(&self) -> UnusedObjectAnalysis {
        let mut analysis = UnusedObjectAnalysis::default();

        for rule in &self.rules {
            let definitions = self.find_definitions(rule);
            let references = self.find_references(rule);
            let unused = identify_unused(&definitions, &references, rule);

            for object in &unused {
                if let Some(command) = format_removal_command(object, rule) {
                    analysis.removal_commands.push(command);
                }
            }

            analysis.total_defined += definitions.len();
            analysis.total_unused += unused.len();
            analysis
                .defined_objects
                .insert(rule.object_type.clone(), definitions);
            analysis
                .referenced_objects
                .insert(rule.object_type.clone(), references);
            analysis
                .unused_objects
                .insert(rule.object_type.clone(), unused);
        }

        analysis
    }

    /// A removal tree for every unused object, one command per object with
    /// the rule's removal order weight applied.
    #[must_use]
    pub fn removal_config(&self) -> Config {
        let mut removal = Config::new(self.config.driver().clone());
        for rule in &self.rules {
            let definitions = self.find_definitions(rule);
            let references = self.find_references(rule);
            for object in identify_unused(&definitions, &references, rule) {
                if let Some(command) = format_removal_command(&object, rule) {
                    let child = removal.add_child(ROOT, &command);
                    removal.set_order_weight_of(child, rule.removal_order_weight);
                }
            }
        }
        removal
    }

    /// All definitions of the rule's object type.
    #[must_use]
    pub fn find_definitions(&self, rule: &UnusedObjectRule) -> Vec<ObjectDefinition> {
        let mut definitions = Vec::new();
        for node in self.config.all_children() {
            let text = self.config.text(node);
            if !rule.definition_match.iter().any(|m| m.matches(text)) {
                continue;
            }
            let Some(name) = extract_object_name(text) else {
                continue;
            };
            definitions.push(ObjectDefinition {
                object_type: rule.object_type.clone(),
                name,
                definition_location: self.config.path(node),
                metadata: extract_metadata(text),
            });
        }
        debug!(
            object_type = %rule.object_type,
            count = definitions.len(),
            "found definitions"
        );
        definitions
    }

    /// All references to the rule's object type.
    #[must_use]
    pub fn find_references(&self, rule: &UnusedObjectRule) -> Vec<ObjectReference> {
        let mut references = Vec::new();
        for pattern in &rule.reference_patterns {
            self.find_references_for_pattern(rule, pattern, &mut references);
        }
        debug!(
            object_type = %rule.object_type,
            count = references.len(),
            "found references"
        );
        references
    }

    fn find_references_for_pattern(
        &self,
        rule: &UnusedObjectRule,
        pattern: &ReferencePattern,
        references: &mut Vec<ObjectReference>,
    ) {
        for node in self.config.all_children() {
            if !self.config.is_lineage_match(node, &pattern.match_rules) {
                continue;
            }
            let Some(name) = extract_reference_name(self.config.text(node), pattern) else {
                continue;
            };
            if should_ignore_reference(&name, pattern) {
                continue;
            }
            references.push(ObjectReference {
                object_type: rule.object_type.clone(),
                name,
                reference_location: self.config.path(node),
                reference_type: pattern.reference_type.clone(),
            });
        }
    }
}

/// Definitions whose names never appear among the references.
#[must_use]
pub fn identify_unused(
    definitions: &[ObjectDefinition],
    references: &[ObjectReference],
    rule: &UnusedObjectRule,
) -> Vec<ObjectDefinition> {
    let referenced_names: BTreeSet<String> = references
        .iter()
        .map(|reference| {
            if rule.case_sensitive {
                reference.name.clone()
            } else {
                reference.name.to_lowercase()
            }
        })
        .collect();

    definitions
        .iter()
        .filter(|definition| {
            let name = if rule.case_sensitive {
                definition.name.clone()
            } else {
                definition.name.to_lowercase()
            };
            !referenced_names.contains(&name)
        })
        .cloned()
        .collect()
}

/// Extract the object name from a definition line using per-keyword
/// heuristics; the fallback is the second whitespace token.
#[must_use]
pub fn extract_object_name(text: &str) -> Option<String> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() < 2 {
        return None;
    }

    if text.contains("access-list") {
        return extract_access_list_name(&parts);
    }
    if text.contains("prefix-list") || text.contains("prefix-set") {
        return extract_prefix_list_name(&parts);
    }
    if text.starts_with("route-map ") {
        return Some(parts[1].to_string());
    }
    if text.starts_with("class-map ") {
        if parts.len() >= 3 && matches!(parts[1], "match-any" | "match-all") {
            return Some(parts[2].to_string());
        }
        return Some(parts[1].to_string());
    }
    if text.starts_with("policy-map ") {
        return Some(parts[1].to_string());
    }
    if text.contains("vrf") && text.contains("definition") {
        return extract_after_keyword(&parts, "definition");
    }
    if text.starts_with("object-group ") && parts.len() >= 3 {
        return Some(parts[2].to_string());
    }
    if text.starts_with("as-path-set ") || text.starts_with("community-set ") {
        return Some(parts[1].to_string());
    }
    if text.starts_with("ipv6 general-prefix ") {
        return Some(parts[2].to_string());
    }

    Some(parts[1].to_string())
}

fn extract_access_list_name(parts: &[&str]) -> Option<String> {
    // ip access-list [standard|extended] NAME (IOS format)
    if parts.len() >= 4
        && parts[0] == "ip"
        && parts[1] == "access-list"
        && matches!(parts[2], "standard" | "extended")
    {
        return Some(parts[3].to_string());
    }
    // ip access-list NAME (NX-OS format) / ipv6 access-list NAME
    if parts.len() >= 3 && matches!(parts[0], "ip" | "ipv6") && parts[1] == "access-list" {
        return Some(parts[2].to_string());
    }
    None
}

fn extract_prefix_list_name(parts: &[&str]) -> Option<String> {
    for keyword in ["prefix-list", "prefix-set"] {
        if let Some(name) = extract_after_keyword(parts, keyword) {
            return Some(name);
        }
    }
    None
}

fn extract_after_keyword(parts: &[&str], keyword: &str) -> Option<String> {
    parts
        .iter()
        .position(|part| *part == keyword)
        .and_then(|idx| parts.get(idx + 1))
        .map(|name| (*name).to_string())
}

/// Extract the referenced name with the pattern's regex and capture group.
#[must_use]
pub fn extract_reference_name(text: &str, pattern: &ReferencePattern) -> Option<String> {
    pattern
        .extract_regex
        .captures(text)
        .and_then(|captures| captures.get(pattern.capture_group))
        .map(|group| group.as_str().to_string())
}

/// Capture extra facts from a definition line (ACL type, class-map match
/// type, object-group type).
#[must_use]
pub fn extract_metadata(text: &str) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    let parts: Vec<&str> = text.split_whitespace().collect();

    if text.contains("access-list") {
        if parts.contains(&"standard") {
            metadata.insert("acl_type".to_string(), "standard".to_string());
        } else if parts.contains(&"extended") {
            metadata.insert("acl_type".to_string(), "extended".to_string());
        }
    }
    if text.starts_with("class-map ")
        && parts.len() >= 2
        && matches!(parts[1], "match-any" | "match-all")
    {
        metadata.insert("match_type".to_string(), parts[1].to_string());
    }
    if text.starts_with("object-group ") && parts.len() >= 2 {
        metadata.insert("group_type".to_string(), parts[1].to_string());
    }
    metadata
}

/// Format the rule's removal template with `{name}` and metadata values.
/// Unknown placeholders are logged and the command is skipped.
#[must_use]
pub fn format_removal_command(object: &ObjectDefinition, rule: &UnusedObjectRule) -> Option<String> {
    let mut replacements = object.metadata.clone();
    replacements.insert("name".to_string(), object.name.clone());
    replacements.insert("object_type".to_string(), object.object_type.clone());

    let mut out = String::new();
    let mut rest = rule.removal_template.as_str();
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Some(out);
        };
        let key = &after[..end];
        match replacements.get(key) {
            Some(value) => out.push_str(value),
            None => {
                warn!(
                    name = %object.name,
                    placeholder = key,
                    "missing template variable, skipping removal command"
                );
                return None;
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}

fn should_ignore_reference(name: &str, pattern: &ReferencePattern) -> bool {
    pattern
        .ignore_patterns
        .iter()
        .any(|ignore| ignore.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{Platform, get_driver};
    use crate::matcher::MatchRule;

    fn analyzer_config(text: &str) -> Config {
        Config::parse(get_driver(Platform::Generic).unwrap(), text).unwrap()
    }

    fn acl_rule() -> UnusedObjectRule {
        UnusedObjectRule::new(
            "test-acl",
            vec![MatchRule::startswith("ip access-list extended ")],
            vec![
                ReferencePattern::new(
                    vec![
                        MatchRule::startswith("interface "),
                        MatchRule::startswith("ip access-group "),
                    ],
                    r"ip access-group\s+(\S+)",
                    "interface-applied",
                )
                .unwrap(),
            ],
            "no ip access-list extended {name}",
        )
        .with_weight(150)
    }

    #[test]
    fn test_find_definitions_and_references() {
        let config = analyzer_config(
            "ip access-list extended UNUSED_ACL\n permit ip any any\nip access-list extended USED_ACL\n deny ip any any\ninterface GigabitEthernet0/1\n ip access-group USED_ACL in\n",
        );
        let analyzer = UnusedObjectAnalyzer::with_rules(&config, vec![acl_rule()]);

        let definitions = analyzer.find_definitions(&acl_rule());
        assert_eq!(definitions.len(), 2);
        assert_eq!(definitions[0].metadata.get("acl_type").unwrap(), "extended");

        let references = analyzer.find_references(&acl_rule());
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].name, "USED_ACL");
    }

    #[test]
    fn test_unused_objects_and_removal_commands() {
        let config = analyzer_config(
            "ip access-list extended UNUSED_ACL\n permit ip any any\nip access-list extended USED_ACL\n deny ip any any\ninterface GigabitEthernet0/1\n ip access-group USED_ACL in\n",
        );
        let analyzer = UnusedObjectAnalyzer::with_rules(&config, vec![acl_rule()]);

        let analysis = analyzer.analyze();
        assert_eq!(analysis.total_defined, 2);
        assert_eq!(analysis.total_unused, 1);
        assert_eq!(analysis.unused_objects["test-acl"][0].name, "UNUSED_ACL");
        assert_eq!(
            analysis.removal_commands,
            vec!["no ip access-list extended UNUSED_ACL"]
        );
    }

    #[test]
    fn test_removal_config_carries_order_weight() {
        let config = analyzer_config("ip access-list extended UNUSED_ACL\n permit ip any any\n");
        let analyzer = UnusedObjectAnalyzer::with_rules(&config, vec![acl_rule()]);

        let removal = analyzer.removal_config();
        let child = removal
            .child_by_text(ROOT, "no ip access-list extended UNUSED_ACL")
            .unwrap();
        assert_eq!(removal.order_weight(child), 150);
    }

    #[test]
    fn test_case_insensitive_comparison() {
        let config = analyzer_config(
            "ip access-list extended Mixed_Case\n permit ip any any\ninterface GigabitEthernet0/1\n ip access-group MIXED_CASE in\n",
        );
        let rule = acl_rule().case_insensitive();
        let analyzer = UnusedObjectAnalyzer::with_rules(&config, vec![rule]);

        let analysis = analyzer.analyze();
        assert_eq!(analysis.total_unused, 0);
    }

    #[test]
    fn test_unknown_placeholder_skips_command() {
        let mut rule = acl_rule();
        rule.removal_template = "no ip access-list {missing_kind} {name}".to_string();
        let config = analyzer_config("ip access-list extended UNUSED_ACL\n permit ip any any\n");
        let analyzer = UnusedObjectAnalyzer::with_rules(&config, vec![rule]);

        let analysis = analyzer.analyze();
        assert_eq!(analysis.total_unused, 1);
        assert!(analysis.removal_commands.is_empty());
    }

    #[test]
    fn test_name_extraction_heuristics() {
        assert_eq!(
            extract_object_name("ip access-list extended EDGE_IN").unwrap(),
            "EDGE_IN"
        );
        assert_eq!(
            extract_object_name("ipv6 access-list V6_EDGE").unwrap(),
            "V6_EDGE"
        );
        assert_eq!(
            extract_object_name("route-map RM_OUT permit 10").unwrap(),
            "RM_OUT"
        );
        assert_eq!(
            extract_object_name("class-map match-any VOICE").unwrap(),
            "VOICE"
        );
        assert_eq!(extract_object_name("vrf definition MGMT").unwrap(), "MGMT");
        assert_eq!(
            extract_object_name("object-group network SERVERS").unwrap(),
            "SERVERS"
        );
        assert_eq!(
            extract_object_name("ip prefix-list PL_LOOPBACKS seq 5 permit 10.0.0.0/8").unwrap(),
            "PL_LOOPBACKS"
        );
        // fallback: second token
        assert_eq!(extract_object_name("track 100 ip sla 1").unwrap(), "100");
    }
}
