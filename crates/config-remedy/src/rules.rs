//! Declarative rule types consulted by the parser, differ, emitter and
//! analyzer
//!
//! All rule categories are plain immutable records; lineage-based rules carry
//! a sequence of [`MatchRule`]s describing an inclusive root-to-target path.
//! A driver owns one [`DriverRules`] value, populated per platform.

use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::matcher::MatchRule;
use crate::tree::Config;

/// Callback invoked after parsing, before any diff; may mutate the tree.
pub type PostLoadCallback = fn(&mut Config);

/// Emit `exit_text` as the final line of sections matching the lineage.
#[derive(Debug, Clone)]
pub struct SectionalExitingRule {
    /// Inclusive path from the root to the section
    pub match_rules: Vec<MatchRule>,
    /// Terminator line appended at render time
    pub exit_text: String,
}

/// Changed sections matching the lineage are negated and re-added whole.
#[derive(Debug, Clone)]
pub struct SectionalOverwriteRule {
    /// Inclusive path from the root to the section
    pub match_rules: Vec<MatchRule>,
}

/// Changed sections matching the lineage are re-added whole, without a
/// preceding negation.
#[derive(Debug, Clone)]
pub struct SectionalOverwriteNoNegateRule {
    /// Inclusive path from the root to the section
    pub match_rules: Vec<MatchRule>,
}

/// Assign `weight` to matched nodes before emission; lower sorts earlier.
#[derive(Debug, Clone)]
pub struct OrderingRule {
    /// Inclusive path from the root to the node
    pub match_rules: Vec<MatchRule>,
    /// Replacement order weight
    pub weight: i32,
}

/// Treat lines between the two expressions as one indentation level deeper.
#[derive(Debug, Clone)]
pub struct IndentAdjustRule {
    /// Expression opening the adjusted region
    pub start_expression: Regex,
    /// Expression closing the adjusted region
    pub end_expression: Regex,
}

impl IndentAdjustRule {
    /// Build a rule from two regex patterns.
    ///
    /// # Errors
    /// Returns an error if either pattern fails to compile.
    pub fn new(start_expression: &str, end_expression: &str) -> Result<Self> {
        Ok(Self {
            start_expression: Regex::new(start_expression)?,
            end_expression: Regex::new(end_expression)?,
        })
    }
}

/// Duplicate-text children are permitted under parents matching the lineage.
#[derive(Debug, Clone)]
pub struct ParentAllowsDuplicateChildRule {
    /// Inclusive path from the root to the parent
    pub match_rules: Vec<MatchRule>,
}

/// Substitution applied to the entire pre-parse text.
#[derive(Debug, Clone)]
pub struct FullTextSubRule {
    /// Pattern to search for
    pub search: Regex,
    /// Replacement text
    pub replace: String,
}

impl FullTextSubRule {
    /// Build a substitution rule.
    ///
    /// # Errors
    /// Returns an error if the pattern fails to compile.
    pub fn new(search: &str, replace: &str) -> Result<Self> {
        Ok(Self {
            search: Regex::new(search)?,
            replace: replace.to_string(),
        })
    }
}

/// Substitution applied to each physical line after banner aggregation.
#[derive(Debug, Clone)]
pub struct PerLineSubRule {
    /// Pattern to search for
    pub search: Regex,
    /// Replacement text
    pub replace: String,
}

impl PerLineSubRule {
    /// Build a substitution rule.
    ///
    /// # Errors
    /// Returns an error if the pattern fails to compile.
    pub fn new(search: &str, replace: &str) -> Result<Self> {
        Ok(Self {
            search: Regex::new(search)?,
            replace: replace.to_string(),
        })
    }
}

/// Two commands sharing the lineage replace one another rather than coexist.
#[derive(Debug, Clone)]
pub struct IdempotentCommandsRule {
    /// Inclusive path from the root to the command
    pub match_rules: Vec<MatchRule>,
}

/// Excludes matched commands from idempotent treatment.
#[derive(Debug, Clone)]
pub struct IdempotentCommandsAvoidRule {
    /// Inclusive path from the root to the command
    pub match_rules: Vec<MatchRule>,
}

/// Negating a matched line emits the `default ` form instead of the `no `
/// form.
#[derive(Debug, Clone)]
pub struct NegationDefaultWhenRule {
    /// Inclusive path from the root to the command
    pub match_rules: Vec<MatchRule>,
}

/// Negating a matched line emits `use` verbatim.
#[derive(Debug, Clone)]
pub struct NegateWithRule {
    /// Inclusive path from the root to the command
    pub match_rules: Vec<MatchRule>,
    /// Replacement text for the negation
    pub use_text: String,
}

/// Tag application rule: nodes matching the lineage receive `apply_tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct TagRule {
    /// Inclusive path from the root to the node
    pub match_rules: Vec<MatchRule>,
    /// Tags applied to matched nodes (propagated to leaves)
    pub apply_tags: BTreeSet<String>,
}

/// Locates references to a defined object.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    /// Inclusive path from the root to lines that may reference the object
    pub match_rules: Vec<MatchRule>,
    /// Regex extracting the referenced name from the line
    pub extract_regex: Regex,
    /// Caller label for this kind of reference (e.g. "interface-applied")
    pub reference_type: String,
    /// References whose name matches any of these patterns are skipped
    pub ignore_patterns: Vec<Regex>,
    /// Capture group in `extract_regex` holding the name
    pub capture_group: usize,
}

impl ReferencePattern {
    /// Build a reference pattern with capture group 1 and no ignores.
    ///
    /// # Errors
    /// Returns an error if the extraction pattern fails to compile.
    pub fn new(
        match_rules: Vec<MatchRule>,
        extract_regex: &str,
        reference_type: &str,
    ) -> Result<Self> {
        Ok(Self {
            match_rules,
            extract_regex: Regex::new(extract_regex)?,
            reference_type: reference_type.to_string(),
            ignore_patterns: Vec::new(),
            capture_group: 1,
        })
    }
}

/// Declares how one kind of configuration object is defined, referenced, and
/// removed. Consumed by the unused-object analyzer.
#[derive(Debug, Clone)]
pub struct UnusedObjectRule {
    /// Caller label for the object kind (e.g. "extended-acl")
    pub object_type: String,
    /// Any matching line is a definition of this object kind
    pub definition_match: Vec<MatchRule>,
    /// Where and how the object is referenced
    pub reference_patterns: Vec<ReferencePattern>,
    /// Removal command template with `{name}` and metadata placeholders
    pub removal_template: String,
    /// Order weight assigned to generated removal commands
    pub removal_order_weight: i32,
    /// Compare object names case-sensitively
    pub case_sensitive: bool,
    /// Advisory: references inside comments count as usage
    pub allow_in_comment: bool,
    /// Advisory: referenced names must match definitions exactly
    pub require_exact_match: bool,
}

impl UnusedObjectRule {
    /// Build a rule with the common defaults (weight 100, case-sensitive).
    #[must_use]
    pub fn new(
        object_type: &str,
        definition_match: Vec<MatchRule>,
        reference_patterns: Vec<ReferencePattern>,
        removal_template: &str,
    ) -> Self {
        Self {
            object_type: object_type.to_string(),
            definition_match,
            reference_patterns,
            removal_template: removal_template.to_string(),
            removal_order_weight: 100,
            case_sensitive: true,
            allow_in_comment: false,
            require_exact_match: true,
        }
    }

    /// Set the removal order weight.
    #[must_use]
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.removal_order_weight = weight;
        self
    }

    /// Compare object names case-insensitively.
    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }
}

/// The complete rule set owned by a driver.
#[derive(Debug, Clone, Default)]
pub struct DriverRules {
    /// Section terminator synthesis
    pub sectional_exiting: Vec<SectionalExitingRule>,
    /// Negate-and-recreate sections
    pub sectional_overwrite: Vec<SectionalOverwriteRule>,
    /// Recreate-only sections
    pub sectional_overwrite_no_negate: Vec<SectionalOverwriteNoNegateRule>,
    /// Emission order weights
    pub ordering: Vec<OrderingRule>,
    /// Indentation adjustments during parsing
    pub indent_adjust: Vec<IndentAdjustRule>,
    /// Parents under which duplicate children are legal
    pub parent_allows_duplicate_child: Vec<ParentAllowsDuplicateChildRule>,
    /// Whole-text substitutions before parsing
    pub full_text_sub: Vec<FullTextSubRule>,
    /// Per-line substitutions during parsing
    pub per_line_sub: Vec<PerLineSubRule>,
    /// Commands that replace rather than coexist
    pub idempotent_commands: Vec<IdempotentCommandsRule>,
    /// Exclusions from idempotent treatment
    pub idempotent_commands_avoid: Vec<IdempotentCommandsAvoidRule>,
    /// Commands negated with the `default ` form
    pub negation_default_when: Vec<NegationDefaultWhenRule>,
    /// Commands negated with verbatim replacement text
    pub negate_with: Vec<NegateWithRule>,
    /// Tree fix-ups run after parsing
    pub post_load_callbacks: Vec<PostLoadCallback>,
    /// Definition/reference scanning rules for the analyzer
    pub unused_object_rules: Vec<UnusedObjectRule>,
}
