//! Text matching primitives
//!
//! A [`MatchRule`] bundles optional predicates over a command line. Sequences
//! of match rules describe root-to-node paths ("lineages") and drive every
//! rule category in the platform drivers.

use regex::Regex;
use serde::Deserialize;

use crate::error::Result;

/// A single text predicate.
///
/// Every populated field must match for the rule to match. The string-list
/// fields match when *any* of their elements match; an empty list means the
/// field is unspecified. A rule with no fields populated matches any text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "MatchRuleRepr")]
pub struct MatchRule {
    /// Text is equal to any of these strings
    pub equals: Vec<String>,
    /// Text starts with any of these strings
    pub startswith: Vec<String>,
    /// Text ends with any of these strings
    pub endswith: Vec<String>,
    /// Text contains any of these strings
    pub contains: Vec<String>,
    /// Text matches this regular expression (search, not anchored)
    pub re_search: Option<Regex>,
}

impl MatchRule {
    /// Rule matching texts equal to `value`
    #[must_use]
    pub fn equals(value: impl Into<String>) -> Self {
        Self {
            equals: vec![value.into()],
            ..Self::default()
        }
    }

    /// Rule matching texts equal to any of `values`
    #[must_use]
    pub fn equals_any<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            equals: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Rule matching texts starting with `value`
    #[must_use]
    pub fn startswith(value: impl Into<String>) -> Self {
        Self {
            startswith: vec![value.into()],
            ..Self::default()
        }
    }

    /// Rule matching texts starting with any of `values`
    #[must_use]
    pub fn startswith_any<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            startswith: values.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Rule matching texts ending with `value`
    #[must_use]
    pub fn endswith(value: impl Into<String>) -> Self {
        Self {
            endswith: vec![value.into()],
            ..Self::default()
        }
    }

    /// Rule matching texts containing `value`
    #[must_use]
    pub fn contains(value: impl Into<String>) -> Self {
        Self {
            contains: vec![value.into()],
            ..Self::default()
        }
    }

    /// Rule matching texts against a regular expression.
    ///
    /// # Errors
    /// Returns an error if the pattern fails to compile.
    pub fn re_search(pattern: &str) -> Result<Self> {
        Ok(Self {
            re_search: Some(Regex::new(pattern)?),
            ..Self::default()
        })
    }

    /// True when no predicate is populated; such a rule matches anything.
    #[must_use]
    pub fn is_unspecified(&self) -> bool {
        self.equals.is_empty()
            && self.startswith.is_empty()
            && self.endswith.is_empty()
            && self.contains.is_empty()
            && self.re_search.is_none()
    }

    /// Evaluate this rule against `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        if !self.equals.is_empty() && !self.equals.iter().any(|e| text == e) {
            return false;
        }
        if !self.startswith.is_empty() && !self.startswith.iter().any(|s| text.starts_with(s)) {
            return false;
        }
        if !self.endswith.is_empty() && !self.endswith.iter().any(|s| text.ends_with(s)) {
            return false;
        }
        if !self.contains.is_empty() && !self.contains.iter().any(|s| text.contains(s)) {
            return false;
        }
        if let Some(re) = &self.re_search {
            if !re.is_match(text) {
                return false;
            }
        }
        true
    }
}

/// Deserialization shape for [`MatchRule`]: each string field accepts a
/// single string or a list, matching the on-disk rule format.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MatchRuleRepr {
    equals: Option<OneOrMany>,
    startswith: Option<OneOrMany>,
    endswith: Option<OneOrMany>,
    contains: Option<OneOrMany>,
    re_search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn into_strings(value: Option<OneOrMany>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    }
}

impl TryFrom<MatchRuleRepr> for MatchRule {
    type Error = regex::Error;

    fn try_from(repr: MatchRuleRepr) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            equals: into_strings(repr.equals),
            startswith: into_strings(repr.startswith),
            endswith: into_strings(repr.endswith),
            contains: into_strings(repr.contains),
            re_search: repr.re_search.as_deref().map(Regex::new).transpose()?,
        })
    }
}
