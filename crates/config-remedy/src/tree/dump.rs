//! Stable serialization of a configuration tree
//!
//! A [`Dump`] is the sorted line-by-line projection of a tree; restoring a
//! dump with the same driver reproduces an equal tree.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{Config, NodeId, ROOT};
use crate::driver::Driver;
use crate::error::{ConfigRemedyError, Result};

/// One line of a dumped tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpLine {
    /// Distance from the root (children of the root are depth 1)
    pub depth: usize,
    /// Command text
    pub text: String,
    /// Stored leaf tags (empty on branches)
    pub tags: BTreeSet<String>,
    /// Comments attached to the line
    pub comments: BTreeSet<String>,
    /// Whether the diff introduced this line
    pub new_in_config: bool,
}

/// A serialized configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dump {
    /// Lines in sorted depth-first order
    pub lines: Vec<DumpLine>,
}

impl Config {
    /// Serialize the tree as sorted dump lines.
    #[must_use]
    pub fn dump(&self) -> Dump {
        let lines = self
            .all_children_sorted()
            .into_iter()
            .map(|id| DumpLine {
                depth: self.depth(id),
                text: self.text(id).to_string(),
                tags: self.stored_tags(id).clone(),
                comments: self.comments(id).clone(),
                new_in_config: self.new_in_config(id),
            })
            .collect();
        Dump { lines }
    }

    /// Rebuild a tree from a dump.
    ///
    /// # Errors
    /// Returns an error when a line's depth does not connect to the lines
    /// before it.
    pub fn from_dump(driver: Driver, dump: &Dump) -> Result<Self> {
        let mut config = Config::new(driver);
        // chain[d - 1] holds the most recently added node at depth d
        let mut chain: Vec<NodeId> = Vec::new();
        for line in &dump.lines {
            if line.depth == 0 || line.depth > chain.len() + 1 {
                return Err(ConfigRemedyError::Dump(format!(
                    "line at depth {} does not connect to the tree: {}",
                    line.depth, line.text
                )));
            }
            let parent = if line.depth == 1 {
                ROOT
            } else {
                chain[line.depth - 2]
            };
            let node = config.ensure_child(parent, &line.text);
            config.data_mut(node).tags = line.tags.clone();
            config.data_mut(node).comments = line.comments.clone();
            config.set_new_in_config(node, line.new_in_config);
            chain.truncate(line.depth - 1);
            chain.push(node);
        }
        Ok(config)
    }
}
