//! Input documents: TOML adjacency files and binary-tree array tokens.
//!
//! ```toml
//! root = "A"              # optional, defaults to the first node
//!
//! [[nodes]]
//! id = "A"
//! label = "first"         # optional payload
//! children = ["B", { id = "C", label = "third" }]
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{NodeKey, Tree};

/// Tree of string identifiers with optional string labels.
pub type LabeledTree = Tree<String, String>;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AdjacencyDocument {
    pub root: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeEntry {
    pub id: String,
    pub label: Option<String>,
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

/// A child written as a bare id or as an inline table with a label.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ChildRef {
    Id(String),
    Node { id: String, label: Option<String> },
}

fn node_key(id: String, label: Option<String>) -> NodeKey<String, String> {
    match label {
        Some(label) => NodeKey::WithPayload(id, label),
        None => NodeKey::Id(id),
    }
}

impl From<ChildRef> for NodeKey<String, String> {
    fn from(child: ChildRef) -> Self {
        match child {
            ChildRef::Id(id) => NodeKey::Id(id),
            ChildRef::Node { id, label } => node_key(id, label),
        }
    }
}

impl AdjacencyDocument {
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Input {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read input", path)?;
        let document = Self::parse(&content, path)?;
        debug!(entries = document.nodes.len(), "loaded adjacency document");
        Ok(document)
    }

    /// Build the tree; `root` overrides the document's own `root`.
    pub fn into_tree(self, root: Option<String>) -> ApplicationResult<LabeledTree> {
        let root = root.or(self.root);
        let entries = self.nodes.into_iter().map(|entry| {
            let children: Vec<NodeKey<String, String>> =
                entry.children.into_iter().map(NodeKey::from).collect();
            (node_key(entry.id, entry.label), children)
        });
        Ok(Tree::from_adjacency(entries, root)?)
    }
}

/// Tokens that mark a missing slot in a binary-tree array.
const MISSING: [&str; 4] = ["", "_", "null", "none"];

/// Build a binary tree from level-order tokens; see [`MISSING`].
pub fn binary_tree_from_tokens<S: AsRef<str>>(tokens: &[S]) -> LabeledTree {
    Tree::from_binary_tree(tokens.iter().map(|token| {
        let token = token.as_ref().trim();
        if MISSING.contains(&token.to_ascii_lowercase().as_str()) {
            None
        } else {
            Some(token.to_string())
        }
    }))
}
