//! Tree wrapper: construction from adjacency entries or binary-tree arrays,
//! recursive ordering and simple queries.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, instrument};

use crate::domain::builder::{AdjacencyBuilder, NodeKey};
use crate::domain::error::TreeResult;
use crate::domain::layout::{compute_positions, Positions};
use crate::domain::node::TreeNode;

/// A rooted tree; `root` is `None` only for an empty binary-tree array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<I, P = ()> {
    pub root: Option<TreeNode<I, P>>,
}

impl<I, P> Default for Tree<I, P> {
    fn default() -> Self {
        Self { root: None }
    }
}

impl<I, P> From<TreeNode<I, P>> for Tree<I, P> {
    fn from(root: TreeNode<I, P>) -> Self {
        Self { root: Some(root) }
    }
}

impl<I, P> Tree<I, P>
where
    I: Eq + Hash + Clone + Debug,
{
    /// Build a tree from ordered adjacency entries.
    ///
    /// Each entry pairs a key (bare id or id with payload) with its ordered
    /// child references. Without an explicit `root` the first entry's key is
    /// the root.
    ///
    /// # Errors
    /// * [`DomainError::EmptyAdjacency`](crate::domain::DomainError::EmptyAdjacency) for no entries
    /// * [`DomainError::RootNotFound`](crate::domain::DomainError::RootNotFound) if `root`
    ///   is not a key
    /// * [`DomainError::DuplicateKey`](crate::domain::DomainError::DuplicateKey) if a key repeats
    #[instrument(level = "debug", skip(entries))]
    pub fn from_adjacency<E, C>(entries: E, root: Option<I>) -> TreeResult<Self>
    where
        E: IntoIterator<Item = (NodeKey<I, P>, C)>,
        C: IntoIterator<Item = NodeKey<I, P>>,
    {
        let mut builder = AdjacencyBuilder::new();
        for (key, children) in entries {
            builder.add_entry(key, children)?;
        }
        let root = builder.build(root.as_ref())?;
        debug!(nodes = root.len(), "built tree from adjacency");
        Ok(Self { root: Some(root) })
    }
}

impl<I, P> Tree<I, P> {
    /// Build a binary tree from a level-order array.
    ///
    /// Index `i` has its children at `2i+1` and `2i+2`; `None` marks a missing
    /// node and its whole subtree is skipped. No payloads are attached.
    pub fn from_binary_tree<V>(values: V) -> Self
    where
        V: IntoIterator<Item = Option<I>>,
    {
        let mut values: Vec<Option<I>> = values.into_iter().collect();
        let n = values.len();

        // A slot holds a node only if it and all of its ancestors are present
        let mut present = vec![false; n];
        for i in 0..n {
            present[i] = values[i].is_some() && (i == 0 || present[(i - 1) / 2]);
        }

        let mut slots: Vec<Option<TreeNode<I, P>>> = (0..n).map(|_| None).collect();
        for i in (0..n).rev() {
            if !present[i] {
                continue;
            }
            let Some(id) = values[i].take() else {
                continue;
            };
            let children = [2 * i + 1, 2 * i + 2]
                .into_iter()
                .filter(|&c| c < n)
                .filter_map(|c| slots[c].take())
                .collect();
            slots[i] = Some(TreeNode::new(id).with_children(children));
        }

        Self {
            root: slots.into_iter().next().flatten(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::len)
    }

    /// Number of levels, 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::height)
    }

    /// Leaf identifiers from left to right.
    pub fn leaves(&self) -> Vec<&I> {
        self.root
            .iter()
            .flat_map(|root| root.iter())
            .filter(|(node, _)| node.is_leaf())
            .map(|(node, _)| &node.id)
            .collect()
    }

    /// Recursively reorder children at every level with a comparator.
    pub fn order_by<F>(&mut self, compare: F)
    where
        F: FnMut(&TreeNode<I, P>, &TreeNode<I, P>) -> Ordering,
    {
        if let Some(root) = self.root.as_mut() {
            root.sort_by(compare);
        }
    }

    /// Recursively reorder children at every level by a key of each child.
    pub fn order_by_key<K, F>(&mut self, key: F)
    where
        K: Ord,
        F: FnMut(&TreeNode<I, P>) -> K,
    {
        if let Some(root) = self.root.as_mut() {
            root.sort_by_key(key);
        }
    }
}

impl<I: PartialEq, P> Tree<I, P> {
    /// First node with the given identifier, in pre-order.
    pub fn find(&self, id: &I) -> Option<&TreeNode<I, P>> {
        self.root
            .iter()
            .flat_map(|root| root.iter())
            .map(|(node, _)| node)
            .find(|node| node.id == *id)
    }
}

impl<I: Ord, P> Tree<I, P> {
    /// Recursively reorder children at every level by identifier.
    pub fn order(&mut self) {
        if let Some(root) = self.root.as_mut() {
            root.sort();
        }
    }
}

impl<I, P> Tree<I, P>
where
    I: Eq + Hash + Clone,
{
    /// Layout of the whole tree; empty for an absent root.
    pub fn positions(&self, x_spacing: f64, y_spacing: f64) -> Positions<'_, I, P> {
        self.root
            .as_ref()
            .map(|root| compute_positions(root, x_spacing, y_spacing))
            .unwrap_or_default()
    }
}
