//! Owned tree nodes and their iterative traversals.

use std::cmp::Ordering;
use std::fmt::{self, Debug};

/// A node owning its ordered children.
///
/// `id` must behave as a hash key (`Eq` and `Hash` agree); uniqueness within a
/// tree is a precondition, not something the node checks.
///
/// `Clone`, `PartialEq`, `Debug` and `Drop` all run on explicit stacks, so
/// depth is bounded by memory only.
pub struct TreeNode<I, P = ()> {
    /// Identifier, unique within one tree
    pub id: I,
    /// Optional payload used for labelling; `None` means "no payload given"
    pub payload: Option<P>,
    /// Children in left-to-right order
    pub children: Vec<TreeNode<I, P>>,
}

impl<I, P> TreeNode<I, P> {
    pub fn new(id: I) -> Self {
        Self {
            id,
            payload: None,
            children: Vec::new(),
        }
    }

    pub fn with_payload(id: I, payload: P) -> Self {
        Self {
            id,
            payload: Some(payload),
            children: Vec::new(),
        }
    }

    /// Replace the children, keeping their order.
    pub fn with_children(mut self, children: Vec<TreeNode<I, P>>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order traversal yielding `(node, depth)`, the node itself at depth 0.
    pub fn iter(&self) -> PreOrderIter<'_, I, P> {
        PreOrderIter {
            stack: vec![(self, 0)],
        }
    }

    /// Post-order traversal yielding `(node, depth)`.
    ///
    /// Every node is yielded after all of its descendants, siblings left to
    /// right, so leaves come out in rendering order.
    pub fn iter_postorder(&self) -> PostOrderIter<'_, I, P> {
        PostOrderIter {
            stack: vec![(self, 0, false)],
        }
    }

    /// Recursively sort the children of every node in this subtree.
    ///
    /// The sort is stable, so applying the same comparator again leaves the
    /// order unchanged. Runs on an explicit stack; subtree depth is not bounded
    /// by the call stack.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&TreeNode<I, P>, &TreeNode<I, P>) -> Ordering,
    {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            node.children.sort_by(&mut compare);
            stack.extend(node.children.iter_mut());
        }
    }

    /// Recursively sort children by a key extracted from each child node.
    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&TreeNode<I, P>) -> K,
    {
        self.sort_by(|a, b| key(a).cmp(&key(b)));
    }

    /// Number of nodes in this subtree, including itself.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Number of levels in this subtree (a leaf has height 1).
    pub fn height(&self) -> usize {
        self.iter().map(|(_, depth)| depth + 1).max().unwrap_or(0)
    }
}

// The derived drop glue recurses once per level; flatten instead.
impl<I, P> Drop for TreeNode<I, P> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl<I: Clone, P: Clone> Clone for TreeNode<I, P> {
    fn clone(&self) -> Self {
        let mut finished: Vec<TreeNode<I, P>> = Vec::new();
        for (node, _) in self.iter_postorder() {
            let children = finished.split_off(finished.len() - node.children.len());
            finished.push(TreeNode {
                id: node.id.clone(),
                payload: node.payload.clone(),
                children,
            });
        }
        match finished.pop() {
            Some(root) => root,
            None => unreachable!("post-order always ends with the root"),
        }
    }
}

impl<I: PartialEq, P: PartialEq> PartialEq for TreeNode<I, P> {
    /// Pre-order sequences with matching child counts at every step have the
    /// same shape, so a lockstep walk decides equality.
    fn eq(&self, other: &Self) -> bool {
        self.iter().zip(other.iter()).all(|((a, _), (b, _))| {
            a.children.len() == b.children.len() && a.id == b.id && a.payload == b.payload
        })
    }
}

impl<I: Eq, P: Eq> Eq for TreeNode<I, P> {}

/// Flat pre-order listing of `(depth, id, payload)`.
impl<I: Debug, P: Debug> Debug for TreeNode<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.iter()
                    .map(|(node, depth)| (depth, &node.id, &node.payload)),
            )
            .finish()
    }
}

impl<I: Ord, P> TreeNode<I, P> {
    /// Recursively sort children by identifier.
    pub fn sort(&mut self) {
        self.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

pub struct PreOrderIter<'a, I, P> {
    stack: Vec<(&'a TreeNode<I, P>, usize)>,
}

impl<'a, I, P> Iterator for PreOrderIter<'a, I, P> {
    type Item = (&'a TreeNode<I, P>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}

pub struct PostOrderIter<'a, I, P> {
    stack: Vec<(&'a TreeNode<I, P>, usize, bool)>,
}

impl<'a, I, P> Iterator for PostOrderIter<'a, I, P> {
    type Item = (&'a TreeNode<I, P>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth, visited)) = self.stack.pop() {
            if visited {
                return Some((node, depth));
            }
            self.stack.push((node, depth, true));
            for child in node.children.iter().rev() {
                self.stack.push((child, depth + 1, false));
            }
        }
        None
    }
}
