//! Staging builder for adjacency input.
//!
//! Each identifier is staged exactly once in an arena; child references are
//! resolved to arena indices. The owned tree is assembled bottom-up from the
//! root afterwards, so neither phase recurses.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use generational_arena::{Arena, Index};
use tracing::{instrument, trace, warn};

use crate::domain::error::{DomainError, TreeResult};
use crate::domain::node::TreeNode;

/// A bare identifier or an identifier carrying a payload.
///
/// Used both for adjacency keys and for child references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKey<I, P> {
    Id(I),
    WithPayload(I, P),
}

impl<I, P> NodeKey<I, P> {
    pub fn id(&self) -> &I {
        match self {
            NodeKey::Id(id) | NodeKey::WithPayload(id, _) => id,
        }
    }

    fn into_parts(self) -> (I, Option<P>) {
        match self {
            NodeKey::Id(id) => (id, None),
            NodeKey::WithPayload(id, payload) => (id, Some(payload)),
        }
    }
}

#[derive(Debug)]
struct StagedNode<I, P> {
    id: I,
    /// Payload given where the node is a key
    key_payload: Option<P>,
    /// First payload given through a child reference
    ref_payload: Option<P>,
    is_key: bool,
    children: Vec<Index>,
}

impl<I, P> StagedNode<I, P> {
    fn new(id: I) -> Self {
        Self {
            id,
            key_payload: None,
            ref_payload: None,
            is_key: false,
            children: Vec::new(),
        }
    }
}

/// Collects adjacency entries and assembles them into an owned tree.
pub struct AdjacencyBuilder<I, P> {
    arena: Arena<StagedNode<I, P>>,
    lookup: HashMap<I, Index>,
    first_key: Option<Index>,
}

impl<I, P> Default for AdjacencyBuilder<I, P>
where
    I: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P> AdjacencyBuilder<I, P>
where
    I: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            lookup: HashMap::new(),
            first_key: None,
        }
    }

    fn stage(&mut self, id: I) -> Index {
        if let Some(&idx) = self.lookup.get(&id) {
            return idx;
        }
        let idx = self.arena.insert(StagedNode::new(id.clone()));
        self.lookup.insert(id, idx);
        idx
    }

    /// Stage one adjacency entry: a key and its ordered child references.
    ///
    /// A key may appear only once; children may reference identifiers that
    /// are never listed as keys (they become leaves).
    pub fn add_entry<C>(&mut self, key: NodeKey<I, P>, children: C) -> TreeResult<()>
    where
        C: IntoIterator<Item = NodeKey<I, P>>,
    {
        let (id, payload) = key.into_parts();
        let idx = self.stage(id);
        if self.arena[idx].is_key {
            return Err(DomainError::DuplicateKey(format!("{:?}", self.arena[idx].id)));
        }
        if self.first_key.is_none() {
            self.first_key = Some(idx);
        }

        let child_indices: Vec<Index> = children
            .into_iter()
            .map(|child| {
                let (child_id, child_payload) = child.into_parts();
                let child_idx = self.stage(child_id);
                if let (Some(p), Some(staged)) = (child_payload, self.arena.get_mut(child_idx)) {
                    if staged.ref_payload.is_none() {
                        staged.ref_payload = Some(p);
                    }
                }
                child_idx
            })
            .collect();

        let staged = &mut self.arena[idx];
        staged.is_key = true;
        staged.key_payload = payload;
        staged.children = child_indices;
        trace!(id = ?staged.id, children = staged.children.len(), "staged entry");
        Ok(())
    }

    /// Assemble the owned tree rooted at `root`, or at the first key if `None`.
    #[instrument(level = "debug", skip(self))]
    pub fn build(mut self, root: Option<&I>) -> TreeResult<TreeNode<I, P>> {
        let root_idx = match root {
            Some(id) => self
                .lookup
                .get(id)
                .copied()
                .filter(|&idx| self.arena[idx].is_key)
                .ok_or_else(|| DomainError::RootNotFound(format!("{:?}", id)))?,
            None => self.first_key.ok_or(DomainError::EmptyAdjacency)?,
        };

        let mut built: HashMap<Index, TreeNode<I, P>> = HashMap::new();
        let mut entered: HashSet<Index> = HashSet::new();
        let mut stack = vec![(root_idx, false)];

        while let Some((idx, visited)) = stack.pop() {
            if !visited {
                if !entered.insert(idx) {
                    let id = self.arena.get(idx).map(|staged| &staged.id);
                    warn!(?id, "node reachable twice, keeping first attachment");
                    continue;
                }
                stack.push((idx, true));
                for &child in self.arena[idx].children.iter().rev() {
                    stack.push((child, false));
                }
                continue;
            }

            let Some(staged) = self.arena.remove(idx) else {
                continue;
            };
            let children = staged
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            let node = TreeNode {
                id: staged.id,
                payload: staged.key_payload.or(staged.ref_payload),
                children,
            };
            built.insert(idx, node);
        }

        let unreachable = self.arena.len();
        if unreachable > 0 {
            trace!(unreachable, "dropping entries not reachable from root");
        }

        built
            .remove(&root_idx)
            .ok_or_else(|| DomainError::RootNotFound(format!("{:?}", root)))
    }
}
