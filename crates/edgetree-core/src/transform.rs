//! Flat records to hierarchy.
//!
//! `transform` indexes every record by its id key, resolves each edge to the
//! target's node (or a fresh placeholder when the target is absent) and
//! returns the records nobody points at as roots.
//!
//! Construction never walks child lists, so it terminates on cyclic input in
//! O(records + edges). The result is a DAG of shared nodes: use
//! [`crate::walk::Walker`] to traverse it.

use std::collections::{HashMap, HashSet};
use std::slice;

use serde_json::Value;
use tracing::{debug, trace};

use crate::arena::{NodeArena, NodeId, TreeNode};
use crate::ident::IdKey;
use crate::record::Record;

/// Shape of the transformation result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Roots {
    /// No record qualified as a root (empty or fully cyclic input).
    #[default]
    Empty,
    /// Exactly one root.
    Single(NodeId),
    /// Several roots, in input order.
    Many(Vec<NodeId>),
}

impl Roots {
    pub fn from_vec(mut roots: Vec<NodeId>) -> Self {
        match roots.len() {
            0 => Roots::Empty,
            1 => Roots::Single(roots.remove(0)),
            _ => Roots::Many(roots),
        }
    }

    pub fn as_slice(&self) -> &[NodeId] {
        match self {
            Roots::Empty => &[],
            Roots::Single(id) => slice::from_ref(id),
            Roots::Many(ids) => ids,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Roots::Empty)
    }
}

/// Nodes produced by one transformation plus the root shape.
#[derive(Debug, Default)]
pub struct Hierarchy<'a> {
    arena: NodeArena<'a>,
    roots: Roots,
}

impl<'a> Hierarchy<'a> {
    pub fn new(arena: NodeArena<'a>, roots: Roots) -> Self {
        Self { arena, roots }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    pub fn root_ids(&self) -> &[NodeId] {
        self.roots.as_slice()
    }

    /// True when there is no root, the `null` result.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn arena(&self) -> &NodeArena<'a> {
        &self.arena
    }

    pub fn node(&self, id: NodeId) -> &TreeNode<'a> {
        &self.arena[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode<'a>> {
        self.arena.get(id)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.arena.get(id).map(TreeNode::children).unwrap_or(&[])
    }

    /// Number of allocated nodes, placeholders included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn missing_count(&self) -> usize {
        self.arena.iter().filter(|(_, node)| node.is_missing()).count()
    }
}

/// Build the hierarchy for `records`.
pub fn transform(records: &[Value]) -> Hierarchy<'_> {
    if records.is_empty() {
        return Hierarchy::empty();
    }

    let mut arena = NodeArena::with_capacity(records.len());
    let mut lookup: HashMap<IdKey, NodeId> = HashMap::with_capacity(records.len());
    let mut keys = Vec::with_capacity(records.len());

    for value in records {
        let key = Record::new(value).id_key();
        let node = arena.alloc(TreeNode::record(value, key.clone()));
        if lookup.insert(key.clone(), node).is_some() {
            trace!(id = %key, "duplicate id shadows an earlier record");
        }
        keys.push(key);
    }

    let mut targeted: HashSet<IdKey> = HashSet::new();
    let mut missing = 0usize;

    for (value, key) in records.iter().zip(&keys) {
        // Duplicates resolve to the last record carrying the id.
        let source = lookup[key];
        for target in Record::new(value).edge_targets() {
            let child = match lookup.get(&target) {
                Some(&child) => {
                    targeted.insert(target);
                    child
                }
                None => {
                    missing += 1;
                    arena.alloc(TreeNode::missing(target))
                }
            };
            arena.push_child(source, child);
        }
    }

    let roots: Vec<NodeId> = keys
        .iter()
        .filter(|key| !targeted.contains(*key))
        .map(|key| lookup[key])
        .collect();

    debug!(
        records = records.len(),
        roots = roots.len(),
        missing,
        "built hierarchy"
    );

    Hierarchy::new(arena, Roots::from_vec(roots))
}
