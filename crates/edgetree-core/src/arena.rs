//! Index-based node storage.
//!
//! Every node of a hierarchy lives in one `NodeArena` slot and is addressed by
//! its `NodeId`. Child lists hold ids, not owned nodes, so a target reached
//! from several parents is one slot referenced several times.

use std::fmt;
use std::ops::Index;

use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::ident::IdKey;
use crate::record::{CHILDREN_FIELD, ID_FIELD, MISSING_FLAG, NAME_FIELD, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl NodeId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

pub type Children = SmallVec<[NodeId; 4]>;

/// Node built from an input record. Attributes stay borrowed from the input.
#[derive(Debug, Clone)]
pub struct RecordNode<'a> {
    record: Record<'a>,
    key: IdKey,
    children: Children,
}

impl<'a> RecordNode<'a> {
    pub fn record(&self) -> Record<'a> {
        self.record
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Placeholder synthesized for an edge whose target is not in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingNode {
    target: IdKey,
    attributes: Map<String, Value>,
}

impl MissingNode {
    pub fn new(target: IdKey) -> Self {
        let mut attributes = Map::new();
        attributes.insert(ID_FIELD.to_string(), Value::String(format!("missing-{target}")));
        attributes.insert(
            NAME_FIELD.to_string(),
            Value::String(format!("Missing: {target}")),
        );
        attributes.insert(MISSING_FLAG.to_string(), Value::Bool(true));
        Self { target, attributes }
    }

    /// The unresolved target id.
    pub fn target(&self) -> &IdKey {
        &self.target
    }
}

#[derive(Debug, Clone)]
pub enum TreeNode<'a> {
    Record(RecordNode<'a>),
    Missing(MissingNode),
}

impl<'a> TreeNode<'a> {
    pub fn record(value: &'a Value, key: IdKey) -> Self {
        TreeNode::Record(RecordNode {
            record: Record::new(value),
            key,
            children: Children::new(),
        })
    }

    pub fn missing(target: IdKey) -> Self {
        TreeNode::Missing(MissingNode::new(target))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, TreeNode::Missing(_))
    }

    /// Key of the node's own id (`missing-<target>` for placeholders).
    pub fn id_key(&self) -> IdKey {
        match self {
            TreeNode::Record(node) => node.key.clone(),
            TreeNode::Missing(node) => IdKey::from_value(node.attributes.get(ID_FIELD)),
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            TreeNode::Record(node) => &node.children,
            TreeNode::Missing(_) => &[],
        }
    }

    /// Look up a top-level attribute.
    ///
    /// The record's own `children` field is shadowed by the node's child list
    /// and is never returned.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        if key == CHILDREN_FIELD {
            return None;
        }
        match self {
            TreeNode::Record(node) => node.record.value().get(key),
            TreeNode::Missing(node) => node.attributes.get(key),
        }
    }

    /// Top-level attributes in input order, without `children`.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        let map = match self {
            TreeNode::Record(node) => node.record.attributes(),
            TreeNode::Missing(node) => Some(&node.attributes),
        };
        map.into_iter()
            .flatten()
            .filter(|(key, _)| key.as_str() != CHILDREN_FIELD)
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Display label: the `name` attribute when it is a string, else the id.
    pub fn label(&self) -> String {
        match self {
            TreeNode::Missing(node) => node.target.to_string(),
            TreeNode::Record(node) => match self.attribute(NAME_FIELD) {
                Some(Value::String(name)) => name.clone(),
                _ => node.key.to_string(),
            },
        }
    }
}

/// Arena owning every node of one hierarchy.
#[derive(Debug, Default)]
pub struct NodeArena<'a> {
    nodes: Vec<TreeNode<'a>>,
}

impl<'a> NodeArena<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub fn alloc(&mut self, node: TreeNode<'a>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode<'a>> {
        self.nodes.get(id.index())
    }

    /// Append `child` to the child list of `parent`.
    ///
    /// Placeholders never get children; the call is ignored for them.
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        match self.nodes.get_mut(parent.index()) {
            Some(TreeNode::Record(node)) => node.children.push(child),
            Some(TreeNode::Missing(_)) | None => {
                debug_assert!(false, "cannot attach child {child} to node {parent}");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode<'a>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx as u32), node))
    }
}

impl<'a> Index<NodeId> for NodeArena<'a> {
    type Output = TreeNode<'a>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.index()]
    }
}
