//! Traversal of a built hierarchy.
//!
//! Construction does not look for cycles, so anything that walks child lists
//! goes through [`Walker`]. It keeps the nodes of the current path in a set
//! and reports an edge back onto that path instead of following it, and it
//! can stop descending at a depth bound. The walk uses an explicit stack, so
//! long chains do not grow the call stack.
//!
//! Shared nodes are visited once per occurrence, the same way a tree renderer
//! would draw them.

use std::collections::HashSet;

use edgetree_error::{Error, Result};
use serde_json::{Map, Value};

use crate::arena::{NodeId, TreeNode};
use crate::record::{CHILDREN_FIELD, MISSING_FLAG};
use crate::transform::{Hierarchy, Roots};

/// Callbacks fired by [`Walker::walk`].
///
/// `depth` is 0 for roots. Every `enter_record` is paired with one
/// `leave_record`, after all of the node's children were visited.
pub trait HierarchyVisitor<'h> {
    fn enter_record(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, depth: usize) -> Result<()>;

    fn leave_record(&mut self, _hierarchy: &Hierarchy<'h>, _id: NodeId, _depth: usize) -> Result<()> {
        Ok(())
    }

    fn visit_missing(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, depth: usize) -> Result<()>;

    /// `id` is already on the current path; its children are not visited.
    fn visit_back_edge(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, depth: usize) -> Result<()>;

    /// Called between enter and leave when `id` has children that lie below
    /// the depth bound.
    fn visit_depth_limit(&mut self, _hierarchy: &Hierarchy<'h>, _id: NodeId, _depth: usize) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Walker {
    max_depth: Option<usize>,
}

struct Frame {
    id: NodeId,
    depth: usize,
    next_child: usize,
}

impl Walker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Do not descend into children of nodes at `max_depth`.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Walk every root in order, depth first.
    pub fn walk<'h, V>(&self, hierarchy: &Hierarchy<'h>, visitor: &mut V) -> Result<()>
    where
        V: HierarchyVisitor<'h>,
    {
        for &root in hierarchy.root_ids() {
            self.walk_from(hierarchy, root, visitor)?;
        }
        Ok(())
    }

    /// Walk the sub-structure reachable from `start`.
    pub fn walk_from<'h, V>(&self, hierarchy: &Hierarchy<'h>, start: NodeId, visitor: &mut V) -> Result<()>
    where
        V: HierarchyVisitor<'h>,
    {
        let mut stack: Vec<Frame> = Vec::new();
        let mut on_path: HashSet<NodeId> = HashSet::new();

        self.step(hierarchy, start, 0, visitor, &mut stack, &mut on_path)?;

        while let Some(frame) = stack.last_mut() {
            let children = hierarchy.children(frame.id);
            if frame.next_child < children.len() {
                let child = children[frame.next_child];
                let depth = frame.depth + 1;
                frame.next_child += 1;
                self.step(hierarchy, child, depth, visitor, &mut stack, &mut on_path)?;
            } else {
                let id = frame.id;
                let depth = frame.depth;
                stack.pop();
                on_path.remove(&id);
                visitor.leave_record(hierarchy, id, depth)?;
            }
        }

        Ok(())
    }

    fn step<'h, V>(
        &self,
        hierarchy: &Hierarchy<'h>,
        id: NodeId,
        depth: usize,
        visitor: &mut V,
        stack: &mut Vec<Frame>,
        on_path: &mut HashSet<NodeId>,
    ) -> Result<()>
    where
        V: HierarchyVisitor<'h>,
    {
        match hierarchy.node(id) {
            TreeNode::Missing(_) => visitor.visit_missing(hierarchy, id, depth),
            TreeNode::Record(_) if on_path.contains(&id) => {
                visitor.visit_back_edge(hierarchy, id, depth)
            }
            TreeNode::Record(node) => {
                visitor.enter_record(hierarchy, id, depth)?;
                let limited = self.max_depth.is_some_and(|max| depth >= max);
                if limited && !node.children().is_empty() {
                    visitor.visit_depth_limit(hierarchy, id, depth)?;
                    return visitor.leave_record(hierarchy, id, depth);
                }
                on_path.insert(id);
                stack.push(Frame {
                    id,
                    depth,
                    next_child: 0,
                });
                Ok(())
            }
        }
    }
}

/// Materialize the hierarchy as the JSON shape renderers consume.
///
/// `null` for no root, an object for a single root and an array otherwise.
/// Every node is an object of its attributes followed by `children`; shared
/// nodes are repeated at each occurrence. Fails with `CycleDetected` when a
/// node is reachable from itself.
///
/// The result nests as deep as the hierarchy, and serializing or dropping a
/// `Value` recurses per level. Use [`write_json`](crate::write_json) for
/// output of arbitrary depth.
pub fn to_json(hierarchy: &Hierarchy<'_>) -> Result<Value> {
    let mut builder = JsonBuilder::default();
    Walker::new()
        .walk(hierarchy, &mut builder)
        .map_err(|err| err.with_operation("walk::to_json"))?;

    let mut roots = builder.finished;
    Ok(match hierarchy.roots() {
        Roots::Empty => Value::Null,
        Roots::Single(_) => roots.pop().unwrap_or(Value::Null),
        Roots::Many(_) => Value::Array(roots),
    })
}

#[derive(Default)]
struct JsonBuilder {
    open: Vec<(Map<String, Value>, Vec<Value>)>,
    finished: Vec<Value>,
}

impl JsonBuilder {
    fn emit(&mut self, value: Value) {
        match self.open.last_mut() {
            Some((_, children)) => children.push(value),
            None => self.finished.push(value),
        }
    }
}

fn attribute_map(node: &TreeNode<'_>) -> Map<String, Value> {
    node.attributes()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

impl<'h> HierarchyVisitor<'h> for JsonBuilder {
    fn enter_record(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, _depth: usize) -> Result<()> {
        self.open.push((attribute_map(hierarchy.node(id)), Vec::new()));
        Ok(())
    }

    fn leave_record(&mut self, _hierarchy: &Hierarchy<'h>, _id: NodeId, _depth: usize) -> Result<()> {
        let Some((mut object, children)) = self.open.pop() else {
            return Err(Error::unexpected("leave without matching enter"));
        };
        object.insert(CHILDREN_FIELD.to_string(), Value::Array(children));
        self.emit(Value::Object(object));
        Ok(())
    }

    fn visit_missing(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, _depth: usize) -> Result<()> {
        let mut object = attribute_map(hierarchy.node(id));
        debug_assert_eq!(object.get(MISSING_FLAG), Some(&Value::Bool(true)));
        object.insert(CHILDREN_FIELD.to_string(), Value::Array(Vec::new()));
        self.emit(Value::Object(object));
        Ok(())
    }

    fn visit_back_edge(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, _depth: usize) -> Result<()> {
        Err(Error::cycle_detected(hierarchy.node(id).id_key().to_string()))
    }
}
