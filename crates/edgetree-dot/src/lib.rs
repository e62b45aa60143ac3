//! DOT rendering of an edgetree hierarchy.
//!
//! Unlike the text printer, DOT can show sharing directly: every arena node
//! reachable from a root becomes one DOT node, and every child occurrence
//! becomes one edge. Placeholders for dangling edges are drawn in red.
//!
//! # Module Structure
//!
//! - [`dot`]: DOT format utilities and the document builder

mod dot;

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use edgetree_core::{DisplayContext, Error, Hierarchy, NodeId, TreeNode};
use tracing::debug;

pub use dot::{DotBuilder, escape_label, sanitize_id};

/// Layout direction of the rendered graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    /// Roots on top, the way the tree view draws it (default)
    #[default]
    TopBottom,
    LeftRight,
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankDir::TopBottom => write!(f, "TB"),
            RankDir::LeftRight => write!(f, "LR"),
        }
    }
}

impl FromStr for RankDir {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(RankDir::TopBottom),
            "LR" => Ok(RankDir::LeftRight),
            _ => Err(Error::invalid_argument(format!(
                "unknown rank direction '{s}', expected TB or LR"
            ))),
        }
    }
}

/// Options for DOT rendering.
#[derive(Debug, Clone)]
pub struct DotOptions {
    pub title: String,
    pub rankdir: RankDir,
    /// Add a `Children: N` line to record labels
    pub show_child_count: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            title: "hierarchy".to_string(),
            rankdir: RankDir::default(),
            show_child_count: true,
        }
    }
}

fn dot_id(id: NodeId) -> String {
    format!("n{id}")
}

fn node_label(hierarchy: &Hierarchy<'_>, id: NodeId, context: &DisplayContext, options: &DotOptions) -> String {
    let node = hierarchy.node(id);
    if node.is_missing() {
        return format!("Not found\n{}", node.label());
    }

    let mut lines = vec![node.label()];
    if options.show_child_count {
        lines.push(format!("Children: {}", node.children().len()));
    }
    for (key, value) in context.visible_attributes(hierarchy, id) {
        lines.push(format!("{key}: {value}"));
    }
    lines.join("\n")
}

/// Render every node reachable from the roots.
///
/// Traversal keeps a visited set, so shared and cyclic structures are
/// emitted once and rendering always terminates.
pub fn render_dot(hierarchy: &Hierarchy<'_>, context: &DisplayContext, options: &DotOptions) -> String {
    let mut dot = DotBuilder::new(&options.title);
    dot.attr("rankdir", &options.rankdir.to_string())
        .node_style(r##"shape=box, style="rounded,filled", fillcolor="#ffffff", fontname="Helvetica""##)
        .blank();

    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut queue: VecDeque<NodeId> = VecDeque::new();
    let mut edges: Vec<(NodeId, NodeId)> = Vec::new();

    for &root in hierarchy.root_ids() {
        if visited.insert(root) {
            queue.push_back(root);
        }
    }

    while let Some(id) = queue.pop_front() {
        let label = node_label(hierarchy, id, context, options);
        match hierarchy.node(id) {
            TreeNode::Missing(_) => {
                dot.node_full(
                    &dot_id(id),
                    &[
                        ("label", &label),
                        ("color", "#ff4d4f"),
                        ("fillcolor", "#fff0f0"),
                        ("fontcolor", "#b30000"),
                        ("penwidth", "3"),
                    ],
                );
            }
            TreeNode::Record(_) => {
                dot.node_full(&dot_id(id), &[("label", &label)]);
            }
        }

        for &child in hierarchy.children(id) {
            edges.push((id, child));
            if visited.insert(child) {
                queue.push_back(child);
            }
        }
    }

    if !edges.is_empty() {
        dot.blank();
    }
    for (from, to) in &edges {
        dot.edge(&dot_id(*from), &dot_id(*to));
    }

    debug!(nodes = visited.len(), edges = edges.len(), "rendered dot graph");
    dot.build()
}
