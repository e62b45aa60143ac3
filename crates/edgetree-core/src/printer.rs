//! Text rendering of a hierarchy.
//!
//! Lines are laid out in one of three formats while the hierarchy is walked.
//! Back edges and the depth bound cut the output, so it is always finite.

use std::collections::BTreeSet;
use std::fmt;

use edgetree_error::{Error, Result};
use serde_json::Value;

use crate::arena::NodeId;
use crate::transform::Hierarchy;
use crate::walk::{HierarchyVisitor, Walker};

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrintFormat {
    /// Indented, one node per line
    /// ```text
    /// (root
    ///   (child1)
    ///   (child2)
    /// )
    /// ```
    #[default]
    Tree,

    /// One line per root
    /// ```text
    /// (root (child1) (child2))
    /// ```
    Compact,

    /// One label per line, no nesting
    Flat,
}

impl fmt::Display for PrintFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintFormat::Tree => write!(f, "tree"),
            PrintFormat::Compact => write!(f, "compact"),
            PrintFormat::Flat => write!(f, "flat"),
        }
    }
}

impl std::str::FromStr for PrintFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(PrintFormat::Tree),
            "compact" => Ok(PrintFormat::Compact),
            "flat" => Ok(PrintFormat::Flat),
            other => Err(format!(
                "Unknown format: {}. Use 'tree', 'compact', or 'flat'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrintConfig {
    pub format: PrintFormat,

    /// Append `[children: N]` to each node
    pub include_child_count: bool,

    /// Append `#<id>` to each node
    pub include_node_ids: bool,

    /// Attribute values longer than this are cut and end with "..."
    pub value_max_length: usize,

    /// Nodes deeper than this are not expanded
    pub max_depth: usize,

    /// Indentation width in spaces per nesting level
    pub indent_width: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            format: PrintFormat::Tree,
            include_child_count: true,
            include_node_ids: false,
            value_max_length: 20,
            max_depth: 1000,
            indent_width: 2,
        }
    }
}

impl PrintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: PrintFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_child_count(mut self, enabled: bool) -> Self {
        self.include_child_count = enabled;
        self
    }

    pub fn with_node_ids(mut self, enabled: bool) -> Self {
        self.include_node_ids = enabled;
        self
    }

    pub fn with_value_max_length(mut self, length: usize) -> Self {
        self.value_max_length = length;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Labels only, one per line.
    pub fn minimal() -> Self {
        PrintConfig {
            format: PrintFormat::Flat,
            include_child_count: false,
            include_node_ids: false,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::config_invalid("max_depth must be > 0"));
        }
        if self.indent_width == 0 {
            return Err(Error::config_invalid("indent_width must be > 0"));
        }
        if self.value_max_length == 0 {
            return Err(Error::config_invalid("value_max_length must be > 0"));
        }
        Ok(())
    }
}

/// Which string attributes renderers show next to each node.
///
/// Passed to every renderer explicitly; nothing about it is global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayContext {
    visible: BTreeSet<String>,
}

impl DisplayContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visible<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visible: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.visible.contains(key)
    }

    pub fn show(&mut self, key: impl Into<String>) {
        self.visible.insert(key.into());
    }

    /// Flip one key; returns whether it is visible afterwards.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.visible.remove(key) {
            false
        } else {
            self.visible.insert(key.to_string());
            true
        }
    }

    pub fn show_all<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.visible.extend(keys.into_iter().map(Into::into));
    }

    pub fn clear(&mut self) {
        self.visible.clear();
    }

    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.visible.iter().map(String::as_str)
    }

    /// Visible string attributes of `id` as `(key, value)`, in attribute order.
    pub fn visible_attributes<'n>(
        &self,
        hierarchy: &'n Hierarchy<'_>,
        id: NodeId,
    ) -> Vec<(&'n str, &'n str)> {
        hierarchy
            .node(id)
            .attributes()
            .filter_map(|(key, value)| match value {
                Value::String(text) if self.is_visible(key) => Some((key, text.as_str())),
                _ => None,
            })
            .collect()
    }
}

// ============================================================================
// Internal Line Emitter
// ============================================================================

/// Lays out lines as the walker reports nodes.
///
/// Output is produced in walk order, so nothing nests in memory or on the
/// call stack; only the current compact line is buffered.
struct LineEmitter<'c> {
    config: &'c PrintConfig,
    context: &'c DisplayContext,
    lines: Vec<String>,
    line: String,
}

impl LineEmitter<'_> {
    fn record_text(&self, hierarchy: &Hierarchy<'_>, id: NodeId) -> String {
        let node = hierarchy.node(id);
        let mut text = node.label();
        if self.config.include_node_ids {
            text.push_str(&format!(" #{}", node.id_key()));
        }
        if self.config.include_child_count {
            text.push_str(&format!(" [children: {}]", node.children().len()));
        }
        for (key, value) in self.context.visible_attributes(hierarchy, id) {
            text.push_str(&format!(
                " {}: {}",
                key,
                truncate_value(value, self.config.value_max_length)
            ));
        }
        text
    }

    /// Start a node; a node without rendered children is closed at once.
    fn open(&mut self, text: &str, depth: usize, has_children: bool) {
        match self.config.format {
            PrintFormat::Tree => {
                let indent = " ".repeat(depth * self.config.indent_width);
                if has_children {
                    self.lines.push(format!("{indent}({text}"));
                } else {
                    self.lines.push(format!("{indent}({text})"));
                }
            }
            PrintFormat::Compact => {
                if depth > 0 {
                    self.line.push(' ');
                }
                self.line.push('(');
                self.line.push_str(text);
                if !has_children {
                    self.line.push(')');
                    if depth == 0 {
                        self.lines.push(std::mem::take(&mut self.line));
                    }
                }
            }
            PrintFormat::Flat => self.lines.push(text.to_string()),
        }
    }

    /// Finish a node opened with children.
    fn close(&mut self, depth: usize) {
        match self.config.format {
            PrintFormat::Tree => {
                let indent = " ".repeat(depth * self.config.indent_width);
                self.lines.push(format!("{indent})"));
            }
            PrintFormat::Compact => {
                self.line.push(')');
                if depth == 0 {
                    self.lines.push(std::mem::take(&mut self.line));
                }
            }
            PrintFormat::Flat => {}
        }
    }
}

impl<'h> HierarchyVisitor<'h> for LineEmitter<'_> {
    fn enter_record(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, depth: usize) -> Result<()> {
        let text = self.record_text(hierarchy, id);
        let has_children = !hierarchy.children(id).is_empty();
        self.open(&text, depth, has_children);
        Ok(())
    }

    fn leave_record(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, depth: usize) -> Result<()> {
        if !hierarchy.children(id).is_empty() {
            self.close(depth);
        }
        Ok(())
    }

    fn visit_missing(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, depth: usize) -> Result<()> {
        let text = format!("Not found: {}", hierarchy.node(id).label());
        self.open(&text, depth, false);
        Ok(())
    }

    fn visit_back_edge(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, depth: usize) -> Result<()> {
        let text = format!("{} (cycle)", hierarchy.node(id).label());
        self.open(&text, depth, false);
        Ok(())
    }

    fn visit_depth_limit(&mut self, _hierarchy: &Hierarchy<'h>, _id: NodeId, depth: usize) -> Result<()> {
        self.open("...", depth + 1, false);
        Ok(())
    }
}

// ============================================================================
// Public API Functions
// ============================================================================

/// Render with default configuration and no visible attributes.
pub fn render_hierarchy(hierarchy: &Hierarchy<'_>) -> Result<String> {
    render_hierarchy_with_config(hierarchy, &DisplayContext::default(), &PrintConfig::default())
}

/// Render every root; an empty hierarchy renders as an empty string.
pub fn render_hierarchy_with_config(
    hierarchy: &Hierarchy<'_>,
    context: &DisplayContext,
    config: &PrintConfig,
) -> Result<String> {
    config.validate()?;

    let mut emitter = LineEmitter {
        config,
        context,
        lines: Vec::new(),
        line: String::new(),
    };
    Walker::new()
        .with_max_depth(Some(config.max_depth))
        .walk(hierarchy, &mut emitter)
        .map_err(|err| err.with_operation("printer::render_hierarchy"))?;

    Ok(emitter.lines.join("\n"))
}

// ============================================================================
// Utility Functions
// ============================================================================

/// Cut `value` to at most `max_chars` characters, marking the cut with "...".
fn truncate_value(value: &str, max_chars: usize) -> String {
    let flat = value.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut cut: String = flat.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
