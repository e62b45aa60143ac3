//! Attribute names for the caller-side visibility filter.

use std::collections::HashSet;

use crate::transform::Hierarchy;

/// Collect the names of top-level string attributes across the roots.
///
/// Only the roots' own attributes are inspected, never their children or
/// nested values. Names are de-duplicated and kept in first-observed order.
/// Placeholder roots contribute their `id` and `name` like any other node.
pub fn extract_string_keys(hierarchy: &Hierarchy<'_>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for &root in hierarchy.root_ids() {
        for (key, value) in hierarchy.node(root).attributes() {
            if value.is_string() && seen.insert(key) {
                keys.push(key.to_string());
            }
        }
    }

    keys
}
