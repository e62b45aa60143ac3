//! Read-only view over one input record.

use serde_json::{Map, Value};

use crate::ident::IdKey;

pub const ID_FIELD: &str = "id";
pub const NAME_FIELD: &str = "name";
pub const EDGES_FIELD: &str = "edges";
pub const TARGET_FIELD: &str = "targetid";
pub const CHILDREN_FIELD: &str = "children";
pub const MISSING_FLAG: &str = "isMissing";

/// Borrowed view of an input record.
///
/// Records that are not JSON objects are still accepted: they have no
/// attributes, no edges and the `undefined` id key.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    value: &'a Value,
}

impl<'a> Record<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &'a Value {
        self.value
    }

    pub fn id_key(&self) -> IdKey {
        IdKey::from_value(self.value.get(ID_FIELD))
    }

    pub fn attributes(&self) -> Option<&'a Map<String, Value>> {
        self.value.as_object()
    }

    /// Target keys of the outgoing edges, in edge-list order.
    ///
    /// An `edges` field that is absent or not an array yields nothing. An
    /// edge without a `targetid` targets the `undefined` key.
    pub fn edge_targets(&self) -> impl Iterator<Item = IdKey> + 'a {
        self.value
            .get(EDGES_FIELD)
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|edge| IdKey::from_value(edge.get(TARGET_FIELD)))
    }
}
