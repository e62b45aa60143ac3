//! Core of edgetree: flat edge-list records in, renderable hierarchy out.
//!
//! ```
//! use edgetree_core::{extract_string_keys, transform, Roots};
//! use serde_json::json;
//!
//! let records = vec![
//!     json!({"id": 1, "name": "root", "edges": [{"targetid": 2}]}),
//!     json!({"id": 2, "name": "leaf"}),
//! ];
//! let hierarchy = transform(&records);
//! let Roots::Single(root) = hierarchy.roots() else { panic!("one root expected") };
//! assert_eq!(hierarchy.node(*root).label(), "root");
//! assert_eq!(extract_string_keys(&hierarchy), ["name"]);
//! ```

pub mod arena;
pub mod attrs;
pub mod ident;
pub mod json;
pub mod printer;
pub mod record;
pub mod source;
pub mod transform;
pub mod walk;

pub use arena::{MissingNode, NodeArena, NodeId, RecordNode, TreeNode};
pub use attrs::extract_string_keys;
pub use edgetree_error::{Error, ErrorKind, Result};
pub use ident::IdKey;
pub use json::{to_json_string, write_json};
pub use printer::{
    DisplayContext, PrintConfig, PrintFormat, render_hierarchy, render_hierarchy_with_config,
};
pub use record::Record;
pub use source::{LoadReport, load_files, parse_text};
pub use transform::{Hierarchy, Roots, transform};
pub use walk::{HierarchyVisitor, Walker, to_json};
