//! Streaming JSON output.
//!
//! Writes the same document [`to_json`](crate::to_json) builds, straight from
//! walker callbacks. Neither the call stack nor any in-memory value grows with
//! the depth of the hierarchy, so long chains are written as easily as wide
//! trees.

use std::io::Write;

use edgetree_error::{Error, Result};
use serde_json::Value;

use crate::arena::NodeId;
use crate::record::CHILDREN_FIELD;
use crate::transform::{Hierarchy, Roots};
use crate::walk::{HierarchyVisitor, Walker};

const INDENT: &[u8] = b"  ";

/// Write the hierarchy as JSON.
///
/// Output is byte-for-byte what `serde_json::to_writer` (or
/// `to_writer_pretty` when `pretty` is set) produces for [`to_json`](crate::to_json).
/// Fails with `CycleDetected` when a node is reachable from itself.
pub fn write_json<W: Write>(hierarchy: &Hierarchy<'_>, writer: W, pretty: bool) -> Result<()> {
    let mut out = JsonWriter {
        writer,
        pretty,
        open: Vec::new(),
    };
    out.document(hierarchy)
        .map_err(|err| err.with_operation("json::write_json"))
}

/// [`write_json`] into a string.
pub fn to_json_string(hierarchy: &Hierarchy<'_>, pretty: bool) -> Result<String> {
    let mut buf = Vec::new();
    write_json(hierarchy, &mut buf, pretty)?;
    String::from_utf8(buf).map_err(|err| {
        Error::serialization_failed("JSON output is not valid UTF-8")
            .with_operation("json::to_json_string")
            .set_source(err)
    })
}

fn io_failed(err: std::io::Error) -> Error {
    Error::serialization_failed("failed to write JSON output").set_source(err)
}

fn encode_failed(err: serde_json::Error) -> Error {
    Error::serialization_failed("failed to encode attribute").set_source(err)
}

struct JsonWriter<W> {
    writer: W,
    pretty: bool,
    /// One entry per open object or array: whether it already has an element.
    open: Vec<bool>,
}

impl<W: Write> JsonWriter<W> {
    fn document(&mut self, hierarchy: &Hierarchy<'_>) -> Result<()> {
        match hierarchy.roots() {
            Roots::Empty => self.raw(b"null")?,
            Roots::Single(_) => Walker::new().walk(hierarchy, self)?,
            Roots::Many(_) => {
                self.begin(b'[')?;
                Walker::new().walk(hierarchy, self)?;
                self.end(b']')?;
            }
        }
        self.writer.flush().map_err(io_failed)
    }

    fn raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(io_failed)
    }

    fn newline(&mut self) -> Result<()> {
        if self.pretty {
            self.raw(b"\n")?;
            for _ in 0..self.open.len() {
                self.raw(INDENT)?;
            }
        }
        Ok(())
    }

    /// Separator and indentation ahead of the next element of the innermost
    /// container. Top-level values need neither.
    fn element(&mut self) -> Result<()> {
        let Some(has_element) = self.open.last_mut() else {
            return Ok(());
        };
        let first = !*has_element;
        *has_element = true;
        if !first {
            self.raw(b",")?;
        }
        self.newline()
    }

    fn begin(&mut self, bracket: u8) -> Result<()> {
        self.raw(&[bracket])?;
        self.open.push(false);
        Ok(())
    }

    fn end(&mut self, bracket: u8) -> Result<()> {
        if self.open.pop().unwrap_or(false) {
            self.newline()?;
        }
        self.raw(&[bracket])
    }

    fn key(&mut self, key: &str) -> Result<()> {
        self.element()?;
        let quoted = serde_json::to_string(key).map_err(encode_failed)?;
        self.raw(quoted.as_bytes())?;
        let separator: &[u8] = if self.pretty { b": " } else { b":" };
        self.raw(separator)
    }

    /// One attribute value. Parsed input nests at most serde_json's recursion
    /// limit, so encoding it in one call is bounded.
    fn value(&mut self, value: &Value) -> Result<()> {
        if !self.pretty {
            return serde_json::to_writer(&mut self.writer, value).map_err(encode_failed);
        }
        let text = serde_json::to_string_pretty(value).map_err(encode_failed)?;
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.raw(first.as_bytes())?;
        }
        for line in lines {
            self.newline()?;
            self.raw(line.as_bytes())?;
        }
        Ok(())
    }

    fn open_node(&mut self, hierarchy: &Hierarchy<'_>, id: NodeId) -> Result<()> {
        self.element()?;
        self.begin(b'{')?;
        for (key, value) in hierarchy.node(id).attributes() {
            self.key(key)?;
            self.value(value)?;
        }
        self.key(CHILDREN_FIELD)?;
        self.begin(b'[')
    }

    fn close_node(&mut self) -> Result<()> {
        self.end(b']')?;
        self.end(b'}')
    }
}

impl<'h, W: Write> HierarchyVisitor<'h> for JsonWriter<W> {
    fn enter_record(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, _depth: usize) -> Result<()> {
        self.open_node(hierarchy, id)
    }

    fn leave_record(&mut self, _hierarchy: &Hierarchy<'h>, _id: NodeId, _depth: usize) -> Result<()> {
        self.close_node()
    }

    fn visit_missing(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, _depth: usize) -> Result<()> {
        self.open_node(hierarchy, id)?;
        self.close_node()
    }

    fn visit_back_edge(&mut self, hierarchy: &Hierarchy<'h>, id: NodeId, _depth: usize) -> Result<()> {
        Err(Error::cycle_detected(hierarchy.node(id).id_key().to_string()))
    }
}
