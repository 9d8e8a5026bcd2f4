//! Human-readable debug rendering.
//!
//! The debug renderer shares the walker with compact encoding but writes
//! for people instead of machines:
//!
//! - byte buffers as `<Buffer 48 65 6c 6c 6f>`
//! - numeric views as `Uint8Array { 72, 101, 108, 108, 111 }`
//! - long views truncated with a `... N more bytes` / `... N more values` suffix
//! - 64-bit integers with an `n` suffix
//! - cycles as `[Circular reference to #/path]`
//! - nodes shared between branches as `[Duplicate reference to #/path]`
//!
//! Keys keep their insertion order. The output is not meant to be decoded.
//!
//! ```rust
//! use json2::{to_debug_string, value, Binary, Value};
//!
//! let data = value!({ "greeting": (Value::from(Binary::Buffer(b"Hello".to_vec()))) });
//! assert_eq!(
//!     to_debug_string(&data).unwrap(),
//!     "{\n    \"greeting\": <Buffer 48 65 6c 6c 6f>\n}"
//! );
//! ```

use crate::refs::{RefTable, Reference};
use crate::ser::{Node, Writer};
use crate::walk::{walk, Path, Step, Visitor};
use crate::{Binary, DebugOptions, Result, Value};
use tracing::{debug, trace};

fn plural(count: usize, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

/// Inline literal for a binary view, listing at most `limit` elements.
///
/// # Examples
///
/// ```rust
/// use json2::{render_view, Binary};
///
/// assert_eq!(render_view(&Binary::Buffer(vec![0; 3]), 2), "<Buffer 00 00 ... 1 more byte>");
/// assert_eq!(render_view(&Binary::Int8Array(vec![-1, 2]), 50), "Int8Array { -1, 2 }");
/// ```
#[must_use]
pub fn render_view(binary: &Binary, limit: usize) -> String {
    let kind = binary.kind();
    let overflow = binary.len().saturating_sub(limit);

    match binary.as_bytes() {
        Some(bytes) => {
            let hex: Vec<String> = bytes
                .iter()
                .take(limit)
                .map(|byte| format!("{:02x}", byte))
                .collect();
            let mut body = hex.join(" ");
            if overflow > 0 {
                body.push_str(&format!(" ... {} more {}", overflow, plural(overflow, "byte")));
            }
            format!("<{} {}>", kind, body.trim_start())
        }
        None => {
            let mut body = binary.literals(limit).join(", ");
            if overflow > 0 {
                body.push_str(&format!(" ... {} more {}", overflow, plural(overflow, "value")));
            }
            let body = body.trim_start();
            if body.is_empty() {
                format!("{} {{}}", kind)
            } else {
                format!("{} {{ {} }}", kind, body)
            }
        }
    }
}

fn reference_marker(reference: Reference) -> Option<Node> {
    match reference {
        Reference::New => None,
        Reference::Cycle(first) => Some(Node::Raw(format!("[Circular reference to {}]", first))),
        Reference::Duplicate(first) => {
            Some(Node::Raw(format!("[Duplicate reference to {}]", first)))
        }
    }
}

struct DebugVisitor<F> {
    transform: F,
    refs: RefTable,
    truncate_view_length: usize,
    logging: bool,
}

impl<F> DebugVisitor<F> {
    fn check(&mut self, path: &Path, value: &Value) -> Option<Node> {
        let marker = reference_marker(self.refs.lookup(value, path));
        match &marker {
            Some(node) if self.logging => debug!("Reference at {}: {:?}", path, node),
            Some(_) => {}
            None => self.refs.record(value, path),
        }
        marker
    }
}

impl<F> Visitor for DebugVisitor<F>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    fn visit(&mut self, path: &Path, value: Value) -> Result<Step> {
        // Recorded before descending, so self-references below are caught.
        if let Some(marker) = self.check(path, &value) {
            return Ok(Step::Emit(marker));
        }

        let original = value.handle();
        let value = if value.is_composite() {
            value.shallow_copy()
        } else {
            value
        };
        let value = (self.transform)(path, value)?;
        if value.handle() != original {
            if let Some(marker) = self.check(path, &value) {
                return Ok(Step::Emit(marker));
            }
        }

        match value {
            Value::Binary(binary) => {
                if self.logging && binary.len() > self.truncate_view_length {
                    trace!(
                        "Truncating {} at {} to {} of {} elements",
                        binary.kind(),
                        path,
                        self.truncate_view_length,
                        binary.len()
                    );
                }
                Ok(Step::Emit(Node::Raw(render_view(
                    &binary,
                    self.truncate_view_length,
                ))))
            }
            Value::BigInt(bi) => Ok(Step::Emit(Node::Raw(format!("{}n", bi)))),
            other => Ok(Step::Descend(other)),
        }
    }
}

pub(crate) fn render<F>(value: &Value, options: &DebugOptions, transform: F) -> Result<String>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    let mut visitor = DebugVisitor {
        transform,
        refs: RefTable::new(),
        truncate_view_length: options.truncate_view_length,
        logging: options.logging,
    };
    let node = walk(value, &mut visitor)?;
    if options.logging {
        debug!("Rendered debug text tracking {} composite nodes", visitor.refs.len());
    }

    let mut writer = Writer::new(options.indent, None);
    writer.write_root(node.as_ref())?;
    Ok(writer.into_inner())
}
