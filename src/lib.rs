//! # json2
//!
//! Lossless, deterministic tree-text serialization for value graphs that
//! contain binary data.
//!
//! ## What it adds to plain tree text
//!
//! - **Lossless binary**: byte buffers, byte windows and the eleven
//!   fixed-width numeric views are written as tagged `{"data":[..],"type":".."}`
//!   mappings and come back as the same kind of view.
//! - **Deterministic keys**: every mapping at every depth is written with
//!   sorted keys, so equal trees always produce byte-identical text.
//! - **Readable debugging**: a separate renderer prints hex dumps, truncated
//!   view listings and `#/path` markers for cycles and shared nodes.
//! - **Hooks**: encode, decode and debug rendering all accept a per-node
//!   hook that sees the node's [`Path`] and returns its replacement.
//!
//! ## Quick Start
//!
//! ```rust
//! use json2::{from_str, to_string, value, Binary, Value};
//!
//! let data = value!({
//!     "name": "Alice",
//!     "avatar": (Value::from(Binary::Buffer(b"Hi".to_vec()))),
//! });
//!
//! let text = to_string(&data).unwrap();
//! assert_eq!(text, r#"{"avatar":{"data":[72,105],"type":"Buffer"},"name":"Alice"}"#);
//!
//! let back = from_str(&text).unwrap();
//! let avatar = back.as_object().unwrap().get("avatar").unwrap();
//! assert_eq!(avatar.as_binary(), Some(&Binary::Buffer(b"Hi".to_vec())));
//! ```
//!
//! ### Debug rendering
//!
//! ```rust
//! use json2::{to_debug_string_with, Binary, DebugOptions, Object, Path, Value};
//!
//! let root = Object::new();
//! root.insert("view", Value::from(Binary::Uint8Array(vec![1, 2, 3])));
//! root.insert("self", Value::Object(root.clone()));
//!
//! let options = DebugOptions::new().with_indent(0);
//! let text = to_debug_string_with(&Value::Object(root), &options, |_: &Path, v: Value| Ok(v))
//!     .unwrap();
//! assert_eq!(text, r#"{"view":Uint8Array { 1, 2, 3 },"self":[Circular reference to #/]}"#);
//! ```
//!
//! ### Rust types
//!
//! [`to_value`] and [`from_value`] bridge to any serde type:
//!
//! ```rust
//! use json2::{from_str, from_value, to_string, to_value};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Point { y: i32, x: i32 }
//!
//! let text = to_string(&to_value(&Point { y: 2, x: 1 }).unwrap()).unwrap();
//! assert_eq!(text, r#"{"x":1,"y":2}"#);
//!
//! let point: Point = from_value(&from_str(&text).unwrap()).unwrap();
//! assert_eq!(point, Point { y: 2, x: 1 });
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through [`tracing`](https://docs.rs/tracing). They are
//! emitted only for calls whose options have `logging` set, and no
//! subscriber is installed by this crate.
//!
//! ## Format Reference
//!
//! See the [`format`] module for the exact text written and read.

pub mod binary;
pub mod de;
pub mod debug;
pub mod error;
pub mod format;
pub mod macros;
pub mod map;
pub mod options;
mod refs;
pub mod ser;
pub mod value;
pub mod walk;

pub use binary::{Binary, Element, ViewKind};
pub use de::Input;
pub use debug::render_view;
pub use error::{Error, Result};
pub use map::Map;
pub use options::{DebugOptions, DecodeOptions, EncodeOptions, MAX_INDENT};
pub use ser::{ValueSerializer, CIRCULAR_MARKER};
pub use value::{Array, Number, Object, Serializable, Value};
pub use walk::{Path, PathSegment};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

fn identity(_: &Path, value: Value) -> Result<Value> {
    Ok(value)
}

/// Encode a value graph as compact text with sorted keys.
///
/// Binary values become tagged mappings. A node reached a second time, by a
/// cycle or through another parent, is written as `"[Circular]"`.
///
/// # Examples
///
/// ```rust
/// use json2::{to_string, value};
///
/// let text = to_string(&value!({ "b": 1, "a": [true, null] })).unwrap();
/// assert_eq!(text, r#"{"a":[true,null],"b":1}"#);
/// ```
///
/// # Errors
///
/// Never fails for the default options; see [`to_string_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(value: &Value) -> Result<String> {
    to_string_with(value, &EncodeOptions::default(), identity)
}

/// Encode a value graph as text, running `transform` on every node first.
///
/// The transform receives a shallow copy of each mapping and sequence, so it
/// may change the node it is given without touching the caller's graph.
/// Its result is what gets written, and descended into.
///
/// # Examples
///
/// ```rust
/// use json2::{to_string_with, value, EncodeOptions, Path, Value};
///
/// let data = value!({ "secret": "hunter2", "user": "alice" });
/// let options = EncodeOptions::new().with_indent(2);
/// let text = to_string_with(&data, &options, |path: &Path, v: Value| {
///     match path.key() {
///         Some(key) if key.to_string() == "secret" => Ok(Value::from("***")),
///         _ => Ok(v),
///     }
/// })
/// .unwrap();
/// assert_eq!(text, "{\n  \"secret\": \"***\",\n  \"user\": \"alice\"\n}");
/// ```
///
/// # Errors
///
/// Errors returned by `transform` are passed through. Indent widths above
/// [`MAX_INDENT`] are clamped.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with<F>(value: &Value, options: &EncodeOptions, transform: F) -> Result<String>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    if options.logging {
        debug!("Encoding text (indent {}, ordered {})", options.indent, options.ordered);
    }
    ser::encode(value, options, transform)
}

/// Encode a value graph as the UTF-8 bytes of its compact text.
///
/// # Examples
///
/// ```rust
/// use json2::{to_bytes, Binary, Value};
///
/// let bytes = to_bytes(&Value::from(Binary::Buffer(b"Hello".to_vec()))).unwrap();
/// assert_eq!(bytes.len(), 45);
/// ```
///
/// # Errors
///
/// Never fails for the default options; see [`to_bytes_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    to_bytes_with(value, &EncodeOptions::default(), identity)
}

/// Encode a value graph as UTF-8 bytes with options and a transform.
///
/// # Errors
///
/// Same as [`to_string_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_bytes_with<F>(value: &Value, options: &EncodeOptions, transform: F) -> Result<Vec<u8>>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    let text = to_string_with(value, options, transform)?;
    if options.logging {
        debug!("UTF-8 encode text with length: {}", text.len());
    }
    Ok(text.into_bytes())
}

/// Decode text or UTF-8 bytes into a value graph.
///
/// # Examples
///
/// ```rust
/// use json2::{parse, Binary};
///
/// let text = r#"{"data":[1,2],"type":"Uint8Array"}"#;
/// let from_text = parse(text).unwrap();
/// let from_bytes = parse(text.as_bytes()).unwrap();
/// assert_eq!(from_text.as_binary(), Some(&Binary::Uint8Array(vec![1, 2])));
/// assert_eq!(from_text, from_bytes);
/// ```
///
/// # Errors
///
/// Returns a syntax or end-of-input error with line and column information
/// for malformed text, and [`Error::Utf8`] for bytes that are not UTF-8.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse<'a>(input: impl Into<Input<'a>>) -> Result<Value> {
    parse_with(input, &DecodeOptions::default(), identity)
}

/// Decode text or bytes, running `revive` on every node after the standard
/// reviver, children before parents.
///
/// Returning [`Value::Undefined`] for a mapping entry removes it.
///
/// # Examples
///
/// ```rust
/// use json2::{parse_with, DecodeOptions, Path, Value};
///
/// let value = parse_with("[1, 2, 3]", &DecodeOptions::new(), |_: &Path, v: Value| {
///     match v.as_i64() {
///         Some(n) => Ok(Value::from(n * 10)),
///         None => Ok(v),
///     }
/// })
/// .unwrap();
/// assert_eq!(value.as_array().unwrap().get(2), Some(Value::from(30)));
/// ```
///
/// # Errors
///
/// Same as [`parse`]; errors returned by `revive` are passed through.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with<'a, F>(input: impl Into<Input<'a>>, options: &DecodeOptions, revive: F) -> Result<Value>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    de::decode(input.into(), options, revive)
}

/// Decode text into a value graph.
///
/// # Examples
///
/// ```rust
/// use json2::from_str;
///
/// let value = from_str(r#"{"when":"2024-01-15T10:30:00.000Z"}"#).unwrap();
/// assert!(value.as_object().unwrap().get("when").unwrap().is_date());
/// ```
///
/// # Errors
///
/// Returns an error if the text is malformed. Error messages include line
/// and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(text: &str) -> Result<Value> {
    parse(text)
}

/// Decode text with a revive hook.
///
/// # Errors
///
/// Same as [`parse_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str_with<F>(text: &str, options: &DecodeOptions, revive: F) -> Result<Value>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    parse_with(text, options, revive)
}

/// Decode UTF-8 bytes into a value graph.
///
/// # Examples
///
/// ```rust
/// use json2::{from_slice, to_bytes, Binary, Value};
///
/// let original = Value::from(Binary::DataView(b"Hello".to_vec()));
/// let decoded = from_slice(&to_bytes(&original).unwrap()).unwrap();
/// assert_eq!(decoded, original);
/// ```
///
/// # Errors
///
/// Returns [`Error::Utf8`] if the bytes are not UTF-8, or a syntax error if
/// the decoded text is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8]) -> Result<Value> {
    parse(bytes)
}

/// Decode UTF-8 bytes with a revive hook.
///
/// # Errors
///
/// Same as [`parse_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice_with<F>(bytes: &[u8], options: &DecodeOptions, revive: F) -> Result<Value>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    parse_with(bytes, options, revive)
}

/// Render a value graph for people, with the default [`DebugOptions`].
///
/// # Examples
///
/// ```rust
/// use json2::{to_debug_string, value};
///
/// assert_eq!(to_debug_string(&value!([1, 2])).unwrap(), "[\n    1,\n    2\n]");
/// ```
///
/// # Errors
///
/// Never fails for the default options; see [`to_debug_string_with`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_debug_string(value: &Value) -> Result<String> {
    to_debug_string_with(value, &DebugOptions::default(), identity)
}

/// Render a value graph for people with options and a transform.
///
/// Views print as hex dumps or element lists, cycles as
/// `[Circular reference to #/..]` and shared nodes as
/// `[Duplicate reference to #/..]`. Keys keep their insertion order.
///
/// # Errors
///
/// Errors returned by `transform` are passed through. Indent widths above
/// [`MAX_INDENT`] are clamped.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_debug_string_with<F>(value: &Value, options: &DebugOptions, transform: F) -> Result<String>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    if options.logging {
        debug!(
            "Rendering debug text (indent {}, truncate at {})",
            options.indent, options.truncate_view_length
        );
    }
    debug::render(value, options, transform)
}

/// Convert any `T: Serialize` to a [`Value`].
///
/// # Examples
///
/// ```rust
/// use json2::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let value: Value = to_value(&Point { x: 1, y: 2 }).unwrap();
/// assert!(value.is_object());
/// ```
///
/// # Errors
///
/// Returns an error if the value cannot be represented, for example a map
/// with non-string keys.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Read a [`Value`] into any `T: DeserializeOwned`.
///
/// The graph must be acyclic.
///
/// # Examples
///
/// ```rust
/// use json2::{from_value, value};
///
/// let numbers: Vec<u8> = from_value(&value!([1, 2, 3])).unwrap();
/// assert_eq!(numbers, vec![1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error if the value's shape does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_value<T>(value: &Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(de::ValueDeserializer::new(value.clone()))
}
