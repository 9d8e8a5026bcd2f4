//! Compact encoding and the text writer.
//!
//! Compact encoding walks the value graph once, tags binary views, collects
//! every key it meets, and writes the result with keys in ascending order:
//!
//! ```rust
//! use json2::{to_string, value};
//!
//! let data = value!({ "b": 1, "a": 2 });
//! assert_eq!(to_string(&data).unwrap(), r#"{"a":2,"b":1}"#);
//! ```
//!
//! Repeated nodes (cycles and shared branches alike) are written as the
//! string `"[Circular]"`.
//!
//! This module also hosts [`ValueSerializer`], which builds a [`Value`]
//! from any `T: Serialize`.

use crate::refs::SeenList;
use crate::walk::{walk, Path, PathSegment, Step, Visitor};
use crate::{Array, Binary, EncodeOptions, Error, Map, Number, Object, Result, Value, MAX_INDENT};
use num_bigint::BigInt;
use serde::{ser, Serialize};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Marker written in place of a repeated node by compact encoding.
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// Output tree produced by a walk and consumed by the [`Writer`].
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Node {
    Null,
    Bool(bool),
    Number(Number),
    BigInt(BigInt),
    String(String),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
    /// Pre-rendered text written verbatim, never quoted.
    Raw(String),
}

impl Node {
    /// Output for a leaf value; `None` for values with no text form.
    pub(crate) fn from_leaf(value: Value) -> Option<Node> {
        match value {
            Value::Null => Some(Node::Null),
            Value::Bool(b) => Some(Node::Bool(b)),
            Value::Number(n) => Some(Node::Number(n)),
            Value::BigInt(bi) => Some(Node::BigInt(bi)),
            Value::String(s) => Some(Node::String(s)),
            Value::Date(dt) => Node::from_leaf(Value::Date(dt).serialized(None)),
            Value::Binary(binary) => Some(tagged_node(&binary)),
            // Composites are expanded by the walker, never here.
            Value::Undefined | Value::Custom(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

fn tagged_node(binary: &Binary) -> Node {
    let data = binary
        .data_values()
        .into_iter()
        .filter_map(Node::from_leaf)
        .collect();
    Node::Object(vec![
        ("type".to_string(), Node::String(binary.kind().name().to_string())),
        ("data".to_string(), Node::Array(data)),
    ])
}

/// Formats a float the way tree text writes numbers.
///
/// Integral values drop the fraction, very large and very small magnitudes
/// use exponent notation, and `-0` prints as `0`.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }

    let abs = f.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", f);
    }

    let text = format!("{:e}", f);
    match text.find('e') {
        Some(pos) if !text[pos + 1..].starts_with('-') => {
            format!("{}e+{}", &text[..pos], &text[pos + 1..])
        }
        _ => text,
    }
}

/// Every key met during one compact walk.
#[derive(Default)]
pub(crate) struct KeySet {
    keys: Vec<String>,
}

impl KeySet {
    pub(crate) fn push(&mut self, key: &str) {
        self.keys.push(key.to_string());
    }

    /// Sorts and deduplicates the collected keys into a ranking. Keys
    /// compare by UTF-16 code units, so astral characters sort before
    /// U+E000..U+FFFF.
    pub(crate) fn into_order(mut self) -> KeyOrder {
        self.keys.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));
        self.keys.dedup();
        KeyOrder {
            rank: self
                .keys
                .into_iter()
                .enumerate()
                .map(|(i, key)| (key, i))
                .collect(),
        }
    }
}

/// Explicit key order handed to the writer.
pub(crate) struct KeyOrder {
    rank: HashMap<String, usize>,
}

impl KeyOrder {
    pub(crate) fn len(&self) -> usize {
        self.rank.len()
    }

    fn arrange<'a>(&self, entries: &'a [(String, Node)]) -> Vec<&'a (String, Node)> {
        let mut arranged: Vec<_> = entries.iter().collect();
        arranged.sort_by_key(|(key, _)| self.rank.get(key).copied().unwrap_or(usize::MAX));
        arranged
    }
}

/// Writes a [`Node`] tree as text.
pub(crate) struct Writer {
    output: String,
    indent: usize,
    order: Option<KeyOrder>,
}

impl Writer {
    /// Indent widths above [`MAX_INDENT`] are clamped.
    pub(crate) fn new(indent: usize, order: Option<KeyOrder>) -> Self {
        Writer {
            output: String::with_capacity(256),
            indent: indent.min(MAX_INDENT),
            order,
        }
    }

    pub(crate) fn into_inner(self) -> String {
        self.output
    }

    /// Writes the root; an absent root is written as `null`.
    pub(crate) fn write_root(&mut self, node: Option<&Node>) -> Result<()> {
        match node {
            Some(node) => self.write_node(node, 0),
            None => {
                self.output.push_str("null");
                Ok(())
            }
        }
    }

    fn newline(&mut self, level: usize) {
        if self.indent > 0 {
            self.output.push('\n');
            self.output.push_str(&" ".repeat(level * self.indent));
        }
    }

    fn write_node(&mut self, node: &Node, level: usize) -> Result<()> {
        match node {
            Node::Null => self.output.push_str("null"),
            Node::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Node::Number(n) if n.is_special() => self.output.push_str("null"),
            Node::Number(n) => self.output.push_str(&n.to_string()),
            Node::BigInt(bi) => self.output.push_str(&bi.to_string()),
            Node::String(s) => self.write_string(s)?,
            Node::Raw(raw) => self.output.push_str(raw),
            Node::Array(items) => {
                if items.is_empty() {
                    self.output.push_str("[]");
                    return Ok(());
                }
                self.output.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.output.push(',');
                    }
                    self.newline(level + 1);
                    self.write_node(item, level + 1)?;
                }
                self.newline(level);
                self.output.push(']');
            }
            Node::Object(entries) => {
                if entries.is_empty() {
                    self.output.push_str("{}");
                    return Ok(());
                }
                let arranged = match &self.order {
                    Some(order) => order.arrange(entries),
                    None => entries.iter().collect(),
                };
                self.output.push('{');
                for (i, (key, value)) in arranged.into_iter().enumerate() {
                    if i > 0 {
                        self.output.push(',');
                    }
                    self.newline(level + 1);
                    self.write_string(key)?;
                    self.output.push(':');
                    if self.indent > 0 {
                        self.output.push(' ');
                    }
                    self.write_node(value, level + 1)?;
                }
                self.newline(level);
                self.output.push('}');
            }
        }
        Ok(())
    }

    fn write_string(&mut self, s: &str) -> Result<()> {
        let quoted = serde_json::to_string(s).map_err(Error::custom)?;
        self.output.push_str(&quoted);
        Ok(())
    }
}

/// Visitor for compact encoding.
struct CompactVisitor<F> {
    transform: F,
    keys: KeySet,
    seen: SeenList,
    ordered: bool,
    logging: bool,
}

impl<F> Visitor for CompactVisitor<F>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    fn visit(&mut self, path: &Path, value: Value) -> Result<Step> {
        if self.ordered {
            if let Some(PathSegment::Key(key)) = path.key() {
                self.keys.push(key);
            }
        }

        if self.seen.contains(&value) {
            if self.logging {
                debug!("Repeated node at {}", path);
            }
            return Ok(Step::Emit(Node::String(CIRCULAR_MARKER.to_string())));
        }
        self.seen.push(&value);

        let original = value.handle();
        let value = if value.is_composite() {
            value.shallow_copy()
        } else {
            value
        };
        let value = (self.transform)(path, value)?;
        if value.handle() != original && self.seen.contains(&value) {
            return Ok(Step::Emit(Node::String(CIRCULAR_MARKER.to_string())));
        }
        self.seen.push(&value);

        match value {
            Value::Binary(binary) => {
                if self.logging {
                    trace!("Tagging {} with {} elements", binary.kind(), binary.len());
                }
                Ok(Step::Descend(Value::Object(Object::from(binary.encode()))))
            }
            other => Ok(Step::Descend(other)),
        }
    }
}

/// Compact encoding with sorted keys, or insertion order when `ordered` is off.
pub(crate) fn encode<F>(value: &Value, options: &EncodeOptions, transform: F) -> Result<String>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    let mut visitor = CompactVisitor {
        transform,
        keys: KeySet::default(),
        seen: SeenList::new(),
        ordered: options.ordered,
        logging: options.logging,
    };
    let node = walk(value, &mut visitor)?;

    let order = if options.ordered {
        let order = visitor.keys.into_order();
        if options.logging {
            debug!("Writing text with {} ordered keys", order.len());
        }
        Some(order)
    } else {
        if options.logging {
            warn!("Using unordered keys for text output");
        }
        None
    };

    let mut writer = Writer::new(options.indent, order);
    writer.write_root(node.as_ref())?;
    Ok(writer.into_inner())
}

/// Serializer whose output is a [`Value`] tree.
///
/// Used by [`crate::to_value`]. Byte slices become generic buffers.
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(small) => Ok(Value::from(small)),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(small) => Ok(Value::from(small)),
            Err(_) => Ok(Value::BigInt(BigInt::from(v))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Binary(Binary::Buffer(v.to_vec())))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::from(variant))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let object = Object::new();
        object.insert(variant, value.serialize(ValueSerializer)?);
        Ok(Value::Object(object))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec {
            vec: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            map: Map::with_capacity(len),
        })
    }
}

pub struct SerializeVec {
    vec: Vec<Value>,
}

pub struct SerializeTupleVariant {
    variant: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Map,
    next_key: Option<String>,
}

pub struct SerializeStructVariant {
    variant: &'static str,
    map: Map,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(Array::from(self.vec)))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let object = Object::new();
        object.insert(self.variant, Value::Array(Array::from(self.vec)));
        Ok(Value::Object(object))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer)? {
            Value::String(s) => {
                self.next_key = Some(s);
                Ok(())
            }
            Value::Number(n) => {
                self.next_key = Some(n.to_string());
                Ok(())
            }
            _ => Err(Error::unsupported_type("map keys must be strings or numbers")),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(Object::from(self.map)))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(Object::from(self.map)))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map
            .insert(key.to_string(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let object = Object::new();
        object.insert(self.variant, Value::Object(Object::from(self.map)));
        Ok(Value::Object(object))
    }
}
