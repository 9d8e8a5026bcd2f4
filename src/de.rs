//! Decoding: tree text into [`Value`] graphs, and value graphs into Rust types.
//!
//! Decoding happens in two passes:
//!
//! 1. **Parse**: `serde_json` reads the standard tree-text grammar (with
//!    `preserve_order` for document key order and `arbitrary_precision` for
//!    wide integers). Its line and column are carried into [`Error::Syntax`]
//!    and [`Error::UnexpectedEof`].
//! 2. **Revive**: a post-order walk over the parsed tree. Every node first
//!    goes through the standard reviver (tagged binary mappings become
//!    [`Binary`] views, strict ISO-8601 UTC strings become dates), then
//!    through the caller's hook. A hook returning [`Value::Undefined`] for a
//!    mapping entry deletes that entry.
//!
//! Byte input is UTF-8 decoded first and then handled exactly like text.
//!
//! ## Usage
//!
//! ```rust
//! use json2::{from_str, Binary};
//!
//! let value = from_str(r#"{"data":[72,105],"type":"Buffer"}"#).unwrap();
//! assert_eq!(value.as_binary(), Some(&Binary::Buffer(b"Hi".to_vec())));
//! ```
//!
//! Unknown tags are left alone:
//!
//! ```rust
//! use json2::from_str;
//!
//! let value = from_str(r#"{"type":"Int24Array","data":[1]}"#).unwrap();
//! assert!(value.is_object());
//! ```

use crate::walk::{Path, PathSegment};
use crate::{Array, Binary, DecodeOptions, Error, Map, Number, Object, Result, Value};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use num_bigint::BigInt;
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};
use tracing::{debug, trace};

/// Text or bytes accepted by [`crate::parse`].
///
/// # Examples
///
/// ```rust
/// use json2::{parse, Value};
///
/// assert_eq!(parse("true").unwrap(), Value::Bool(true));
/// assert_eq!(parse(b"true".as_slice()).unwrap(), Value::Bool(true));
/// ```
#[derive(Clone, Copy, Debug)]
pub enum Input<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> Input<'a> {
    fn into_text(self, logging: bool) -> Result<&'a str> {
        match self {
            Input::Text(text) => Ok(text),
            Input::Bytes(bytes) => {
                if logging {
                    debug!("UTF-8 decode bytes with length: {}", bytes.len());
                }
                Ok(std::str::from_utf8(bytes)?)
            }
        }
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(text: &'a String) -> Self {
        Input::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Input::Bytes(bytes)
    }
}

/// Parses text with `serde_json` and converts the result into a value tree.
///
/// Keys keep document order. A repeated key keeps its first position and
/// takes the last value.
fn parse_text(text: &str) -> Result<Value> {
    let parsed: serde_json::Value =
        serde_json::from_str(text).map_err(|err| syntax_error(text, &err))?;
    Ok(from_json(parsed))
}

fn from_json(node: serde_json::Value) -> Value {
    match node {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => number(&n),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(from_json).collect::<Array>())
        }
        serde_json::Value::Object(entries) => Value::Object(Object::from(
            entries
                .into_iter()
                .map(|(key, item)| (key, from_json(item)))
                .collect::<Map>(),
        )),
    }
}

/// Integer literals stay exact: `i64` when they fit, [`BigInt`] otherwise.
/// Anything with a fraction or exponent is read as `f64`, overflowing to
/// infinity.
fn number(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::from(i);
    }
    let literal = n.to_string();
    if !literal.contains(['.', 'e', 'E']) {
        if let Ok(bi) = literal.parse::<BigInt>() {
            return Value::BigInt(bi);
        }
    }
    Value::from(literal.parse::<f64>().unwrap_or(f64::NAN))
}

fn suggestion(msg: &str, offending: Option<u8>) -> Option<&'static str> {
    if msg.starts_with("trailing comma") {
        Some("Trailing commas are not allowed")
    } else if msg.starts_with("key must be a string") {
        Some("Object keys must be double-quoted strings")
    } else if msg.starts_with("trailing characters") {
        Some("A document holds exactly one value")
    } else if msg.starts_with("expected `:`") {
        Some("Separate keys from values with ':'")
    } else if msg.starts_with("invalid escape") {
        Some("Valid escapes are \\\" \\\\ \\/ \\b \\f \\n \\r \\t \\uXXXX")
    } else if msg.starts_with("control character") {
        Some("Control characters must be escaped")
    } else if offending == Some(b'\'') {
        Some("Strings must be enclosed in double quotes")
    } else {
        None
    }
}

/// Maps a `serde_json` failure onto [`Error::Syntax`] or
/// [`Error::UnexpectedEof`], keeping its line and column and attaching the
/// offending line as context.
fn syntax_error(text: &str, err: &serde_json::Error) -> Error {
    let (line, col) = (err.line(), err.column());
    let context = text
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or_default();
    let full = err.to_string();
    let msg = full.rsplit_once(" at line ").map_or(full.as_str(), |(msg, _)| msg);

    if err.is_eof() {
        return Error::unexpected_eof(line, col, msg, context);
    }
    let offending = col
        .checked_sub(1)
        .and_then(|i| context.as_bytes().get(i))
        .copied();
    Error::syntax_with_context(line, col, msg, context, suggestion(msg, offending))
}

/// Parses strictly `YYYY-MM-DDTHH:MM:SS[.fraction]Z`.
fn parse_iso_date(text: &str) -> Option<DateTime<Utc>> {
    const SHAPE: &[u8; 19] = b"dddd-dd-ddTdd:dd:dd";

    let bytes = text.as_bytes();
    if bytes.len() < 20 || bytes[bytes.len() - 1] != b'Z' {
        return None;
    }
    let shaped = bytes.iter().zip(SHAPE).all(|(byte, expected)| match expected {
        b'd' => byte.is_ascii_digit(),
        _ => byte == expected,
    });
    if !shaped {
        return None;
    }
    let fraction = &bytes[19..bytes.len() - 1];
    if !fraction.is_empty()
        && (fraction[0] != b'.'
            || fraction.len() < 2
            || !fraction[1..].iter().all(u8::is_ascii_digit))
    {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.fZ").ok()?;
    Some(Utc.from_utc_datetime(&naive))
}

fn standard_revive(value: Value, path: &Path, logging: bool) -> Value {
    match value {
        Value::Object(obj) => {
            let decoded = Binary::decode(&obj.borrow());
            match decoded {
                Some(binary) => {
                    if logging {
                        trace!("Using standard reviver for {} at {}", binary.kind(), path);
                    }
                    Value::Binary(binary)
                }
                None => Value::Object(obj),
            }
        }
        Value::String(text) => match parse_iso_date(&text) {
            Some(date) => {
                if logging {
                    trace!("Reviving date at {}", path);
                }
                Value::Date(date)
            }
            None => Value::String(text),
        },
        other => other,
    }
}

fn revive<F>(value: Value, path: &mut Path, hook: &mut F, logging: bool) -> Result<Value>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    let value = match value {
        Value::Array(arr) => {
            let items = arr.to_vec();
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push(PathSegment::Index(i));
                let revived = revive(item, path, hook, logging);
                path.pop();
                out.push(revived?);
            }
            Value::Array(Array::from(out))
        }
        Value::Object(obj) => {
            let entries = obj.entries();
            let mut map = Map::with_capacity(entries.len());
            for (key, item) in entries {
                path.push(PathSegment::Key(key.clone()));
                let revived = revive(item, path, hook, logging);
                path.pop();
                let revived = revived?;
                if !revived.is_undefined() {
                    map.insert(key, revived);
                }
            }
            Value::Object(Object::from(map))
        }
        leaf => leaf,
    };

    let value = standard_revive(value, path, logging);
    hook(path, value)
}

pub(crate) fn decode<F>(input: Input<'_>, options: &DecodeOptions, mut hook: F) -> Result<Value>
where
    F: FnMut(&Path, Value) -> Result<Value>,
{
    let text = input.into_text(options.logging)?;
    if options.logging {
        debug!("Parsing text with length: {}", text.len());
    }

    let parsed = parse_text(text)?;
    let mut path = Path::root();
    revive(parsed, &mut path, &mut hook, options.logging)
}

/// Reads a value tree into any `Deserialize` type.
///
/// Byte buffers and windows surface as byte buffers, numeric views as
/// sequences, dates as ISO strings and 64-bit integers as integers.
pub(crate) struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub(crate) fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null | Value::Undefined => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(Number::Integer(i)) => visitor.visit_i64(i),
            Value::Number(n) => visitor.visit_f64(n.as_f64()),
            Value::BigInt(bi) => {
                if let Ok(i) = i64::try_from(&bi) {
                    visitor.visit_i64(i)
                } else if let Ok(u) = u64::try_from(&bi) {
                    visitor.visit_u64(u)
                } else {
                    visitor.visit_string(bi.to_string())
                }
            }
            Value::String(s) => visitor.visit_string(s),
            Value::Date(dt) => visitor.visit_string(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Binary(binary) => match binary.as_bytes() {
                Some(bytes) => visitor.visit_byte_buf(bytes.to_vec()),
                None => visitor.visit_seq(SeqDeserializer::new(binary.data_values())),
            },
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr.to_vec())),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj.entries())),
            Value::Custom(custom) => {
                let converted = custom.try_serialize(None).unwrap_or(Value::Undefined);
                ValueDeserializer::new(converted).deserialize_any(visitor)
            }
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null | Value::Undefined => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_enum(s.into_deserializer()),
            Value::Object(obj) => {
                let mut entries = obj.entries().into_iter();
                match (entries.next(), entries.next()) {
                    (Some((variant, value)), None) => {
                        visitor.visit_enum(EnumDeserializer::new(variant, value))
                    }
                    _ => Err(Error::custom("Expected enum variant")),
                }
            }
            _ => Err(Error::custom("Expected enum")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: std::vec::IntoIter<(String, Value)>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(entries: Vec<(String, Value)>) -> Self {
        MapDeserializer {
            iter: entries.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Value,
}

impl EnumDeserializer {
    fn new(variant: String, value: Value) -> Self {
        EnumDeserializer { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(ValueDeserializer::new(Value::String(self.variant)))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Value,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Value::Null | Value::Undefined => Ok(()),
            _ => Err(Error::custom("Expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(ValueDeserializer::new(self.value))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr.to_vec())),
            _ => Err(Error::custom("Expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj.entries())),
            _ => Err(Error::custom("Expected struct variant")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn plain(text: &str) -> Result<Value> {
        decode(Input::Text(text), &DecodeOptions::new(), |_: &Path, v: Value| Ok(v))
    }

    #[test]
    fn test_parse_scalars() {
        assert_eq!(plain("null").unwrap(), Value::Null);
        assert_eq!(plain(" true ").unwrap(), Value::Bool(true));
        assert_eq!(plain("false").unwrap(), Value::Bool(false));
        assert_eq!(plain("-12").unwrap(), Value::from(-12));
        assert_eq!(plain("1.5e2").unwrap(), Value::from(150.0));
        assert_eq!(plain("0").unwrap(), Value::from(0));
    }

    #[test]
    fn test_parse_wide_integer() {
        let value = plain("123456789012345678901234567890").unwrap();
        let expected: BigInt = "123456789012345678901234567890".parse().unwrap();
        assert_eq!(value.as_bigint(), Some(&expected));
        assert_eq!(plain("9223372036854775807").unwrap(), Value::from(i64::MAX));
    }

    #[test]
    fn test_parse_string_escapes() {
        let value = plain(r#""a\"b\\c\/d\n\t\u0041\ud83d\ude00""#).unwrap();
        assert_eq!(value.as_str(), Some("a\"b\\c/d\n\tA\u{1F600}"));

        assert!(matches!(plain(r#""\ud800x""#), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_parse_nested() {
        let value = plain(r#"{"a": [1, {"b": null}], "c": {}}"#).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.keys(), vec!["a", "c"]);
        let list = obj.get("a").unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let value = plain(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.keys(), vec!["a", "b"]);
        assert_eq!(obj.get("a"), Some(Value::from(3)));
    }

    #[test]
    fn test_syntax_errors() {
        let err = plain("{\"a\" 1}").unwrap_err();
        match err {
            Error::Syntax { line, col, context, .. } => {
                assert_eq!(line, 1);
                assert_eq!(col, 6);
                assert_eq!(context, "{\"a\" 1}");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(plain("[1, 2,]"), Err(Error::Syntax { .. })));
        assert!(matches!(plain("{a: 1}"), Err(Error::Syntax { .. })));
        assert!(matches!(plain("01"), Err(Error::Syntax { .. })));
        assert!(matches!(plain("\"bad \\x\""), Err(Error::Syntax { .. })));
        assert!(matches!(plain("1 2"), Err(Error::Syntax { .. })));
        assert!(matches!(plain("'single'"), Err(Error::Syntax { .. })));
    }

    #[test]
    fn test_syntax_error_suggestions() {
        let help = |text: &str| match plain(text).unwrap_err() {
            Error::Syntax { suggestion, .. } => suggestion,
            other => panic!("unexpected error: {:?}", other),
        };
        assert_eq!(help("{\"a\" 1}"), "\nHelp: Separate keys from values with ':'");
        assert_eq!(help("[1, 2,]"), "\nHelp: Trailing commas are not allowed");
        assert_eq!(help("{a: 1}"), "\nHelp: Object keys must be double-quoted strings");
        assert_eq!(help("1 2"), "\nHelp: A document holds exactly one value");
        assert_eq!(help("'single'"), "\nHelp: Strings must be enclosed in double quotes");
    }

    #[test]
    fn test_error_message_drops_position_suffix() {
        match plain("[1, 2,]").unwrap_err() {
            Error::Syntax { msg, line, col, .. } => {
                assert_eq!(msg, "trailing comma");
                assert_eq!((line, col), (1, 7));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_eof_errors() {
        assert!(matches!(plain(""), Err(Error::UnexpectedEof { .. })));
        assert!(matches!(plain("[1, 2"), Err(Error::UnexpectedEof { .. })));
        assert!(matches!(plain("\"open"), Err(Error::UnexpectedEof { .. })));
        assert!(matches!(plain("tru"), Err(Error::UnexpectedEof { .. })));
    }

    #[test]
    fn test_error_line_tracking() {
        match plain("{\n  \"a\": 1,\n  \"b\": ?\n}").unwrap_err() {
            Error::Syntax { line, col, context, .. } => {
                assert_eq!(line, 3);
                assert_eq!(col, 8);
                assert_eq!(context, "  \"b\": ?");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_numbers_keep_precision() {
        assert_eq!(plain("-0").unwrap(), Value::from(0));
        assert_eq!(plain("1.0").unwrap(), Value::from(1.0));
        assert_eq!(plain("1e400").unwrap(), Value::Number(Number::Infinity));
        let below: BigInt = "-9223372036854775809".parse().unwrap();
        assert_eq!(plain("-9223372036854775809").unwrap().as_bigint(), Some(&below));
    }

    #[test]
    fn test_iso_dates() {
        let date = parse_iso_date("2024-01-15T10:30:00.000Z").unwrap();
        assert_eq!(date.to_rfc3339_opts(SecondsFormat::Millis, true), "2024-01-15T10:30:00.000Z");
        assert!(parse_iso_date("2024-01-15T10:30:00Z").is_some());

        assert!(parse_iso_date("2024-01-15T10:30:00.000+01:00").is_none());
        assert!(parse_iso_date("2024-01-15 10:30:00Z").is_none());
        assert!(parse_iso_date("2024-01-15T10:30:00.Z").is_none());
        assert!(parse_iso_date("+2024-01-15T10:30:00Z").is_none());
        assert!(parse_iso_date("2024-13-15T10:30:00Z").is_none());
        assert!(parse_iso_date("hello").is_none());
    }

    #[test]
    fn test_revives_binary_and_dates() {
        let value = plain(r#"{"when":"2024-01-15T10:30:00.000Z","bin":{"type":"Int8Array","data":[255,1]}}"#)
            .unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.get("when").unwrap().is_date());
        assert_eq!(
            obj.get("bin").unwrap().as_binary(),
            Some(&Binary::Int8Array(vec![-1, 1]))
        );
    }

    #[test]
    fn test_tag_without_sequence_passes_through() {
        let value = plain(r#"{"type":"Buffer","data":"nope"}"#).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn test_revive_post_order_with_paths() {
        let mut seen = Vec::new();
        decode(
            Input::Text(r#"{"a":[1],"b":2}"#),
            &DecodeOptions::new(),
            |path: &Path, v: Value| {
                seen.push(path.to_string());
                Ok(v)
            },
        )
        .unwrap();
        assert_eq!(seen, vec!["#/a/0", "#/a", "#/b", "#/"]);
    }

    #[test]
    fn test_hook_sees_revived_binary() {
        let mut kinds = Vec::new();
        decode(
            Input::Text(r#"[{"type":"Buffer","data":[1]}]"#),
            &DecodeOptions::new(),
            |_: &Path, v: Value| {
                if let Some(binary) = v.as_binary() {
                    kinds.push(binary.kind());
                }
                Ok(v)
            },
        )
        .unwrap();
        assert_eq!(kinds, vec![crate::ViewKind::Buffer]);
    }

    #[test]
    fn test_hook_deletes_entries() {
        let value = decode(
            Input::Text(r#"{"keep":1,"drop":2}"#),
            &DecodeOptions::new(),
            |path: &Path, v: Value| match path.key() {
                Some(PathSegment::Key(key)) if key == "drop" => Ok(Value::Undefined),
                _ => Ok(v),
            },
        )
        .unwrap();
        assert_eq!(value.as_object().unwrap().keys(), vec!["keep"]);
    }

    #[test]
    fn test_hook_error_propagates() {
        let err = decode(
            Input::Text("[1]"),
            &DecodeOptions::new(),
            |_: &Path, _: Value| Err(Error::custom("rejected")),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Custom(msg) if msg == "rejected"));
    }

    #[test]
    fn test_bytes_input() {
        let value = decode(Input::from(b"[1]"), &DecodeOptions::new(), |_: &Path, v: Value| Ok(v))
            .unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);

        let invalid: &[u8] = &[0x22, 0xff, 0x22];
        assert!(matches!(
            decode(Input::from(invalid), &DecodeOptions::new(), |_: &Path, v: Value| Ok(v)),
            Err(Error::Utf8(_))
        ));
    }

    #[derive(Deserialize, Debug, PartialEq)]
    enum Shape {
        Point,
        Circle { radius: f64 },
    }

    #[derive(Deserialize, Debug, PartialEq)]
    struct Record {
        id: u32,
        label: Option<String>,
        shapes: Vec<Shape>,
        #[serde(with = "serde_bytes_like")]
        payload: Vec<u8>,
    }

    mod serde_bytes_like {
        use serde::de::{Deserializer, Visitor};
        use std::fmt;

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
            struct BytesVisitor;

            impl<'de> Visitor<'de> for BytesVisitor {
                type Value = Vec<u8>;

                fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    f.write_str("a byte buffer")
                }

                fn visit_byte_buf<E>(self, v: Vec<u8>) -> Result<Vec<u8>, E> {
                    Ok(v)
                }
            }

            deserializer.deserialize_byte_buf(BytesVisitor)
        }
    }

    #[test]
    fn test_value_deserializer() {
        let value = plain(
            r#"{"id":7,"label":null,"shapes":["Point",{"Circle":{"radius":1.5}}],"payload":{"type":"Buffer","data":[1,2]}}"#,
        )
        .unwrap();
        let record: Record = de::Deserialize::deserialize(ValueDeserializer::new(value)).unwrap();
        assert_eq!(
            record,
            Record {
                id: 7,
                label: None,
                shapes: vec![Shape::Point, Shape::Circle { radius: 1.5 }],
                payload: vec![1, 2],
            }
        );
    }

    #[test]
    fn test_value_deserializer_views_and_dates() {
        let value = plain(r#"{"type":"Uint16Array","data":[1,65536]}"#).unwrap();
        let numbers: Vec<u16> = de::Deserialize::deserialize(ValueDeserializer::new(value)).unwrap();
        assert_eq!(numbers, vec![1, 0]);

        let value = plain(r#""2024-01-15T10:30:00Z""#).unwrap();
        let text: String = de::Deserialize::deserialize(ValueDeserializer::new(value)).unwrap();
        assert_eq!(text, "2024-01-15T10:30:00.000Z");
    }
}
