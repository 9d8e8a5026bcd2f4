//! Binary buffers and fixed-width numeric views.
//!
//! [`ViewKind`] is the closed set of binary kinds the crate knows about and
//! [`Binary`] holds the elements of one of them. On the wire every binary
//! value travels as a tagged mapping:
//!
//! ```text
//! {"data":[72,101,108,108,111],"type":"Buffer"}
//! ```
//!
//! Decoding dispatches on `type`. A tag outside the known set is left alone,
//! so foreign objects that happen to carry `type`/`data` keys pass through.
//!
//! ## Examples
//!
//! ```rust
//! use json2::{Binary, ViewKind};
//!
//! let view = Binary::Int16Array(vec![-1, 256]);
//! let tagged = view.encode();
//! assert_eq!(tagged.get("type").and_then(|v| v.as_str()), Some("Int16Array"));
//!
//! let back = Binary::decode(&tagged).unwrap();
//! assert_eq!(back, view);
//! assert_eq!(back.kind(), ViewKind::Int16Array);
//! ```

use crate::{Array, Map, Number, Value};
use num_bigint::{BigInt, Sign};
use std::fmt;

/// The closed enumeration of binary kinds.
///
/// The variant name is the wire tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKind {
    Buffer,
    DataView,
    Int8Array,
    Uint8Array,
    Uint8ClampedArray,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Float32Array,
    Float64Array,
    BigInt64Array,
    BigUint64Array,
}

impl ViewKind {
    pub const ALL: [ViewKind; 13] = [
        ViewKind::Buffer,
        ViewKind::DataView,
        ViewKind::Int8Array,
        ViewKind::Uint8Array,
        ViewKind::Uint8ClampedArray,
        ViewKind::Int16Array,
        ViewKind::Uint16Array,
        ViewKind::Int32Array,
        ViewKind::Uint32Array,
        ViewKind::Float32Array,
        ViewKind::Float64Array,
        ViewKind::BigInt64Array,
        ViewKind::BigUint64Array,
    ];

    /// Returns the wire tag for this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ViewKind::Buffer => "Buffer",
            ViewKind::DataView => "DataView",
            ViewKind::Int8Array => "Int8Array",
            ViewKind::Uint8Array => "Uint8Array",
            ViewKind::Uint8ClampedArray => "Uint8ClampedArray",
            ViewKind::Int16Array => "Int16Array",
            ViewKind::Uint16Array => "Uint16Array",
            ViewKind::Int32Array => "Int32Array",
            ViewKind::Uint32Array => "Uint32Array",
            ViewKind::Float32Array => "Float32Array",
            ViewKind::Float64Array => "Float64Array",
            ViewKind::BigInt64Array => "BigInt64Array",
            ViewKind::BigUint64Array => "BigUint64Array",
        }
    }

    /// Looks a kind up by its wire tag.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json2::ViewKind;
    ///
    /// assert_eq!(ViewKind::from_name("Float32Array"), Some(ViewKind::Float32Array));
    /// assert_eq!(ViewKind::from_name("Unknown"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Byte-oriented kinds render as hex in debug output; the rest are numeric.
    #[inline]
    #[must_use]
    pub const fn is_byte_oriented(self) -> bool {
        matches!(self, ViewKind::Buffer | ViewKind::DataView)
    }

    /// Size in bytes of one element.
    #[must_use]
    pub const fn element_size(self) -> usize {
        match self {
            ViewKind::Buffer
            | ViewKind::DataView
            | ViewKind::Int8Array
            | ViewKind::Uint8Array
            | ViewKind::Uint8ClampedArray => 1,
            ViewKind::Int16Array | ViewKind::Uint16Array => 2,
            ViewKind::Int32Array | ViewKind::Uint32Array | ViewKind::Float32Array => 4,
            ViewKind::Float64Array | ViewKind::BigInt64Array | ViewKind::BigUint64Array => 8,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A binary value: a byte buffer, a byte window, or a fixed-width numeric view.
#[derive(Clone, Debug, PartialEq)]
pub enum Binary {
    Buffer(Vec<u8>),
    DataView(Vec<u8>),
    Int8Array(Vec<i8>),
    Uint8Array(Vec<u8>),
    Uint8ClampedArray(Vec<u8>),
    Int16Array(Vec<i16>),
    Uint16Array(Vec<u16>),
    Int32Array(Vec<i32>),
    Uint32Array(Vec<u32>),
    Float32Array(Vec<f32>),
    Float64Array(Vec<f64>),
    BigInt64Array(Vec<i64>),
    BigUint64Array(Vec<u64>),
}

macro_rules! each_view {
    ($binary:expr, $elems:ident => $body:expr) => {
        match $binary {
            Binary::Buffer($elems) => $body,
            Binary::DataView($elems) => $body,
            Binary::Int8Array($elems) => $body,
            Binary::Uint8Array($elems) => $body,
            Binary::Uint8ClampedArray($elems) => $body,
            Binary::Int16Array($elems) => $body,
            Binary::Uint16Array($elems) => $body,
            Binary::Int32Array($elems) => $body,
            Binary::Uint32Array($elems) => $body,
            Binary::Float32Array($elems) => $body,
            Binary::Float64Array($elems) => $body,
            Binary::BigInt64Array($elems) => $body,
            Binary::BigUint64Array($elems) => $body,
        }
    };
}

impl Binary {
    #[must_use]
    pub fn kind(&self) -> ViewKind {
        match self {
            Binary::Buffer(_) => ViewKind::Buffer,
            Binary::DataView(_) => ViewKind::DataView,
            Binary::Int8Array(_) => ViewKind::Int8Array,
            Binary::Uint8Array(_) => ViewKind::Uint8Array,
            Binary::Uint8ClampedArray(_) => ViewKind::Uint8ClampedArray,
            Binary::Int16Array(_) => ViewKind::Int16Array,
            Binary::Uint16Array(_) => ViewKind::Uint16Array,
            Binary::Int32Array(_) => ViewKind::Int32Array,
            Binary::Uint32Array(_) => ViewKind::Uint32Array,
            Binary::Float32Array(_) => ViewKind::Float32Array,
            Binary::Float64Array(_) => ViewKind::Float64Array,
            Binary::BigInt64Array(_) => ViewKind::BigInt64Array,
            Binary::BigUint64Array(_) => ViewKind::BigUint64Array,
        }
    }

    /// Number of elements (bytes for the byte-oriented kinds).
    #[must_use]
    pub fn len(&self) -> usize {
        each_view!(self, elems => elems.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrows the raw bytes of a byte-oriented kind.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Binary::Buffer(bytes) | Binary::DataView(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Reinterprets the view's memory as little-endian bytes.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        each_view!(self, elems => elems.iter().flat_map(|e| e.le_bytes()).collect())
    }

    /// Returns a byte window over this view's memory.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json2::Binary;
    ///
    /// let window = Binary::Uint16Array(vec![0x0102]).window();
    /// assert_eq!(window, Binary::DataView(vec![0x02, 0x01]));
    /// ```
    #[must_use]
    pub fn window(&self) -> Binary {
        Binary::DataView(self.to_le_bytes())
    }

    /// Encodes this view as a tagged `{type, data}` mapping.
    #[must_use]
    pub fn encode(&self) -> Map {
        let mut tagged = Map::with_capacity(2);
        tagged.insert("type".to_string(), Value::from(self.kind().name()));
        tagged.insert(
            "data".to_string(),
            Value::Array(Array::from(self.data_values())),
        );
        tagged
    }

    /// Decodes a tagged `{type, data}` mapping.
    ///
    /// Returns `None` when the tag is not a known kind or `data` is not a
    /// sequence; callers keep the mapping as it is in that case.
    #[must_use]
    pub fn decode(tagged: &Map) -> Option<Binary> {
        let kind = tagged
            .get("type")
            .and_then(Value::as_str)
            .and_then(ViewKind::from_name)?;
        let data = tagged.get("data").and_then(Value::as_array)?;
        let elems = data.to_vec();
        Some(Binary::from_data(kind, &elems))
    }

    /// Builds a view of `kind` from loosely typed elements.
    ///
    /// Elements are coerced the way typed-array construction coerces them:
    /// integers wrap, non-numeric elements become zero.
    #[must_use]
    pub fn from_data(kind: ViewKind, data: &[Value]) -> Binary {
        fn collect<T: Element>(data: &[Value]) -> Vec<T> {
            data.iter().map(T::from_value).collect()
        }

        match kind {
            ViewKind::Buffer => Binary::Buffer(collect(data)),
            ViewKind::DataView => Binary::DataView(collect(data)),
            ViewKind::Int8Array => Binary::Int8Array(collect(data)),
            ViewKind::Uint8Array => Binary::Uint8Array(collect(data)),
            ViewKind::Uint8ClampedArray => {
                Binary::Uint8ClampedArray(data.iter().map(clamp_u8).collect())
            }
            ViewKind::Int16Array => Binary::Int16Array(collect(data)),
            ViewKind::Uint16Array => Binary::Uint16Array(collect(data)),
            ViewKind::Int32Array => Binary::Int32Array(collect(data)),
            ViewKind::Uint32Array => Binary::Uint32Array(collect(data)),
            ViewKind::Float32Array => Binary::Float32Array(collect(data)),
            ViewKind::Float64Array => Binary::Float64Array(collect(data)),
            ViewKind::BigInt64Array => Binary::BigInt64Array(collect(data)),
            ViewKind::BigUint64Array => Binary::BigUint64Array(collect(data)),
        }
    }

    /// The `data` sequence of the tagged form.
    #[must_use]
    pub fn data_values(&self) -> Vec<Value> {
        each_view!(self, elems => elems.iter().map(|e| e.to_value()).collect())
    }

    /// Literal text of the first `limit` elements, as the debug renderer shows them.
    pub(crate) fn literals(&self, limit: usize) -> Vec<String> {
        each_view!(self, elems => elems.iter().take(limit).map(|e| e.literal()).collect())
    }
}

/// A fixed-width element that can be carried in a tagged `data` sequence.
pub trait Element: Copy {
    fn to_value(self) -> Value;

    fn from_value(value: &Value) -> Self;

    fn le_bytes(self) -> Vec<u8>;

    /// Text shown for this element by the debug renderer.
    fn literal(self) -> String;
}

macro_rules! impl_int_element {
    ($($ty:ty),*) => {
        $(
            impl Element for $ty {
                fn to_value(self) -> Value {
                    Value::Number(Number::Integer(self as i64))
                }

                fn from_value(value: &Value) -> Self {
                    int_bits(value) as $ty
                }

                fn le_bytes(self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }

                fn literal(self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_int_element!(i8, u8, i16, u16, i32, u32);

impl Element for i64 {
    fn to_value(self) -> Value {
        Value::Number(Number::Integer(self))
    }

    fn from_value(value: &Value) -> Self {
        int_bits(value)
    }

    fn le_bytes(self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn literal(self) -> String {
        format!("{}n", self)
    }
}

impl Element for u64 {
    fn to_value(self) -> Value {
        match i64::try_from(self) {
            Ok(small) => Value::Number(Number::Integer(small)),
            Err(_) => Value::BigInt(BigInt::from(self)),
        }
    }

    fn from_value(value: &Value) -> Self {
        int_bits(value) as u64
    }

    fn le_bytes(self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn literal(self) -> String {
        format!("{}n", self)
    }
}

impl Element for f32 {
    fn to_value(self) -> Value {
        Value::Number(Number::from(f64::from(self)))
    }

    fn from_value(value: &Value) -> Self {
        to_f64(value) as f32
    }

    fn le_bytes(self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn literal(self) -> String {
        crate::ser::format_float(f64::from(self))
    }
}

impl Element for f64 {
    fn to_value(self) -> Value {
        Value::Number(Number::from(self))
    }

    fn from_value(value: &Value) -> Self {
        to_f64(value)
    }

    fn le_bytes(self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn literal(self) -> String {
        crate::ser::format_float(self)
    }
}

/// Loose numeric reading of a data element; anything non-numeric is NaN.
fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::BigInt(bi) => bi.to_string().parse().unwrap_or(f64::NAN),
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

/// Low 64 bits of an element's integer value, two's complement.
fn int_bits(value: &Value) -> i64 {
    const TWO_64: f64 = 18_446_744_073_709_551_616.0;

    match value {
        Value::Number(Number::Integer(i)) => *i,
        Value::BigInt(bi) => {
            let (sign, digits) = bi.to_u64_digits();
            let low = digits.first().copied().unwrap_or(0);
            if sign == Sign::Minus {
                low.wrapping_neg() as i64
            } else {
                low as i64
            }
        }
        other => {
            let f = to_f64(other).trunc();
            if !f.is_finite() {
                0
            } else if f.abs() < TWO_64 / 2.0 {
                f as i64
            } else {
                f.rem_euclid(TWO_64) as u64 as i64
            }
        }
    }
}

/// Clamped byte conversion: round half to even, saturate into 0..=255.
fn clamp_u8(value: &Value) -> u8 {
    let f = to_f64(value);
    if f.is_nan() || f <= 0.0 {
        return 0;
    }
    if f >= 255.0 {
        return 255;
    }
    let floor = f.floor();
    let rounded = match f - floor {
        d if d < 0.5 => floor,
        d if d > 0.5 => floor + 1.0,
        _ if floor % 2.0 == 0.0 => floor,
        _ => floor + 1.0,
    };
    rounded as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ViewKind::ALL {
            assert_eq!(ViewKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ViewKind::from_name("Int8ClampedArray"), None);
    }

    #[test]
    fn test_byte_oriented_kinds() {
        let byte_kinds: Vec<_> = ViewKind::ALL
            .iter()
            .filter(|kind| kind.is_byte_oriented())
            .collect();
        assert_eq!(byte_kinds, vec![&ViewKind::Buffer, &ViewKind::DataView]);
    }

    #[test]
    fn test_encode_shape() {
        let tagged = Binary::Buffer(b"Hello".to_vec()).encode();
        let keys: Vec<_> = tagged.keys().cloned().collect();
        assert_eq!(keys, vec!["type", "data"]);

        let data = tagged.get("data").and_then(Value::as_array).unwrap();
        let bytes: Vec<_> = data.to_vec().iter().filter_map(Value::as_i64).collect();
        assert_eq!(bytes, vec![72, 101, 108, 108, 111]);
    }

    #[test]
    fn test_decode_unknown_tag() {
        let mut tagged = Map::new();
        tagged.insert("type".to_string(), Value::from("Unknown"));
        tagged.insert(
            "data".to_string(),
            Value::Array(Array::from(vec![Value::from(1), Value::from(2)])),
        );
        assert_eq!(Binary::decode(&tagged), None);
    }

    #[test]
    fn test_decode_requires_sequence_data() {
        let mut tagged = Map::new();
        tagged.insert("type".to_string(), Value::from("Buffer"));
        tagged.insert("data".to_string(), Value::from("not a sequence"));
        assert_eq!(Binary::decode(&tagged), None);
    }

    #[test]
    fn test_integer_wrapping() {
        let data = vec![Value::from(300), Value::from(-1), Value::from(2.9)];
        assert_eq!(
            Binary::from_data(ViewKind::Uint8Array, &data),
            Binary::Uint8Array(vec![44, 255, 2])
        );
        assert_eq!(
            Binary::from_data(ViewKind::Int8Array, &data),
            Binary::Int8Array(vec![44, -1, 2])
        );
    }

    #[test]
    fn test_clamped_rounding() {
        let data = vec![
            Value::from(300),
            Value::from(-5),
            Value::from(1.5),
            Value::from(2.5),
            Value::from(2.6),
        ];
        assert_eq!(
            Binary::from_data(ViewKind::Uint8ClampedArray, &data),
            Binary::Uint8ClampedArray(vec![255, 0, 2, 2, 3])
        );
    }

    #[test]
    fn test_non_numeric_elements_become_zero() {
        let data = vec![Value::from("abc"), Value::Null, Value::from(true)];
        assert_eq!(
            Binary::from_data(ViewKind::Int32Array, &data),
            Binary::Int32Array(vec![0, 0, 1])
        );
    }

    #[test]
    fn test_big_uint_above_i64_uses_bigint() {
        let view = Binary::BigUint64Array(vec![u64::MAX, 1]);
        let data = view.data_values();
        assert!(data[0].is_bigint());
        assert_eq!(data[1].as_i64(), Some(1));
        assert_eq!(Binary::from_data(ViewKind::BigUint64Array, &data), view);
    }

    #[test]
    fn test_negative_bigint_wraps() {
        let data = vec![Value::BigInt(BigInt::from(-2))];
        assert_eq!(
            Binary::from_data(ViewKind::BigUint64Array, &data),
            Binary::BigUint64Array(vec![u64::MAX - 1])
        );
    }

    #[test]
    fn test_window_reinterprets_memory() {
        let view = Binary::Int32Array(vec![1, -1]);
        assert_eq!(
            view.window(),
            Binary::DataView(vec![1, 0, 0, 0, 0xff, 0xff, 0xff, 0xff])
        );
        assert_eq!(view.to_le_bytes().len(), 2 * ViewKind::Int32Array.element_size());
    }

    #[test]
    fn test_literals_truncate() {
        let view = Binary::BigInt64Array(vec![1, 2, 3]);
        assert_eq!(view.literals(2), vec!["1n", "2n"]);
        assert_eq!(Binary::Float32Array(vec![0.5]).literals(10), vec!["0.5"]);
    }
}
