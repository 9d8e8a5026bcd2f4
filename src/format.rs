//! Wire format reference
//!
//! This module documents the text this crate writes and reads. It contains
//! no code.
//!
//! # Compact text
//!
//! Compact output is standard tree text (objects, arrays, strings, numbers,
//! `true`, `false`, `null`) with two extra guarantees:
//!
//! - **Sorted keys**: every mapping at every depth lists its keys in
//!   ascending UTF-16 code unit order, so structurally equal inputs always produce
//!   identical text.
//! - **Tagged binary**: binary values are written as a two-key mapping.
//!
//! ## Primitives
//!
//! | Value | Text | Example |
//! |-------|------|---------|
//! | Null | `null` | `null` |
//! | Absent | dropped from mappings, `null` elsewhere | `[null]` |
//! | Boolean | `true` / `false` | `true` |
//! | Integer | decimal digits, optional `-` | `-42` |
//! | Float | shortest round-trip decimal | `0.1`, `1e+21` |
//! | Infinity, NaN | `null` | `null` |
//! | BigInt | bare digits | `123456789012345678901234567890` |
//! | String | double-quoted, escaped | `"a\"b"` |
//! | Date | ISO-8601 UTC with milliseconds | `"2024-01-15T10:30:00.000Z"` |
//!
//! ## Tagged binary
//!
//! ```text
//! {"data":[72,101,108,108,111],"type":"Buffer"}
//! ```
//!
//! `type` is one of:
//!
//! | Tag | Element | `data` holds |
//! |-----|---------|--------------|
//! | `Buffer` | byte | byte values |
//! | `DataView` | byte | byte values of the window |
//! | `Int8Array` | i8 | element values |
//! | `Uint8Array` | u8 | element values |
//! | `Uint8ClampedArray` | u8, clamped | element values |
//! | `Int16Array` | i16 | element values |
//! | `Uint16Array` | u16 | element values |
//! | `Int32Array` | i32 | element values |
//! | `Uint32Array` | u32 | element values |
//! | `Float32Array` | f32 | element values |
//! | `Float64Array` | f64 | element values |
//! | `BigInt64Array` | i64 | element values |
//! | `BigUint64Array` | u64 | element values |
//!
//! Numeric views carry element values, not their bytes: a `Uint16Array` of
//! `[258]` is `{"data":[258],"type":"Uint16Array"}`. Because keys are sorted,
//! `data` always precedes `type`.
//!
//! ## Repeated references
//!
//! A node that is reached a second time during one encode, through a cycle
//! or through a second parent, is written as the string `"[Circular]"`.
//!
//! # Decoding
//!
//! Decoding accepts any standard tree text. After parsing, a post-order pass
//! turns:
//!
//! - mappings whose `type` is a known tag and whose `data` is a sequence
//!   into binary views, coercing elements as typed-array construction does
//!   (integers wrap, clamped views round half-to-even, non-numbers become 0);
//! - strings of exactly the shape `YYYY-MM-DDTHH:MM:SS[.fraction]Z` into dates.
//!
//! Anything else, including mappings with an unknown `type`, is left as is.
//!
//! # Debug text
//!
//! Debug output is for people and is not decodable:
//!
//! ```text
//! {
//!     "buf": <Buffer 48 65 6c 6c 6f>,
//!     "view": Uint8Array { 72, 101, 108, 108, 111 },
//!     "big": 9007199254740991n,
//!     "list": [
//!         1
//!     ],
//!     "again": [Duplicate reference to #/list],
//!     "self": [Circular reference to #/]
//! }
//! ```
//!
//! - Views list at most `truncate_view_length` elements, then
//!   ` ... N more bytes` or ` ... N more values` (singular for one).
//! - Reference paths are `#/` followed by `/`-joined keys and indices; `~`
//!   and `/` inside keys are written `~0` and `~1`. An empty key is written
//!   `""`.
//! - Keys keep their insertion order.
