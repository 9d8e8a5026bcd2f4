//! Per-call configuration for the encode, decode and debug entry points.
//!
//! - [`EncodeOptions`]: compact text and byte encoding
//! - [`DebugOptions`]: the human-readable debug renderer
//! - [`DecodeOptions`]: text and byte decoding
//!
//! Every options struct carries its own `logging` flag. Diagnostics are
//! emitted through `tracing` only for calls that opt in.
//!
//! ## Examples
//!
//! ```rust
//! use json2::{to_debug_string_with, value, DebugOptions, Path, Value};
//!
//! let data = value!({ "bytes": [1, 2, 3] });
//! let options = DebugOptions::new().with_indent(0).with_truncate_view_length(5);
//! let text = to_debug_string_with(&data, &options, |_: &Path, v: Value| Ok(v)).unwrap();
//! assert_eq!(text, "{\"bytes\":[1,2,3]}");
//! ```

/// Widest indentation written. Larger widths are clamped to it.
pub const MAX_INDENT: usize = 10;

/// Options for compact encoding ([`crate::to_string_with`], [`crate::to_bytes_with`]).
///
/// # Examples
///
/// ```rust
/// use json2::EncodeOptions;
///
/// let options = EncodeOptions::new();
/// assert_eq!(options.indent, 0);
/// assert!(options.ordered);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    pub indent: usize,
    pub ordered: bool,
    pub logging: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 0,
            ordered: true,
            logging: false,
        }
    }
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation width. `0` keeps the output on a single line;
    /// widths above [`MAX_INDENT`] are clamped when writing.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Keeps each mapping's insertion order instead of sorting keys.
    ///
    /// Output is no longer deterministic across differently built trees.
    #[must_use]
    pub fn unordered(mut self) -> Self {
        self.ordered = false;
        self
    }

    /// Enables diagnostic logging for calls made with these options.
    #[must_use]
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }
}

/// Options for the debug renderer ([`crate::to_debug_string_with`]).
///
/// # Examples
///
/// ```rust
/// use json2::DebugOptions;
///
/// let options = DebugOptions::new();
/// assert_eq!(options.indent, 4);
/// assert_eq!(options.truncate_view_length, 50);
/// ```
#[derive(Clone, Debug)]
pub struct DebugOptions {
    pub indent: usize,
    pub truncate_view_length: usize,
    pub logging: bool,
}

impl Default for DebugOptions {
    fn default() -> Self {
        DebugOptions {
            indent: 4,
            truncate_view_length: 50,
            logging: false,
        }
    }
}

impl DebugOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation width. `0` renders everything on one line.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets how many elements of a binary view are listed before the
    /// `... N more` suffix.
    #[must_use]
    pub fn with_truncate_view_length(mut self, limit: usize) -> Self {
        self.truncate_view_length = limit;
        self
    }

    /// Enables diagnostic logging for calls made with these options.
    #[must_use]
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }
}

/// Options for decoding ([`crate::parse_with`], [`crate::from_slice_with`]).
#[derive(Clone, Debug, Default)]
pub struct DecodeOptions {
    pub logging: bool,
}

impl DecodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables diagnostic logging for calls made with these options.
    #[must_use]
    pub fn with_logging(mut self, logging: bool) -> Self {
        self.logging = logging;
        self
    }
}
