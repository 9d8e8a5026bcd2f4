//! Error types for encoding, decoding and debug rendering.
//!
//! ## Error Categories
//!
//! - **Hook errors**: whatever a transform or revive hook returns, passed through unchanged
//! - **Syntax errors**: malformed text input, with line/column information taken
//!   from the underlying `serde_json` parser
//! - **UTF-8 errors**: byte input that is not valid UTF-8
//!
//! An unrecognized binary tag is deliberately *not* an error: decoding leaves
//! such objects untouched.
//!
//! ## Examples
//!
//! ```rust
//! use json2::{from_str, Error};
//!
//! let result = from_str("{\"open\": [1, 2");
//! assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors raised by the encode, decode and render entry points.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Syntax error with detailed context
    #[error("Syntax error at line {line}, column {col}:\n{context}\n{msg}{suggestion}")]
    Syntax {
        line: usize,
        col: usize,
        msg: String,
        context: String,
        suggestion: String,
    },

    /// Unexpected end of input
    #[error(
        "Unexpected end of input at line {line}, column {col}\n{context}\nExpected: {expected}"
    )]
    UnexpectedEof {
        line: usize,
        col: usize,
        expected: String,
        context: String,
    },

    /// Byte input was not valid UTF-8
    #[error("Invalid UTF-8 input: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A value could not be mapped to or from a Rust type
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error, usually raised from a caller hook
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a syntax error with the offending line and an optional suggestion.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json2::Error;
    ///
    /// let err = Error::syntax_with_context(
    ///     1,
    ///     9,
    ///     "expected ':' after key",
    ///     "{\"name\" \"Alice\"}",
    ///     Some("Separate keys from values with ':'"),
    /// );
    /// assert!(err.to_string().contains("Help:"));
    /// ```
    pub fn syntax_with_context(
        line: usize,
        col: usize,
        msg: &str,
        context: &str,
        suggestion: Option<&str>,
    ) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
            context: context.to_string(),
            suggestion: suggestion
                .map(|s| format!("\nHelp: {}", s))
                .unwrap_or_default(),
        }
    }

    /// Creates an unexpected end-of-input error.
    pub fn unexpected_eof(line: usize, col: usize, expected: &str, context: &str) -> Self {
        Error::UnexpectedEof {
            line,
            col,
            expected: expected.to_string(),
            context: context.to_string(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// This is the error hooks are expected to return; it reaches the caller
    /// of the entry point unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json2::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
