//! Error types for prose generation, extraction and update.
//!
//! This module provides error reporting with enough context (which line,
//! which document) to diagnose a failing pipeline.
//!
//! ## Error Categories
//!
//! - **Grammar Errors**: A directive or field-spec token does not match the
//!   micro-grammar, or a placeholder's framing cannot locate its value
//! - **Read / Write Failures**: A template or document cannot be read or written
//! - **Binding Errors**: A value cannot be coerced into (or represented from) a
//!   host type
//!
//! A field that is unknown to the data is *not* an error: it is logged and
//! rendered as a sentinel (see [`crate::ProseOptions::sentinel`]).
//!
//! ## Examples
//!
//! ```rust
//! use serde_prose::{extract, Error};
//!
//! let result = extract("<!--{{name:bogus}}-->\ntext\n");
//! assert!(matches!(result, Err(Error::Grammar { line: 1, .. })));
//! ```

use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Represents all possible errors raised by the pipelines and the data binding.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// IO error on a caller-supplied reader or writer
    #[error("IO error: {0}")]
    Io(String),

    /// A template or document could not be read
    #[error("Failed to read {path}: {msg}")]
    Read { path: String, msg: String },

    /// A document could not be written
    #[error("Failed to write {path}: {msg}")]
    Write { path: String, msg: String },

    /// A token does not match the directive or field-spec grammar
    #[error("Grammar error at line {line}: {msg}{context}")]
    Grammar {
        line: usize,
        msg: String,
        context: String,
    },

    /// An argument violates an operation's contract
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value could not be coerced into the requested host type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Unsupported type for the data binding
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a grammar error for the given 1-based line.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::Error;
    ///
    /// let err = Error::grammar(10, "malformed field spec");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn grammar(line: usize, msg: &str) -> Self {
        Error::Grammar {
            line,
            msg: msg.to_string(),
            context: String::new(),
        }
    }

    /// Creates a grammar error quoting the offending source text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::Error;
    ///
    /// let err = Error::grammar_with_context(3, "unknown directive", "{@template.colour}}");
    /// assert!(err.to_string().contains("{@template.colour}}"));
    /// ```
    pub fn grammar_with_context(line: usize, msg: &str, context: &str) -> Self {
        Error::Grammar {
            line,
            msg: msg.to_string(),
            context: format!("\n  {}", context.trim_end()),
        }
    }

    /// Creates a read failure for `path`.
    pub fn read(path: &Path, err: &std::io::Error) -> Self {
        Error::Read {
            path: path.display().to_string(),
            msg: err.to_string(),
        }
    }

    /// Creates a write failure for `path`.
    pub fn write(path: &Path, msg: impl fmt::Display) -> Self {
        Error::Write {
            path: path.display().to_string(),
            msg: msg.to_string(),
        }
    }

    pub fn invalid_argument(msg: impl fmt::Display) -> Self {
        Error::InvalidArgument(msg.to_string())
    }

    /// Creates a type mismatch error when a value cannot be coerced.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::Error;
    ///
    /// let err = Error::type_mismatch("u32", "text `abc`");
    /// assert!(err.to_string().contains("expected u32"));
    /// ```
    pub fn type_mismatch(expected: &str, found: &str) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Creates an unsupported type error for types the binding cannot represent.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
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
