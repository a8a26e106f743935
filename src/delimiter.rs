//! Value framing delimiters and their matchers.
//!
//! A [`Delimiter`] is an optional start/end string pair that frames a value in
//! running text, e.g. `[` and `]` around `[Plato]`, or `By ` and `.` around
//! `By Plato.`. [`Delimiter::pattern`] turns the pair into a regex matching the
//! shortest framed run of text; capture group 1 is the value itself.
//!
//! ## Examples
//!
//! ```rust
//! use serde_prose::Delimiter;
//!
//! let delimiter = Delimiter::pair("[]").unwrap();
//! let pattern = delimiter.pattern().unwrap();
//! let caps = pattern.captures("see [one] and [two]").unwrap();
//! assert_eq!(&caps[1], "one");
//! ```

use crate::{Error, Result};
use regex::Regex;

/// An optional start/end string pair framing a value in text.
///
/// Empty strings are treated as unset, so `Delimiter::new().with_start("")`
/// equals `Delimiter::new()`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Delimiter {
    start: Option<String>,
    end: Option<String>,
}

impl Delimiter {
    /// Creates a delimiter with neither start nor end set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a delimiter from a two-character string, e.g. `"[]"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless `s` is exactly two characters.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::Delimiter;
    ///
    /// let delimiter = Delimiter::pair("()").unwrap();
    /// assert_eq!(delimiter.start(), Some("("));
    /// assert_eq!(delimiter.end(), Some(")"));
    /// assert!(Delimiter::pair("(((").is_err());
    /// ```
    pub fn pair(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(start), Some(end), None) => Ok(Delimiter {
                start: Some(start.to_string()),
                end: Some(end.to_string()),
            }),
            _ => Err(Error::invalid_argument(format!(
                "delimiter pair must be exactly 2 characters, got {:?}",
                s
            ))),
        }
    }

    /// Sets the start delimiter; an empty string unsets it.
    #[must_use]
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = non_empty(start.into());
        self
    }

    /// Sets the end delimiter; an empty string unsets it.
    #[must_use]
    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = non_empty(end.into());
        self
    }

    #[must_use]
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    #[must_use]
    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    /// Returns `true` if at least one of start or end is set.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Builds the matcher for the shortest run of text framed by this delimiter.
    ///
    /// Capture group 1 holds the framed value. Start and end are matched as
    /// literal text.
    ///
    /// | start | end | matches |
    /// |-------|-----|---------|
    /// | set   | set | start, then the shortest run up to the first end |
    /// | set   | -   | the last start on a line, then the rest of that line |
    /// | -     | set | from the start of a line up to the first end on it |
    /// | -     | -   | the entire text, minus its final line terminator |
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::Delimiter;
    ///
    /// let pattern = Delimiter::new().with_start("(").pattern().unwrap();
    /// let caps = pattern.captures("note (first (second) tail\nnext").unwrap();
    /// assert_eq!(&caps[1], "second) tail");
    ///
    /// let pattern = Delimiter::new().with_start("Author: ").with_end(" (").pattern().unwrap();
    /// let caps = pattern.captures("Author: Plato Jr (-428)").unwrap();
    /// assert_eq!(&caps[1], "Plato Jr");
    /// ```
    pub fn pattern(&self) -> Result<Regex> {
        let source = match (self.start(), self.end()) {
            (Some(start), Some(end)) => format!(
                "{}((?s:.*?)){}",
                regex::escape(start),
                regex::escape(end)
            ),
            // The greedy lead-in skips to the last start on the line.
            (Some(start), None) => format!(r"(?m)[^\n]*{}([^\r\n]*)\r?$", regex::escape(start)),
            (None, Some(end)) => format!("(?m)^(.*?){}", regex::escape(end)),
            (None, None) => r"(?s)\A(.*?)\r?\n?\z".to_string(),
        };
        Regex::new(&source).map_err(|e| Error::custom(format!("invalid value pattern: {}", e)))
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
