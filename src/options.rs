//! Configuration options for the prose pipelines.
//!
//! This module provides:
//!
//! - [`ProseOptions`]: Main configuration struct
//! - [`CommentFraming`]: The comment syntax that hides header and directive lines
//!
//! Options start from the builder values and are then overridden by any
//! directives found in the document itself, so a document always carries the
//! configuration needed to re-read it.
//!
//! ## Examples
//!
//! ```rust
//! use serde_prose::{Delimiter, ProseOptions};
//!
//! let options = ProseOptions::new()
//!     .with_comment("<!-- ", " -->")
//!     .with_delimiter(Delimiter::pair("[]").unwrap())
//!     .with_sentinel("??");
//!
//! // Directives in the document take precedence.
//! let options = options.scan("<!--{@template.delimiter.pair:\"()\"}}-->\n").unwrap();
//! assert_eq!(options.delimiter.start(), Some("("));
//! assert_eq!(options.comment.start, "<!-- ");
//! ```

use crate::directive::Directive;
use crate::{Delimiter, Result};

/// Default comment start: markdown/HTML comments stay invisible when rendered.
pub const DEFAULT_COMMENT_START: &str = "<!--";
pub const DEFAULT_COMMENT_END: &str = "-->";

/// Rendered in place of a field the data does not define.
pub const DEFAULT_SENTINEL: &str = "UNKNOWN";

/// The text that frames hidden lines (headers and directives).
///
/// # Examples
///
/// ```rust
/// use serde_prose::CommentFraming;
///
/// let comment = CommentFraming::default();
/// assert_eq!(comment.wrap("{{author}}"), "<!--{{author}}-->\n");
/// assert_eq!(comment.strip("  <!--{{author}}-->"), Some("{{author}}"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentFraming {
    pub start: String,
    pub end: String,
}

impl CommentFraming {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        CommentFraming {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Frames `inner` as a complete hidden line, terminator included.
    #[must_use]
    pub fn wrap(&self, inner: &str) -> String {
        format!("{}{}{}\n", self.start, inner, self.end)
    }

    /// Strips the framing from a line, ignoring surrounding whitespace.
    ///
    /// Returns `None` if the line is not framed by this comment syntax.
    #[must_use]
    pub fn strip<'a>(&self, line: &'a str) -> Option<&'a str> {
        let inner = line
            .trim()
            .strip_prefix(self.start.trim())?
            .strip_suffix(self.end.trim())?;
        Some(inner)
    }

    /// Returns `true` if `line` is a header line: framed, and holding at least
    /// one `{{...}}` token.
    #[must_use]
    pub fn is_header(&self, line: &str) -> bool {
        self.strip(line)
            .map_or(false, |inner| inner.contains("{{") && inner.contains("}}"))
    }
}

impl Default for CommentFraming {
    fn default() -> Self {
        CommentFraming::new(DEFAULT_COMMENT_START, DEFAULT_COMMENT_END)
    }
}

/// Configuration options for generate, extract and update.
///
/// # Examples
///
/// ```rust
/// use serde_prose::ProseOptions;
///
/// let options = ProseOptions::new();
/// assert_eq!(options.comment.start, "<!--");
/// assert!(!options.delimiter.is_set());
/// assert_eq!(options.sentinel, "UNKNOWN");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ProseOptions {
    pub comment: CommentFraming,
    /// Inline value framing; unset means framing comes from the surrounding text.
    pub delimiter: Delimiter,
    pub sentinel: String,
}

impl Default for ProseOptions {
    fn default() -> Self {
        ProseOptions {
            comment: CommentFraming::default(),
            delimiter: Delimiter::new(),
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }
}

impl ProseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default options overridden by the directives of `document`.
    pub fn from_document(document: &str) -> Result<Self> {
        Self::default().scan(document)
    }

    #[must_use]
    pub fn with_comment(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.comment = CommentFraming::new(start, end);
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the text rendered for fields unknown to the data.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Applies every configuration directive found in `document`, in order.
    ///
    /// # Errors
    ///
    /// Returns a grammar error for a malformed directive line.
    pub fn scan(mut self, document: &str) -> Result<Self> {
        for (idx, line) in document.lines().enumerate() {
            if let Some(directive) = Directive::find(line, idx + 1)? {
                self.apply(directive);
            }
        }
        Ok(self)
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Comment(comment) => self.comment = comment,
            Directive::DelimiterStart(start) => {
                self.delimiter = self.delimiter.clone().with_start(start);
            }
            Directive::DelimiterEnd(end) => self.delimiter = self.delimiter.clone().with_end(end),
            Directive::DelimiterPair(pair) => self.delimiter = pair,
            Directive::ListTemplate(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_applies_directives_in_order() {
        let document = "\
<!-- {@template.comment}} -->
<!-- {@template.delimiter.start:\"<\"}} -->
Some prose.
<!-- {@template.delimiter.end:\">\"}} -->
";
        let options = ProseOptions::from_document(document).unwrap();
        assert_eq!(options.comment, CommentFraming::new("<!-- ", " -->"));
        assert_eq!(
            options.delimiter,
            Delimiter::new().with_start("<").with_end(">")
        );
    }

    #[test]
    fn test_header_detection_requires_framing() {
        let comment = CommentFraming::new("<!-- ", " -->");
        assert!(comment.is_header("<!-- {{a}} -->"));
        assert!(comment.is_header("<!--{{a}}-->"));
        assert!(!comment.is_header("By {{author}}."));
        assert!(!comment.is_header("<!-- a plain comment -->"));
    }

    #[test]
    fn test_scan_reports_bad_directive_line() {
        let err = ProseOptions::from_document("text\n<!--{@template.bogus}}-->\n").unwrap_err();
        assert!(matches!(err, crate::Error::Grammar { line: 2, .. }));
    }
}
