//! Document directives.
//!
//! Directives are line-embedded control tokens that configure the pipelines
//! rather than carry data:
//!
//! ```text
//! <!-- {@template.comment}} -->
//! <!--{@template.delimiter.pair:"[]"}}-->
//! <!--{@list-template="- {{refs.*.title}}\n"}}-->
//! ```
//!
//! A directive is recognised anywhere on its line; the surrounding text is
//! kept verbatim when the line is passed through.

use crate::options::CommentFraming;
use crate::{Delimiter, Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

pub const COMMENT_TOKEN: &str = "{@template.comment}}";

const TEMPLATE_MARKER: &str = "{@template.";
const LIST_TEMPLATE_MARKER: &str = "{@list-template";

static DELIMITER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{@template\.delimiter\.(start|end|pair):"(.*?)"\}\}"#).unwrap()
});

static LIST_TEMPLATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{@list-template="((?:[^"\\]|\\.)*)"\}\}"#).unwrap());

/// A parsed directive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Directive {
    /// `{@template.comment}}`: framing taken from the text around the token
    Comment(CommentFraming),
    /// `{@template.delimiter.start:"X"}}`
    DelimiterStart(String),
    /// `{@template.delimiter.end:"X"}}`
    DelimiterEnd(String),
    /// `{@template.delimiter.pair:"XY"}}`
    DelimiterPair(Delimiter),
    /// `{@list-template="..."}}`: the captured block, unescaped
    ListTemplate(String),
}

impl Directive {
    /// Looks for a directive on one line (without its terminator).
    ///
    /// Returns `Ok(None)` for ordinary lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Grammar`] for a line that carries a directive marker
    /// but no well-formed directive, e.g. `{@template.colour}}`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::{CommentFraming, Directive};
    ///
    /// let directive = Directive::find("<!-- {@template.comment}} -->", 1).unwrap();
    /// assert_eq!(
    ///     directive,
    ///     Some(Directive::Comment(CommentFraming::new("<!-- ", " -->")))
    /// );
    /// assert_eq!(Directive::find("plain prose", 2).unwrap(), None);
    /// ```
    pub fn find(content: &str, line: usize) -> Result<Option<Directive>> {
        if let Some(caps) = LIST_TEMPLATE_REGEX.captures(content) {
            return Ok(Some(Directive::ListTemplate(unescape_block(&caps[1]))));
        }

        if let Some(idx) = content.find(COMMENT_TOKEN) {
            let framing = CommentFraming::new(
                &content[..idx],
                &content[idx + COMMENT_TOKEN.len()..],
            );
            return Ok(Some(Directive::Comment(framing)));
        }

        if let Some(caps) = DELIMITER_REGEX.captures(content) {
            let value = caps[2].to_string();
            let directive = match &caps[1] {
                "start" => Directive::DelimiterStart(value),
                "end" => Directive::DelimiterEnd(value),
                _ => Directive::DelimiterPair(Delimiter::pair(&value).map_err(|e| {
                    Error::grammar_with_context(line, &e.to_string(), content)
                })?),
            };
            return Ok(Some(directive));
        }

        if content.contains(TEMPLATE_MARKER) || content.contains(LIST_TEMPLATE_MARKER) {
            return Err(Error::grammar_with_context(
                line,
                "unrecognised directive",
                content,
            ));
        }

        Ok(None)
    }

    /// Renders a complete list-template directive line capturing `block`.
    #[must_use]
    pub fn list_template_line(block: &str, comment: &CommentFraming) -> String {
        comment.wrap(&format!("{{@list-template=\"{}\"}}}}", escape_block(block)))
    }
}

/// Escapes a captured block so it fits on a single directive line.
#[must_use]
pub fn escape_block(block: &str) -> String {
    let mut escaped = String::with_capacity(block.len() + 8);
    for ch in block.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Reverses [`escape_block`]. Unknown escapes are preserved literally.
#[must_use]
pub fn unescape_block(escaped: &str) -> String {
    let mut block = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            block.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => block.push('\\'),
            Some('"') => block.push('"'),
            Some('n') => block.push('\n'),
            Some('r') => block.push('\r'),
            Some(other) => {
                block.push('\\');
                block.push(other);
            }
            None => block.push('\\'),
        }
    }
    block
}
