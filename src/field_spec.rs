//! Field-spec grammar.
//!
//! Two token shapes describe a value's place in a document:
//!
//! - the bare placeholder `{{name}}`, written by template authors in visible
//!   text, and
//! - the canonical field spec `{{name:pattern="<start>%s<end>"}}`, generated
//!   into a hidden header line so the value can be located again later.
//!
//! When a value has no framing at all, the canonical form degenerates to
//! `{{name}}` and the value spans the whole block text.

use crate::{Delimiter, Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::ops::Range;

/// Exact canonical token; name, start and end are non-greedy captures.
static FIELD_SPEC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\{\{([^{}:"\s]+?)(?::pattern="(.*?)%s(.*?)")?\}\}$"#).unwrap()
});

/// One canonical token inside a header line.
static HEADER_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{\{[^{}:"\s]+(?::pattern=".*?%s.*?")?\}\}"#).unwrap()
});

/// A bare placeholder in visible template text.
static PLACEHOLDER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{\{\s*([^{}:"\s]+)\s*\}\}"#).unwrap());

/// A parsed `{name, delimiter}` pair describing where one value sits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    delimiter: Delimiter,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, delimiter: Delimiter) -> Self {
        FieldSpec {
            name: name.into(),
            delimiter,
        }
    }

    /// Parses one canonical token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Grammar`] if `token` is not exactly
    /// `{{name:pattern="start%send"}}` or `{{name}}`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::FieldSpec;
    ///
    /// let spec = FieldSpec::parse(r#"{{author:pattern="By %s."}}"#).unwrap();
    /// assert_eq!(spec.name(), "author");
    /// assert_eq!(spec.delimiter().start(), Some("By "));
    /// assert_eq!(spec.delimiter().end(), Some("."));
    /// ```
    pub fn parse(token: &str) -> Result<Self> {
        let caps = FIELD_SPEC_REGEX.captures(token).ok_or_else(|| {
            Error::grammar_with_context(0, "malformed field spec", token)
        })?;
        let delimiter = Delimiter::new()
            .with_start(caps.get(2).map_or("", |m| m.as_str()))
            .with_end(caps.get(3).map_or("", |m| m.as_str()));
        Ok(FieldSpec::new(&caps[1], delimiter))
    }

    /// Produces the canonical token for `name` framed by `delimiter`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::{Delimiter, FieldSpec};
    ///
    /// let framed = Delimiter::pair("[]").unwrap();
    /// assert_eq!(FieldSpec::emit("title", &framed), r#"{{title:pattern="[%s]"}}"#);
    /// assert_eq!(FieldSpec::emit("bio", &Delimiter::new()), "{{bio}}");
    /// ```
    #[must_use]
    pub fn emit(name: &str, delimiter: &Delimiter) -> String {
        if delimiter.is_set() {
            format!(
                "{{{{{}:pattern=\"{}%s{}\"}}}}",
                name,
                delimiter.start().unwrap_or_default(),
                delimiter.end().unwrap_or_default()
            )
        } else {
            format!("{{{{{}}}}}", name)
        }
    }

    /// Parses the inside of a header line into its field specs.
    ///
    /// `inner` is the header line with its comment framing removed; it must
    /// consist only of canonical tokens separated by whitespace.
    pub fn parse_header(inner: &str, line: usize) -> Result<Vec<FieldSpec>> {
        let mut specs = Vec::new();
        let mut pos = 0;
        loop {
            pos += inner[pos..].len() - inner[pos..].trim_start().len();
            if pos >= inner.len() {
                break;
            }
            match HEADER_TOKEN_REGEX.find_at(inner, pos) {
                Some(m) if m.start() == pos => {
                    let spec = FieldSpec::parse(m.as_str())
                        .map_err(|_| Error::grammar_with_context(line, "malformed field spec", m.as_str()))?;
                    specs.push(spec);
                    pos = m.end();
                }
                _ => {
                    let rest = &inner[pos..];
                    let token = rest.find("}}").map_or(rest, |end| &rest[..end + 2]);
                    return Err(Error::grammar_with_context(
                        line,
                        "malformed field spec",
                        token,
                    ));
                }
            }
        }
        Ok(specs)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }
}

impl fmt::Display for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&FieldSpec::emit(&self.name, &self.delimiter))
    }
}

/// A bare `{{name}}` placeholder found in visible text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Byte range of the whole `{{...}}` token.
    pub range: Range<usize>,
}

impl Placeholder {
    /// Finds every placeholder in `text`, in order of appearance.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_prose::Placeholder;
    ///
    /// let found = Placeholder::scan("By {{author}} in {{ year }}.");
    /// let names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
    /// assert_eq!(names, vec!["author", "year"]);
    /// assert_eq!(found[0].range, 3..13);
    /// ```
    #[must_use]
    pub fn scan(text: &str) -> Vec<Placeholder> {
        PLACEHOLDER_REGEX
            .captures_iter(text)
            .filter_map(|caps| {
                let token = caps.get(0)?;
                Some(Placeholder {
                    name: caps[1].to_string(),
                    range: token.range(),
                })
            })
            .collect()
    }

    /// Rewrites every placeholder name in `text` through `rename`, normalising
    /// the token to `{{name}}`.
    pub(crate) fn rename_all(text: &str, rename: impl Fn(&str) -> String) -> String {
        PLACEHOLDER_REGEX
            .replace_all(text, |caps: &regex::Captures<'_>| {
                format!("{{{{{}}}}}", rename(&caps[1]))
            })
            .into_owned()
    }
}
