//! Blocks: a hidden header line plus the text it describes.

use crate::options::CommentFraming;
use crate::{Error, FieldSpec, Result};

/// A unit of a document, bounded by blank lines.
///
/// A block keeps its raw header and separator lines, so [`Block::raw`]
/// reproduces the source bytes exactly.
///
/// # Examples
///
/// ```rust
/// use serde_prose::{Block, CommentFraming};
///
/// let mut block = Block::new();
/// block
///     .initialise("<!--{{author:pattern=\"By %s.\"}}-->\n", 1, &CommentFraming::default())
///     .unwrap();
/// block.append_text("By Plato.\n");
/// block.terminate("\n");
///
/// assert_eq!(block.field_specs()[0].name(), "author");
/// assert_eq!(block.raw(), "<!--{{author:pattern=\"By %s.\"}}-->\nBy Plato.\n\n");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    field_specs: Vec<FieldSpec>,
    header: Option<String>,
    text: String,
    separator: String,
    line: usize,
    terminated: bool,
}

impl Block {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the block from a raw header line (terminator included).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Grammar`] if the header is not framed by `comment` or
    /// holds a malformed field spec.
    pub fn initialise(&mut self, header: &str, line: usize, comment: &CommentFraming) -> Result<()> {
        let inner = comment
            .strip(header)
            .ok_or_else(|| Error::grammar_with_context(line, "header is not a comment line", header))?;
        self.field_specs = FieldSpec::parse_header(inner, line)?;
        self.header = Some(header.to_string());
        self.text.clear();
        self.separator.clear();
        self.line = line;
        self.terminated = false;
        Ok(())
    }

    /// Appends a raw text line.
    ///
    /// # Panics
    ///
    /// Panics if the block has already been terminated.
    pub fn append_text(&mut self, line: &str) {
        assert!(!self.terminated, "append_text on a terminated block");
        self.text.push_str(line);
    }

    /// Freezes the block with the blank line (possibly empty) that ended it.
    pub fn terminate(&mut self, separator: &str) {
        self.separator = separator.to_string();
        self.terminated = true;
    }

    /// A block with neither field specs nor text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.field_specs.is_empty() && self.text.is_empty()
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    #[must_use]
    pub fn field_specs(&self) -> &[FieldSpec] {
        &self.field_specs
    }

    #[must_use]
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// 1-based line the block starts on; 0 for a block with no lines.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based line of the first text line.
    #[must_use]
    pub fn text_line(&self) -> usize {
        self.line + usize::from(self.header.is_some())
    }

    pub(crate) fn set_line(&mut self, line: usize) {
        if self.line == 0 {
            self.line = line;
        }
    }

    /// The block exactly as it appeared in its document.
    #[must_use]
    pub fn raw(&self) -> String {
        let header = self.header.as_deref().unwrap_or_default();
        let mut raw = String::with_capacity(header.len() + self.text.len() + self.separator.len());
        raw.push_str(header);
        raw.push_str(&self.text);
        raw.push_str(&self.separator);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_block_is_empty() {
        let block = Block::new();
        assert!(block.is_empty());
        assert!(!block.is_terminated());
        assert_eq!(block.raw(), "");
    }

    #[test]
    fn test_initialise_resets_text() {
        let comment = CommentFraming::default();
        let mut block = Block::new();
        block.append_text("stale\n");
        block.initialise("<!--{{a}} {{b}}-->\n", 4, &comment).unwrap();
        assert_eq!(block.text(), "");
        assert_eq!(block.field_specs().len(), 2);
        assert_eq!(block.line(), 4);
        assert_eq!(block.text_line(), 5);
    }

    #[test]
    fn test_initialise_rejects_bad_spec() {
        let mut block = Block::new();
        let err = block
            .initialise("<!--{{a:pattern=x}}-->\n", 9, &CommentFraming::default())
            .unwrap_err();
        assert!(matches!(err, Error::Grammar { line: 9, .. }));
    }

    #[test]
    #[should_panic(expected = "terminated")]
    fn test_append_after_terminate_panics() {
        let mut block = Block::new();
        block.append_text("one\n");
        block.terminate("\n");
        block.append_text("two\n");
    }
}
