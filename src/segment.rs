//! Splitting a document into blocks and directive lines.
//!
//! [`Segmenter`] is a line-driven state machine. It keeps one open block and
//! feeds it lines until a blank line, a directive or a new header closes it:
//!
//! | line | action |
//! |------|--------|
//! | blank | terminate the open block with this line as its separator |
//! | directive | flush the open block, then yield the directive |
//! | header | flush the open block, then start a new one |
//! | other | append to the open block |
//!
//! Concatenating the raw form of every segment reproduces the document.

use crate::block::Block;
use crate::directive::Directive;
use crate::options::CommentFraming;
use crate::Result;
use std::collections::VecDeque;
use std::iter::{Chain, Once};
use std::str::SplitInclusive;

/// One unit yielded by the [`Segmenter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Block(Block),
    Directive {
        directive: Directive,
        /// The whole source line, terminator included.
        raw: String,
        line: usize,
    },
}

impl Segment {
    /// The segment exactly as it appeared in its document.
    #[must_use]
    pub fn raw(&self) -> String {
        match self {
            Segment::Block(block) => block.raw(),
            Segment::Directive { raw, .. } => raw.clone(),
        }
    }
}

/// Iterator over the segments of a document.
///
/// # Examples
///
/// ```rust
/// use serde_prose::{CommentFraming, Segment, Segmenter};
///
/// let document = "<!--{{a}}-->\nalpha\n\nplain prose\n";
/// let segments: Vec<Segment> = Segmenter::new(document, CommentFraming::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(segments.len(), 2);
/// let raw: String = segments.iter().map(Segment::raw).collect();
/// assert_eq!(raw, document);
/// ```
pub struct Segmenter<'a> {
    lines: Chain<SplitInclusive<'a, char>, Once<&'a str>>,
    comment: CommentFraming,
    open: Block,
    ready: VecDeque<Segment>,
    line: usize,
    failed: bool,
}

impl<'a> Segmenter<'a> {
    pub fn new(document: &'a str, comment: CommentFraming) -> Self {
        Segmenter {
            // A synthetic empty line flushes the final block.
            lines: document.split_inclusive('\n').chain(std::iter::once("")),
            comment,
            open: Block::new(),
            ready: VecDeque::new(),
            line: 0,
            failed: false,
        }
    }

    fn feed(&mut self, raw: &str) -> Result<()> {
        let content = raw.trim_end_matches(|c: char| c == '\n' || c == '\r');

        if content.trim().is_empty() {
            if !(raw.is_empty() && self.open.is_empty()) {
                self.close(raw);
            }
            return Ok(());
        }

        if let Some(directive) = Directive::find(content, self.line)? {
            self.flush();
            self.ready.push_back(Segment::Directive {
                directive,
                raw: raw.to_string(),
                line: self.line,
            });
            return Ok(());
        }

        if self.comment.is_header(content) {
            self.flush();
            return self.open.initialise(raw, self.line, &self.comment);
        }

        self.open.set_line(self.line);
        self.open.append_text(raw);
        Ok(())
    }

    /// Terminates the open block with `separator` and queues it.
    fn close(&mut self, separator: &str) {
        let mut block = std::mem::take(&mut self.open);
        block.set_line(self.line);
        block.terminate(separator);
        self.ready.push_back(Segment::Block(block));
    }

    fn flush(&mut self) {
        if !self.open.is_empty() {
            self.close("");
        }
    }
}

impl Iterator for Segmenter<'_> {
    type Item = Result<Segment>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(segment) = self.ready.pop_front() {
                return Some(Ok(segment));
            }
            if self.failed {
                return None;
            }
            let raw = self.lines.next()?;
            self.line += 1;
            if let Err(e) = self.feed(raw) {
                self.failed = true;
                self.ready.clear();
                return Some(Err(e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn segments(document: &str) -> Vec<Segment> {
        Segmenter::new(document, CommentFraming::default())
            .collect::<Result<_>>()
            .unwrap()
    }

    fn blocks(document: &str) -> Vec<Block> {
        segments(document)
            .into_iter()
            .filter_map(|s| match s {
                Segment::Block(b) => Some(b),
                Segment::Directive { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_blank_line_terminates_block() {
        let found = blocks("<!--{{a}}-->\nfirst\nsecond\n\ntail\n");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text(), "first\nsecond\n");
        assert_eq!(found[0].separator(), "\n");
        assert_eq!(found[1].text(), "tail\n");
        assert_eq!(found[1].separator(), "");
        assert_eq!(found[1].line(), 5);
    }

    #[test]
    fn test_header_flushes_bare_text() {
        let found = blocks("intro\n<!--{{a}}-->\nvalue\n");
        assert_eq!(found.len(), 2);
        assert!(found[0].field_specs().is_empty());
        assert_eq!(found[0].text(), "intro\n");
        assert_eq!(found[1].field_specs()[0].name(), "a");
    }

    #[test]
    fn test_consecutive_blank_lines_are_kept() {
        let found = blocks("a\n\n\n  \r\nb");
        let separators: Vec<_> = found.iter().map(Block::separator).collect();
        assert_eq!(separators, vec!["\n", "\n", "  \r\n", ""]);
        assert!(found[1].is_empty());
    }

    #[test]
    fn test_directives_are_yielded_in_place() {
        let document = "<!--{@template.delimiter.pair:\"[]\"}}-->\n<!--{{a:pattern=\"[%s]\"}}-->\n[x]\n";
        let found = segments(document);
        assert!(matches!(
            &found[0],
            Segment::Directive {
                directive: Directive::DelimiterPair(_),
                line: 1,
                ..
            }
        ));
        assert!(matches!(&found[1], Segment::Block(b) if b.text() == "[x]\n"));
    }

    #[test]
    fn test_template_lines_are_not_headers() {
        let found = blocks("By {{author}}.\n");
        assert_eq!(found.len(), 1);
        assert!(found[0].field_specs().is_empty());
    }

    #[test]
    fn test_raw_segments_reproduce_document() {
        let document = "# Title\n\n<!--{{a}}-->\nalpha\n<!--{{b}}-->\nbeta\n\n\n<!-- note -->\nend";
        let raw: String = segments(document).iter().map(Segment::raw).collect();
        assert_eq!(raw, document);
    }

    #[test]
    fn test_error_stops_iteration() {
        let mut segmenter = Segmenter::new("ok\n\n<!--{{a:x}}-->\nmore\n", CommentFraming::default());
        assert!(matches!(segmenter.next(), Some(Ok(Segment::Block(_)))));
        assert!(matches!(
            segmenter.next(),
            Some(Err(Error::Grammar { line: 3, .. }))
        ));
        assert!(segmenter.next().is_none());
    }
}
