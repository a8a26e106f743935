//! Document to data.
//!
//! Every block with a header contributes one small [`ValueMap`]; contributions
//! are merged in document order, so list entries spread over several blocks
//! (`refs.0.title`, `refs.1.title`, ...) accumulate into one list.

use crate::segment::{Segment, Segmenter};
use crate::{Block, FieldSpec, ProseOptions, Result, ValueMap};
use std::ops::Range;
use tracing::{debug, warn};

/// Byte range of the value body of the first match of `spec` in `text` at or
/// after byte `from`.
///
/// Callers resume at the end of the previous value, not of its whole match:
/// neighbouring fields may share the text between them as delimiters.
pub(crate) fn locate(spec: &FieldSpec, text: &str, from: usize) -> Result<Option<Range<usize>>> {
    let pattern = spec.delimiter().pattern()?;
    Ok(pattern
        .captures_at(text, from)
        .and_then(|caps| caps.get(1))
        .map(|value| value.range()))
}

/// Values of one block, matched sequentially in header order.
pub(crate) fn extract_block(block: &Block) -> Result<ValueMap> {
    let text = block.text();
    let mut values = ValueMap::new();
    let mut from = 0;
    for spec in block.field_specs() {
        match locate(spec, text, from)? {
            Some(found) => {
                from = found.end;
                values.put(spec.name(), &text[found]);
            }
            None => warn!(
                field = spec.name(),
                line = block.line(),
                "Field spec does not match its block, skipping"
            ),
        }
    }
    Ok(values)
}

/// Extracts the data embedded in `document`.
///
/// # Errors
///
/// Returns [`crate::Error::Grammar`] for a malformed header or directive line.
///
/// # Examples
///
/// ```rust
/// use serde_prose::extract;
///
/// let document = "<!--{{author:pattern=\"By %s.\"}}-->\nBy Plato.\n\n";
/// let values = extract(document).unwrap();
/// assert_eq!(values.to_string(), "(author=Plato)");
/// ```
pub fn extract(document: &str) -> Result<ValueMap> {
    extract_with_options(document, &ProseOptions::default())
}

/// [`extract`] starting from `options` instead of the defaults.
pub fn extract_with_options(document: &str, options: &ProseOptions) -> Result<ValueMap> {
    let options = options.clone().scan(document)?;
    let mut values = ValueMap::new();
    let mut blocks = 0usize;
    for segment in Segmenter::new(document, options.comment) {
        if let Segment::Block(block) = segment? {
            if block.field_specs().is_empty() {
                continue;
            }
            values.merge(extract_block(&block)?);
            blocks += 1;
        }
    }
    debug!(blocks, fields = values.len(), "Extracted document");
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_blocks_accumulate() {
        let document = "\
<!--{@list-template=\"- {{refs.*.title}}\\n\"}}-->
<!--{{refs.0.title:pattern=\"- %s\"}}-->
- A

<!--{{refs.1.title:pattern=\"- %s\"}}-->
- B
";
        let values = extract(document).unwrap();
        assert_eq!(values.to_string(), "(refs=(0=(title=A),1=(title=B)))");
    }

    #[test]
    fn test_fields_match_sequentially() {
        let document = "<!--{{a:pattern=\"[%s]\"}} {{b:pattern=\"[%s]\"}}-->\n[one] and [two]\n";
        let values = extract(document).unwrap();
        assert_eq!(values.get_value("a").unwrap().to_string(), "one");
        assert_eq!(values.get_value("b").unwrap().to_string(), "two");
    }

    #[test]
    fn test_neighbours_share_delimiter_text() {
        let document =
            "<!--{{a:pattern=\"See [%s] or [\"}} {{b:pattern=\"] or [%s].\"}}-->\nSee [one] or [two].\n";
        let values = extract(document).unwrap();
        assert_eq!(values.get_value("a").unwrap().to_string(), "one");
        assert_eq!(values.get_value("b").unwrap().to_string(), "two");
    }

    #[test]
    fn test_unmatched_field_is_skipped() {
        let document = "<!--{{a:pattern=\"[%s]\"}} {{b:pattern=\"<%s>\"}}-->\n[one]\n";
        let values = extract(document).unwrap();
        assert!(values.contains("a"));
        assert!(!values.contains("b"));
    }

    #[test]
    fn test_bare_blocks_are_ignored() {
        let values = extract("# Heading\n\nJust prose, {{not}} a field.\n").unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_whole_text_field() {
        let document = "<!--{{bio}}-->\nLine one\nLine two\n\n";
        let values = extract(document).unwrap();
        assert_eq!(values.get_value("bio").unwrap().to_string(), "Line one\nLine two");
    }

    #[test]
    fn test_custom_comment_framing() {
        let options = ProseOptions::new().with_comment("%% ", "");
        let document = "%% {{a:pattern=\"(%s)\"}}\n(value)\n";
        let values = extract_with_options(document, &options).unwrap();
        assert_eq!(values.get_value("a").unwrap().to_string(), "value");
    }
}
