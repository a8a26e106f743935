//! Existing document plus new data to new document.
//!
//! Update needs no template: the document's own headers and list-template
//! directives say where every value lives. Only the value spans change; every
//! other byte (headers, punctuation, untagged prose, blank lines) is copied
//! through. Lists are regenerated from their directive, so entries can be
//! added or removed freely.

use crate::directive::Directive;
use crate::extract::locate;
use crate::generate::{check_lines, expand_list, list_prefix, relocates, unlocatable};
use crate::map::is_ordinal;
use crate::segment::{Segment, Segmenter};
use crate::{Block, CommentFraming, Placeholder, ProseOptions, Result, ValueMap};
use tracing::{debug, warn};

/// The blocks following a list-template directive.
struct ListSection {
    template: String,
    prefix: String,
    line: usize,
    /// Separator of the last entry dropped so far.
    separator: Option<String>,
    /// Blank lines seen since the last entry.
    blanks: Vec<Block>,
    entries: usize,
}

impl ListSection {
    fn open(template: String, line: usize) -> Result<Option<Self>> {
        let Some(prefix) = list_prefix(&Placeholder::scan(&template), line)? else {
            return Ok(None);
        };
        Ok(Some(ListSection {
            template,
            prefix,
            line,
            separator: None,
            blanks: Vec::new(),
            entries: 0,
        }))
    }

    /// Whether `block` is an entry of this list, i.e. owns a field named
    /// `<prefix>.<ordinal>...`.
    fn owns(&self, block: &Block) -> bool {
        block.field_specs().iter().any(|spec| {
            let rest = if self.prefix.is_empty() {
                Some(spec.name())
            } else {
                spec.name()
                    .strip_prefix(self.prefix.as_str())
                    .and_then(|rest| rest.strip_prefix('.'))
            };
            rest.and_then(|rest| rest.split('.').next())
                .map_or(false, is_ordinal)
        })
    }

    /// Writes the regenerated entries, then any blank lines still held.
    fn close(self, out: &mut String, values: &ValueMap, options: &ProseOptions) -> Result<()> {
        let mut blanks = self.blanks.into_iter();
        let separator = match self.separator {
            Some(separator) => separator,
            None => blanks
                .next()
                .map(|blank| blank.separator().to_string())
                .unwrap_or_default(),
        };
        debug!(
            list = %self.prefix,
            replaced = self.entries,
            "Regenerating list entries"
        );
        out.push_str(&expand_list(
            &self.template,
            &self.prefix,
            self.line,
            values,
            options,
            &separator,
        )?);
        for blank in blanks {
            out.push_str(&blank.raw());
        }
        Ok(())
    }
}

/// Rewrites the value spans of one block, copying everything else.
fn rewrite_block(block: &Block, values: &ValueMap, comment: &CommentFraming) -> Result<String> {
    if block.field_specs().is_empty() {
        return Ok(block.raw());
    }

    let text = block.text();
    let mut body = String::with_capacity(text.len());
    let mut specs = Vec::with_capacity(block.field_specs().len());
    let mut placed = Vec::with_capacity(block.field_specs().len());
    let mut copied = 0;
    let mut from = 0;

    for spec in block.field_specs() {
        let Some(found) = locate(spec, text, from)? else {
            warn!(
                field = spec.name(),
                line = block.line(),
                "Field spec does not match its block, leaving text unchanged"
            );
            continue;
        };
        let value = match values.get_value(spec.name()) {
            Some(scalar) => scalar.to_string(),
            None => {
                warn!(field = spec.name(), "Field has no value, clearing it");
                String::new()
            }
        };
        body.push_str(&text[copied..found.start]);
        let start = body.len();
        body.push_str(&value);
        placed.push(start..body.len());
        copied = found.end;
        from = found.end;
        specs.push(spec);
    }
    body.push_str(&text[copied..]);

    let names: Vec<&str> = specs.iter().map(|spec| spec.name()).collect();
    check_lines(&body, &names, &placed, block.text_line(), comment)?;
    let mut from = 0;
    for (spec, range) in specs.iter().zip(&placed) {
        if !relocates(spec, &body, from, range)? {
            return Err(unlocatable(spec.name(), &body, range, block.text_line()));
        }
        from = range.end;
    }

    let mut out = String::with_capacity(body.len() + 64);
    out.push_str(block.header().unwrap_or_default());
    out.push_str(&body);
    out.push_str(block.separator());
    Ok(out)
}

/// Rewrites `document` with `values`, preserving all text outside the values.
///
/// # Errors
///
/// Returns [`crate::Error::Grammar`] for a malformed header or directive line,
/// and for a new value its delimiters would not read back unchanged.
/// Returns [`crate::Error::InvalidArgument`] for a value that would end or
/// split its block, e.g. one containing a blank line.
///
/// # Examples
///
/// ```rust
/// use serde_prose::{update, ValueMap};
///
/// let document = "# Notes\n\n<!--{{author:pattern=\"By %s.\"}}-->\nBy Plato.\n";
/// let mut values = ValueMap::new();
/// values.put("author", "Aristotle");
///
/// let updated = update(document, &values).unwrap();
/// assert_eq!(updated, "# Notes\n\n<!--{{author:pattern=\"By %s.\"}}-->\nBy Aristotle.\n");
/// ```
pub fn update(document: &str, values: &ValueMap) -> Result<String> {
    update_with_options(document, values, &ProseOptions::default())
}

/// [`update`] starting from `options` instead of the defaults.
pub fn update_with_options(
    document: &str,
    values: &ValueMap,
    options: &ProseOptions,
) -> Result<String> {
    let options = options.clone().scan(document)?;
    let mut out = String::with_capacity(document.len());
    let mut section: Option<ListSection> = None;

    for segment in Segmenter::new(document, options.comment.clone()) {
        match segment? {
            Segment::Directive {
                directive,
                raw,
                line,
            } => {
                if let Some(open) = section.take() {
                    open.close(&mut out, values, &options)?;
                }
                out.push_str(&raw);
                if let Directive::ListTemplate(template) = directive {
                    section = ListSection::open(template, line)?;
                }
            }
            Segment::Block(block) => {
                if let Some(open) = section.as_mut() {
                    if open.owns(&block) {
                        open.separator = Some(block.separator().to_string());
                        open.blanks.clear();
                        open.entries += 1;
                        continue;
                    }
                    if block.is_empty() {
                        open.blanks.push(block);
                        continue;
                    }
                }
                if let Some(open) = section.take() {
                    open.close(&mut out, values, &options)?;
                }
                out.push_str(&rewrite_block(&block, values, &options.comment)?);
            }
        }
    }
    if let Some(open) = section.take() {
        open.close(&mut out, values, &options)?;
    }

    debug!(bytes = out.len(), "Updated document");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate;

    fn titles(titles: &[&str]) -> ValueMap {
        let mut values = ValueMap::new();
        for title in titles {
            let mut entry = ValueMap::new();
            entry.put("title", *title);
            values.add("refs", entry);
        }
        values
    }

    const TEMPLATE: &str = "# Reading list\n\n- {{refs.*.title}}\n\nCompiled by {{editor}}.\n";

    #[test]
    fn test_update_matches_regeneration() {
        let mut before = titles(&["A", "B", "C"]);
        before.put("editor", "Ann");
        let mut after = titles(&["X"]);
        after.put("editor", "Bob");

        let document = generate(&before, TEMPLATE).unwrap();
        assert_eq!(
            update(&document, &after).unwrap(),
            generate(&after, TEMPLATE).unwrap()
        );
    }

    #[test]
    fn test_list_grows_from_empty() {
        let mut empty = ValueMap::new();
        empty.put("editor", "Ann");
        let mut full = titles(&["A", "B"]);
        full.put("editor", "Ann");

        let document = generate(&empty, TEMPLATE).unwrap();
        assert_eq!(
            update(&document, &full).unwrap(),
            generate(&full, TEMPLATE).unwrap()
        );
        let emptied = update(&generate(&full, TEMPLATE).unwrap(), &empty).unwrap();
        assert_eq!(emptied, document);
    }

    #[test]
    fn test_untagged_text_is_preserved() {
        let document = "\
Preamble that nobody tagged.

<!--{{a:pattern=\"[%s]\"}} {{b:pattern=\"(%s)\"}}-->
Keep [old a] and keep (old b) exactly.
Trailing line.


Coda.";
        let mut values = ValueMap::new();
        values.put("a", "new a");
        values.put("b", "new b");

        let updated = update(document, &values).unwrap();
        assert_eq!(updated, document.replace("old a", "new a").replace("old b", "new b"));
    }

    #[test]
    fn test_absent_value_becomes_empty() {
        let document = "<!--{{a:pattern=\"[%s]\"}}-->\n[gone]\n";
        let updated = update(document, &ValueMap::new()).unwrap();
        assert_eq!(updated, "<!--{{a:pattern=\"[%s]\"}}-->\n[]\n");
    }

    #[test]
    fn test_unreadable_value_fails_the_update() {
        let document = "<!--{{a:pattern=\"[%s]\"}}-->\n[old]\n";
        let mut values = ValueMap::new();
        values.put("a", "x]y");
        assert!(matches!(
            update(document, &values),
            Err(crate::Error::Grammar { line: 2, .. })
        ));
    }

    #[test]
    fn test_value_splitting_its_block_fails_the_update() {
        // Clearing a whole-text field would leave a blank line behind.
        let document = "<!--{{bio}}-->\nPhilosopher\n";
        assert!(matches!(
            update(document, &ValueMap::new()),
            Err(crate::Error::InvalidArgument(_))
        ));

        let document = "<!--{{bio:pattern=\"Bio: %s\"}}-->\nBio: short\n";
        let mut values = ValueMap::new();
        values.put("bio", "one\n\ntwo");
        assert!(matches!(
            update(document, &values),
            Err(crate::Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_owns_matches_ordinal_entries_only() {
        let section = ListSection::open("- {{refs.*.title}}\n".to_string(), 1)
            .unwrap()
            .unwrap();
        let block = |header: &str| {
            let mut block = Block::new();
            block
                .initialise(header, 1, &crate::CommentFraming::default())
                .unwrap();
            block
        };
        assert!(section.owns(&block("<!--{{refs.3.title}}-->\n")));
        assert!(!section.owns(&block("<!--{{refs.title}}-->\n")));
        assert!(!section.owns(&block("<!--{{refsx.0.title}}-->\n")));
    }
}
