//! Data to document.
//!
//! A template is ordinary prose with `{{name}}` placeholders. Generation
//! replaces each placeholder with its value and prepends a hidden header line
//! recording, per field, the text that frames the value:
//!
//! ```text
//! By {{author}}.
//! ```
//!
//! becomes
//!
//! ```text
//! <!--{{author:pattern="By %s."}}-->
//! By Plato.
//! ```
//!
//! A block whose placeholders contain a `*` path segment is a list block: it
//! is captured in a `{@list-template="..."}}` directive and rendered once per
//! entry of the list.

use crate::directive::Directive;
use crate::extract::locate;
use crate::segment::{Segment, Segmenter};
use crate::{
    Block, CommentFraming, Delimiter, Error, FieldSpec, Placeholder, ProseOptions, Result, Value,
    ValueMap,
};
use std::ops::Range;
use tracing::{debug, warn};

pub(crate) const LIST_MARKER: &str = "*";

/// The list prefix shared by the marked placeholders, if any are marked.
///
/// `refs.*.title` has the prefix `refs`; `*.title` has the empty prefix,
/// meaning the root map is the list.
pub(crate) fn list_prefix(placeholders: &[Placeholder], line: usize) -> Result<Option<String>> {
    let mut prefix: Option<String> = None;
    for placeholder in placeholders {
        let segments: Vec<&str> = placeholder.name.split('.').collect();
        let mut markers = segments.iter().enumerate().filter(|(_, s)| **s == LIST_MARKER);
        let Some((position, _)) = markers.next() else {
            continue;
        };
        if markers.next().is_some() {
            return Err(Error::grammar_with_context(
                line,
                "nested list markers are not supported",
                &placeholder.name,
            ));
        }
        let found = segments[..position].join(".");
        if let Some(existing) = &prefix {
            if *existing != found {
                return Err(Error::grammar_with_context(
                    line,
                    &format!(
                        "list placeholders must share one prefix, found `{}` and `{}`",
                        existing, found
                    ),
                    &placeholder.name,
                ));
            }
        }
        prefix = Some(found);
    }
    Ok(prefix)
}

/// `refs.*.title` for entry `2` is `refs.2.title`.
fn entry_name(name: &str, ordinal: &str) -> String {
    name.split('.')
        .map(|segment| if segment == LIST_MARKER { ordinal } else { segment })
        .collect::<Vec<_>>()
        .join(".")
}

/// Renders every entry of the list at `prefix` from the list block `text`.
///
/// Entries are separated by a blank line; `separator` follows the last one
/// (or stands alone when the list is empty).
pub(crate) fn expand_list(
    text: &str,
    prefix: &str,
    line: usize,
    values: &ValueMap,
    options: &ProseOptions,
    separator: &str,
) -> Result<String> {
    let ordinals = values.ordinals(prefix);
    let gap = if text.ends_with('\n') { "\n" } else { "\n\n" };
    let mut out = String::new();
    for (i, ordinal) in ordinals.iter().enumerate() {
        if i > 0 {
            out.push_str(gap);
        }
        let entry = Placeholder::rename_all(text, |name| entry_name(name, ordinal));
        out.push_str(&render_fields(&entry, line, values, options)?);
    }
    out.push_str(separator);
    debug!(list = prefix, entries = ordinals.len(), "Expanded list");
    Ok(out)
}

/// Renders the header line and substituted text of one block.
pub(crate) fn render_fields(
    text: &str,
    line: usize,
    values: &ValueMap,
    options: &ProseOptions,
) -> Result<String> {
    let placeholders = Placeholder::scan(text);
    let mut frames = Vec::with_capacity(placeholders.len());
    let mut placed = Vec::with_capacity(placeholders.len());
    let mut body = String::with_capacity(text.len());
    let mut copied = 0;

    for (i, placeholder) in placeholders.iter().enumerate() {
        frames.push(framings(text, &placeholders, i, &options.delimiter, line)?);
        let value = render_value(values, &placeholder.name, &options.sentinel);
        body.push_str(&text[copied..placeholder.range.start]);
        let start = body.len();
        body.push_str(&value);
        placed.push(start..body.len());
        copied = placeholder.range.end;
    }
    body.push_str(&text[copied..]);

    let names: Vec<&str> = placeholders.iter().map(|p| p.name.as_str()).collect();
    check_lines(&body, &names, &placed, line, &options.comment)?;

    let mut specs = Vec::with_capacity(placeholders.len());
    let mut from = 0;
    for ((name, candidates), range) in names.iter().zip(frames).zip(&placed) {
        let mut chosen = None;
        for delimiter in candidates {
            let spec = FieldSpec::new(*name, delimiter);
            if relocates(&spec, &body, from, range)? {
                chosen = Some(spec);
                break;
            }
        }
        let Some(spec) = chosen else {
            return Err(unlocatable(name, &body, range, line));
        };
        from = range.end;
        specs.push(spec);
    }

    let tokens: Vec<String> = specs.iter().map(ToString::to_string).collect();
    let mut out = options.comment.wrap(&tokens.join(" "));
    out.push_str(&body);
    Ok(out)
}

fn render_value(values: &ValueMap, name: &str, sentinel: &str) -> String {
    match values.lookup(name) {
        Some(Value::Scalar(scalar)) => scalar.to_string(),
        Some(Value::Map(_)) => {
            warn!(field = name, "Field holds a map, not a value");
            sentinel.to_string()
        }
        None => {
            warn!(field = name, "Field is unknown to the data");
            sentinel.to_string()
        }
    }
}

/// The delimiters able to locate placeholder `i` again, most preferred first.
///
/// The configured delimiter comes first when it frames the placeholder; the
/// text between the neighbouring placeholders (bounded by the line) follows.
fn framings(
    text: &str,
    placeholders: &[Placeholder],
    i: usize,
    configured: &Delimiter,
    first_line: usize,
) -> Result<Vec<Delimiter>> {
    let range = &placeholders[i].range;
    let line_start = text[..range.start].rfind('\n').map_or(0, |p| p + 1);
    let mut line_end = text[range.end..].find('\n').map_or(text.len(), |p| range.end + p);
    if text[..line_end].ends_with('\r') {
        line_end -= 1;
    }
    let prev_end = match i.checked_sub(1) {
        Some(prev) => placeholders[prev].range.end.max(line_start),
        None => line_start,
    };
    let next_start = placeholders
        .get(i + 1)
        .map_or(line_end, |next| next.range.start.min(line_end));
    let before = &text[prev_end..range.start];
    let after = &text[range.end..next_start];

    let anchored = |delimiter: &Delimiter| match (delimiter.start(), delimiter.end()) {
        (Some(_), Some(_)) => true,
        (Some(_), None) => range.end == line_end,
        (None, Some(_)) => range.start == line_start,
        (None, None) => {
            placeholders.len() == 1
                && range.start == 0
                && matches!(&text[range.end..], "" | "\n" | "\r\n")
        }
    };

    let mut candidates = Vec::with_capacity(2);
    if configured.is_set()
        && before.ends_with(configured.start().unwrap_or_default())
        && after.starts_with(configured.end().unwrap_or_default())
        && anchored(configured)
    {
        candidates.push(configured.clone());
    }
    let textual = Delimiter::new().with_start(before).with_end(after);
    if anchored(&textual) && !candidates.contains(&textual) {
        candidates.push(textual);
    }
    if candidates.is_empty() {
        return Err(Error::grammar_with_context(
            first_line + text[..range.start].matches('\n').count(),
            &format!("ambiguous delimiter for field `{}`", placeholders[i].name),
            &text[line_start..line_end],
        ));
    }
    Ok(candidates)
}

/// Whether `spec`, searching from `from`, finds exactly the value at `placed`.
pub(crate) fn relocates(
    spec: &FieldSpec,
    body: &str,
    from: usize,
    placed: &Range<usize>,
) -> Result<bool> {
    Ok(locate(spec, body, from)?.as_ref() == Some(placed))
}

/// The error for a value that its delimiters would not read back unchanged.
pub(crate) fn unlocatable(
    name: &str,
    body: &str,
    placed: &Range<usize>,
    first_line: usize,
) -> Error {
    Error::grammar_with_context(
        first_line + body[..placed.start].matches('\n').count(),
        &format!(
            "value of field `{}` cannot be read back through the text around it",
            name
        ),
        &body[placed.clone()],
    )
}

/// Fails when a value would change how its block is segmented: a blank line
/// ends the block early, and a header or directive line starts a new one.
pub(crate) fn check_lines(
    body: &str,
    names: &[&str],
    placed: &[Range<usize>],
    first_line: usize,
    comment: &CommentFraming,
) -> Result<()> {
    let mut offset = 0;
    for (n, raw) in body.split_inclusive('\n').enumerate() {
        let span = offset..offset + raw.len();
        offset = span.end;
        let content = raw.trim_end_matches(|c: char| c == '\n' || c == '\r');
        let splits = content.trim().is_empty()
            || comment.is_header(content)
            || !matches!(Directive::find(content, first_line + n), Ok(None));
        if !splits {
            continue;
        }
        if let Some(i) = placed
            .iter()
            .position(|r| r.start <= span.end && r.end >= span.start)
        {
            return Err(Error::invalid_argument(format!(
                "value of field `{}` would break its block at line {}: {:?}",
                names[i],
                first_line + n,
                content
            )));
        }
    }
    Ok(())
}

fn generate_block(block: &Block, values: &ValueMap, options: &ProseOptions) -> Result<String> {
    let text = block.text();
    let placeholders = Placeholder::scan(text);
    if placeholders.is_empty() {
        return Ok(block.raw());
    }

    match list_prefix(&placeholders, block.text_line())? {
        Some(prefix) => {
            let mut out = Directive::list_template_line(text, &options.comment);
            out.push_str(&expand_list(
                text,
                &prefix,
                block.text_line(),
                values,
                options,
                block.separator(),
            )?);
            Ok(out)
        }
        None => {
            let mut out = render_fields(text, block.text_line(), values, options)?;
            out.push_str(block.separator());
            Ok(out)
        }
    }
}

/// Renders `values` into `template`.
///
/// Every generated header carries the canonical `{{name:pattern="..."}}`
/// form. A bare header in the template, such as `<!--{{author}}-->`, is
/// replaced rather than copied: a bare spec could not find its value again.
///
/// # Errors
///
/// Returns [`Error::Grammar`] for malformed directives or headers in the
/// template, for placeholders whose surrounding text cannot locate them
/// again (e.g. two placeholders with nothing between them), and for values
/// that the text around them would not read back unchanged (e.g. `St. Paul`
/// in `By {{name}}.`). Returns [`Error::InvalidArgument`] for a value that
/// would end or split its block, e.g. one containing a blank line.
///
/// # Examples
///
/// ```rust
/// use serde_prose::{generate, ValueMap};
///
/// let mut values = ValueMap::new();
/// values.put("author", "Plato");
///
/// let document = generate(&values, "<!--{{author}}-->\nBy {{author}}.\n\n").unwrap();
/// assert_eq!(document, "<!--{{author:pattern=\"By %s.\"}}-->\nBy Plato.\n\n");
/// ```
pub fn generate(values: &ValueMap, template: &str) -> Result<String> {
    generate_with_options(values, template, &ProseOptions::default())
}

/// [`generate`] starting from `options` instead of the defaults.
pub fn generate_with_options(
    values: &ValueMap,
    template: &str,
    options: &ProseOptions,
) -> Result<String> {
    let options = options.clone().scan(template)?;
    let mut out = String::with_capacity(template.len() * 2);
    let mut blocks = 0usize;
    for segment in Segmenter::new(template, options.comment.clone()) {
        match segment? {
            Segment::Directive { raw, .. } => out.push_str(&raw),
            Segment::Block(block) => {
                out.push_str(&generate_block(&block, values, &options)?);
                blocks += 1;
            }
        }
    }
    debug!(blocks, bytes = out.len(), "Generated document");
    Ok(out)
}
