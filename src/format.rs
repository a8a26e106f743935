//! Prose Document Format
//!
//! This module documents the document format read and written by this
//! library.
//!
//! # Overview
//!
//! A prose document is ordinary text, usually markdown, with data values
//! embedded in its sentences. Hidden comment lines record where each value
//! sits, so the data can be extracted again and rewritten in place without
//! disturbing anything else in the document.
//!
//! ```text
//! # Notes
//!
//! <!--{{author:pattern="By %s."}}-->
//! By Plato.
//! ```
//!
//! Extracting this document yields `author = "Plato"`. Updating it with
//! `author = "Aristotle"` changes only the text between `By ` and `.`.
//!
//! # Blocks
//!
//! A document is read line by line and split into blocks:
//!
//! - A **blank line** (empty or whitespace only) ends the current block and
//!   is kept as that block's separator.
//! - A **header line** starts a new block. A header line is framed by the
//!   comment syntax (`<!--` … `-->` by default) and contains `{{` and `}}`.
//! - A **directive line** is passed through on its own and never belongs to
//!   a block.
//! - Every other line is **text** belonging to the current block.
//!
//! Text that appears before a header, with no blank line in between, forms
//! its own block and is passed through unchanged.
//!
//! # Field Specs
//!
//! A header line holds one or more field specs separated by whitespace:
//!
//! | Token | Meaning |
//! |-------|---------|
//! | `{{name:pattern="start%send"}}` | The value is the shortest text between `start` and the first `end` after it |
//! | `{{name:pattern="start%s"}}` | The value runs from the last `start` on a line to the end of that line |
//! | `{{name:pattern="%send"}}` | The value runs from the start of a line to the first `end` on it |
//! | `{{name}}` | The value is the whole block text, without its final line terminator |
//!
//! Specs are matched in header order. Each search begins where the previous
//! match ended, so repeated framing such as `[%s]` twice on one line finds
//! each value in turn. A spec that does not match is skipped with a warning.
//!
//! Names are dotted paths into the value tree: `book.author.name` addresses
//! the `name` key of the `author` map inside `book`. Path segments that are
//! base-10 numbers (`refs.0.title`) are list ordinals.
//!
//! # Templates
//!
//! Templates use the same block structure, with bare placeholders in the
//! visible text instead of a header:
//!
//! ```text
//! By {{author}}.
//! ```
//!
//! Generation replaces each placeholder with its value and derives the field
//! spec from the text around it. `before` runs from the previous placeholder
//! or the line start, and `after` runs to the next placeholder or the line
//! end:
//!
//! ```text
//! <!--{{author:pattern="By %s."}}-->
//! By Plato.
//! ```
//!
//! A template header, if present, is discarded and rebuilt. A placeholder
//! whose framing could not locate the value again is rejected as an
//! *ambiguous delimiter*:
//!
//! - no text before it, unless it opens its line;
//! - no text after it, unless it ends its line;
//! - neither, unless it is the entire single-line block.
//!
//! Two adjacent placeholders such as `{{a}}{{b}}` are therefore an error
//! unless a configured delimiter frames them.
//!
//! A configured delimiter that frames a placeholder is tried first and the
//! surrounding text second. The first one that finds the rendered value again,
//! at the same place and unchanged, goes into the header. When neither does,
//! for instance `St. Paul` in `By {{name}}.`, generation fails rather than
//! write a document that reads back differently.
//!
//! A field missing from the data, or holding a map rather than a scalar,
//! renders as `UNKNOWN` (see [`ProseOptions::with_sentinel`]).
//!
//! # Lists
//!
//! A placeholder path containing a `*` segment marks its block as a list
//! template:
//!
//! ```text
//! - {{refs.*.title}}
//!
//! ```
//!
//! The block is replaced by a directive that captures it, followed by one copy
//! per ordinal entry of `refs`, in numeric order:
//!
//! ```text
//! <!--{@list-template="- {{refs.*.title}}\n"}}-->
//! <!--{{refs.0.title:pattern="- %s"}}-->
//! - Republic
//!
//! <!--{{refs.1.title:pattern="- %s"}}-->
//! - Meno
//!
//! ```
//!
//! Copies are separated by a blank line and the last one carries the template
//! block's own separator. An empty list leaves only the directive. Every `*`
//! placeholder in one block must share the same prefix, and a path may
//! contain at most one `*`.
//!
//! On update, the entry blocks after a list-template directive are dropped
//! and regenerated from the captured template, so entries can be added or
//! removed freely.
//!
//! # Directives
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `{@template.comment}}` | The text before the token on its line becomes the comment start, the text after it the comment end |
//! | `{@template.delimiter.start:"X"}}` | Sets the inline delimiter start |
//! | `{@template.delimiter.end:"X"}}` | Sets the inline delimiter end |
//! | `{@template.delimiter.pair:"XY"}}` | Sets both from a two-character string |
//! | `{@list-template="..."}}` | Captures a list template block |
//!
//! Directives may appear anywhere on their line. Later directives override
//! earlier ones, and directives in a document override the caller's
//! [`ProseOptions`]:
//!
//! ```text
//! // {@template.comment}}
//! // {@template.delimiter.pair:"[]"}}
//! // {{title:pattern="[%s]"}}
//! See [Republic] first.
//! ```
//!
//! When an inline delimiter is configured and it frames a placeholder
//! (`[{{title}}]`), generation uses it instead of the surrounding text.
//!
//! Inside a list template, `\\`, `\"`, `\n` and `\r` are escaped. Unknown
//! escapes are kept literally.
//!
//! # Values
//!
//! Values are written with their natural textual form:
//!
//! | Type | Example |
//! |------|---------|
//! | Text | `Plato` |
//! | Integer | `42` |
//! | Float | `3.5` |
//! | Boolean | `true` |
//! | Character | `x` |
//! | Date and time | `2024-01-15T10:30:00+00:00` |
//! | URL | `https://example.com/` |
//!
//! Extraction always yields text. Typed fields are recovered by
//! deserializing the extracted map into a host type (see
//! [`from_value_map`](crate::from_value_map)).
//!
//! # Rust-Specific Serialization
//!
//! - **Structs and maps** become nested value maps.
//! - **Sequences, tuples and byte strings** become lists.
//! - **`None` and unit** fields are omitted.
//! - **Unit variants** are written as their name: `status = Active`.
//! - **Newtype variants** become a single-key map keyed by the variant name:
//!   `status.Failed = timeout`.
//! - **Struct and tuple variants** are not supported.
//!
//! # Limitations
//!
//! - A value containing its own end delimiter, or its start delimiter when
//!   there is no end, cannot be extracted intact. Generate and update reject
//!   such values with a grammar error instead of writing them.
//! - A value cannot contain a blank line, nor a line that reads as a header
//!   or a directive, since either would split its block. Generate and update
//!   reject such values with an invalid-argument error.
//! - Documents whose directives or headers were hand-edited into an invalid
//!   form fail with a grammar error.
//! - Documents are processed whole, in memory.
//!
//! [`ProseOptions`]: crate::ProseOptions
//! [`ProseOptions::with_sentinel`]: crate::ProseOptions::with_sentinel

// This module contains only documentation; no implementation code
