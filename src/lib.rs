//! # serde_prose
//!
//! A Serde-compatible, reversible serialization of structured data into prose
//! documents.
//!
//! ## What is a prose document?
//!
//! A prose document is ordinary human-readable text, typically markdown, with
//! data values embedded in its sentences. Hidden comment lines record where
//! each value sits, so the same document can later be read back into data, or
//! rewritten with new data while every other byte stays exactly as it was.
//!
//! ```text
//! # Reading notes
//!
//! <!--{{author:pattern="Notes on %s, written in "}} {{year:pattern=", written in %s."}}-->
//! Notes on Plato, written in 2024.
//! ```
//!
//! ## Key Features
//!
//! - **Reversible**: [`extract`] recovers exactly what [`generate`] rendered
//! - **Lossless updates**: [`update`] rewrites only the value spans, so hand
//!   edits to the surrounding prose survive
//! - **Lists**: a `*` in a placeholder path repeats its block once per entry
//! - **Serde Compatible**: any `#[derive(Serialize, Deserialize)]` type can be
//!   rendered into and read from a document
//! - **Self-describing**: a document carries its own comment syntax and
//!   delimiter configuration, so no template is needed to read or update it
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! serde_prose = "0.1"
//! serde = { version = "1.0", features = ["derive"] }
//! ```
//!
//! ### Rendering and reading back
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use serde_prose::{from_document, to_document};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Note {
//!     author: String,
//!     year: u16,
//! }
//!
//! let template = "# Reading notes\n\nNotes on {{author}}, written in {{year}}.\n";
//! let note = Note { author: "Plato".to_string(), year: 2024 };
//!
//! let document = to_document(&note, template).unwrap();
//! assert!(document.ends_with("Notes on Plato, written in 2024.\n"));
//!
//! let note_back: Note = from_document(&document).unwrap();
//! assert_eq!(note, note_back);
//! ```
//!
//! ### Updating in place
//!
//! ```rust
//! use serde_prose::{update, value_map};
//!
//! let document = "\
//! <!--{{author:pattern=\"By %s.\"}}-->
//! By Plato. (I added this remark by hand.)
//! ";
//!
//! let updated = update(document, &value_map!({ "author": "Aristotle" })).unwrap();
//! assert!(updated.ends_with("By Aristotle. (I added this remark by hand.)\n"));
//! ```
//!
//! ### Lists
//!
//! ```rust
//! use serde_prose::{extract, generate, value_map};
//!
//! let values = value_map!({
//!     "refs": [{ "title": "Republic" }, { "title": "Meno" }]
//! });
//!
//! let document = generate(&values, "- {{refs.*.title}}\n").unwrap();
//! assert_eq!(extract(&document).unwrap(), values);
//! ```
//!
//! ## Format Specification
//!
//! The directive and field-spec grammar is described in the [`format`]
//! module.
//!
//! ## Examples
//!
//! See `demos/round_trip.rs` for a generate, extract and update walkthrough.
//! Run it with: `cargo run --example round_trip`

#[macro_use]
pub mod macros;

pub mod block;
pub mod de;
pub mod delimiter;
pub mod directive;
pub mod error;
pub mod extract;
pub mod field_spec;
pub mod file;
pub mod format;
pub mod generate;
pub mod map;
pub mod options;
pub mod segment;
pub mod ser;
pub mod update;
pub mod value;

pub use block::Block;
pub use de::{from_value, from_value_map, ValueDeserializer};
pub use delimiter::Delimiter;
pub use directive::Directive;
pub use error::{Error, Result};
pub use extract::{extract, extract_with_options};
pub use field_spec::{FieldSpec, Placeholder};
pub use file::{extract_file, generate_file, update_file};
pub use generate::{generate, generate_with_options};
pub use map::ValueMap;
pub use options::{CommentFraming, ProseOptions};
pub use segment::{Segment, Segmenter};
pub use ser::{to_value, to_value_map, ValueSerializer};
pub use update::{update, update_with_options};
pub use value::{Scalar, Value};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;

/// Render any `T: Serialize` into `template`.
///
/// # Examples
///
/// ```rust
/// use serde_prose::to_document;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let document = to_document(&Point { x: 1, y: 2 }, "At ({{x}}, {{y}}).\n").unwrap();
/// assert_eq!(document, "<!--{{x:pattern=\"At (%s, \"}} {{y:pattern=\", %s).\"}}-->\nAt (1, 2).\n");
/// ```
///
/// # Errors
///
/// Returns an error if the value is not a struct or map, or if the template
/// is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_document<T>(value: &T, template: &str) -> Result<String>
where
    T: ?Sized + Serialize,
{
    generate(&to_value_map(value)?, template)
}

/// Render any `T: Serialize` into `template` and write the document to
/// `writer`.
///
/// # Examples
///
/// ```rust
/// use serde_prose::to_writer;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Point { x: i32, y: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1, y: 2 }, "At ({{x}}, {{y}}).\n").unwrap();
/// assert!(String::from_utf8(buffer).unwrap().ends_with("At (1, 2).\n"));
/// ```
///
/// # Errors
///
/// Returns an error if rendering fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(mut writer: W, value: &T, template: &str) -> Result<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let document = to_document(value, template)?;
    writer
        .write_all(document.as_bytes())
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Deserialize an instance of type `T` from the data embedded in `document`.
///
/// # Examples
///
/// ```rust
/// use serde_prose::from_document;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let document = "<!--{{x:pattern=\"At (%s, \"}} {{y:pattern=\", %s).\"}}-->\nAt (1, 2).\n";
/// let point: Point = from_document(document).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if the document is malformed or its values cannot be
/// coerced into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_document<T>(document: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value_map(extract(document)?)
}

/// Deserialize an instance of type `T` from a document read from `reader`.
///
/// # Examples
///
/// ```rust
/// use serde_prose::from_reader;
/// use serde::Deserialize;
/// use std::io::Cursor;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let bytes = b"<!--{{x:pattern=\"x=%s\"}}-->\nx=1\n\n<!--{{y:pattern=\"y=%s\"}}-->\ny=2\n";
/// let point: Point = from_reader(Cursor::new(bytes)).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns an error if reading from the reader fails, the document is
/// malformed, or its values cannot be coerced into `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut document = String::new();
    reader
        .read_to_string(&mut document)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_document(&document)
}

/// Rewrite `document` with the fields of `value`, preserving all other text.
///
/// # Errors
///
/// Returns an error if the value is not a struct or map, or if the document
/// is malformed.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn update_document<T>(document: &str, value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    update(document, &to_value_map(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Profile {
        name: String,
        active: bool,
        tags: Vec<String>,
    }

    const PROFILE: &str = "\
# Profile

Name: {{name}}
Active: {{active}}

- {{tags.*}}
";

    #[test]
    fn test_document_round_trip() {
        let profile = Profile {
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string(), "user".to_string()],
        };
        let document = to_document(&profile, PROFILE).unwrap();
        let profile_back: Profile = from_document(&document).unwrap();
        assert_eq!(profile, profile_back);
    }

    #[test]
    fn test_update_document_matches_regeneration() {
        let before = Profile {
            name: "Alice".to_string(),
            active: true,
            tags: vec!["admin".to_string()],
        };
        let after = Profile {
            name: "Bob".to_string(),
            active: false,
            tags: vec!["user".to_string(), "guest".to_string(), "ops".to_string()],
        };
        let document = to_document(&before, PROFILE).unwrap();
        assert_eq!(
            update_document(&document, &after).unwrap(),
            to_document(&after, PROFILE).unwrap()
        );
    }

    #[test]
    fn test_top_level_must_be_a_map() {
        assert!(matches!(
            to_document(&42, "{{x}}\n"),
            Err(Error::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_reader_errors_are_io() {
        struct Failing;
        impl io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "boom"))
            }
        }
        let result: Result<Point> = from_reader(Failing);
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
