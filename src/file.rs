//! File-level entry points.
//!
//! Each call reads its inputs whole, runs one pipeline in memory and writes
//! the result whole. [`update_file`] never rewrites the source in place: the
//! result goes to a temporary file in the same directory that is then renamed
//! over the source, and a scratch copy of the original is held until the call
//! returns.

use crate::{Error, Result, ValueMap};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::read(path, &e))
}

/// Directory holding `path`, for temporary siblings.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Writes `contents` to a temporary sibling of `path` and renames it over
/// `path`.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let mut temp = NamedTempFile::new_in(parent_dir(path)).map_err(|e| Error::write(path, e))?;
    temp.write_all(contents.as_bytes())
        .and_then(|()| temp.flush())
        .map_err(|e| Error::write(path, e))?;
    temp.persist(path).map_err(|e| Error::write(path, e.error))?;
    Ok(())
}

/// Renders `values` into the template at `template` and writes the document
/// to `output`.
///
/// # Errors
///
/// Returns [`Error::Read`] if the template cannot be read, [`Error::Write`] if
/// the output cannot be written, and [`Error::Grammar`] for a malformed
/// template.
pub fn generate_file<P, Q>(values: &ValueMap, template: P, output: Q) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let template = template.as_ref();
    let output = output.as_ref();
    let document = crate::generate(values, &read(template)?)?;
    write_atomically(output, &document)?;
    debug!(template = %template.display(), output = %output.display(), "Generated file");
    Ok(())
}

/// Extracts the data embedded in the document at `path`.
///
/// # Errors
///
/// Returns [`Error::Read`] if the document cannot be read and
/// [`Error::Grammar`] for a malformed document.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ValueMap> {
    crate::extract(&read(path.as_ref())?)
}

/// Rewrites the document at `path` with `values`.
///
/// On any failure the original document is left untouched.
///
/// # Errors
///
/// Returns [`Error::Read`] if the document cannot be read, [`Error::Write`] if
/// the result cannot be written, and [`Error::Grammar`] for a malformed
/// document.
pub fn update_file<P: AsRef<Path>>(path: P, values: &ValueMap) -> Result<()> {
    let path = path.as_ref();
    let original = read(path)?;

    // Scratch copy of the original, removed on drop.
    let mut backup = NamedTempFile::new_in(parent_dir(path)).map_err(|e| Error::write(path, e))?;
    backup
        .write_all(original.as_bytes())
        .map_err(|e| Error::write(backup.path(), e))?;

    let updated = crate::update(&original, values)?;
    write_atomically(path, &updated)?;
    debug!(
        path = %path.display(),
        before = original.len(),
        after = updated.len(),
        "Updated file"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_document_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = extract_file(dir.path().join("absent.md")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_update_leaves_no_scratch_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "<!--{{a:pattern=\"[%s]\"}}-->\n[old]\n").unwrap();

        let mut values = ValueMap::new();
        values.put("a", "new");
        update_file(&path, &values).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "<!--{{a:pattern=\"[%s]\"}}-->\n[new]\n"
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_failed_update_keeps_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        let original = "<!--{{a:bogus}}-->\n[old]\n";
        fs::write(&path, original).unwrap();

        assert!(update_file(&path, &ValueMap::new()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_parent_dir_of_bare_name() {
        assert_eq!(parent_dir(Path::new("doc.md")), Path::new("."));
        assert_eq!(parent_dir(Path::new("a/doc.md")), Path::new("a"));
    }
}
