//! Whole-file document I/O.
//!
//! Files are read and written as UTF-8 in one piece. Loading normalizes line endings to LF;
//! saving always writes LF, through a temporary file in the target directory that is then
//! persisted over the target, so a failed save leaves the original file untouched.

use crate::line_ending::{LineEnding, normalize_line_endings};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced by document load/save.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Filesystem I/O failed.
    #[error("cannot access '{path}': {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8 text.
    #[error("'{path}' is not a UTF-8 text file (invalid byte at offset {valid_up_to})")]
    NotText {
        /// The file involved.
        path: PathBuf,
        /// Length of the valid UTF-8 prefix.
        valid_up_to: usize,
    },

    /// The temporary file could not replace the target.
    #[error("cannot replace '{path}': {source}")]
    Persist {
        /// The file involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A document read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// LF-normalized text.
    pub text: String,
    /// Line ending found in the file before normalization.
    pub original_line_ending: LineEnding,
}

/// Read a whole file as text.
pub fn load_document(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let bytes = std::fs::read(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = String::from_utf8(bytes).map_err(|err| DocumentError::NotText {
        path: path.to_path_buf(),
        valid_up_to: err.utf8_error().valid_up_to(),
    })?;

    let original_line_ending = LineEnding::detect_in_text(&raw);
    let text = normalize_line_endings(&raw);
    tracing::debug!(
        path = %path.display(),
        bytes = raw.len(),
        line_ending = original_line_ending.label(),
        "document loaded"
    );

    Ok(LoadedDocument {
        text,
        original_line_ending,
    })
}

/// Write `text` to `path` with LF line endings.
///
/// An existing target keeps its permissions, and a symlink target updates the file it points
/// to instead of being replaced.
pub fn save_document(path: &Path, text: &str) -> Result<(), DocumentError> {
    let io_err = |source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    };

    let existing = match std::fs::metadata(path) {
        Ok(metadata) => Some(metadata),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => return Err(io_err(err)),
    };
    let target = match existing {
        Some(_) => std::fs::canonicalize(path).map_err(io_err)?,
        None => path.to_path_buf(),
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let text = normalize_line_endings(text);
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(text.as_bytes()).map_err(io_err)?;
    if let Some(metadata) = existing {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(&target).map_err(|err| DocumentError::Persist {
        path: target.clone(),
        source: err.error,
    })?;

    tracing::debug!(
        path = %path.display(),
        target = %target.display(),
        bytes = text.len(),
        "document saved"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_document(Path::new("/definitely/not/here.py"));
        assert!(matches!(err, Err(DocumentError::Io { .. })));
    }
}
