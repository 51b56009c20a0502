//! Upload staging helpers

use crate::error::DocumentError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Check whether a file size is within the limit
pub fn validate_file_size(size_bytes: u64, max_bytes: u64) -> bool {
    size_bytes <= max_bytes
}

/// Copy an input document into the upload directory.
///
/// The directory is created if missing. The copy gets a fresh unique name
/// that keeps the source extension, so staging never overwrites an existing
/// file, including the source itself when it already lives in `upload_dir`.
pub fn stage_upload(source: &Path, upload_dir: &Path) -> Result<PathBuf, DocumentError> {
    if !source.is_file() {
        return Err(DocumentError::io(
            source,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input is not a readable file"),
        ));
    }

    fs::create_dir_all(upload_dir).map_err(|e| DocumentError::io(upload_dir, e))?;

    let suffix = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let (file, staged) = tempfile::Builder::new()
        .prefix("upload_")
        .suffix(&suffix)
        .tempfile_in(upload_dir)
        .map_err(|e| DocumentError::io(upload_dir, e))?
        .keep()
        .map_err(|e| DocumentError::io(upload_dir, e.error))?;
    drop(file);

    if let Err(e) = fs::copy(source, &staged) {
        cleanup_upload(&staged);
        return Err(DocumentError::io(source, e));
    }

    debug!("Staged {} at {}", source.display(), staged.display());
    Ok(staged)
}

/// Delete a staged upload after processing; a missing file is not an error
pub fn cleanup_upload(staged: &Path) {
    if staged.exists() {
        if let Err(e) = fs::remove_file(staged) {
            warn!("Failed to remove staged upload {}: {}", staged.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(10, 10));
        assert!(!validate_file_size(11, 10));
    }

    #[test]
    fn test_stage_and_cleanup() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("synopsis.txt");
        fs::write(&source, "text").unwrap();

        let uploads = dir.path().join("uploads");
        let staged = stage_upload(&source, &uploads).unwrap();
        assert_eq!(staged.parent(), Some(uploads.as_path()));
        assert_eq!(staged.extension().and_then(|e| e.to_str()), Some("txt"));
        assert_eq!(fs::read_to_string(&staged).unwrap(), "text");

        cleanup_upload(&staged);
        assert!(!staged.exists());
        assert!(source.exists());
        // Second cleanup is a no-op
        cleanup_upload(&staged);
    }

    #[test]
    fn test_staging_a_file_already_in_upload_dir() {
        let dir = TempDir::new().unwrap();
        let uploads = dir.path().join("uploads");
        fs::create_dir_all(&uploads).unwrap();
        let source = uploads.join("synopsis.txt");
        fs::write(&source, "precious text").unwrap();

        let staged = stage_upload(&source, &uploads).unwrap();
        assert_ne!(staged, source);
        assert_eq!(fs::read_to_string(&source).unwrap(), "precious text");
        assert_eq!(fs::read_to_string(&staged).unwrap(), "precious text");

        cleanup_upload(&staged);
        assert_eq!(fs::read_to_string(&source).unwrap(), "precious text");
    }

    #[test]
    fn test_staging_missing_source() {
        let dir = TempDir::new().unwrap();
        let uploads = dir.path().join("uploads");

        let result = stage_upload(&dir.path().join("absent.txt"), &uploads);
        assert!(matches!(result, Err(DocumentError::Io { .. })));
    }
}
