//! Artifact writing
//!
//! Outputs are staged in a sibling `.tmp` file and renamed into place,
//! so a failed run never leaves a truncated artifact behind.

use crate::error::{GlyphsheetError, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Sibling staging path (`font.png` -> `font.png.tmp`)
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path`, replacing any previous file atomically
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let staging = staging_path(path);

    if let Err(e) = std::fs::write(&staging, contents) {
        let _ = std::fs::remove_file(&staging);
        return Err(GlyphsheetError::io(&staging, e));
    }

    if let Err(e) = std::fs::rename(&staging, path) {
        let _ = std::fs::remove_file(&staging);
        return Err(GlyphsheetError::io(path, e));
    }

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staging_path() {
        assert_eq!(
            staging_path(Path::new("resources/font.png")),
            PathBuf::from("resources/font.png.tmp")
        );
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old content that is longer").unwrap();

        write_atomic(&path, "new".as_bytes()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.txt");

        let err = write_atomic(&path, b"x").unwrap_err();
        assert!(matches!(err, GlyphsheetError::ResourceLoad { .. }));
        assert!(!path.exists());
    }
}
