//! Path normalization for resolved resources.

use std::path::{Path, PathBuf};

/// Turn a resolved resource path into its absolute, canonical form.
///
/// Existing paths are canonicalized (symlinks, `.` and `..` resolved).
/// Paths that cannot be canonicalized are made absolute against the
/// current directory, or returned unchanged as a last resort.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_existing_is_canonical() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("a")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "x").unwrap();
        let nested = dir.path().join("a").join("..").join("b.txt");

        let normalized = normalize_path(&nested);
        assert!(normalized.is_absolute());
        assert_eq!(normalized, dir.path().join("b.txt").canonicalize().unwrap());
    }

    #[test]
    fn test_normalize_missing_relative_is_absolute() {
        let normalized = normalize_path(Path::new("does/not/exist.txt"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("does/not/exist.txt"));
    }
}
