//! Concrete paths produced by resolution.

use std::fmt;
use std::io;
use std::ops::Deref;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A concrete, openable filesystem path for a resource.
///
/// For archive-packed packages the resource is extracted into a temporary
/// directory owned by this value. The extraction is removed when the value
/// is dropped, so keep it alive for as long as the path is in use.
///
/// ```ignore
/// {
///     let path = registry.resolve(&ResourceRef::new("assets", "logo.png"))?;
///     let bytes = std::fs::read(&path)?;
/// } // extraction (if any) removed here
/// ```
pub struct ResolvedPath {
    path: PathBuf,
    extraction: Option<TempDir>,
}

impl ResolvedPath {
    /// A path that lives on disk as a loose file; nothing to clean up.
    pub(crate) fn on_disk(path: PathBuf) -> Self {
        Self {
            path,
            extraction: None,
        }
    }

    /// A path inside `extraction`, removed together with it.
    pub(crate) fn extracted(path: PathBuf, extraction: TempDir) -> Self {
        Self {
            path,
            extraction: Some(extraction),
        }
    }

    /// The resolved path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the resource was extracted to a temporary location.
    pub fn is_extracted(&self) -> bool {
        self.extraction.is_some()
    }

    /// Release the extraction now, reporting cleanup failures.
    ///
    /// Dropping the value does the same but ignores errors.
    pub fn close(self) -> io::Result<()> {
        match self.extraction {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Deref for ResolvedPath {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPath")
            .field("path", &self.path)
            .field("extracted", &self.is_extracted())
            .finish()
    }
}
