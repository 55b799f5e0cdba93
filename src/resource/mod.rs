//! Resource references and resolved paths.
//!
//! A [`ResourceRef`] names *what* to open: a package identifier and a
//! forward-slash separated path relative to that package. Resolving it
//! through a [`Registry`](crate::Registry) yields a [`ResolvedPath`].

mod path;
mod resolved;

pub use path::normalize_path;
pub use resolved::ResolvedPath;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// =============================================================================
// ResourceRef
// =============================================================================

/// Identifies a resource: package identifier plus relative resource path.
///
/// Construction never fails; the path is validated when the reference is
/// resolved, so a bad path surfaces as a not-found error at that point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    package: String,
    path: String,
}

impl ResourceRef {
    /// Create a reference to `path` inside `package`.
    pub fn new(package: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            path: path.into(),
        }
    }

    /// The package identifier (e.g. `"sample_pkg"` or `"sample_pkg.sub"`).
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The resource path as given.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parse the resource path into validated segments.
    pub fn resource_path(&self) -> Result<ResourcePath> {
        ResourcePath::parse(&self.path)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.path)
    }
}

// =============================================================================
// ResourcePath
// =============================================================================

/// A validated, normalized resource path.
///
/// Empty segments and `.` are dropped. Absolute paths, `..` and paths
/// with no segments left are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    /// Parse a forward-slash separated relative path.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidResourcePath {
            path: raw.to_string(),
            reason,
        };

        if raw.starts_with('/') || raw.starts_with('\\') || Path::new(raw).has_root() {
            return Err(invalid("must be relative to the package"));
        }

        let mut segments = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid("must not leave the package")),
                s if s.contains('\\') || s.contains('\0') => {
                    return Err(invalid("segments must not contain `\\` or NUL"));
                }
                s => segments.push(s.to_string()),
            }
        }

        if segments.is_empty() {
            return Err(invalid("names no resource"));
        }
        Ok(Self { segments })
    }

    /// The normalized path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The last segment (the file or directory name).
    pub fn file_name(&self) -> &str {
        // `parse` guarantees at least one segment
        self.segments.last().map_or("", String::as_str)
    }

    /// Join the segments onto a filesystem root.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.segments.iter().fold(root.to_path_buf(), |p, s| p.join(s))
    }

    /// The normalized path, `/`-joined.
    pub fn as_string(&self) -> String {
        self.segments.join("/")
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
