//! Package identifiers and locations.
//!
//! # Package System Overview
//!
//! A package is a named root that bundles resource files. Identifiers are
//! dot-separated:
//!
//! ```text
//! sample_pkg          -> root of the `sample_pkg` package
//! sample_pkg.sub      -> the `sub/` directory inside it
//! sample_pkg.sub.deep -> `sub/deep/`
//! ```
//!
//! A package lives either as loose files in a directory or inside a zip
//! archive:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PackageSource::Directory("/opt/app/sample_pkg")             │
//! │      data/hello.txt  ──► /opt/app/sample_pkg/data/hello.txt  │
//! │                                                              │
//! │  PackageSource::Archive { "app.zip", prefix: "sample_pkg" }  │
//! │      data/hello.txt  ──► extract "sample_pkg/data/hello.txt" │
//! │                          into a temporary directory          │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod archive;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::resource::{normalize_path, ResolvedPath, ResourcePath};

// =============================================================================
// PackageId
// =============================================================================

/// A dot-separated package identifier.
///
/// # Example
///
/// ```
/// use file_factory::PackageId;
///
/// let id = PackageId::parse("sample_pkg.sub").unwrap();
/// assert_eq!(id.root(), "sample_pkg");
/// assert_eq!(id.segments(), ["sample_pkg", "sub"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageId {
    segments: Vec<String>,
}

impl PackageId {
    /// Parse an identifier. Malformed identifiers name no package.
    pub fn parse(raw: &str) -> Result<Self> {
        let not_found = || Error::PackageNotFound {
            package: raw.to_string(),
        };

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        let valid = segments.iter().all(|s| {
            !s.is_empty() && !s.contains(['/', '\\', '\0']) && s.trim() == s
        });
        if !valid {
            return Err(not_found());
        }
        Ok(Self { segments })
    }

    /// The top-level package name.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// All segments, top-level first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

// =============================================================================
// PackageSource
// =============================================================================

/// Where a package's files live.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageSource {
    /// Loose files under a directory.
    Directory(PathBuf),
    /// Members of a zip archive below `prefix` (empty for the archive root).
    Archive {
        /// The zip file.
        archive: PathBuf,
        /// `/`-separated directory inside the archive, without slashes at
        /// either end.
        prefix: String,
    },
}

impl PackageSource {
    /// A package stored as loose files in `dir`.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self::Directory(dir.into())
    }

    /// A package stored at the root of a zip archive.
    pub fn archive(archive: impl Into<PathBuf>) -> Self {
        Self::archive_at(archive, "")
    }

    /// A package stored below `prefix` inside a zip archive.
    pub fn archive_at(archive: impl Into<PathBuf>, prefix: &str) -> Self {
        Self::Archive {
            archive: archive.into(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// Whether the backing directory or archive file exists.
    pub fn exists(&self) -> bool {
        match self {
            Self::Directory(dir) => dir.is_dir(),
            Self::Archive { archive, .. } => archive.is_file(),
        }
    }

    /// Whether resources need extraction before they have a real path.
    pub fn is_archive(&self) -> bool {
        matches!(self, Self::Archive { .. })
    }

    /// Descend into a sub-package directory, if it exists.
    fn child(&self, name: &str) -> Result<Option<Self>> {
        match self {
            Self::Directory(dir) => {
                let sub = dir.join(name);
                Ok(sub.is_dir().then_some(Self::Directory(sub)))
            }
            Self::Archive { archive, prefix } => {
                let sub = archive::join_entry(prefix, [name]);
                Ok(archive::has_dir(archive, &sub)?.then(|| Self::Archive {
                    archive: archive.clone(),
                    prefix: sub,
                }))
            }
        }
    }
}

// =============================================================================
// Package
// =============================================================================

/// A located package: its identifier and the source holding its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    id: PackageId,
    source: PackageSource,
}

impl Package {
    /// Locate `id` given the source of its first `depth` segments.
    ///
    /// The remaining segments are sub-packages and must exist as
    /// directories inside `base`.
    pub(crate) fn locate(id: PackageId, base: PackageSource, depth: usize) -> Result<Self> {
        if !base.exists() {
            return Err(Error::PackageNotFound {
                package: id.to_string(),
            });
        }

        let mut source = base;
        for segment in &id.segments()[depth..] {
            source = source.child(segment)?.ok_or_else(|| Error::PackageNotFound {
                package: id.to_string(),
            })?;
        }

        debug!(package = %id, source = ?source, "located package");
        Ok(Self { id, source })
    }

    /// The package identifier.
    pub fn id(&self) -> &PackageId {
        &self.id
    }

    /// The directory or archive location holding this package's files.
    pub fn source(&self) -> &PackageSource {
        &self.source
    }

    /// Materialize `resource` as a concrete path.
    ///
    /// Archive members are extracted into a fresh temporary directory
    /// created under `extract_dir` (or the system temp dir).
    pub fn resolve(&self, resource: &ResourcePath, extract_dir: Option<&Path>) -> Result<ResolvedPath> {
        let resolved = match &self.source {
            PackageSource::Directory(dir) => {
                let target = resource.to_path(dir);
                target
                    .exists()
                    .then(|| ResolvedPath::on_disk(normalize_path(&target)))
            }
            PackageSource::Archive { archive, prefix } => {
                let entry = archive::join_entry(prefix, resource.segments());
                archive::extract(archive, &entry, resource.file_name(), extract_dir)?
            }
        };

        resolved.ok_or_else(|| Error::ResourceNotFound {
            package: self.id.to_string(),
            resource: resource.as_string(),
        })
    }

    /// Whether `resource` exists in this package, without extracting it.
    pub fn contains(&self, resource: &ResourcePath) -> Result<bool> {
        match &self.source {
            PackageSource::Directory(dir) => Ok(resource.to_path(dir).exists()),
            PackageSource::Archive { archive, prefix } => {
                let entry = archive::join_entry(prefix, resource.segments());
                archive::has_entry(archive, &entry)
            }
        }
    }
}
