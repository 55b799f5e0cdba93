//! The package registry: resource resolution.
//!
//! # Resolution Flow
//!
//! ```text
//! ResourceRef("sample_pkg.sub", "inner/note.md")
//!        │
//!        ├─► PackageId::parse          ("sample_pkg", "sub")
//!        │
//!        ├─► registered packages       longest dotted prefix wins
//!        │   └─► search paths          <dir>/sample_pkg/ or <dir>/sample_pkg.zip
//!        │
//!        ├─► Package::locate           descend into sub-packages
//!        │
//!        └─► Package::resolve          loose file ──► canonical path
//!                                      archive    ──► temporary extraction
//! ```
//!
//! No resolved paths are cached: every call goes back to the package.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::{Config, ConfigBuilder};
use crate::error::{Error, Result};
use crate::factory::Factory;
use crate::open::OpenOptions;
use crate::package::{Package, PackageId, PackageSource};
use crate::resource::{ResolvedPath, ResourceRef};

/// Archive extension recognized on search paths.
const ARCHIVE_EXTENSION: &str = "zip";

/// Caller-owned table of package locations.
///
/// Cloning is cheap and clones share the same table.
#[derive(Clone, Default)]
pub struct Registry {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    packages: RwLock<FxHashMap<String, PackageSource>>,
    search_paths: Vec<PathBuf>,
    extract_dir: Option<PathBuf>,
}

impl Registry {
    /// An empty registry: no packages, no search paths.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a [`ConfigBuilder`].
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Build a registry from a configuration.
    pub fn from_config(config: Config) -> Self {
        let packages = config.packages.into_iter().collect();
        Self {
            inner: Arc::new(Inner {
                packages: RwLock::new(packages),
                search_paths: config.search_paths,
                extract_dir: config.extract_dir,
            }),
        }
    }

    /// Register (or replace) a package. Returns the previous source.
    pub fn register(&self, name: impl Into<String>, source: PackageSource) -> Option<PackageSource> {
        self.inner.packages.write().insert(name.into(), source)
    }

    /// Remove an explicitly registered package.
    pub fn unregister(&self, name: &str) -> Option<PackageSource> {
        self.inner.packages.write().remove(name)
    }

    /// Search paths, in lookup order.
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.inner.search_paths
    }

    /// Parent directory for archive extractions, if configured.
    pub fn extract_dir(&self) -> Option<&Path> {
        self.inner.extract_dir.as_deref()
    }

    /// Locate a package by identifier.
    ///
    /// A missing package and a malformed identifier both fail with
    /// [`Error::PackageNotFound`].
    pub fn package(&self, id: &str) -> Result<Package> {
        let id = PackageId::parse(id)?;

        if let Some((source, depth)) = self.registered(&id) {
            return Package::locate(id, source, depth);
        }
        if let Some(source) = self.search(id.root()) {
            return Package::locate(id, source, 1);
        }

        debug!(package = %id, "package not found");
        Err(Error::PackageNotFound {
            package: id.to_string(),
        })
    }

    /// Resolve a resource to a concrete filesystem path.
    ///
    /// Keep the returned [`ResolvedPath`] alive while using the path: for
    /// archive packages it owns the temporary extraction.
    pub fn resolve(&self, resource: &ResourceRef) -> Result<ResolvedPath> {
        let path = resource.resource_path()?;
        let package = self.package(resource.package())?;
        let resolved = package.resolve(&path, self.extract_dir())?;
        debug!(
            resource = %resource,
            path = %resolved.display(),
            extracted = resolved.is_extracted(),
            "resolved resource"
        );
        Ok(resolved)
    }

    /// Resolve `resource`, run `f` on its path, then release the path.
    ///
    /// The extraction is released on every exit path, including unwinding.
    pub fn with_resource<T>(&self, resource: &ResourceRef, f: impl FnOnce(&Path) -> T) -> Result<T> {
        let resolved = self.resolve(resource)?;
        Ok(f(resolved.path()))
    }

    /// Whether `resource` exists, without extracting it.
    pub fn contains(&self, resource: &ResourceRef) -> Result<bool> {
        let path = match resource.resource_path() {
            Ok(path) => path,
            Err(_) => return Ok(false),
        };
        match self.package(resource.package()) {
            Ok(package) => package.contains(&path),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// A [`Factory`] for `resource` that resolves through this registry.
    pub fn factory(&self, resource: ResourceRef, options: OpenOptions) -> Factory {
        Factory::new(self, resource, options)
    }

    /// Longest registered dotted prefix of `id`, with its segment count.
    fn registered(&self, id: &PackageId) -> Option<(PackageSource, usize)> {
        let packages = self.inner.packages.read();
        let segments = id.segments();
        (1..=segments.len()).rev().find_map(|depth| {
            packages
                .get(&segments[..depth].join("."))
                .map(|source| (source.clone(), depth))
        })
    }

    fn search(&self, name: &str) -> Option<PackageSource> {
        self.inner.search_paths.iter().find_map(|dir| {
            let loose = dir.join(name);
            if loose.is_dir() {
                return Some(PackageSource::Directory(loose));
            }
            let archive = dir.join(format!("{name}.{ARCHIVE_EXTENSION}"));
            archive.is_file().then(|| PackageSource::archive(archive))
        })
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("packages", &*self.inner.packages.read())
            .field("search_paths", &self.inner.search_paths)
            .field("extract_dir", &self.inner.extract_dir)
            .finish()
    }
}
