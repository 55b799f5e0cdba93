//! Factories bound to a package location and file extension.
//!
//! Each wraps a [`Locator`] and exposes one operation that takes the file
//! name (without the bound extension) and optional sub-directories.

use std::path::Path;

use super::Locator;
use crate::error::Result;
use crate::open::{ErrorPolicy, OpenOptions, OpenOverrides, Opened};
use crate::registry::Registry;
use crate::resource::ResolvedPath;

// =============================================================================
// FileOpener
// =============================================================================

/// Opens files of one type at one location, with default open options.
///
/// # Example
///
/// ```ignore
/// let notes = FileOpener::new(&registry, "sample_pkg", Some("md"), OpenOptions::text())?;
/// let mut note = notes.open("note", &["sub", "inner"])?.into_text().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileOpener {
    locator: Locator,
    defaults: OpenOptions,
}

impl FileOpener {
    /// Bind `package` with an optional extension and default options.
    pub fn new(
        registry: &Registry,
        package: &str,
        extension: Option<&str>,
        defaults: OpenOptions,
    ) -> Result<Self> {
        Ok(Self {
            locator: Locator::new(registry, package, extension)?,
            defaults,
        })
    }

    /// The bound location.
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// The default open options.
    pub fn defaults(&self) -> &OpenOptions {
        &self.defaults
    }

    /// Open `name` below `dirs` with the default options.
    pub fn open(&self, name: &str, dirs: &[&str]) -> Result<Opened> {
        self.open_with(name, dirs, &OpenOverrides::default())
    }

    /// Open `name` below `dirs`, replacing any defaults set in `overrides`.
    pub fn open_with(&self, name: &str, dirs: &[&str], overrides: &OpenOverrides) -> Result<Opened> {
        let options = self.defaults.merged(overrides);
        options.validate()?;
        options.open(self.locator.resolve(name, dirs)?)
    }
}

// =============================================================================
// PathFinder
// =============================================================================

/// Finds concrete paths of files of one type at one location.
#[derive(Debug, Clone)]
pub struct PathFinder {
    locator: Locator,
}

impl PathFinder {
    /// Bind `package` with an optional extension.
    pub fn new(registry: &Registry, package: &str, extension: Option<&str>) -> Result<Self> {
        Ok(Self {
            locator: Locator::new(registry, package, extension)?,
        })
    }

    /// The absolute path of `name` below `dirs`.
    ///
    /// Keep the result alive while the path is in use.
    pub fn find(&self, name: &str, dirs: &[&str]) -> Result<ResolvedPath> {
        self.locator.resolve(name, dirs)
    }
}

// =============================================================================
// StringOpener
// =============================================================================

/// Reads whole text files of one type at one location.
///
/// Text is decoded with universal newlines.
#[derive(Debug, Clone)]
pub struct StringOpener {
    locator: Locator,
    encoding: Option<String>,
    errors: ErrorPolicy,
}

impl StringOpener {
    /// Bind `package` with an optional extension; UTF-8, strict decoding.
    pub fn new(registry: &Registry, package: &str, extension: Option<&str>) -> Result<Self> {
        Ok(Self {
            locator: Locator::new(registry, package, extension)?,
            encoding: None,
            errors: ErrorPolicy::Strict,
        })
    }

    /// Set the default encoding.
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Set the default decode error policy.
    pub fn errors(mut self, policy: ErrorPolicy) -> Self {
        self.errors = policy;
        self
    }

    /// Read all of `name` below `dirs` as text.
    pub fn read(&self, name: &str, dirs: &[&str]) -> Result<String> {
        self.read_with(name, dirs, None, None)
    }

    /// Like [`read`](Self::read), overriding the encoding or error policy.
    pub fn read_with(
        &self,
        name: &str,
        dirs: &[&str],
        encoding: Option<&str>,
        errors: Option<ErrorPolicy>,
    ) -> Result<String> {
        let mut options = OpenOptions::text().errors(errors.unwrap_or(self.errors));
        if let Some(label) = encoding.or(self.encoding.as_deref()) {
            options = options.encoding(label);
        }
        options
            .open_text(self.locator.resolve(name, dirs)?)?
            .read_to_string()
    }
}

// =============================================================================
// ByteOpener
// =============================================================================

/// Reads whole files of one type at one location as bytes.
#[derive(Debug, Clone)]
pub struct ByteOpener {
    locator: Locator,
}

impl ByteOpener {
    /// Bind `package` with an optional extension.
    pub fn new(registry: &Registry, package: &str, extension: Option<&str>) -> Result<Self> {
        Ok(Self {
            locator: Locator::new(registry, package, extension)?,
        })
    }

    /// Read all of `name` below `dirs`.
    pub fn read(&self, name: &str, dirs: &[&str]) -> Result<Vec<u8>> {
        let resolved = self.locator.resolve(name, dirs)?;
        std::fs::read(&resolved).map_err(|source| crate::Error::Open {
            path: resolved.path().to_path_buf(),
            source,
        })
    }
}

// =============================================================================
// FileProcessor
// =============================================================================

/// Hands the path of files of one type at one location to a function.
///
/// The path is only valid during the call: archive extractions are
/// released as soon as `process` returns.
///
/// # Example
///
/// ```ignore
/// let sizes = FileProcessor::new(&registry, "sample_pkg", Some("txt"), |path| {
///     std::fs::metadata(path).map(|m| m.len())
/// })?;
/// let size = sizes.process("hello", &["data"])??;
/// ```
#[derive(Clone)]
pub struct FileProcessor<F> {
    locator: Locator,
    process: F,
}

impl<F> FileProcessor<F> {
    /// Bind `package` with an optional extension and a processing function.
    pub fn new<T>(
        registry: &Registry,
        package: &str,
        extension: Option<&str>,
        process: F,
    ) -> Result<Self>
    where
        F: Fn(&Path) -> T,
    {
        Ok(Self {
            locator: Locator::new(registry, package, extension)?,
            process,
        })
    }

    /// Resolve `name` below `dirs` and run the function on its path.
    pub fn process<T>(&self, name: &str, dirs: &[&str]) -> Result<T>
    where
        F: Fn(&Path) -> T,
    {
        let resolved = self.locator.resolve(name, dirs)?;
        Ok((self.process)(resolved.path()))
    }
}

impl<F> std::fmt::Debug for FileProcessor<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileProcessor")
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}
