//! # file-factory
//!
//! Turn a package's bundled resource files into real filesystem paths, and
//! reopen them through reusable, preconfigured factories.
//!
//! A package is a named root of resource files. It lives either as loose
//! files in a directory or inside a zip archive; the caller-owned
//! [`Registry`] knows where each package is. Resolving a resource hands back
//! a concrete path, extracting it to a temporary directory first when the
//! package is archive-packed. The extraction is released when the
//! [`ResolvedPath`] (or the handle that owns it) is dropped.
//!
//! ## Quick Start
//!
//! ```ignore
//! use file_factory::{OpenOptions, Registry, ResourceRef};
//!
//! let registry = Registry::builder()
//!     .package_dir("sample_pkg", "assets/sample_pkg")
//!     .package_archive("bundled", "assets/app.zip", "bundled")
//!     .build();
//!
//! // One-off resolution
//! let path = registry.resolve(&ResourceRef::new("sample_pkg", "data/hello.txt"))?;
//! println!("{}", path.display());
//!
//! // Reusable factory
//! let hello = registry.factory(
//!     ResourceRef::new("sample_pkg", "data/hello.txt"),
//!     OpenOptions::text().encoding("utf-8"),
//! );
//! let text = hello.open()?.into_text().unwrap().read_to_string()?;
//! assert_eq!(text, "hello\n");
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Registry configuration (search paths, explicit packages)
//! - [`registry`]: Package lookup and resource resolution
//! - [`package`]: Package identifiers and sources (directory, zip)
//! - [`resource`]: Resource references and resolved paths
//! - [`open`]: Open options, text and binary handles
//! - [`factory`]: The [`Factory`] and the location-bound factories
//! - [`error`]: The [`Error`] type and its two kinds

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod factory;
pub mod open;
pub mod package;
pub mod prelude;
pub mod registry;
pub mod resource;

#[cfg(test)]
mod testing;

// =============================================================================
// Resolution
// =============================================================================

pub use config::{Config, ConfigBuilder};
pub use package::{Package, PackageId, PackageSource};
pub use registry::Registry;
pub use resource::{normalize_path, ResolvedPath, ResourcePath, ResourceRef};

// =============================================================================
// Opening
// =============================================================================

pub use open::{
    lookup_encoding, BinaryFile, ErrorPolicy, Lines, Mode, Newline, OpenOptions, OpenOverrides,
    Opened, Output, TextEncoding, TextFile, DEFAULT_ENCODING,
};

// =============================================================================
// Factories
// =============================================================================

pub use factory::{
    normalize_extension, ByteOpener, Factory, FileOpener, FileProcessor, Locator, PathFinder,
    StringOpener,
};

// =============================================================================
// Errors
// =============================================================================

pub use error::{Error, ErrorKind, Result};
