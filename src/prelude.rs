//! Prelude module for convenient imports.
//!
//! ```ignore
//! use file_factory::prelude::*;
//! ```

// Registry & resolution
pub use crate::config::ConfigBuilder;
pub use crate::package::PackageSource;
pub use crate::registry::Registry;
pub use crate::resource::{ResolvedPath, ResourceRef};

// Opening
pub use crate::open::{ErrorPolicy, Mode, Newline, OpenOptions, OpenOverrides, Opened, Output};

// Factories
pub use crate::factory::{ByteOpener, Factory, FileOpener, FileProcessor, PathFinder, StringOpener};

// Errors
pub use crate::error::{Error, ErrorKind, Result};
